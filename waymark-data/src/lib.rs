//! Routing service access for the Waymark route planner.
//!
//! Responsibilities:
//! - Speak the `/info` and `/route` HTTP endpoints of a GraphHopper-compatible
//!   service.
//! - Decode wire geometry and slice it per instruction.
//! - Run fetches asynchronously and publish their outcomes on the bus.
//!
//! Boundaries:
//! - Query rules live in `waymark-core`; this crate only executes the
//!   requests the store emits.

pub mod routing;
