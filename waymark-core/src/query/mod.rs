//! Query state machine.
//!
//! [`reduce`] is the pure transition function; [`QueryStore`] owns the
//! current state, applies actions from the bus and emits route requests.

mod state;
mod store;

pub use state::{QueryState, Transition, reduce};
pub use store::QueryStore;
