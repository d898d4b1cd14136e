use thiserror::Error;

use crate::polyline::PolylineError;

/// Errors raised while fetching or decoding a route or service info.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The request could not reach the service.
    #[error("request to {url} failed: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success status.
    #[error("routing service returned {status}: {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Message reported by the service.
        message: String,
        /// Additional hint messages, possibly empty.
        hints: Vec<String>,
    },
    /// The response body did not have the expected shape.
    #[error("failed to parse routing response: {message}")]
    Parse {
        /// Parser error description.
        message: String,
    },
    /// Compact geometry could not be decoded.
    #[error("failed to decode route geometry: {0}")]
    Decode(#[from] PolylineError),
    /// An instruction referenced geometry outside its path.
    #[error("instruction interval [{start}, {end}] exceeds geometry of {len} points")]
    InstructionOutOfRange {
        /// First index of the interval.
        start: usize,
        /// Last index of the interval, inclusive.
        end: usize,
        /// Number of points in the path geometry.
        len: usize,
    },
}
