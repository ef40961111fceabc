//! Strip session facade

mod strip;

pub use strip::{ModeState, Strip, StripEvent, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT};
