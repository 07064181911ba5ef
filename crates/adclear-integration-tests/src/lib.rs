//! Integration test crate for the adclear workspace.
//!
//! All tests live in `tests/`; this library is intentionally empty.
