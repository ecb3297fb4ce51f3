//! Data models for the bug tracker.
//!
//! The JSON shape of these models is shared by the server, the service client
//! and the client-side replica.

mod bug;

pub use bug::*;
