//! Network layer subsystem.
//!
//! Plain TCP listeners are bound directly by the lifecycle code; this module
//! holds what the TLS listener needs.

pub mod tls;
