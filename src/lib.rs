//! Guichet - session and authorization gate for the operations console.
//!
//! Exposes core modules for use by the binary and integration tests.

pub mod bootstrap;
pub mod config;
pub mod dispatch;
pub mod gate;
pub mod middleware;
pub mod server;
pub mod session;
