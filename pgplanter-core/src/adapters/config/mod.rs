//! Configuration types for the catalog connection.
//!
//! `ConnectionConfig` intentionally does NOT store passwords or credentials.

mod connection;

pub use connection::ConnectionConfig;
