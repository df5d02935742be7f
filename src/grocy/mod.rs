//! Grocy integration
//!
//! This module provides the chore side of the sync:
//! - The gateway contract the sync engine talks to
//! - An HTTP client for the Grocy REST API

pub mod client;
pub mod gateway;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use client::GrocyClient;
pub use gateway::{ChoreGateway, ChoreId, ChoreRecord, RemoteError};
