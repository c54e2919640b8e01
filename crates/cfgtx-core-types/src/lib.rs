//! Core types shared across cfgtx facilities
//!
//! This crate provides foundational types used by the error, logging and
//! engine layers:
//!
//! - **Identity types**: ChainId naming one configuration instance
//! - **Correlation types**: RequestId tying one authorization attempt together
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod identity;
pub mod schema;

pub use correlation::RequestId;
pub use identity::ChainId;
