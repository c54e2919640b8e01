//! Structured logging
//!
//! Every public operation emits a `start` event and then exactly one of
//! `end` / `end_error`, all tagged with `op` and the fields named in
//! `cfgtx_core_types::schema`. Install a subscriber once at startup:
//!
//! ```
//! use cfgtx_core::logging_facility::{init, Profile};
//!
//! init(Profile::Production);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
