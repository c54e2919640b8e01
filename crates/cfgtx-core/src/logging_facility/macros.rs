//! Operation lifecycle macros
//!
//! Extra fields after the required ones are passed straight to `tracing`,
//! so `%`/`?` sigils work as usual.

/// Emit the `start` event of `op`
///
/// ```
/// # use cfgtx_core::log_op_start;
/// log_op_start!("authorize_update");
/// log_op_start!("authorize_update", chain_id = "mychannel", sequence = 4u64);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        ::tracing::info!(
            component = module_path!(),
            op = $op,
            event = ::cfgtx_core_types::schema::EVENT_START,
            $($($field)+)?
        )
    };
}

/// Emit the `end` event of `op`; `duration_ms` is required
///
/// ```
/// # use cfgtx_core::log_op_end;
/// log_op_end!("authorize_update", duration_ms = 3u64, key_count = 12usize);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        ::tracing::info!(
            component = module_path!(),
            op = $op,
            event = ::cfgtx_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)+)?
        )
    };
}

/// Emit the `end_error` event of `op`
///
/// `$err` is anything convertible into `CfgError`. The error is tagged with
/// `op`, and its kind and stable code are attached as `err.kind` / `err.code`.
///
/// ```
/// # use cfgtx_core::{log_op_error, errors::ConfigTxError};
/// let err = ConfigTxError::ImplicitDeletion { key: "[Values] /Channel/B".to_string() };
/// log_op_error!("authorize_update", err, duration_ms = 1u64);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let cfg_err: $crate::errors::CfgError = ::core::convert::Into::into($err);
        let cfg_err = cfg_err.with_op($op);
        ::tracing::error!(
            component = module_path!(),
            op = $op,
            event = ::cfgtx_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?cfg_err.kind(),
            err.code = cfg_err.code(),
            message = %cfg_err,
            $($($field)+)?
        )
    }};
}
