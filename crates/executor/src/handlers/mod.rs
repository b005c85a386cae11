//! Command handlers
//!
//! One function per command, grouped by concern. Each takes the pieces of
//! module state it needs plus the command payload and returns an [`Output`].
//!
//! [`Output`]: crate::Output

pub mod batch;
pub mod iterator;
pub mod kv;
