//! Call dispatch and atomicity: every call is applied against a snapshot of
//! the store and either commits whole or is discarded whole.

pub mod context;
pub mod error;

pub use context::{MethodCall, Runtime, RuntimeConfig};
pub use error::RuntimeError;
