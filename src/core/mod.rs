// Core data types and error definitions

pub mod error;
pub mod types;

pub use error::{PlayerError, Result};
pub use types::{AudioFormat, StopReason};
