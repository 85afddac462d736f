//! FFI type definitions

use crate::error::PoolError;

/// Error codes for C API
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostpoolErrorCode {
    Success = 0,
    InvalidParameter = 1,
    OutOfMemory = 2,
    SizeOverflow = 3,
    ConfigError = 4,
}

impl From<PoolError> for HostpoolErrorCode {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::OutOfMemory { .. } => HostpoolErrorCode::OutOfMemory,
            PoolError::SizeOverflow { .. } => HostpoolErrorCode::SizeOverflow,
            PoolError::InvalidParameter { .. } => HostpoolErrorCode::InvalidParameter,
            PoolError::Config { .. } => HostpoolErrorCode::ConfigError,
        }
    }
}
