//! Error types for the Galaxy3D visibility core
//!
//! Only construction and registration can fail. Per-frame operations
//! never return errors: degenerate inputs produce empty or trivial results.

use std::fmt;

/// Result type for Galaxy3D visibility operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D visibility errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid static configuration (map size, cell size)
    InvalidConfig(String),

    /// Invalid object registration (radius, piece count)
    InvalidObject(String),

    /// A subsystem could not be set up (grid too large, ...)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InvalidObject(msg) => write!(f, "Invalid object: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an [`Error`] of the given variant and log it at ERROR level
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_visibility::engine_err;
/// let cell_size = -1.0;
/// let err = engine_err!(InvalidConfig, "galaxy3d::DrawGrid", "bad cell size {}", cell_size);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::$variant(message)
    }};
}

/// Log and return an [`Error`] from the enclosing function
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_visibility::engine_bail;
/// fn check(size: f32) -> galaxy_3d_visibility::galaxy3d::Result<()> {
///     if size <= 0.0 {
///         engine_bail!(InvalidConfig, "galaxy3d::DrawGrid", "bad size {}", size);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($variant:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($variant, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
