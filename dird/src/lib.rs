mod bin;
pub mod binprint;
mod builder;
mod error;
mod output;

pub use bin::*;
pub use builder::*;
pub use error::Error;
pub use output::write_atomic;

pub use dird_core as core;

/// Wrap an [`std::io::Error`] into an [`Error::Io`] with context, for use
/// with `map_err`.
#[macro_export]
macro_rules! wrap_io_err {
    ($path:expr, $context:expr) => {
        |source| $crate::Error::Io {
            source,
            path: Some(::std::path::Path::to_path_buf(::std::convert::AsRef::as_ref(&$path))),
            context: $context,
        }
    };
    ($context:expr) => {
        |source| $crate::Error::Io {
            source,
            path: None,
            context: $context,
        }
    };
}
