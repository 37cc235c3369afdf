use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] dird_core::Error),
    #[error("{context}{}", display_path(.path))]
    Io {
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
        context: &'static str,
    },
    #[error("{what} of {size} does not fit in a 32-bit archive")]
    TooLarge { what: &'static str, size: u64 },
    #[error("Name '{name}' is longer than {max} bytes")]
    NameTooLong { name: String, max: usize },
    #[error("Name '{name}' contains a NUL byte")]
    NameContainsNul { name: String },
    #[error("Name '{name}' is not ASCII")]
    NameNotAscii { name: String },
    #[error("Names '{first}' and '{second}' are both stored as '{name}'")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path.as_deref().map(Path::display) {
        Some(path) => format!(": {}", path),
        None => String::new(),
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;

        let mut source = self.source();
        while let Some(err) = source {
            writeln!(f, "\tCaused by: {err}")?;
            source = err.source();
        }

        Ok(())
    }
}
