use alloc::format;
use alloc::string::ToString;
use bytemuck::PodCastError;
use core::error;
use core::fmt::{Display, Formatter, Result};

#[derive(Debug)]
pub enum Error {
    Cast(PodCastError),
    InvalidMagic(u32),
    OutOfBounds {
        offset: u32,
        length: u32,
        available: usize,
    },
    OffsetInDirectory {
        index: usize,
        offset: u32,
        data_offset: usize,
    },
    NameNotTerminated {
        index: usize,
    },
    Overflow,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> Result {
        use Error::*;

        let msg = match self {
            Cast(err) => format!("Bytemuck: {}", err),
            InvalidMagic(magic) => format!("Invalid Magic: {:#010x}", magic),
            OutOfBounds {
                offset,
                length,
                available,
            } => format!(
                "Entry data out of bounds: {}+{} exceeds {} bytes",
                offset, length, available
            ),
            OffsetInDirectory {
                index,
                offset,
                data_offset,
            } => format!(
                "Entry {} data at {} overlaps the directory ending at {}",
                index, offset, data_offset
            ),
            NameNotTerminated { index } => format!("Entry {} name is not NUL-terminated", index),
            Overflow => "Overflow".to_string(),
        };
        write!(f, "{}", msg)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Cast(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PodCastError> for Error {
    fn from(err: PodCastError) -> Error {
        Error::Cast(err)
    }
}
