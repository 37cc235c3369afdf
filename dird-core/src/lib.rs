//! On-disk representation of DIRD archives.
//!
//! This crate is `no_std` so that a kernel or boot loader can share the exact
//! struct definitions used by the `mkinitrd` builder.
#![no_std]
extern crate alloc;

use core::mem;

pub use crate::entry::{pack_name, Entry};
pub use crate::error::Error;
pub use crate::header::Header;

mod entry;
mod error;
mod header;

#[cfg(test)]
mod test;

/// Format identifier, the ASCII "DIRD" as a u32. Stored little-endian like
/// every other field, so the first four bytes on disk are `44 52 49 44`.
pub const MAGIC: u32 = 0x4449_5244;

/// Width of the name field of an [`Entry`], including the terminating NUL
pub const NAME_SIZE: usize = 32;

/// Longest name that fits in an [`Entry`]
pub const NAME_MAX: usize = NAME_SIZE - 1;

pub const HEADER_SIZE: usize = mem::size_of::<Header>();
pub const ENTRY_SIZE: usize = mem::size_of::<Entry>();

#[cfg(test)]
mod tests {
    use core::mem;

    use crate::{Entry, Header, ENTRY_SIZE, HEADER_SIZE, MAGIC};

    #[test]
    fn header_size() {
        assert_eq!(mem::size_of::<Header>(), 8);
        assert_eq!(HEADER_SIZE, 8);
    }

    #[test]
    fn entry_size() {
        assert_eq!(mem::size_of::<Entry>(), 40);
        assert_eq!(ENTRY_SIZE, 40);
    }

    #[test]
    fn magic_spells_dird() {
        assert_eq!(&MAGIC.to_le_bytes(), b"DRID");
        assert_eq!(&MAGIC.to_be_bytes(), b"DIRD");
    }
}
