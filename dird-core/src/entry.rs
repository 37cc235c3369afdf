//! The packed structs represent the on-disk format of DIRD
use core::fmt::Display;

use bytemuck::{Pod, Zeroable};

use crate::{Error, NAME_MAX, NAME_SIZE};

#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(packed, C)]
pub struct Entry {
    /// NUL-terminated file name, at most [`NAME_MAX`] significant bytes
    pub name: [u8; NAME_SIZE],
    /// Offset of file data from the start of the archive, little-endian
    pub offset: u32,
    /// Size in bytes of the file data, little-endian
    pub length: u32,
}

impl Display for Entry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "name={:?} offset={} length={}",
            alloc::string::String::from_utf8_lossy(self.name_bytes()),
            self.offset(),
            self.length(),
        )
    }
}

impl Entry {
    /// Create an entry, packing `name` with [`pack_name`]
    pub fn new(name: &[u8], offset: u32, length: u32) -> Entry {
        Entry {
            name: pack_name(name),
            offset: offset.to_le(),
            length: length.to_le(),
        }
    }

    pub fn offset(&self) -> u32 {
        u32::from_le(self.offset)
    }

    pub fn length(&self) -> u32 {
        u32::from_le(self.length)
    }

    /// One past the last byte of this entry's data
    pub fn end(&self) -> Result<usize, Error> {
        (self.offset() as usize)
            .checked_add(self.length() as usize)
            .ok_or(Error::Overflow)
    }

    /// Retrieve the name, ending at the first NUL
    pub fn name_bytes(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.name.len());
        &self.name[..end]
    }

    /// Retrieve this entry's data from a complete archive. Bytes past the
    /// entry's range are never touched.
    pub fn data<'a>(&self, archive: &'a [u8]) -> Result<&'a [u8], Error> {
        archive
            .get(self.offset() as usize..self.end()?)
            .ok_or(Error::OutOfBounds {
                offset: self.offset(),
                length: self.length(),
                available: archive.len(),
            })
    }
}

/// Map an arbitrary file name into the fixed-width name field.
///
/// Non-ASCII bytes are dropped, the rest is truncated to [`NAME_MAX`] bytes
/// and zero padded. Distinct names that share their first [`NAME_MAX`] ASCII
/// bytes pack to the same field.
pub fn pack_name(name: &[u8]) -> [u8; NAME_SIZE] {
    let mut packed = [0; NAME_SIZE];
    for (dst, &src) in packed[..NAME_MAX]
        .iter_mut()
        .zip(name.iter().filter(|b| b.is_ascii()))
    {
        *dst = src;
    }
    packed
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::{pack_name, Entry, Error, NAME_MAX, NAME_SIZE};

    #[test]
    fn short_name_is_padded() {
        let packed = pack_name(b"a.txt");
        assert_eq!(&packed[..5], b"a.txt");
        assert!(packed[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn long_name_is_truncated() {
        let name = [b'x'; 40];
        let packed = pack_name(&name);
        assert_eq!(&packed[..NAME_MAX], &name[..NAME_MAX]);
        assert_eq!(packed[NAME_SIZE - 1], 0);
    }

    #[test]
    fn exact_fit_keeps_terminator() {
        let name = [b'y'; NAME_MAX];
        let entry = Entry::new(&name, 0, 0);
        assert_eq!(entry.name_bytes(), &name[..]);
        assert_eq!(entry.name[NAME_MAX], 0);
    }

    #[test]
    fn non_ascii_is_dropped() {
        let entry = Entry::new("caf\u{e9}.txt".as_bytes(), 0, 0);
        assert_eq!(entry.name_bytes(), b"caf.txt");

        let entry = Entry::new("\u{e9}\u{e9}".as_bytes(), 0, 0);
        assert_eq!(entry.name_bytes(), b"");
    }

    #[test]
    fn data_is_bounds_checked() {
        let archive = b"0123456789";
        assert_eq!(Entry::new(b"x", 2, 3).data(archive).unwrap(), b"234");
        assert_eq!(Entry::new(b"x", 10, 0).data(archive).unwrap(), b"");
        assert!(matches!(
            Entry::new(b"x", 8, 3).data(archive),
            Err(Error::OutOfBounds { offset: 8, length: 3, available: 10 })
        ));
    }

    #[test]
    fn display() {
        let entry = Entry::new(b"init", 48, 7);
        assert_eq!(entry.to_string(), "name=\"init\" offset=48 length=7");
    }
}
