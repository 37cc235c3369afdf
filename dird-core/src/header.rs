//! The packed structs represent the on-disk format of DIRD

use bytemuck::{Pod, PodCastError, Zeroable};

use crate::{Entry, Error, ENTRY_SIZE, HEADER_SIZE, MAGIC, NAME_MAX};

#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(packed, C)]
pub struct Header {
    /// Always [`MAGIC`], little-endian
    pub magic: u32,
    /// Count of Entry structs, which starts immediately after header struct
    pub count: u32,
}

impl Header {
    /// Create a header for an archive holding `count` entries
    pub fn with_count(count: u32) -> Header {
        Header {
            magic: MAGIC.to_le(),
            count: count.to_le(),
        }
    }

    /// Parse header from raw archive data and check the magic
    pub fn new(data: &[u8]) -> Result<&Header, Error> {
        let header = Header::new_unchecked(data)?;
        if header.magic() != MAGIC {
            return Err(Error::InvalidMagic(header.magic()));
        }
        Ok(header)
    }

    /// Parse header from raw archive data without looking at the magic
    pub fn new_unchecked(data: &[u8]) -> Result<&Header, Error> {
        let data = data
            .get(..HEADER_SIZE)
            .ok_or(Error::Cast(PodCastError::SizeMismatch))?;
        Ok(bytemuck::try_from_bytes(data)?)
    }

    pub fn magic(&self) -> u32 {
        u32::from_le(self.magic)
    }

    pub fn count(&self) -> u32 {
        u32::from_le(self.count)
    }

    /// Retrieve the size of the entries
    pub fn entries_size(&self) -> Result<usize, Error> {
        (self.count() as usize)
            .checked_mul(ENTRY_SIZE)
            .ok_or(Error::Overflow)
    }

    /// Retrieve the size of the Header and its entries. This is also the
    /// offset of the first byte of the data blob.
    pub fn total_size(&self) -> Result<usize, Error> {
        self.entries_size()?
            .checked_add(HEADER_SIZE)
            .ok_or(Error::Overflow)
    }

    /// Parse entries from the data following the header. Anything after the
    /// last entry is ignored.
    pub fn entries<'a>(&self, data: &'a [u8]) -> Result<&'a [Entry], Error> {
        let entries_size = self.entries_size()?;
        let entries_data = data
            .get(..entries_size)
            .ok_or(Error::Cast(PodCastError::SizeMismatch))?;
        Ok(bytemuck::try_cast_slice(entries_data)?)
    }

    /// Retrieve the header and entries of a complete archive.
    ///
    /// Every entry must have its data between the end of the directory and
    /// the end of `archive`, and a NUL-terminated name. Ranges are not
    /// checked against each other.
    pub fn parse(archive: &[u8]) -> Result<(&Header, &[Entry]), Error> {
        let header = Header::new(archive)?;
        let entries = header.entries(&archive[HEADER_SIZE..])?;
        let data_offset = header.total_size()?;

        for (index, entry) in entries.iter().enumerate() {
            if (entry.offset() as usize) < data_offset {
                return Err(Error::OffsetInDirectory {
                    index,
                    offset: entry.offset(),
                    data_offset,
                });
            }
            if entry.end()? > archive.len() {
                return Err(Error::OutOfBounds {
                    offset: entry.offset(),
                    length: entry.length(),
                    available: archive.len(),
                });
            }
            if entry.name[NAME_MAX] != 0 {
                return Err(Error::NameNotTerminated { index });
            }
        }
        Ok((header, entries))
    }
}
