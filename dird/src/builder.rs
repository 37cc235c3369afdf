use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::{pack_name, Entry, Header, NAME_MAX, NAME_SIZE};
use crate::{wrap_io_err, Error};

/// What to do with names that do not survive packing into the name field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NamePolicy {
    /// Drop non-ASCII bytes and truncate, emitting a warning. Names that end
    /// up identical are kept as separate entries.
    #[default]
    Truncate,
    /// Fail the build on any name that is not stored verbatim, or that
    /// collides with another name.
    Strict,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BuildOptions {
    pub names: NamePolicy,
}

#[derive(Debug)]
struct BuilderEntry {
    /// Name stored in the archive, before packing
    name: OsString,
    kind: BuilderEntryKind,
}

enum BuilderEntryKind {
    /// Path to regular file during build
    File(PathBuf),

    Bytes(Vec<u8>),
}

impl fmt::Debug for BuilderEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use BuilderEntryKind::*;
        match self {
            File(p) => write!(f, "BuilderEntryKind::File({:?})", p),
            Bytes(b) => write!(f, "BuilderEntryKind::Bytes(<{} bytes>)", b.len()),
        }
    }
}

impl BuilderEntry {
    fn name_bytes(&self) -> &[u8] {
        self.name.as_encoded_bytes()
    }

    fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }

    /// Append this entry's data to `blob`, returning the number of bytes added
    fn read_into(&self, blob: &mut Vec<u8>) -> Result<usize, Error> {
        match &self.kind {
            BuilderEntryKind::File(path) => {
                let mut file = File::open(path).map_err(wrap_io_err!(path, "Open file"))?;
                // Refuse before reading anything a 32-bit length cannot describe
                let len = file
                    .metadata()
                    .map_err(wrap_io_err!(path, "Read file metadata"))?
                    .len();
                if len > u64::from(u32::MAX) {
                    return Err(Error::TooLarge {
                        what: "File size",
                        size: len,
                    });
                }
                file.read_to_end(blob)
                    .map_err(wrap_io_err!(path, "Read file"))
            }
            BuilderEntryKind::Bytes(data) => {
                blob.extend_from_slice(data);
                Ok(data.len())
            }
        }
    }
}

/// Builder pattern for constructing DIRD archives. Holds a list of entries
/// and consumes itself to construct an archive.
///
/// Entries are always written sorted by name, whatever order they were added
/// in, so the same inputs produce the same archive byte for byte.
///
/// # Example
/// ```
/// use dird::{ArchiveBuilder, BuildOptions};
/// use dird::core::Header;
///
/// let mut builder = ArchiveBuilder::new(BuildOptions::default());
/// builder
///     .file_bytes(&b"#!/bin/sh\n"[..], "init")
///     .file_bytes(&b"root::0:0::/:/bin/sh\n"[..], "passwd");
/// let archive = builder.into_bytes().unwrap();
///
/// let (header, entries) = Header::parse(&archive).unwrap();
/// assert_eq!(header.count(), 2);
/// assert_eq!(entries[0].name_bytes(), b"init");
/// assert_eq!(entries[0].data(&archive).unwrap(), b"#!/bin/sh\n");
/// ```
pub struct ArchiveBuilder {
    options: BuildOptions,

    entries: Vec<BuilderEntry>,
}

impl ArchiveBuilder {
    pub fn new(options: BuildOptions) -> ArchiveBuilder {
        ArchiveBuilder {
            options,
            entries: Vec::new(),
        }
    }

    /// Add a regular file to this builder. `source` is the position of the
    /// file on the build system, `name` the name stored in the archive.
    pub fn file(
        &mut self,
        source: impl AsRef<Path>,
        name: impl AsRef<OsStr>,
    ) -> &mut ArchiveBuilder {
        self.entries.push(BuilderEntry {
            name: name.as_ref().to_os_string(),
            kind: BuilderEntryKind::File(source.as_ref().to_path_buf()),
        });
        self
    }

    /// Add a file whose contents are already in memory
    pub fn file_bytes(
        &mut self,
        data: impl Into<Vec<u8>>,
        name: impl AsRef<OsStr>,
    ) -> &mut ArchiveBuilder {
        self.entries.push(BuilderEntry {
            name: name.as_ref().to_os_string(),
            kind: BuilderEntryKind::Bytes(data.into()),
        });
        self
    }

    /// Add every regular file directly inside `dir`, named by its file name.
    ///
    /// Subdirectories, symlinks and special files are skipped; the archive
    /// has no notion of them.
    pub fn dir(&mut self, dir: impl AsRef<Path>) -> Result<&mut ArchiveBuilder, Error> {
        let dir = dir.as_ref();
        let read_dir = fs::read_dir(dir).map_err(wrap_io_err!(dir, "Read directory"))?;

        for entry_res in read_dir {
            let entry = entry_res.map_err(wrap_io_err!(dir, "Read directory entry"))?;
            let path = entry.path();
            // Does not follow symlinks
            let file_type = entry
                .file_type()
                .map_err(wrap_io_err!(path, "Read file type"))?;

            if file_type.is_file() {
                self.file(path, entry.file_name());
            } else {
                debug!(path = %path.display(), ?file_type, "skipping non-regular file");
            }
        }
        Ok(self)
    }

    /// Check every name against the name policy, in the final entry order
    fn check_names(&self) -> Result<(), Error> {
        let mut packed_names: BTreeMap<[u8; NAME_SIZE], &BuilderEntry> = BTreeMap::new();

        for entry in self.entries.iter() {
            let raw = entry.name_bytes();
            let packed = pack_name(raw);
            let stored = &packed[..packed.iter().position(|&b| b == 0).unwrap_or(NAME_MAX)];

            if stored != raw {
                match self.options.names {
                    NamePolicy::Strict if raw.contains(&0) => {
                        return Err(Error::NameContainsNul {
                            name: entry.display_name(),
                        });
                    }
                    NamePolicy::Strict if !raw.is_ascii() => {
                        return Err(Error::NameNotAscii {
                            name: entry.display_name(),
                        });
                    }
                    NamePolicy::Strict => {
                        return Err(Error::NameTooLong {
                            name: entry.display_name(),
                            max: NAME_MAX,
                        });
                    }
                    NamePolicy::Truncate => {
                        warn!(
                            name = %entry.display_name(),
                            stored = %String::from_utf8_lossy(stored),
                            "name does not fit, storing it truncated"
                        );
                    }
                }
            }

            if let Some(first) = packed_names.insert(packed, entry) {
                let name = String::from_utf8_lossy(stored).into_owned();
                match self.options.names {
                    NamePolicy::Strict => {
                        return Err(Error::NameCollision {
                            name,
                            first: first.display_name(),
                            second: entry.display_name(),
                        });
                    }
                    NamePolicy::Truncate => {
                        warn!(
                            %name,
                            first = %first.display_name(),
                            second = %entry.display_name(),
                            "names collide in the archive"
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Consume this `ArchiveBuilder`, reading every entry and returning the
    /// complete archive.
    pub fn into_bytes(mut self) -> Result<Vec<u8>, Error> {
        // Byte-wise order of the names keeps the build deterministic
        self.entries
            .sort_by(|a, b| a.name_bytes().cmp(b.name_bytes()));
        self.check_names()?;

        let count = u32::try_from(self.entries.len()).map_err(|_| Error::TooLarge {
            what: "Entry count",
            size: self.entries.len() as u64,
        })?;
        let header = Header::with_count(count);
        let data_offset = header.total_size()?;
        let mut offset = u32::try_from(data_offset).map_err(|_| Error::TooLarge {
            what: "Directory size",
            size: data_offset as u64,
        })?;

        let mut entries = Vec::with_capacity(self.entries.len());
        let mut blob = Vec::new();
        for builder_entry in self.entries.iter() {
            let size = builder_entry.read_into(&mut blob)?;
            let length = u32::try_from(size).map_err(|_| Error::TooLarge {
                what: "File size",
                size: size as u64,
            })?;

            let entry = Entry::new(builder_entry.name_bytes(), offset, length);
            debug!(%entry, "packed");
            entries.push(entry);

            offset = offset.checked_add(length).ok_or(Error::TooLarge {
                what: "Archive size",
                size: u64::from(offset) + u64::from(length),
            })?;
        }

        let mut archive = Vec::with_capacity(data_offset + blob.len());
        archive.extend_from_slice(bytemuck::bytes_of(&header));
        archive.extend_from_slice(bytemuck::cast_slice(&entries[..]));
        archive.extend_from_slice(&blob);
        Ok(archive)
    }

    /// Consume this `ArchiveBuilder`, writing the archive to `w`. Returns the
    /// number of bytes written.
    pub fn write_archive<W: Write>(self, w: &mut W) -> Result<u64, Error> {
        let archive = self.into_bytes()?;
        w.write_all(&archive)
            .map_err(wrap_io_err!("Write archive"))?;
        Ok(archive.len() as u64)
    }
}

impl fmt::Debug for ArchiveBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ArchiveBuilder")
            .field("options", &self.options)
            .field("entries", &self.entries)
            .finish()
    }
}
