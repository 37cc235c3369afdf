//! Format-print a DIRD archive; Useful for debugging
// Reads the raw bytes by fixed field widths without going through
// dird-core, so it still works on archives the parser rejects.
use std::convert::TryInto;
use std::fmt;

use crate::core::{ENTRY_SIZE, HEADER_SIZE};

const HEAD_FIELDS: [(&str, usize); 2] = [("Magic", 4), ("Count", 4)];
const ENTRY_FIELDS: [(&str, usize); 3] = [("Name", 32), ("Offset", 4), ("Length", 4)];

fn fmt_grp(f: &mut fmt::Formatter, label: &str, group: &[u8]) -> fmt::Result {
    writeln!(f, "{:>16}: {:02x?}", label, group)
}

fn fmt_u32(f: &mut fmt::Formatter, label: &str, group: &[u8]) -> fmt::Result {
    match group.try_into() {
        Ok(grp_array) => writeln!(
            f,
            "{:>16}: {} ({:02x?})",
            label,
            u32::from_le_bytes(grp_array),
            group
        ),
        Err(_) => fmt_grp(f, label, group),
    }
}

/// Separate header and entry bytes and lay the groups out in a
/// semi-readable format. Fields that run past the end of `archive` are
/// shown truncated.
///
/// Entry count is required as in debugging situations it's unclear if the
/// header's count field is correct.
pub struct ArchiveDump<'a> {
    pub archive: &'a [u8],
    pub entry_count: usize,
}

impl ArchiveDump<'_> {
    fn field(&self, base: usize, len: usize) -> &[u8] {
        let start = base.min(self.archive.len());
        let end = base.saturating_add(len).min(self.archive.len());
        &self.archive[start..end]
    }
}

impl fmt::Display for ArchiveDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Header")?;
        let mut base = 0;
        for (label, len) in HEAD_FIELDS {
            fmt_u32(f, label, self.field(base, len))?;
            base += len;
        }

        for e_indx in 0..self.entry_count {
            writeln!(f, "Entry[{}]", e_indx)?;
            let mut base = HEADER_SIZE + ENTRY_SIZE * e_indx;
            for (label, len) in ENTRY_FIELDS {
                if len == 4 {
                    fmt_u32(f, label, self.field(base, len))?;
                } else {
                    fmt_grp(f, label, self.field(base, len))?;
                }
                base += len;
            }
        }

        let data_offset = HEADER_SIZE + ENTRY_SIZE * self.entry_count;
        writeln!(f, "Data\n{:02x?}", self.field(data_offset, self.archive.len()))
    }
}

/// Render [`ArchiveDump`] to a string
pub fn format_archive(archive: &[u8], entry_count: usize) -> String {
    ArchiveDump {
        archive,
        entry_count,
    }
    .to_string()
}

/// Write [`ArchiveDump`] to stderr
pub fn format_print_archive(archive: &[u8], entry_count: usize) {
    eprint!(
        "{}",
        ArchiveDump {
            archive,
            entry_count,
        }
    );
}
