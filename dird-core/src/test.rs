use alloc::vec::Vec;

use crate::{Entry, Error, Header, ENTRY_SIZE, HEADER_SIZE, NAME_SIZE};

pub const ARCHIVE_ENTRY1: &[u8] = b"hi";
pub const ARCHIVE_ENTRY1_NAME: &[u8] = b"a.txt";

pub const ARCHIVE_ENTRY2: &[u8] = &[0x00, 0x01];
pub const ARCHIVE_ENTRY2_NAME: &[u8] = b"b.bin";

// Lays the two entries out by hand, independently of any builder
pub fn archive() -> Vec<u8> {
    let data_offset = (HEADER_SIZE + ENTRY_SIZE * 2) as u32;
    let header = Header::with_count(2);

    let entries = [
        Entry::new(ARCHIVE_ENTRY1_NAME, data_offset, ARCHIVE_ENTRY1.len() as u32),
        Entry::new(
            ARCHIVE_ENTRY2_NAME,
            data_offset + ARCHIVE_ENTRY1.len() as u32,
            ARCHIVE_ENTRY2.len() as u32,
        ),
    ];

    let mut archive = Vec::new();
    archive.extend_from_slice(bytemuck::bytes_of(&header));
    archive.extend_from_slice(bytemuck::cast_slice(&entries[..]));
    archive.extend_from_slice(ARCHIVE_ENTRY1);
    archive.extend_from_slice(ARCHIVE_ENTRY2);
    archive
}

#[test]
fn parse_archive() {
    let archive = archive();
    assert_eq!(archive.len(), 92);

    let (header, entries) = Header::parse(&archive).unwrap();
    assert_eq!(header.count(), 2);
    assert_eq!(header.total_size().unwrap(), 88);

    assert_eq!(entries[0].name_bytes(), ARCHIVE_ENTRY1_NAME);
    assert_eq!(entries[0].offset(), 88);
    assert_eq!(entries[0].length(), 2);
    assert_eq!(entries[0].data(&archive).unwrap(), ARCHIVE_ENTRY1);

    assert_eq!(entries[1].name_bytes(), ARCHIVE_ENTRY2_NAME);
    assert_eq!(entries[1].offset(), 90);
    assert_eq!(entries[1].data(&archive).unwrap(), ARCHIVE_ENTRY2);
}

#[test]
fn trailing_garbage_is_ignored() {
    let mut archive = archive();
    archive.extend_from_slice(b"garbage after the blob");

    let (_, entries) = Header::parse(&archive).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].data(&archive).unwrap(), ARCHIVE_ENTRY2);
}

#[test]
fn raw_layout() {
    let archive = archive();
    assert_eq!(&archive[0..4], &[0x44, 0x52, 0x49, 0x44]);
    assert_eq!(&archive[4..8], &[2, 0, 0, 0]);
    assert_eq!(&archive[8..13], ARCHIVE_ENTRY1_NAME);
    assert!(archive[13..40].iter().all(|&b| b == 0));
    assert_eq!(&archive[40..44], &88u32.to_le_bytes());
    assert_eq!(&archive[44..48], &2u32.to_le_bytes());
    assert_eq!(&archive[88..], &[0x68, 0x69, 0x00, 0x01]);
}

// A single entry archive with `entry` as its directory and 8 bytes of data
fn single_entry_archive(entry: Entry) -> Vec<u8> {
    let mut archive = Vec::new();
    archive.extend_from_slice(bytemuck::bytes_of(&Header::with_count(1)));
    archive.extend_from_slice(bytemuck::bytes_of(&entry));
    archive.extend_from_slice(b"12345678");
    archive
}

#[test]
fn rejects_offset_inside_directory() {
    let archive = single_entry_archive(Entry::new(b"init", 0, 8));
    match Header::parse(&archive) {
        Err(Error::OffsetInDirectory {
            index,
            offset,
            data_offset,
        }) => {
            assert_eq!(index, 0);
            assert_eq!(offset, 0);
            assert_eq!(data_offset, HEADER_SIZE + ENTRY_SIZE);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    // One byte short of the blob is still inside the directory
    let archive = single_entry_archive(Entry::new(b"init", 47, 1));
    assert!(matches!(
        Header::parse(&archive),
        Err(Error::OffsetInDirectory { offset: 47, .. })
    ));
}

#[test]
fn rejects_data_past_end() {
    let archive = single_entry_archive(Entry::new(b"init", 48, 9));
    assert!(matches!(
        Header::parse(&archive),
        Err(Error::OutOfBounds {
            offset: 48,
            length: 9,
            available: 56
        })
    ));

    let archive = single_entry_archive(Entry::new(b"init", 48, 8));
    assert!(Header::parse(&archive).is_ok());
}

#[test]
fn rejects_unterminated_name() {
    let mut entry = Entry::new(b"", 48, 8);
    entry.name = [b'A'; NAME_SIZE];
    let archive = single_entry_archive(entry);
    assert!(matches!(
        Header::parse(&archive),
        Err(Error::NameNotTerminated { index: 0 })
    ));
}

#[test]
fn accepts_empty_entry_at_end() {
    let archive = single_entry_archive(Entry::new(b"empty", 56, 0));
    let (_, entries) = Header::parse(&archive).unwrap();
    assert_eq!(entries[0].data(&archive).unwrap(), b"");
}
