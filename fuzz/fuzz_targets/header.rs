#![no_main]
use libfuzzer_sys::fuzz_target;

use dird_core::{HEADER_SIZE, NAME_MAX};

fuzz_target!(|data: &[u8]| {
    if let Ok((header, entries)) = dird_core::Header::parse(data) {
        assert_eq!(entries.len(), header.count() as usize);
        let data_offset = header.total_size().unwrap();
        assert!(data_offset >= HEADER_SIZE);
        for entry in entries {
            assert!(entry.offset() as usize >= data_offset);
            assert!(entry.end().unwrap() <= data.len());
            assert_eq!(entry.name[NAME_MAX], 0);

            let entry_data = entry.data(data).unwrap();
            assert_eq!(entry_data.len(), entry.length() as usize);
        }
    }
});
