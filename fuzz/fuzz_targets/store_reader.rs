#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;

use fleetfile_storage::FileReader;

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes to the store reader.
    // The reader should handle all malformed inputs gracefully:
    // - Invalid magic bytes and versions
    // - Truncated headers and blocks
    // - Length prefixes pointing past the end of the file
    // - Index offsets overlapping the header or past EOF
    // - Corrupted schema, record, and index payloads
    // - Header key counts disagreeing with the index
    let cursor = Cursor::new(data.to_vec());

    if let Ok(mut reader) = FileReader::open(cursor) {
        let _ = reader.key_count();
        let _ = reader.header();
        let _ = reader.schema();

        // If the index loads, every key it names must be readable
        // without panicking (errors are fine).
        if let Ok(keys) = reader.keys() {
            for key in keys.into_iter().take(64) {
                let _ = reader.read(key);
            }
        }
        let _ = reader.read(0);
        let _ = reader.read_many(["no-such-key"]);
    }
});
