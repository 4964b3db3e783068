#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;

use fleetfile_core::Value;
use fleetfile_storage::{FileReader, FileWriter};

fuzz_target!(|data: &[u8]| {
    // Reopening arbitrary bytes for append must never panic: the writer
    // either classifies the handle as a valid finalized store or refuses
    // it with an error. When it does accept the handle, an append session
    // must leave the file readable.
    let mut cursor = Cursor::new(data.to_vec());

    let finished = match FileWriter::open(&mut cursor) {
        Ok(mut writer) => {
            // The append may fail against a foreign schema; that must be
            // a clean error, never a panic.
            let _ = writer.append(i64::MAX, &[Value::Int(1)]);
            writer.finish().is_ok()
        }
        Err(_) => false,
    };

    if finished {
        if let Ok(mut reader) = FileReader::open(cursor) {
            let _ = reader.keys();
            let _ = reader.read(i64::MAX);
        }
    }
});
