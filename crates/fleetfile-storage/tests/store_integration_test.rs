//! Store Integration Tests
//!
//! End-to-end tests against real files on disk: full write/finalize/read
//! cycles, append sessions on existing stores, and damage detection.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use fleetfile_core::{Error, Key, Value};
use fleetfile_storage::{FileReader, FileWriter, OpenMode};

/// Helper to open a handle suitable for writing (fresh or existing)
fn rw_handle(path: &Path) -> File {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(path)
        .unwrap()
}

/// Helper for a store path inside the test's temp dir
fn store_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

fn int_list(values: &[i64]) -> Vec<Value> {
    vec![Value::IntList(values.to_vec())]
}

// ---------------------------------------------------------------
// Basic write / finalize / read cycle
// ---------------------------------------------------------------

#[test]
fn roundtrip_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "basic.flt");

    let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
    assert_eq!(writer.mode(), OpenMode::Created);
    writer.append(100, &int_list(&[1, 2, 3])).unwrap();
    writer.finish().unwrap();
    drop(writer);

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    assert_eq!(reader.key_count(), 1);
    assert_eq!(reader.read(100).unwrap(), int_list(&[1, 2, 3]));
}

#[test]
fn two_readers_sequentially_on_same_file() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "twice.flt");

    let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
    writer.append(1, &int_list(&[11])).unwrap();
    writer.append(2, &int_list(&[22])).unwrap();
    writer.finish().unwrap();
    drop(writer);

    for _ in 0..2 {
        let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
        assert_eq!(reader.read(1).unwrap(), int_list(&[11]));
        assert_eq!(reader.read(2).unwrap(), int_list(&[22]));
    }
}

#[test]
fn drop_without_finish_still_finalizes() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "dropped.flt");

    {
        let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
        writer.append(5, &int_list(&[5, 5])).unwrap();
    }

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    assert_eq!(reader.read(5).unwrap(), int_list(&[5, 5]));
}

// ---------------------------------------------------------------
// Mixed key and value types
// ---------------------------------------------------------------

#[test]
fn mixed_key_types_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "mixed.flt");

    let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
    writer.append(100, &int_list(&[1])).unwrap();
    writer.append(101, &int_list(&[2])).unwrap();
    writer.append("alpha", &int_list(&[3])).unwrap();
    writer.finish().unwrap();
    drop(writer);

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    let keys: Vec<Key> = reader.keys().unwrap().into_iter().collect();
    assert_eq!(
        keys,
        vec![
            Key::Int(100),
            Key::Int(101),
            Key::Str("alpha".to_string()),
        ]
    );

    // Batch read across key types, results in request order.
    let records = reader
        .read_many([Key::from(100), Key::from(101), Key::from("alpha")])
        .unwrap();
    assert_eq!(records, vec![int_list(&[1]), int_list(&[2]), int_list(&[3])]);
}

#[test]
fn multi_field_records_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "wide.flt");

    let record = vec![
        Value::Int(42),
        Value::Float(0.125),
        Value::from("device-7"),
        Value::Bytes(vec![0xDE, 0xAD, 0xBE, 0xEF]),
        Value::IntList(vec![-1, 0, 1]),
        Value::FloatList(vec![0.5; 64]),
        Value::StrList(vec!["a".to_string(), "b".to_string()]),
    ];

    let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
    writer.append("wide", &record).unwrap();
    writer.finish().unwrap();
    drop(writer);

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    assert_eq!(reader.schema().unwrap().len(), 7);
    assert_eq!(reader.read("wide").unwrap(), record);
}

#[test]
fn large_record_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "large.flt");

    // ~4MB payload, far larger than any internal buffer.
    let blob: Vec<u8> = (0..4 * 1024 * 1024).map(|i| (i % 251) as u8).collect();

    let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
    writer.append(1, &[Value::Bytes(blob.clone())]).unwrap();
    writer.append(2, &[Value::Bytes(vec![7; 16])]).unwrap();
    writer.finish().unwrap();
    drop(writer);

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    assert_eq!(reader.read(1).unwrap(), vec![Value::Bytes(blob)]);
    assert_eq!(reader.read(2).unwrap(), vec![Value::Bytes(vec![7; 16])]);
}

// ---------------------------------------------------------------
// Append sessions on existing stores
// ---------------------------------------------------------------

#[test]
fn append_to_existing_store_preserves_prior_records() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "sessions.flt");

    {
        let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
        writer.append(100, &int_list(&[0])).unwrap();
        writer.append(101, &int_list(&[1])).unwrap();
        writer.finish().unwrap();
    }

    {
        let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
        assert_eq!(writer.mode(), OpenMode::Reopened);
        assert_eq!(writer.key_count(), 2);
        writer.append(103, &int_list(&[3])).unwrap();
        writer.finish().unwrap();
    }

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    let keys: Vec<Key> = reader.keys().unwrap().into_iter().collect();
    assert_eq!(keys, vec![Key::Int(100), Key::Int(101), Key::Int(103)]);
    // Records from the first session are still readable.
    assert_eq!(reader.read(100).unwrap(), int_list(&[0]));
    assert_eq!(reader.read(101).unwrap(), int_list(&[1]));
    assert_eq!(reader.read(103).unwrap(), int_list(&[3]));
}

#[test]
fn three_append_sessions() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "threes.flt");

    for session in 0..3i64 {
        let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
        for k in 0..10i64 {
            let key = session * 10 + k;
            writer.append(key, &int_list(&[key])).unwrap();
        }
        writer.finish().unwrap();
    }

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    assert_eq!(reader.key_count(), 30);
    for key in 0..30i64 {
        assert_eq!(reader.read(key).unwrap(), int_list(&[key]));
    }
}

#[test]
fn reopened_session_overwrites_duplicate_key() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "overwrite.flt");

    {
        let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
        writer.append(9, &int_list(&[1])).unwrap();
        writer.finish().unwrap();
    }
    {
        let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
        writer.append(9, &int_list(&[2])).unwrap();
        writer.finish().unwrap();
    }

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    assert_eq!(reader.key_count(), 1);
    assert_eq!(reader.read(9).unwrap(), int_list(&[2]));
}

#[test]
fn empty_store_then_append_session() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "empty_first.flt");

    // Session one never appends; the file is a finalized empty store.
    {
        let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
        writer.finish().unwrap();
    }
    {
        let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
        assert!(reader.keys().unwrap().is_empty());
        assert!(reader.schema().is_none());
    }

    // Session two gives it a schema and a record.
    {
        let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
        writer.append("first", &int_list(&[1])).unwrap();
        writer.finish().unwrap();
    }

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    assert_eq!(reader.read("first").unwrap(), int_list(&[1]));
}

#[test]
fn schema_survives_reopen_and_still_binds() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "schema_binds.flt");

    {
        let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
        writer.append(1, &int_list(&[1])).unwrap();
        writer.finish().unwrap();
    }

    let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
    // The reopened writer knows the schema without any append.
    assert_eq!(writer.schema().unwrap().fields()[0].name, "_0");
    // And keeps enforcing it.
    assert!(matches!(
        writer.append(2, &[Value::Float(2.0)]),
        Err(Error::Codec(_))
    ));
    writer.append(2, &int_list(&[2])).unwrap();
    writer.finish().unwrap();
}

// ---------------------------------------------------------------
// Batch reads at scale
// ---------------------------------------------------------------

#[test]
fn thousand_keys_read_back_in_order() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "thousand.flt");

    let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
    for key in 0..1000i64 {
        writer.append(key, &int_list(&[key])).unwrap();
    }
    writer.finish().unwrap();
    drop(writer);

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    let keys = reader.keys().unwrap();
    assert_eq!(keys.len(), 1000);

    let records = reader.read_many(keys.iter().cloned()).unwrap();
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record, &int_list(&[i as i64]));
    }
}

#[test]
fn batch_of_512_preserves_request_order() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "batch512.flt");

    let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
    for key in 0..2000i64 {
        writer.append(key, &int_list(&[key * 3])).unwrap();
    }
    writer.finish().unwrap();
    drop(writer);

    // Request even keys descending; results must mirror that order.
    let wanted: Vec<i64> = (0..1024i64).rev().filter(|k| k % 2 == 0).collect();
    assert_eq!(wanted.len(), 512);

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    let records = reader.read_many(wanted.iter().copied()).unwrap();
    assert_eq!(records.len(), 512);
    for (key, record) in wanted.iter().zip(&records) {
        assert_eq!(record, &int_list(&[key * 3]));
    }
}

// ---------------------------------------------------------------
// Damage detection
// ---------------------------------------------------------------

#[test]
fn truncated_file_is_detected() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "truncated.flt");

    let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
    for key in 0..50i64 {
        writer.append(key, &int_list(&[key])).unwrap();
    }
    writer.finish().unwrap();
    drop(writer);

    // Chop off most of the index block.
    let len = std::fs::metadata(&path).unwrap().len();
    let file = rw_handle(&path);
    file.set_len(len - 40).unwrap();
    drop(file);

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    assert!(matches!(reader.keys(), Err(Error::InvalidStore(_))));
}

#[test]
fn corrupt_index_offset_is_detected() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "badoffset.flt");

    {
        let mut writer = FileWriter::open(rw_handle(&path)).unwrap();
        writer.append(1, &int_list(&[1])).unwrap();
        writer.finish().unwrap();
    }

    // Point the index offset far past the end of the file.
    let mut data = std::fs::read(&path).unwrap();
    let bogus = (data.len() as u64 + 4096).to_le_bytes();
    data[16..24].copy_from_slice(&bogus);
    std::fs::write(&path, &data).unwrap();

    let mut reader = FileReader::open(File::open(&path).unwrap()).unwrap();
    assert!(matches!(reader.keys(), Err(Error::InvalidStore(_))));
}

#[test]
fn appending_to_damaged_store_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "damaged.flt");

    // Not a store at all.
    std::fs::write(&path, b"some other file format entirely").unwrap();
    assert!(matches!(
        FileWriter::open(rw_handle(&path)),
        Err(Error::FormatMismatch)
    ));

    // The refusal must leave the file byte-for-byte intact.
    let data = std::fs::read(&path).unwrap();
    assert_eq!(data, b"some other file format entirely");
}
