//! Waveform store demo
//!
//! Builds a store of synthetic multi-lead waveform records (the shape of
//! an ECG training set: a dozen short leads and a few long ones per key),
//! then reads a shuffled batch back and reports the timing.
//!
//! Run with:
//! ```bash
//! cargo run -p fleetfile-storage --example waveform_store
//! ```

use std::fs::{File, OpenOptions};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use fleetfile_core::{Result, Value};
use fleetfile_storage::{FileReader, FileWriter};

const KEYS: i64 = 500;
const SHORT_LEADS: usize = 12;
const SHORT_SAMPLES: usize = 128;
const LONG_LEADS: usize = 3;
const LONG_SAMPLES: usize = 512;
const BATCH: usize = 128;

fn lead(rng: &mut StdRng, samples: usize) -> Value {
    Value::FloatList((0..samples).map(|_| rng.random::<f64>()).collect())
}

fn waveform_record(rng: &mut StdRng) -> Vec<Value> {
    let mut record = Vec::with_capacity(SHORT_LEADS + LONG_LEADS);
    for _ in 0..SHORT_LEADS {
        record.push(lead(rng, SHORT_SAMPLES));
    }
    for _ in 0..LONG_LEADS {
        record.push(lead(rng, LONG_SAMPLES));
    }
    record
}

fn main() -> Result<()> {
    let path = std::env::temp_dir().join("waveform_demo.flt");
    let mut rng = StdRng::seed_from_u64(1248);

    // Write phase.
    let started = Instant::now();
    let handle = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)?;
    let mut writer = FileWriter::open(handle)?;
    for key in 0..KEYS {
        writer.append(key, &waveform_record(&mut rng))?;
    }
    writer.finish()?;
    drop(writer);
    let wrote = started.elapsed();

    let file_len = std::fs::metadata(&path)?.len();
    println!(
        "wrote {} records ({} fields each) to {} in {:.2?} ({} bytes)",
        KEYS,
        SHORT_LEADS + LONG_LEADS,
        path.display(),
        wrote,
        file_len
    );

    // Batch read phase.
    let mut keys: Vec<i64> = (0..KEYS).collect();
    keys.shuffle(&mut rng);
    let batch: Vec<i64> = keys[..BATCH].to_vec();

    let mut reader = FileReader::open(File::open(&path)?)?;
    let started = Instant::now();
    let records = reader.read_many(batch.iter().copied())?;
    let read = started.elapsed();

    println!(
        "read a shuffled batch of {} records in {:.2?} ({:.1} records/ms)",
        records.len(),
        read,
        records.len() as f64 / read.as_secs_f64() / 1000.0
    );

    std::fs::remove_file(&path)?;
    Ok(())
}
