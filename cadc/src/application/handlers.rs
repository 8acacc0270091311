use std::path::PathBuf;

use cadc_core::error::{CadcError, Result};
use cadc_core::{Config, Event, FsRecordStore, Job, ParameterRecord, RecordReader, TaskRunner, codec};
use tracing::debug;

/// Config file first (if any), then the `--root` override.
pub fn load_config(root: Option<PathBuf>, config: Option<PathBuf>) -> Result<Config> {
    let mut cfg = match config {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    if let Some(root) = root {
        cfg.root = root;
    }
    debug!(root = %cfg.root.display(), "configuration loaded");
    Ok(cfg)
}

/// Run a job to completion, rendering its events. Progress and status go to
/// stderr; keys and the final message go to stdout.
pub async fn drive(runner: &TaskRunner, job: Job) -> bool {
    let mut handle = runner.spawn(job);
    while let Some(event) = handle.recv().await {
        match &event {
            Event::Key { .. } => println!("{event}"),
            Event::Finished {
                success: true,
                message,
            } => println!("{message}"),
            Event::Finished {
                success: false,
                message,
            } => eprintln!("error: {message}"),
            _ => eprintln!("{event}"),
        }
    }
    handle.finish().await.success
}

pub fn handle_records_list(store: &FsRecordStore) -> Result<bool> {
    for name in store.list()? {
        println!("{name}");
    }
    Ok(true)
}

pub fn handle_records_new(
    store: &FsRecordStore,
    name: &str,
    random: bool,
    base: Option<String>,
    offset: Option<String>,
    precision: Option<i64>,
    key_length: Option<i64>,
) -> Result<bool> {
    let record = if random {
        ParameterRecord::random()?
    } else {
        match (base, offset, precision, key_length) {
            (Some(b), Some(o), Some(p), Some(k)) => ParameterRecord::new(b, o, p, k)?,
            _ => {
                return Err(CadcError::Validation(
                    "base, offset, precision and key length are all required".to_string(),
                ));
            }
        }
    };
    let path = store.create(name, &record)?;
    println!("{}", path.display());
    Ok(true)
}

pub fn handle_codec_encode(digits: &str) -> Result<bool> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CadcError::Format(format!("{digits:?} is not a digit string")));
    }
    println!("{}", codec().encode(digits));
    Ok(true)
}

pub fn handle_codec_decode(tokens: &str) -> Result<bool> {
    println!("{}", codec().decode(tokens));
    Ok(true)
}
