use crate::error::{CadcError, Result};
use crate::events::{Event, StatusSink};
use crate::pack::walker::{SourceEntry, walk};
use crate::util::paths::parent_dir;
use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::Path;
use time::OffsetDateTime;
use tracing::{debug, warn};
use zip::write::{FileOptions, SimpleFileOptions};
use zip::{AesMode, CompressionMethod, ZipWriter};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackSummary {
    /// Entries written, files and empty directories together.
    pub entries: usize,
    pub files: usize,
    /// Files dropped after a read failure.
    pub skipped: usize,
}

/// Write `source` (a file or a directory tree) to a Deflate + AES-256 zip at
/// `out`. The archive is staged next to `out` and only renamed into place
/// once complete.
pub fn pack(
    source: &Path,
    out: &Path,
    password: &str,
    sink: &mut dyn StatusSink,
) -> Result<PackSummary> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".cadc-")
        .suffix(".part")
        .tempfile_in(parent_dir(out))?;

    let summary = {
        let mut zip = ZipWriter::new(tmp.as_file_mut());
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .with_aes_encryption(AesMode::Aes256, password);
        let summary = if source.is_dir() {
            pack_dir(&mut zip, source, options, sink)?
        } else {
            pack_file(&mut zip, source, options, sink)?
        };
        zip.finish()?;
        summary
    };

    if summary.entries == 0 {
        return Err(CadcError::Validation(format!(
            "nothing could be archived from {}",
            source.display()
        )));
    }
    tmp.as_file().sync_all()?;
    tmp.persist(out).map_err(|e| e.error)?;
    debug!(archive = %out.display(), entries = summary.entries, "archive persisted");
    Ok(summary)
}

fn pack_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &Path,
    options: FileOptions<'_, ()>,
    sink: &mut dyn StatusSink,
) -> Result<PackSummary> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CadcError::Validation(format!("{} has no file name", path.display())))?;
    sink.emit(Event::Progress {
        processed: 1,
        total: 1,
    });
    add_file(zip, path, &name, options)?;
    Ok(PackSummary {
        entries: 1,
        files: 1,
        skipped: 0,
    })
}

fn pack_dir<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    root: &Path,
    options: FileOptions<'_, ()>,
    sink: &mut dyn StatusSink,
) -> Result<PackSummary> {
    let entries = walk(root, sink);
    write_entries(zip, &entries, options, sink)
}

/// Add walked entries in order. A file that fails to read is reported and
/// counted in `skipped`; the rest of the archive is still written.
fn write_entries<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entries: &[SourceEntry],
    options: FileOptions<'_, ()>,
    sink: &mut dyn StatusSink,
) -> Result<PackSummary> {
    let total = entries
        .iter()
        .filter(|e| matches!(e, SourceEntry::File { .. }))
        .count();
    let mut summary = PackSummary::default();
    let mut processed = 0;

    for entry in entries {
        match entry {
            SourceEntry::EmptyDir { name } => {
                zip.add_directory(name.as_str(), SimpleFileOptions::default())?;
                summary.entries += 1;
            }
            SourceEntry::File { path, name } => {
                processed += 1;
                sink.emit(Event::Progress { processed, total });
                match add_file(zip, path, name, options.clone()) {
                    Ok(()) => {
                        summary.entries += 1;
                        summary.files += 1;
                    }
                    Err(e) => {
                        warn!(entry = %name, error = %e, "skipping file");
                        sink.emit(Event::Warning(format!("skipped {name}: {e}")));
                        summary.skipped += 1;
                    }
                }
            }
        }
    }
    Ok(summary)
}

fn add_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &Path,
    name: &str,
    options: FileOptions<'_, ()>,
) -> Result<()> {
    let mut src = File::open(path)?;
    let options = match modified_time(&src) {
        Some(t) => options.last_modified_time(t),
        None => options,
    };
    zip.start_file(name, options)?;
    if let Err(e) = io::copy(&mut src, zip) {
        zip.abort_file()?;
        return Err(e.into());
    }
    Ok(())
}

fn modified_time(f: &File) -> Option<zip::DateTime> {
    let mtime = f.metadata().ok()?.modified().ok()?;
    zip::DateTime::try_from(OffsetDateTime::from(mtime)).ok()
}
