use crate::error::{CadcError, Result};
use crate::events::{Event, StatusSink};
use crate::read::opened::OpenedArchive;
use crate::util::paths::{parent_dir, unique_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Directory entries were written into.
    pub target: PathBuf,
    pub entries: usize,
    /// True when a fresh `<prefix><stem>` directory was made for the output.
    pub created_dir: bool,
}

/// Verify `archive` against `password`, then unpack it. A single-entry
/// archive lands next to the archive; anything larger goes into a new
/// `<prefix><stem>` directory (suffixed `_1`, `_2`, ... if taken).
pub fn extract(
    archive: &Path,
    password: &str,
    prefix: &str,
    sink: &mut dyn StatusSink,
) -> Result<ExtractSummary> {
    let mut opened = OpenedArchive::open(archive, password)?;
    sink.emit(Event::Status("verifying archive".to_string()));
    opened.verify()?;

    let parent = parent_dir(archive);
    let total = opened.len();
    let (target, created_dir) = if total > 1 {
        let stem = archive
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| CadcError::Format(format!("{} has no file stem", archive.display())))?;
        let dir = unique_dir(&parent, &format!("{prefix}{stem}"));
        fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "created extraction directory");
        sink.emit(Event::Status(format!(
            "extracting into {}",
            dir.display()
        )));
        (dir, true)
    } else {
        (parent, false)
    };

    for index in 0..total {
        opened.extract_entry(index, &target)?;
        sink.emit(Event::Progress {
            processed: index + 1,
            total,
        });
    }
    Ok(ExtractSummary {
        target,
        entries: total,
        created_dir,
    })
}
