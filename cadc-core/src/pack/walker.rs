use crate::events::{Event, StatusSink};
use std::fs;
use std::path::{Component, Path};
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceEntry {
    File { path: std::path::PathBuf, name: String },
    /// Directory with no children; stored as an explicit `name/` entry.
    EmptyDir { name: String },
}

impl SourceEntry {
    pub fn name(&self) -> &str {
        match self {
            SourceEntry::File { name, .. } | SourceEntry::EmptyDir { name } => name,
        }
    }
}

/// Walk `root` in file-name order. Entry names are relative to the parent of
/// `root`, so the top-level folder name is kept inside the archive.
/// Unreadable entries become warnings; symlinks are skipped.
pub fn walk(root: &Path, sink: &mut dyn StatusSink) -> Vec<SourceEntry> {
    let base = root.parent().unwrap_or(Path::new(""));
    let mut out = Vec::new();
    for e in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let e = match e {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                sink.emit(Event::Warning(format!("skipping unreadable entry: {err}")));
                continue;
            }
        };
        let p = e.path();
        let ft = e.file_type();
        if ft.is_file() {
            out.push(SourceEntry::File {
                path: p.to_path_buf(),
                name: entry_name(p, base),
            });
        } else if ft.is_dir() {
            match fs::read_dir(p).map(|mut it| it.next().is_none()) {
                Ok(true) => out.push(SourceEntry::EmptyDir {
                    name: entry_name(p, base),
                }),
                Ok(false) => {}
                Err(err) => {
                    warn!(path = %p.display(), error = %err, "cannot list directory");
                    sink.emit(Event::Warning(format!(
                        "cannot list {}: {err}",
                        p.display()
                    )));
                }
            }
        } else {
            debug!(path = %p.display(), "skipping non-regular entry");
        }
    }
    out
}

/// `/`-joined path of `path` below `base`.
pub fn entry_name(path: &Path, base: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
