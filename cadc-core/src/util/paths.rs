use std::path::{Path, PathBuf};

/// Directory containing `path`; `.` for bare relative names.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `parent/name`, or `parent/name_1`, `parent/name_2`, ... for the first
/// that does not exist yet.
pub fn unique_dir(parent: &Path, name: &str) -> PathBuf {
    let first = parent.join(name);
    if !first.exists() {
        return first;
    }
    let mut n = 1u32;
    loop {
        let candidate = parent.join(format!("{name}_{n}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}
