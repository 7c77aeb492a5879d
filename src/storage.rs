//! Small file-writing helpers shared by every persisted document.

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

/// Serializes `value` as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Writes `bytes` to a `.partial` sibling and renames it over `path`, so a
/// crash mid-write never leaves a truncated file behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let partial = sibling(path, ".partial");
    std::fs::write(&partial, bytes)?;
    std::fs::rename(&partial, path)
}

/// Moves an unparseable document to `<name>.corrupt`, so the next write
/// does not destroy it. Returns where it went.
pub fn set_aside(path: &Path) -> io::Result<PathBuf> {
    let aside = sibling(path, ".corrupt");
    std::fs::rename(path, &aside)?;
    Ok(aside)
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
