use std::path;

use anyhow::Context as _;

use crate::Result;

/// Outcome of [`write_file`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Written {
    Created,
    /// A file already existed at the destination and was replaced.
    Overwrote,
}

pub fn read_file<P: AsRef<path::Path>>(path: P) -> Result<String> {
    read_file_internal(path.as_ref())
}

fn read_file_internal(path: &path::Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Error reading from {}", path.display()))
}

/// Write `content` to `dest_file`, creating parent directories as needed.
pub fn write_file<S: AsRef<str>, P: AsRef<path::Path>>(content: S, dest_file: P) -> Result<Written> {
    write_file_internal(content.as_ref(), dest_file.as_ref())
}

fn write_file_internal(content: &str, dest_file: &path::Path) -> Result<Written> {
    if let Some(parent) = dest_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }

    let written = if dest_file.is_file() {
        Written::Overwrote
    } else {
        Written::Created
    };

    std::fs::write(dest_file, content)
        .with_context(|| format!("Error writing to {}", dest_file.display()))?;
    log::trace!("Wrote {}", dest_file.display());
    Ok(written)
}
