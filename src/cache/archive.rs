//! Artifact construction: a zstd-compressed tar of the resolved paths
//!
//! Compression and layout are delegated to the `zstd` and `tar` crates; this
//! module only resolves input patterns and wires the two together.

use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::error::CacheError;

/// zstd default level
const COMPRESSION_LEVEL: i32 = 3;

/// Expand input patterns against the workspace
///
/// Patterns go through glob expansion; one that is not valid glob syntax is
/// kept as a literal path if it exists. Matches are deduplicated in
/// first-match order.
pub fn resolve_paths(patterns: &[String], workspace: &Path) -> Vec<PathBuf> {
    let mut resolved: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let absolute = if Path::new(pattern).is_absolute() {
            PathBuf::from(pattern)
        } else {
            workspace.join(pattern)
        };

        match glob::glob(&absolute.to_string_lossy()) {
            Ok(matches) => {
                for entry in matches.flatten() {
                    if !resolved.contains(&entry) {
                        resolved.push(entry);
                    }
                }
            }
            Err(err) => {
                debug!("pattern {} is not valid glob syntax: {}", pattern, err);
                if absolute.exists() && !resolved.contains(&absolute) {
                    resolved.push(absolute);
                }
            }
        }
    }

    resolved
}

/// Write a zstd-compressed tar of `paths` to a temp file
///
/// Entries are stored relative to the workspace so a restore unpacks into
/// the same layout; paths outside the workspace are stored with their root
/// stripped. Symlinks are archived as links, not followed.
pub fn create_archive(paths: &[PathBuf], workspace: &Path) -> Result<NamedTempFile, CacheError> {
    let archive = NamedTempFile::new()?;
    let encoder = zstd::Encoder::new(archive.reopen()?, COMPRESSION_LEVEL)?;

    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);

    for path in paths {
        let name = entry_name(path, workspace);
        if path.is_dir() {
            builder.append_dir_all(&name, path)?;
        } else {
            builder.append_path_with_name(path, &name)?;
        }
    }

    builder.into_inner()?.finish()?;
    Ok(archive)
}

fn entry_name(path: &Path, workspace: &Path) -> PathBuf {
    match path.strip_prefix(workspace) {
        Ok(relative) if relative.as_os_str().is_empty() => PathBuf::from("."),
        Ok(relative) => relative.to_path_buf(),
        Err(_) => path
            .components()
            .filter(|component| matches!(component, Component::Normal(_)))
            .collect(),
    }
}
