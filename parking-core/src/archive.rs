//! Packing the generated tree into one .tar.gz for distribution.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::HeaderMode;
use tracing::debug;

use crate::error::{ParkingError, ParkingResult};

/// Archive every file under `source_dir` into `archive_path`.
///
/// Entry names are paths relative to `source_dir`, in sorted order, with
/// normalized metadata so an unchanged tree produces the same entries.
/// Returns the number of files archived.
pub fn build_archive(source_dir: &Path, archive_path: &Path) -> ParkingResult<usize> {
    if !source_dir.is_dir() {
        return Err(ParkingError::Archive(format!(
            "{} is not a directory",
            source_dir.display()
        )));
    }
    if archive_path.starts_with(source_dir) {
        return Err(ParkingError::Archive(format!(
            "archive {} would be inside the directory it packs",
            archive_path.display()
        )));
    }

    let mut files = Vec::new();
    collect_files(source_dir, Path::new(""), &mut files)?;

    let encoder = GzEncoder::new(File::create(archive_path)?, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.mode(HeaderMode::Deterministic);

    for relative in &files {
        builder.append_path_with_name(source_dir.join(relative), relative)?;
        debug!("Archived {}", relative.display());
    }

    builder.into_inner()?.finish()?;

    Ok(files.len())
}

/// Recursively list files below `dir`, as paths relative to the walk root.
fn collect_files(dir: &Path, relative: &Path, files: &mut Vec<PathBuf>) -> ParkingResult<()> {
    let mut entries = std::fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let file_type = entry.file_type()?;
        let entry_relative = relative.join(entry.file_name());

        if file_type.is_dir() {
            collect_files(&entry.path(), &entry_relative, files)?;
        } else if file_type.is_file() {
            files.push(entry_relative);
        }
    }

    Ok(())
}
