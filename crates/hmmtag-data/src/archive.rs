//! Zip extraction for dataset archives.
//!
//! Dataset archives usually wrap their files in a directory named after the
//! archive (`student_dataset.zip` → `student_dataset/train.json`).
//! [`unzip_data`] flattens that wrapper so the files land directly in the
//! destination directory.

use std::fs::{self, File};
use std::path::Path;

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::{DataError, Result};

/// Extract every entry of `zip_path` into `dest`.
pub fn extract(zip_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(zip_path).map_err(|e| DataError::io(zip_path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|source| DataError::Zip {
        path: zip_path.to_path_buf(),
        source,
    })?;
    debug!(entries = archive.len(), archive = %zip_path.display(), "extracting");
    archive.extract(dest).map_err(|source| DataError::Zip {
        path: zip_path.to_path_buf(),
        source,
    })
}

/// Extract `zip_path` into `dest`, reporting only whether it worked.
pub fn unzip_file(zip_path: impl AsRef<Path>, dest: impl AsRef<Path>) -> bool {
    match extract(zip_path.as_ref(), dest.as_ref()) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "unzip failed");
            false
        }
    }
}

/// Replace `dest` with the contents of `zip_path`.
///
/// Any existing `dest` is removed first. If the archive holds a top-level
/// directory named after the archive's file stem, its entries are moved up
/// into `dest` and the emptied directory is removed.
pub fn unzip_data(zip_path: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    let (zip_path, dest) = (zip_path.as_ref(), dest.as_ref());

    if dest.exists() {
        debug!(dest = %dest.display(), "removing previous extraction");
        fs::remove_dir_all(dest).map_err(|e| DataError::io(dest, e))?;
    }

    extract(zip_path, dest)?;

    let Some(stem) = zip_path.file_stem() else {
        return Ok(());
    };
    let sub_dir = dest.join(stem);
    if !sub_dir.is_dir() {
        warn!(
            expected = %sub_dir.display(),
            "archive has no wrapper directory, leaving contents as extracted"
        );
        return Ok(());
    }

    let entries = fs::read_dir(&sub_dir).map_err(|e| DataError::io(&sub_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| DataError::io(&sub_dir, e))?;
        let target = dest.join(entry.file_name());
        fs::rename(entry.path(), &target).map_err(|e| DataError::io(&target, e))?;
    }
    fs::remove_dir(&sub_dir).map_err(|e| DataError::io(&sub_dir, e))?;

    info!(archive = %zip_path.display(), dest = %dest.display(), "dataset unzipped");
    Ok(())
}
