use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::ReportError;

/// Documents found while walking the inputs, plus the listing failure that
/// stopped the walk, if any.
#[derive(Debug, Default)]
pub struct Traversal {
    pub documents: Vec<PathBuf>,
    pub error: Option<ReportError>,
}

/// Expands inputs into document paths, keeping input order.
///
/// A file input is taken as is. A directory contributes its direct entries in
/// sorted order; nested directories are skipped. The first directory that
/// cannot be listed ends the walk.
pub fn collect_documents<P: AsRef<Path>>(inputs: &[P]) -> Traversal {
    collect_documents_with(inputs, list_directory)
}

/// Same walk as [`collect_documents`], listing directories with `list`.
pub fn collect_documents_with<P, L>(inputs: &[P], mut list: L) -> Traversal
where
    P: AsRef<Path>,
    L: FnMut(&Path) -> Result<Vec<PathBuf>, ReportError>,
{
    let mut traversal = Traversal::default();

    for input in inputs {
        let input = input.as_ref();

        if !input.is_dir() {
            traversal.documents.push(input.to_path_buf());
            continue;
        }

        match list(input) {
            Ok(entries) => {
                for entry in entries {
                    if entry.is_dir() {
                        info!("'{}' is directory, skipping nested files", entry.display());
                        continue;
                    }
                    traversal.documents.push(entry);
                }
            }
            Err(e) => {
                error!("{}", e);
                traversal.error = Some(e);
                break;
            }
        }
    }

    traversal
}

pub fn list_directory(dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    let listing_failed = |source: std::io::Error| ReportError::DirectoryListingFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(listing_failed)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(listing_failed)?;
    entries.sort();

    info!("Found {} entries in {}", entries.len(), dir.display());
    Ok(entries)
}
