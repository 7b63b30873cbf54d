//! Photo uploads.
//!
//! Every file in a batch is uploaded independently; a failed file is
//! logged and reported but does not stop the others.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::StoreError;

/// File storage that hands back a stable URL per upload.
pub trait PhotoStorage {
    fn upload(&mut self, file_name: &str, bytes: &[u8]) -> Result<String, StoreError>;
}

/// A file picked for upload.
#[derive(Debug, Clone, Copy)]
pub struct PhotoFile<'a> {
    pub name: &'a str,
    pub bytes: &'a [u8],
}

/// Outcome of [`upload_all`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadBatch {
    pub urls: Vec<String>,
    pub failures: Vec<StoreError>,
}

/// Upload each file, continuing past failures.
pub fn upload_all(storage: &mut dyn PhotoStorage, files: &[PhotoFile<'_>]) -> UploadBatch {
    let mut batch = UploadBatch::default();

    for file in files {
        match storage.upload(file.name, file.bytes) {
            Ok(url) => {
                debug!(file = file.name, %url, "photo uploaded");
                batch.urls.push(url);
            }
            Err(err) => {
                warn!(file = file.name, error = %err, "photo upload failed");
                batch.failures.push(err);
            }
        }
    }

    batch
}

/// Add uploaded URLs to a stop's photo list.
///
/// Existing photos keep their order; new URLs are appended sorted and
/// without duplicates, so the result does not depend on the order uploads
/// finished in.
pub fn merge_photos(existing: &[String], uploaded: &[String]) -> Vec<String> {
    let known: BTreeSet<&str> = existing.iter().map(String::as_str).collect();
    let added: BTreeSet<&str> = uploaded
        .iter()
        .map(String::as_str)
        .filter(|url| !known.contains(url))
        .collect();

    existing
        .iter()
        .cloned()
        .chain(added.into_iter().map(str::to_string))
        .collect()
}
