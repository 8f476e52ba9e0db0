//! Reference set: one embedding per known person, loaded from a photo directory.

use crate::encoder::{EncodeError, FaceEncoder};
use crate::types::Embedding;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions accepted as reference photos (compared case-insensitively).
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("cannot read reference directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("encoding {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
}

/// Index-aligned names and embeddings, in load order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    names: Vec<String>,
    embeddings: Vec<Embedding>,
}

impl ReferenceSet {
    /// Register `name`. An existing entry with the same name is replaced in place.
    pub fn insert(&mut self, name: String, embedding: Embedding) {
        match self.names.iter().position(|n| *n == name) {
            Some(idx) => self.embeddings[idx] = embedding,
            None => {
                self.names.push(name);
                self.embeddings.push(embedding);
            }
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.embeddings
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Embedding> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.embeddings[idx])
    }
}

/// Whether `path` has one of the reference photo extensions.
fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Build the reference set from every photo in `dir`.
///
/// Each photo contributes the first face the encoder reports, named after the
/// file stem. Photos that fail to decode or contain no face are skipped.
/// Entries follow directory-listing order.
pub fn load_reference_set<E: FaceEncoder + ?Sized>(
    dir: &Path,
    encoder: &mut E,
) -> Result<ReferenceSet, ReferenceError> {
    let read_dir_err = |source| ReferenceError::ReadDir { path: dir.to_path_buf(), source };
    let mut set = ReferenceSet::default();

    for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
        let path = entry.map_err(read_dir_err)?.path();
        if !path.is_file() || !is_image_file(&path) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_owned) else {
            continue;
        };

        let image = match image::open(&path) {
            Ok(img) => img.to_luma8(),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping undecodable photo");
                continue;
            }
        };

        let detections = encoder
            .encode(&image)
            .map_err(|source| ReferenceError::Encode { path: path.clone(), source })?;

        let Some(first) = detections.into_iter().next() else {
            tracing::debug!(path = %path.display(), "no face in photo, skipping");
            continue;
        };

        if set.get(&name).is_some() {
            tracing::debug!(%name, path = %path.display(), "replacing earlier photo with the same name");
        }
        set.insert(name, first.embedding);
    }

    tracing::info!(dir = %dir.display(), count = set.len(), "reference set loaded");
    Ok(set)
}
