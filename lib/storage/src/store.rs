//! On-disk wardrobe store.
//!
//! One JSON document per item plus an optional image sidecar sharing
//! the same file stem. Writes land in a temp file first and are renamed
//! into place. Reads re-canonicalize every document, so partial or
//! hand-edited records still come back structurally complete.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use rand::Rng;
use tracing::{debug, warn};
use vestx_core::{normalize, AttributeRecord, Error, Result, WardrobeItem};

/// Sidecar extensions probed when attaching an image to an item, and
/// accepted when saving one.
pub const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Outcome of persisting a new item.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedItem {
    pub item: WardrobeItem,
    pub json_path: PathBuf,
    pub image_path: PathBuf,
}

/// File-backed store: one flat directory holding every item.
#[derive(Debug, Clone)]
pub struct WardrobeStore {
    root: PathBuf,
}

impl WardrobeStore {
    /// Opens the store, creating the directory when absent.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(WardrobeStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every item in the store, sorted by id.
    ///
    /// Unreadable or non-JSON documents are skipped with a warning
    /// rather than failing the whole listing.
    pub fn items(&self) -> Result<Vec<WardrobeItem>> {
        let mut items = Vec::new();
        if !self.root.exists() {
            return Ok(items);
        }
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let id = match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            match self.load_document(&path) {
                Ok(record) => {
                    let image_url = self.image_url_for(&id);
                    items.push(WardrobeItem::new(id, record, image_url));
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable wardrobe document");
                }
            }
        }
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    /// Looks up one item by id.
    pub fn get(&self, id: &str) -> Result<WardrobeItem> {
        validate_id(id)?;
        let path = self.root.join(format!("{id}.json"));
        if !path.is_file() {
            return Err(Error::ItemNotFound(id.to_string()));
        }
        let record = self.load_document(&path)?;
        Ok(WardrobeItem::new(id, record, self.image_url_for(id)))
    }

    /// Persists a canonical record plus its source image under a fresh
    /// id. The image keeps its original extension when it is a known
    /// image type and falls back to `.jpg` otherwise.
    pub fn save(
        &self,
        record: &AttributeRecord,
        image_bytes: &[u8],
        original_filename: Option<&str>,
    ) -> Result<SavedItem> {
        fs::create_dir_all(&self.root)?;
        let id = allocate_id();
        let ext = sanitize_extension(original_filename);

        let json_path = self.root.join(format!("{id}.json"));
        let payload = serde_json::to_string_pretty(record)?;
        write_atomic(&json_path, payload.as_bytes())?;

        let image_path = self.root.join(format!("{id}{ext}"));
        write_atomic(&image_path, image_bytes)?;

        debug!(%id, image = %image_path.display(), "stored wardrobe item");
        let image_url = format!("/api/images/{id}{ext}");
        Ok(SavedItem {
            item: WardrobeItem::new(id, record.clone(), Some(image_url)),
            json_path,
            image_path,
        })
    }

    /// Absolute path of a stored image file, for serving.
    pub fn image_path(&self, filename: &str) -> Result<PathBuf> {
        let clean = !filename.is_empty()
            && !filename.contains("..")
            && filename
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !clean {
            return Err(Error::InvalidRequest(format!(
                "invalid image name: {filename}"
            )));
        }
        let path = self.root.join(filename);
        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::ItemNotFound(filename.to_string()))
        }
    }

    fn load_document(&self, path: &Path) -> Result<AttributeRecord> {
        let contents = fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&contents)?;
        Ok(normalize(&value))
    }

    fn image_url_for(&self, id: &str) -> Option<String> {
        for ext in IMAGE_EXTENSIONS {
            let candidate = self.root.join(format!("{id}{ext}"));
            if candidate.is_file() {
                return Some(format!("/api/images/{id}{ext}"));
            }
        }
        None
    }
}

/// Ids are flat file stems; anything that could traverse out of the
/// store directory is rejected.
fn validate_id(id: &str) -> Result<()> {
    let clean = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
    if clean {
        Ok(())
    } else {
        Err(Error::InvalidItemId(id.to_string()))
    }
}

/// Timestamp plus entropy: a collision would need the same millisecond
/// and the same random suffix.
fn allocate_id() -> String {
    let now = Local::now();
    let stamp = now.format("%Y%m%d_%H%M%S");
    let millis = now.timestamp_subsec_millis() % 1000;
    let suffix = rand::rng().random_range(1000..=9999);
    format!("attributes_{stamp}_{millis:03}_{suffix}")
}

/// Lowercased extension of `filename` when it is a known image type,
/// `.jpg` otherwise.
fn sanitize_extension(filename: Option<&str>) -> String {
    let ext = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        ext
    } else {
        ".jpg".to_string()
    }
}

/// Write to a temp sibling first, then rename into place.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let temp = path.with_extension("tmp");
    fs::write(&temp, data)?;
    fs::rename(&temp, path)?;
    Ok(())
}
