//! Image fetch backends
//!
//! A backend performs the actual decode and resize work off the front-end
//! thread and hands the result to a completion callback. The completion
//! receives `None` for any failure or cancellation; callers treat that the
//! same as "no image" and keep whatever the slot already shows.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::runtime::Handle;

use crate::assets::data::{Asset, AssetId};

/// Decoded thumbnail pixels handed to cells
pub type Thumbnail = image::RgbaImage;

/// Thumbnail target size in pixels
///
/// A zero dimension means "not renderable yet"; fetches are skipped for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_zero(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Convert to JSON string so hosts can persist the configured size
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Completion invoked by a backend exactly once, with an image or `None`
pub type FetchCompletion = Box<dyn FnOnce(Option<Thumbnail>) + Send + 'static>;

/// Asynchronous image fetch backend
///
/// Implementations may invoke the completion on any thread; the caller is
/// responsible for marshaling the result back to its own thread before
/// touching slot state.
pub trait ImageFetchBackend: Send + Sync {
    /// Start an asynchronous fetch for `asset` at `target` size.
    fn fetch(&self, asset: &Asset, target: ThumbnailSize, completion: FetchCompletion);

    /// Synchronously available image for `asset` at `target`, if the
    /// backend has one at hand. The default backend has none.
    fn cached(&self, _asset: &Asset, _target: ThumbnailSize) -> Option<Thumbnail> {
        None
    }
}

/// Errors from the file-backed fetch path
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read image file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Fetch backend that treats asset ids as image file paths
///
/// Decode and resize run on the runtime's blocking pool. Completed fetches
/// are kept in memory keyed by `(asset, size)` so a repeat request for the
/// same slot content resolves synchronously.
pub struct FileFetchBackend {
    handle: Handle,
    completed: Arc<Mutex<HashMap<(AssetId, ThumbnailSize), Thumbnail>>>,
}

impl FileFetchBackend {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            completed: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl ImageFetchBackend for FileFetchBackend {
    fn fetch(&self, asset: &Asset, target: ThumbnailSize, completion: FetchCompletion) {
        if target.is_zero() {
            completion(None);
            return;
        }

        if let Some(hit) = self.cached(asset, target) {
            completion(Some(hit));
            return;
        }

        let id = asset.id.clone();
        let path = asset.id.as_str().to_string();
        let completed = Arc::clone(&self.completed);

        self.handle.spawn_blocking(move || {
            let image = match load_thumbnail_blocking(Path::new(&path), target) {
                Ok(image) => {
                    let mut completed = match completed.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    completed.insert((id, target), image.clone());
                    Some(image)
                }
                Err(e) => {
                    eprintln!("⚠️  Thumbnail fetch failed for {}: {}", path, e);
                    None
                }
            };
            completion(image);
        });
    }

    fn cached(&self, asset: &Asset, target: ThumbnailSize) -> Option<Thumbnail> {
        let completed = match self.completed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        completed.get(&(asset.id.clone(), target)).cloned()
    }
}

/// Blocking decode plus aspect-fill resize to the exact target size
fn load_thumbnail_blocking(path: &Path, target: ThumbnailSize) -> Result<Thumbnail, FetchError> {
    let file = std::fs::File::open(path)?;
    let reader = image::ImageReader::new(BufReader::new(file)).with_guessed_format()?;
    let img = reader.decode()?;

    let thumbnail = img.resize_to_fill(target.width, target.height, FilterType::Lanczos3);
    Ok(thumbnail.to_rgba8())
}
