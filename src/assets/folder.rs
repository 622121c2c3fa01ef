//! Folder-backed asset repository
//!
//! A read-only repository over a directory tree. Files are classified by
//! extension; asset ids are the files' full paths, which is exactly what
//! the file fetch backend expects to open.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::data::{Asset, AssetId, MediaKind};
use super::repository::{AssetCollection, AssetRepository, FetchOptions};

/// Supported photo file extensions (common RAW formats included)
const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp",
    "nef", "dng", "cr2", "cr3", "arw", "raf", "orf", "rw2",
    "pef", "srw", "erf", "kdc", "dcr", "mos", "raw", "rwl",
];

/// Supported video file extensions
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "avi", "mkv", "webm"];

/// Recognized media that the grid renders with a generic cell
const OTHER_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "flac", "ogg"];

/// Asset repository over a directory tree
pub struct FolderAssetRepository {
    root: PathBuf,
}

impl FolderAssetRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Walk the tree and collect every recognized media file.
    fn scan(&self) -> Vec<Asset> {
        let mut assets = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let media_kind = match media_kind_for(path) {
                Some(kind) => kind,
                None => continue,
            };

            assets.push(Asset {
                id: AssetId::new(path.to_string_lossy()),
                media_kind,
                created_at: creation_date(path),
            });
        }

        println!("🔍 Scanned {}: {} assets found", self.root.display(), assets.len());
        assets
    }
}

/// Classify a file by extension; `None` means the file is not media the
/// picker shows
fn media_kind_for(path: &Path) -> Option<MediaKind> {
    let extension = path.extension()?.to_string_lossy().to_lowercase();

    if PHOTO_EXTENSIONS.contains(&extension.as_str()) {
        Some(MediaKind::Photo)
    } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        Some(MediaKind::Video)
    } else if OTHER_EXTENSIONS.contains(&extension.as_str()) {
        Some(MediaKind::Other)
    } else {
        None
    }
}

/// Creation time from file metadata, falling back to modification time.
/// Not every filesystem records a birth time.
fn creation_date(path: &Path) -> DateTime<Utc> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return Utc::now(),
    };

    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

impl AssetRepository for FolderAssetRepository {
    fn fetch_assets(&self, options: &FetchOptions) -> Vec<Asset> {
        options.apply(self.scan())
    }

    /// Folders have no smart collections; the provider falls back to the
    /// whole-library fetch.
    fn recently_added(&self) -> Option<AssetCollection> {
        None
    }

    fn fetch_assets_in(&self, _collection: &AssetCollection, options: &FetchOptions) -> Vec<Asset> {
        self.fetch_assets(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("picker-folder-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_scan_classifies_by_extension() {
        let dir = test_dir("classify");
        std::fs::write(dir.join("a.jpg"), b"x").unwrap();
        std::fs::write(dir.join("b.NEF"), b"x").unwrap();
        std::fs::write(dir.join("c.mp4"), b"x").unwrap();
        std::fs::write(dir.join("d.mp3"), b"x").unwrap();
        std::fs::write(dir.join("ignored.txt"), b"x").unwrap();

        let repository = FolderAssetRepository::new(&dir);
        let assets = repository.fetch_assets(&FetchOptions::default());

        assert_eq!(assets.len(), 4);
        let photos = assets.iter().filter(|a| a.media_kind == MediaKind::Photo).count();
        let videos = assets.iter().filter(|a| a.media_kind == MediaKind::Video).count();
        let other = assets.iter().filter(|a| a.media_kind == MediaKind::Other).count();
        assert_eq!((photos, videos, other), (2, 1, 1));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_fetch_honors_filter_and_cap() {
        let dir = test_dir("filter");
        std::fs::write(dir.join("a.jpg"), b"x").unwrap();
        std::fs::write(dir.join("b.png"), b"x").unwrap();
        std::fs::write(dir.join("c.mov"), b"x").unwrap();

        let repository = FolderAssetRepository::new(&dir);

        let photos = repository.fetch_assets(&FetchOptions {
            media_kind: Some(MediaKind::Photo),
            ..FetchOptions::default()
        });
        assert_eq!(photos.len(), 2);

        let capped = repository.fetch_assets(&FetchOptions {
            limit: Some(1),
            ..FetchOptions::default()
        });
        assert_eq!(capped.len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_asset_ids_are_full_paths() {
        let dir = test_dir("paths");
        std::fs::write(dir.join("a.jpg"), b"x").unwrap();

        let repository = FolderAssetRepository::new(&dir);
        let assets = repository.fetch_assets(&FetchOptions::default());

        assert_eq!(assets.len(), 1);
        assert!(Path::new(assets[0].id.as_str()).exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_no_recently_added_collection() {
        let repository = FolderAssetRepository::new("/nonexistent");

        assert!(repository.recently_added().is_none());
    }
}
