//! Outstanding thumbnail fetches and stale-result suppression
//!
//! The cache bridges a synchronous "configure this cell now" call to an
//! asynchronous image fetch. Cells are recycled by the rendering surface,
//! so a fetch can complete after its slot has been rebound to a different
//! asset; such results must be discarded, never applied. Staleness is
//! resolved structurally, by comparing identities at completion time, not
//! by cancelling backend I/O.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::backend::{FetchCompletion, ImageFetchBackend, Thumbnail, ThumbnailSize};
use crate::assets::data::{Asset, AssetId};

/// Identity of a reusable rendering slot, stable per physical cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub u64);

/// Identity of one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(u64);

/// A recyclable cell that can display an asset thumbnail
///
/// The rendering surface owns cells and rebinds them freely; the picker
/// never assumes a cell stays on the coordinate it was dequeued for.
pub trait AssetCell {
    /// Stable identity of this physical cell across recycling.
    fn slot(&self) -> SlotId;

    /// Identity of the asset this cell currently represents.
    fn bound_asset(&self) -> Option<&AssetId>;

    /// Rebind the cell to a new asset identity.
    fn bind(&mut self, asset: AssetId);

    /// Display a fetched thumbnail.
    fn set_thumbnail(&mut self, image: Thumbnail);
}

/// Shared handle to a cell owned by the rendering surface
pub type AssetCellRef = Rc<RefCell<dyn AssetCell>>;

/// What `request` hands back: a synchronous hit when the backend had the
/// image already, and the identity of the fetch that was issued
#[derive(Debug)]
pub struct RequestOutcome {
    pub immediate: Option<Thumbnail>,
    pub request: RequestId,
}

struct InFlightFetch {
    request: RequestId,
    cell: Weak<RefCell<dyn AssetCell>>,
}

/// One backend result, marshaled back to the front-end thread
struct Completion {
    slot: SlotId,
    request: RequestId,
    /// Identity the fetch was issued for, checked against the cell's
    /// current binding before the image is applied
    asset: AssetId,
    image: Option<Thumbnail>,
}

/// Tracks at most one outstanding fetch per slot and applies results
/// under the identity guard
pub struct ThumbnailCache {
    backend: Arc<dyn ImageFetchBackend>,
    in_flight: HashMap<SlotId, InFlightFetch>,
    completions: UnboundedReceiver<Completion>,
    sender: UnboundedSender<Completion>,
    next_request: u64,
}

impl ThumbnailCache {
    pub fn new(backend: Arc<dyn ImageFetchBackend>) -> Self {
        let (sender, completions) = mpsc::unbounded_channel();
        Self {
            backend,
            in_flight: HashMap::new(),
            completions,
            sender,
            next_request: 0,
        }
    }

    /// Issue a fetch for `asset` into `cell`.
    ///
    /// The cell is rebound to `asset` before the fetch is issued, so any
    /// still-in-flight fetch for this slot is guaranteed to see a mismatch
    /// when it eventually completes. Replacing the slot's in-flight record
    /// invalidates the previous fetch; the backend I/O itself is not
    /// cancelled and does not need to be.
    ///
    /// Returns a synchronous image when the backend had one at hand. The
    /// asynchronous fetch is issued regardless; its result flows through
    /// [`drain_completions`].
    ///
    /// [`drain_completions`]: ThumbnailCache::drain_completions
    pub fn request(
        &mut self,
        cell: &AssetCellRef,
        asset: &Asset,
        target: ThumbnailSize,
    ) -> RequestOutcome {
        cell.borrow_mut().bind(asset.id.clone());
        let slot = cell.borrow().slot();

        self.next_request += 1;
        let request = RequestId(self.next_request);
        self.in_flight.insert(
            slot,
            InFlightFetch {
                request,
                cell: Rc::downgrade(cell),
            },
        );

        let immediate = self.backend.cached(asset, target);

        let sender = self.sender.clone();
        let asset_id = asset.id.clone();
        let completion: FetchCompletion = Box::new(move |image| {
            let _ = sender.send(Completion {
                slot,
                request,
                asset: asset_id,
                image,
            });
        });
        self.backend.fetch(asset, target, completion);

        RequestOutcome { immediate, request }
    }

    /// Apply queued fetch results to their cells. Must run on the thread
    /// that owns the cells; the identity-check-then-apply step is not safe
    /// against concurrent rebinding. Returns how many images were applied.
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Number of slots with an outstanding fetch.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    fn apply(&mut self, completion: Completion) -> bool {
        // A completion whose request id no longer matches the slot's
        // record was superseded by a newer request; drop it and leave the
        // newer record in place.
        match self.in_flight.get(&completion.slot) {
            Some(record) if record.request == completion.request => {}
            _ => return false,
        }

        let record = match self.in_flight.remove(&completion.slot) {
            Some(record) => record,
            None => return false,
        };

        let cell = match record.cell.upgrade() {
            Some(cell) => cell,
            // The surface discarded the cell while the fetch was running
            None => return false,
        };

        let image = match completion.image {
            Some(image) => image,
            // Failed or cancelled fetch: keep whatever the slot shows
            None => return false,
        };

        let mut cell = cell.borrow_mut();
        // The cell may have been recycled since this fetch was issued;
        // apply the image only if it still represents the same asset.
        if cell.bound_asset() == Some(&completion.asset) {
            cell.set_thumbnail(image);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    use crate::assets::data::MediaKind;

    fn asset(id: &str) -> Asset {
        Asset {
            id: AssetId::new(id),
            media_kind: MediaKind::Photo,
            created_at: Utc::now(),
        }
    }

    fn image(side: u32) -> Thumbnail {
        Thumbnail::new(side, side)
    }

    const TARGET: ThumbnailSize = ThumbnailSize { width: 64, height: 64 };

    /// Cell double recording its binding and displayed thumbnail
    struct TestCell {
        slot: SlotId,
        bound: Option<AssetId>,
        thumbnail: Option<Thumbnail>,
    }

    impl TestCell {
        fn shared(slot: u64) -> Rc<RefCell<TestCell>> {
            Rc::new(RefCell::new(TestCell {
                slot: SlotId(slot),
                bound: None,
                thumbnail: None,
            }))
        }
    }

    impl AssetCell for TestCell {
        fn slot(&self) -> SlotId {
            self.slot
        }

        fn bound_asset(&self) -> Option<&AssetId> {
            self.bound.as_ref()
        }

        fn bind(&mut self, asset: AssetId) {
            self.bound = Some(asset);
        }

        fn set_thumbnail(&mut self, image: Thumbnail) {
            self.thumbnail = Some(image);
        }
    }

    /// Backend double that parks completions until the test fires them
    struct ManualBackend {
        pending: Mutex<Vec<(AssetId, FetchCompletion)>>,
        sync_hits: Mutex<HashMap<AssetId, Thumbnail>>,
    }

    impl ManualBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                pending: Mutex::new(Vec::new()),
                sync_hits: Mutex::new(HashMap::new()),
            })
        }

        fn add_sync_hit(&self, id: &str, image: Thumbnail) {
            self.sync_hits.lock().unwrap().insert(AssetId::new(id), image);
        }

        fn pending_count(&self) -> usize {
            self.pending.lock().unwrap().len()
        }

        /// Fire the oldest parked completion for `id`.
        fn complete(&self, id: &str, image: Option<Thumbnail>) {
            let mut pending = self.pending.lock().unwrap();
            let position = pending
                .iter()
                .position(|(asset, _)| asset.as_str() == id)
                .expect("no pending fetch for asset");
            let (_, completion) = pending.remove(position);
            drop(pending);
            completion(image);
        }
    }

    impl ImageFetchBackend for ManualBackend {
        fn fetch(&self, asset: &Asset, _target: ThumbnailSize, completion: FetchCompletion) {
            self.pending.lock().unwrap().push((asset.id.clone(), completion));
        }

        fn cached(&self, asset: &Asset, _target: ThumbnailSize) -> Option<Thumbnail> {
            self.sync_hits.lock().unwrap().get(&asset.id).cloned()
        }
    }

    #[test]
    fn test_completed_fetch_applies_to_bound_cell() {
        let backend = ManualBackend::new();
        let mut cache = ThumbnailCache::new(backend.clone());
        let cell = TestCell::shared(1);
        let handle: AssetCellRef = cell.clone();

        cache.request(&handle, &asset("a"), TARGET);
        assert_eq!(cache.in_flight_count(), 1);

        backend.complete("a", Some(image(64)));
        assert_eq!(cache.drain_completions(), 1);

        assert!(cell.borrow().thumbnail.is_some());
        assert_eq!(cache.in_flight_count(), 0);
    }

    #[test]
    fn test_stale_fetch_is_discarded_after_rebind() {
        let backend = ManualBackend::new();
        let mut cache = ThumbnailCache::new(backend.clone());
        let cell = TestCell::shared(1);
        let handle: AssetCellRef = cell.clone();

        // Fetch for asset A is in flight when the surface recycles the
        // cell for asset B
        cache.request(&handle, &asset("a"), TARGET);
        cache.request(&handle, &asset("b"), TARGET);
        assert_eq!(cell.borrow().bound.as_ref().unwrap().as_str(), "b");
        assert_eq!(cache.in_flight_count(), 1);

        // A's late completion must not touch the cell
        backend.complete("a", Some(image(1)));
        assert_eq!(cache.drain_completions(), 0);
        assert!(cell.borrow().thumbnail.is_none());

        // B's completion lands normally
        backend.complete("b", Some(image(2)));
        assert_eq!(cache.drain_completions(), 1);
        assert_eq!(cell.borrow().thumbnail.as_ref().unwrap().width(), 2);
    }

    #[test]
    fn test_stale_failure_is_equally_silent() {
        let backend = ManualBackend::new();
        let mut cache = ThumbnailCache::new(backend.clone());
        let cell = TestCell::shared(1);
        let handle: AssetCellRef = cell.clone();

        cache.request(&handle, &asset("a"), TARGET);
        cache.request(&handle, &asset("b"), TARGET);

        backend.complete("a", None);
        backend.complete("b", Some(image(2)));
        assert_eq!(cache.drain_completions(), 1);
        assert_eq!(cell.borrow().thumbnail.as_ref().unwrap().width(), 2);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_content() {
        let backend = ManualBackend::new();
        let mut cache = ThumbnailCache::new(backend.clone());
        let cell = TestCell::shared(1);
        let handle: AssetCellRef = cell.clone();

        cache.request(&handle, &asset("a"), TARGET);
        backend.complete("a", Some(image(8)));
        cache.drain_completions();

        // A later fetch for the same slot fails; the old pixels stay
        cache.request(&handle, &asset("b"), TARGET);
        backend.complete("b", None);
        assert_eq!(cache.drain_completions(), 0);
        assert_eq!(cell.borrow().thumbnail.as_ref().unwrap().width(), 8);
    }

    #[test]
    fn test_at_most_one_in_flight_record_per_slot() {
        let backend = ManualBackend::new();
        let mut cache = ThumbnailCache::new(backend.clone());
        let cell = TestCell::shared(1);
        let handle: AssetCellRef = cell.clone();

        cache.request(&handle, &asset("a"), TARGET);
        cache.request(&handle, &asset("b"), TARGET);
        cache.request(&handle, &asset("c"), TARGET);

        assert_eq!(cache.in_flight_count(), 1);
        // The backend still saw every fetch; only the record is replaced
        assert_eq!(backend.pending_count(), 3);
    }

    #[test]
    fn test_completions_for_distinct_slots_are_independent() {
        let backend = ManualBackend::new();
        let mut cache = ThumbnailCache::new(backend.clone());
        let first = TestCell::shared(1);
        let second = TestCell::shared(2);
        let first_handle: AssetCellRef = first.clone();
        let second_handle: AssetCellRef = second.clone();

        cache.request(&first_handle, &asset("a"), TARGET);
        cache.request(&second_handle, &asset("b"), TARGET);

        // Out of order: the second slot's fetch completes first
        backend.complete("b", Some(image(2)));
        backend.complete("a", Some(image(1)));
        assert_eq!(cache.drain_completions(), 2);

        assert_eq!(first.borrow().thumbnail.as_ref().unwrap().width(), 1);
        assert_eq!(second.borrow().thumbnail.as_ref().unwrap().width(), 2);
    }

    #[test]
    fn test_dropped_cell_discards_completion() {
        let backend = ManualBackend::new();
        let mut cache = ThumbnailCache::new(backend.clone());
        let cell = TestCell::shared(1);
        let handle: AssetCellRef = cell.clone();

        cache.request(&handle, &asset("a"), TARGET);
        drop(handle);
        drop(cell);

        backend.complete("a", Some(image(4)));
        assert_eq!(cache.drain_completions(), 0);
        assert_eq!(cache.in_flight_count(), 0);
    }

    #[test]
    fn test_drain_with_nothing_queued() {
        let backend = ManualBackend::new();
        let mut cache = ThumbnailCache::new(backend);

        assert_eq!(cache.drain_completions(), 0);
    }

    #[test]
    fn test_synchronous_hit_is_returned() {
        let backend = ManualBackend::new();
        backend.add_sync_hit("a", image(16));
        let mut cache = ThumbnailCache::new(backend.clone());
        let cell = TestCell::shared(1);
        let handle: AssetCellRef = cell.clone();

        let outcome = cache.request(&handle, &asset("a"), TARGET);

        assert_eq!(outcome.immediate.unwrap().width(), 16);
        // The asynchronous fetch is issued regardless of the hit
        assert_eq!(backend.pending_count(), 1);
    }

    #[test]
    fn test_request_rebinds_before_issuing() {
        let backend = ManualBackend::new();
        let mut cache = ThumbnailCache::new(backend);
        let cell = TestCell::shared(1);
        let handle: AssetCellRef = cell.clone();

        cache.request(&handle, &asset("a"), TARGET);

        assert_eq!(cell.borrow().bound.as_ref().unwrap().as_str(), "a");
    }
}
