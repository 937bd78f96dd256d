//! Retained drawable handles kept in step with the element collection.

use crate::element::{Element, ElementId};
use std::collections::{HashMap, HashSet};

/// Capability to draw elements, implemented by the rendering layer.
///
/// `SceneSync` is the only caller. It owns every handle returned by
/// [`create`](Self::create) and gives each one back through
/// [`destroy`](Self::destroy) exactly once.
pub trait ElementRenderer {
    /// Drawable created for a single element.
    type Handle;

    /// Build a drawable for a newly tracked element.
    fn create(&mut self, element: &Element) -> Self::Handle;

    /// Refresh a drawable from the element's full current snapshot.
    fn update(&mut self, handle: &mut Self::Handle, element: &Element);

    /// Release the drawable of an element that is no longer tracked.
    fn destroy(&mut self, id: ElementId, handle: Self::Handle);
}

/// Counts of renderer calls issued by one [`SceneSync::sync_elements`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub created: usize,
    pub updated: usize,
    pub destroyed: usize,
    /// Ordered ids with no matching element in the snapshot.
    pub skipped: usize,
}

/// Keeps an id -> handle map consistent with an external, ordered collection.
///
/// Handles are created only when an id first appears and destroyed as soon
/// as it disappears. The retained order (back to front) follows the most
/// recent `ordered_ids`.
pub struct SceneSync<R: ElementRenderer> {
    renderer: R,
    handles: HashMap<ElementId, R::Handle>,
    /// Tracked ids, back to front.
    order: Vec<ElementId>,
}

impl<R: ElementRenderer> SceneSync<R> {
    /// Create an empty scene around a renderer.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            handles: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Create and track a handle for `element`.
    ///
    /// Callers should route additions through [`sync_elements`](Self::sync_elements).
    /// If the id is already tracked, the previous handle is replaced without
    /// being destroyed.
    pub fn add_element(&mut self, element: &Element) {
        let handle = self.renderer.create(element);
        if self.handles.insert(element.id, handle).is_some() {
            log::warn!("Element {} was already tracked; previous handle leaked", element.id);
        } else {
            self.order.push(element.id);
        }
    }

    /// Push the element's current snapshot to its handle. No-op if untracked.
    pub fn update_element(&mut self, element: &Element) {
        if let Some(handle) = self.handles.get_mut(&element.id) {
            self.renderer.update(handle, element);
        }
    }

    /// Destroy and untrack the handle for `id`. No-op if untracked.
    pub fn remove_element(&mut self, id: ElementId) {
        if let Some(handle) = self.handles.remove(&id) {
            self.order.retain(|&tracked| tracked != id);
            self.renderer.destroy(id, handle);
        }
    }

    /// Alias of [`remove_element`](Self::remove_element).
    pub fn destroy_element(&mut self, id: ElementId) {
        self.remove_element(id);
    }

    /// Diff the snapshot against the tracked set.
    ///
    /// Afterwards the tracked ids are exactly the ids of `ordered_ids` that
    /// have an entry in `elements`, retained in that order.
    pub fn sync_elements(
        &mut self,
        elements: &HashMap<ElementId, Element>,
        ordered_ids: &[ElementId],
    ) -> SyncStats {
        let mut stats = SyncStats::default();
        let wanted: HashSet<ElementId> = ordered_ids.iter().copied().collect();

        // Removal, including ids whose element is missing from the snapshot
        let stale: Vec<ElementId> = self
            .order
            .iter()
            .copied()
            .filter(|id| !wanted.contains(id) || !elements.contains_key(id))
            .collect();
        for id in stale {
            if let Some(handle) = self.handles.remove(&id) {
                self.renderer.destroy(id, handle);
                stats.destroyed += 1;
            }
        }

        // Upsert in z-order
        let mut order = Vec::with_capacity(ordered_ids.len());
        let mut seen = HashSet::with_capacity(ordered_ids.len());
        for &id in ordered_ids {
            if !seen.insert(id) {
                continue;
            }
            let Some(element) = elements.get(&id) else {
                stats.skipped += 1;
                continue;
            };
            match self.handles.get_mut(&id) {
                Some(handle) => {
                    self.renderer.update(handle, element);
                    stats.updated += 1;
                }
                None => {
                    let handle = self.renderer.create(element);
                    self.handles.insert(id, handle);
                    stats.created += 1;
                }
            }
            order.push(id);
        }

        self.order = order;

        log::debug!(
            "Scene sync: {} created, {} updated, {} destroyed, {} skipped",
            stats.created,
            stats.updated,
            stats.destroyed,
            stats.skipped
        );
        stats
    }

    /// The handle for `id`, if tracked.
    pub fn display_object(&self, id: ElementId) -> Option<&R::Handle> {
        self.handles.get(&id)
    }

    /// Tracked ids, back to front.
    pub fn tracked_ids(&self) -> &[ElementId] {
        &self.order
    }

    /// Handles in z-order, back to front.
    pub fn handles(&self) -> impl Iterator<Item = (ElementId, &R::Handle)> {
        self.order
            .iter()
            .filter_map(|id| self.handles.get(id).map(|handle| (*id, handle)))
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.handles.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Destroy every tracked handle, front to back. Used on teardown.
    pub fn destroy_all(&mut self) {
        let count = self.handles.len();
        for id in std::mem::take(&mut self.order).into_iter().rev() {
            if let Some(handle) = self.handles.remove(&id) {
                self.renderer.destroy(id, handle);
            }
        }
        log::debug!("Scene teardown: destroyed {} handles", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(ElementId),
        Update(ElementId, Point),
        Destroy(ElementId),
    }

    /// Records every call; handles carry a serial number and the last position.
    #[derive(Debug, Default)]
    struct RecordingRenderer {
        calls: Vec<Call>,
        next_serial: u32,
        live: HashSet<u32>,
    }

    #[derive(Debug)]
    struct TestHandle {
        serial: u32,
        position: Point,
    }

    impl RecordingRenderer {
        fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| f(*c)).count()
        }

        fn creates(&self) -> usize {
            self.count(|c| matches!(c, Call::Create(_)))
        }

        fn updates(&self) -> usize {
            self.count(|c| matches!(c, Call::Update(..)))
        }

        fn destroys(&self) -> usize {
            self.count(|c| matches!(c, Call::Destroy(_)))
        }
    }

    impl ElementRenderer for RecordingRenderer {
        type Handle = TestHandle;

        fn create(&mut self, element: &Element) -> TestHandle {
            self.calls.push(Call::Create(element.id));
            self.next_serial += 1;
            self.live.insert(self.next_serial);
            TestHandle {
                serial: self.next_serial,
                position: element.position,
            }
        }

        fn update(&mut self, handle: &mut TestHandle, element: &Element) {
            self.calls.push(Call::Update(element.id, element.position));
            handle.position = element.position;
        }

        fn destroy(&mut self, id: ElementId, handle: TestHandle) {
            self.calls.push(Call::Destroy(id));
            assert!(self.live.remove(&handle.serial), "handle destroyed twice");
        }
    }

    fn snapshot(elements: &[Element]) -> (HashMap<ElementId, Element>, Vec<ElementId>) {
        let map = elements.iter().map(|e| (e.id, e.clone())).collect();
        let order = elements.iter().map(|e| e.id).collect();
        (map, order)
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn element(x: f64) -> Element {
        Element::new(Point::new(x, 0.0), Size::new(10.0, 10.0))
    }

    #[test]
    fn test_add_update_remove() {
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let mut el = element(0.0);

        scene.add_element(&el);
        assert!(scene.contains(el.id));
        assert_eq!(scene.tracked_ids(), &[el.id]);

        el.position = Point::new(5.0, 6.0);
        scene.update_element(&el);
        assert_eq!(scene.display_object(el.id).unwrap().position, Point::new(5.0, 6.0));

        scene.remove_element(el.id);
        assert!(scene.is_empty());
        assert_eq!(
            scene.renderer().calls,
            vec![Call::Create(el.id), Call::Update(el.id, Point::new(5.0, 6.0)), Call::Destroy(el.id)]
        );
    }

    #[test]
    fn test_untracked_operations_are_noops() {
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let el = element(0.0);
        scene.update_element(&el);
        scene.remove_element(el.id);
        scene.destroy_element(el.id);
        assert!(scene.renderer().calls.is_empty());
        assert!(scene.display_object(el.id).is_none());
    }

    #[test]
    fn test_sync_idempotence() {
        init_logging();
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let (elements, order) = snapshot(&[element(0.0), element(20.0), element(40.0)]);

        let first = scene.sync_elements(&elements, &order);
        assert_eq!(first.created, 3);
        assert_eq!(first.updated, 0);

        let second = scene.sync_elements(&elements, &order);
        assert_eq!(second, SyncStats { created: 0, updated: 3, destroyed: 0, skipped: 0 });
        assert_eq!(scene.renderer().creates(), 3);
        assert!(scene.renderer().updates() >= 1);
    }

    #[test]
    fn test_sync_removal() {
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let (elements, order) = snapshot(&[element(0.0), element(20.0)]);
        scene.sync_elements(&elements, &order);

        let stats = scene.sync_elements(&HashMap::new(), &[]);
        assert_eq!(stats.destroyed, 2);
        assert!(scene.is_empty());
        assert_eq!(scene.renderer().destroys(), 2);
        assert!(scene.renderer().live.is_empty());
    }

    #[test]
    fn test_sync_tracks_intersection() {
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let a = element(0.0);
        let b = element(10.0);
        let ghost = uuid::Uuid::new_v4();
        let (elements, _) = snapshot(&[a.clone(), b.clone()]);

        // b exists but is not ordered; ghost is ordered but has no element
        let stats = scene.sync_elements(&elements, &[ghost, a.id]);
        assert_eq!(stats.skipped, 1);
        assert_eq!(scene.tracked_ids(), &[a.id]);
        assert!(!scene.contains(b.id));
        assert!(!scene.contains(ghost));
    }

    #[test]
    fn test_sync_drops_tracked_id_missing_from_elements() {
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let a = element(0.0);
        let b = element(10.0);
        let (elements, order) = snapshot(&[a.clone(), b.clone()]);
        scene.sync_elements(&elements, &order);

        let (only_a, _) = snapshot(&[a.clone()]);
        let stats = scene.sync_elements(&only_a, &order);
        assert_eq!(stats.destroyed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(scene.tracked_ids(), &[a.id]);
    }

    #[test]
    fn test_sync_follows_z_order() {
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let (elements, order) = snapshot(&[element(0.0), element(1.0), element(2.0)]);
        scene.sync_elements(&elements, &order);

        let reversed: Vec<ElementId> = order.iter().rev().copied().collect();
        let stats = scene.sync_elements(&elements, &reversed);
        assert_eq!(stats.created, 0);
        assert_eq!(scene.tracked_ids(), reversed.as_slice());
        let handle_order: Vec<ElementId> = scene.handles().map(|(id, _)| id).collect();
        assert_eq!(handle_order, reversed);
    }

    #[test]
    fn test_sync_ignores_duplicate_ordered_ids() {
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let a = element(0.0);
        let (elements, _) = snapshot(&[a.clone()]);
        let stats = scene.sync_elements(&elements, &[a.id, a.id]);
        assert_eq!(stats.created, 1);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.tracked_ids(), &[a.id]);
    }

    #[test]
    fn test_sync_updates_with_full_snapshot() {
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let mut a = element(0.0);
        let (elements, order) = snapshot(&[a.clone()]);
        scene.sync_elements(&elements, &order);

        a.position = Point::new(42.0, 7.0);
        let (elements, order) = snapshot(&[a.clone()]);
        scene.sync_elements(&elements, &order);
        assert_eq!(scene.display_object(a.id).unwrap().position, Point::new(42.0, 7.0));
    }

    #[test]
    fn test_destroy_all() {
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let (elements, order) = snapshot(&[element(0.0), element(1.0)]);
        scene.sync_elements(&elements, &order);

        scene.destroy_all();
        assert!(scene.is_empty());
        assert!(scene.tracked_ids().is_empty());
        assert!(scene.renderer().live.is_empty());

        // Teardown twice is harmless
        scene.destroy_all();
        assert_eq!(scene.renderer().destroys(), 2);
    }

    #[test]
    fn test_destroy_all_front_to_back() {
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let (a, b, c) = (element(0.0), element(1.0), element(2.0));
        let (elements, order) = snapshot(&[a.clone(), b.clone(), c.clone()]);
        scene.sync_elements(&elements, &order);

        scene.destroy_all();
        let destroyed: Vec<Call> = scene.renderer().calls[3..].to_vec();
        assert_eq!(destroyed, vec![Call::Destroy(c.id), Call::Destroy(b.id), Call::Destroy(a.id)]);
    }

    #[test]
    fn test_sync_clears_large_scene() {
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let many: Vec<Element> = (0..2000).map(|i| element(i as f64)).collect();
        let (elements, order) = snapshot(&many);
        scene.sync_elements(&elements, &order);

        let stats = scene.sync_elements(&HashMap::new(), &[]);
        assert_eq!(stats.destroyed, 2000);
        assert!(scene.is_empty());
        assert!(scene.tracked_ids().is_empty());
        assert!(scene.renderer().live.is_empty());
    }

    #[test]
    fn test_duplicate_add_overwrites() {
        init_logging();
        let mut scene = SceneSync::new(RecordingRenderer::default());
        let a = element(0.0);
        scene.add_element(&a);
        scene.add_element(&a);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.tracked_ids(), &[a.id]);
        assert_eq!(scene.display_object(a.id).unwrap().serial, 2);
    }
}
