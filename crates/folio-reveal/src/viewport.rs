use crate::source::{
    ElementId, IntersectionCallback, IntersectionEntry, IntersectionSource, ObserverId,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// An axis-aligned rectangle in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    fn right(&self) -> f64 {
        self.x + self.width.max(0.0)
    }

    fn bottom(&self) -> f64 {
        self.y + self.height.max(0.0)
    }

    fn intersection_area(&self, other: &Rect) -> f64 {
        let width = self.right().min(other.right()) - self.x.max(other.x);
        let height = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if width <= 0.0 || height <= 0.0 {
            0.0
        } else {
            width * height
        }
    }

    fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

struct Observation {
    element: ElementId,
    threshold: f64,
    callback: IntersectionCallback,
    last: Option<bool>,
}

#[derive(Default)]
struct ViewportState {
    width: f64,
    height: f64,
    scroll_x: f64,
    scroll_y: f64,
    elements: HashMap<ElementId, Rect>,
    observations: BTreeMap<ObserverId, Observation>,
    queue: VecDeque<(ObserverId, IntersectionEntry)>,
    next_element: u64,
    next_observer: u64,
}

impl ViewportState {
    fn visible_rect(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }

    fn entry_for(&self, element: ElementId, threshold: f64) -> IntersectionEntry {
        let Some(rect) = self.elements.get(&element) else {
            return IntersectionEntry {
                element,
                ratio: 0.0,
                is_intersecting: false,
            };
        };

        let visible = self.visible_rect();
        let area = rect.area();
        let (ratio, is_intersecting) = if area == 0.0 {
            let inside = visible.contains(rect);
            (if inside { 1.0 } else { 0.0 }, inside)
        } else {
            let ratio = (rect.intersection_area(&visible) / area).clamp(0.0, 1.0);
            (ratio, ratio > 0.0 && ratio >= threshold)
        };

        IntersectionEntry {
            element,
            ratio,
            is_intersecting,
        }
    }

    /// Queues an entry for every observation whose intersecting state changed.
    fn recompute(&mut self) {
        let entries: Vec<(ObserverId, IntersectionEntry)> = self
            .observations
            .iter()
            .map(|(id, observation)| (*id, self.entry_for(observation.element, observation.threshold)))
            .collect();

        for (id, entry) in entries {
            if let Some(observation) = self.observations.get_mut(&id)
                && observation.last != Some(entry.is_intersecting)
            {
                observation.last = Some(entry.is_intersecting);
                self.queue.push_back((id, entry));
            }
        }
    }
}

/// An in-process viewport over a scrollable document.
///
/// Entries are queued when observations start and whenever scrolling,
/// resizing or layout changes make an element cross its threshold. They are
/// delivered by [`flush`](Self::flush), never from inside the mutating call.
pub struct Viewport {
    state: Mutex<ViewportState>,
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Viewport")
            .field("size", &(state.width, state.height))
            .field("scroll", &(state.scroll_x, state.scroll_y))
            .field("elements", &state.elements.len())
            .field("observations", &state.observations.len())
            .field("queued", &state.queue.len())
            .finish()
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: Mutex::new(ViewportState {
                width,
                height,
                ..ViewportState::default()
            }),
        }
    }

    pub fn add_element(&self, rect: Rect) -> ElementId {
        let mut state = self.state.lock();
        state.next_element += 1;
        let id = ElementId(state.next_element);
        state.elements.insert(id, rect);
        id
    }

    pub fn move_element(&self, element: ElementId, rect: Rect) {
        let mut state = self.state.lock();
        if state.elements.insert(element, rect).is_none() {
            tracing::debug!("Moved unknown element {:?}; adding it", element);
        }
        state.recompute();
    }

    pub fn remove_element(&self, element: ElementId) {
        let mut state = self.state.lock();
        state.elements.remove(&element);
        state.recompute();
    }

    pub fn scroll_to(&self, x: f64, y: f64) {
        let mut state = self.state.lock();
        state.scroll_x = x;
        state.scroll_y = y;
        state.recompute();
    }

    pub fn resize(&self, width: f64, height: f64) {
        let mut state = self.state.lock();
        state.width = width;
        state.height = height;
        state.recompute();
    }

    pub fn scroll_offset(&self) -> (f64, f64) {
        let state = self.state.lock();
        (state.scroll_x, state.scroll_y)
    }

    pub fn observer_count(&self) -> usize {
        self.state.lock().observations.len()
    }

    pub fn pending_entries(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Delivers queued entries in order and returns how many were delivered.
    ///
    /// Callbacks run without the viewport lock held, so they may observe,
    /// unobserve or scroll. Entries queued by a callback are delivered in the
    /// same flush.
    pub fn flush(&self) -> usize {
        let mut delivered = 0;
        loop {
            let next = {
                let mut state = self.state.lock();
                let Some((id, entry)) = state.queue.pop_front() else {
                    break;
                };
                state
                    .observations
                    .get(&id)
                    .map(|observation| (observation.callback.clone(), entry))
            };

            if let Some((callback, entry)) = next {
                callback(&entry);
                delivered += 1;
            }
        }
        delivered
    }
}

impl IntersectionSource for Viewport {
    fn observe(
        &self,
        element: ElementId,
        threshold: f64,
        callback: IntersectionCallback,
    ) -> ObserverId {
        let mut state = self.state.lock();
        state.next_observer += 1;
        let id = ObserverId(state.next_observer);

        let entry = state.entry_for(element, threshold);
        state.observations.insert(
            id,
            Observation {
                element,
                threshold,
                callback,
                last: Some(entry.is_intersecting),
            },
        );
        state.queue.push_back((id, entry));
        id
    }

    fn unobserve(&self, id: ObserverId) {
        let mut state = self.state.lock();
        if state.observations.remove(&id).is_some() {
            state.queue.retain(|(queued, _)| *queued != id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recorder() -> (IntersectionCallback, Arc<Mutex<Vec<IntersectionEntry>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: IntersectionCallback = Arc::new(move |entry: &IntersectionEntry| {
            sink.lock().push(*entry);
        });
        (callback, seen)
    }

    #[test]
    fn observe_queues_initial_entry_until_flush() {
        let viewport = Viewport::new(100.0, 100.0);
        let element = viewport.add_element(Rect::new(0.0, 50.0, 100.0, 100.0));
        let (callback, seen) = recorder();

        viewport.observe(element, 0.1, callback);
        assert!(seen.lock().is_empty());
        assert_eq!(viewport.flush(), 1);

        let entry = seen.lock()[0];
        assert_eq!(entry.ratio, 0.5);
        assert!(entry.is_intersecting);
    }

    #[test]
    fn scrolling_queues_entries_only_on_threshold_crossings() {
        let viewport = Viewport::new(100.0, 100.0);
        let element = viewport.add_element(Rect::new(0.0, 300.0, 100.0, 100.0));
        let (callback, seen) = recorder();
        viewport.observe(element, 0.5, callback);
        viewport.flush();

        viewport.scroll_to(0.0, 220.0);
        assert_eq!(viewport.pending_entries(), 0);

        viewport.scroll_to(0.0, 260.0);
        viewport.scroll_to(0.0, 280.0);
        viewport.scroll_to(0.0, 500.0);
        viewport.flush();

        let seen = seen.lock();
        assert_eq!(seen.len(), 3);
        assert!(!seen[0].is_intersecting);
        assert!(seen[1].is_intersecting);
        assert_eq!(seen[1].ratio, 0.6);
        assert!(!seen[2].is_intersecting);
    }

    #[test]
    fn zero_area_element_inside_viewport_intersects() {
        let viewport = Viewport::new(100.0, 100.0);
        let inside = viewport.add_element(Rect::new(10.0, 10.0, 0.0, 0.0));
        let outside = viewport.add_element(Rect::new(10.0, 400.0, 0.0, 0.0));
        let (callback, seen) = recorder();

        viewport.observe(inside, 0.1, callback.clone());
        viewport.observe(outside, 0.1, callback);
        viewport.flush();

        let seen = seen.lock();
        assert!(seen[0].is_intersecting);
        assert!(!seen[1].is_intersecting);
    }

    #[test]
    fn unobserve_drops_queued_entries() {
        let viewport = Viewport::new(100.0, 100.0);
        let element = viewport.add_element(Rect::new(0.0, 0.0, 10.0, 10.0));
        let (callback, seen) = recorder();

        let id = viewport.observe(element, 0.1, callback);
        viewport.unobserve(id);

        assert_eq!(viewport.flush(), 0);
        assert!(seen.lock().is_empty());
        assert_eq!(viewport.observer_count(), 0);
    }

    #[test]
    fn layout_changes_queue_crossings() {
        let viewport = Viewport::new(100.0, 100.0);
        let element = viewport.add_element(Rect::new(0.0, 150.0, 100.0, 100.0));
        let (callback, seen) = recorder();
        viewport.observe(element, 0.1, callback);
        viewport.flush();

        viewport.resize(100.0, 200.0);
        viewport.flush();
        viewport.move_element(element, Rect::new(0.0, 500.0, 100.0, 100.0));
        viewport.flush();

        let seen = seen.lock();
        assert_eq!(seen.len(), 3);
        assert!(!seen[0].is_intersecting);
        assert_eq!(seen[1].ratio, 0.5);
        assert!(seen[1].is_intersecting);
        assert!(!seen[2].is_intersecting);
        assert_eq!(viewport.scroll_offset(), (0.0, 0.0));
    }

    #[test]
    fn removed_element_stops_intersecting() {
        let viewport = Viewport::new(100.0, 100.0);
        let element = viewport.add_element(Rect::new(0.0, 0.0, 10.0, 10.0));
        let (callback, seen) = recorder();
        viewport.observe(element, 0.1, callback);
        viewport.flush();

        viewport.remove_element(element);
        viewport.flush();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert!(!seen[1].is_intersecting);
    }
}
