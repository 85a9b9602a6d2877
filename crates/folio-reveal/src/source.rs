use std::sync::Arc;

/// Handle of an element known to an [`IntersectionSource`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ElementId(pub u64);

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ObserverId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub element: ElementId,
    /// Visible fraction of the element, `0.0..=1.0`.
    pub ratio: f64,
    /// Whether the observation's threshold is met.
    pub is_intersecting: bool,
}

pub type IntersectionCallback = Arc<dyn Fn(&IntersectionEntry) + Send + Sync>;

/// Reports when an element crosses a visibility threshold.
///
/// Implementations deliver an initial entry for every new observation and
/// one entry per threshold crossing afterwards. Callbacks must not run
/// synchronously inside [`observe`](Self::observe); no callback runs for an
/// observation after [`unobserve`](Self::unobserve) returns.
pub trait IntersectionSource: Send + Sync {
    fn observe(
        &self,
        element: ElementId,
        threshold: f64,
        callback: IntersectionCallback,
    ) -> ObserverId;

    fn unobserve(&self, id: ObserverId);
}
