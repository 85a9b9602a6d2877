use crate::error::RevealError;
use crate::options::RevealOptions;
use crate::source::{ElementId, IntersectionEntry, IntersectionSource, ObserverId};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RevealState {
    /// Not mounted on any element.
    #[default]
    Unobserved,
    /// Mounted and waiting for the element to cross the threshold.
    Observing,
    /// The element has been revealed.
    Visible,
}

type Listener = dyn Fn(RevealState) + Send + Sync;

struct Observation {
    source: Weak<dyn IntersectionSource>,
    id: ObserverId,
}

#[derive(Default)]
struct Shared {
    state: Mutex<RevealState>,
    observation: Mutex<Option<Observation>>,
    listeners: Mutex<Vec<Weak<Listener>>>,
}

impl Shared {
    fn set_state(&self, next: RevealState) {
        {
            let mut state = self.state.lock();
            if *state == next {
                return;
            }
            *state = next;
        }
        self.notify(next);
    }

    fn notify(&self, state: RevealState) {
        let listeners: Vec<Arc<Listener>> = {
            let mut listeners = self.listeners.lock();
            listeners.retain(|listener| listener.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };

        for listener in listeners {
            listener(state);
        }
    }

    /// Ends the current observation, or only `expected` when given.
    fn detach(&self, expected: Option<ObserverId>) -> bool {
        let observation = {
            let mut slot = self.observation.lock();
            let owned = match (slot.as_ref(), expected) {
                (None, _) => false,
                (Some(current), Some(expected)) => current.id == expected,
                (Some(_), None) => true,
            };
            if !owned {
                return false;
            }
            slot.take()
        };
        if let Some(observation) = observation
            && let Some(source) = observation.source.upgrade()
        {
            source.unobserve(observation.id);
        }
        true
    }

    fn on_entry(&self, entry: &IntersectionEntry, options: RevealOptions) {
        let current = *self.state.lock();
        if current == RevealState::Unobserved {
            return;
        }

        match (entry.is_intersecting, options.trigger_once) {
            (true, true) => {
                self.detach(None);
                tracing::trace!("Element {:?} revealed", entry.element);
                self.set_state(RevealState::Visible);
            },
            (true, false) => self.set_state(RevealState::Visible),
            (false, false) => self.set_state(RevealState::Observing),
            (false, true) => {},
        }
    }
}

/// Reveal state of a single element.
///
/// With [`RevealOptions::trigger_once`] the first crossing is final and the
/// element stops being observed; otherwise the state follows the element in
/// and out of view.
#[derive(Clone)]
pub struct RevealController {
    options: RevealOptions,
    shared: Arc<Shared>,
}

impl fmt::Debug for RevealController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealController")
            .field("options", &self.options)
            .field("state", &self.state())
            .finish()
    }
}

impl Default for RevealController {
    fn default() -> Self {
        Self {
            options: RevealOptions::default(),
            shared: Arc::default(),
        }
    }
}

impl RevealController {
    pub fn new(options: RevealOptions) -> Result<Self, RevealError> {
        options.validate()?;
        Ok(Self {
            options,
            shared: Arc::default(),
        })
    }

    pub fn options(&self) -> RevealOptions {
        self.options
    }

    pub fn state(&self) -> RevealState {
        *self.shared.state.lock()
    }

    pub fn is_visible(&self) -> bool {
        self.state() == RevealState::Visible
    }

    /// Starts observing `element`.
    ///
    /// Any previous observation of this controller ends first. A controller
    /// that already revealed its element with `trigger_once` stays visible and
    /// does not observe again.
    pub fn mount<S>(&self, source: &Arc<S>, element: ElementId) -> RevealGuard
    where
        S: IntersectionSource + 'static,
    {
        self.shared.detach(None);

        if self.options.trigger_once && self.is_visible() {
            return RevealGuard {
                shared: self.shared.clone(),
                id: None,
            };
        }

        let weak_shared = Arc::downgrade(&self.shared);
        let options = self.options;
        let id = source.observe(
            element,
            self.options.threshold,
            Arc::new(move |entry: &IntersectionEntry| {
                if let Some(shared) = weak_shared.upgrade() {
                    shared.on_entry(entry, options);
                }
            }),
        );

        let source: Arc<dyn IntersectionSource> = source.clone();
        *self.shared.observation.lock() = Some(Observation {
            source: Arc::downgrade(&source),
            id,
        });
        if self.state() == RevealState::Unobserved {
            self.shared.set_state(RevealState::Observing);
        }

        RevealGuard {
            shared: self.shared.clone(),
            id: Some(id),
        }
    }

    /// Calls `callback` with every state change until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(
        &self,
        callback: impl Fn(RevealState) + Send + Sync + 'static,
    ) -> Subscription {
        let strong: Arc<Listener> = Arc::new(callback);
        self.shared.listeners.lock().push(Arc::downgrade(&strong));
        Subscription { _listener: strong }
    }
}

/// Ends the observation started by [`RevealController::mount`] when dropped.
///
/// An element that is still waiting goes back to
/// [`RevealState::Unobserved`]; a revealed element stays visible.
#[must_use = "dropping the guard stops observing the element"]
pub struct RevealGuard {
    shared: Arc<Shared>,
    id: Option<ObserverId>,
}

impl RevealGuard {
    /// Whether this guard's observation is still running.
    pub fn is_observing(&self) -> bool {
        match (self.shared.observation.lock().as_ref(), self.id) {
            (Some(current), Some(id)) => current.id == id,
            _ => false,
        }
    }
}

impl fmt::Debug for RevealGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealGuard")
            .field("observing", &self.is_observing())
            .finish()
    }
}

impl Drop for RevealGuard {
    fn drop(&mut self) {
        if self.id.is_none() || !self.shared.detach(self.id) {
            return;
        }
        if *self.shared.state.lock() == RevealState::Observing {
            self.shared.set_state(RevealState::Unobserved);
        }
    }
}

/// Keeps a [`RevealController::subscribe`] callback alive.
#[must_use = "dropping the subscription unsubscribes the callback"]
pub struct Subscription {
    _listener: Arc<Listener>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
