//! Reveal-on-scroll for folio pages.
//!
//! A [`RevealController`] watches one element through an
//! [`IntersectionSource`] and flips to [`RevealState::Visible`] once enough of
//! the element enters the viewport. [`Viewport`] is an in-process source that
//! delivers intersection entries when flushed, the way a browser delivers
//! them on its next frame.

mod controller;
mod error;
mod options;
mod source;
mod viewport;

pub use controller::{RevealController, RevealGuard, RevealState, Subscription};
pub use error::RevealError;
pub use options::RevealOptions;
pub use source::{ElementId, IntersectionCallback, IntersectionEntry, IntersectionSource, ObserverId};
pub use viewport::{Rect, Viewport};
