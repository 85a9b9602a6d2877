use folio_reveal::{Rect, RevealController, RevealOptions, RevealState, Viewport};
use parking_lot::Mutex;
use rstest::{fixture, rstest};
use std::sync::Arc;

/// A 100x100 viewport with one 100x100 element starting at y = 300.
#[fixture]
fn page() -> (Arc<Viewport>, folio_reveal::ElementId) {
    let viewport = Arc::new(Viewport::new(100.0, 100.0));
    let element = viewport.add_element(Rect::new(0.0, 300.0, 100.0, 100.0));
    (viewport, element)
}

fn controller(trigger_once: bool) -> RevealController {
    RevealController::new(RevealOptions::new(0.1, trigger_once).unwrap()).unwrap()
}

#[rstest]
fn mounting_starts_observing(page: (Arc<Viewport>, folio_reveal::ElementId)) {
    let (viewport, element) = page;
    let reveal = controller(true);
    assert_eq!(reveal.state(), RevealState::Unobserved);

    let guard = reveal.mount(&viewport, element);
    viewport.flush();

    assert_eq!(reveal.state(), RevealState::Observing);
    assert!(guard.is_observing());
    assert_eq!(viewport.observer_count(), 1);
}

#[rstest]
fn element_already_in_view_reveals_on_first_flush() {
    let viewport = Arc::new(Viewport::new(100.0, 100.0));
    let element = viewport.add_element(Rect::new(0.0, 20.0, 50.0, 50.0));
    let reveal = controller(true);

    let _guard = reveal.mount(&viewport, element);
    assert!(!reveal.is_visible());
    viewport.flush();

    assert!(reveal.is_visible());
}

#[rstest]
fn trigger_once_reveal_is_terminal(page: (Arc<Viewport>, folio_reveal::ElementId)) {
    let (viewport, element) = page;
    let reveal = controller(true);
    let guard = reveal.mount(&viewport, element);
    viewport.flush();

    viewport.scroll_to(0.0, 250.0);
    viewport.flush();
    assert!(reveal.is_visible());
    assert!(!guard.is_observing());
    assert_eq!(viewport.observer_count(), 0);

    viewport.scroll_to(0.0, 0.0);
    viewport.flush();
    assert_eq!(reveal.state(), RevealState::Visible);

    drop(guard);
    assert_eq!(reveal.state(), RevealState::Visible);
}

#[rstest]
fn repeating_reveal_follows_the_element(page: (Arc<Viewport>, folio_reveal::ElementId)) {
    let (viewport, element) = page;
    let reveal = controller(false);
    let guard = reveal.mount(&viewport, element);
    viewport.flush();

    viewport.scroll_to(0.0, 250.0);
    viewport.flush();
    assert!(reveal.is_visible());

    viewport.scroll_to(0.0, 0.0);
    viewport.flush();
    assert_eq!(reveal.state(), RevealState::Observing);

    viewport.scroll_to(0.0, 300.0);
    viewport.flush();
    assert!(reveal.is_visible());
    assert!(guard.is_observing());
}

#[rstest]
fn below_threshold_stays_hidden(page: (Arc<Viewport>, folio_reveal::ElementId)) {
    let (viewport, element) = page;
    let reveal = controller(true);
    let _guard = reveal.mount(&viewport, element);

    viewport.scroll_to(0.0, 205.0);
    viewport.flush();

    assert_eq!(reveal.state(), RevealState::Observing);
}

#[rstest]
fn dropping_guard_unobserves(page: (Arc<Viewport>, folio_reveal::ElementId)) {
    let (viewport, element) = page;
    let reveal = controller(true);
    let guard = reveal.mount(&viewport, element);
    viewport.flush();

    drop(guard);
    assert_eq!(viewport.observer_count(), 0);
    assert_eq!(reveal.state(), RevealState::Unobserved);

    viewport.scroll_to(0.0, 300.0);
    assert_eq!(viewport.flush(), 0);
    assert_eq!(reveal.state(), RevealState::Unobserved);
}

#[rstest]
fn guard_dropped_before_flush_discards_initial_entry() {
    let viewport = Arc::new(Viewport::new(100.0, 100.0));
    let element = viewport.add_element(Rect::new(0.0, 0.0, 10.0, 10.0));
    let reveal = controller(true);

    drop(reveal.mount(&viewport, element));

    assert_eq!(viewport.flush(), 0);
    assert_eq!(reveal.state(), RevealState::Unobserved);
}

#[rstest]
fn remounting_replaces_the_previous_observation(page: (Arc<Viewport>, folio_reveal::ElementId)) {
    let (viewport, element) = page;
    let other = viewport.add_element(Rect::new(0.0, 0.0, 10.0, 10.0));
    let reveal = controller(false);

    let first = reveal.mount(&viewport, element);
    let second = reveal.mount(&viewport, other);
    assert_eq!(viewport.observer_count(), 1);
    assert!(!first.is_observing());

    drop(first);
    assert!(second.is_observing());
    viewport.flush();
    assert!(reveal.is_visible());
}

#[rstest]
fn subscribers_see_each_transition(page: (Arc<Viewport>, folio_reveal::ElementId)) {
    let (viewport, element) = page;
    let reveal = controller(false);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = reveal.subscribe(move |state| sink.lock().push(state));

    let _guard = reveal.mount(&viewport, element);
    viewport.scroll_to(0.0, 250.0);
    viewport.flush();
    viewport.scroll_to(0.0, 0.0);
    viewport.flush();

    drop(subscription);
    viewport.scroll_to(0.0, 250.0);
    viewport.flush();

    assert_eq!(
        *seen.lock(),
        vec![
            RevealState::Observing,
            RevealState::Visible,
            RevealState::Observing,
        ]
    );
    assert!(reveal.is_visible());
}

#[rstest]
fn zero_area_element_in_view_is_revealed() {
    let viewport = Arc::new(Viewport::new(100.0, 100.0));
    let element = viewport.add_element(Rect::new(40.0, 40.0, 0.0, 0.0));
    let reveal = RevealController::default();

    let _guard = reveal.mount(&viewport, element);
    viewport.flush();

    assert!(reveal.is_visible());
}

#[test]
fn rejects_invalid_options() {
    let options = RevealOptions {
        threshold: 2.0,
        trigger_once: true,
    };
    assert!(RevealController::new(options).is_err());
}
