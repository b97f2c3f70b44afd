//! Peephole optimizer over the raw event stream
//!
//! Three passes run in a fixed order, each over the previous pass's output.
//! Passes only merge adjacent events or drop them, never reorder.

use crate::keys::{is_modifier_key, KeyKind};
use recast_events::{Action, Event, EventValue};
use tracing::debug;

/// Rewrite a recording into its denser equivalent.
pub fn optimize(events: &[Event]) -> Vec<Event> {
    let squashed = squash_input_into_fill(events);
    let waits = remove_duplicate_navigations(&squashed);
    let optimized = remove_duplicate_modifier_keys(&waits);
    debug!(
        input = events.len(),
        squashed = squashed.len(),
        waits = waits.len(),
        output = optimized.len(),
        "optimized recording"
    );
    optimized
}

/// Collapse runs of typing on the same element into single `fill` events.
///
/// The recorded `value` already holds the field's full text at the time of
/// the event, so a merge overwrites the running fill value rather than
/// appending to it.
pub fn squash_input_into_fill(events: &[Event]) -> Vec<Event> {
    let mut result: Vec<Event> = Vec::with_capacity(events.len());

    for item in events {
        match item.action {
            // A dropdown selection is never merged
            Action::Change if item.is_select() => {}
            Action::Change | Action::Keydown => {
                let kind = KeyKind::of(item.key.as_deref(), item.key_code);
                if kind.is_mergeable() {
                    merge_into_fill(&mut result, item, kind);
                    continue;
                }
            }
            _ => {}
        }
        result.push(item.clone());
    }

    result
}

fn merge_into_fill(result: &mut Vec<Event>, item: &Event, kind: KeyKind) {
    let new_char = match kind {
        KeyKind::Printable => item.key.as_deref().unwrap_or_default(),
        _ => "",
    };
    let mut text = item.value.as_ref().map(EventValue::to_text).unwrap_or_default();
    text.push_str(new_char);

    if let Some(last) = result.last_mut() {
        if last.action == Action::Fill && same_target(last, item) {
            last.value = Some(EventValue::Text(text));
            return;
        }
    }

    let mut fill = item.clone();
    fill.action = Action::Fill;
    fill.value = Some(EventValue::Text(text));
    result.push(fill);
}

fn same_target(a: &Event, b: &Event) -> bool {
    a.frame_id == b.frame_id
        && a.href == b.href
        && a.selector == b.selector
        && a.tag_name == b.tag_name
}

/// Keep only the first of consecutive navigation waits.
pub fn remove_duplicate_navigations(events: &[Event]) -> Vec<Event> {
    let mut result: Vec<Event> = Vec::with_capacity(events.len());
    for item in events {
        let duplicate = item.action == Action::Navigation
            && result.last().is_some_and(|last| last.action == Action::Navigation);
        if !duplicate {
            result.push(item.clone());
        }
    }
    result
}

/// Drop repeated modifier keydowns (a held Shift) within the same frame.
pub fn remove_duplicate_modifier_keys(events: &[Event]) -> Vec<Event> {
    let mut result: Vec<Event> = Vec::with_capacity(events.len());
    for item in events {
        let duplicate = result.last().is_some_and(|last| {
            item.action == Action::Keydown
                && last.action == Action::Keydown
                && item.key == last.key
                && item.key.as_deref().is_some_and(is_modifier_key)
                && item.frame_id == last.frame_id
        });
        if !duplicate {
            result.push(item.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/";

    fn typed(value: &str, key: &str) -> Event {
        Event::new(Action::Keydown)
            .selector(".form-control")
            .tag_name("INPUT")
            .frame(0, URL)
            .value(value)
            .key(key)
    }

    fn navigation() -> Event {
        Event::new(Action::Navigation)
    }

    #[test]
    fn optimizes_typing_session() {
        let click = Event::new(Action::Click)
            .selector(".form-control")
            .tag_name("INPUT")
            .frame(0, URL)
            .value("");
        let enter = typed("types", "Enter").key_code(13);
        let link = Event::new(Action::Click)
            .selector(".no-underline")
            .tag_name("A")
            .frame(0, URL)
            .href(URL);
        let events = vec![
            click.clone(),
            typed("", "Process"),
            typed("t", "Process"),
            typed("t'y", "Process"),
            typed("t'y'p", "Process"),
            typed("t'y'pe", "Process"),
            typed("type", "s"),
            enter.clone(),
            link.clone(),
            navigation(),
            navigation(),
        ];

        let optimized = optimize(&events);

        // The fill keeps the first keystroke's fields and the last value
        let mut fill = typed("types", "Process");
        fill.action = Action::Fill;
        assert_eq!(optimized, vec![click, fill, enter, link, navigation()]);
    }

    #[test]
    fn key_codes_alone_keep_enter() {
        let coded = |value: &str, code: u32| {
            Event::new(Action::Keydown)
                .selector(".form-control")
                .tag_name("INPUT")
                .frame(0, URL)
                .value(value)
                .key_code(code)
        };
        let click = Event::new(Action::Click)
            .selector(".form-control")
            .tag_name("INPUT")
            .frame(0, URL)
            .value("");
        let enter = coded("types", 13);
        let events = vec![
            click.clone(),
            coded("", 229),
            coded("t", 229),
            coded("t'y", 229),
            coded("t'y'p", 229),
            coded("t'y'pe", 229),
            coded("types", 229),
            enter.clone(),
        ];

        let optimized = optimize(&events);

        let mut fill = coded("types", 229);
        fill.action = Action::Fill;
        assert_eq!(optimized, vec![click, fill, enter]);
    }

    #[test]
    fn fill_starts_from_first_mergeable_event() {
        let optimized = optimize(&[typed("", "a")]);
        assert_eq!(optimized.len(), 1);
        assert_eq!(optimized[0].action, Action::Fill);
        assert_eq!(optimized[0].value, Some(EventValue::Text("a".into())));
    }

    #[test]
    fn target_change_starts_new_fill() {
        let other = typed("x", "y").selector("#other");
        let optimized = optimize(&[typed("a", "b"), other]);
        assert_eq!(optimized.len(), 2);
        assert!(optimized.iter().all(|e| e.action == Action::Fill));
        assert_eq!(optimized[0].value, Some(EventValue::Text("ab".into())));
        assert_eq!(optimized[1].value, Some(EventValue::Text("xy".into())));
    }

    #[test]
    fn non_mergeable_key_breaks_fill() {
        let events = [typed("a", "b"), typed("ab", "Enter"), typed("ab", "c")];
        let actions: Vec<_> = optimize(&events).into_iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![Action::Fill, Action::Keydown, Action::Fill]);
    }

    #[test]
    fn select_change_passes_through() {
        let select = Event::new(Action::Change)
            .selector("#country")
            .tag_name("SELECT")
            .value("nl");
        let input_change = Event::new(Action::Change)
            .selector("#name")
            .tag_name("INPUT")
            .value("Ada");
        let optimized = optimize(&[select.clone(), input_change]);
        assert_eq!(optimized[0], select);
        assert_eq!(optimized[1].action, Action::Fill);
        assert_eq!(optimized[1].value, Some(EventValue::Text("Ada".into())));
    }

    #[test]
    fn navigation_runs_collapse_to_one() {
        for n in 2..6 {
            let events = vec![navigation(); n];
            assert_eq!(remove_duplicate_navigations(&events).len(), 1);
        }
        let click = Event::new(Action::Click).selector("a");
        let events = [navigation(), click, navigation()];
        assert_eq!(remove_duplicate_navigations(&events).len(), 3);
    }

    #[test]
    fn modifier_dedup_respects_frames() {
        let shift = |frame| Event::new(Action::Keydown).key("Shift").frame(frame, URL);
        assert_eq!(optimize(&[shift(0), shift(0)]).len(), 1);
        assert_eq!(optimize(&[shift(0), shift(3)]).len(), 2);

        let enter = Event::new(Action::Keydown).key("Enter");
        assert_eq!(optimize(&[enter.clone(), enter]).len(), 2);
    }

    #[test]
    fn optimizing_is_a_fixed_point() {
        let events = vec![
            Event::new(Action::Goto).href(URL),
            typed("h", "h"),
            typed("hi", "i"),
            Event::new(Action::Keydown).key("Shift"),
            Event::new(Action::Keydown).key("Shift"),
            navigation(),
            navigation(),
            navigation(),
            typed("", "Tab"),
        ];
        let once = optimize(&events);
        assert_eq!(optimize(&once), once);
    }
}
