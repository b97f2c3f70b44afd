//! Strict checking of a recording before generation

use crate::error::{Error, Result};
use recast_events::Event;

/// Reject events whose action no generator understands.
///
/// Generation itself skips such events; this is for callers that would
/// rather fail than silently lose steps.
pub fn validate(events: &[Event]) -> Result<()> {
    let unknown: Vec<serde_json::Value> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.action.is_known())
        .map(|(i, e)| serde_json::json!({ "index": i, "action": e.action.as_str() }))
        .collect();

    if unknown.is_empty() {
        return Ok(());
    }

    Err(Error::unknown_actions(unknown.len())
        .with_suggestions(vec![
            "Re-record with a current version of the extension".to_string(),
            "Run without --strict to skip these events".to_string(),
        ])
        .with_context(serde_json::json!({ "events": unknown })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use recast_events::Action;

    #[test]
    fn known_actions_pass() {
        let events = [Event::new(Action::Click), Event::new(Action::Submit)];
        assert!(validate(&events).is_ok());
    }

    #[test]
    fn unknown_actions_are_listed() {
        let events = [
            Event::new(Action::Click),
            Event::new("scroll"),
            Event::new("drag"),
        ];
        let err = validate(&events).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownAction);
        let context = err.context.unwrap();
        assert_eq!(context["events"][0]["index"], 1);
        assert_eq!(context["events"][1]["action"], "drag");
    }
}
