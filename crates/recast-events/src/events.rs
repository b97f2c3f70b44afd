//! Browser interaction events as produced by the recording extension
//!
//! Events are flat records serialized with camelCase keys. The meaning of
//! `value` depends on the action: typed text, a select value, pointer
//! coordinates, a viewport size, a tab id or a screenshot selector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A recording - a name plus the ordered event list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Accepted file shapes: the extension exports a bare array, storage keeps a named object
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordingFile {
    Bare(Vec<Event>),
    Named(Recording),
}

impl Recording {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recorded_at: None,
            events: Vec::new(),
        }
    }

    pub fn with_events(name: impl Into<String>, events: Vec<Event>) -> Self {
        Self {
            events,
            ..Self::new(name)
        }
    }

    /// Parse either a bare JSON array of events or a `{ name, events }` object.
    ///
    /// `fallback_name` is used when the document carries no name of its own.
    pub fn from_json(fallback_name: &str, json: &str) -> serde_json::Result<Self> {
        let recording = match serde_json::from_str::<RecordingFile>(json)? {
            RecordingFile::Bare(events) => Self::with_events(fallback_name, events),
            RecordingFile::Named(mut r) => {
                if r.name.is_empty() {
                    r.name = fallback_name.to_string();
                }
                r
            }
        };
        Ok(recording)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Single recorded interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<EventValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_code: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    /// 0 or absent means the top-level page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_url: Option<String>,
}

impl Event {
    pub fn new(action: impl Into<Action>) -> Self {
        Self {
            action: action.into(),
            selector: None,
            value: None,
            href: None,
            key: None,
            key_code: None,
            tag_name: None,
            frame_id: None,
            frame_url: None,
        }
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn value(mut self, value: impl Into<EventValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn key_code(mut self, code: u32) -> Self {
        self.key_code = Some(code);
        self
    }

    pub fn tag_name(mut self, tag: impl Into<String>) -> Self {
        self.tag_name = Some(tag.into());
        self
    }

    pub fn frame(mut self, id: u64, url: impl Into<String>) -> Self {
        self.frame_id = Some(id);
        self.frame_url = Some(url.into());
        self
    }

    /// Frame id with absent normalized to the top-level page
    pub fn frame_id(&self) -> u64 {
        self.frame_id.unwrap_or(0)
    }

    pub fn is_select(&self) -> bool {
        self.tag_name.as_deref() == Some("SELECT")
    }
}

/// Action tag. Unknown tags are kept verbatim so recordings round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Click,
    DblClick,
    Change,
    Keydown,
    Select,
    Submit,
    Load,
    Unload,
    /// Synthetic: a run of keystrokes collapsed into one assignment
    Fill,
    Goto,
    Viewport,
    Navigation,
    TabCreate,
    TabChange,
    Screenshot,
    Hover,
    MouseMove,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Click => "click",
            Action::DblClick => "dblclick",
            Action::Change => "change",
            Action::Keydown => "keydown",
            Action::Select => "select",
            Action::Submit => "submit",
            Action::Load => "load",
            Action::Unload => "unload",
            Action::Fill => "fill",
            Action::Goto => "GOTO",
            Action::Viewport => "VIEWPORT",
            Action::Navigation => "NAVIGATION",
            Action::TabCreate => "TAB_CREATE",
            Action::TabChange => "TAB_CHANGE",
            Action::Screenshot => "SCREENSHOT",
            Action::Hover => "HOVER",
            Action::MouseMove => "MOUSEMOVE",
            Action::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Action::Other(_))
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        match s {
            "click" => Action::Click,
            "dblclick" => Action::DblClick,
            "change" => Action::Change,
            "keydown" => Action::Keydown,
            "select" => Action::Select,
            "submit" => Action::Submit,
            "load" => Action::Load,
            "unload" => Action::Unload,
            "fill" => Action::Fill,
            "GOTO" => Action::Goto,
            "VIEWPORT" => Action::Viewport,
            "NAVIGATION" => Action::Navigation,
            "TAB_CREATE" => Action::TabCreate,
            "TAB_CHANGE" => Action::TabChange,
            "SCREENSHOT" => Action::Screenshot,
            "HOVER" | "hover" => Action::Hover,
            "MOUSEMOVE" | "mousemove" => Action::MouseMove,
            other => Action::Other(other.to_string()),
        }
    }
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        match Action::from(s.as_str()) {
            Action::Other(_) => Action::Other(s),
            known => known,
        }
    }
}

impl From<Action> for String {
    fn from(a: Action) -> Self {
        match a {
            Action::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polymorphic event payload - shape depends on the action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventValue {
    /// Viewport size
    Size { width: u32, height: u32 },
    /// Pointer coordinates
    Point {
        x: serde_json::Number,
        y: serde_json::Number,
    },
    /// Tab id
    Number(serde_json::Number),
    /// Typed text, select value or screenshot selector
    Text(String),
}

impl EventValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            EventValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Textual rendering used when the value is spliced into typed input.
    /// Structured payloads have no textual form and render empty.
    pub fn to_text(&self) -> String {
        match self {
            EventValue::Text(s) => s.clone(),
            EventValue::Number(n) => n.to_string(),
            EventValue::Size { .. } | EventValue::Point { .. } => String::new(),
        }
    }

    pub fn as_tab_id(&self) -> Option<i64> {
        match self {
            EventValue::Number(n) => n.as_i64(),
            EventValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<(u32, u32)> {
        match self {
            EventValue::Size { width, height } => Some((*width, *height)),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<(&serde_json::Number, &serde_json::Number)> {
        match self {
            EventValue::Point { x, y } => Some((x, y)),
            _ => None,
        }
    }
}

impl From<&str> for EventValue {
    fn from(s: &str) -> Self {
        EventValue::Text(s.to_string())
    }
}

impl From<String> for EventValue {
    fn from(s: String) -> Self {
        EventValue::Text(s)
    }
}

impl From<i64> for EventValue {
    fn from(n: i64) -> Self {
        EventValue::Number(n.into())
    }
}

impl From<i32> for EventValue {
    fn from(n: i32) -> Self {
        EventValue::Number(n.into())
    }
}
