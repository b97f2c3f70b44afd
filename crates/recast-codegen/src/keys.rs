//! Keyboard `key` value classification
//!
//! Values follow the DOM `KeyboardEvent.key` naming. Older recordings only
//! carry `keyCode`, which is classified through the legacy code table.

/// How a keydown participates in fill merging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// No key or code recorded (change events, synthetic input)
    Null,
    /// Produces exactly one character
    Printable,
    /// Placeholder reported while an IME composition is in progress
    ImeComposition,
    /// Enter, navigation keys, modifiers, function keys
    Other,
}

impl KeyKind {
    pub fn classify(key: Option<&str>) -> Self {
        match key {
            None => KeyKind::Null,
            Some(k) if is_ime_composition_key(k) => KeyKind::ImeComposition,
            Some(k) if is_printable_key(k) => KeyKind::Printable,
            Some(_) => KeyKind::Other,
        }
    }

    /// Classify by `key`, falling back to `keyCode` when no key was recorded.
    ///
    /// A code alone never contributes a character: only the recorded value
    /// carries the text, so character codes count as [`KeyKind::Null`].
    pub fn of(key: Option<&str>, key_code: Option<u32>) -> Self {
        match (key, key_code) {
            (Some(_), _) | (None, None) => Self::classify(key),
            (None, Some(IME_KEY_CODE)) => KeyKind::ImeComposition,
            (None, Some(code)) if is_control_key_code(code) => KeyKind::Other,
            (None, Some(_)) => KeyKind::Null,
        }
    }

    /// Null, printable and IME keys are folded into fill events
    pub fn is_mergeable(self) -> bool {
        !matches!(self, KeyKind::Other)
    }
}

const MODIFIER_KEYS: &[&str] = &[
    "Alt",
    "AltGraph",
    "CapsLock",
    "Control",
    "Fn",
    "FnLock",
    "Hyper",
    "Meta",
    "NumLock",
    "ScrollLock",
    "Shift",
    "Super",
    "Symbol",
    "SymbolLock",
];

/// `keyCode` reported for every keystroke of an IME composition
pub const IME_KEY_CODE: u32 = 229;

/// Legacy key codes that never produce text
pub fn is_control_key_code(code: u32) -> bool {
    matches!(
        code,
        8 | 9 | 12 | 13 // backspace, tab, clear, enter
            | 16..=20 // shift, control, alt, pause, caps lock
            | 27 // escape
            | 33..=40 // page up/down, end, home, arrows
            | 44..=46 // print screen, insert, delete
            | 91..=93 // meta, context menu
            | 112..=135 // F1-F24
            | 144 | 145 // num lock, scroll lock
    )
}

/// DOM key name for a legacy control key code
pub fn key_code_name(code: u32) -> Option<&'static str> {
    let name = match code {
        8 => "Backspace",
        9 => "Tab",
        13 => "Enter",
        16 => "Shift",
        17 => "Control",
        18 => "Alt",
        27 => "Escape",
        33 => "PageUp",
        34 => "PageDown",
        35 => "End",
        36 => "Home",
        37 => "ArrowLeft",
        38 => "ArrowUp",
        39 => "ArrowRight",
        40 => "ArrowDown",
        45 => "Insert",
        46 => "Delete",
        91 => "Meta",
        112..=123 => return Some(FUNCTION_KEYS[(code - 112) as usize]),
        _ => return None,
    };
    Some(name)
}

const FUNCTION_KEYS: [&str; 12] = [
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
];

pub fn is_printable_key(key: &str) -> bool {
    key.chars().count() == 1
}

pub fn is_ime_composition_key(key: &str) -> bool {
    key == "Process"
}

pub fn is_modifier_key(key: &str) -> bool {
    MODIFIER_KEYS.contains(&key)
}
