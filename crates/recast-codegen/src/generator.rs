//! Shared traversal engine for the script generators
//!
//! A [`Generator`] walks an optimized event list once, turning each event
//! into a [`Block`]. Two post-processing passes then hoist frame lookups to
//! their first use and space the statements out, and the blocks are
//! flattened between the backend's header and footer.
//!
//! Everything that differs between automation libraries sits behind the
//! [`Backend`] trait. Per-run state lives in a session value created for
//! each `generate` call, so one generator can be reused freely.

use crate::block::{Block, LineKind};
use crate::keys::key_code_name;
use crate::options::GeneratorOptions;
use recast_events::{Action, Event};
use std::collections::BTreeMap;
use tracing::{debug, trace};

const TOP_FRAME: &str = "page";
const INDENT: &str = "  ";

/// Library-specific code shapes.
///
/// `viewport` and `select_option` have no default: every backend must say
/// how its library spells them.
pub trait Backend {
    fn name(&self) -> &'static str;

    /// Module import emitted before the header
    fn import(&self) -> &'static str;

    /// Browser launch and page setup. Must bind `browser`, `context` and a
    /// reassignable `page`, and contain a literal `launch()` call.
    fn header(&self) -> &'static str;

    fn footer(&self) -> &'static str;

    fn wrapped_header(&self) -> String {
        format!("(async () => {{\n{}", indent(self.header()))
    }

    fn wrapped_footer(&self) -> String {
        format!("{}\n}})()", indent(self.footer()))
    }

    fn viewport(&self, frame: &str, width: u32, height: u32) -> String;

    /// `selector` and `value` arrive already escaped for a quoted literal
    fn select_option(&self, frame: &str, selector: &str, value: &str) -> String;

    /// Extra line appended to every click block
    fn after_click(&self, _options: &GeneratorOptions) -> Option<String> {
        None
    }
}

/// Mutable state for one generation run
#[derive(Debug)]
struct Session {
    /// Name bound to the current frame: `page` or `frame_<id>`
    frame: String,
    frame_id: u64,
    /// Frames seen but not yet declared, id -> url
    all_frames: BTreeMap<u64, String>,
    /// Tab creation order. The first tab of a session has id 0.
    tab_ids: Vec<i64>,
    screenshot_counter: u32,
    has_navigation: bool,
    blocks: Vec<Block>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            frame: TOP_FRAME.to_string(),
            frame_id: 0,
            all_frames: BTreeMap::new(),
            tab_ids: vec![0],
            screenshot_counter: 0,
            has_navigation: false,
            blocks: Vec::new(),
        }
    }
}

impl Session {
    fn set_frame(&mut self, event: &Event) {
        match event.frame_id() {
            0 => {
                self.frame_id = 0;
                self.frame = TOP_FRAME.to_string();
            }
            id => {
                self.frame_id = id;
                self.frame = format!("frame_{}", id);
                let url = self.all_frames.entry(id).or_default();
                if let Some(frame_url) = &event.frame_url {
                    url.clone_from(frame_url);
                }
            }
        }
    }

    fn tab_index(&self, tab_id: i64) -> usize {
        self.tab_ids.iter().position(|&t| t == tab_id).unwrap_or(0)
    }
}

pub struct Generator<B> {
    backend: B,
    options: GeneratorOptions,
}

impl<B: Backend> Generator<B> {
    pub fn new(backend: B, options: GeneratorOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Produce the complete script for an optimized event list.
    pub fn generate(&self, events: &[Event]) -> String {
        let blocks = self.blocks(events);
        let mut out = String::new();
        out.push_str(self.backend.import());
        out.push('\n');
        out.push_str(&self.header());
        // A leading spacer already ends the header line
        if !blocks.first().is_some_and(Block::is_spacer) {
            out.push('\n');
        }

        let prefix = if self.options.wrap_async { INDENT } else { "" };
        for line in blocks.iter().flat_map(Block::lines) {
            for physical in line.value.split('\n') {
                if !physical.is_empty() {
                    out.push_str(prefix);
                    out.push_str(physical);
                }
                out.push('\n');
            }
        }

        out.push_str(&self.footer());
        out.push('\n');
        out
    }

    /// Run the traversal and both post-processing passes without rendering.
    pub fn blocks(&self, events: &[Event]) -> Vec<Block> {
        let mut session = Session::default();

        for (index, event) in events.iter().enumerate() {
            session.set_frame(event);
            if let Some(block) = self.handle(&mut session, events, index) {
                session.blocks.push(block);
            }
        }

        if session.has_navigation && self.options.wait_for_navigation {
            // Must precede every await on it
            let promise = Block::with_line(
                0,
                LineKind::NavigationPromise,
                "const navigationPromise = page.waitForNavigation()",
            );
            session.blocks.insert(0, promise);
        }

        debug!(
            backend = self.backend.name(),
            events = events.len(),
            blocks = session.blocks.len(),
            frames = session.all_frames.len(),
            tabs = session.tab_ids.len(),
            "generated blocks"
        );

        declare_frames(&mut session);
        if self.options.blank_lines_between_blocks && !session.blocks.is_empty() {
            add_blank_lines(&mut session);
        }
        session.blocks
    }

    fn header(&self) -> String {
        let header = if self.options.wrap_async {
            self.backend.wrapped_header()
        } else {
            self.backend.header().to_string()
        };
        if self.options.headless {
            header
        } else {
            header.replace("launch()", "launch({ headless: false })")
        }
    }

    fn footer(&self) -> String {
        if self.options.wrap_async {
            self.backend.wrapped_footer()
        } else {
            self.backend.footer().to_string()
        }
    }

    fn handle(&self, session: &mut Session, events: &[Event], index: usize) -> Option<Block> {
        let event = &events[index];
        match &event.action {
            Action::Keydown => Some(self.keydown(session, event, events.get(index + 1))),
            Action::Hover => Some(self.hover(session, event)),
            Action::MouseMove => self.mouse_move(session, event),
            Action::Click => Some(self.click(session, event, events.get(index + 1))),
            Action::Change if event.is_select() => Some(self.change(session, event)),
            Action::Fill => Some(self.fill(session, event)),
            Action::Goto => self.goto(session, event),
            Action::Viewport => self.viewport(session, event),
            Action::Navigation => {
                session.has_navigation = true;
                Some(self.wait_for_navigation(session))
            }
            Action::TabCreate => Some(self.tab_create(session, event)),
            Action::TabChange => Some(self.tab_change(session, event)),
            Action::Screenshot => Some(self.screenshot(session, event)),
            Action::Change
            | Action::DblClick
            | Action::Select
            | Action::Submit
            | Action::Load
            | Action::Unload => None,
            Action::Other(tag) => {
                trace!(index, action = %tag, "ignoring unknown action");
                None
            }
        }
    }

    fn keydown(&self, session: &Session, event: &Event, next: Option<&Event>) -> Block {
        let frame = &session.frame;
        let key = event
            .key
            .as_deref()
            .or_else(|| event.key_code.and_then(key_code_name))
            .unwrap_or(&self.options.key);
        let key = escape(key);
        let press = format!("{}.keyboard.press('{}')", frame, key);
        let value = if opens_popup(next) {
            popup(&press)
        } else {
            format!("await {}", press)
        };
        Block::with_line(session.frame_id, LineKind::Action(Action::Keydown), value)
    }

    fn fill(&self, session: &Session, event: &Event) -> Block {
        let value = event.value.as_ref().map(|v| v.to_text()).unwrap_or_default();
        Block::with_line(
            session.frame_id,
            LineKind::Action(Action::Fill),
            format!(
                "await {}.fill('{}', '{}')",
                session.frame,
                selector(event),
                escape(&value)
            ),
        )
    }

    fn hover(&self, session: &Session, event: &Event) -> Block {
        Block::with_line(
            session.frame_id,
            LineKind::Action(Action::Hover),
            format!("await {}.hover('{}')", session.frame, selector(event)),
        )
    }

    fn mouse_move(&self, session: &Session, event: &Event) -> Option<Block> {
        let (x, y) = event.value.as_ref()?.as_point()?;
        Some(Block::with_line(
            session.frame_id,
            LineKind::Action(Action::MouseMove),
            format!(
                "await {}.mouse.move({}, {}, {{ steps: 100 }}) // {}",
                session.frame,
                x,
                y,
                event.selector.as_deref().unwrap_or_default()
            ),
        ))
    }

    fn click(&self, session: &Session, event: &Event, next: Option<&Event>) -> Block {
        let frame = &session.frame;
        let target = selector(event);
        let kind = || LineKind::Action(Action::Click);
        let mut block = Block::new(session.frame_id);

        if self.options.wait_for_selector_on_click {
            block.push(kind(), format!("await {}.waitForSelector('{}')", frame, target));
        }
        let click = format!("{}.click('{}')", frame, target);
        if opens_popup(next) {
            block.push(kind(), popup(&click));
        } else {
            block.push(kind(), format!("await {}", click));
        }
        if let Some(line) = self.backend.after_click(&self.options) {
            block.push(kind(), line);
        }
        block
    }

    fn change(&self, session: &Session, event: &Event) -> Block {
        let value = event.value.as_ref().map(|v| v.to_text()).unwrap_or_default();
        Block::with_line(
            session.frame_id,
            LineKind::Action(Action::Change),
            self.backend
                .select_option(&session.frame, &selector(event), &escape(&value)),
        )
    }

    fn goto(&self, session: &Session, event: &Event) -> Option<Block> {
        let href = event.href.as_deref()?;
        Some(Block::with_line(
            session.frame_id,
            LineKind::Action(Action::Goto),
            format!("await {}.goto('{}')", session.frame, escape(href)),
        ))
    }

    fn viewport(&self, session: &Session, event: &Event) -> Option<Block> {
        let (width, height) = event.value.as_ref()?.as_size()?;
        Some(Block::with_line(
            session.frame_id,
            LineKind::Action(Action::Viewport),
            self.backend.viewport(&session.frame, width, height),
        ))
    }

    fn wait_for_navigation(&self, session: &Session) -> Block {
        let mut block = Block::new(session.frame_id);
        if self.options.wait_for_navigation {
            block.push(LineKind::Action(Action::Navigation), "await navigationPromise");
        }
        block
    }

    /// Tab creation is a side effect of the action before it, so no code here
    fn tab_create(&self, session: &mut Session, event: &Event) -> Block {
        if let Some(id) = event.value.as_ref().and_then(|v| v.as_tab_id()) {
            session.tab_ids.push(id);
        }
        Block::new(session.frame_id)
    }

    fn tab_change(&self, session: &Session, event: &Event) -> Block {
        let mut block = Block::new(session.frame_id);
        if let Some(id) = event.value.as_ref().and_then(|v| v.as_tab_id()) {
            let kind = || LineKind::Action(Action::TabChange);
            block.push(kind(), format!("page = context.pages()[{}]", session.tab_index(id)));
            block.push(kind(), "await page.bringToFront()");
        }
        block
    }

    fn screenshot(&self, session: &mut Session, event: &Event) -> Block {
        session.screenshot_counter += 1;
        let n = session.screenshot_counter;
        let kind = || LineKind::Action(Action::Screenshot);
        let mut block = Block::new(session.frame_id);

        match event.value.as_ref().and_then(|v| v.as_text()).filter(|s| !s.is_empty()) {
            Some(target) => {
                block.push(
                    kind(),
                    format!("const element{} = await page.$('{}')", n, escape(target)),
                );
                block.push(
                    kind(),
                    format!("await element{}.screenshot({{ path: 'screenshot_{}.png' }})", n, n),
                );
            }
            None => block.push(
                kind(),
                format!(
                    "await {}.screenshot({{ path: 'screenshot_{}.png', fullPage: true }})",
                    session.frame, n
                ),
            ),
        }
        block
    }
}

/// Prepend a frame lookup to the first block using each undeclared frame.
fn declare_frames(session: &mut Session) {
    let mut frames_bound = false;
    for block in &mut session.blocks {
        if session.all_frames.is_empty() {
            break;
        }
        let Some(id) = block
            .lines()
            .iter()
            .map(|l| l.frame_id)
            .find(|id| *id != 0 && session.all_frames.contains_key(id))
        else {
            continue;
        };
        let url = session.all_frames.remove(&id).unwrap_or_default();

        block.prepend(
            LineKind::FrameSet,
            format!("const frame_{} = frames.find(f => f.url() === '{}')", id, escape(&url)),
        );
        let fetch = if frames_bound {
            "frames = await page.frames()"
        } else {
            "let frames = await page.frames()"
        };
        block.prepend(LineKind::FrameSet, fetch);
        frames_bound = true;
    }
}

/// Surround every block with spacer blocks.
fn add_blank_lines(session: &mut Session) {
    let blocks = std::mem::take(&mut session.blocks);
    session.blocks.reserve(blocks.len() * 2 + 1);
    session.blocks.push(Block::blank());
    for block in blocks {
        session.blocks.push(block);
        session.blocks.push(Block::blank());
    }
}

fn opens_popup(next: Option<&Event>) -> bool {
    next.is_some_and(|e| e.action == Action::TabCreate)
}

/// Run `trigger` while waiting for the page it opens, then switch to it
fn popup(trigger: &str) -> String {
    format!(
        "{{\n  const [newPage] = await Promise.all([\n    page.waitForEvent('popup'),\n    {},\n  ])\n  page = newPage\n}}",
        trigger
    )
}

fn selector(event: &Event) -> String {
    escape(event.selector.as_deref().unwrap_or_default())
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| if l.is_empty() { String::new() } else { format!("{}{}", INDENT, l) })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Make `value` safe inside a single-quoted literal.
///
/// Backslashes are escaped before quotes so the quote escapes survive.
pub fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
