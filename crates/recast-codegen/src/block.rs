//! Line/block intermediate form emitted by the generators

use recast_events::Action;

/// What produced a line. `None` on a [`Line`] marks a blank spacer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Action(Action),
    NavigationPromise,
    FrameSet,
}

/// One code fragment. A fragment may span several physical lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: Option<LineKind>,
    pub value: String,
    /// Frame of the owning block
    pub frame_id: u64,
}

impl Line {
    pub fn is_blank(&self) -> bool {
        self.kind.is_none()
    }
}

/// Ordered group of lines sharing the frame that was active when it was built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    frame_id: u64,
    lines: Vec<Line>,
}

impl Block {
    pub fn new(frame_id: u64) -> Self {
        Self {
            frame_id,
            lines: Vec::new(),
        }
    }

    /// Block holding a single line
    pub fn with_line(frame_id: u64, kind: LineKind, value: impl Into<String>) -> Self {
        let mut block = Self::new(frame_id);
        block.push(kind, value);
        block
    }

    /// Spacer rendered as one empty line
    pub fn blank() -> Self {
        let mut block = Self::new(0);
        block.lines.push(Line {
            kind: None,
            value: String::new(),
            frame_id: 0,
        });
        block
    }

    pub fn push(&mut self, kind: LineKind, value: impl Into<String>) {
        self.lines.push(self.line(kind, value.into()));
    }

    /// Insert at the head of the block
    pub fn prepend(&mut self, kind: LineKind, value: impl Into<String>) {
        let line = self.line(kind, value.into());
        self.lines.insert(0, line);
    }

    fn line(&self, kind: LineKind, value: String) -> Line {
        Line {
            kind: Some(kind),
            value,
            frame_id: self.frame_id,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// True for blocks made by [`Block::blank`]
    pub fn is_spacer(&self) -> bool {
        matches!(self.lines.as_slice(), [line] if line.is_blank())
    }
}
