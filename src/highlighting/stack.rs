//! The stack of modes active at the current position

use std::sync::Arc;

use fancy_regex::Regex;

use crate::compiler::ModeIdx;

/// An active mode. Its parent is whichever frame sits below it on the stack.
#[derive(Debug, Clone)]
pub struct Frame {
    pub mode: ModeIdx,
    /// End pattern fixed when the frame was entered, overriding the mode's
    /// own. Set for modes that end with the same text they began with.
    pub end: Option<Arc<Regex>>,
}

impl Frame {
    pub fn new(mode: ModeIdx) -> Frame {
        Frame { mode, end: None }
    }
}

/// Frames from the grammar root (at the bottom, never removed) up to the
/// current mode.
#[derive(Debug, Clone)]
pub struct Stack {
    root: Frame,
    open: Vec<Frame>,
}

impl Stack {
    pub fn new() -> Stack {
        Stack {
            root: Frame::new(ModeIdx::ROOT),
            open: Vec::new(),
        }
    }

    pub fn current(&self) -> &Frame {
        self.open
            .last()
            .unwrap_or(&self.root)
    }

    /// Index of the current frame; 0 is the root.
    pub fn depth(&self) -> usize {
        self.open
            .len()
    }

    pub fn get(&self, depth: usize) -> Option<&Frame> {
        match depth {
            0 => Some(&self.root),
            _ => self
                .open
                .get(depth - 1),
        }
    }

    pub fn push(&mut self, frame: Frame) {
        self.open
            .push(frame);
    }

    /// Remove the current frame. The root stays put.
    pub fn pop(&mut self) -> Option<Frame> {
        self.open
            .pop()
    }

    /// Frames opened above the root, innermost last.
    pub fn open(&self) -> std::slice::Iter<'_, Frame> {
        self.open
            .iter()
    }
}

impl Default for Stack {
    fn default() -> Self {
        Stack::new()
    }
}

/// The state a highlight call finished in, so that a later call on the text
/// that follows can carry on inside the same mode.
#[derive(Debug, Clone)]
pub struct Continuation {
    pub(crate) language: String,
    pub(crate) stack: Stack,
}

impl Continuation {
    pub fn language(&self) -> &str {
        &self.language
    }

    /// How many modes deep the call finished; 0 means back at the root.
    pub fn depth(&self) -> usize {
        self.stack
            .depth()
    }

    /// The mode the call finished in.
    pub fn current(&self) -> ModeIdx {
        self.stack
            .current()
            .mode
    }
}
