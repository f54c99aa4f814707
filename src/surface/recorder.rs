//! A surface that records what would be drawn
//!
//! Every operation is stored with absolute coordinates and a snapshot of the
//! drawing state in force, which makes layouts easy to inspect in tests and
//! in `--debug` output.

use std::collections::BTreeMap;

use tracing::trace;

use super::{DrawState, DrawingSurface, InlineStyle, StateStack};
use crate::config::Color;
use crate::layout::Point;

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    PageSize {
        width: f64,
        height: f64,
    },
    Background {
        color: Color,
    },
    InlineStyle {
        name: String,
        style: InlineStyle,
    },
    Text {
        text: String,
        at: Point,
        rich: bool,
        state: DrawState,
    },
    Line {
        from: Point,
        to: Point,
        state: DrawState,
    },
}

/// Records operations instead of drawing them
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    stack: StateStack,
    ops: Vec<DrawOp>,
    inline_styles: BTreeMap<String, InlineStyle>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn inline_style(&self, name: &str) -> Option<&InlineStyle> {
        self.inline_styles.get(name)
    }

    /// Text operations as `(text, absolute position, state)`
    pub fn texts(&self) -> impl Iterator<Item = (&str, Point, &DrawState)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, at, state, .. } => Some((text.as_str(), *at, state)),
            _ => None,
        })
    }

    /// Line operations as `(from, to)` in absolute coordinates
    pub fn lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }

    /// The first text operation drawing exactly `text`
    pub fn find_text(&self, text: &str) -> Option<(Point, &DrawState)> {
        self.texts()
            .find(|(t, _, _)| *t == text)
            .map(|(_, at, state)| (at, state))
    }

    fn push(&mut self, op: DrawOp) {
        trace!(?op, "draw");
        self.ops.push(op);
    }
}

impl DrawingSurface for Recorder {
    fn stack(&self) -> &StateStack {
        &self.stack
    }

    fn stack_mut(&mut self) -> &mut StateStack {
        &mut self.stack
    }

    fn set_page_size(&mut self, width: f64, height: f64) {
        self.push(DrawOp::PageSize { width, height });
    }

    fn fill_background(&mut self, color: Color) {
        self.push(DrawOp::Background { color });
    }

    fn register_inline_style(&mut self, name: &str, style: InlineStyle) {
        self.inline_styles.insert(name.to_string(), style);
        self.push(DrawOp::InlineStyle {
            name: name.to_string(),
            style,
        });
    }

    fn text(&mut self, text: &str, at: Point) {
        let state = self.state().clone();
        self.push(DrawOp::Text {
            text: text.to_string(),
            at: state.absolute(at),
            rich: false,
            state,
        });
    }

    fn rich_text(&mut self, text: &str, at: Point) {
        let state = self.state().clone();
        self.push(DrawOp::Text {
            text: text.to_string(),
            at: state.absolute(at),
            rich: true,
            state,
        });
    }

    fn line(&mut self, from: Point, to: Point) {
        let state = self.state().clone();
        self.push(DrawOp::Line {
            from: state.absolute(from),
            to: state.absolute(to),
            state,
        });
    }
}
