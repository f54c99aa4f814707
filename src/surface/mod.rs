//! Drawing surfaces the layout engine draws onto
//!
//! A surface carries a current [`DrawState`] (origin, colors, font, alignment)
//! and a stack of saved states. The layout engine never changes state outside
//! a [`DrawingSurface::scoped`] call, so sibling draws cannot observe a
//! translation or style left behind by a previous one.
//!
//! Positions passed to [`DrawingSurface::text`] and [`DrawingSurface::line`]
//! are relative to the current origin. Coordinates are page points with y
//! growing upwards.

pub mod markup;
pub mod recorder;

pub use markup::{parse_spans, Span};
pub use recorder::{DrawOp, Recorder};

use tracing::warn;

use crate::config::Color;
use crate::layout::{Point, TextAnchor};

/// Font used when a chart does not name one
pub const DEFAULT_FONT_FAMILY: &str = "serif";

/// Font selection in force
#[derive(Debug, Clone, PartialEq)]
pub struct FontState {
    pub family: String,
    pub size: f64,
    /// Extra spacing between characters, in points
    pub tracking: f64,
    /// CSS-style weight, e.g. `bold` or `700`
    pub weight: Option<String>,
    pub small_caps: bool,
    pub italic: bool,
}

impl Default for FontState {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: 10.0,
            tracking: 0.0,
            weight: None,
            small_caps: false,
            italic: false,
        }
    }
}

/// Complete drawing state; saved and restored as a unit
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    /// Accumulated translation
    pub origin: Point,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    /// Multiplies the alpha of everything drawn
    pub opacity: f64,
    pub anchor: TextAnchor,
    pub font: FontState,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            origin: Point::ORIGIN,
            fill: Color::BLACK,
            stroke: Color::BLACK,
            stroke_width: 1.0,
            opacity: 1.0,
            anchor: TextAnchor::Start,
            font: FontState::default(),
        }
    }
}

impl DrawState {
    /// Absolute position of a point given relative to the current origin
    pub fn absolute(&self, at: Point) -> Point {
        self.origin + at
    }
}

/// Vertical placement of an inline style span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaselineShift {
    #[default]
    Baseline,
    Sub,
}

/// A named style usable inside rich text as `<name>...</name>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineStyle {
    pub size: f64,
    pub leading: f64,
    pub shift: BaselineShift,
}

/// The current state plus the saved ones
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: DrawState,
    saved: Vec<DrawState>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &DrawState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut DrawState {
        &mut self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pop the last saved state; an unmatched restore is ignored
    pub fn restore(&mut self) {
        match self.saved.pop() {
            Some(state) => self.current = state,
            None => warn!("restore without a matching save"),
        }
    }

    /// Number of saves not yet restored
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// A sink for positioned drawing operations
pub trait DrawingSurface {
    fn stack(&self) -> &StateStack;
    fn stack_mut(&mut self) -> &mut StateStack;

    fn set_page_size(&mut self, width: f64, height: f64);
    fn fill_background(&mut self, color: Color);
    fn register_inline_style(&mut self, name: &str, style: InlineStyle);

    /// Draw plain text at a position relative to the origin
    fn text(&mut self, text: &str, at: Point);

    /// Draw text in which `<name>...</name>` spans use registered inline styles
    fn rich_text(&mut self, text: &str, at: Point);

    /// Stroke a line with the current stroke color and width
    fn line(&mut self, from: Point, to: Point);

    fn state(&self) -> &DrawState {
        self.stack().current()
    }

    fn state_mut(&mut self) -> &mut DrawState {
        self.stack_mut().current_mut()
    }

    fn save(&mut self) {
        self.stack_mut().save();
    }

    fn restore(&mut self) {
        self.stack_mut().restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let origin = &mut self.state_mut().origin;
        origin.x += dx;
        origin.y += dy;
    }

    fn translate_by(&mut self, offset: Point) {
        self.translate(offset.x, offset.y);
    }

    fn set_fill(&mut self, color: Color) {
        self.state_mut().fill = color;
    }

    fn set_stroke(&mut self, color: Color) {
        self.state_mut().stroke = color;
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.state_mut().stroke_width = width;
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.state_mut().opacity = opacity;
    }

    fn set_anchor(&mut self, anchor: TextAnchor) {
        self.state_mut().anchor = anchor;
    }

    fn set_font(&mut self, family: &str) {
        self.state_mut().font.family = family.to_string();
    }

    fn set_font_size(&mut self, size: f64) {
        self.state_mut().font.size = size;
    }

    fn set_tracking(&mut self, tracking: f64) {
        self.state_mut().font.tracking = tracking;
    }

    fn set_font_weight(&mut self, weight: Option<&str>) {
        self.state_mut().font.weight = weight.map(str::to_string);
    }

    fn set_small_caps(&mut self, small_caps: bool) {
        self.state_mut().font.small_caps = small_caps;
    }

    fn set_italic(&mut self, italic: bool) {
        self.state_mut().font.italic = italic;
    }

    /// Run `draw` with the current state saved, restoring it afterwards.
    ///
    /// The state is restored whether `draw` returns `Ok` or `Err`.
    fn scoped<R, E>(&mut self, draw: impl FnOnce(&mut Self) -> Result<R, E>) -> Result<R, E>
    where
        Self: Sized,
    {
        self.save();
        let result = draw(self);
        self.restore();
        result
    }
}
