//! SVG drawing surface
//!
//! Chart coordinates have their origin at the bottom-left of the page with y
//! growing upwards; SVG has it at the top-left with y growing downwards, so
//! every y is flipped against the page height on output.

use std::collections::BTreeMap;

use crate::config::Color;
use crate::layout::Point;
use crate::surface::{
    parse_spans, BaselineShift, DrawState, DrawingSurface, InlineStyle, StateStack,
};

use super::SvgConfig;

/// Build an SVG document from drawing calls
pub struct SvgSurface {
    config: SvgConfig,
    stack: StateStack,
    width: f64,
    height: f64,
    inline_styles: BTreeMap<String, InlineStyle>,
    elements: Vec<String>,
}

impl SvgSurface {
    /// Create a new SVG surface
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            stack: StateStack::new(),
            width: 0.0,
            height: 0.0,
            inline_styles: BTreeMap::new(),
            elements: vec![],
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> &str {
        if self.config.pretty_print {
            "  "
        } else {
            ""
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn num(&self, value: f64) -> String {
        format_number(value, self.config.precision)
    }

    /// Absolute SVG coordinates of a point relative to the current origin
    fn svg_point(&self, at: Point) -> (String, String) {
        let abs = self.state().absolute(at);
        (self.num(abs.x), self.num(self.height - abs.y))
    }

    /// Font and fill attributes of the current state
    fn text_attributes(&self) -> String {
        let state = self.state();
        let font = &state.font;
        let mut attrs = format!(
            r#" text-anchor="{}" font-family="{}" font-size="{}""#,
            state.anchor.as_str(),
            escape_xml(&font.family),
            self.num(font.size)
        );
        if font.tracking != 0.0 {
            attrs.push_str(&format!(r#" letter-spacing="{}""#, self.num(font.tracking)));
        }
        if let Some(weight) = &font.weight {
            attrs.push_str(&format!(r#" font-weight="{}""#, escape_xml(weight)));
        }
        if font.small_caps {
            attrs.push_str(r#" font-variant="small-caps""#);
        }
        if font.italic {
            attrs.push_str(r#" font-style="italic""#);
        }
        attrs.push_str(&paint_attributes("fill", state.fill, state.opacity));
        attrs
    }

    fn push_text(&mut self, body: String, at: Point, rich: bool) {
        let prefix = self.prefix();
        let (x, y) = self.svg_point(at);
        let class = if rich {
            format!("{prefix}text {prefix}rich")
        } else {
            format!("{prefix}text")
        };
        self.elements.push(format!(
            r#"{}<text class="{}" x="{}" y="{}"{}>{}</text>"#,
            self.indent_str(),
            class,
            x,
            y,
            self.text_attributes(),
            body
        ));
    }

    fn styled_span(&self, text: &str, name: &str) -> String {
        let prefix = self.prefix();
        let Some(style) = self.inline_styles.get(name) else {
            return escape_xml(text);
        };
        let shift = match style.shift {
            BaselineShift::Baseline => String::new(),
            BaselineShift::Sub => r#" baseline-shift="sub""#.to_string(),
        };
        format!(
            r#"<tspan class="{}inline-{}" font-size="{}"{}>{}</tspan>"#,
            prefix,
            name,
            self.num(style.size),
            shift,
            escape_xml(text)
        )
    }

    /// Build the final SVG string
    pub fn finish(self) -> String {
        let nl = self.newline();
        let prefix = self.prefix();
        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.num(self.width),
            h = self.num(self.height)
        ));
        svg.push_str(nl);

        if !self.inline_styles.is_empty() {
            svg.push_str(self.indent_str());
            svg.push_str("<style>");
            svg.push_str(nl);
            for (name, style) in &self.inline_styles {
                svg.push_str(&format!(
                    "{}{}.{}inline-{} {{ font-size: {}px; line-height: {}px; }}",
                    self.indent_str(),
                    self.indent_str(),
                    prefix,
                    name,
                    self.num(style.size),
                    self.num(style.leading)
                ));
                svg.push_str(nl);
            }
            svg.push_str(self.indent_str());
            svg.push_str("</style>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

impl DrawingSurface for SvgSurface {
    fn stack(&self) -> &StateStack {
        &self.stack
    }

    fn stack_mut(&mut self) -> &mut StateStack {
        &mut self.stack
    }

    fn set_page_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn fill_background(&mut self, color: Color) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r#"{}<rect class="{}background" x="0" y="0" width="{}" height="{}"{}/>"#,
            self.indent_str(),
            prefix,
            self.num(self.width),
            self.num(self.height),
            paint_attributes("fill", color, 1.0)
        ));
    }

    fn register_inline_style(&mut self, name: &str, style: InlineStyle) {
        self.inline_styles.insert(name.to_string(), style);
    }

    fn text(&mut self, text: &str, at: Point) {
        self.push_text(escape_xml(text), at, false);
    }

    fn rich_text(&mut self, text: &str, at: Point) {
        let body: String = parse_spans(text, |name| self.inline_styles.contains_key(name))
            .into_iter()
            .map(|span| match span.style {
                Some(name) => self.styled_span(span.text, name),
                None => escape_xml(span.text),
            })
            .collect();
        self.push_text(body, at, true);
    }

    fn line(&mut self, from: Point, to: Point) {
        let prefix = self.prefix();
        let (x1, y1) = self.svg_point(from);
        let (x2, y2) = self.svg_point(to);
        let state: &DrawState = self.state();
        let stroke = format!(
            r#"{} stroke-width="{}""#,
            paint_attributes("stroke", state.stroke, state.opacity),
            self.num(state.stroke_width)
        );
        self.elements.push(format!(
            r#"{}<line class="{}line" x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            self.indent_str(),
            prefix,
            x1,
            y1,
            x2,
            y2,
            stroke
        ));
    }
}

/// `fill="#rrggbb"` plus an opacity attribute when not fully opaque
fn paint_attributes(attr: &str, color: Color, opacity: f64) -> String {
    let alpha = color.a * opacity;
    let mut out = format!(r#" {}="{}""#, attr, color.to_hex());
    if alpha < 1.0 {
        out.push_str(&format!(
            r#" {}-opacity="{}""#,
            attr,
            format_number(alpha, 3)
        ));
    }
    out
}

/// Format a number with at most `precision` decimals and no trailing zeros
fn format_number(value: f64, precision: usize) -> String {
    let s = format!("{:.*}", precision, value);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
