//! Typed view of the style and geometry values a chart needs
//!
//! Everything the engine draws with is resolved here, before the first draw
//! call, so a missing required value aborts the render with its selector
//! instead of surfacing half way through. Cosmetic values fall back to the
//! defaults below.

use crate::config::{Color, ConfigError, ConfigValue};
use crate::records::Script;
use crate::surface::{BaselineShift, InlineStyle, DEFAULT_FONT_FAMILY};

use super::chunk::column_capacity;
use super::error::LayoutError;
use super::types::Point;

/// Opacity of the credits line unless `fonts.credits.opacity` says otherwise
pub const DEFAULT_CREDITS_OPACITY: f64 = 0.5;
/// Width of the column dividers unless `divider.stroke_width` says otherwise
pub const DEFAULT_DIVIDER_STROKE_WIDTH: f64 = 0.5;
/// Fill of `word divider` transcriptions unless configured
pub const DEFAULT_WORD_DIVIDER_FILL: Color = Color::grey(0.5);

/// Name under which the transcription subscript style is registered
pub const SUB_STYLE: &str = "sub";

/// Family, size, tracking and fill of one text role
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    pub family: String,
    pub size: f64,
    pub tracking: f64,
    pub fill: Color,
}

impl FontStyle {
    /// Resolve `fonts.<key>.{family,size,tracking,fill}`; only `size` is required
    fn resolve(config: &ConfigValue, key: &str) -> Result<Self, ConfigError> {
        let sel = |field: &str| format!("fonts.{key}.{field}");
        Ok(Self {
            family: config.str_or(&sel("family"), DEFAULT_FONT_FAMILY)?.to_string(),
            size: config.require_number(&sel("size"))?,
            tracking: config.number_or(&sel("tracking"), 0.0)?,
            fill: config.color_or(&sel("fill"), Color::BLACK)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageStyle {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub background: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreditsStyle {
    pub family: String,
    pub size: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStyle {
    /// Records per column (`col.letters`)
    pub capacity: usize,
    /// Horizontal distance between column origins
    pub width: f64,
    /// Origin of the first column
    pub start: Point,
    /// Vertical advance after each record (`col.offset.y`)
    pub row_spacing: f64,
    /// Distance of the divider left of the column origin (`col.line.offset.x`)
    pub divider_offset_x: f64,
    pub divider_start_y: f64,
    pub divider_end_y: f64,
    pub divider_stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetterStyle {
    pub font: FontStyle,
    pub weight: Option<String>,
    pub small_caps: bool,
    pub italic: bool,
    pub offset: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionStyle {
    pub font: FontStyle,
    pub offset: Point,
    /// Size used for the literal transcription `word divider`
    pub divider_size: f64,
    pub divider_fill: Color,
    pub sub: InlineStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStyle {
    pub font: FontStyle,
    pub offset: Point,
    pub label: FontStyle,
    pub label_offset: Point,
}

/// Every value the layout engine reads from a chart document
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub page: PageStyle,
    pub header: FontStyle,
    pub credits: CreditsStyle,
    pub columns: ColumnStyle,
    pub letter: LetterStyle,
    pub transcription: TranscriptionStyle,
    pub hebrew: ScriptStyle,
    pub arabic: ScriptStyle,
    /// Extra space before the second script when both are present
    /// (`fonts.hebrew.gap_offset.x`)
    pub gap_offset_x: f64,
}

impl ChartStyle {
    pub fn resolve(config: &ConfigValue) -> Result<Self, LayoutError> {
        let header = FontStyle::resolve(config, "header")?;
        let credits = CreditsStyle {
            family: config
                .str_or("fonts.credits.family", &header.family)?
                .to_string(),
            size: config.number_or("fonts.credits.size", header.size / 2.0)?,
            opacity: config.number_or("fonts.credits.opacity", DEFAULT_CREDITS_OPACITY)?,
        };

        let style = Self {
            page: PageStyle {
                width: config.require_number("page.width")?,
                height: config.require_number("page.height")?,
                margin: config.require_number("page.margin")?,
                background: config.color_or("page.background", Color::WHITE)?,
            },
            credits,
            header,
            columns: ColumnStyle {
                capacity: column_capacity(config.require_number("col.letters")?)?,
                width: config.require_number("col.width")?,
                start: required_point(config, "col.start")?,
                row_spacing: config.require_number("col.offset.y")?,
                divider_offset_x: config.require_number("col.line.offset.x")?,
                divider_start_y: config.require_number("divider.start.y")?,
                divider_end_y: config.require_number("divider.end.y")?,
                divider_stroke_width: config
                    .number_or("divider.stroke_width", DEFAULT_DIVIDER_STROKE_WIDTH)?,
            },
            letter: LetterStyle {
                font: FontStyle::resolve(config, "letter")?,
                weight: font_weight(config, "fonts.letter.weight")?,
                small_caps: config.bool_or("fonts.letter.sc", false)?,
                italic: config.bool_or("fonts.letter.italic", false)?,
                offset: optional_point(config, "fonts.letter.offset")?,
            },
            transcription: resolve_transcription(config)?,
            hebrew: resolve_script(config, Script::Hebrew)?,
            arabic: resolve_script(config, Script::Arabic)?,
            gap_offset_x: config.require_number("fonts.hebrew.gap_offset.x")?,
        };
        Ok(style)
    }

    pub fn script(&self, script: Script) -> &ScriptStyle {
        match script {
            Script::Hebrew => &self.hebrew,
            Script::Arabic => &self.arabic,
        }
    }
}

fn resolve_transcription(config: &ConfigValue) -> Result<TranscriptionStyle, ConfigError> {
    let sub_size = config.require_number("fonts.transcription.sub.size")?;
    Ok(TranscriptionStyle {
        font: FontStyle::resolve(config, "transcription")?,
        offset: optional_point(config, "fonts.transcription.offset")?,
        divider_size: config.require_number("fonts.transcription.divider.size")?,
        divider_fill: config.color_or("fonts.transcription.divider.fill", DEFAULT_WORD_DIVIDER_FILL)?,
        sub: InlineStyle {
            size: sub_size,
            leading: config.number_or("fonts.transcription.sub.leading", sub_size)?,
            shift: BaselineShift::Sub,
        },
    })
}

fn resolve_script(config: &ConfigValue, script: Script) -> Result<ScriptStyle, ConfigError> {
    let key = script.name();
    Ok(ScriptStyle {
        font: FontStyle::resolve(config, key)?,
        offset: required_point(config, &format!("fonts.{key}.offset"))?,
        label: FontStyle::resolve(config, &format!("{key}.label"))?,
        label_offset: optional_point(config, &format!("fonts.{key}.label.offset"))?,
    })
}

fn required_point(config: &ConfigValue, prefix: &str) -> Result<Point, ConfigError> {
    Ok(Point::new(
        config.require_number(&format!("{prefix}.x"))?,
        config.require_number(&format!("{prefix}.y"))?,
    ))
}

fn optional_point(config: &ConfigValue, prefix: &str) -> Result<Point, ConfigError> {
    Ok(Point::new(
        config.number_or(&format!("{prefix}.x"), 0.0)?,
        config.number_or(&format!("{prefix}.y"), 0.0)?,
    ))
}

/// A weight is either a keyword (`bold`) or a number (`700`)
fn font_weight(config: &ConfigValue, selector: &str) -> Result<Option<String>, ConfigError> {
    match config.get(selector) {
        None => Ok(None),
        Some(ConfigValue::String(s)) => Ok(Some(s.clone())),
        Some(ConfigValue::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(ConfigError::invalid(
            selector,
            "string or number",
            other.type_name(),
        )),
    }
}
