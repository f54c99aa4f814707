//! The chart layout engine
//!
//! Drawing happens in nested scopes, each of which restores the surface state
//! on exit:
//!
//! ```text
//! page
//! ├── header            label (left) and credits (right)
//! └── column i          origin at col.start + (i * col.width, 0), divider when i > 0
//!     └── record        advanced by col.offset.y after each record
//!         ├── glyph
//!         ├── transcription
//!         ├── hebrew    text, then caption
//!         └── arabic    text, then caption; shifted past hebrew when both are present
//! ```

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::chart::Chart;
use crate::config::Color;
use crate::placeholder::expand;
use crate::records::{LetterRecord, Script};
use crate::surface::DrawingSurface;

use super::chunk::chunk;
use super::error::LayoutError;
use super::style::{ChartStyle, FontStyle, SUB_STYLE};
use super::types::{Point, TextAnchor};

/// Transcription value drawn in the word-divider style
pub const WORD_DIVIDER: &str = "word divider";

/// Lays out one chart onto a drawing surface
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine<'a> {
    style: &'a ChartStyle,
    today: NaiveDate,
}

impl<'a> LayoutEngine<'a> {
    /// `today` is what `{date}` expands to
    pub fn new(style: &'a ChartStyle, today: NaiveDate) -> Self {
        Self { style, today }
    }

    /// Draw the whole chart
    pub fn render<S: DrawingSurface>(&self, chart: &Chart, surface: &mut S) -> Result<(), LayoutError> {
        let page = &self.style.page;
        surface.set_page_size(page.width, page.height);
        surface.fill_background(page.background);

        surface.scoped(|s| self.draw_header(chart, s))?;
        surface.register_inline_style(SUB_STYLE, self.style.transcription.sub);

        let columns = chunk(&chart.records, self.style.columns.capacity)?;
        let mut count = 0;
        for (index, column) in columns.enumerate() {
            surface.scoped(|s| self.draw_column(index, column, s))?;
            count += 1;
        }
        info!(
            columns = count,
            records = chart.records.len(),
            "chart laid out"
        );
        Ok(())
    }

    fn draw_header<S: DrawingSurface>(&self, chart: &Chart, surface: &mut S) -> Result<(), LayoutError> {
        let page = &self.style.page;
        let top = page.height - page.margin;

        surface.scoped(|s| {
            apply_font(s, &self.style.header);
            s.text(&self.expand(&chart.label), Point::new(page.margin, top));
            Ok::<_, LayoutError>(())
        })?;

        if chart.credits.is_empty() {
            return Ok(());
        }
        surface.scoped(|s| {
            let credits = &self.style.credits;
            s.set_font(&credits.family);
            s.set_font_size(credits.size);
            s.set_italic(true);
            s.set_opacity(credits.opacity);
            s.set_anchor(TextAnchor::End);
            s.text(&self.expand(&chart.credits), Point::new(page.width - page.margin, top));
            Ok(())
        })
    }

    fn draw_column<S: DrawingSurface>(
        &self,
        index: usize,
        records: &[LetterRecord],
        surface: &mut S,
    ) -> Result<(), LayoutError> {
        let columns = &self.style.columns;
        surface.translate(
            columns.start.x + index as f64 * columns.width,
            columns.start.y,
        );
        debug!(index, records = records.len(), origin = ?surface.state().origin, "column");

        if index > 0 {
            surface.scoped(|s| {
                s.set_stroke(Color::BLACK);
                s.set_stroke_width(columns.divider_stroke_width);
                let x = -columns.divider_offset_x;
                s.line(
                    Point::new(x, columns.divider_start_y),
                    Point::new(x, columns.divider_end_y),
                );
                Ok::<_, LayoutError>(())
            })?;
        }

        for record in records {
            surface.scoped(|s| self.draw_record(record, s))?;
            surface.translate(0.0, columns.row_spacing);
        }
        Ok(())
    }

    fn draw_record<S: DrawingSurface>(&self, record: &LetterRecord, surface: &mut S) -> Result<(), LayoutError> {
        surface.scoped(|s| self.draw_glyph(record, s))?;
        surface.scoped(|s| self.draw_transcription(record, s))?;
        for script in Script::ALL {
            surface.scoped(|s| self.draw_script(record, script, s))?;
        }
        Ok(())
    }

    fn draw_glyph<S: DrawingSurface>(&self, record: &LetterRecord, surface: &mut S) -> Result<(), LayoutError> {
        let letter = &self.style.letter;
        surface.set_anchor(TextAnchor::Middle);
        surface.set_tracking(record.tracking.unwrap_or(letter.font.tracking));
        surface.translate_by(letter.offset);
        if let Some(offset) = record.offset {
            surface.translate_by(offset);
        }
        surface.set_font(&letter.font.family);
        surface.set_font_size(letter.font.size);
        surface.set_font_weight(letter.weight.as_deref());
        surface.set_small_caps(letter.small_caps);
        surface.set_italic(letter.italic);
        surface.set_fill(Color::BLACK);
        surface.text(&self.expand(&record.letter), Point::ORIGIN);
        Ok(())
    }

    fn draw_transcription<S: DrawingSurface>(
        &self,
        record: &LetterRecord,
        surface: &mut S,
    ) -> Result<(), LayoutError> {
        let transcription = &self.style.transcription;
        surface.translate_by(transcription.offset);
        if record.transcription.is_empty() {
            return Ok(());
        }

        apply_font(surface, &transcription.font);
        if record.transcription == WORD_DIVIDER {
            surface.set_font_size(transcription.divider_size);
            surface.set_italic(true);
            surface.set_fill(transcription.divider_fill);
        }
        surface.rich_text(&self.expand(&record.transcription), Point::ORIGIN);
        Ok(())
    }

    fn draw_script<S: DrawingSurface>(
        &self,
        record: &LetterRecord,
        script: Script,
        surface: &mut S,
    ) -> Result<(), LayoutError> {
        let style = self.style.script(script);
        surface.translate_by(style.offset);

        let text = record.script(script);
        if text.is_empty() {
            return Ok(());
        }
        let shift = self.gap_shift(record, script);
        if shift != 0.0 {
            surface.translate(shift, 0.0);
        }

        apply_font(surface, &style.font);
        surface.text(&self.expand(text), Point::ORIGIN);

        surface.translate_by(style.label_offset);
        surface.set_small_caps(true);
        apply_font(surface, &style.label);
        surface.text(script.name(), Point::ORIGIN);
        surface.set_small_caps(false);
        Ok(())
    }

    /// Extra horizontal shift for the second script when the first one is
    /// drawn on the same record, so the two never overlap
    pub fn gap_shift(&self, record: &LetterRecord, script: Script) -> f64 {
        let first = Script::Hebrew;
        if script == first || record.script(first).is_empty() {
            return 0.0;
        }
        self.style.script(first).offset.x + self.style.gap_offset_x
    }

    fn expand<'t>(&self, text: &'t str) -> std::borrow::Cow<'t, str> {
        expand(text, self.today)
    }
}

fn apply_font<S: DrawingSurface>(surface: &mut S, font: &FontStyle) {
    surface.set_font(&font.family);
    surface.set_font_size(font.size);
    surface.set_tracking(font.tracking);
    surface.set_fill(font.fill);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_str, DocumentFormat};
    use crate::records::RecordPolicy;
    use crate::surface::{DrawOp, Recorder};

    const STYLE: &str = r##"
label = "Abjad"
credits = "{u00A9} {date}"
output = "chart.svg"

[page]
width = 600
height = 800
margin = 20

[col]
letters = 2
width = 150
start = { x = 40, y = 700 }
offset = { y = -60 }
line = { offset = { x = 10 } }

[divider]
start = { y = 20 }
end = { y = -600 }

[fonts.header]
family = "Header Sans"
size = 18

[fonts.letter]
size = 30
tracking = 5
offset = { x = 1, y = 2 }

[fonts.transcription]
size = 9
fill = "#333333"
offset = { y = -10 }
divider = { size = 7, fill = "#999999" }
sub = { size = 5 }

[fonts.hebrew]
size = 10
offset = { x = 30, y = -12 }
gap_offset = { x = 4 }
label = { size = 5, offset = { y = -6 } }

[fonts.arabic]
size = 11
offset = { x = 50, y = -12 }
label = { size = 5 }
"##;

    fn render(letters: &[&str]) -> Recorder {
        let config = parse_str(STYLE, DocumentFormat::Toml).unwrap();
        let style = ChartStyle::resolve(&config).unwrap();
        let chart = Chart::with_records(
            config,
            crate::records::parse_lines(letters),
            RecordPolicy::Strict,
        )
        .unwrap();
        let mut recorder = Recorder::new();
        LayoutEngine::new(&style, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
            .render(&chart, &mut recorder)
            .unwrap();
        recorder
    }

    #[test]
    fn test_header_positions_and_credits() {
        let recorder = render(&["A | a | x | y"]);
        let (at, state) = recorder.find_text("Abjad").unwrap();
        assert_eq!(at, Point::new(20.0, 780.0));
        assert_eq!(state.font.family, "Header Sans");
        assert_eq!(state.anchor, TextAnchor::Start);

        let (at, state) = recorder.find_text("© 9 March 2024").unwrap();
        assert_eq!(at, Point::new(580.0, 780.0));
        assert_eq!(state.anchor, TextAnchor::End);
        assert!(state.font.italic);
        assert_eq!(state.font.size, 9.0);
        assert_eq!(state.opacity, 0.5);
    }

    #[test]
    fn test_glyph_cascade() {
        let recorder = render(&["A | a | x | y"]);
        let (at, state) = recorder.find_text("A").unwrap();
        // column origin + letter offset
        assert_eq!(at, Point::new(41.0, 702.0));
        assert_eq!(state.anchor, TextAnchor::Middle);
        assert_eq!(state.font.tracking, 5.0);
        assert_eq!(state.fill, Color::BLACK);

        // siblings start from the record origin again
        let (at, state) = recorder.find_text("a").unwrap();
        assert_eq!(at, Point::new(40.0, 690.0));
        assert_eq!(state.anchor, TextAnchor::Start);
        assert_eq!(state.font.tracking, 0.0);
    }

    #[test]
    fn test_record_tracking_and_offset_override() {
        let config = parse_str(STYLE, DocumentFormat::Toml).unwrap();
        let style = ChartStyle::resolve(&config).unwrap();
        let mut parsed = crate::records::parse_lines(["A | a | x | y"]);
        parsed.records[0] = parsed.records[0].clone().with_tracking(40.0).with_offset(3.0, -3.0);
        let chart = Chart::with_records(config, parsed, RecordPolicy::Strict).unwrap();
        let mut recorder = Recorder::new();
        LayoutEngine::new(&style, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .render(&chart, &mut recorder)
            .unwrap();

        let (at, state) = recorder.find_text("A").unwrap();
        assert_eq!(at, Point::new(44.0, 699.0));
        assert_eq!(state.font.tracking, 40.0);
    }

    #[test]
    fn test_word_divider_style() {
        let recorder = render(&["· | word divider | x | y", "B | b | x | y"]);
        let (_, state) = recorder.find_text(WORD_DIVIDER).unwrap();
        assert_eq!(state.font.size, 7.0);
        assert!(state.font.italic);
        assert_eq!(state.fill, Color::grey(0x99 as f64 / 255.0));

        let (_, state) = recorder.find_text("b").unwrap();
        assert_eq!(state.font.size, 9.0);
        assert!(!state.font.italic);
        assert_eq!(state.fill, Color::grey(0x33 as f64 / 255.0));
    }

    #[test]
    fn test_transcription_uses_rich_text() {
        let recorder = render(&["K | k<sub>h</sub> | x | y"]);
        let rich = recorder.ops().iter().any(|op| {
            matches!(op, DrawOp::Text { text, rich: true, .. } if text == "k<sub>h</sub>")
        });
        assert!(rich);
        assert!(recorder.inline_style(SUB_STYLE).is_some());
    }

    #[test]
    fn test_empty_transcription_is_not_drawn() {
        let recorder = render(&["A |  | x | y"]);
        assert!(!recorder
            .ops()
            .iter()
            .any(|op| matches!(op, DrawOp::Text { rich: true, .. })));
    }

    #[test]
    fn test_arabic_gap_when_both_scripts_present() {
        let recorder = render(&["A | a | hh | aa"]);
        let (hebrew, _) = recorder.find_text("hh").unwrap();
        let (arabic, state) = recorder.find_text("aa").unwrap();
        assert_eq!(hebrew.x, 40.0 + 30.0);
        // hebrew.offset.x + gap_offset.x + arabic.offset.x
        assert_eq!(arabic.x, 40.0 + 30.0 + 4.0 + 50.0);
        assert_eq!(state.font.size, 11.0);
    }

    #[test]
    fn test_arabic_without_hebrew_has_no_gap() {
        let recorder = render(&["A | a |  | aa"]);
        let (arabic, _) = recorder.find_text("aa").unwrap();
        assert_eq!(arabic.x, 40.0 + 50.0);
        assert!(recorder.find_text("hebrew").is_none());
    }

    #[test]
    fn test_script_captions() {
        let recorder = render(&["A | a | hh | aa"]);
        let (at, state) = recorder.find_text("hebrew").unwrap();
        assert_eq!(at, Point::new(70.0, 700.0 - 12.0 - 6.0));
        assert!(state.font.small_caps);
        assert_eq!(state.font.size, 5.0);

        let (_, state) = recorder.find_text("aa").unwrap();
        assert!(!state.font.small_caps);
        let (_, state) = recorder.find_text("arabic").unwrap();
        assert!(state.font.small_caps);
    }

    #[test]
    fn test_dividers_only_after_first_column() {
        let recorder = render(&[
            "A | a | x | y",
            "B | b | x | y",
            "C | c | x | y",
            "D | d | x | y",
            "E | e | x | y",
        ]);
        let lines: Vec<_> = recorder.lines().collect();
        assert_eq!(
            lines,
            vec![
                (Point::new(180.0, 720.0), Point::new(180.0, 100.0)),
                (Point::new(330.0, 720.0), Point::new(330.0, 100.0)),
            ]
        );
    }

    #[test]
    fn test_rows_advance_and_columns_step() {
        let recorder = render(&[
            "A | a | x | y",
            "B | b | x | y",
            "C | c | x | y",
            "D | d | x | y",
            "E | e | x | y",
        ]);
        let glyph = |t: &str| recorder.find_text(t).unwrap().0;
        assert_eq!(glyph("A"), Point::new(41.0, 702.0));
        assert_eq!(glyph("B"), Point::new(41.0, 642.0));
        assert_eq!(glyph("C"), Point::new(191.0, 702.0));
        assert_eq!(glyph("E"), Point::new(341.0, 702.0));
    }

    #[test]
    fn test_state_is_balanced_after_render() {
        let recorder = render(&["A | a | x | y", "B | b | x | y", "C | c | x | y"]);
        assert_eq!(recorder.stack().depth(), 0);
        assert_eq!(recorder.state(), &crate::surface::DrawState::default());
    }

    #[test]
    fn test_glyph_placeholders_are_expanded() {
        let recorder = render(&["{u05D0} | ʔ | x | y"]);
        assert!(recorder.find_text("\u{05D0}").is_some());
    }
}
