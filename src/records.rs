//! Letter records: one alphabet entry per line or per document entry
//!
//! The compact text form is four `|`-separated fields in a fixed order:
//!
//! ```text
//! Alef | ʔ | Hebrew-Marker | Arabic-Marker
//! ```
//!
//! A chart document may also carry structured entries (mappings with the same
//! four field names plus optional `tracking` and `offset`). Both forms
//! normalize to [`LetterRecord`]. Every malformed entry is collected; nothing
//! is silently dropped or truncated.

use std::fmt;
use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;
use tracing::warn;

use crate::config::ConfigValue;
use crate::layout::Point;

/// Field names of the text form, in column order
pub const FIELDS: [&str; 4] = ["letter", "transcription", "hebrew", "arabic"];

pub const FIELD_SEPARATOR: char = '|';

/// Marker for comment lines in letters files
pub const COMMENT_PREFIX: char = '#';

/// One alphabet entry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LetterRecord {
    pub letter: String,
    pub transcription: String,
    pub hebrew: String,
    pub arabic: String,
    /// Overrides the letter font tracking for this glyph
    pub tracking: Option<f64>,
    /// Extra translation applied to this glyph only
    pub offset: Option<Point>,
}

impl LetterRecord {
    pub fn new(
        letter: impl Into<String>,
        transcription: impl Into<String>,
        hebrew: impl Into<String>,
        arabic: impl Into<String>,
    ) -> Self {
        Self {
            letter: letter.into(),
            transcription: transcription.into(),
            hebrew: hebrew.into(),
            arabic: arabic.into(),
            tracking: None,
            offset: None,
        }
    }

    pub fn with_tracking(mut self, tracking: f64) -> Self {
        self.tracking = Some(tracking);
        self
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = Some(Point::new(x, y));
        self
    }

    /// The transliteration in the given script
    pub fn script(&self, script: Script) -> &str {
        match script {
            Script::Hebrew => &self.hebrew,
            Script::Arabic => &self.arabic,
        }
    }
}

/// The two transliteration scripts, in drawing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Hebrew,
    Arabic,
}

impl Script {
    pub const ALL: [Script; 2] = [Script::Hebrew, Script::Arabic];

    /// Config key and caption text
    pub fn name(&self) -> &'static str {
        match self {
            Script::Hebrew => "hebrew",
            Script::Arabic => "arabic",
        }
    }

}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to do when some entries are malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordPolicy {
    /// Refuse to render at all
    #[default]
    Strict,
    /// Render the well-formed entries and report the rest
    SkipMalformed,
}

/// Why an entry could not become a record
#[derive(Debug, Clone, PartialEq)]
pub enum MalformedReason {
    FieldCount { found: usize },
    MissingField { field: &'static str },
    InvalidField { field: &'static str, expected: &'static str },
    NotARecord { found: &'static str },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::FieldCount { found } => write!(
                f,
                "expected {} fields separated by '{}', found {}",
                FIELDS.len(),
                FIELD_SEPARATOR,
                found
            ),
            MalformedReason::MissingField { field } => write!(f, "missing field '{field}'"),
            MalformedReason::InvalidField { field, expected } => {
                write!(f, "field '{field}' must be a {expected}")
            }
            MalformedReason::NotARecord { found } => {
                write!(f, "expected a text line or a mapping, found {found}")
            }
        }
    }
}

/// A single bad entry
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedEntry {
    /// 0-based line number (text form) or sequence position (document form)
    pub index: usize,
    pub raw: String,
    pub reason: MalformedReason,
    /// Byte range of the line within its letters file, when known
    pub span: Option<Range<usize>>,
}

impl fmt::Display for MalformedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} in {:?}", self.index, self.reason, self.raw)
    }
}

/// All malformed entries of one record source, reported together
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} malformed record(s): {}", entries.len(), format_entries(entries))]
pub struct MalformedRecords {
    pub entries: Vec<MalformedEntry>,
}

fn format_entries(entries: &[MalformedEntry]) -> String {
    entries
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl MalformedRecords {
    /// Line numbers of the bad entries
    pub fn indices(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.index).collect()
    }

    /// Format the bad lines with source context using ariadne.
    ///
    /// Entries without a span (document entries) are listed plainly.
    pub fn report(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        for entry in &self.entries {
            let Some(span) = &entry.span else {
                buf.extend_from_slice(format!("Error: {entry}\n").as_bytes());
                continue;
            };
            let written = Report::build(ReportKind::Error, filename, span.start)
                .with_message(format!("malformed record on line {}", entry.index))
                .with_label(
                    Label::new((filename, span.clone()))
                        .with_message(entry.reason.to_string())
                        .with_color(Color::Red),
                )
                .finish()
                .write((filename, Source::from(source)), &mut buf);
            if let Err(err) = written {
                warn!(%err, "could not format record report");
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Outcome of parsing a record source: the good records and the bad entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecords {
    pub records: Vec<LetterRecord>,
    pub malformed: Vec<MalformedEntry>,
}

impl ParsedRecords {
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }

    /// All records, or every malformed entry if there is any
    pub fn into_result(self) -> Result<Vec<LetterRecord>, MalformedRecords> {
        if self.malformed.is_empty() {
            Ok(self.records)
        } else {
            Err(MalformedRecords {
                entries: self.malformed,
            })
        }
    }

    /// Apply a policy, returning the records to draw and the entries skipped
    pub fn apply(
        self,
        policy: RecordPolicy,
    ) -> Result<(Vec<LetterRecord>, Vec<MalformedEntry>), MalformedRecords> {
        match policy {
            RecordPolicy::Strict => self.into_result().map(|records| (records, Vec::new())),
            RecordPolicy::SkipMalformed => {
                for entry in &self.malformed {
                    warn!(index = entry.index, reason = %entry.reason, raw = %entry.raw, "skipping malformed record");
                }
                Ok((self.records, self.malformed))
            }
        }
    }

    fn push(&mut self, parsed: Result<LetterRecord, MalformedEntry>) {
        match parsed {
            Ok(record) => self.records.push(record),
            Err(entry) => self.malformed.push(entry),
        }
    }
}

/// Parse one pipe-delimited line
pub fn parse_line(index: usize, line: &str) -> Result<LetterRecord, MalformedEntry> {
    let segments: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
    let [letter, transcription, hebrew, arabic] = segments.as_slice() else {
        return Err(MalformedEntry {
            index,
            raw: line.to_string(),
            reason: MalformedReason::FieldCount {
                found: segments.len(),
            },
            span: None,
        });
    };
    Ok(LetterRecord::new(*letter, *transcription, *hebrew, *arabic))
}

/// Parse lines of the text form; the index of each line is its position
pub fn parse_lines<I, S>(lines: I) -> ParsedRecords
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedRecords::default();
    for (index, line) in lines.into_iter().enumerate() {
        parsed.push(parse_line(index, line.as_ref()));
    }
    parsed
}

/// Parse lines of the text form, failing with every malformed line
pub fn parse_records<I, S>(lines: I) -> Result<Vec<LetterRecord>, MalformedRecords>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_lines(lines).into_result()
}

/// Parse lines of the text form, keeping the good records alongside any
/// malformed ones
pub fn parse_records_lenient<I, S>(lines: I) -> (Vec<LetterRecord>, Option<MalformedRecords>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed = parse_lines(lines);
    let malformed = (!parsed.malformed.is_empty()).then(|| MalformedRecords {
        entries: parsed.malformed,
    });
    (parsed.records, malformed)
}

/// Parse the contents of a letters file.
///
/// Blank lines and lines starting with `#` are skipped; reported indices are
/// still the 0-based line numbers of the file, and spans point into `text`.
pub fn parse_letters_text(text: &str) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();
    let mut offset = 0;
    for (index, raw_line) in text.split_inclusive('\n').enumerate() {
        let line = raw_line.trim_end_matches(['\n', '\r']);
        let span = offset..offset + line.len();
        offset += raw_line.len();

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
            continue;
        }
        parsed.push(parse_line(index, line).map_err(|entry| MalformedEntry {
            span: Some(span),
            ..entry
        }));
    }
    parsed
}

/// Parse the `letters` sequence of a chart document.
///
/// Entries are either pipe-delimited strings or mappings.
pub fn parse_entries(entries: &[ConfigValue]) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();
    for (index, entry) in entries.iter().enumerate() {
        let record = match entry {
            ConfigValue::String(line) => parse_line(index, line),
            ConfigValue::Mapping(_) => parse_mapping(index, entry),
            other => Err(MalformedEntry {
                index,
                raw: format!("{other:?}"),
                reason: MalformedReason::NotARecord {
                    found: other.type_name(),
                },
                span: None,
            }),
        };
        parsed.push(record);
    }
    parsed
}

fn parse_mapping(index: usize, entry: &ConfigValue) -> Result<LetterRecord, MalformedEntry> {
    let malformed = |reason| MalformedEntry {
        index,
        raw: format!("{entry:?}"),
        reason,
        span: None,
    };
    let text_field = |field: &'static str| -> Result<Option<String>, MalformedEntry> {
        match entry.get(field) {
            None => Ok(None),
            Some(ConfigValue::String(s)) => Ok(Some(s.trim().to_string())),
            // bare numbers are common in transcriptions written in YAML
            Some(ConfigValue::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(malformed(MalformedReason::InvalidField {
                field,
                expected: "string",
            })),
        }
    };
    let number_field = |field: &'static str| -> Result<Option<f64>, MalformedEntry> {
        match entry.get(field) {
            None => Ok(None),
            Some(value) => value.as_number().map(Some).ok_or_else(|| {
                malformed(MalformedReason::InvalidField {
                    field,
                    expected: "number",
                })
            }),
        }
    };

    let letter = text_field(FIELDS[0])?.ok_or_else(|| {
        malformed(MalformedReason::MissingField { field: FIELDS[0] })
    })?;
    let mut record = LetterRecord::new(
        letter,
        text_field(FIELDS[1])?.unwrap_or_default(),
        text_field(FIELDS[2])?.unwrap_or_default(),
        text_field(FIELDS[3])?.unwrap_or_default(),
    );
    record.tracking = number_field("tracking")?;
    if let Some(offset) = entry.get("offset") {
        if offset.as_mapping().is_none() {
            return Err(malformed(MalformedReason::InvalidField {
                field: "offset",
                expected: "mapping",
            }));
        }
        let x = number_field("offset.x")?.unwrap_or(0.0);
        let y = number_field("offset.y")?.unwrap_or(0.0);
        record.offset = Some(Point::new(x, y));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_single_line() {
        let records = parse_records(["Alpha | a | Hebrew-Marker | Arabic-Marker"]).unwrap();
        assert_eq!(
            records,
            vec![LetterRecord::new("Alpha", "a", "Hebrew-Marker", "Arabic-Marker")]
        );
        assert_eq!(records[0].tracking, None);
        assert_eq!(records[0].offset, None);
    }

    #[test]
    fn test_three_segments_is_malformed_at_line_zero() {
        let err = parse_records(["A | b | c"]).unwrap_err();
        assert_eq!(err.indices(), vec![0]);
        assert_eq!(err.entries[0].raw, "A | b | c");
        assert_eq!(err.entries[0].reason, MalformedReason::FieldCount { found: 3 });
    }

    #[test]
    fn test_all_bad_lines_are_reported() {
        let err = parse_records([
            "A | a | x | y",
            "B | b",
            "C | c | x | y",
            "D | d | x | y | z",
        ])
        .unwrap_err();
        assert_eq!(err.indices(), vec![1, 3]);
        let message = err.to_string();
        assert!(message.starts_with("2 malformed record(s)"));
        assert!(message.contains("line 1"));
        assert!(message.contains("line 3"));
    }

    #[test]
    fn test_empty_fields_are_kept() {
        let records = parse_records(["ʾ |  |  | ا"]).unwrap();
        assert_eq!(records[0], LetterRecord::new("ʾ", "", "", "ا"));
    }

    #[test]
    fn test_order_is_preserved() {
        let lines: Vec<String> = (0..10).map(|i| format!("{i} | t | h | a")).collect();
        let records = parse_records(&lines).unwrap();
        let letters: Vec<&str> = records.iter().map(|r| r.letter.as_str()).collect();
        assert_eq!(letters, vec!["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]);
    }

    #[test]
    fn test_letters_text_skips_blank_and_comment_lines() {
        let text = "# alphabet\nA | a | x | y\n\nB | b\r\nC | c | x | y\n";
        let parsed = parse_letters_text(text);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.malformed.len(), 1);
        let bad = &parsed.malformed[0];
        assert_eq!(bad.index, 3);
        assert_eq!(bad.raw, "B | b");
        assert_eq!(&text[bad.span.clone().unwrap()], "B | b");
    }

    #[test]
    fn test_report_shows_source_line() {
        let text = "A | a | x | y\nB | b\n";
        let err = parse_letters_text(text).into_result().unwrap_err();
        let report = err.report(text, "letters.txt");
        assert!(report.contains("malformed record on line 1"));
    }

    #[test]
    fn test_structured_entries() {
        let doc: ConfigValue = serde_yaml::from_str(
            r#"
letters:
  - "A | a | x | y"
  - letter: "B"
    transcription: b
    hebrew: "ב"
    tracking: 40
    offset: { x: 2, y: -1 }
  - letter: "C"
"#,
        )
        .unwrap();
        let parsed = parse_entries(doc.get("letters").unwrap().as_sequence().unwrap());
        assert!(parsed.is_clean());
        assert_eq!(
            parsed.records,
            vec![
                LetterRecord::new("A", "a", "x", "y"),
                LetterRecord::new("B", "b", "ב", "")
                    .with_tracking(40.0)
                    .with_offset(2.0, -1.0),
                LetterRecord::new("C", "", "", ""),
            ]
        );
    }

    #[test]
    fn test_structured_entry_errors() {
        let doc: ConfigValue = serde_yaml::from_str(
            r#"
letters:
  - transcription: a
  - letter: B
    tracking: wide
  - 42
  - letter: C
    offset: 5
  - letter: D
    offset: [1, 2]
  - letter: E
    offset: { x: 3 }
"#,
        )
        .unwrap();
        let parsed = parse_entries(doc.get("letters").unwrap().as_sequence().unwrap());
        let reasons: Vec<MalformedReason> =
            parsed.malformed.iter().map(|e| e.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                MalformedReason::MissingField { field: "letter" },
                MalformedReason::InvalidField {
                    field: "tracking",
                    expected: "number"
                },
                MalformedReason::NotARecord { found: "number" },
                MalformedReason::InvalidField {
                    field: "offset",
                    expected: "mapping"
                },
                MalformedReason::InvalidField {
                    field: "offset",
                    expected: "mapping"
                },
            ]
        );
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].offset, Some(Point::new(3.0, 0.0)));
    }

    #[test]
    fn test_policy() {
        let parsed = parse_lines(["A | a | x | y", "bad"]);
        assert!(parsed.clone().apply(RecordPolicy::Strict).is_err());
        let (records, skipped) = parsed.apply(RecordPolicy::SkipMalformed).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(skipped[0].index, 1);
    }

    #[test]
    fn test_lenient_parse_keeps_good_records() {
        let (records, malformed) =
            parse_records_lenient(["A | a | x | y", "B | b", "C | c | x | y"]);
        assert_eq!(
            records.iter().map(|r| r.letter.as_str()).collect::<Vec<_>>(),
            vec!["A", "C"]
        );
        assert_eq!(malformed.unwrap().indices(), vec![1]);

        let (records, malformed) = parse_records_lenient(["A | a | x | y"]);
        assert_eq!(records.len(), 1);
        assert!(malformed.is_none());
    }

    #[test]
    fn test_script_helpers() {
        let record = LetterRecord::new("A", "a", "x", "y");
        assert_eq!(record.script(Script::Hebrew), "x");
        assert_eq!(record.script(Script::Arabic), "y");
        assert_eq!(Script::Arabic.to_string(), "arabic");
    }
}
