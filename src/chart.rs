//! A chart: document metadata, configuration and the records to draw

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{ConfigError, ConfigValue};
use crate::records::{parse_entries, LetterRecord, MalformedEntry, ParsedRecords, RecordPolicy};
use crate::ChartError;

/// Key of the records sequence in a chart document
pub const LETTERS_KEY: &str = "letters";

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub label: String,
    pub credits: String,
    /// Output path as written in the document
    pub output: PathBuf,
    pub config: ConfigValue,
    pub records: Vec<LetterRecord>,
    /// Entries left out under [`RecordPolicy::SkipMalformed`]
    pub skipped: Vec<MalformedEntry>,
}

impl Chart {
    /// Build a chart whose records come from the document's `letters` sequence
    pub fn from_config(config: ConfigValue, policy: RecordPolicy) -> Result<Self, ChartError> {
        let entries = config
            .get(LETTERS_KEY)
            .ok_or_else(|| ConfigError::missing(LETTERS_KEY))?;
        let entries = entries.as_sequence().ok_or_else(|| {
            ConfigError::invalid(LETTERS_KEY, "sequence", entries.type_name())
        })?;
        let parsed = parse_entries(entries);
        Self::with_records(config, parsed, policy)
    }

    /// Build a chart from already parsed records (e.g. a separate letters file)
    pub fn with_records(
        config: ConfigValue,
        parsed: ParsedRecords,
        policy: RecordPolicy,
    ) -> Result<Self, ChartError> {
        let label = config.require_str("label")?.to_string();
        let credits = config.str_or("credits", "")?.to_string();
        let output = PathBuf::from(config.require_str("output")?);
        let (records, skipped) = parsed.apply(policy)?;
        info!(
            label = %label,
            records = records.len(),
            skipped = skipped.len(),
            "chart loaded"
        );
        Ok(Self {
            label,
            credits,
            output,
            config,
            records,
            skipped,
        })
    }

    /// Output path resolved against the directory of the chart document
    pub fn output_path(&self, document_dir: &Path) -> PathBuf {
        if self.output.is_absolute() {
            self.output.clone()
        } else {
            document_dir.join(&self.output)
        }
    }
}
