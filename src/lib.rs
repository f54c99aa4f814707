//! Alphabet Chart - typographic alphabet reference charts from a declarative document
//!
//! A chart document (TOML or YAML) carries the page geometry, the fonts and
//! offsets of every text role, and the letter records. Each record becomes a
//! glyph, its transcription and its Hebrew and Arabic counterparts, laid out in
//! fixed-size columns.
//!
//! # Example
//!
//! ```rust
//! use alphabet_chart::{render, DocumentFormat};
//!
//! let svg = render(r#"
//! label: Alphabet
//! output: alphabet.svg
//! page: { width: 595, height: 842, margin: 30 }
//! col:
//!   letters: 10
//!   width: 180
//!   start: { x: 60, y: 760 }
//!   offset: { y: -60 }
//!   line: { offset: { x: 20 } }
//! divider: { start: { y: 30 }, end: { y: -600 } }
//! fonts:
//!   header: { size: 20 }
//!   letter: { size: 28 }
//!   transcription: { size: 9, offset: { y: -14 }, divider: { size: 7 }, sub: { size: 5 } }
//!   hebrew: { size: 12, offset: { x: 40, y: 0 }, gap_offset: { x: 10 }, label: { size: 5 } }
//!   arabic: { size: 12, offset: { x: 40, y: 0 }, label: { size: 5 } }
//! letters:
//!   - "A | ʔa | א | ا"
//! "#, DocumentFormat::Yaml).unwrap();
//!
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains("Alphabet"));
//! ```

pub mod chart;
pub mod config;
pub mod layout;
pub mod placeholder;
pub mod records;
pub mod renderer;
pub mod surface;

pub use chart::Chart;
pub use config::{ConfigError, ConfigValue, DocumentFormat};
pub use layout::{ChartStyle, LayoutEngine, LayoutError};
pub use records::{LetterRecord, MalformedRecords, RecordPolicy};
pub use renderer::{SvgConfig, SvgSurface};
pub use surface::{DrawingSurface, Recorder};

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum ChartError {
    /// The chart document could not be loaded or lacks a required value
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// One or more letter records are malformed
    #[error(transparent)]
    Records(#[from] MalformedRecords),

    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The rendered chart could not be written
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ChartError {
    /// The selector of a missing or invalid configuration value, if any
    pub fn selector(&self) -> Option<&str> {
        match self {
            ChartError::Config(err) => err.selector(),
            ChartError::Layout(err) => err.selector(),
            _ => None,
        }
    }
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Date that `{date}` expands to
    pub today: NaiveDate,
    /// What to do with malformed letter records
    pub policy: RecordPolicy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            svg: SvgConfig::default(),
            today: Local::now().date_naive(),
            policy: RecordPolicy::default(),
        }
    }
}

impl RenderOptions {
    /// Create options with defaults; `{date}` expands to the local date
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Fix the date `{date}` expands to
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Set the malformed record policy
    pub fn with_policy(mut self, policy: RecordPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Lay out a chart onto any drawing surface
///
/// The style is resolved completely before the first draw call, so a missing
/// required value leaves the surface untouched.
pub fn render_chart<S: DrawingSurface>(
    chart: &Chart,
    today: NaiveDate,
    surface: &mut S,
) -> Result<(), ChartError> {
    let style = ChartStyle::resolve(&chart.config)?;
    LayoutEngine::new(&style, today).render(chart, surface)?;
    Ok(())
}

/// Lay out a chart onto a [`Recorder`] and return the recorded operations
pub fn record_chart(chart: &Chart, today: NaiveDate) -> Result<Recorder, ChartError> {
    let mut recorder = Recorder::new();
    render_chart(chart, today, &mut recorder)?;
    Ok(recorder)
}

/// Render a chart to an SVG string
pub fn render_svg(chart: &Chart, options: &RenderOptions) -> Result<String, ChartError> {
    let mut surface = SvgSurface::new(options.svg.clone());
    render_chart(chart, options.today, &mut surface)?;
    Ok(surface.finish())
}

/// Render a chart document to SVG with default options
pub fn render(source: &str, format: DocumentFormat) -> Result<String, ChartError> {
    render_with_options(source, format, &RenderOptions::default())
}

/// Render a chart document to SVG with custom options
///
/// # Example
///
/// ```rust
/// use alphabet_chart::{render_with_options, DocumentFormat, RenderOptions, SvgConfig};
///
/// let options = RenderOptions::new().with_svg(SvgConfig::new().with_standalone(false));
/// let err = render_with_options("label: Empty\n", DocumentFormat::Yaml, &options).unwrap_err();
/// assert_eq!(err.selector(), Some("letters"));
/// ```
pub fn render_with_options(
    source: &str,
    format: DocumentFormat,
    options: &RenderOptions,
) -> Result<String, ChartError> {
    let config = config::parse_str(source, format)?;
    let chart = Chart::from_config(config, options.policy)?;
    render_svg(&chart, options)
}

/// Write a rendered chart, creating missing parent directories
///
/// The document goes to a temporary file next to `path` and is renamed into
/// place, so an existing chart is never left half-written.
pub fn write_output(path: &Path, svg: &str) -> Result<(), ChartError> {
    let write_err = |source| ChartError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(write_err)?;
            parent
        }
        None => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(svg.as_bytes()).map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;
    info!(path = %path.display(), bytes = svg.len(), "chart written");
    Ok(())
}
