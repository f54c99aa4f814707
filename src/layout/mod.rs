//! Layout engine for placing chart records on a page
//!
//! This module resolves the chart style from the configuration tree, splits
//! the records into columns and draws them through a [`crate::surface::DrawingSurface`].

pub mod chunk;
pub mod engine;
pub mod error;
pub mod style;
pub mod types;

pub use chunk::{chunk, column_capacity};
pub use engine::{LayoutEngine, WORD_DIVIDER};
pub use error::LayoutError;
pub use style::ChartStyle;
pub use types::{Point, TextAnchor};
