//! SVG renderer
//!
//! [`SvgSurface`] implements the drawing surface and turns the draw calls of
//! the layout engine into a standalone SVG document.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::SvgSurface;
