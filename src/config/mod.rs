//! Chart document configuration
//!
//! The document is parsed once into a [`ConfigValue`] tree and only read
//! afterwards, always through dotted selectors.

pub mod color;
pub mod error;
pub mod load;
pub mod resolve;
pub mod value;

pub use color::Color;
pub use error::ConfigError;
pub use load::{load_file, parse_str, DocumentFormat};
pub use resolve::resolve;
pub use value::ConfigValue;
