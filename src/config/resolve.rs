//! Dotted-path lookup into the configuration tree
//!
//! A selector such as `fonts.hebrew.label.size` is walked key by key. Lookup
//! never fails: a missing key or a non-mapping node along the way simply
//! yields `None`. The typed accessors on [`ConfigValue`] sit on top of that and
//! force every call site to pick a policy: `require_*` turns absence into
//! [`ConfigError::Missing`], `*_or` falls back to a default. A present value of
//! the wrong kind is always an error.
//!
//! An explicit `null` counts as absent.

use super::color::Color;
use super::error::ConfigError;
use super::value::ConfigValue;

/// Separator between selector segments
pub const SELECTOR_SEPARATOR: char = '.';

/// Resolve `selector` against `tree`.
///
/// The empty selector resolves to the whole tree.
pub fn resolve<'a>(tree: &'a ConfigValue, selector: &str) -> Option<&'a ConfigValue> {
    if selector.is_empty() {
        return Some(tree);
    }
    selector
        .split(SELECTOR_SEPARATOR)
        .try_fold(tree, |node, key| match node {
            ConfigValue::Mapping(map) => map.get(key),
            _ => None,
        })
}

impl ConfigValue {
    /// Resolve a selector relative to this node, treating `null` as absent
    pub fn get(&self, selector: &str) -> Option<&ConfigValue> {
        resolve(self, selector).filter(|v| !v.is_null())
    }

    fn typed<'a, T>(
        &'a self,
        selector: &str,
        expected: &'static str,
        cast: impl FnOnce(&'a ConfigValue) -> Option<T>,
    ) -> Result<Option<T>, ConfigError> {
        match self.get(selector) {
            None => Ok(None),
            Some(value) => cast(value)
                .map(Some)
                .ok_or_else(|| ConfigError::invalid(selector, expected, value.type_name())),
        }
    }

    pub fn optional_number(&self, selector: &str) -> Result<Option<f64>, ConfigError> {
        self.typed(selector, "number", ConfigValue::as_number)
    }

    pub fn optional_str(&self, selector: &str) -> Result<Option<&str>, ConfigError> {
        self.typed(selector, "string", ConfigValue::as_str)
    }

    pub fn optional_bool(&self, selector: &str) -> Result<Option<bool>, ConfigError> {
        self.typed(selector, "boolean", ConfigValue::as_bool)
    }

    pub fn optional_color(&self, selector: &str) -> Result<Option<Color>, ConfigError> {
        self.typed(selector, "color", Color::from_value)
    }

    pub fn require_number(&self, selector: &str) -> Result<f64, ConfigError> {
        self.optional_number(selector)?
            .ok_or_else(|| ConfigError::missing(selector))
    }

    pub fn require_str(&self, selector: &str) -> Result<&str, ConfigError> {
        self.optional_str(selector)?
            .ok_or_else(|| ConfigError::missing(selector))
    }

    pub fn require_bool(&self, selector: &str) -> Result<bool, ConfigError> {
        self.optional_bool(selector)?
            .ok_or_else(|| ConfigError::missing(selector))
    }

    pub fn require_color(&self, selector: &str) -> Result<Color, ConfigError> {
        self.optional_color(selector)?
            .ok_or_else(|| ConfigError::missing(selector))
    }

    pub fn number_or(&self, selector: &str, default: f64) -> Result<f64, ConfigError> {
        Ok(self.optional_number(selector)?.unwrap_or(default))
    }

    pub fn str_or<'a>(&'a self, selector: &str, default: &'a str) -> Result<&'a str, ConfigError> {
        Ok(self.optional_str(selector)?.unwrap_or(default))
    }

    pub fn bool_or(&self, selector: &str, default: bool) -> Result<bool, ConfigError> {
        Ok(self.optional_bool(selector)?.unwrap_or(default))
    }

    pub fn color_or(&self, selector: &str, default: Color) -> Result<Color, ConfigError> {
        Ok(self.optional_color(selector)?.unwrap_or(default))
    }
}
