//! Output options for chart SVG documents

/// How a chart is serialized to SVG
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Emit the `<?xml ...?>` prolog so the file stands on its own
    pub standalone: bool,

    /// One element per line, indented under `<svg>`
    pub pretty_print: bool,

    /// Prepended to every class name; `None` leaves bare names like `text`
    pub class_prefix: Option<String>,

    /// Maximum decimals written for coordinates and font sizes
    pub precision: usize,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            pretty_print: true,
            class_prefix: Some("ac-".to_string()),
            precision: 2,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the XML prolog, e.g. off when inlining a chart into HTML
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Round output numbers to `precision` decimals; trailing zeros are dropped
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Point;
    use crate::surface::DrawingSurface;
    use crate::SvgSurface;

    fn draw(config: SvgConfig) -> String {
        let mut surface = SvgSurface::new(config);
        surface.set_page_size(100.0, 50.0);
        surface.text("aleph", Point::new(12.346, 7.0));
        surface.finish()
    }

    #[test]
    fn test_chart_defaults() {
        let config = SvgConfig::new();
        assert_eq!(config.class_prefix.as_deref(), Some("ac-"));
        assert_eq!(config.precision, 2);

        let svg = draw(config);
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("\n  <text class=\"ac-text\" x=\"12.35\" y=\"43\""));
    }

    #[test]
    fn test_inline_fragment_options() {
        let svg = draw(
            SvgConfig::new()
                .with_standalone(false)
                .with_pretty_print(false)
                .without_class_prefix()
                .with_precision(0),
        );
        assert!(svg.starts_with("<svg "));
        assert!(!svg.contains('\n'));
        assert!(svg.contains(r#"<text class="text" x="12" y="43""#));
    }

    #[test]
    fn test_custom_prefix() {
        let svg = draw(SvgConfig::new().with_class_prefix("glyphs-"));
        assert!(svg.contains(r#"class="glyphs-text""#));
        assert!(!svg.contains("ac-"));
    }
}
