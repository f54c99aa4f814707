//! Fill and stroke colors as written in chart documents

use super::value::ConfigValue;

/// An RGBA color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn grey(level: f64) -> Self {
        Self::rgb(level, level, level)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| f64::from(v) / 255.0);
        match digits.len() {
            3 => {
                let mut expanded = String::with_capacity(6);
                for c in digits.chars() {
                    expanded.push(c);
                    expanded.push(c);
                }
                Self::from_hex(&format!("#{expanded}"))
            }
            6 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            8 => Some(Self::rgba(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                channel(&digits[6..8])?,
            )),
            _ => None,
        }
    }

    /// Read a color from a config value.
    ///
    /// Accepts a hex string, a single grey level, or a sequence of three
    /// (rgb) or four (rgba) numbers in `0..=1`.
    pub fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::String(s) => Self::from_hex(s.trim()),
            ConfigValue::Number(level) if unit(*level) => Some(Self::grey(*level)),
            ConfigValue::Sequence(items) => {
                let channels: Vec<f64> = items
                    .iter()
                    .map(|v| v.as_number().filter(|n| unit(*n)))
                    .collect::<Option<_>>()?;
                match channels.as_slice() {
                    [r, g, b] => Some(Self::rgb(*r, *g, *b)),
                    [r, g, b, a] => Some(Self::rgba(*r, *g, *b, *a)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// `#rrggbb` without the alpha channel
    pub fn to_hex(&self) -> String {
        let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

fn unit(n: f64) -> bool {
    (0.0..=1.0).contains(&n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(Color::from_hex("#000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex("#ffffff"), Some(Color::WHITE));
        let translucent = Color::from_hex("#ff000080").unwrap();
        assert_eq!(translucent.r, 1.0);
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-9);
        assert_eq!(Color::from_hex("ffffff"), None);
        assert_eq!(Color::from_hex("#ggg"), None);
        assert_eq!(Color::from_hex("#ffff"), None);
    }

    #[test]
    fn test_sequence_forms() {
        let rgb = ConfigValue::Sequence(vec![0.0.into(), 0.5.into(), 1.0.into()]);
        assert_eq!(Color::from_value(&rgb), Some(Color::rgb(0.0, 0.5, 1.0)));

        let rgba = ConfigValue::Sequence(vec![1.0.into(), 1.0.into(), 1.0.into(), 0.2.into()]);
        assert_eq!(Color::from_value(&rgba), Some(Color::rgba(1.0, 1.0, 1.0, 0.2)));

        let short = ConfigValue::Sequence(vec![1.0.into(), 1.0.into()]);
        assert_eq!(Color::from_value(&short), None);

        let out_of_range = ConfigValue::Sequence(vec![2.0.into(), 0.0.into(), 0.0.into()]);
        assert_eq!(Color::from_value(&out_of_range), None);
    }

    #[test]
    fn test_grey_level() {
        assert_eq!(Color::from_value(&0.5.into()), Some(Color::grey(0.5)));
        assert_eq!(Color::from_value(&true.into()), None);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Color::rgb(1.0, 0.0, 0.5).to_hex(), "#ff0080");
        assert_eq!(Color::BLACK.with_alpha(0.5).to_hex(), "#000000");
    }
}
