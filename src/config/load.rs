//! Loading chart documents from TOML or YAML

use std::path::Path;

use tracing::debug;

use super::error::ConfigError;
use super::value::ConfigValue;

/// Serialization format of a chart document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from the file extension; anything but `.toml` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Parse a chart document from a string
pub fn parse_str(content: &str, format: DocumentFormat) -> Result<ConfigValue, ConfigError> {
    let value = match format {
        DocumentFormat::Toml => toml::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(value)
}

/// Read and parse a chart document, choosing the format from its extension
pub fn load_file(path: &Path) -> Result<ConfigValue, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let format = DocumentFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading chart document");
    parse_str(&content, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.toml")), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.TOML")), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a")), DocumentFormat::Yaml);
    }

    #[test]
    fn test_yaml_and_toml_agree() {
        let yaml = parse_str(
            "page:\n  width: 595\n  margin: 20.5\nlabel: Chart\n",
            DocumentFormat::Yaml,
        )
        .unwrap();
        let toml = parse_str(
            "label = \"Chart\"\n[page]\nwidth = 595\nmargin = 20.5\n",
            DocumentFormat::Toml,
        )
        .unwrap();
        assert_eq!(yaml, toml);
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = parse_str("this is not valid toml {{{{", DocumentFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = load_file(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "label = \"From disk\"").unwrap();
        let value = load_file(file.path()).unwrap();
        assert_eq!(value.require_str("label").unwrap(), "From disk");
    }
}
