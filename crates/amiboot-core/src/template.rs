//! Launch parameter template and current-configuration extraction.
//!
//! Amiberry changed its command-line syntax between releases:
//!
//! | Style    | Amiberry | Parameters                        |
//! |----------|----------|-----------------------------------|
//! | `legacy` | 3.3      | `--config "./conf/<file>" -G`     |
//! | `modern` | ≥ 3.4    | `-config="./conf/<file>" -G`      |
//!
//! A [`ParameterTemplate`] holds one of these (or a user-supplied variant) with
//! a single `{}` placeholder for the configuration file name.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder replaced by the configuration file name.
pub const PLACEHOLDER: &str = "{}";

/// Default directory prefix used inside the parameters, relative to the
/// emulator's working directory.
pub const DEFAULT_RELATIVE_DIR: &str = "./conf/";

/// Default configuration file extension (without the dot).
pub const DEFAULT_EXTENSION: &str = "uae";

/// Error type for template and pattern construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The template does not contain exactly one `{}` placeholder.
    #[error("parameter template '{template}' must contain exactly one '{{}}' placeholder, found {found}")]
    Placeholder { template: String, found: usize },

    /// The template is empty or only whitespace.
    #[error("parameter template is empty")]
    Empty,

    /// The configuration extension is empty or contains a path separator.
    #[error("invalid configuration extension '{0}'")]
    Extension(String),
}

/// Built-in parameter syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamStyle {
    /// Amiberry 3.3.
    #[default]
    Legacy,
    /// Amiberry 3.4 and later.
    Modern,
}

impl ParamStyle {
    /// The template text for this style.
    pub fn template_text(self) -> &'static str {
        match self {
            ParamStyle::Legacy => "--config \"./conf/{}\" -G",
            ParamStyle::Modern => "-config=\"./conf/{}\" -G",
        }
    }

    /// The validated template for this style.
    pub fn template(self) -> ParameterTemplate {
        ParameterTemplate {
            text: self.template_text().to_string(),
        }
    }
}

/// A parameter string with exactly one `{}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterTemplate {
    text: String,
}

impl ParameterTemplate {
    /// Validates `text` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Empty`] for a blank template and
    /// [`TemplateError::Placeholder`] unless `{}` occurs exactly once.
    pub fn new(text: impl Into<String>) -> Result<Self, TemplateError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TemplateError::Empty);
        }
        let found = text.matches(PLACEHOLDER).count();
        if found != 1 {
            return Err(TemplateError::Placeholder {
                template: text,
                found,
            });
        }
        Ok(Self { text })
    }

    /// Substitutes `filename` for the placeholder.
    pub fn render(&self, filename: &str) -> String {
        self.text.replacen(PLACEHOLDER, filename, 1)
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Recognises the configuration file referenced by an existing launch line.
///
/// The capture is the text between `relative_dir` and the extension, extension
/// included, stopping at a double quote:
///
/// ```
/// use amiboot_core::CurrentConfigPattern;
///
/// let pattern = CurrentConfigPattern::new("./conf/", "uae").unwrap();
/// let line = r#"ExecStart=/opt/app/amiberry --config "./conf/beta.uae" -G"#;
/// assert_eq!(pattern.extract(line).as_deref(), Some("beta.uae"));
/// ```
#[derive(Debug, Clone)]
pub struct CurrentConfigPattern {
    regex: Regex,
}

impl CurrentConfigPattern {
    /// Builds the pattern for files under `relative_dir` ending in `.extension`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Extension`] if `extension` is empty or contains
    /// a path separator.
    pub fn new(relative_dir: &str, extension: &str) -> Result<Self, TemplateError> {
        if extension.is_empty() || extension.contains(|c: char| c == '/' || c == '\\') {
            return Err(TemplateError::Extension(extension.to_string()));
        }
        let pattern = format!(
            r#"{}([^"]*\.{})"#,
            regex::escape(relative_dir),
            regex::escape(extension)
        );
        let regex =
            Regex::new(&pattern).map_err(|_| TemplateError::Extension(extension.to_string()))?;
        Ok(Self { regex })
    }

    /// Returns the configuration file name referenced by `line`, if any.
    pub fn extract(&self, line: &str) -> Option<String> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

impl Default for CurrentConfigPattern {
    fn default() -> Self {
        let regex = Regex::new(r#"\./conf/([^"]*\.uae)"#);
        match regex {
            Ok(regex) => Self { regex },
            Err(e) => unreachable!("built-in pattern is invalid: {e}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_style_renders_amiberry_3_3_parameters() {
        let params = ParamStyle::Legacy.template().render("beta.uae");
        assert_eq!(params, r#"--config "./conf/beta.uae" -G"#);
    }

    #[test]
    fn test_modern_style_renders_amiberry_3_4_parameters() {
        let params = ParamStyle::Modern.template().render("beta.uae");
        assert_eq!(params, r#"-config="./conf/beta.uae" -G"#);
    }

    #[test]
    fn test_builtin_styles_pass_validation() {
        for style in [ParamStyle::Legacy, ParamStyle::Modern] {
            assert!(ParameterTemplate::new(style.template_text()).is_ok());
        }
    }

    #[test]
    fn test_template_without_placeholder_is_rejected() {
        // Arrange / Act
        let result = ParameterTemplate::new("--config ./conf/x.uae");

        // Assert
        assert_eq!(
            result,
            Err(TemplateError::Placeholder {
                template: "--config ./conf/x.uae".to_string(),
                found: 0,
            })
        );
    }

    #[test]
    fn test_template_with_two_placeholders_is_rejected() {
        let result = ParameterTemplate::new("--config {} --other {}");
        assert!(matches!(result, Err(TemplateError::Placeholder { found: 2, .. })));
    }

    #[test]
    fn test_blank_template_is_rejected() {
        assert_eq!(ParameterTemplate::new("   "), Err(TemplateError::Empty));
    }

    #[test]
    fn test_render_keeps_braces_in_filename() {
        let template = ParameterTemplate::new("-c {}").expect("valid");
        assert_eq!(template.render("odd{}.uae"), "-c odd{}.uae");
    }

    #[test]
    fn test_extract_finds_quoted_legacy_reference() {
        let pattern = CurrentConfigPattern::default();
        let line = r#"ExecStart=/opt/app/amiberry --config "./conf/A500 WB1.3.uae" -G"#;
        assert_eq!(pattern.extract(line).as_deref(), Some("A500 WB1.3.uae"));
    }

    #[test]
    fn test_extract_finds_modern_reference() {
        let pattern = CurrentConfigPattern::default();
        let line = r#"/mnt/amiberry/amiberry -config="./conf/a1200.uae" -G"#;
        assert_eq!(pattern.extract(line).as_deref(), Some("a1200.uae"));
    }

    #[test]
    fn test_extract_returns_none_without_parameters() {
        let pattern = CurrentConfigPattern::default();
        assert_eq!(pattern.extract("ExecStart=/opt/app/amiberry"), None);
    }

    #[test]
    fn test_custom_pattern_uses_relative_dir_and_extension() {
        // Arrange
        let pattern = CurrentConfigPattern::new("./saves/", "cfg").expect("valid");

        // Act
        let found = pattern.extract(r#"run --config "./saves/demo.cfg""#);
        let ignored = pattern.extract(r#"run --config "./conf/demo.uae""#);

        // Assert
        assert_eq!(found.as_deref(), Some("demo.cfg"));
        assert_eq!(ignored, None);
    }

    #[test]
    fn test_empty_extension_is_rejected() {
        let result = CurrentConfigPattern::new("./conf/", "");
        assert!(matches!(result, Err(TemplateError::Extension(_))));
    }
}
