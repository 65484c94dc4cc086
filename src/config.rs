//! Formatting configuration for emitted SQF code.
//!
//! An [`ExportConfig`] is built once per export and passed by reference to every
//! rendering step, so repeated or concurrent exports never share formatting state.

use crate::errors::ExportError;

/// Number of digits after the decimal point used for numeric literals by default.
pub const DEFAULT_DECIMAL_PLACES: usize = 6;
/// Maximum line length used by default.
pub const DEFAULT_LINE_LENGTH: usize = 80;
/// Indentation used by default.
pub const DEFAULT_INDENT: &str = "    ";
/// Largest accepted number of decimal places, enough to round-trip any `f64`.
pub const MAX_DECIMAL_PLACES: usize = 17;

/// Formatting options applied to a whole export.
///
/// # Example
///
/// ```
/// use sqf_export::ExportConfig;
///
/// let config = ExportConfig::default()
///     .with_decimal_places(3)
///     .with_indent("\t")
///     .with_line_length(100);
/// assert_eq!(config.available_width(), 99);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportConfig {
    /// Digits after the decimal point of every numeric literal
    pub decimal_places: usize,
    /// String used to indent function bodies and continuation lines
    pub indent: String,
    /// Maximum line length of wrapped function bodies, indent included
    pub line_length: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            decimal_places: DEFAULT_DECIMAL_PLACES,
            indent: DEFAULT_INDENT.to_string(),
            line_length: DEFAULT_LINE_LENGTH,
        }
    }
}

impl ExportConfig {
    pub fn with_decimal_places(mut self, decimal_places: usize) -> Self {
        self.decimal_places = decimal_places;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_line_length(mut self, line_length: usize) -> Self {
        self.line_length = line_length;
        self
    }

    /// Columns left for body text once the indent is written.
    pub fn available_width(&self) -> usize {
        self.line_length
            .saturating_sub(self.indent.chars().count())
            .max(1)
    }

    /// Checks that the configuration leaves room for body text and that the indent is blank.
    ///
    /// # Errors
    /// Returns `ExportError::InvalidConfig` if the indent contains anything but spaces and
    /// tabs, if it is at least as wide as the line length, or if `decimal_places` exceeds
    /// [`MAX_DECIMAL_PLACES`].
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ExportError::InvalidConfig(format!(
                "decimal places must be at most {MAX_DECIMAL_PLACES}, got {}",
                self.decimal_places
            )));
        }
        if self.indent.chars().any(|c| c != ' ' && c != '\t') {
            return Err(ExportError::InvalidConfig(format!(
                "indent must only contain spaces and tabs, got {:?}",
                self.indent
            )));
        }
        let indent_width = self.indent.chars().count();
        if indent_width >= self.line_length {
            return Err(ExportError::InvalidConfig(format!(
                "line length {} leaves no room after an indent of width {}",
                self.line_length, indent_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.decimal_places, 6);
        assert_eq!(config.indent, "    ");
        assert_eq!(config.line_length, 80);
        assert_eq!(config.available_width(), 76);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let too_narrow = ExportConfig::default().with_line_length(4);
        assert!(matches!(
            too_narrow.validate(),
            Err(ExportError::InvalidConfig(_))
        ));

        let bad_indent = ExportConfig::default().with_indent("--");
        assert!(matches!(
            bad_indent.validate(),
            Err(ExportError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_decimal_places_bound() {
        let widest = ExportConfig::default().with_decimal_places(MAX_DECIMAL_PLACES);
        assert!(widest.validate().is_ok());

        let too_precise = ExportConfig::default().with_decimal_places(1_000_000_000);
        assert!(matches!(
            too_precise.validate(),
            Err(ExportError::InvalidConfig(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_partial() {
        let config: ExportConfig = serde_json::from_str(r#"{"decimal_places": 3}"#).unwrap();
        assert_eq!(config, ExportConfig::default().with_decimal_places(3));

        let huge: ExportConfig =
            serde_json::from_str(r#"{"decimal_places": 1000000000}"#).unwrap();
        assert!(matches!(huge.validate(), Err(ExportError::InvalidConfig(_))));
    }
}
