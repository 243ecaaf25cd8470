//! Platform build configuration
//!
//! Parsed once from the build-descriptor text found under the platform home
//! directory. Reading the file is the bootstrapper's job; this module only
//! interprets its contents.

use serde::{Deserialize, Serialize};

/// Build number assumed when the build descriptor is missing or empty.
pub const DEFAULT_BUILD_NUMBER: &str = "172.1";

/// Two-letter variant code marking the unsupported commercial platform.
pub const ULTIMATE_VARIANT_CODE: &str = "IU";

/// Build characteristics of the platform installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfiguration {
    /// Dotted build number, e.g. "171.4"
    pub build_number: String,
    /// Whether the installation is the unsupported commercial variant
    pub uses_ultimate: bool,
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        Self {
            build_number: DEFAULT_BUILD_NUMBER.to_string(),
            uses_ultimate: false,
        }
    }
}

impl BuildConfiguration {
    /// Interpret the text of a build descriptor.
    ///
    /// The descriptor carries an optional variant code followed by a build
    /// number token, e.g. `IC-171.4249` or `IU171.4`. The build number is
    /// the first run of digits (dots included) in the text; when no digits
    /// are present the default build number is assumed.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let uses_ultimate = text.starts_with(ULTIMATE_VARIANT_CODE);
        let build_number = first_digit_run(text)
            .unwrap_or(DEFAULT_BUILD_NUMBER)
            .to_string();
        Self {
            build_number,
            uses_ultimate,
        }
    }
}

/// First maximal run of ASCII digits and dots starting at a digit.
fn first_digit_run(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn community_descriptor_parses_build_number() {
        let config = BuildConfiguration::parse("IC-171.4249.32");
        assert_eq!(config.build_number, "171.4249.32");
        assert!(!config.uses_ultimate);
    }

    #[test]
    fn ultimate_descriptor_sets_the_flag() {
        let config = BuildConfiguration::parse("IU171.4");
        assert_eq!(config.build_number, "171.4");
        assert!(config.uses_ultimate);
    }

    #[test]
    fn empty_text_falls_back_to_default() {
        let config = BuildConfiguration::parse("");
        assert_eq!(config, BuildConfiguration::default());
        assert_eq!(config.build_number, DEFAULT_BUILD_NUMBER);
    }

    #[test]
    fn text_without_digits_falls_back_to_default_number() {
        let config = BuildConfiguration::parse("IC-snapshot");
        assert_eq!(config.build_number, DEFAULT_BUILD_NUMBER);
        assert!(!config.uses_ultimate);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let config = BuildConfiguration::parse("  IU-181.5540.7\n");
        assert!(config.uses_ultimate);
        assert_eq!(config.build_number, "181.5540.7");
    }
}
