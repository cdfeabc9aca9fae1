use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default configuration, validated as TOML by the build script.
static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub resolver: ResolverConfig,
}

/// How headings are emitted in the body HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingStyle {
    /// `<h1>`..`<h6>` markup.
    Structural,
    /// A bold paragraph, for editors that reject heading markup.
    InlineBold,
}

/// What a blank line outside a code block turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlankLines {
    Collapse,
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Drop the leading level-1 heading; the editor shows it in its title field.
    pub skip_leading_h1: bool,
    pub heading_style: HeadingStyle,
    /// Images, blockquotes and horizontal rules.
    pub support_media: bool,
    pub blank_lines: BlankLines,
    /// Group consecutive list items of one kind into a single container.
    pub group_list_items: bool,
}

impl RenderConfig {
    /// Rich rendering for a draft editor with a dedicated title field.
    pub fn full() -> Self {
        Self {
            skip_leading_h1: true,
            heading_style: HeadingStyle::InlineBold,
            support_media: true,
            blank_lines: BlankLines::Collapse,
            group_list_items: true,
        }
    }

    /// Plain rendering used for rich clipboard copies.
    pub fn compact() -> Self {
        Self {
            skip_leading_h1: false,
            heading_style: HeadingStyle::Structural,
            support_media: false,
            blank_lines: BlankLines::Preserve,
            group_list_items: true,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::full()
    }
}

const MAX_TIMEOUT_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// Text shorter than this (in characters) counts as an empty draft field.
    pub short_text_len: usize,
}

impl ResolverConfig {
    /// The detection timeout, capped at one hour.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.min(MAX_TIMEOUT_MS))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Same settings with a different timeout.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout_ms: timeout.as_millis().try_into().unwrap_or(u64::MAX),
            ..self.clone()
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            poll_interval_ms: 120,
            short_text_len: 5,
        }
    }
}

impl Config {
    /// The configuration shipped with the crate.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load config from a TOML file, or return the compiled default if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::compiled_default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn compiled_default_matches_code_default() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
[render]
heading_style = "structural"

[resolver]
timeout_ms = 200
"#,
        )
        .unwrap();

        assert_eq!(config.render.heading_style, HeadingStyle::Structural);
        assert!(config.render.skip_leading_h1);
        assert_eq!(config.resolver.timeout(), Duration::from_millis(200));
        assert_eq!(config.resolver.poll_interval_ms, 120);
    }

    #[test]
    fn compact_preset() {
        let compact = RenderConfig::compact();
        assert!(!compact.skip_leading_h1);
        assert!(!compact.support_media);
        assert_eq!(compact.blank_lines, BlankLines::Preserve);
    }

    #[test]
    fn load_missing_file_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");

        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
        assert!(matches!(
            Config::load(&path),
            Err(Error::ConfigRead { .. })
        ));
    }

    #[test]
    fn load_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[render]\nheading_style = \"shouting\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn timeout_is_capped() {
        let config = ResolverConfig {
            timeout_ms: u64::MAX,
            ..ResolverConfig::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(3600));
        assert_eq!(
            ResolverConfig::default()
                .with_timeout(Duration::MAX)
                .timeout(),
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn with_timeout_keeps_interval() {
        let config = ResolverConfig::default().with_timeout(Duration::from_millis(50));
        assert_eq!(config.timeout_ms, 50);
        assert_eq!(config.poll_interval_ms, 120);
    }
}
