//! Layered configuration.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. `md2blocks.toml` in the working directory, or the `--config` file
//! 3. `MD2BLOCKS_*` environment variables (`MD2BLOCKS_HTML=false`)
//! 4. command-line flags

use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use md2blocks::ConvertOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "md2blocks.toml";
pub const ENV_PREFIX: &str = "MD2BLOCKS_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Md2BlocksConfig {
    /// Extract `<img>` tags from raw HTML
    pub html: bool,
    /// Render `$...$` and `$$...$$` equations
    pub latex: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// `check` fails when any document has diagnostics
    pub fail_on_diagnostics: bool,
}

impl Default for Md2BlocksConfig {
    fn default() -> Self {
        Self {
            html: true,
            latex: true,
            pretty: false,
            fail_on_diagnostics: false,
        }
    }
}

/// Values set on the command line. Only flags that were given are merged,
/// so an absent flag never masks the file or environment.
#[derive(Debug, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latex: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_on_diagnostics: Option<bool>,
}

impl CliOverrides {
    /// Map the negative `--no-*` switches; `false` means "not given"
    pub fn from_flags(no_html: bool, no_latex: bool) -> Self {
        Self {
            html: no_html.then_some(false),
            latex: no_latex.then_some(false),
            ..Self::default()
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty.then_some(true);
        self
    }

    pub fn fail_on_diagnostics(mut self, fail: bool) -> Self {
        self.fail_on_diagnostics = fail.then_some(true);
        self
    }
}

impl Md2BlocksConfig {
    /// Load configuration from every source, `config_path` replacing the
    /// default file lookup.
    pub fn load(overrides: &CliOverrides, config_path: Option<&Path>) -> Result<Self> {
        Self::figment(overrides, config_path)?
            .extract()
            .map_err(|e| {
                ConfigError::Invalid {
                    message: e.to_string(),
                    hint: format!("Check {DEFAULT_CONFIG_FILE} field names and types"),
                }
                .into()
            })
    }

    fn figment(overrides: &CliOverrides, config_path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    tracing::debug!("loading {}", DEFAULT_CONFIG_FILE);
                    figment = figment.merge(Toml::file(default_path));
                }
            }
        }

        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides)))
    }

    /// Library options for one document
    pub fn convert_options(&self, filepath: impl Into<String>) -> ConvertOptions {
        ConvertOptions::builder()
            .filepath(filepath.into())
            .html(self.html)
            .latex(self.latex)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn defaults() {
        let config = Md2BlocksConfig::load(&CliOverrides::default(), None).unwrap();
        assert_eq!(config, Md2BlocksConfig::default());
        assert!(config.html);
        assert!(config.latex);
    }

    #[test]
    #[serial]
    fn file_overrides_defaults() {
        let file = write_config("latex = false\npretty = true\n");
        let config = Md2BlocksConfig::load(&CliOverrides::default(), Some(file.path())).unwrap();
        assert!(!config.latex);
        assert!(config.pretty);
        assert!(config.html);
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        let file = write_config("html = true\n");
        unsafe {
            std::env::set_var("MD2BLOCKS_HTML", "false");
        }
        let config = Md2BlocksConfig::load(&CliOverrides::default(), Some(file.path()));
        unsafe {
            std::env::remove_var("MD2BLOCKS_HTML");
        }
        assert!(!config.unwrap().html);
    }

    #[test]
    #[serial]
    fn flags_override_everything() {
        let file = write_config("latex = true\n");
        let overrides = CliOverrides::from_flags(false, true).pretty(true);
        let config = Md2BlocksConfig::load(&overrides, Some(file.path())).unwrap();
        assert!(!config.latex);
        assert!(config.pretty);
        assert!(config.html);
    }

    #[test]
    #[serial]
    fn absent_flags_do_not_mask_file() {
        let file = write_config("html = false\nfail_on_diagnostics = true\n");
        let overrides = CliOverrides::from_flags(false, false).fail_on_diagnostics(false);
        let config = Md2BlocksConfig::load(&overrides, Some(file.path())).unwrap();
        assert!(!config.html);
        assert!(config.fail_on_diagnostics);
    }

    #[test]
    #[serial]
    fn missing_explicit_file_is_an_error() {
        let err = Md2BlocksConfig::load(&CliOverrides::default(), Some(Path::new("/nonexistent/md2blocks.toml")))
            .unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    #[serial]
    fn unknown_fields_are_rejected() {
        let file = write_config("htm = false\n");
        let err = Md2BlocksConfig::load(&CliOverrides::default(), Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn convert_options_follow_config() {
        let config = Md2BlocksConfig {
            html: false,
            ..Md2BlocksConfig::default()
        };
        let options = config.convert_options("a.md");
        assert!(!options.html);
        assert!(options.latex);
        assert_eq!(options.filepath.as_deref(), Some("a.md"));
    }
}
