//! Optional RON configuration plus resolution against CLI flags.
//!
//! Precedence is CLI flag, then config file, then built-in default. The
//! locale default comes from `LC_ALL` / `LANG`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tabmark_core::{
    AppSettings, ConversionBackend, HeaderFormat, Locale, RenderMode, RenderOptions,
    DEFAULT_DEBOUNCE,
};
use tabmark_engine::RemoteSettings;
use tabmark_logging::{tabmark_info, tabmark_warn};

use crate::cli::RenderArgs;

const CONFIG_FILENAME: &str = "tabmark.ron";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub mode: Option<RenderMode>,
    pub locale: Option<Locale>,
    pub header: Option<HeaderFormat>,
    pub debounce_ms: Option<u64>,
    pub remote_endpoint: Option<String>,
    /// Per-request limit for remote conversions; unset waits indefinitely.
    pub request_timeout_ms: Option<u64>,
    pub listen_addr: Option<String>,
}

/// Load the config at `explicit`, or `./tabmark.ron` if it exists.
///
/// Problems are logged and fall back to defaults; a bad config never stops
/// the tool.
pub fn load(explicit: Option<&Path>) -> FileConfig {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(CONFIG_FILENAME);
            if !default.exists() {
                return FileConfig::default();
            }
            default
        }
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            tabmark_warn!("Failed to read config from {:?}: {}", path, err);
            return FileConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            tabmark_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            tabmark_warn!("Failed to parse config from {:?}: {}", path, err);
            FileConfig::default()
        }
    }
}

/// Effective settings for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mode: RenderMode,
    pub locale: Locale,
    pub header: Option<HeaderFormat>,
    pub debounce: Duration,
    pub remote_endpoint: Option<String>,
    pub request_timeout: Option<Duration>,
    pub listen_addr: String,
}

impl Settings {
    pub fn resolve(
        file: &FileConfig,
        args: &RenderArgs,
        remote: Option<&str>,
        lang: Option<&str>,
    ) -> Self {
        let locale = args
            .locale
            .map(Locale::from)
            .or(file.locale)
            .unwrap_or_else(|| Locale::detect(lang));
        let remote_endpoint = remote
            .map(str::to_string)
            .or_else(|| file.remote_endpoint.clone());
        if render_flags_ignored(remote_endpoint.as_deref(), args) {
            tabmark_warn!(
                "--mode, --locale and --header are ignored: the remote endpoint renders with its own options"
            );
        }
        Self {
            mode: args.mode.map(RenderMode::from).or(file.mode).unwrap_or_default(),
            locale,
            header: args.header.map(HeaderFormat::from).or(file.header),
            debounce: file
                .debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_DEBOUNCE),
            remote_endpoint,
            request_timeout: file.request_timeout_ms.map(Duration::from_millis),
            listen_addr: file
                .listen_addr
                .clone()
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        let options = RenderOptions::for_locale(self.mode, self.locale);
        match self.header {
            Some(header) => options.with_header(header),
            None => options,
        }
    }

    pub fn remote_settings(&self) -> Option<RemoteSettings> {
        let endpoint = self.remote_endpoint.as_deref()?;
        let mut settings = RemoteSettings::new(endpoint);
        settings.request_timeout = self.request_timeout;
        Some(settings)
    }

    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            mode: self.mode,
            locale: self.locale,
            header: self.header,
            backend: if self.remote_endpoint.is_some() {
                ConversionBackend::Remote
            } else {
                ConversionBackend::Local
            },
            debounce: self.debounce,
        }
    }
}

/// Render flags have no effect once a remote endpoint does the rendering.
fn render_flags_ignored(remote_endpoint: Option<&str>, args: &RenderArgs) -> bool {
    remote_endpoint.is_some() && args.any_set()
}

/// Language tag from the environment, `LC_ALL` winning over `LANG`.
pub fn env_language() -> Option<String> {
    ["LC_ALL", "LANG"]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{LocaleArg, ModeArg};
    use pretty_assertions::assert_eq;

    #[test]
    fn ron_config_is_loaded() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("tabmark.ron");
        fs::write(
            &path,
            r#"(
                mode: Some(Sort),
                locale: Some(En),
                debounce_ms: Some(250),
                request_timeout_ms: Some(3000),
                listen_addr: Some("0.0.0.0:9000"),
            )"#,
        )
        .unwrap();

        let config = load(Some(path.as_path()));
        assert_eq!(config.mode, Some(RenderMode::Sort));
        assert_eq!(config.locale, Some(Locale::En));
        assert_eq!(config.debounce_ms, Some(250));
        assert_eq!(config.request_timeout_ms, Some(3000));
        assert_eq!(config.header, None);
    }

    #[test]
    fn missing_or_invalid_config_falls_back_to_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let absent = temp.path().join("absent.ron");
        assert_eq!(load(Some(absent.as_path())), FileConfig::default());

        let bad = temp.path().join("bad.ron");
        fs::write(&bad, "(mode: Sideways)").unwrap();
        assert_eq!(load(Some(bad.as_path())), FileConfig::default());
    }

    #[test]
    fn cli_beats_config_beats_environment() {
        let file = FileConfig {
            mode: Some(RenderMode::Sort),
            locale: Some(Locale::Ja),
            ..FileConfig::default()
        };
        let args = RenderArgs {
            locale: Some(LocaleArg::En),
            ..RenderArgs::default()
        };

        let settings = Settings::resolve(&file, &args, None, Some("ja_JP.UTF-8"));
        assert_eq!(settings.locale, Locale::En);
        assert_eq!(settings.mode, RenderMode::Sort);
        assert_eq!(settings.render_options().header, HeaderFormat::Urls);
        assert_eq!(settings.app_settings().backend, ConversionBackend::Local);
        assert!(!render_flags_ignored(None, &args));
        assert!(settings.remote_settings().is_none());

        let args = RenderArgs {
            mode: Some(ModeArg::Group),
            ..RenderArgs::default()
        };
        let settings = Settings::resolve(
            &FileConfig::default(),
            &args,
            Some("http://h/convert"),
            Some("en_GB"),
        );
        assert_eq!(settings.locale, Locale::En);
        assert_eq!(settings.mode, RenderMode::Group);
        assert_eq!(settings.debounce, DEFAULT_DEBOUNCE);
        assert_eq!(settings.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(settings.app_settings().backend, ConversionBackend::Remote);
        assert!(render_flags_ignored(settings.remote_endpoint.as_deref(), &args));
    }

    #[test]
    fn remote_settings_carry_the_configured_timeout() {
        let file = FileConfig {
            remote_endpoint: Some("http://h/convert".to_string()),
            request_timeout_ms: Some(1500),
            ..FileConfig::default()
        };
        let settings = Settings::resolve(&file, &RenderArgs::default(), None, None);
        assert!(!render_flags_ignored(
            settings.remote_endpoint.as_deref(),
            &RenderArgs::default()
        ));

        let remote = settings.remote_settings().unwrap();
        assert_eq!(remote.endpoint, "http://h/convert");
        assert_eq!(remote.request_timeout, Some(Duration::from_millis(1500)));
    }
}
