use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Error type for reading the global configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// `$XDG_CONFIG_HOME/tdx/config.toml`, else `~/.config/tdx/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    config_path_from(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = match xdg_config_home.filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => PathBuf::from(home.filter(|v| !v.is_empty())?).join(".config"),
    };
    Some(base.join("tdx").join("config.toml"))
}

/// Read a config file
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the configuration. An explicitly named file must exist; the default
/// location is optional and falls back to built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        tracing::debug!(path = %path.display(), "loading config");
        return read_config(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => {
            tracing::debug!(path = %path.display(), "loading config");
            read_config(&path)
        }
        _ => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::ScopeMode;
    use tempfile::TempDir;

    #[test]
    fn config_path_prefers_xdg() {
        assert_eq!(
            config_path_from(Some("/x".into()), Some("/home/u".into())),
            Some(PathBuf::from("/x/tdx/config.toml"))
        );
        assert_eq!(
            config_path_from(None, Some("/home/u".into())),
            Some(PathBuf::from("/home/u/.config/tdx/config.toml"))
        );
        assert_eq!(
            config_path_from(Some("".into()), Some("/home/u".into())),
            Some(PathBuf::from("/home/u/.config/tdx/config.toml"))
        );
        assert_eq!(config_path_from(None, None), None);
    }

    #[test]
    fn reads_partial_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            "[view]\nfilter-done = true\nsection-scope = \"section\"\n\n[display]\ncheck-symbol = \"x\"\n",
        )
        .unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert!(config.view.filter_done);
        assert_eq!(config.view.section_scope, ScopeMode::Section);
        assert!(config.view.word_wrap);
        assert_eq!(config.display.check_symbol, "x");
        assert_eq!(config.display.select_marker, "➜");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[view]\nmax-visible = \"lots\"\n").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
