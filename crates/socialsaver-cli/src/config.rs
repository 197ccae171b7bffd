use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub storage: Storage,
    pub view: Option<View>,
    pub tui: Option<Tui>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum Storage {
    Http {
        base_url: Option<String>,
        timeout_ms: Option<u64>,
    },
    File {
        path: Option<PathBuf>,
    },
}

impl Default for Storage {
    fn default() -> Self {
        Storage::Http {
            base_url: None,
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct View {
    /// newest | oldest | alpha
    pub default_sort: Option<String>,
    /// all | today | week | month
    pub default_range: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Tui {
    /// Theme file name under the config dir, or an absolute path
    pub theme: Option<String>,
    /// How long toasts stay in the footer (default: 1500)
    pub toast_ms: Option<u64>,
}

pub fn config_dir() -> PathBuf {
    if let Some(bd) = directories::BaseDirs::new() {
        bd.config_dir().join("socialsaver")
    } else {
        PathBuf::from("./.config/socialsaver")
    }
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

/// Snapshot used by `--store file` when neither the flag nor settings name one.
pub fn default_snapshot_path() -> PathBuf {
    config_dir().join("data").join("items.json")
}

pub fn expand(path: &std::path::Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).to_string())
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    match std::fs::read_to_string(&path) {
        Ok(s) => parse_settings(&s).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

pub fn parse_settings(s: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(s)
}

impl Settings {
    pub fn toast_ms(&self) -> u64 {
        self.tui.as_ref().and_then(|t| t.toast_ms).unwrap_or(1500)
    }

    pub fn theme(&self) -> Option<&str> {
        self.tui.as_ref().and_then(|t| t.theme.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_http_default() {
        let s = parse_settings("").unwrap();
        assert!(matches!(
            s.storage,
            Storage::Http {
                base_url: None,
                timeout_ms: None
            }
        ));
        assert_eq!(s.toast_ms(), 1500);
    }

    #[test]
    fn file_backend_and_view_defaults() {
        let s = parse_settings(
            r#"
[storage]
backend = "file"
path = "~/saves/items.json"

[view]
default_sort = "alpha"
default_range = "week"

[tui]
toast_ms = 800
"#,
        )
        .unwrap();
        match s.storage {
            Storage::File { ref path } => {
                assert_eq!(*path, Some(PathBuf::from("~/saves/items.json")))
            }
            other => panic!("expected file backend, got {other:?}"),
        }
        let view = s.view.clone().unwrap();
        assert_eq!(view.default_sort.as_deref(), Some("alpha"));
        assert_eq!(view.default_range.as_deref(), Some("week"));
        assert_eq!(s.toast_ms(), 800);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(parse_settings("[storage]\nbackend = \"sqlite\"\n").is_err());
    }

    #[test]
    fn tilde_expands_and_absolute_paths_pass_through() {
        let p = expand(std::path::Path::new("/abs/items.json"));
        assert_eq!(p, PathBuf::from("/abs/items.json"));
        if directories::BaseDirs::new().is_some() {
            let home = expand(std::path::Path::new("~/items.json"));
            assert!(!home.starts_with("~"));
            assert!(home.ends_with("items.json"));
        }
    }
}
