use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::elevate::DEFAULT_ELEVATOR;
use crate::sysfs::resolve_path;
use crate::types::AttributeSpec;

// Read-only settings; the panel never writes this file back
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    /// Prefix applied to every attribute path ("/" on real hardware)
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,
    /// Program used for privileged writes, run as `<elevator> tee <path>`
    #[serde(default = "default_elevator")]
    pub elevator: String,
    /// Initial theme; `None` follows the system
    #[serde(default)]
    pub dark_mode: Option<bool>,
}

fn default_sysfs_root() -> PathBuf {
    PathBuf::from("/")
}

fn default_elevator() -> String {
    DEFAULT_ELEVATOR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sysfs_root: default_sysfs_root(),
            elevator: default_elevator(),
            dark_mode: None,
        }
    }
}

impl Config {
    /// Maps an absolute sysfs path under `sysfs_root`.
    pub fn locate(&self, path: &str) -> PathBuf {
        self.sysfs_root.join(path.trim_start_matches('/'))
    }

    /// Backing file for an attribute, preferring its primary path.
    pub fn attribute_path(&self, spec: &AttributeSpec) -> PathBuf {
        let primary = self.locate(spec.primary);
        match spec.alternate {
            Some(alt) => resolve_path(&primary, &self.locate(alt)),
            None => primary,
        }
    }

    fn apply_env(mut self) -> Self {
        if let Ok(root) = std::env::var("LG_GRAM_SYSFS_ROOT") {
            self.sysfs_root = PathBuf::from(root);
        }
        if let Ok(elevator) = std::env::var("LG_GRAM_ELEVATOR") {
            self.elevator = elevator;
        }
        self
    }
}

pub fn config_path() -> PathBuf {
    if let Ok(p) = std::env::var("LG_GRAM_MANAGER_CONFIG") {
        return PathBuf::from(p);
    }
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|_| PathBuf::from("/etc"));
    base.join("lg-gram-manager").join("config.json")
}

pub fn load() -> Config {
    load_from(&config_path()).apply_env()
}

pub fn load_from(path: &Path) -> Config {
    if let Ok(mut f) = File::open(path) {
        let mut buf = String::new();
        if let Err(e) = f.read_to_string(&mut buf) {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            return Config::default();
        }
        match serde_json::from_str::<Config>(&buf) {
            Ok(cfg) => {
                tracing::info!("Loaded config from {:?}", path);
                return cfg;
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}. Using defaults.", path, e);
            }
        }
    } else {
        tracing::debug!("No config file at {:?}, using defaults", path);
    }
    Config::default()
}

/// Loads `KEY=VALUE` lines from `.env` into the process environment.
pub fn load_dotenv(path: &Path) {
    let Ok(content) = std::fs::read_to_string(path) else {
        return;
    };
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(pos) = line.find('=') {
            let key = line[..pos].trim();
            let value = line[pos + 1..].trim().trim_matches('"').trim_matches('\'');
            std::env::set_var(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_keeps_paths_verbatim() {
        let cfg = Config::default();
        assert_eq!(
            cfg.locate("/sys/devices/platform/lg-laptop/fan_mode"),
            PathBuf::from("/sys/devices/platform/lg-laptop/fan_mode")
        );
    }

    #[test]
    fn custom_root_prefixes_paths() {
        let cfg = Config {
            sysfs_root: PathBuf::from("/tmp/fake"),
            ..Config::default()
        };
        assert_eq!(
            cfg.locate("/sys/class/leds/tpad_led/brightness"),
            PathBuf::from("/tmp/fake/sys/class/leds/tpad_led/brightness")
        );
    }

    #[test]
    fn led_paths_fall_back_to_driver_naming() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            sysfs_root: dir.path().to_path_buf(),
            ..Config::default()
        };
        let spec = crate::types::Attribute::KeyboardLight.spec();
        assert_eq!(cfg.attribute_path(spec), cfg.locate(spec.primary));

        let alt = cfg.locate("/sys/class/leds/lg_laptop::kbd_backlight/brightness");
        std::fs::create_dir_all(alt.parent().unwrap()).unwrap();
        std::fs::write(&alt, "127").unwrap();
        assert_eq!(cfg.attribute_path(spec), alt);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "dark_mode": true }"#).unwrap();

        let cfg = load_from(&path);
        assert_eq!(cfg.dark_mode, Some(true));
        assert_eq!(cfg.elevator, "pkexec");
        assert_eq!(cfg.sysfs_root, PathBuf::from("/"));
    }

    #[test]
    fn malformed_or_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(load_from(&path), Config::default());

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_from(&path), Config::default());
    }
}
