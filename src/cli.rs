// Command line surface: the window by default, plus headless status/set
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::Config;
use crate::error::CliError;
use crate::sysfs::{self, Gateway};
use crate::types::{Attribute, WriteOutcome, ATTRIBUTES};

#[derive(Parser)]
#[command(author, version, about = "Control panel for LG Gram laptop features")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open the control panel window (default)
    Gui,
    /// Print every attribute and its current value
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Write one attribute, asking for authentication if needed
    Set {
        /// Attribute key, e.g. fan_mode or battery_limit
        key: String,
        value: String,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AttributeStatus {
    pub key: &'static str,
    pub path: PathBuf,
    /// `None` when the attribute is missing or unreadable
    pub value: Option<String>,
}

pub fn status(config: &Config) -> Vec<AttributeStatus> {
    ATTRIBUTES
        .iter()
        .map(|spec| {
            let path = config.attribute_path(spec);
            let value = if sysfs::path_exists(&path) { sysfs::read(&path) } else { None };
            AttributeStatus { key: spec.key, path, value }
        })
        .collect()
}

pub fn render_status(rows: &[AttributeStatus], json: bool) -> Result<String, CliError> {
    if json {
        return Ok(serde_json::to_string_pretty(rows)?);
    }
    let width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0);
    let lines: Vec<String> = rows
        .iter()
        .map(|r| {
            format!(
                "{:width$}  {:11}  {}",
                r.key,
                r.value.as_deref().unwrap_or("unavailable"),
                r.path.display(),
                width = width
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

pub fn set(config: &Config, gateway: &Gateway, key: &str, value: &str) -> Result<WriteOutcome, CliError> {
    let attribute = Attribute::from_key(key).ok_or_else(|| CliError::UnknownAttribute(key.to_string()))?;
    let spec = attribute.spec();
    if !spec.accepts(value) {
        return Err(CliError::IllegalValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: spec.domain.join(", "),
        });
    }

    let path = config.attribute_path(spec);
    if !sysfs::path_exists(&path) {
        return Err(CliError::Unavailable { key: key.to_string(), path });
    }

    let outcome = gateway.write_blocking(&path, value);
    if outcome.success {
        Ok(outcome)
    } else {
        Err(CliError::WriteFailed {
            path,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevate::Pkexec;
    use crate::types::{WriteMechanism, FAN_MODE, READER_MODE};
    use std::sync::Arc;

    struct Fixture {
        dir: tempfile::TempDir,
        rt: tokio::runtime::Runtime,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                rt: tokio::runtime::Runtime::new().unwrap(),
            }
        }

        fn config(&self) -> Config {
            Config {
                sysfs_root: self.dir.path().to_path_buf(),
                ..Config::default()
            }
        }

        // `false` stands in for pkexec; these tests never need it to succeed
        fn gateway(&self) -> Gateway {
            Gateway::new(self.rt.handle().clone(), Arc::new(Pkexec::new("false")))
        }

        fn put(&self, sysfs_path: &str, value: &str) -> PathBuf {
            let path = self.config().locate(sysfs_path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, value).unwrap();
            path
        }
    }

    #[test]
    fn set_writes_legal_value() {
        let fx = Fixture::new();
        let path = fx.put(FAN_MODE, "0");

        let outcome = set(&fx.config(), &fx.gateway(), "fan_mode", "2").unwrap();
        assert_eq!(outcome.mechanism, WriteMechanism::Direct);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "2");
    }

    #[test]
    fn set_rejects_unknown_key_and_illegal_value() {
        let fx = Fixture::new();
        let path = fx.put(FAN_MODE, "0");

        let err = set(&fx.config(), &fx.gateway(), "turbo", "1").unwrap_err();
        assert!(matches!(err, CliError::UnknownAttribute(_)));

        let err = set(&fx.config(), &fx.gateway(), "fan_mode", "3").unwrap_err();
        assert!(matches!(err, CliError::IllegalValue { .. }));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "0");
    }

    #[test]
    fn set_refuses_missing_attribute() {
        let fx = Fixture::new();
        let err = set(&fx.config(), &fx.gateway(), "usb_charge", "1").unwrap_err();
        assert!(matches!(err, CliError::Unavailable { .. }));
    }

    #[test]
    fn status_marks_missing_attributes_unavailable() {
        let fx = Fixture::new();
        fx.put(READER_MODE, "1\n");

        let rows = status(&fx.config());
        assert_eq!(rows.len(), ATTRIBUTES.len());
        let reader = rows.iter().find(|r| r.key == "reader_mode").unwrap();
        assert_eq!(reader.value.as_deref(), Some("1"));
        let fan = rows.iter().find(|r| r.key == "fan_mode").unwrap();
        assert_eq!(fan.value, None);

        let text = render_status(&rows, false).unwrap();
        assert!(text.contains("unavailable"));

        let json: serde_json::Value = serde_json::from_str(&render_status(&rows, true).unwrap()).unwrap();
        assert_eq!(json[0]["key"], "reader_mode");
        assert_eq!(json[0]["value"], "1");
    }

    #[test]
    fn cli_defaults_to_gui() {
        let cli = Cli::try_parse_from(["lg-gram-manager"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["lg-gram-manager", "set", "battery_limit", "80"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Set { ref key, ref value }) if key == "battery_limit" && value == "80"));
    }
}
