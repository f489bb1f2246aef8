use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Keys a complete configuration file is expected to carry.
const EXPECTED_KEYS: &[&str] = &[
    "database",
    "default_session",
    "export_dir",
    "scan_prompt_unknown",
];

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path) -> AppResult<()> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        println!("{}", content);
        Ok(())
    }

    pub fn edit(path: &Path, editor: &Option<String>) -> AppResult<()> {
        let ed = editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".into()
                } else {
                    "nano".into()
                }
            });

        Command::new(ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(())
    }

    /// Report keys missing from the file (their defaults apply) and reject
    /// values the application cannot use. Returns the missing keys.
    pub fn check(path: &Path) -> AppResult<Vec<String>> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let yaml: Value =
            serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;
        let map = yaml
            .as_mapping()
            .ok_or_else(|| AppError::Config("configuration root must be a mapping".into()))?;

        let missing: Vec<String> = EXPECTED_KEYS
            .iter()
            .filter(|k| !map.contains_key(Value::String(k.to_string())))
            .map(|k| k.to_string())
            .collect();

        // full parse validates types and the session label
        Config::from_yaml(&content)?;

        if missing.is_empty() {
            success("Configuration file is complete.");
        } else {
            for k in &missing {
                warning(format!("Missing key '{}' (default value in use)", k));
            }
        }

        Ok(missing)
    }
}
