use crate::errors::{AppError, AppResult};
use crate::models::Session;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_session")]
    pub default_session: String,
    /// Directory for reports when `export` gets no explicit `--file`.
    #[serde(default)]
    pub export_dir: Option<String>,
    /// Ask for a name when an unlisted token is scanned interactively.
    #[serde(default = "default_scan_prompt_unknown")]
    pub scan_prompt_unknown: bool,
}

fn default_session() -> String {
    Session::Morning.as_str().to_string()
}

fn default_scan_prompt_unknown() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            default_session: default_session(),
            export_dir: None,
            scan_prompt_unknown: default_scan_prompt_unknown(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rattendance")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rattendance")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rattendance.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rattendance.sqlite")
    }

    /// Parse and validate a YAML configuration document.
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config =
            serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?;
        cfg.session()?;
        Ok(cfg)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        Self::from_yaml(&content)
    }

    /// The configured default session.
    pub fn session(&self) -> AppResult<Session> {
        Session::parse(&self.default_session)
            .ok_or_else(|| AppError::InvalidSession(self.default_session.clone()))
    }

    pub fn export_dir(&self) -> PathBuf {
        match &self.export_dir {
            Some(dir) if !dir.trim().is_empty() => crate::utils::path::expand_tilde(dir),
            _ => PathBuf::from("."),
        }
    }

    fn resolve_db_path(dir: &Path, custom_name: Option<&str>) -> PathBuf {
        match custom_name {
            Some(name) => {
                let p = crate::utils::path::expand_tilde(name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => dir.join("rattendance.sqlite"),
        }
    }

    /// Initialize configuration and database files. Returns the config in effect.
    ///
    /// In test mode the config file is left untouched.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        let db_path = if is_test {
            // test databases live where the caller says
            custom_name
                .as_deref()
                .map(crate::utils::path::expand_tilde)
                .unwrap_or_else(Self::database_file)
        } else {
            fs::create_dir_all(&dir)?;
            Self::resolve_db_path(&dir, custom_name.as_deref())
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
            file.write_all(yaml.as_bytes())
                .map_err(|_| AppError::ConfigSave)?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let cfg = Config::from_yaml("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.default_session, "morning");
        assert!(cfg.scan_prompt_unknown);
        assert!(cfg.export_dir.is_none());
        assert_eq!(cfg.session().unwrap(), Session::Morning);
    }

    #[test]
    fn invalid_session_is_rejected() {
        let err = Config::from_yaml("database: x\ndefault_session: night\n").unwrap_err();
        assert!(matches!(err, AppError::InvalidSession(s) if s == "night"));
    }

    #[test]
    fn session_label_is_case_insensitive() {
        let cfg = Config::from_yaml("database: x\ndefault_session: Evening\n").unwrap();
        assert_eq!(cfg.session().unwrap(), Session::Evening);
    }

    #[test]
    fn export_dir_defaults_to_cwd() {
        let cfg = Config::from_yaml("database: x\n").unwrap();
        assert_eq!(cfg.export_dir(), PathBuf::from("."));
    }
}
