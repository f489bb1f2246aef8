use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::{AppError, AppResult};

use crate::cli::parser::Commands;
use crate::ui::messages::{info, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        // ---- PRINT CONFIG ----
        if *print_config {
            println!("📄 Current configuration:\n");
            if path.exists() {
                ConfigLogic::print(&path)?;
            } else {
                warning(format!("{} not found, showing defaults", path.display()));
                let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
                println!("{}", yaml);
            }
        }

        // ---- CHECK CONFIG ----
        if *check {
            if !path.exists() {
                return Err(AppError::ConfigLoad);
            }
            let missing = ConfigLogic::check(&path)?;
            if !missing.is_empty() {
                info(format!(
                    "{} key(s) missing, run `rattendance config --edit` to add them",
                    missing.len()
                ));
            }
        }

        // ---- EDIT CONFIG ----
        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
            // reload to surface mistakes right away
            let content = std::fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            Config::from_yaml(&content)?;
            info("Configuration file is valid.");
        }
    }

    Ok(())
}
