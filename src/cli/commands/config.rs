//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{ResourceError, ResourceResult};
use crate::resources::service::validate_namespace;
use crate::ui::{self, Level, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const VALID_KEYS: [&str; 8] = [
    "general.log_format",
    "bundle.root",
    "bundle.symbolic_name",
    "bundle.last_modified",
    "resources.namespace",
    "resources.base_dir",
    "resources.url_root",
    "cache.enabled",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> ResourceResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let mut updated = manager.load().await?;
            apply_value(&mut updated, &key, &value)?;
            manager.save(&updated).await?;
            ui::step(&UiContext::detect(), Level::Ok, &format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> ResourceResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> ResourceResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_hint(
            &ctx,
            Level::Warn,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_hint(
        &ctx,
        Level::Ok,
        "Configuration initialized",
        &path.display().to_string(),
    );
    Ok(())
}

/// Apply a dot-separated key to a config value
fn apply_value(config: &mut Config, key: &str, value: &str) -> ResourceResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => {
                return Err(ResourceError::User(format!(
                    "Invalid log format: {}. Use text/json",
                    value
                )))
            }
        },

        ["bundle", "root"] => config.bundle.root = PathBuf::from(value),
        ["bundle", "symbolic_name"] => config.bundle.symbolic_name = value.to_string(),
        ["bundle", "last_modified"] => {
            config.bundle.last_modified = match value {
                "" | "none" => None,
                _ => Some(value.parse().map_err(|_| {
                    ResourceError::User(format!("Invalid timestamp (epoch millis): {}", value))
                })?),
            }
        }

        ["resources", "namespace"] => {
            validate_namespace(value)?;
            config.resources.namespace = value.to_string();
        }
        ["resources", "base_dir"] => config.resources.base_dir = value.to_string(),
        ["resources", "url_root"] => config.resources.url_root = value.to_string(),

        ["cache", "enabled"] => config.cache.enabled = parse_bool(value)?,

        _ => {
            return Err(ResourceError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

fn parse_bool(value: &str) -> ResourceResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ResourceError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn apply_known_keys() {
        let mut config = Config::default();
        apply_value(&mut config, "cache.enabled", "no").unwrap();
        apply_value(&mut config, "bundle.last_modified", "1000").unwrap();
        apply_value(&mut config, "resources.namespace", "acme").unwrap();

        assert!(!config.cache.enabled);
        assert_eq!(config.bundle.last_modified, Some(1000));
        assert_eq!(config.resources.namespace, "acme");

        apply_value(&mut config, "bundle.last_modified", "none").unwrap();
        assert!(config.bundle.last_modified.is_none());
    }

    #[test]
    fn apply_rejects_bad_values() {
        let mut config = Config::default();
        assert!(apply_value(&mut config, "cache.enabled", "maybe").is_err());
        assert!(apply_value(&mut config, "bundle.last_modified", "soon").is_err());
        assert!(apply_value(&mut config, "general.log_format", "xml").is_err());
        assert!(matches!(
            apply_value(&mut config, "resources.namespace", "a/b"),
            Err(ResourceError::NamespaceInvalid { .. })
        ));
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut config = Config::default();
        let err = apply_value(&mut config, "vm.name", "x").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
    }

    #[tokio::test]
    async fn set_persists_to_manager_path() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("config.toml"));

        let args = ConfigArgs {
            action: Some(ConfigAction::Set {
                key: "resources.base_dir".to_string(),
                value: "static".to_string(),
            }),
        };
        execute(args, &Config::default(), &manager).await.unwrap();

        let loaded = manager.load().await.unwrap();
        assert_eq!(loaded.resources.base_dir, "static");
    }
}
