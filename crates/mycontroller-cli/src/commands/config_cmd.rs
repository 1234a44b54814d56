//! Config command implementation.

use std::path::Path;

use anyhow::{Result, bail};

use crate::cli::{ConfigAction, ConfigKey};
use crate::config::Config;

const ALL_KEYS: [(ConfigKey, &str); 6] = [
    (ConfigKey::ServerUrl, "server-url"),
    (ConfigKey::Username, "username"),
    (ConfigKey::Password, "password"),
    (ConfigKey::Language, "language"),
    (ConfigKey::NoColor, "no-color"),
    (ConfigKey::AssumeYes, "assume-yes"),
];

pub fn cmd_config(action: ConfigAction, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_from(path);
            for (key, name) in ALL_KEYS {
                println!("{} = {}", name, config.get(key).unwrap_or_else(|| "-".to_string()));
            }
            if let Some(location) = config.location {
                println!("location = {}, {}", location.latitude, location.longitude);
            }
        }
        ConfigAction::Get { key } => {
            let config = Config::load_from(path);
            match config.get(key) {
                Some(value) => println!("{}", value),
                None => bail!("{} is not set", key_name(key)),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(path);
            config.set(key, &value)?;
            config.save_to(path)?;
            println!("Set {} = {}", key_name(key), config.get(key).unwrap_or(value));
        }
        ConfigAction::Unset { key } => {
            let mut config = Config::load_from(path);
            config.unset(key);
            config.save_to(path)?;
            println!("Unset {}", key_name(key));
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            if path.exists() {
                println!("Config already exists at {}", path.display());
            } else {
                Config::default().save_to(path)?;
                println!("Created config at {}", path.display());
            }
        }
    }
    Ok(())
}

fn key_name(key: ConfigKey) -> &'static str {
    ALL_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, name)| *name)
        .unwrap_or("?")
}
