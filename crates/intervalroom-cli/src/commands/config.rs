use clap::{Subcommand, ValueEnum};
use intervalroom_core::{seconds_to_hms, Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dotted key
    Get {
        /// e.g. "timer.work_duration", "notifications.sound"
        key: String,
    },
    /// Validate, store and echo one value
    Set {
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Print the whole configuration
    List {
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Print where the configuration file lives
    Path,
    /// Overwrite the file with defaults
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Format {
    Json,
    Toml,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
            if key.starts_with("timer.") {
                let total = config.interval().total_duration().max(0) as u64;
                tracing::info!(session = %seconds_to_hms(total), "timer settings changed");
            }
        }
        ConfigAction::List { format } => {
            let config = Config::load()?;
            let rendered = match format {
                Format::Json => serde_json::to_string_pretty(&config)?,
                Format::Toml => toml::to_string_pretty(&config)?,
            };
            println!("{}", rendered.trim_end());
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
