use std::env;
use thiserror::Error;

pub const TOKEN_ENV: &str = "RIDE_ANNOUNCER_TELEGRAM_TOKEN";
pub const BOT_NAME_ENV: &str = "RIDE_ANNOUNCER_BOT_NAME";
pub const BOT_DESCRIPTION_ENV: &str = "RIDE_ANNOUNCER_BOT_DESCRIPTION";

const DEFAULT_BOT_NAME: &str = "Ride Announcer Bot";
const DEFAULT_BOT_DESCRIPTION: &str =
    "Bot for scheduling and announcing planned bicycle trips in chat groups.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingToken(&'static str),
}

#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub bot_name: String,
    pub bot_description: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"***")
            .field("bot_name", &self.bot_name)
            .field("bot_description", &self.bot_description)
            .finish()
    }
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(TOKEN_ENV)
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingToken(TOKEN_ENV))?;

        Ok(Self {
            token,
            bot_name: lookup(BOT_NAME_ENV).unwrap_or_else(|| DEFAULT_BOT_NAME.to_string()),
            bot_description: lookup(BOT_DESCRIPTION_ENV)
                .unwrap_or_else(|| DEFAULT_BOT_DESCRIPTION.to_string()),
        })
    }
}
