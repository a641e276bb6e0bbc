use std::env;

use crate::constants::durations::DEFAULT_KEEPALIVE_PORT;

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    /// When set, commands are registered in this guild only
    pub guild_id: Option<u64>,
    /// Port for the keep-alive HTTP endpoint
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| "DISCORD_TOKEN environment variable not set")?;

        let guild_id = env::var("GUILD_ID")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_KEEPALIVE_PORT);

        Ok(Self {
            discord_token,
            guild_id,
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test body: these mutate process-wide environment variables and
    // must not run concurrently with each other.
    #[test]
    fn test_from_env() {
        env::remove_var("DISCORD_TOKEN");
        assert!(Settings::from_env().is_err());

        env::set_var("DISCORD_TOKEN", "token");
        env::remove_var("GUILD_ID");
        env::remove_var("PORT");
        let settings = Settings::from_env().unwrap();
        assert!(settings.guild_id.is_none());
        assert_eq!(settings.port, DEFAULT_KEEPALIVE_PORT);

        env::set_var("GUILD_ID", "123456789");
        env::set_var("PORT", "8080");
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.guild_id, Some(123456789));
        assert_eq!(settings.port, 8080);

        // Garbage values fall back to defaults instead of failing startup
        env::set_var("GUILD_ID", "not-a-number");
        env::set_var("PORT", "not-a-port");
        let settings = Settings::from_env().unwrap();
        assert!(settings.guild_id.is_none());
        assert_eq!(settings.port, DEFAULT_KEEPALIVE_PORT);
    }
}
