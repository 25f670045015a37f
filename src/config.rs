//! Runtime settings
//!
//! Settings come from three places, highest precedence first: explicit CLI flags
//! (some also readable from the environment), a launch query string such as
//! `?mode=follow&channel=room`, and built-in defaults.

use crate::sync::{ConfettiCue, DEFAULT_CHANNEL};
use clap::Args;
use std::str::FromStr;
use std::time::Duration;

/// Which side of the replication channel this process plays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    /// Holds the answer, accepts input, publishes
    #[default]
    Master,
    /// Mirrors the master's published state
    Follower,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown role '{0}' (expected master or follow)")]
    UnknownRole(String),
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "master" | "m" => Ok(Self::Master),
            "follow" | "follower" | "f" => Ok(Self::Follower),
            _ => Err(ConfigError::UnknownRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Master => "master",
            Self::Follower => "follower",
        })
    }
}

/// Parameters carried by a launch URL or bare query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    pub role: Option<Role>,
    pub relay: Option<String>,
    pub channel: Option<String>,
}

impl LaunchParams {
    /// Parse `index.html?mode=follow`, `?role=m` or `mode=master&channel=x`
    ///
    /// `mode` wins over `role` when both are given. Empty values count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRole`] for an unrecognised mode/role value.
    pub fn from_query(input: &str) -> Result<Self, ConfigError> {
        let query = input.split_once('?').map_or(input, |(_, q)| q);

        let mut mode = None;
        let mut role = None;
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "mode" => mode = Some(value.into_owned()),
                "role" => role = Some(value.into_owned()),
                "relay" => params.relay = Some(value.into_owned()),
                "channel" => params.channel = Some(value.into_owned()),
                _ => {}
            }
        }

        params.role = mode.or(role).map(|v| v.parse()).transpose()?;
        Ok(params)
    }
}

/// Connection and role flags shared by every networked command
#[derive(Debug, Clone, Args)]
pub struct SettingsArgs {
    /// Role: master (default) or follow
    #[arg(short, long, global = true)]
    pub mode: Option<String>,

    /// Launch URL or query string, e.g. "?mode=follow&channel=room"
    #[arg(long, global = true)]
    pub launch: Option<String>,

    /// Relay WebSocket URL; without it the session runs locally
    #[arg(long, global = true, env = "WORDLE_RELAY_URL")]
    pub relay: Option<String>,

    /// Channel name shared by master and followers
    #[arg(long, global = true, env = "WORDLE_CHANNEL")]
    pub channel: Option<String>,

    /// How many recent messages a late follower reads back
    #[arg(long, global = true, default_value_t = 5)]
    pub history_limit: usize,

    /// Seconds to wait for a history reply
    #[arg(long, global = true, default_value_t = 3)]
    pub history_timeout: u64,

    /// Celebration length in milliseconds sent with a winning snapshot
    #[arg(long, global = true, default_value_t = 6000)]
    pub confetti_ms: u64,

    /// Fade-out at the end of the celebration in milliseconds
    #[arg(long, global = true, default_value_t = 1500)]
    pub confetti_taper_ms: u64,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub role: Role,
    pub relay_url: Option<String>,
    pub channel: String,
    pub history_limit: usize,
    pub history_timeout: Duration,
    pub confetti: ConfettiCue,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            role: Role::Master,
            relay_url: None,
            channel: DEFAULT_CHANNEL.to_string(),
            history_limit: 5,
            history_timeout: Duration::from_secs(3),
            confetti: ConfettiCue::default(),
        }
    }
}

impl Settings {
    /// Merge CLI flags over the launch query over defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRole`] if either source names an unknown role.
    pub fn resolve(args: &SettingsArgs) -> Result<Self, ConfigError> {
        let launch = args
            .launch
            .as_deref()
            .map(LaunchParams::from_query)
            .transpose()?
            .unwrap_or_default();

        let role = match args.mode.as_deref() {
            Some(mode) => mode.parse()?,
            None => launch.role.unwrap_or_default(),
        };

        Ok(Self {
            role,
            relay_url: args.relay.clone().or(launch.relay),
            channel: args
                .channel
                .clone()
                .or(launch.channel)
                .unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            history_limit: args.history_limit,
            history_timeout: Duration::from_secs(args.history_timeout),
            confetti: ConfettiCue {
                duration_ms: args.confetti_ms,
                taper_ms: args.confetti_taper_ms,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        settings: SettingsArgs,
    }

    fn resolve(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = TestCli::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
            .unwrap();
        Settings::resolve(&cli.settings)
    }

    #[test]
    fn role_parsing() {
        assert_eq!("master".parse(), Ok(Role::Master));
        assert_eq!("M".parse(), Ok(Role::Master));
        assert_eq!("follow".parse(), Ok(Role::Follower));
        assert_eq!("Follower".parse(), Ok(Role::Follower));
        assert!("spectator".parse::<Role>().is_err());
    }

    #[test]
    fn absent_role_defaults_to_master() {
        assert_eq!(LaunchParams::from_query("index.html").unwrap().role, None);
        assert_eq!(resolve(&[]).unwrap().role, Role::Master);
        assert_eq!(resolve(&["--launch", "?mode="]).unwrap().role, Role::Master);
    }

    #[test]
    fn query_string_selects_role() {
        let params = LaunchParams::from_query("index.html?mode=follow&channel=room").unwrap();
        assert_eq!(params.role, Some(Role::Follower));
        assert_eq!(params.channel.as_deref(), Some("room"));

        let params = LaunchParams::from_query("role=follow").unwrap();
        assert_eq!(params.role, Some(Role::Follower));
    }

    #[test]
    fn mode_wins_over_role_in_query() {
        let params = LaunchParams::from_query("?role=follow&mode=master").unwrap();
        assert_eq!(params.role, Some(Role::Master));
    }

    #[test]
    fn unknown_role_is_an_error() {
        assert_eq!(
            LaunchParams::from_query("?mode=spectate"),
            Err(ConfigError::UnknownRole("spectate".into()))
        );
    }

    #[test]
    fn flags_override_query_and_defaults() {
        let settings = resolve(&[
            "--launch",
            "?mode=follow&channel=from-query&relay=ws%3A%2F%2Fq",
            "--channel",
            "from-flag",
        ])
        .unwrap();
        assert_eq!(settings.role, Role::Follower);
        assert_eq!(settings.channel, "from-flag");
        assert_eq!(settings.relay_url.as_deref(), Some("ws://q"));

        let settings = resolve(&["--launch", "?mode=follow", "--mode", "master"]).unwrap();
        assert_eq!(settings.role, Role::Master);
    }

    #[test]
    fn defaults() {
        let settings = resolve(&[]).unwrap();
        assert_eq!(settings.channel, DEFAULT_CHANNEL);
        assert_eq!(settings.history_limit, 5);
        assert_eq!(settings.confetti, ConfettiCue::default());
    }
}
