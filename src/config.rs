//! Control-channel configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), every key has a default.
//!
//! | Key | Default |
//! |-----|---------|
//! | `GAZE_TCP_ADDR` | `0.0.0.0:5555` |
//! | `GAZE_HTTP_ADDR` | `0.0.0.0:5556` |
//! | `GAZE_FRAME_INTERVAL_MS` | `33` |
//! | `GAZE_DRAIN_BUDGET` | `64` (`0` = unbounded) |
//! | `GAZE_EVENT_BUS_CAPACITY` | `1024` |
//! | `GAZE_LOG_PATH` | `gazelog.txt` |
//! | `GAZE_CALIBRATION_AREA_WIDTH` | `1920` |
//! | `GAZE_CALIBRATION_AREA_HEIGHT` | `1080` |
//! | `GAZE_LOG_JSON` | `false` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::context::FramePacing;
use crate::error::ControlError;

/// Top-level configuration.
///
/// Loaded once at startup via [`ControlConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlConfig {
    /// Raw TCP control listener.
    pub tcp_addr: SocketAddr,
    /// HTTP server (`/health`, `/status`, `/ws`, `/events`).
    pub http_addr: SocketAddr,
    /// Target time between processing-context frames.
    pub frame_interval: Duration,
    /// Work items executed per frame; `0` means no limit.
    pub drain_budget: usize,
    /// Capacity of the notification broadcast channel.
    pub event_bus_capacity: usize,
    /// Initial session log path.
    pub log_path: PathBuf,
    /// Initial calibration area width.
    pub calibration_area_width: i32,
    /// Initial calibration area height.
    pub calibration_area_height: i32,
    /// Emit JSON log records instead of human-readable ones.
    pub log_json: bool,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tcp_addr: SocketAddr::from(([0, 0, 0, 0], 5555)),
            http_addr: SocketAddr::from(([0, 0, 0, 0], 5556)),
            frame_interval: Duration::from_millis(33),
            drain_budget: 64,
            event_bus_capacity: 1024,
            log_path: PathBuf::from("gazelog.txt"),
            calibration_area_width: 1920,
            calibration_area_height: 1080,
            log_json: false,
        }
    }
}

impl ControlConfig {
    /// Loads configuration from the process environment, after optionally
    /// loading a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidConfig`] if a variable is set but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ControlError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns the raw value of
    /// a key if it is set.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidConfig`] for the first value that
    /// cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControlError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            tcp_addr: parse(&lookup, "GAZE_TCP_ADDR", defaults.tcp_addr)?,
            http_addr: parse(&lookup, "GAZE_HTTP_ADDR", defaults.http_addr)?,
            frame_interval: Duration::from_millis(parse(
                &lookup,
                "GAZE_FRAME_INTERVAL_MS",
                33_u64,
            )?),
            drain_budget: parse(&lookup, "GAZE_DRAIN_BUDGET", defaults.drain_budget)?,
            event_bus_capacity: parse(
                &lookup,
                "GAZE_EVENT_BUS_CAPACITY",
                defaults.event_bus_capacity,
            )?,
            log_path: lookup("GAZE_LOG_PATH")
                .filter(|v| !v.is_empty())
                .map_or(defaults.log_path, PathBuf::from),
            calibration_area_width: parse(
                &lookup,
                "GAZE_CALIBRATION_AREA_WIDTH",
                defaults.calibration_area_width,
            )?,
            calibration_area_height: parse(
                &lookup,
                "GAZE_CALIBRATION_AREA_HEIGHT",
                defaults.calibration_area_height,
            )?,
            log_json: parse_bool(&lookup, "GAZE_LOG_JSON", defaults.log_json)?,
        })
    }

    /// Frame loop settings derived from this configuration.
    #[must_use]
    pub const fn pacing(&self) -> FramePacing {
        FramePacing {
            frame_interval: self.frame_interval,
            drain_budget: self.drain_budget,
        }
    }
}

/// Parses `key` as `T`, returning `default` when unset.
fn parse<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ControlError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ControlError::InvalidConfig { key, value }),
        None => Ok(default),
    }
}

/// Parses a boolean. Accepts `true`/`1`/`false`/`0` (case-insensitive).
fn parse_bool<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ControlError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ControlError::InvalidConfig { key, value }),
    }
}
