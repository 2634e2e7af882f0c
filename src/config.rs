//! Viewer configuration.
//!
//! A [`ViewerConfig`] can be built in code, deserialized, or read from a page
//! query string:
//!
//! | parameter        | effect                                     |
//! |------------------|--------------------------------------------|
//! | `logref=<url>`   | fetch this log at startup (wins over test) |
//! | `test=<n>`       | load built-in fixture `n` at startup       |
//! | `fps=<f>`        | tick rate                                  |
//! | `speed=<f>`      | initial playback speed                     |
//! | `paused`         | start paused                               |

use serde::{Deserialize, Serialize};

use crate::errors::{KinescopeError, Result};
use crate::loader::LoadSource;

pub const DEFAULT_FPS: f64 = 60.0;

/// What to load when the viewer starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupSource {
    LogRef(String),
    Fixture(usize),
}

impl StartupSource {
    #[must_use]
    pub fn into_load_source(self) -> LoadSource {
        match self {
            Self::LogRef(uri) => LoadSource::Url(uri),
            Self::Fixture(index) => LoadSource::Fixture(index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Target tick rate.
    pub fps: f64,
    /// Whether playback starts running.
    pub autoplay: bool,
    /// Initial signed playback speed.
    pub speed: f64,
    /// Startup load; `None` waits for a dropped file.
    pub source: Option<StartupSource>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            autoplay: true,
            speed: 1.0,
            source: None,
        }
    }
}

impl ViewerConfig {
    /// Parses a URL query string, with or without the leading `?`.
    /// Unknown parameters are ignored.
    pub fn from_query(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut config = Self::default();
        let mut log_ref = None;
        let mut fixture = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "logref" => log_ref = Some(value.into_owned()),
                "test" => fixture = Some(parse_param::<usize>("test", &value)?),
                "fps" => config.fps = parse_param("fps", &value)?,
                "speed" => config.speed = parse_param("speed", &value)?,
                "paused" => config.autoplay = matches!(value.as_ref(), "0" | "false"),
                other => log::debug!("Ignoring query parameter '{other}'"),
            }
        }

        config.source = log_ref
            .map(StartupSource::LogRef)
            .or(fixture.map(StartupSource::Fixture));
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(KinescopeError::Config(format!(
                "fps must be a positive number, got {}",
                self.fps
            )));
        }
        if !self.speed.is_finite() {
            return Err(KinescopeError::Config(format!(
                "speed must be finite, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}

fn parse_param<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| KinescopeError::Config(format!("invalid value for '{name}': '{value}'")))
}
