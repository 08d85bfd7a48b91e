use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Types that can be built from `EDUACE_*` environment variables.
pub trait FromEnv: Sized {
    /// Build from an arbitrary key lookup. `from_env` delegates here, tests pass a map.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>;

    /// Build from the process environment, loading `.env` first (silently ignored if absent)
    fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProctorConfig {
    /// How long zero faces must persist before the not-facing alert is raised
    pub not_facing_threshold: Duration,
    /// Frame pacing for the proctoring loop
    pub target_fps: u32,
    /// Device index handed to the host's capture backend
    pub camera_index: u32,
}

impl Default for ProctorConfig {
    fn default() -> Self {
        Self {
            not_facing_threshold: Duration::from_secs(5),
            target_fps: 30,
            camera_index: 0,
        }
    }
}

impl ProctorConfig {
    pub const THRESHOLD_KEY: &'static str = "EDUACE_NOT_FACING_SECS";
    pub const FPS_KEY: &'static str = "EDUACE_TARGET_FPS";
    pub const CAMERA_KEY: &'static str = "EDUACE_CAMERA_INDEX";

    #[must_use]
    pub const fn with_threshold(mut self, threshold: Duration) -> Self {
        self.not_facing_threshold = threshold;
        self
    }

    #[must_use]
    pub const fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Highest rate that still leaves a non-zero per-frame budget
    pub const MAX_FPS: u32 = 1_000_000_000;

    /// Time budget for a single frame at `target_fps`, never shorter than 1ns
    pub fn frame_budget(&self) -> Duration {
        (Duration::from_secs(1) / self.target_fps.max(1)).max(Duration::from_nanos(1))
    }
}

impl FromEnv for ProctorConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let threshold_secs: f64 = parse_or(
            &lookup,
            Self::THRESHOLD_KEY,
            defaults.not_facing_threshold.as_secs_f64(),
        )?;
        let not_facing_threshold = Duration::try_from_secs_f64(threshold_secs).map_err(|_| {
            ConfigError::Invalid {
                key: Self::THRESHOLD_KEY.to_string(),
                value: threshold_secs.to_string(),
            }
        })?;

        let target_fps: u32 = parse_or(&lookup, Self::FPS_KEY, defaults.target_fps)?;
        if target_fps == 0 || target_fps > Self::MAX_FPS {
            return Err(ConfigError::Invalid {
                key: Self::FPS_KEY.to_string(),
                value: target_fps.to_string(),
            });
        }

        Ok(Self {
            not_facing_threshold,
            target_fps,
            camera_index: parse_or(&lookup, Self::CAMERA_KEY, defaults.camera_index)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    /// Where narrated explanations are written
    pub audio_dir: PathBuf,
    /// Only this many leading characters of an explanation are narrated
    pub narration_char_limit: usize,
    /// Language tag passed to the speech synthesizer
    pub language: String,
    /// Where submitted answer sheets are written
    pub submissions_dir: PathBuf,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            audio_dir: env::temp_dir().join("eduace-audio"),
            narration_char_limit: 600,
            language: "en".to_string(),
            submissions_dir: env::temp_dir().join("eduace-submissions"),
        }
    }
}

impl AssistantConfig {
    pub const AUDIO_DIR_KEY: &'static str = "EDUACE_AUDIO_DIR";
    pub const NARRATION_KEY: &'static str = "EDUACE_NARRATION_CHARS";
    pub const LANGUAGE_KEY: &'static str = "EDUACE_TTS_LANG";
    pub const SUBMISSIONS_DIR_KEY: &'static str = "EDUACE_SUBMISSIONS_DIR";

    #[must_use]
    pub fn with_audio_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.audio_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_submissions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.submissions_dir = dir.into();
        self
    }
}

impl FromEnv for AssistantConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            audio_dir: lookup(Self::AUDIO_DIR_KEY)
                .map(PathBuf::from)
                .unwrap_or(defaults.audio_dir),
            narration_char_limit: parse_or(
                &lookup,
                Self::NARRATION_KEY,
                defaults.narration_char_limit,
            )?,
            language: lookup(Self::LANGUAGE_KEY).unwrap_or(defaults.language),
            submissions_dir: lookup(Self::SUBMISSIONS_DIR_KEY)
                .map(PathBuf::from)
                .unwrap_or(defaults.submissions_dir),
        })
    }
}
