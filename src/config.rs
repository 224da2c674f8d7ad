use thiserror::Error;

use crate::constants::FADE_MSEC;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("fade duration must be at least 1ms")]
    ZeroFade,
    #[error("handle size must be non-zero (got {width}x{height})")]
    EmptyHandle { width: u32, height: u32 },
    #[error("fps must be between 1 and 240 (got {0})")]
    FrameRate(u32),
}

/// Tunables of a single handle group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupConfig {
    fade_msec: u32,
}

impl GroupConfig {
    pub fn new(fade_msec: u32) -> Result<Self, ConfigError> {
        if fade_msec == 0 {
            return Err(ConfigError::ZeroFade);
        }
        Ok(Self { fade_msec })
    }

    pub fn fade_msec(&self) -> u32 {
        self.fade_msec
    }
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            fade_msec: FADE_MSEC,
        }
    }
}
