#![forbid(unsafe_code)]

//! Engine configuration.

use std::fmt;

/// Static layout parameters for a [`TimetableLayout`](crate::TimetableLayout).
///
/// Every materialized item is `column_width` pixels wide and
/// `duration_minutes * pixels_per_minute` pixels tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimetableConfig {
    /// Width of every column, in pixels.
    pub column_width: i32,
    /// Vertical scale converting minutes to pixels.
    pub pixels_per_minute: i32,
    /// Wrap horizontal scrolling from the last column back to the first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub loop_horizontally: bool,
}

impl TimetableConfig {
    /// Create a non-looping configuration.
    #[must_use]
    pub const fn new(column_width: i32, pixels_per_minute: i32) -> Self {
        Self {
            column_width,
            pixels_per_minute,
            loop_horizontally: false,
        }
    }

    /// Enable or disable horizontal wrap-around.
    #[must_use]
    pub const fn with_horizontal_looping(mut self, enabled: bool) -> Self {
        self.loop_horizontally = enabled;
        self
    }

    /// Check that both scale factors are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.column_width <= 0 {
            return Err(ConfigError::NonPositiveColumnWidth(self.column_width));
        }
        if self.pixels_per_minute <= 0 {
            return Err(ConfigError::NonPositivePixelsPerMinute(
                self.pixels_per_minute,
            ));
        }
        Ok(())
    }

    /// Convert a span of minutes to pixels, saturating at the `i32` range.
    #[inline]
    pub fn minutes_to_px(&self, minutes: i64) -> i32 {
        let px = minutes.saturating_mul(i64::from(self.pixels_per_minute));
        px.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

/// Rejected configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `column_width` must be at least one pixel.
    NonPositiveColumnWidth(i32),
    /// `pixels_per_minute` must be at least one pixel.
    NonPositivePixelsPerMinute(i32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveColumnWidth(v) => {
                write!(f, "column width must be positive, got {v}")
            }
            ConfigError::NonPositivePixelsPerMinute(v) => {
                write!(f, "pixels per minute must be positive, got {v}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
