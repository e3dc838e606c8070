//! Pacing configuration for the interaction controller.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("invalid {name} bounds: min {min} exceeds max {max}")]
    InvertedBounds {
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("negative {name} bound: {value}")]
    NegativeBound { name: &'static str, value: f64 },
}

/// Immutable pacing configuration shared by the search loop and the
/// scroll pacer. Delays are in seconds, scroll distance in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitPolicy {
    /// Uniform bounds for the pause between consecutive searches.
    pub min_search_delay_secs: f64,
    pub max_search_delay_secs: f64,
    /// Uniform bounds for the pause between scroll steps.
    pub scroll_interval_min_secs: f64,
    pub scroll_interval_max_secs: f64,
    pub scroll_pixels_per_step: u32,
    pub max_scroll_steps: u32,
    pub auto_scroll_enabled: bool,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            min_search_delay_secs: 5.0,
            max_search_delay_secs: 15.0,
            scroll_interval_min_secs: 1.5,
            scroll_interval_max_secs: 3.0,
            scroll_pixels_per_step: 2000,
            max_scroll_steps: 15,
            auto_scroll_enabled: true,
        }
    }
}

impl RateLimitPolicy {
    /// Checks the `min <= max` invariant for every bound pair and rejects
    /// negative delays, which have no physical interpretation as pauses.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError` naming the offending bound pair.
    pub fn validate(&self) -> Result<(), PolicyError> {
        let pairs = [
            (
                "search_delay",
                self.min_search_delay_secs,
                self.max_search_delay_secs,
            ),
            (
                "scroll_interval",
                self.scroll_interval_min_secs,
                self.scroll_interval_max_secs,
            ),
        ];

        for (name, min, max) in pairs {
            if min < 0.0 {
                return Err(PolicyError::NegativeBound { name, value: min });
            }
            if min > max {
                return Err(PolicyError::InvertedBounds { name, min, max });
            }
        }

        Ok(())
    }
}
