//! Experience ↔ level conversion.
//!
//! `level = floor(sqrt(experience * 9 / 625))`, evaluated in integers:
//! `floor(sqrt(x)) == isqrt(floor(x))` for non-negative `x`, so no floating
//! point is involved. The inverse returns the smallest experience that
//! reaches a level, `ceil(625 * level² / 9)`.

use kbbq_error::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Compute the level reached with `experience` points.
///
/// # Examples
///
/// ```
/// use kbbq_core::level_from_experience;
///
/// assert_eq!(level_from_experience(0), 0);
/// assert_eq!(level_from_experience(69), 0);
/// assert_eq!(level_from_experience(100), 1);
/// assert_eq!(level_from_experience(10_000), 12);
/// ```
pub fn level_from_experience(experience: u64) -> u64 {
    (experience.saturating_mul(9) / 625).isqrt()
}

/// Smallest experience total at which `level` is reached.
///
/// # Examples
///
/// ```
/// use kbbq_core::{experience_from_level, level_from_experience};
///
/// assert_eq!(experience_from_level(12), 10_000);
/// assert_eq!(level_from_experience(experience_from_level(7)), 7);
/// ```
pub fn experience_from_level(level: u64) -> u64 {
    level
        .saturating_mul(level)
        .saturating_mul(625)
        .saturating_add(8)
        / 9
}

/// Where a user stands between two levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct LevelProgress {
    level: u64,
    experience: u64,
    current_threshold: u64,
    next_threshold: u64,
}

impl LevelProgress {
    /// Progress for an experience total.
    pub fn from_experience(experience: u64) -> Self {
        let level = level_from_experience(experience);
        Self {
            level,
            experience,
            current_threshold: experience_from_level(level),
            next_threshold: experience_from_level(level + 1),
        }
    }

    /// Experience still needed to reach the next level.
    pub fn remaining(&self) -> u64 {
        self.next_threshold.saturating_sub(self.experience)
    }
}

/// An inclusive band of experience awarded per qualifying event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRange {
    /// Lowest award (inclusive)
    pub min: u64,
    /// Highest award (inclusive)
    pub max: u64,
}

impl ExperienceRange {
    /// Create a band; `min` must not exceed `max`.
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// A band that always yields `value`.
    pub fn fixed(value: u64) -> Self {
        Self::new(value, value)
    }

    /// Check the band is well formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::new(format!(
                "experience range min ({}) exceeds max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Draw an award uniformly from the band.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}
