use rand::Rng;
use serde::Serialize;

use crate::error::{GameError, Result};

/// Percentage chance before the HP-band factor is applied.
const BASE_CATCH_PERCENT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CaptureOutcome {
    /// The new owned creature gets `level`.
    Caught { level: u32 },
    Escaped { roll: u32, probability: f64 },
}

impl CaptureOutcome {
    /// Success iff `roll <= probability`. Probabilities above 100 always succeed.
    pub fn from_roll(roll: u32, probability: f64, level: u32) -> Self {
        if roll as f64 <= probability {
            CaptureOutcome::Caught { level }
        } else {
            CaptureOutcome::Escaped { roll, probability }
        }
    }
}

/// Factor for the remaining-HP percentage band. Lower bounds inclusive.
pub fn catch_factor(hp_percent: f64) -> f64 {
    if hp_percent >= 40.0 {
        1.0
    } else if hp_percent >= 30.0 {
        1.2
    } else if hp_percent >= 15.0 {
        1.5
    } else if hp_percent >= 5.0 {
        1.8
    } else {
        2.0
    }
}

/// Catch chance in percent. Fails with `HpTooHigh` above half HP.
pub fn catch_probability(current_hp: u32, max_hp: u32) -> Result<f64> {
    if current_hp as f64 > max_hp as f64 / 2.0 {
        return Err(GameError::HpTooHigh {
            current: current_hp,
            max: max_hp,
        });
    }
    let hp_percent = if max_hp == 0 {
        0.0
    } else {
        current_hp as f64 / max_hp as f64 * 100.0
    };
    Ok(BASE_CATCH_PERCENT * catch_factor(hp_percent))
}

/// Roll 1..=100 against [`catch_probability`]. No roll is drawn when HP is too high.
pub fn attempt_capture<R: Rng + ?Sized>(
    current_hp: u32,
    max_hp: u32,
    level: u32,
    rng: &mut R,
) -> Result<CaptureOutcome> {
    let probability = catch_probability(current_hp, max_hp)?;
    let roll = rng.random_range(1..=100);
    tracing::debug!(current_hp, max_hp, probability, roll, "capture roll");
    Ok(CaptureOutcome::from_roll(roll, probability, level))
}
