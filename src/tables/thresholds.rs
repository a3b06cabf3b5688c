//! Ordered zone boundaries.

use crate::error::{ControlError, Result};

use super::bounded::TemperatureThreshold;
use super::TABLE_SIZE;

/// Eight non-decreasing boundaries splitting the temperature axis into nine zones.
///
/// Zone `0` holds samples at or below the first boundary, zone `8` everything above the last.
/// A sample exactly on a boundary belongs to the lower zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdTable {
    thresholds: [TemperatureThreshold; TABLE_SIZE],
}

impl ThresholdTable {
    pub fn new(values: &[i32]) -> Result<Self> {
        if values.len() != TABLE_SIZE {
            return Err(ControlError::validation(format!(
                "thresholds must be {} elements long, got {}",
                TABLE_SIZE,
                values.len()
            )));
        }

        let mut thresholds = [TemperatureThreshold::new(0)?; TABLE_SIZE];
        for (index, &value) in values.iter().enumerate() {
            let threshold = TemperatureThreshold::new(value).map_err(|_| {
                ControlError::validation(format!(
                    "threshold {} at position {} must be between {} and {}",
                    value,
                    index,
                    TemperatureThreshold::MINIMUM,
                    TemperatureThreshold::MAXIMUM
                ))
            })?;
            if index > 0 && threshold < thresholds[index - 1] {
                return Err(ControlError::validation(format!(
                    "thresholds must be in ascending order ({} follows {})",
                    value,
                    thresholds[index - 1]
                )));
            }
            thresholds[index] = threshold;
        }

        Ok(Self { thresholds })
    }

    /// Zone index in `0..=8` for a sampled temperature.
    pub fn index(&self, value: i32) -> usize {
        // scan from the top: first boundary strictly below the sample decides the zone
        self.thresholds
            .iter()
            .rposition(|threshold| value > threshold.value())
            .map_or(0, |position| position + 1)
    }

    pub fn values(&self) -> [i32; TABLE_SIZE] {
        self.thresholds.map(|t| t.value())
    }
}
