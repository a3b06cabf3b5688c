//! Range-checked percentage and temperature values.

use std::fmt;

use serde::Serialize;

use crate::error::{ControlError, Result};

const PERCENT_MIN: i32 = 0;
const PERCENT_MAX: i32 = 100;

/// Legal span for a fan speed, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanSpeedRange {
    minimum: i32,
    maximum: i32,
}

impl FanSpeedRange {
    pub fn new(minimum: i32, maximum: i32) -> Result<Self> {
        if minimum > maximum {
            return Err(ControlError::validation(format!(
                "fan speed minimum {} is greater than maximum {}",
                minimum, maximum
            )));
        }
        for bound in [minimum, maximum] {
            if !(PERCENT_MIN..=PERCENT_MAX).contains(&bound) {
                return Err(ControlError::Range {
                    value: bound,
                    min: PERCENT_MIN,
                    max: PERCENT_MAX,
                });
            }
        }
        Ok(Self { minimum, maximum })
    }

    pub fn minimum(&self) -> i32 {
        self.minimum
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.minimum..=self.maximum).contains(&value)
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.minimum, self.maximum)
    }
}

impl Default for FanSpeedRange {
    fn default() -> Self {
        Self {
            minimum: PERCENT_MIN,
            maximum: PERCENT_MAX,
        }
    }
}

/// A fan duty cycle in percent, always inside its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanSpeed {
    value: i32,
    range: FanSpeedRange,
}

impl FanSpeed {
    /// Speed in the default 0-100 range.
    pub fn new(value: i32) -> Result<Self> {
        Self::in_range(value, FanSpeedRange::default())
    }

    pub fn in_range(value: i32, range: FanSpeedRange) -> Result<Self> {
        if !range.contains(value) {
            return Err(ControlError::Range {
                value,
                min: range.minimum(),
                max: range.maximum(),
            });
        }
        Ok(Self { value, range })
    }

    /// Clamps into the range instead of failing.
    pub fn saturating(value: i32, range: FanSpeedRange) -> Self {
        Self {
            value: range.clamp(value),
            range,
        }
    }

    /// Adds a signed bias and clamps the result back into the range.
    pub fn with_offset(&self, offset: i32) -> FanSpeed {
        Self::saturating(self.value.saturating_add(offset), self.range)
    }

    pub fn percent(&self) -> u8 {
        // range bounds are validated to 0-100
        self.value as u8
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn range(&self) -> FanSpeedRange {
        self.range
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for FanSpeed {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.percent())
    }
}

/// A single zone boundary in degrees Celsius (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TemperatureThreshold(i32);

impl TemperatureThreshold {
    pub const MINIMUM: i32 = 0;
    pub const MAXIMUM: i32 = 100;

    pub fn new(temperature: i32) -> Result<Self> {
        if !(Self::MINIMUM..=Self::MAXIMUM).contains(&temperature) {
            return Err(ControlError::Range {
                value: temperature,
                min: Self::MINIMUM,
                max: Self::MAXIMUM,
            });
        }
        Ok(Self(temperature))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for TemperatureThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_speed_rejects_out_of_range() {
        assert!(FanSpeed::new(0).is_ok());
        assert!(FanSpeed::new(100).is_ok());
        assert!(matches!(
            FanSpeed::new(101),
            Err(ControlError::Range { value: 101, min: 0, max: 100 })
        ));
        assert!(matches!(FanSpeed::new(-1), Err(ControlError::Range { .. })));
    }

    #[test]
    fn test_fan_speed_respects_custom_range() {
        let range = FanSpeedRange::new(10, 90).unwrap();
        assert!(FanSpeed::in_range(5, range).is_err());
        assert!(FanSpeed::in_range(95, range).is_err());
        assert_eq!(FanSpeed::in_range(50, range).unwrap().percent(), 50);
    }

    #[test]
    fn test_range_validation() {
        assert!(FanSpeedRange::new(60, 40).is_err());
        assert!(FanSpeedRange::new(-5, 40).is_err());
        assert!(FanSpeedRange::new(0, 120).is_err());
        assert!(FanSpeedRange::new(30, 30).is_ok());
    }

    #[test]
    fn test_with_offset_clamps() {
        let speed = FanSpeed::new(60).unwrap();
        assert_eq!(speed.with_offset(8).percent(), 68);
        assert_eq!(speed.with_offset(-5).percent(), 55);
        assert_eq!(speed.with_offset(50).percent(), 100);
        assert_eq!(speed.with_offset(-70).percent(), 0);
    }

    #[test]
    fn test_with_offset_never_leaves_range() {
        let range = FanSpeedRange::new(10, 90).unwrap();
        let speed = FanSpeed::in_range(40, range).unwrap();
        for offset in [i32::MIN, -1_000_000, -41, -30, -1, 0, 1, 49, 51, 1_000_000, i32::MAX] {
            let adjusted = speed.with_offset(offset);
            assert!(range.contains(adjusted.value()), "offset {} gave {}", offset, adjusted);
            assert_eq!(adjusted.range(), range);
        }
    }

    #[test]
    fn test_threshold_bounds() {
        assert_eq!(TemperatureThreshold::new(0).unwrap().value(), 0);
        assert_eq!(TemperatureThreshold::new(100).unwrap().value(), 100);
        assert!(TemperatureThreshold::new(101).is_err());
        assert!(TemperatureThreshold::new(-3).is_err());
    }
}
