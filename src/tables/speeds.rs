//! Target speed per zone.

use crate::error::{ControlError, Result};

use super::bounded::{FanSpeed, FanSpeedRange};
use super::TABLE_SIZE;

/// Speed returned for negative zone indices.
pub const DEFAULT_SPEED: i32 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedTable {
    speeds: [FanSpeed; TABLE_SIZE],
    range: FanSpeedRange,
}

impl SpeedTable {
    /// Validates the raw percentages, then shifts each by `offset` and clamps it into `range`.
    pub fn new(speeds: &[i32], offset: i32, range: FanSpeedRange) -> Result<Self> {
        if speeds.len() != TABLE_SIZE {
            return Err(ControlError::validation(format!(
                "speeds must be {} elements long, got {}",
                TABLE_SIZE,
                speeds.len()
            )));
        }

        let mut table = [FanSpeed::saturating(0, range); TABLE_SIZE];
        let mut prior = 0;
        for (index, &speed) in speeds.iter().enumerate() {
            FanSpeed::new(speed).map_err(|_| {
                ControlError::validation(format!(
                    "speed {} at position {} must be between 0 and 100",
                    speed, index
                ))
            })?;
            if speed < prior {
                return Err(ControlError::validation(format!(
                    "speeds must be in ascending order ({} follows {})",
                    speed, prior
                )));
            }
            prior = speed;
            table[index] = FanSpeed::saturating(speed.saturating_add(offset), range);
        }

        Ok(Self { speeds: table, range })
    }

    /// Entry for a zone. Zones past the table (the unbounded top zone) get the range maximum,
    /// negative zones get [`DEFAULT_SPEED`].
    pub fn speed_for(&self, zone: isize) -> FanSpeed {
        if zone < 0 {
            return FanSpeed::saturating(DEFAULT_SPEED, self.range);
        }
        match self.speeds.get(zone as usize) {
            Some(speed) => *speed,
            None => FanSpeed::saturating(self.range.maximum(), self.range),
        }
    }

    pub fn range(&self) -> FanSpeedRange {
        self.range
    }

    pub fn values(&self) -> [u8; TABLE_SIZE] {
        self.speeds.map(|s| s.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEEDS: [i32; 8] = [20, 25, 30, 35, 40, 45, 50, 60];

    #[test]
    fn test_entries_are_offset_and_clamped() {
        for offset in [-100, -25, -1, 0, 3, 45, 100] {
            let table = SpeedTable::new(&SPEEDS, offset, FanSpeedRange::default()).unwrap();
            for (i, &input) in SPEEDS.iter().enumerate() {
                assert_eq!(i32::from(table.values()[i]), (input + offset).clamp(0, 100));
            }
        }
    }

    #[test]
    fn test_validation() {
        let range = FanSpeedRange::default();
        assert!(SpeedTable::new(&SPEEDS[..5], 0, range).is_err());
        assert!(SpeedTable::new(&[20, 25, 30, 35, 40, 45, 50, 101], 0, range).is_err());
        assert!(SpeedTable::new(&[-5, 25, 30, 35, 40, 45, 50, 60], 0, range).is_err());
        assert!(SpeedTable::new(&[20, 25, 30, 28, 40, 45, 50, 60], 0, range).is_err());
    }

    #[test]
    fn test_speed_for_edges() {
        let table = SpeedTable::new(&SPEEDS, 0, FanSpeedRange::default()).unwrap();
        assert_eq!(table.speed_for(0).percent(), 20);
        assert_eq!(table.speed_for(7).percent(), 60);
        assert_eq!(table.speed_for(8).percent(), 100);
        assert_eq!(table.speed_for(42).percent(), 100);
        assert_eq!(table.speed_for(-1).percent(), 15);
    }

    #[test]
    fn test_speed_for_uses_configured_range() {
        let range = FanSpeedRange::new(20, 80).unwrap();
        let table = SpeedTable::new(&SPEEDS, 30, range).unwrap();
        assert_eq!(table.values(), [50, 55, 60, 65, 70, 75, 80, 80]);
        assert_eq!(table.speed_for(8).percent(), 80);
        assert_eq!(table.speed_for(-3).percent(), 20);
    }

    #[test]
    fn test_offset_applies_before_range_clamp() {
        let range = FanSpeedRange::new(20, 80).unwrap();
        let table = SpeedTable::new(&[10, 25, 30, 35, 40, 45, 50, 60], 30, range).unwrap();
        // 10 is below the range minimum; 10 + 30 lands inside it
        assert_eq!(table.values(), [40, 55, 60, 65, 70, 75, 80, 80]);

        let table = SpeedTable::new(&[0, 5, 10, 15, 20, 25, 30, 35], 5, range).unwrap();
        assert_eq!(table.values(), [20, 20, 20, 20, 25, 30, 35, 40]);
    }
}
