//! Ambient inlet temperature to speed bias.

use crate::error::{ControlError, Result};

use super::thresholds::ThresholdTable;
use super::TABLE_SIZE;

const OFFSET_LIMIT: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InletOffsetTable {
    thresholds: ThresholdTable,
    offsets: [i32; TABLE_SIZE],
}

impl InletOffsetTable {
    pub fn new(thresholds: ThresholdTable, offsets: &[i32]) -> Result<Self> {
        let offsets: [i32; TABLE_SIZE] = offsets.try_into().map_err(|_| {
            ControlError::validation(format!(
                "inlet offsets must be {} elements long, got {}",
                TABLE_SIZE,
                offsets.len()
            ))
        })?;
        if let Some(bad) = offsets.iter().find(|o| o.abs() > OFFSET_LIMIT) {
            return Err(ControlError::validation(format!(
                "inlet offset {} must be between -{} and {}",
                bad, OFFSET_LIMIT, OFFSET_LIMIT
            )));
        }
        Ok(Self { thresholds, offsets })
    }

    /// Offset for an inlet sample. The open top zone reuses the last offset.
    pub fn offset_for(&self, inlet_temperature: i32) -> i32 {
        let zone = self.thresholds.index(inlet_temperature).min(TABLE_SIZE - 1);
        self.offsets[zone]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> InletOffsetTable {
        let thresholds = ThresholdTable::new(&[20, 23, 26, 29, 32, 35, 38, 41]).unwrap();
        InletOffsetTable::new(thresholds, &[0, 1, 2, 3, 4, 5, 6, 7]).unwrap()
    }

    #[test]
    fn test_offsets_follow_zones() {
        let table = table();
        assert_eq!(table.offset_for(15), 0);
        assert_eq!(table.offset_for(20), 0);
        assert_eq!(table.offset_for(21), 1);
        assert_eq!(table.offset_for(27), 3);
        assert_eq!(table.offset_for(41), 7);
        assert_eq!(table.offset_for(45), 7);
    }

    #[test]
    fn test_rejects_bad_offsets() {
        let thresholds = ThresholdTable::new(&[20, 23, 26, 29, 32, 35, 38, 41]).unwrap();
        assert!(InletOffsetTable::new(thresholds.clone(), &[0, 1, 2]).is_err());
        assert!(InletOffsetTable::new(thresholds, &[0, 1, 2, 3, 4, 5, 6, 700]).is_err());
    }
}
