//! Step tables: bounded value types, threshold zones, per-zone speeds and inlet offsets.
//! Everything here is pure and immutable once constructed.

pub mod bounded;
pub mod thresholds;
pub mod speeds;
pub mod inlet;

pub use bounded::{FanSpeed, FanSpeedRange, TemperatureThreshold};
pub use inlet::InletOffsetTable;
pub use speeds::SpeedTable;
pub use thresholds::ThresholdTable;

/// Every step table has exactly this many entries.
pub const TABLE_SIZE: usize = 8;
