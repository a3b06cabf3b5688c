//! Inlet (ambient) temperature handling.

use tracing::info;

use crate::tables::InletOffsetTable;

pub struct EnvironmentRequestHandler {
    table: InletOffsetTable,
}

impl EnvironmentRequestHandler {
    pub fn new(table: InletOffsetTable) -> Self {
        Self { table }
    }

    /// Offset added to every fan speed decision of the cycle.
    pub fn get_offset(&self, inlet_temperature: i32) -> i32 {
        let offset = self.table.offset_for(inlet_temperature);
        info!("Set fan offset to {} with inlet temperature {}°C", offset, inlet_temperature);
        offset
    }
}
