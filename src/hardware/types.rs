//! Hardware data types: temperature readings, fan modes, fan groups, slot and offset maps.

use std::fmt;

use serde::Serialize;

/// One snapshot of the chassis sensors, taken at the start of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemperatureReading {
    pub inlet: i32,
    pub exhaust: i32,
    pub cpu: Vec<i32>, // one per CPU socket
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FanMode {
    Manual,
    Automatic,
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanMode::Manual => write!(f, "Manual"),
            FanMode::Automatic => write!(f, "Automatic"),
        }
    }
}

/// Non-CPU fan groups, both driven from the exhaust temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FanType {
    Pci,
    Nic,
}

impl fmt::Display for FanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanType::Pci => write!(f, "PCI"),
            FanType::Nic => write!(f, "NIC"),
        }
    }
}

/// Signed biases added on top of the base table speed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneOffsets {
    pub cpu: Vec<i32>,
    pub pci: i32,
    pub nic: i32,
}

impl ZoneOffsets {
    /// Bias for a CPU socket; sockets without a configured bias get none.
    pub fn cpu_offset(&self, cpu_index: usize) -> i32 {
        self.cpu.get(cpu_index).copied().unwrap_or(0)
    }

    pub fn fan_type_offset(&self, fan_type: FanType) -> i32 {
        match fan_type {
            FanType::Pci => self.pci,
            FanType::Nic => self.nic,
        }
    }
}

/// Physical fan slots (1-based) belonging to each logical subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanSlots {
    pub cpu: Vec<Vec<u8>>,
    pub pci: Vec<u8>,
    pub nic: Vec<u8>,
}

impl FanSlots {
    pub fn cpu_slots(&self, cpu_index: usize) -> Option<&[u8]> {
        self.cpu.get(cpu_index).map(|slots| slots.as_slice())
    }

    pub fn group_slots(&self, fan_type: FanType) -> &[u8] {
        match fan_type {
            FanType::Pci => &self.pci,
            FanType::Nic => &self.nic,
        }
    }
}
