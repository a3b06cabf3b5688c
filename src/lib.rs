//! Temperature-driven fan control for Dell PowerEdge servers over IPMI.
//!
//! Sensors are read through ipmitool, mapped through step tables to fan speeds, and written
//! back as Dell OEM raw commands. When a CPU crosses the critical limit the BMC's own thermal
//! algorithm takes over.

pub mod app;
pub mod config;
pub mod daemon;
pub mod error;
pub mod hardware;
pub mod system;
pub mod tables;

pub use error::{ControlError, Result};
