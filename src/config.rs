//! Configuration: serde types, file persistence, and the validated control plan.

pub mod persistence;
pub mod plan;
pub mod types;

pub use plan::ControlPlan;
pub use types::AgentConfig;
