//! Domain handlers for a Dell PowerEdge chassis.
//! Each handler combines the step tables with channel calls for one subsystem.

pub mod commands;
pub mod environment;
pub mod fan_control;
pub mod fan_speed;
pub mod temperature;
pub mod types;

pub use environment::EnvironmentRequestHandler;
pub use fan_control::FanControlCommandHandler;
pub use fan_speed::{FanSpeedCommandHandler, FanSpeedRequestHandler};
pub use temperature::TemperatureRequestHandler;
pub use types::{FanMode, FanSlots, FanType, TemperatureReading, ZoneOffsets};
