//! Configuration management for the life simulator

pub mod settings;

pub use settings::{
    BoundaryCondition, CliOverrides, InputConfig, OutputConfig, OutputFormat, RulesConfig,
    Settings, SimulationConfig, WorldConfig,
};
