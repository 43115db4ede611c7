//! Cellular automaton core: grid, rules and the generation stepper

pub mod grid;
pub mod io;
pub mod rules;
pub mod simulator;

pub use grid::{Cell, Grid, GridError, DEFAULT_WORLD_SIZE};
pub use io::{create_example_patterns, load_pattern_from_file, place_pattern};
pub use rules::{
    AgeRule, BinaryRule, CellRule, FertilityWindow, NeighborSet, RuleEngine, RuleError,
    RuleString, Rules,
};
pub use simulator::{Simulator, SimulatorBuilder};
