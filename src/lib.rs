//! Life-like Cellular Automaton Simulator
//!
//! This library advances a fixed-size grid through generations under
//! configurable birth/survival rules, optionally with aging cells.

pub mod config;
pub mod game_of_life;
pub mod utils;

pub use config::Settings;
pub use game_of_life::{Grid, RuleEngine, Rules, Simulator};

use anyhow::{Context, Result};
use game_of_life::{load_pattern_from_file, place_pattern};

/// Build a simulator from settings, seeding the world from the pattern file if one is set
pub fn simulator_from_settings(settings: &Settings) -> Result<Simulator> {
    let mut world = Grid::new(
        settings.world.width,
        settings.world.height,
        settings.world.boundary_condition,
    );

    if let Some(ref path) = settings.input.pattern_file {
        let pattern = load_pattern_from_file(path, settings.world.boundary_condition)?;
        let (x, y) = settings.input.offset;
        place_pattern(&mut world, &pattern, x, y)
            .with_context(|| format!("Failed to place pattern {}", path.display()))?;
    }

    Ok(Simulator::with_engine(world, settings.rule_engine()?))
}
