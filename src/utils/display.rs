//! Display and output formatting utilities

use crate::config::BoundaryCondition;
use crate::game_of_life::{Cell, Grid, Simulator};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Format grids for console output
pub struct GridFormatter;

impl GridFormatter {
    /// Format a grid in compact form
    pub fn format_grid_compact(grid: &Grid) -> String {
        Self::render(grid, |value| if value > 0 { '█' } else { '·' })
    }

    /// One glyph per cell showing the remaining age: digits, then letters past 9
    pub fn format_grid_aged(grid: &Grid) -> String {
        Self::render(grid, Self::age_glyph)
    }

    fn age_glyph(value: Cell) -> char {
        match value {
            0 => '·',
            1..=9 => char::from_digit(value, 10).unwrap_or('+'),
            10..=35 => char::from_digit(value, 36).unwrap_or('+'),
            _ => '+',
        }
    }

    fn render(grid: &Grid, glyph: impl Fn(Cell) -> char) -> String {
        let mut output = String::with_capacity(grid.height * (grid.width + 1));
        for y in 0..grid.height {
            for x in 0..grid.width {
                output.push(glyph(grid.get(x, y).unwrap_or(0)));
            }
            output.push('\n');
        }
        output
    }

    /// Format a grid with coordinates
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for x in 0..grid.width {
            output.push_str(&format!("{:2}", x % 10));
        }
        output.push('\n');

        for y in 0..grid.height {
            output.push_str(&format!("{:2} ", y));
            for x in 0..grid.width {
                let alive = grid.get(x, y).map_or(false, |value| value > 0);
                output.push_str(if alive { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// Format the current world of a simulator with a generation header
    pub fn format_frame(simulator: &Simulator) -> String {
        let world = simulator.world();
        let body = if simulator.max_age().is_some() {
            Self::format_grid_aged(world)
        } else {
            Self::format_grid_compact(world)
        };
        format!(
            "Generation {} (living: {})\n{}",
            simulator.generation(),
            world.living_count(),
            body
        )
    }
}

/// Statistics describing a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub width: usize,
    pub height: usize,
    pub boundary_condition: BoundaryCondition,
    pub rule: String,
    pub generations: u64,
    /// Population before the first step followed by one entry per step
    pub population: Vec<usize>,
    pub peak_population: usize,
    /// First generation with no living cells, if the world died out
    pub extinct_at: Option<u64>,
}

impl RunSummary {
    pub fn new(simulator: &Simulator, population: Vec<usize>) -> Self {
        let world = simulator.world();
        let first_generation = (simulator.generation() + 1).saturating_sub(population.len() as u64);
        let extinct_at = population
            .iter()
            .position(|&count| count == 0)
            .map(|idx| first_generation + idx as u64);

        Self {
            width: world.width,
            height: world.height,
            boundary_condition: world.boundary_condition,
            rule: simulator.engine().rulestring().to_string(),
            generations: simulator.generation(),
            peak_population: population.iter().copied().max().unwrap_or(0),
            population,
            extinct_at,
        }
    }

    pub fn final_population(&self) -> usize {
        self.population.last().copied().unwrap_or(0)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run summary")
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write summary to {}", path.display()))
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Run Summary:")?;
        writeln!(f, "  Rule: {}", self.rule)?;
        writeln!(f, "  World: {}x{} ({:?} edges)", self.width, self.height, self.boundary_condition)?;
        writeln!(f, "  Generations: {}", self.generations)?;
        writeln!(f, "  Final population: {}", self.final_population())?;
        writeln!(f, "  Peak population: {}", self.peak_population)?;
        match self.extinct_at {
            Some(generation) => writeln!(f, "  Extinct at generation {}", generation),
            None => writeln!(f, "  Still alive"),
        }
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
