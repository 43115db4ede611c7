//! Birth/survival rules and the per-cell evolution strategies

use super::grid::{Cell, Grid, GridError};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of neighbors in a Moore neighborhood
pub const MAX_NEIGHBORS: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("age must be at least 1, got {0}")]
    InvalidAge(u32),
    #[error("malformed rulestring '{input}': {reason}")]
    Malformed { input: String, reason: String },
}

/// Set of neighbor counts a rule reacts to.
///
/// Counts above [`MAX_NEIGHBORS`] are kept but can never match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeighborSet(BTreeSet<u32>);

impl NeighborSet {
    pub fn new<I: IntoIterator<Item = u32>>(counts: I) -> Self {
        Self(counts.into_iter().collect())
    }

    #[inline]
    pub fn contains(&self, count: u32) -> bool {
        self.0.contains(&count)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Counts a cell could actually have
    pub fn reachable(&self) -> impl Iterator<Item = u32> + '_ {
        self.iter().filter(|&count| count <= MAX_NEIGHBORS)
    }
}

impl FromIterator<u32> for NeighborSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Birth and survival conditions shared by both evolution modes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub birth: NeighborSet,
    pub survival: NeighborSet,
}

impl Default for Rules {
    fn default() -> Self {
        Self::conway()
    }
}

impl Rules {
    pub fn new(
        birth: impl IntoIterator<Item = u32>,
        survival: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            birth: NeighborSet::new(birth),
            survival: NeighborSet::new(survival),
        }
    }

    /// Conway's Game of Life (B3/S23)
    pub fn conway() -> Self {
        Self::new([3], [2, 3])
    }

    /// HighLife (B36/S23)
    pub fn high_life() -> Self {
        Self::new([3, 6], [2, 3])
    }

    /// Day & Night (B3678/S34678)
    pub fn day_and_night() -> Self {
        Self::new([3, 6, 7, 8], [3, 4, 6, 7, 8])
    }

    /// Seeds (B2/S), every live cell dies each generation
    pub fn seeds() -> Self {
        Self::new([2], [])
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "conway" | "life" => Some(Self::conway()),
            "highlife" | "high_life" => Some(Self::high_life()),
            "day_and_night" | "daynight" => Some(Self::day_and_night()),
            "seeds" => Some(Self::seeds()),
            _ => None,
        }
    }
}

/// A parsed `B.../S...[/A...]` rulestring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleString {
    pub rules: Rules,
    pub age: Option<u32>,
}

impl FromStr for RuleString {
    type Err = RuleError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| RuleError::Malformed {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let mut birth = None;
        let mut survival = None;
        let mut age = None;

        for segment in input.trim().split('/') {
            let mut chars = segment.trim().chars();
            let tag = chars
                .next()
                .ok_or_else(|| malformed("empty segment"))?
                .to_ascii_uppercase();
            let body = chars.as_str();

            match tag {
                'B' | 'S' => {
                    let counts = body
                        .chars()
                        .map(|c| c.to_digit(10).ok_or_else(|| malformed("counts must be digits")))
                        .collect::<Result<NeighborSet, _>>()?;
                    let slot = if tag == 'B' { &mut birth } else { &mut survival };
                    if slot.replace(counts).is_some() {
                        return Err(malformed("duplicate segment"));
                    }
                }
                'A' => {
                    let value: u32 = body.parse().map_err(|_| malformed("age must be a number"))?;
                    if value == 0 {
                        return Err(RuleError::InvalidAge(value));
                    }
                    if age.replace(value).is_some() {
                        return Err(malformed("duplicate segment"));
                    }
                }
                _ => return Err(malformed("segments must start with B, S or A")),
            }
        }

        match (birth, survival) {
            (Some(birth), Some(survival)) => Ok(Self {
                rules: Rules { birth, survival },
                age,
            }),
            _ => Err(malformed("both B and S segments are required")),
        }
    }
}

impl fmt::Display for RuleString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "B{}/S{}",
            self.rules.birth.reachable().join(""),
            self.rules.survival.reachable().join("")
        )?;
        if let Some(age) = self.age {
            write!(f, "/A{}", age)?;
        }
        Ok(())
    }
}

/// Range of neighbor ages that count toward breeding in age mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FertilityWindow {
    pub end: Cell,
    pub start: Cell,
}

impl FertilityWindow {
    pub fn for_age(age: Cell) -> Self {
        if age >= 4 {
            Self { end: 2, start: age - 2 }
        } else {
            Self { end: 0, start: age }
        }
    }

    #[inline]
    pub fn contains(&self, value: Cell) -> bool {
        (self.end..=self.start).contains(&value)
    }
}

/// Computes one cell of the next generation from the previous generation
pub trait CellRule {
    fn rules(&self) -> &Rules;

    fn rules_mut(&mut self) -> &mut Rules;

    /// Next value of a cell given its current value and its neighbors' values
    fn next_cell(&self, current: Cell, neighbors: &[Cell]) -> Cell;
}

fn alive_count(neighbors: &[Cell]) -> u32 {
    neighbors.iter().filter(|&&value| value > 0).count() as u32
}

/// Flat alive/dead evolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRule {
    rules: Rules,
}

impl BinaryRule {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }
}

impl CellRule for BinaryRule {
    fn rules(&self) -> &Rules {
        &self.rules
    }

    fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }

    fn next_cell(&self, current: Cell, neighbors: &[Cell]) -> Cell {
        let count = alive_count(neighbors);
        let keep = if current == 0 {
            self.rules.birth.contains(count)
        } else {
            self.rules.survival.contains(count)
        };
        Cell::from(keep)
    }
}

/// Evolution where live cells carry a remaining age.
///
/// Survival looks at every living neighbor; birth only at neighbors whose age
/// lies inside the fertility window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeRule {
    rules: Rules,
    max_age: Cell,
    fertility: FertilityWindow,
}

impl AgeRule {
    pub fn new(rules: Rules, max_age: Cell) -> Result<Self, RuleError> {
        if max_age < 1 {
            return Err(RuleError::InvalidAge(max_age));
        }
        Ok(Self {
            rules,
            max_age,
            fertility: FertilityWindow::for_age(max_age),
        })
    }

    pub fn max_age(&self) -> Cell {
        self.max_age
    }

    pub fn fertility(&self) -> FertilityWindow {
        self.fertility
    }
}

impl CellRule for AgeRule {
    fn rules(&self) -> &Rules {
        &self.rules
    }

    fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }

    fn next_cell(&self, current: Cell, neighbors: &[Cell]) -> Cell {
        if current == 0 {
            let breeding = neighbors
                .iter()
                .filter(|&&value| self.fertility.contains(value))
                .count() as u32;
            if self.rules.birth.contains(breeding) {
                self.max_age
            } else {
                0
            }
        } else if self.rules.survival.contains(alive_count(neighbors)) {
            current
        } else {
            current - 1
        }
    }
}

/// Evolution strategy, fixed when the engine is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleEngine {
    Binary(BinaryRule),
    Aged(AgeRule),
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::Binary(BinaryRule::new(Rules::default()))
    }
}

impl RuleEngine {
    /// Binary mode without an age, age mode otherwise
    pub fn new(rules: Rules, age: Option<Cell>) -> Result<Self, RuleError> {
        match age {
            None => Ok(Self::Binary(BinaryRule::new(rules))),
            Some(age) => AgeRule::new(rules, age).map(Self::Aged),
        }
    }

    pub fn max_age(&self) -> Option<Cell> {
        match self {
            Self::Binary(_) => None,
            Self::Aged(rule) => Some(rule.max_age()),
        }
    }

    pub fn rulestring(&self) -> RuleString {
        RuleString {
            rules: self.rules().clone(),
            age: self.max_age(),
        }
    }

    /// Compute the next generation into a freshly allocated grid.
    ///
    /// Every neighbor read comes from `current`; `next` is only written.
    pub fn evolve(&self, current: &Grid) -> Result<Grid, GridError> {
        let mut next = Grid::new(current.width, current.height, current.boundary_condition);

        for y in 0..current.height {
            for x in 0..current.width {
                let neighbors = current.neighbors(x, y)?;
                let value = self.next_cell(current.get(x, y)?, &neighbors);
                next.set(x, y, value)?;
            }
        }

        Ok(next)
    }
}

impl CellRule for RuleEngine {
    fn rules(&self) -> &Rules {
        match self {
            Self::Binary(rule) => rule.rules(),
            Self::Aged(rule) => rule.rules(),
        }
    }

    fn rules_mut(&mut self) -> &mut Rules {
        match self {
            Self::Binary(rule) => rule.rules_mut(),
            Self::Aged(rule) => rule.rules_mut(),
        }
    }

    fn next_cell(&self, current: Cell, neighbors: &[Cell]) -> Cell {
        match self {
            Self::Binary(rule) => rule.next_cell(current, neighbors),
            Self::Aged(rule) => rule.next_cell(current, neighbors),
        }
    }
}
