//! Generation-stepping front end over a world and a rule engine

use super::grid::{Cell, Grid, GridError};
use super::rules::{CellRule, NeighborSet, RuleEngine, RuleError, Rules};

/// Holds the current world and advances it one generation at a time
#[derive(Debug, Clone)]
pub struct Simulator {
    world: Grid,
    generation: u64,
    engine: RuleEngine,
}

/// Optional construction parameters for a [`Simulator`]
#[derive(Debug, Default)]
pub struct SimulatorBuilder {
    world: Option<Grid>,
    birth: Option<NeighborSet>,
    survival: Option<NeighborSet>,
    age: Option<Cell>,
}

impl SimulatorBuilder {
    pub fn world(mut self, world: Grid) -> Self {
        self.world = Some(world);
        self
    }

    pub fn birth(mut self, counts: impl IntoIterator<Item = u32>) -> Self {
        self.birth = Some(NeighborSet::new(counts));
        self
    }

    pub fn survival(mut self, counts: impl IntoIterator<Item = u32>) -> Self {
        self.survival = Some(NeighborSet::new(counts));
        self
    }

    pub fn rules(self, rules: Rules) -> Self {
        Self {
            birth: Some(rules.birth),
            survival: Some(rules.survival),
            ..self
        }
    }

    /// Switches the simulator to age mode with this maximum age
    pub fn age(mut self, age: Cell) -> Self {
        self.age = Some(age);
        self
    }

    pub fn build(self) -> Result<Simulator, RuleError> {
        let defaults = Rules::default();
        let rules = Rules {
            birth: self.birth.unwrap_or(defaults.birth),
            survival: self.survival.unwrap_or(defaults.survival),
        };
        Ok(Simulator {
            world: self.world.unwrap_or_default(),
            generation: 0,
            engine: RuleEngine::new(rules, self.age)?,
        })
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::with_engine(Grid::default(), RuleEngine::default())
    }
}

impl Simulator {
    /// 20x20 dead world running B3/S23
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SimulatorBuilder {
        SimulatorBuilder::default()
    }

    pub fn with_engine(world: Grid, engine: RuleEngine) -> Self {
        Self {
            world,
            generation: 0,
            engine,
        }
    }

    /// Advance one generation and return the new world
    pub fn update(&mut self) -> Result<&Grid, GridError> {
        let next = self.engine.evolve(&self.world)?;
        self.world = next;
        self.generation += 1;
        Ok(&self.world)
    }

    /// Advance `generations` times, returning the population after each step
    pub fn run(&mut self, generations: usize) -> Result<Vec<usize>, GridError> {
        (0..generations)
            .map(|_| self.update().map(Grid::living_count))
            .collect()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn world(&self) -> &Grid {
        &self.world
    }

    /// Mutable access for seeding cells between steps
    pub fn world_mut(&mut self) -> &mut Grid {
        &mut self.world
    }

    /// Replace the world; the generation counter keeps running
    pub fn set_world(&mut self, world: Grid) {
        self.world = world;
    }

    pub fn rules(&self) -> &Rules {
        self.engine.rules()
    }

    pub fn set_birth(&mut self, counts: impl IntoIterator<Item = u32>) {
        self.engine.rules_mut().birth = NeighborSet::new(counts);
    }

    pub fn set_survival(&mut self, counts: impl IntoIterator<Item = u32>) {
        self.engine.rules_mut().survival = NeighborSet::new(counts);
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn max_age(&self) -> Option<Cell> {
        self.engine.max_age()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundaryCondition;

    fn seeded(size: usize, coords: &[(usize, usize)]) -> Grid {
        let mut world = Grid::square(size);
        for &(x, y) in coords {
            world.revive(x, y).unwrap();
        }
        world
    }

    fn conway_on(world: Grid) -> Simulator {
        Simulator::builder().world(world).build().unwrap()
    }

    #[test]
    fn test_defaults() {
        let sim = Simulator::new();
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.world().dimensions(), (20, 20));
        assert!(sim.world().is_empty());
        assert_eq!(sim.rules(), &Rules::conway());
        assert_eq!(sim.max_age(), None);
    }

    #[test]
    fn test_generation_counter() {
        let mut sim = Simulator::new();
        sim.update().unwrap();
        sim.update().unwrap();
        assert_eq!(sim.generation(), 2);

        sim.set_world(Grid::square(10));
        assert_eq!(sim.generation(), 2);
        sim.run(3).unwrap();
        assert_eq!(sim.generation(), 5);
    }

    #[test]
    fn test_set_world() {
        let mut sim = Simulator::new();
        let world = seeded(10, &[(1, 1)]);
        sim.set_world(world.clone());
        assert_eq!(sim.world(), &world);
    }

    #[test]
    fn test_dimensions_survive_update() {
        let mut sim = conway_on(Grid::new(13, 7, BoundaryCondition::Dead));
        let next = sim.update().unwrap();
        assert_eq!(next.dimensions(), (13, 7));
    }

    #[test]
    fn test_underpopulation() {
        let mut sim = conway_on(seeded(10, &[(5, 5), (5, 6)]));
        sim.update().unwrap();
        assert_eq!(sim.world().get(5, 5), Ok(0));
        assert_eq!(sim.world().get(5, 6), Ok(0));
    }

    #[test]
    fn test_block_is_stable() {
        let block = [(2, 2), (2, 3), (3, 2), (3, 3)];
        let mut sim = conway_on(seeded(10, &block));
        sim.update().unwrap();
        for (x, y) in block {
            assert_eq!(sim.world().get(x, y), Ok(1), "cell ({x}, {y}) should be alive");
        }
        assert_eq!(sim.world().living_count(), 4);
    }

    #[test]
    fn test_overpopulation() {
        let mut sim = conway_on(seeded(10, &[(2, 2), (3, 2), (4, 2), (3, 3), (3, 1)]));
        sim.update().unwrap();
        assert_eq!(sim.world().get(3, 2), Ok(0));
    }

    #[test]
    fn test_reproduction() {
        let mut sim = conway_on(seeded(10, &[(3, 3), (3, 4), (3, 5)]));
        sim.update().unwrap();
        assert_eq!(sim.world().get(2, 4), Ok(1));
        assert_eq!(sim.world().get(4, 4), Ok(1));
    }

    #[test]
    fn test_blinker_reads_only_previous_generation() {
        // if new values leaked into the pass the blinker would not oscillate cleanly
        let vertical = [(3, 3), (3, 4), (3, 5)];
        let mut sim = conway_on(seeded(8, &vertical));
        let original = sim.world().clone();

        sim.update().unwrap();
        assert_eq!(sim.world().living_cells(), vec![(2, 4), (3, 4), (4, 4)]);
        sim.update().unwrap();
        assert_eq!(sim.world(), &original);
    }

    #[test]
    fn test_custom_rules() {
        let mut sim = Simulator::builder()
            .world(seeded(10, &[(3, 3), (4, 3)]))
            .birth([2])
            .survival([1])
            .build()
            .unwrap();
        sim.update().unwrap();
        for (x, y) in [(3, 3), (4, 3), (3, 4), (4, 4), (3, 2), (4, 2)] {
            assert_eq!(sim.world().get(x, y), Ok(1), "cell ({x}, {y}) should be alive");
        }
        // one neighbor only, not enough for B2
        assert_eq!(sim.world().get(2, 3), Ok(0));
        assert_eq!(sim.world().get(5, 3), Ok(0));
    }

    #[test]
    fn test_rules_can_change_between_steps() {
        let mut sim = conway_on(seeded(10, &[(3, 3), (4, 3)]));
        sim.set_birth([2]);
        sim.set_survival([1]);
        assert_eq!(sim.rules(), &Rules::new([2], [1]));
        sim.update().unwrap();
        assert_eq!(sim.world().get(3, 4), Ok(1));

        sim.set_survival([]);
        sim.set_birth([]);
        sim.update().unwrap();
        assert!(sim.world().is_empty());
    }

    #[test]
    fn test_age_decay_without_support() {
        let mut world = Grid::square(10);
        world.set(5, 5, 4).unwrap();
        let mut sim = Simulator::builder().world(world).age(4).build().unwrap();

        for expected in [3, 2, 1, 0] {
            sim.update().unwrap();
            assert_eq!(sim.world().get(5, 5), Ok(expected));
        }
        assert!(sim.world().is_empty());
    }

    #[test]
    fn test_age_retained_with_support() {
        // a block keeps three living neighbors per cell
        let mut world = Grid::square(10);
        for (x, y) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            world.set(x, y, 6).unwrap();
        }
        world.set(3, 3, 5).unwrap();
        let mut sim = Simulator::builder().world(world).age(6).build().unwrap();

        for _ in 0..5 {
            sim.update().unwrap();
            assert_eq!(sim.world().get(2, 2), Ok(6));
            assert_eq!(sim.world().get(3, 3), Ok(5));
        }
        assert_eq!(sim.world().living_count(), 4);
    }

    #[test]
    fn test_lone_cell_breeds_nothing() {
        let mut world = Grid::square(10);
        world.set(5, 5, 6).unwrap();
        let mut sim = Simulator::builder()
            .world(world)
            .birth([1])
            .age(6)
            .build()
            .unwrap();

        sim.update().unwrap();
        assert_eq!(sim.world().living_cells(), vec![(5, 5)]);
        assert_eq!(sim.world().get(5, 5), Ok(5));
    }

    #[test]
    fn test_age_birth_needs_fertile_neighbors() {
        let mut world = Grid::square(10);
        for (x, y) in [(3, 3), (3, 4), (3, 5)] {
            world.set(x, y, 3).unwrap();
        }
        let mut sim = Simulator::builder().world(world).age(5).build().unwrap();

        sim.update().unwrap();
        assert_eq!(sim.world().get(2, 4), Ok(5));
        assert_eq!(sim.world().get(4, 4), Ok(5));
        // the middle keeps its age, the ends decay
        assert_eq!(sim.world().get(3, 4), Ok(3));
        assert_eq!(sim.world().get(3, 3), Ok(2));
    }

    #[test]
    fn test_zero_age_rejected() {
        let result = Simulator::builder().age(0).build();
        assert_eq!(result.err(), Some(RuleError::InvalidAge(0)));
    }
}
