//! Configuration settings for the life simulator

use crate::game_of_life::{NeighborSet, RuleEngine, RuleString, Rules};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub world: WorldConfig,
    pub rules: RulesConfig,
    pub simulation: SimulationConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    pub boundary_condition: BoundaryCondition,
}

/// How neighbors beyond the grid edge are looked up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryCondition {
    /// Missing neighbors are simply absent
    #[default]
    Dead,
    Wrap,
    Mirror,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub birth: NeighborSet,
    pub survival: NeighborSet,
    /// Maximum age; switches the engine to age mode when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub generations: usize,
    pub display_every: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_file: Option<PathBuf>,
    /// Where the pattern's top-left corner lands in the world
    #[serde(default)]
    pub offset: (usize, usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Quiet,
}

impl Default for Settings {
    fn default() -> Self {
        let rules = Rules::default();
        Self {
            world: WorldConfig {
                width: 20,
                height: 20,
                boundary_condition: BoundaryCondition::Dead,
            },
            rules: RulesConfig {
                birth: rules.birth,
                survival: rules.survival,
                age: None,
            },
            simulation: SimulationConfig {
                generations: 10,
                display_every: 1,
            },
            input: InputConfig {
                pattern_file: None,
                offset: (0, 0),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                summary_file: None,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.world.width == 0 || self.world.height == 0 {
            anyhow::bail!(
                "World dimensions must be positive, got {}x{}",
                self.world.width,
                self.world.height
            );
        }

        if self.simulation.generations == 0 {
            anyhow::bail!("Number of generations must be positive");
        }

        if self.simulation.display_every == 0 {
            anyhow::bail!("display_every must be positive");
        }

        if self.rules.age == Some(0) {
            anyhow::bail!("Age must be at least 1 when set");
        }

        if let Some(ref pattern) = self.input.pattern_file {
            if !pattern.exists() {
                anyhow::bail!("Pattern file does not exist: {}", pattern.display());
            }
        }

        Ok(())
    }

    pub fn rules(&self) -> Rules {
        Rules {
            birth: self.rules.birth.clone(),
            survival: self.rules.survival.clone(),
        }
    }

    /// Build the evolution engine these settings describe
    pub fn rule_engine(&self) -> Result<RuleEngine> {
        RuleEngine::new(self.rules(), self.rules.age).context("Invalid rule configuration")
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(generations) = cli_overrides.generations {
            self.simulation.generations = generations;
        }
        if let Some(display_every) = cli_overrides.display_every {
            self.simulation.display_every = display_every;
        }
        if let Some(width) = cli_overrides.width {
            self.world.width = width;
        }
        if let Some(height) = cli_overrides.height {
            self.world.height = height;
        }
        if let Some(boundary) = cli_overrides.boundary_condition {
            self.world.boundary_condition = boundary;
        }
        // a rulestring replaces the whole rule, a missing A segment means binary mode
        if let Some(ref rule) = cli_overrides.rule {
            self.rules.birth = rule.rules.birth.clone();
            self.rules.survival = rule.rules.survival.clone();
            self.rules.age = rule.age;
        }
        if cli_overrides.age.is_some() {
            self.rules.age = cli_overrides.age;
        }
        if let Some(ref pattern) = cli_overrides.pattern_file {
            self.input.pattern_file = Some(pattern.clone());
        }
        if let Some(ref summary) = cli_overrides.summary_file {
            self.output.summary_file = Some(summary.clone());
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub generations: Option<usize>,
    pub display_every: Option<usize>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub boundary_condition: Option<BoundaryCondition>,
    pub rule: Option<RuleString>,
    /// Applied after `rule`, so it wins over the rulestring's age
    pub age: Option<u32>,
    pub pattern_file: Option<PathBuf>,
    pub summary_file: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

impl From<&Rules> for RulesConfig {
    fn from(rules: &Rules) -> Self {
        Self {
            birth: rules.birth.clone(),
            survival: rules.survival.clone(),
            age: None,
        }
    }
}

impl RulesConfig {
    pub fn with_age(mut self, age: Option<u32>) -> Self {
        self.age = age;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.rule_engine().unwrap().max_age(), None);
        assert_eq!(settings.rules(), Rules::conway());
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/life.yaml");

        let mut settings = Settings::default();
        settings.rules = RulesConfig::from(&Rules::high_life()).with_age(Some(7));
        settings.world.boundary_condition = BoundaryCondition::Wrap;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.rule_engine().unwrap().max_age(), Some(7));
    }

    #[test]
    fn test_parse_handwritten_yaml() {
        let yaml = "
world: { width: 8, height: 6, boundary_condition: mirror }
rules: { birth: [3, 6], survival: [2, 3] }
simulation: { generations: 4, display_every: 2 }
input: {}
output: { format: json }
";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.world.boundary_condition, BoundaryCondition::Mirror);
        assert_eq!(settings.rules(), Rules::high_life());
        assert_eq!(settings.rules.age, None);
        assert_eq!(settings.input.offset, (0, 0));
        assert_eq!(settings.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = Settings::default();
        settings.world.width = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.rules.age = Some(0);
        assert!(settings.validate().is_err());
        assert!(settings.rule_engine().is_err());

        let mut settings = Settings::default();
        settings.input.pattern_file = Some(PathBuf::from("does/not/exist.txt"));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            generations: Some(3),
            rule: Some(RuleString {
                rules: Rules::seeds(),
                age: None,
            }),
            age: Some(4),
            width: Some(30),
            ..Default::default()
        });

        assert_eq!(settings.simulation.generations, 3);
        assert_eq!(settings.rules(), Rules::seeds());
        assert_eq!(settings.rules.age, Some(4));
        assert_eq!(settings.world.width, 30);
        assert_eq!(settings.world.height, 20);
    }

    #[test]
    fn test_rulestring_override_replaces_age() {
        let mut settings = Settings::default();
        settings.rules.age = Some(5);
        settings.merge_with_cli(&CliOverrides {
            rule: Some("B36/S23".parse().unwrap()),
            ..Default::default()
        });
        assert_eq!(settings.rules(), Rules::high_life());
        assert_eq!(settings.rules.age, None);

        settings.merge_with_cli(&CliOverrides {
            rule: Some("B2/S/A3".parse().unwrap()),
            ..Default::default()
        });
        assert_eq!(settings.rules.age, Some(3));
    }
}
