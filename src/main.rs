//! Main CLI application for the life simulator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use life_sim::{
    config::{BoundaryCondition, CliOverrides, OutputFormat, Settings},
    game_of_life::{create_example_patterns, load_pattern_from_file, RuleString, Rules},
    simulator_from_settings,
    utils::{ColorOutput, GridFormatter, RunSummary},
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "life_sim")]
#[command(about = "Life-like cellular automaton simulator")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Seed pattern file (overrides config)
        #[arg(short, long)]
        pattern: Option<PathBuf>,

        /// Number of generations (overrides config)
        #[arg(short, long)]
        generations: Option<usize>,

        /// Rulestring such as B3/S23 or B2/S34/A5, or a preset name (overrides config)
        #[arg(short, long)]
        rule: Option<String>,

        /// Maximum cell age, enables age mode (overrides config)
        #[arg(short, long)]
        age: Option<u32>,

        /// World width (overrides config)
        #[arg(long)]
        width: Option<usize>,

        /// World height (overrides config)
        #[arg(long)]
        height: Option<usize>,

        /// Edge handling (overrides config)
        #[arg(long, value_enum)]
        edges: Option<BoundaryCondition>,

        /// Print every n-th generation (overrides config)
        #[arg(long)]
        show_every: Option<usize>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Write the run summary as JSON to this file (overrides config)
        #[arg(short, long)]
        summary: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and pattern files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Show statistics for a pattern file
    Inspect {
        /// Pattern file
        #[arg(short, long)]
        pattern: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            pattern,
            generations,
            rule,
            age,
            width,
            height,
            edges,
            show_every,
            format,
            summary,
            verbose,
        } => {
            let rule = rule.as_deref().map(parse_rule).transpose()?;
            let cli_overrides = CliOverrides {
                generations,
                display_every: show_every,
                width,
                height,
                boundary_condition: edges,
                rule,
                age,
                pattern_file: pattern,
                summary_file: summary,
                format,
            };
            run_command(config, cli_overrides, verbose)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Inspect { pattern } => inspect_command(pattern),
    }
}

/// Accept either a rulestring or a preset name
fn parse_rule(input: &str) -> Result<RuleString> {
    if let Some(rules) = Rules::preset(input) {
        return Ok(RuleString { rules, age: None });
    }
    input
        .parse::<RuleString>()
        .with_context(|| format!("Unknown rule '{}'", input))
}

fn run_command(config_path: PathBuf, cli_overrides: CliOverrides, verbose: bool) -> Result<()> {
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        if verbose {
            println!(
                "{}",
                ColorOutput::warning(&format!(
                    "Config file {} not found, using defaults",
                    config_path.display()
                ))
            );
        }
        Settings::default()
    };

    settings.merge_with_cli(&cli_overrides);
    settings.validate().context("Configuration validation failed")?;

    let mut simulator = simulator_from_settings(&settings)?;
    let text = settings.output.format == OutputFormat::Text;

    if verbose {
        println!("Configuration:");
        println!("  World: {}x{}", settings.world.width, settings.world.height);
        println!("  Edges: {:?}", settings.world.boundary_condition);
        println!("  Rule: {}", simulator.engine().rulestring());
        println!("  Generations: {}", settings.simulation.generations);
        if let Some(ref pattern) = settings.input.pattern_file {
            println!("  Pattern: {}", pattern.display());
        }
        println!();
    }

    if text {
        println!("{}", GridFormatter::format_frame(&simulator));
    }

    let start_time = Instant::now();
    let mut population = vec![simulator.world().living_count()];

    for step in 1..=settings.simulation.generations {
        let next_generation = simulator.generation() + 1;
        let living = simulator
            .update()
            .with_context(|| format!("Failed to compute generation {}", next_generation))?
            .living_count();
        population.push(living);

        if text && step % settings.simulation.display_every == 0 {
            println!("{}", GridFormatter::format_frame(&simulator));
        }
    }

    let elapsed = start_time.elapsed();
    let summary = RunSummary::new(&simulator, population);

    match settings.output.format {
        OutputFormat::Text => {
            println!("{}", summary);
            println!(
                "{}",
                ColorOutput::success(&format!(
                    "Simulated {} generation(s) in {:.3}s",
                    settings.simulation.generations,
                    elapsed.as_secs_f64()
                ))
            );
        }
        OutputFormat::Json => println!("{}", summary.to_json()?),
        OutputFormat::Quiet => {}
    }

    if let Some(ref path) = settings.output.summary_file {
        summary.save_to_file(path)?;
        if text {
            println!("Summary saved to {}", path.display());
        }
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let pattern_dir = directory.join("input/patterns");

    for dir in [&config_dir, &pattern_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_patterns(&pattern_dir).context("Failed to create example patterns")?;
    println!("Created example patterns in: {}", pattern_dir.display());

    let examples_dir = config_dir.join("examples");

    let mut glider = Settings::default();
    glider.world.boundary_condition = BoundaryCondition::Wrap;
    glider.simulation.generations = 40;
    glider.simulation.display_every = 4;
    glider.input.pattern_file = Some(PathBuf::from("input/patterns/glider.txt"));
    glider.input.offset = (2, 2);
    glider.to_file(&examples_dir.join("glider_torus.yaml"))?;

    let mut aged = Settings::default();
    aged.rules.age = Some(5);
    aged.simulation.generations = 12;
    aged.input.pattern_file = Some(PathBuf::from("input/patterns/aged_row.txt"));
    aged.input.offset = (7, 8);
    aged.to_file(&examples_dir.join("aged_row.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your own patterns to {}", pattern_dir.display());
    println!("3. Run: cargo run -- run --config config/examples/glider_torus.yaml");

    Ok(())
}

fn inspect_command(pattern_path: PathBuf) -> Result<()> {
    let pattern = load_pattern_from_file(&pattern_path, BoundaryCondition::Dead)
        .with_context(|| format!("Failed to load pattern from {}", pattern_path.display()))?;

    println!("Pattern ({}x{}):", pattern.width, pattern.height);
    println!("{}", GridFormatter::format_grid_with_coords(&pattern));

    let cells = pattern.width * pattern.height;
    println!("Pattern Statistics:");
    println!("  Living cells: {}", pattern.living_count());
    println!(
        "  Density: {:.1}%",
        (pattern.living_count() as f64 / cells as f64) * 100.0
    );
    if pattern.max_value() > 1 {
        println!("  Highest age: {}", pattern.max_value());
    }

    Ok(())
}
