//! Loading seed patterns from text files

use super::grid::{Cell, Grid};
use crate::config::BoundaryCondition;
use anyhow::{Context, Result};
use std::path::Path;

/// Load a pattern from a text file
/// Format: one row per line. Rows without spaces hold one digit per cell
/// ('.' also means dead); rows with spaces hold space-separated cell values.
pub fn load_pattern_from_file<P: AsRef<Path>>(
    path: P,
    boundary_condition: BoundaryCondition,
) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read pattern file: {}", path.as_ref().display()))?;

    parse_pattern(&content, boundary_condition)
        .with_context(|| format!("Failed to parse pattern from file: {}", path.as_ref().display()))
}

fn parse_row(line: &str, row_idx: usize) -> Result<Vec<Cell>> {
    if line.contains(char::is_whitespace) {
        return line
            .split_whitespace()
            .enumerate()
            .map(|(col_idx, token)| {
                token.parse::<Cell>().with_context(|| {
                    format!("Invalid cell value '{}' at ({}, {})", token, col_idx, row_idx)
                })
            })
            .collect();
    }

    line.chars()
        .enumerate()
        .map(|(col_idx, ch)| match ch {
            '.' => Ok(0),
            _ => ch.to_digit(10).with_context(|| {
                format!(
                    "Invalid character '{}' at ({}, {}). Only digits and '.' are allowed",
                    ch, col_idx, row_idx
                )
            }),
        })
        .collect()
}

/// Parse a pattern from its text representation
pub fn parse_pattern(content: &str, boundary_condition: BoundaryCondition) -> Result<Grid> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Pattern is empty or contains no valid rows");
    }

    let rows = lines
        .iter()
        .enumerate()
        .map(|(row_idx, line)| parse_row(line, row_idx))
        .collect::<Result<Vec<_>>>()?;

    Ok(Grid::from_cells(rows, boundary_condition)?)
}

/// Copy every cell of `pattern` into `world` with its top-left corner at (x, y)
pub fn place_pattern(world: &mut Grid, pattern: &Grid, x: usize, y: usize) -> Result<()> {
    let overflows = |start: usize, len: usize, limit: usize| {
        start.checked_add(len).map_or(true, |end| end > limit)
    };
    if overflows(x, pattern.width, world.width) || overflows(y, pattern.height, world.height) {
        anyhow::bail!(
            "{}x{} pattern at ({}, {}) does not fit in {}x{} world",
            pattern.width,
            pattern.height,
            x,
            y,
            world.width,
            world.height
        );
    }

    for py in 0..pattern.height {
        for px in 0..pattern.width {
            world.set(x + px, y + py, pattern.get(px, py)?)?;
        }
    }

    Ok(())
}

/// Create example pattern files
pub fn create_example_patterns<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let patterns = [
        ("glider.txt", "# glider\n01000\n00100\n11100\n00000\n00000\n"),
        ("blinker.txt", "# period 2 oscillator\n000\n111\n000\n"),
        ("block.txt", "# still life\n0000\n0110\n0110\n0000\n"),
        ("beacon.txt", "110000\n110000\n001100\n001100\n"),
        ("aged_row.txt", "# seed for age mode (A5)\n00000\n33333\n00000\n"),
    ];

    for (name, content) in patterns {
        std::fs::write(dir.join(name), content)
            .with_context(|| format!("Failed to write {}", name))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_pattern() {
        let grid = parse_pattern("# comment\n010\n1.1\n\n010\n", BoundaryCondition::Dead).unwrap();

        assert_eq!(grid.dimensions(), (3, 3));
        assert_eq!(grid.living_count(), 4);
        assert_eq!(grid.get(1, 0).unwrap(), 1);
        assert_eq!(grid.get(0, 1).unwrap(), 1);
        assert_eq!(grid.get(1, 1).unwrap(), 0);
    }

    #[test]
    fn test_parse_aged_values() {
        let grid = parse_pattern("0 12 3\n4 0 0\n", BoundaryCondition::Dead).unwrap();
        assert_eq!(grid.get(1, 0).unwrap(), 12);
        assert_eq!(grid.get(0, 1).unwrap(), 4);

        let digits = parse_pattern("0520\n", BoundaryCondition::Dead).unwrap();
        assert_eq!(digits.get(1, 0).unwrap(), 5);
    }

    #[test]
    fn test_invalid_input() {
        assert!(parse_pattern("010\n1X1\n010\n", BoundaryCondition::Dead).is_err());
        assert!(parse_pattern("010\n11\n010\n", BoundaryCondition::Dead).is_err());
        assert!(parse_pattern("1 -2\n", BoundaryCondition::Dead).is_err());
        assert!(parse_pattern("# only a comment\n", BoundaryCondition::Dead).is_err());
    }

    #[test]
    fn test_place_pattern() {
        let pattern = parse_pattern("11\n01\n", BoundaryCondition::Dead).unwrap();
        let mut world = Grid::square(5);

        place_pattern(&mut world, &pattern, 3, 2).unwrap();
        assert_eq!(world.living_cells(), vec![(3, 2), (4, 2), (4, 3)]);

        assert!(place_pattern(&mut world, &pattern, 4, 0).is_err());
    }

    #[test]
    fn test_place_pattern_with_huge_offset() {
        let pattern = parse_pattern("1
", BoundaryCondition::Dead).unwrap();
        let mut world = Grid::square(5);

        assert!(place_pattern(&mut world, &pattern, usize::MAX, 0).is_err());
        assert!(place_pattern(&mut world, &pattern, 0, usize::MAX).is_err());
        assert!(world.is_empty());
    }

    #[test]
    fn test_create_example_patterns() {
        let temp_dir = tempdir().unwrap();
        create_example_patterns(temp_dir.path()).unwrap();

        for name in ["glider.txt", "blinker.txt", "block.txt", "beacon.txt", "aged_row.txt"] {
            assert!(temp_dir.path().join(name).exists(), "{} missing", name);
        }

        let glider =
            load_pattern_from_file(temp_dir.path().join("glider.txt"), BoundaryCondition::Dead)
                .unwrap();
        assert_eq!(glider.dimensions(), (5, 5));
        assert_eq!(glider.living_count(), 5);
    }
}
