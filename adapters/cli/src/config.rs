//! Optional TOML overrides for tuning and the level catalogue.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use final_door_core::{default_levels, LevelSettings, Tuning};
use serde::Deserialize;

/// Game configuration as read from disk. Missing tables fall back to the
/// built-in defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    tuning: Tuning,
    levels: Option<Vec<LevelSettings>>,
}

impl GameConfig {
    /// Reads and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("failed to load config file {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(levels) = &self.levels {
            if levels.is_empty() {
                bail!("level catalogue must contain at least one level");
            }
            if levels.len() > usize::from(u8::MAX) {
                bail!("level catalogue holds at most {} levels", u8::MAX);
            }
            for level in levels {
                if level.columns == 0 || level.rows == 0 {
                    bail!("level {:?} must have at least one column and one row", level.name);
                }
            }
        }
        if self.tuning.maze.cell_size <= 0.0 {
            bail!("cell size must be positive");
        }
        if self.tuning.enemy.cooldown_min > self.tuning.enemy.cooldown_max {
            bail!("enemy cooldown range is inverted");
        }
        Ok(())
    }

    /// Splits the configuration into the world's tuning and level catalogue.
    pub(crate) fn into_parts(self) -> (Tuning, Vec<LevelSettings>) {
        let levels = self.levels.unwrap_or_else(default_levels);
        (self.tuning, levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = GameConfig::parse("").expect("empty config is valid");
        let (tuning, levels) = config.into_parts();

        assert_eq!(tuning, Tuning::default());
        assert_eq!(levels, default_levels());
    }

    #[test]
    fn partial_tables_override_single_knobs() {
        let config = GameConfig::parse(
            r#"
            [tuning.player]
            max_health = 300

            [tuning.spawn]
            max_active = 2

            [[levels]]
            name = "Practice Yard"
            columns = 4
            rows = 3
            total_enemies = 1
            hole_traps = 0
            spike_traps = 1
            "#,
        )
        .expect("valid config");
        let (tuning, levels) = config.into_parts();

        assert_eq!(tuning.player.max_health, 300);
        assert!((tuning.player.speed - 9.0).abs() < f32::EPSILON);
        assert_eq!(tuning.spawn.max_active, 2);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].name, "Practice Yard");
        assert!(!levels[0].clear_required);
    }

    #[test]
    fn empty_catalogue_is_rejected() {
        let error = GameConfig::parse("levels = []").expect_err("empty catalogue");
        assert!(error.to_string().contains("at least one level"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(GameConfig::parse("difficulty = 3").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = GameConfig::load(Path::new("/nonexistent/final-door.toml"))
            .expect_err("missing file");
        assert!(format!("{error:#}").contains("/nonexistent/final-door.toml"));
    }
}
