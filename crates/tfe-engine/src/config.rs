use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::engine::Value;
use crate::error::EngineError;

/// The engine rule set. Every field has the classic default; a TOML file
/// can override any subset of them.
///
/// ```toml
/// size = 4
/// winning_value = 2048
/// four_spawn_percent = 25
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Rules {
    /// Board side length.
    #[serde(default = "defaults::size")]
    pub size: usize,
    /// A tile at or above this value wins the game.
    #[serde(default = "defaults::winning_value")]
    pub winning_value: Value,
    /// Percent chance that a spawned tile is a 4 instead of a 2.
    #[serde(default = "defaults::four_spawn_percent")]
    pub four_spawn_percent: u8,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            size: defaults::size(),
            winning_value: defaults::winning_value(),
            four_spawn_percent: defaults::four_spawn_percent(),
        }
    }
}

impl Rules {
    /// Load rules from a TOML file and validate them.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let rules: Self = toml::from_str(&contents)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Reject rule sets the engine cannot play. Nothing is ever silently
    /// corrected.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.size < 2 {
            return Err(EngineError::InvalidRules(format!(
                "board side must be at least 2, got {}",
                self.size
            )));
        }
        if self.four_spawn_percent > 100 {
            return Err(EngineError::InvalidRules(format!(
                "four_spawn_percent must be 0-100, got {}",
                self.four_spawn_percent
            )));
        }
        if !self.winning_value.is_power_of_two() || self.winning_value < 4 {
            return Err(EngineError::InvalidRules(format!(
                "winning_value must be a power of two >= 4, got {}",
                self.winning_value
            )));
        }
        Ok(())
    }
}

mod defaults {
    use super::Value;

    pub fn size() -> usize {
        4
    }
    pub fn winning_value() -> Value {
        2048
    }
    pub fn four_spawn_percent() -> u8 {
        25
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_the_classic_game() {
        let rules = Rules::default();
        assert_eq!(rules.size, 4);
        assert_eq!(rules.winning_value, 2048);
        assert_eq!(rules.four_spawn_percent, 25);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn from_toml_fills_in_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "size = 5").unwrap();
        drop(file);

        let rules = Rules::from_toml(&path).unwrap();
        assert_eq!(rules.size, 5);
        assert_eq!(rules.winning_value, 2048);
        assert_eq!(rules.four_spawn_percent, 25);
    }

    #[test]
    fn from_toml_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, "winning_value = 1000\n").unwrap();
        assert!(matches!(
            Rules::from_toml(&path),
            Err(EngineError::InvalidRules(_))
        ));

        std::fs::write(&path, "not toml at all [").unwrap();
        assert!(matches!(
            Rules::from_toml(&path),
            Err(EngineError::Toml(_))
        ));

        assert!(matches!(
            Rules::from_toml(dir.path().join("missing.toml")),
            Err(EngineError::Io(_))
        ));
    }

    #[test]
    fn validate_rejects_each_bad_field() {
        let mut rules = Rules::default();
        rules.size = 1;
        assert!(rules.validate().is_err());

        let mut rules = Rules::default();
        rules.four_spawn_percent = 101;
        assert!(rules.validate().is_err());

        let mut rules = Rules::default();
        rules.winning_value = 2;
        assert!(rules.validate().is_err());
    }
}
