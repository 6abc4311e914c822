use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GameConfig;
use crate::error::LevelError;

/// Shape of the hostiles a level is played against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelLayout {
    /// Rows of enemy tiers; a zero is an empty slot
    Formation(Vec<Vec<u32>>),
    Boss { lives: u32 },
}

/// A validated level, ready to be turned into a running [`crate::Level`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDefinition {
    pub number: u32,
    pub layout: LevelLayout,
}

impl LevelDefinition {
    pub fn formation(number: u32, grid: Vec<Vec<u32>>) -> Result<Self, LevelError> {
        let expected = grid.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(LevelError::Empty);
        }
        if let Some((index, row)) = grid.iter().enumerate().find(|(_, row)| row.len() != expected) {
            return Err(LevelError::Ragged {
                line: index + 1,
                expected,
                found: row.len(),
            });
        }
        if grid.iter().flatten().all(|&tier| tier == 0) {
            return Err(LevelError::Empty);
        }
        Ok(Self {
            number,
            layout: LevelLayout::Formation(grid),
        })
    }

    pub fn boss(number: u32, lives: u32) -> Result<Self, LevelError> {
        if lives == 0 {
            return Err(LevelError::LifelessBoss);
        }
        Ok(Self {
            number,
            layout: LevelLayout::Boss { lives },
        })
    }

    /// Parses level text: comma separated tiers per line, or a single
    /// lives value when `boss` is set
    pub fn parse(number: u32, text: &str, boss: bool) -> Result<Self, LevelError> {
        let mut rows = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let row = line
                .split(',')
                .map(|token| {
                    let token = token.trim();
                    token.parse::<u32>().map_err(|_| LevelError::Malformed {
                        line: index + 1,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(LevelError::Empty);
        }
        if boss {
            return match rows.as_slice() {
                [row] if row.len() == 1 => Self::boss(number, row[0]),
                _ => Err(LevelError::BossShape {
                    found: rows.iter().map(Vec::len).sum(),
                }),
            };
        }
        Self::formation(number, rows)
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.layout, LevelLayout::Boss { .. })
    }
}

/// Where level definitions come from
pub trait LevelSource {
    fn load(&self, number: u32, config: &GameConfig) -> Result<LevelDefinition, LevelError>;
}

impl<T: LevelSource + ?Sized> LevelSource for Box<T> {
    fn load(&self, number: u32, config: &GameConfig) -> Result<LevelDefinition, LevelError> {
        (**self).load(number, config)
    }
}

/// Reads `level_<n>.txt` files from a directory
#[derive(Debug, Clone)]
pub struct LevelDirectory {
    root: PathBuf,
}

impl LevelDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, number: u32) -> PathBuf {
        self.root.join(format!("level_{number}.txt"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl LevelSource for LevelDirectory {
    fn load(&self, number: u32, config: &GameConfig) -> Result<LevelDefinition, LevelError> {
        let path = self.path_for(number);
        let text = fs::read_to_string(&path).map_err(|source| LevelError::Io { path, source })?;
        LevelDefinition::parse(number, &text, config.is_boss_level(number))
    }
}

/// The levels shipped with the game
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLevels;

impl BuiltinLevels {
    fn text(number: u32) -> Option<&'static str> {
        match number {
            1 => Some(include_str!("../levels/level_1.txt")),
            2 => Some(include_str!("../levels/level_2.txt")),
            3 => Some(include_str!("../levels/level_3.txt")),
            4 => Some(include_str!("../levels/level_4.txt")),
            _ => None,
        }
    }
}

impl LevelSource for BuiltinLevels {
    fn load(&self, number: u32, config: &GameConfig) -> Result<LevelDefinition, LevelError> {
        let text = Self::text(number).ok_or(LevelError::Missing { level: number })?;
        LevelDefinition::parse(number, text, config.is_boss_level(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formation() {
        let definition = LevelDefinition::parse(1, "1,2,3\n0,1,0\n\n", false);
        assert!(matches!(
            definition,
            Ok(LevelDefinition {
                number: 1,
                layout: LevelLayout::Formation(ref grid),
            }) if grid == &vec![vec![1, 2, 3], vec![0, 1, 0]]
        ));
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let definition = LevelDefinition::parse(2, " 1, 1 \r\n1 ,1\n", false);
        assert!(definition.is_ok());
    }

    #[test]
    fn test_parse_boss() {
        let definition = LevelDefinition::parse(4, "20\n", true);
        assert!(matches!(
            definition,
            Ok(LevelDefinition {
                layout: LevelLayout::Boss { lives: 20 },
                ..
            })
        ));
    }

    #[test]
    fn test_non_numeric_token_is_rejected() {
        let result = LevelDefinition::parse(1, "1,1\n1,x\n", false);
        assert!(matches!(
            result,
            Err(LevelError::Malformed { line: 2, ref token }) if token == "x"
        ));
    }

    #[test]
    fn test_negative_token_is_rejected() {
        let result = LevelDefinition::parse(1, "1,-1\n", false);
        assert!(matches!(result, Err(LevelError::Malformed { line: 1, .. })));
    }

    #[test]
    fn test_ragged_grid_is_rejected() {
        let result = LevelDefinition::parse(1, "1,1,1\n1,1\n", false);
        assert!(matches!(
            result,
            Err(LevelError::Ragged {
                line: 2,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_empty_definitions_are_rejected() {
        assert!(matches!(LevelDefinition::parse(1, "", false), Err(LevelError::Empty)));
        assert!(matches!(LevelDefinition::parse(1, "\n  \n", true), Err(LevelError::Empty)));
        assert!(matches!(LevelDefinition::parse(1, "0,0\n0,0", false), Err(LevelError::Empty)));
    }

    #[test]
    fn test_boss_shape_is_checked() {
        assert!(matches!(
            LevelDefinition::parse(4, "1,2\n", true),
            Err(LevelError::BossShape { found: 2 })
        ));
        assert!(matches!(
            LevelDefinition::parse(4, "0\n", true),
            Err(LevelError::LifelessBoss)
        ));
    }

    #[test]
    fn test_builtin_levels_load() {
        let config = GameConfig::default();
        for number in 1..=config.max_level {
            let definition = BuiltinLevels.load(number, &config);
            assert!(definition.is_ok(), "level {number} failed: {definition:?}");
            if let Ok(definition) = definition {
                assert_eq!(definition.is_boss(), config.is_boss_level(number));
            }
        }
        assert!(matches!(
            BuiltinLevels.load(9, &config),
            Err(LevelError::Missing { level: 9 })
        ));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let directory = LevelDirectory::new("does/not/exist");
        let result = directory.load(1, &GameConfig::default());
        assert!(matches!(result, Err(LevelError::Io { .. })));
    }

    #[test]
    fn test_directory_reads_shipped_levels() {
        let directory = LevelDirectory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/levels"));
        assert_eq!(directory.path_for(2).file_name().and_then(|n| n.to_str()), Some("level_2.txt"));
        let result = directory.load(2, &GameConfig::default());
        assert!(matches!(
            result,
            Ok(LevelDefinition { layout: LevelLayout::Formation(ref grid), .. }) if grid.len() == 4
        ));
    }
}
