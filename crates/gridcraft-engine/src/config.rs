//! Configuration loading and typed config structures for the engine.
//!
//! The canonical configuration lives in `gridcraft-config.yaml` at the
//! project root. Every field has a default, so an empty file is a valid
//! (if uneventful) configuration.
//!
//! Energy amounts are written as whole units.

use std::path::Path;

use gridcraft_types::{Direction, EnergyLevel, EnergyValue};
use gridcraft_world::{AccumulatorSpec, BlockPos, CableSpec, GeneratorSpec};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `gridcraft-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Run bounds and pacing.
    #[serde(default)]
    pub simulation: SimulationBounds,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Nodes to place before the first tick.
    #[serde(default)]
    pub grid: Vec<NodePlacement>,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// How long and how fast the engine runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBounds {
    /// Number of ticks to run.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Real-time milliseconds between ticks. Zero runs flat out.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for SimulationBounds {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

const fn default_max_ticks() -> u64 {
    100
}

const fn default_tick_interval_ms() -> u64 {
    50
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    String::from("info")
}

/// One node to place in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodePlacement {
    /// A [`Generator`](gridcraft_world::Generator).
    Generator {
        /// Where to place it.
        pos: BlockPos,
        /// Store capacity.
        #[serde(default = "default_generator_capacity")]
        capacity: u64,
        /// Energy produced per tick.
        #[serde(default = "default_generator_output")]
        production: u64,
        /// Ceiling on one offer.
        #[serde(default = "default_generator_output")]
        max_output: u64,
        /// Energy stored at placement.
        #[serde(default)]
        stored: u64,
        /// Faces offers are pushed into.
        #[serde(default = "all_directions")]
        directions: Vec<Direction>,
    },
    /// A [`Cable`](gridcraft_world::Cable).
    Cable {
        /// Where to place it.
        pos: BlockPos,
        /// Loss per hop.
        #[serde(default = "default_resistance")]
        resistance: u64,
        /// Capacity band.
        #[serde(default = "default_cable_level")]
        level: EnergyLevel,
    },
    /// An [`Accumulator`](gridcraft_world::Accumulator).
    Accumulator {
        /// Where to place it.
        pos: BlockPos,
        /// Store capacity.
        #[serde(default = "default_accumulator_capacity")]
        capacity: u64,
        /// Capacity band.
        #[serde(default = "default_accumulator_level")]
        level: EnergyLevel,
        /// Faces offers are taken from.
        #[serde(default = "all_directions")]
        input_faces: Vec<Direction>,
    },
}

impl NodePlacement {
    /// Where the node goes.
    pub const fn pos(&self) -> BlockPos {
        match self {
            Self::Generator { pos, .. } | Self::Cable { pos, .. } | Self::Accumulator { pos, .. } => {
                *pos
            }
        }
    }
}

/// Generator parameters from a placement.
pub fn generator_spec(
    capacity: u64,
    production: u64,
    max_output: u64,
    directions: &[Direction],
) -> GeneratorSpec {
    GeneratorSpec {
        capacity: EnergyValue::from_units(capacity),
        production: EnergyValue::from_units(production),
        max_output: EnergyValue::from_units(max_output),
        directions: directions.to_vec(),
    }
}

/// Cable parameters from a placement.
pub fn cable_spec(resistance: u64, level: EnergyLevel) -> CableSpec {
    CableSpec {
        resistance: EnergyValue::from_units(resistance),
        level,
    }
}

/// Accumulator parameters from a placement.
pub fn accumulator_spec(
    capacity: u64,
    level: EnergyLevel,
    input_faces: &[Direction],
) -> AccumulatorSpec {
    AccumulatorSpec {
        capacity: EnergyValue::from_units(capacity),
        level,
        input_faces: input_faces.to_vec(),
    }
}

const fn default_generator_capacity() -> u64 {
    10_000
}

const fn default_generator_output() -> u64 {
    32
}

const fn default_resistance() -> u64 {
    1
}

const fn default_cable_level() -> EnergyLevel {
    EnergyLevel::L1
}

const fn default_accumulator_capacity() -> u64 {
    40_000
}

const fn default_accumulator_level() -> EnergyLevel {
    EnergyLevel::L2
}

fn all_directions() -> Vec<Direction> {
    Direction::ALL.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.simulation.max_ticks, 100);
        assert_eq!(config.simulation.tick_interval_ms, 50);
        assert_eq!(config.logging.level, "info");
        assert!(config.grid.is_empty());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
simulation:
  max_ticks: 12
  tick_interval_ms: 0
logging:
  level: debug
grid:
  - kind: generator
    pos: { x: 0, y: 0, z: 0 }
    stored: 1000
    max_output: 100
    directions: [up]
  - kind: cable
    pos: { x: 0, y: 1, z: 0 }
    resistance: 5
    level: l4
  - kind: accumulator
    pos: { x: 0, y: 2, z: 0 }
    level: l3
    input_faces: [down]
";
        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.simulation.max_ticks, 12);
        assert_eq!(config.simulation.tick_interval_ms, 0);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.grid.len(), 3);
        assert_eq!(
            config.grid.first(),
            Some(&NodePlacement::Generator {
                pos: BlockPos::new(0, 0, 0),
                capacity: 10_000,
                production: 32,
                max_output: 100,
                stored: 1000,
                directions: vec![Direction::Up],
            })
        );
        assert_eq!(
            config.grid.get(1),
            Some(&NodePlacement::Cable {
                pos: BlockPos::new(0, 1, 0),
                resistance: 5,
                level: EnergyLevel::L4,
            })
        );
        assert_eq!(
            config.grid.get(2).map(NodePlacement::pos),
            Some(BlockPos::new(0, 2, 0))
        );
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "simulation:\n  max_ticks: 7\n";
        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.simulation.max_ticks, 7);
        assert_eq!(config.simulation.tick_interval_ms, 50);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(SimulationConfig::parse("").ok(), Some(SimulationConfig::default()));
    }

    #[test]
    fn unknown_node_kind_is_rejected() {
        let yaml = "grid:\n  - kind: windmill\n    pos: { x: 0, y: 0, z: 0 }\n";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn placement_defaults_fill_in() {
        let yaml = "grid:\n  - kind: cable\n    pos: { x: 1, y: 2, z: 3 }\n";
        let config = SimulationConfig::parse(yaml).ok().unwrap_or_default();
        assert_eq!(
            config.grid.first(),
            Some(&NodePlacement::Cable {
                pos: BlockPos::new(1, 2, 3),
                resistance: 1,
                level: EnergyLevel::L1,
            })
        );
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("gridcraft-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
