use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};

use super::error::ConfigError;

const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BuildingConfig {
    pub num_floors: u8,
    pub num_cars: u32,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        BuildingConfig { num_floors: 4, num_cars: 2 }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CarConfig {
    pub capacity: u32,
}

impl Default for CarConfig {
    fn default() -> Self {
        CarConfig { capacity: 10 }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_ms: u64,
    pub duration_ms: u64,
    pub status_board: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            tick_ms: 1000,
            duration_ms: 12000,
            status_board: true,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub building: BuildingConfig,
    pub car: CarConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct EnvArgs {
    config_path: Option<PathBuf>,
    num_cars: Option<u32>,
    num_floors: Option<u8>,
}

impl Config {
    /// Reads the configuration file named on the command line (or `config.json`),
    /// then applies command line overrides.
    pub fn get() -> Result<Self, ConfigError> {
        let args: Vec<String> = env::args().collect();
        let env_args = parse_env_args(&args);
        let path = env_args.config_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Config::load(&path)?;
        if let Some(num_cars) = env_args.num_cars {
            config.building.num_cars = num_cars;
        }
        if let Some(num_floors) = env_args.num_floors {
            config.building.num_floors = num_floors;
        }
        config.validate()?;
        Ok(config)
    }

    /// A missing file falls back to the default settings; an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Config::from_json(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No configuration file at {}, using default settings...", path.display());
                Ok(Config::default())
            },
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.building.num_floors == 0 {
            return Err(ConfigError::Invalid(String::from("building.num_floors must be at least 1")))
        }
        if self.car.capacity == 0 {
            return Err(ConfigError::Invalid(String::from("car.capacity must be positive")))
        }
        if self.simulation.tick_ms == 0 {
            return Err(ConfigError::Invalid(String::from("simulation.tick_ms must be positive")))
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.simulation.tick_ms)
    }

    pub fn run_duration(&self) -> Duration {
        Duration::from_millis(self.simulation.duration_ms)
    }
}

fn parse_env_args(args: &[String]) -> EnvArgs {
    let mut env_args = EnvArgs::default();

    for arg_pair in args.rchunks_exact(2) {
        match arg_pair[0].as_str() {
            "--config" => {
                env_args.config_path = Some(PathBuf::from(&arg_pair[1]));
            },
            "--cars" => {
                match arg_pair[1].parse::<u32>() {
                    Ok(num) => env_args.num_cars = Some(num),
                    Err(_) => warn!("cars {} is not a number, skipping...", arg_pair[1]),
                }
            },
            "--floors" => {
                match arg_pair[1].parse::<u8>() {
                    Ok(num) => env_args.num_floors = Some(num),
                    Err(_) => warn!("floors {} is not a number, skipping...", arg_pair[1]),
                }
            },
            _ => warn!("illegal argument {}, skipping...", arg_pair[0]),
        }
    }
    env_args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let config = Config::from_json(r#"{ "building": { "num_floors": 10 } }"#).unwrap();
        assert_eq!(config.building.num_floors, 10);
        assert_eq!(config.building.num_cars, 2);
        assert_eq!(config.car.capacity, 10);
        assert_eq!(config.tick_period(), Duration::from_secs(1));
    }

    #[test]
    fn zero_floors_is_rejected() {
        let result = Config::from_json(r#"{ "building": { "num_floors": 0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(Config::from_json("{ building: "), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Path::new("definitely/not/here/config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn command_line_pairs_are_parsed() {
        let parsed = parse_env_args(&args(&["elevator-dispatch", "--cars", "3", "--floors", "12"]));
        assert_eq!(parsed.num_cars, Some(3));
        assert_eq!(parsed.num_floors, Some(12));
        assert_eq!(parsed.config_path, None);
    }

    #[test]
    fn malformed_arguments_are_skipped() {
        let parsed = parse_env_args(&args(&["elevator-dispatch", "--cars", "many", "--speed", "9"]));
        assert_eq!(parsed, EnvArgs::default());
    }
}
