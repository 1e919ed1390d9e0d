//! Index configuration.
//!
//! Configuration is plain data: it can be built in code with the `with_*`
//! methods or loaded from JSON (and TOML with the `toml` feature).
use crate::error::Result;
use serde::de::Error;
use std::path::Path;

/// Smallest and largest supported geohash cell precision.
pub const MIN_CELL_PRECISION: usize = 1;
pub const MAX_CELL_PRECISION: usize = 12;

/// Clustering index configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Geohash length used as the cell key. Precision 5 cells are roughly
    /// 4.9km x 4.9km; lower values give fewer, larger cells.
    #[serde(default = "Config::default_cell_precision")]
    pub cell_precision: usize,
}

impl Config {
    const fn default_cell_precision() -> usize {
        5
    }

    pub fn with_cell_precision(mut self, precision: usize) -> Self {
        assert!(
            (MIN_CELL_PRECISION..=MAX_CELL_PRECISION).contains(&precision),
            "Cell precision must be between 1 and 12"
        );

        if precision >= 9 {
            log::warn!(
                "Cell precision {} yields meter-sized cells; queries over wide areas \
                will scan many cells.",
                precision
            );
        }

        self.cell_precision = precision;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(MIN_CELL_PRECISION..=MAX_CELL_PRECISION).contains(&self.cell_precision) {
            return Err(format!(
                "Cell precision must be between {} and {}, got {}",
                MIN_CELL_PRECISION, MAX_CELL_PRECISION, self.cell_precision
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a configuration file. Files ending in `.toml` are parsed as TOML
    /// (requires the `toml` feature); everything else is parsed as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            #[cfg(feature = "toml")]
            {
                return Ok(Self::from_toml(&contents)?);
            }
            #[cfg(not(feature = "toml"))]
            {
                return Err(crate::error::GeoClusterError::InvalidConfig(format!(
                    "{} is a TOML file but the `toml` feature is disabled",
                    path.display()
                )));
            }
        }

        Ok(Self::from_json(&contents)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cell_precision: Self::default_cell_precision(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoClusterError;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cell_precision, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default().with_cell_precision(7);

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();

        assert_eq!(deserialized.cell_precision, 7);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(Config::from_json(r#"{"cell_size": 3}"#).is_err());
    }

    #[test]
    fn test_config_validation() {
        let config = Config { cell_precision: 0 };
        assert!(config.validate().is_err());
        assert!(Config::from_json(r#"{"cell_precision": 13}"#).is_err());
    }

    #[test]
    #[should_panic]
    fn test_with_invalid_precision_panics() {
        let _ = Config::default().with_cell_precision(0);
    }

    #[test]
    fn test_config_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"cell_precision": 4}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.cell_precision, 4);
    }

    #[test]
    fn test_config_from_missing_file() {
        let err = Config::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, GeoClusterError::Io(_)));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml_round_trip() {
        let config = Config::default().with_cell_precision(6);
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
