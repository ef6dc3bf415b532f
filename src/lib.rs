//! Cypher OGM
//!
//! An object-graph mapping layer over the Neo4j Bolt driver:
//! - Nodes, relationships and typed property slots
//! - Comparison expressions bound to node properties
//! - CREATE / MATCH clause builders rendered to parameterized Cypher
//! - A thin session wrapper that hands statements to `neo4rs`

pub mod error;
pub mod neo4j;
pub mod ogm;

pub use error::OgmError;

use anyhow::Result;
use ogm::ParamStyle;
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub neo4j: Neo4jYamlConfig,
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub param_style: ParamStyle,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            url: neo4j::client::DEFAULT_URL.into(),
            user: neo4j::client::DEFAULT_USER.into(),
            password: neo4j::client::DEFAULT_PASSWORD.into(),
            param_style: ParamStyle::Dollar,
        }
    }
}

// ============================================================================
// Resolved configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub neo4j_url: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub param_style: ParamStyle,
}

impl Config {
    /// Load configuration from `config.yaml` (if present) and env vars
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);
        Self::from_sources(yaml, |key| std::env::var(key).ok())
    }

    /// Resolve a config from parsed YAML and an env lookup
    pub fn from_sources(yaml: YamlConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let param_style = match env("NEO4J_PARAM_STYLE") {
            Some(s) => s.parse::<ParamStyle>().map_err(anyhow::Error::msg)?,
            None => yaml.neo4j.param_style,
        };

        Ok(Self {
            neo4j_url: env("NEO4J_URL").unwrap_or(yaml.neo4j.url),
            neo4j_user: env("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: env("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            param_style,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}
