//! Settings for the CLI: optional JSON file, overridden by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use component_sssp_core::{EdgeLookupMode, Engine, SsspOptions, WeightAttribute};
use serde::Deserialize;

/// Contents of a `--config` file. Every field is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Directory holding `graph-<n>/component-<m>` trees.
    pub root: Option<PathBuf>,
    pub engine: Option<Engine>,
    pub edge_lookup: Option<EdgeLookupMode>,
    /// Name of the int edge attribute to use as weight. Unset = first int attribute.
    pub weight_attribute: Option<String>,
    pub max_vertices: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
        let config: FileConfig = serde_json::from_slice(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}

/// Values given on the command line; these win over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub engine: Option<Engine>,
    pub edge_lookup: Option<EdgeLookupMode>,
    pub weight_attribute: Option<String>,
    pub max_vertices: Option<usize>,
}

/// Fully resolved settings.
#[derive(Debug)]
pub struct Settings {
    pub root: PathBuf,
    pub options: SsspOptions,
}

impl Settings {
    /// Resolve each setting: explicit flag > config file > default.
    pub fn resolve(file: FileConfig, flags: Overrides) -> Result<Self> {
        let max_vertices = flags.max_vertices.or(file.max_vertices);
        if max_vertices == Some(0) {
            bail!("max_vertices must be positive");
        }

        let weight_attribute = match flags.weight_attribute.or(file.weight_attribute) {
            Some(name) if name.is_empty() => bail!("weight_attribute must not be empty"),
            Some(name) => WeightAttribute::Named(name),
            None => WeightAttribute::FirstInteger,
        };

        Ok(Self {
            root: flags
                .root
                .or(file.root)
                .unwrap_or_else(|| PathBuf::from(".")),
            options: SsspOptions {
                weight_attribute,
                engine: flags.engine.or(file.engine).unwrap_or_default(),
                edge_lookup: flags.edge_lookup.or(file.edge_lookup).unwrap_or_default(),
                max_vertices,
            },
        })
    }
}
