//! Build configuration
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (codefirst.toml)
//! - Environment variables (CODEFIRST__*)
//!
//! ## Example config file (codefirst.toml):
//! ```toml
//! [source]
//! dir = "schema"
//!
//! [output]
//! sdl_path = "generated/schema.graphql"
//! descriptor_path = "generated/schema.types.json"
//! typescript_path = "generated/schema.d.ts"
//! format = "pretty"
//!
//! [schema]
//! query = "Query"
//!
//! [[scalars]]
//! name = "DateTime"
//! typescript = "string"
//! ```

use config_crate::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::assembler::RootOperations;
use crate::emit::{ArtifactKind, EmitOptions};

/// Main build configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Where declarations are read from
    #[serde(default)]
    pub source: SourceConfig,

    /// Where artifacts are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Root operation types
    #[serde(default)]
    pub schema: RootOperations,

    /// TypeScript types for custom scalars
    #[serde(default)]
    pub scalars: Vec<ScalarMapping>,
}

/// Host-language mapping for one custom scalar.
///
/// A list of tables rather than a map: config keys are case-folded, scalar
/// names are not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarMapping {
    pub name: String,
    pub typescript: String,
}

/// Declaration source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory holding declaration files (*.json, *.toml)
    #[serde(default = "default_source_dir")]
    pub dir: PathBuf,
}

/// Artifact output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Schema-description document (SDL)
    #[serde(default = "default_sdl_path")]
    pub sdl_path: PathBuf,

    /// Type-descriptor document (JSON)
    #[serde(default = "default_descriptor_path")]
    pub descriptor_path: PathBuf,

    /// TypeScript typings; not emitted when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typescript_path: Option<PathBuf>,

    /// JSON layout of the descriptor
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

// Default value functions
fn default_source_dir() -> PathBuf {
    PathBuf::from("schema")
}

fn default_sdl_path() -> PathBuf {
    PathBuf::from("generated/schema.graphql")
}

fn default_descriptor_path() -> PathBuf {
    PathBuf::from("generated/schema.types.json")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: default_source_dir(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sdl_path: default_sdl_path(),
            descriptor_path: default_descriptor_path(),
            typescript_path: None,
            format: OutputFormat::Pretty,
        }
    }
}

impl OutputConfig {
    /// Artifacts to emit with their paths, in a fixed order
    pub fn targets(&self) -> Vec<(ArtifactKind, &Path)> {
        let mut targets = vec![
            (ArtifactKind::Sdl, self.sdl_path.as_path()),
            (ArtifactKind::Descriptor, self.descriptor_path.as_path()),
        ];
        if let Some(path) = &self.typescript_path {
            targets.push((ArtifactKind::TypeScript, path.as_path()));
        }
        targets
    }
}

impl BuildConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the defaults.
    ///
    /// Relative paths set in the explicit file resolve against that file's
    /// directory. Defaults and other layers stay relative to the working
    /// directory.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["codefirst.toml", ".codefirst.toml", "config/codefirst.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "codefirst", "codefirst-schema") {
            let xdg_config = config_dir.config_dir().join("codefirst.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from_str(&read_explicit(path)?, FileFormat::Toml));
        }

        // Load from environment variables (CODEFIRST__OUTPUT__SDL_PATH, ...)
        builder = builder.add_source(
            Environment::with_prefix("CODEFIRST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve relative paths against `base`
    pub fn rebase(mut self, base: &Path) -> Self {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.source.dir);
        join(&mut self.output.sdl_path);
        join(&mut self.output.descriptor_path);
        if let Some(path) = self.output.typescript_path.as_mut() {
            join(path);
        }
        self
    }

    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            format: self.output.format,
            scalars: self
                .scalars
                .iter()
                .map(|m| (m.name.clone(), m.typescript.clone()))
                .collect::<BTreeMap<_, _>>(),
        }
    }
}

/// Path-valued keys, as (section, key)
const PATH_KEYS: [(&str, &str); 4] = [
    ("source", "dir"),
    ("output", "sdl_path"),
    ("output", "descriptor_path"),
    ("output", "typescript_path"),
];

/// Read an explicit config file with its relative paths resolved against
/// the file's directory
fn read_explicit(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Foreign(Box::new(e)))?;
    let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(content);
    };

    let mut table: toml::Table = content.parse().map_err(|e| ConfigError::FileParse {
        uri: Some(path.display().to_string()),
        cause: Box::new(e),
    })?;
    for (section, key) in PATH_KEYS {
        if let Some(toml::Value::String(value)) =
            table.get_mut(section).and_then(|s| s.get_mut(key))
        {
            if Path::new(value.as_str()).is_relative() {
                let resolved = base.join(value.as_str()).to_string_lossy().into_owned();
                *value = resolved;
            }
        }
    }
    toml::to_string(&table).map_err(|e| ConfigError::Foreign(Box::new(e)))
}
