use crate::domain::SemanticVersion;
use crate::error::{CascadeError, Result};
use crate::propagation::{PropagationOptions, TriggerPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "version-cascade.toml";

/// Represents the complete configuration for version-cascade.
///
/// Contains propagation tuning, project file conventions and writer filters.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub propagation: PropagationConfig,

    #[serde(default)]
    pub conventions: ConventionsConfig,

    #[serde(default)]
    pub write: WriteConfig,
}

fn default_placeholder_version() -> String {
    "1.0.1".to_string()
}

/// Configuration for the propagation run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PropagationConfig {
    #[serde(default)]
    pub trigger: TriggerPolicy,

    #[serde(default)]
    pub pre_release_signature: String,

    #[serde(default = "default_placeholder_version")]
    pub placeholder_version: String,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        PropagationConfig {
            trigger: TriggerPolicy::default(),
            pre_release_signature: String::new(),
            placeholder_version: default_placeholder_version(),
        }
    }
}

impl PropagationConfig {
    /// Convert into propagator options, validating the version strings
    pub fn to_options(&self) -> Result<PropagationOptions> {
        let placeholder_version = SemanticVersion::parse(&self.placeholder_version)
            .map_err(|e| CascadeError::config(format!("propagation.placeholder_version: {}", e)))?;

        if !self.pre_release_signature.is_empty() {
            crate::domain::PreRelease::parse(&self.pre_release_signature).map_err(|e| {
                CascadeError::config(format!("propagation.pre_release_signature: {}", e))
            })?;
        }

        Ok(PropagationOptions {
            trigger: self.trigger,
            pre_release_signature: self.pre_release_signature.clone(),
            placeholder_version,
        })
    }
}

fn default_test_project_suffixes() -> Vec<String> {
    vec![".Test.csproj".to_string(), ".Tests.csproj".to_string()]
}

fn default_nuspec_file() -> String {
    "Module.nuspec".to_string()
}

fn default_package_info_file() -> String {
    "Packageinfo.json".to_string()
}

fn default_reference_version() -> String {
    "1.0.0".to_string()
}

/// Naming and defaulting conventions for project files.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConventionsConfig {
    #[serde(default = "default_test_project_suffixes")]
    pub test_project_suffixes: Vec<String>,

    #[serde(default = "default_nuspec_file")]
    pub nuspec_file: String,

    #[serde(default = "default_package_info_file")]
    pub package_info_file: String,

    /// Substituted for package references without a version
    #[serde(default = "default_reference_version")]
    pub default_reference_version: String,

    /// Substituted for projects without a `<Version>`
    #[serde(default = "default_reference_version")]
    pub default_module_version: String,
}

impl Default for ConventionsConfig {
    fn default() -> Self {
        ConventionsConfig {
            test_project_suffixes: default_test_project_suffixes(),
            nuspec_file: default_nuspec_file(),
            package_info_file: default_package_info_file(),
            default_reference_version: default_reference_version(),
            default_module_version: default_reference_version(),
        }
    }
}

/// Module patterns consumed by the writer.
///
/// Each list holds glob patterns over module ids; `"+"` selects every module
/// in the change set.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct WriteConfig {
    #[serde(default)]
    pub assembly_version: Vec<String>,

    #[serde(default)]
    pub file_version: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `version-cascade.toml` in current directory
/// 3. `version-cascade.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
