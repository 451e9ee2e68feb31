mod defaults;

use crate::cli::ExtractArgs;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use fairmof::core::io::StructureFormat;
use fairmof::engine::config::{ExtractionConfig, ExtractionConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    root: Option<PathBuf>,
    format: Option<String>,
    #[serde(rename = "recognized-dir")]
    recognized_dir: Option<String>,
    #[serde(rename = "unrecognized-dir")]
    unrecognized_dir: Option<String>,
    #[serde(rename = "properties-store")]
    properties_store: Option<String>,
    #[serde(rename = "sbu-store")]
    sbu_store: Option<String>,
}

/// The `extract` configuration as read from TOML, before CLI overrides and defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialExtractionConfig {
    #[serde(rename = "framework-label")]
    framework_label: Option<String>,
    output: Option<PartialOutputConfig>,
}

impl PartialExtractionConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves the final configuration.
    ///
    /// Precedence: CLI flags, then `--set` values, then the file, then defaults.
    pub fn merge_with_cli(mut self, args: &ExtractArgs) -> Result<ExtractionConfig> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();
        let output = self.output.take().unwrap_or_default();

        let format = match (args.format, output.format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(name)) => parse_format(name)?,
            (None, None) => defaults.format,
        };
        let root = args
            .output
            .clone()
            .or(output.root)
            .unwrap_or_else(|| PathBuf::from(defaults.output_root));
        let framework_label = args
            .framework_label
            .clone()
            .or(self.framework_label)
            .unwrap_or(defaults.framework_label);

        let mut builder = ExtractionConfigBuilder::new()
            .output_root(root)
            .framework_label(framework_label)
            .format(format);
        if let Some(dir) = output.recognized_dir {
            builder = builder.recognized_dir(dir);
        }
        if let Some(dir) = output.unrecognized_dir {
            builder = builder.unrecognized_dir(dir);
        }
        if let Some(name) = output.properties_store {
            builder = builder.properties_store(name);
        }
        if let Some(name) = output.sbu_store {
            builder = builder.sbu_store(name);
        }
        Ok(builder.build()?)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let value = value.to_string();

            match key {
                "framework-label" => self.framework_label = Some(value),
                "output.root" => {
                    self.output.get_or_insert_with(Default::default).root =
                        Some(PathBuf::from(value))
                }
                "output.format" => {
                    parse_format(&value)?;
                    self.output.get_or_insert_with(Default::default).format = Some(value);
                }
                "output.recognized-dir" => {
                    self.output.get_or_insert_with(Default::default).recognized_dir = Some(value)
                }
                "output.unrecognized-dir" => {
                    self.output.get_or_insert_with(Default::default).unrecognized_dir = Some(value)
                }
                "output.properties-store" => {
                    self.output.get_or_insert_with(Default::default).properties_store = Some(value)
                }
                "output.sbu-store" => {
                    self.output.get_or_insert_with(Default::default).sbu_store = Some(value)
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_format(name: &str) -> Result<StructureFormat> {
    name.parse()
        .map_err(|e: fairmof::core::io::ParseFormatError| CliError::Config(e.to_string()))
}
