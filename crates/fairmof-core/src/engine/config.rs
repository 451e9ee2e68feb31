use crate::core::io::StructureFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_FRAMEWORK_LABEL: &str = "MOF";
pub const DEFAULT_RECOGNIZED_DIR: &str = "mofs_recognised_by_nomad";
pub const DEFAULT_UNRECOGNIZED_DIR: &str = "mofs_not_recognised_by_nomad";
pub const DEFAULT_PROPERTIES_STORE: &str = "mof_properties.json";
pub const DEFAULT_SBU_STORE: &str = "mof_sbu.json";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Where extraction results land on disk, relative to a single output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub recognized_dir: String,
    pub unrecognized_dir: String,
    pub properties_store: String,
    pub sbu_store: String,
    pub format: StructureFormat,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recognized_dir: DEFAULT_RECOGNIZED_DIR.to_string(),
            unrecognized_dir: DEFAULT_UNRECOGNIZED_DIR.to_string(),
            properties_store: DEFAULT_PROPERTIES_STORE.to_string(),
            sbu_store: DEFAULT_SBU_STORE.to_string(),
            format: StructureFormat::default(),
        }
    }

    pub fn properties_store_path(&self) -> PathBuf {
        self.root.join(&self.properties_store)
    }

    pub fn sbu_store_path(&self) -> PathBuf {
        self.root.join(&self.sbu_store)
    }

    pub fn structure_dir(&self, recognized: bool) -> PathBuf {
        if recognized {
            self.root.join(&self.recognized_dir)
        } else {
            self.root.join(&self.unrecognized_dir)
        }
    }

    /// `{root}/{dir}/{identifier}.{extension}`, with `dir` chosen by recognition outcome.
    pub fn structure_path(&self, identifier: &str, recognized: bool) -> PathBuf {
        self.structure_dir(recognized)
            .join(format!("{}.{}", identifier, self.format.extension()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    pub framework_label: String,
    pub layout: OutputLayout,
}

#[derive(Default)]
pub struct ExtractionConfigBuilder {
    output_root: Option<PathBuf>,
    framework_label: Option<String>,
    recognized_dir: Option<String>,
    unrecognized_dir: Option<String>,
    properties_store: Option<String>,
    sbu_store: Option<String>,
    format: Option<StructureFormat>,
}

impl ExtractionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_root(mut self, root: PathBuf) -> Self {
        self.output_root = Some(root);
        self
    }
    pub fn framework_label(mut self, label: impl Into<String>) -> Self {
        self.framework_label = Some(label.into());
        self
    }
    pub fn recognized_dir(mut self, dir: impl Into<String>) -> Self {
        self.recognized_dir = Some(dir.into());
        self
    }
    pub fn unrecognized_dir(mut self, dir: impl Into<String>) -> Self {
        self.unrecognized_dir = Some(dir.into());
        self
    }
    pub fn properties_store(mut self, name: impl Into<String>) -> Self {
        self.properties_store = Some(name.into());
        self
    }
    pub fn sbu_store(mut self, name: impl Into<String>) -> Self {
        self.sbu_store = Some(name.into());
        self
    }
    pub fn format(mut self, format: StructureFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn build(self) -> Result<ExtractionConfig, ConfigError> {
        let root = self
            .output_root
            .ok_or(ConfigError::MissingParameter("output_root"))?;
        let framework_label = self
            .framework_label
            .unwrap_or_else(|| DEFAULT_FRAMEWORK_LABEL.to_string());
        if framework_label.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "framework_label",
                reason: "must not be empty".to_string(),
            });
        }

        let defaults = OutputLayout::new(root);
        let layout = OutputLayout {
            recognized_dir: non_empty("recognized_dir", self.recognized_dir)?
                .unwrap_or(defaults.recognized_dir),
            unrecognized_dir: non_empty("unrecognized_dir", self.unrecognized_dir)?
                .unwrap_or(defaults.unrecognized_dir),
            properties_store: non_empty("properties_store", self.properties_store)?
                .unwrap_or(defaults.properties_store),
            sbu_store: non_empty("sbu_store", self.sbu_store)?.unwrap_or(defaults.sbu_store),
            format: self.format.unwrap_or(defaults.format),
            root: defaults.root,
        };
        if layout.recognized_dir == layout.unrecognized_dir {
            return Err(ConfigError::InvalidParameter {
                name: "unrecognized_dir",
                reason: "must differ from recognized_dir".to_string(),
            });
        }
        if layout.properties_store == layout.sbu_store {
            return Err(ConfigError::InvalidParameter {
                name: "sbu_store",
                reason: "must differ from properties_store".to_string(),
            });
        }

        Ok(ExtractionConfig {
            framework_label,
            layout,
        })
    }
}

fn non_empty(name: &'static str, value: Option<String>) -> Result<Option<String>, ConfigError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ConfigError::InvalidParameter {
            name,
            reason: "must not be empty".to_string(),
        }),
        other => Ok(other),
    }
}
