use fairmof::core::io::StructureFormat;
use fairmof::engine::config::DEFAULT_FRAMEWORK_LABEL;

pub struct DefaultsConfig {
    pub output_root: String,
    pub framework_label: String,
    pub format: StructureFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_root: "FAIR-MOFs".to_string(),
            framework_label: DEFAULT_FRAMEWORK_LABEL.to_string(),
            format: StructureFormat::Cif,
        }
    }
}
