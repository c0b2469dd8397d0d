use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CxConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
}

/// [analysis] section configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Endpoint of the external complexity-analysis service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout — analysing a large file set can take a while
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub line_numbers: bool,
    #[serde(default = "default_tab_width")]
    pub tab_width: u8,
    #[serde(default)]
    pub wrap_lines: bool,
    /// syntect theme name for the code pane
    #[serde(default = "default_theme")]
    pub theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Files larger than this are skipped at intake
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

fn default_true() -> bool {
    true
}

fn default_tab_width() -> u8 {
    4
}

fn default_endpoint() -> String {
    "http://localhost:8000/analyse".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_max_file_bytes() -> u64 {
    512 * 1024
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            tab_width: default_tab_width(),
            wrap_lines: false,
            theme: default_theme(),
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

/// Load config by merging global defaults with a per-directory override.
/// Priority: local `.cxview.toml` > global `~/.config/cxview/config.toml`
/// > built-in defaults. Merging is deep: individual fields within
/// sections (e.g. `[display]`) override independently.
pub fn load_config() -> CxConfig {
    let global_path = dirs::config_dir()
        .map(|d| d.join("cxview/config.toml").to_string_lossy().to_string());

    let global_table = global_path
        .and_then(|p| std::fs::read_to_string(p).ok())
        .and_then(|c| c.parse::<toml::Table>().ok());

    let local_table = std::fs::read_to_string(".cxview.toml")
        .ok()
        .and_then(|c| c.parse::<toml::Table>().ok());

    let merged = match (global_table, local_table) {
        (Some(mut global), Some(local)) => {
            deep_merge(&mut global, local);
            toml::Value::Table(global)
        }
        (Some(global), None) => toml::Value::Table(global),
        (None, Some(local)) => toml::Value::Table(local),
        (None, None) => return CxConfig::default(),
    };

    merged.try_into().unwrap_or_default()
}

/// Recursively merge `overlay` into `base`. Overlay values win; nested tables are merged recursively.
fn deep_merge(
    base: &mut toml::map::Map<String, toml::Value>,
    overlay: toml::map::Map<String, toml::Value>,
) {
    for (key, value) in overlay {
        match (base.get_mut(&key), &value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table.clone());
            }
            _ => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = CxConfig::default();
        assert_eq!(config.analysis.endpoint, "http://localhost:8000/analyse");
        assert!(config.display.line_numbers);
        assert_eq!(config.display.theme, "base16-ocean.dark");
        assert!(config.intake.max_file_bytes > 0);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let table: toml::Table = "[analysis]\nendpoint = \"http://cx.internal/analyse\""
            .parse()
            .unwrap();
        let config: CxConfig = toml::Value::Table(table).try_into().unwrap();
        assert_eq!(config.analysis.endpoint, "http://cx.internal/analyse");
        assert_eq!(config.analysis.timeout_secs, 120);
        assert!(config.display.line_numbers);
    }

    #[test]
    fn config_document_parses_as_table() {
        // A whole multi-section file must come through the same parse
        // path load_config uses, not fall back to defaults.
        let doc = "[analysis]\ntimeout_secs = 30\n\n[display]\nwrap_lines = true";
        let table = doc.parse::<toml::Table>().unwrap();
        let config: CxConfig = toml::Value::Table(table).try_into().unwrap();
        assert_eq!(config.analysis.timeout_secs, 30);
        assert!(config.display.wrap_lines);
    }

    #[test]
    fn deep_merge_overrides_per_field() {
        let mut base = "[display]\nline_numbers = false\ntab_width = 8"
            .parse::<toml::Table>()
            .unwrap();
        let overlay = "[display]\ntab_width = 2"
            .parse::<toml::Table>()
            .unwrap();
        deep_merge(&mut base, overlay);

        let config: CxConfig = toml::Value::Table(base).try_into().unwrap();
        assert_eq!(config.display.tab_width, 2);
        assert!(!config.display.line_numbers);
    }
}
