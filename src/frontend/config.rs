use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub errors: ErrorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Keep every `def_overload` candidate instead of replacing
    #[serde(default = "default_true")]
    pub allow_overloads: bool,

    /// Log each call with its arguments and result
    #[serde(default = "default_false")]
    pub trace_calls: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorConfig {
    #[serde(default = "default_true")]
    pub show_signatures: bool,

    #[serde(default = "default_true")]
    pub color: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormatName,

    /// Extra filter directives over the event targets `registry`,
    /// `interop`, `dispatch` and `runtime`, e.g. `dispatch=trace`
    #[serde(default)]
    pub filter: Option<String>,

    #[serde(default)]
    pub output: LogOutputName,

    /// Directory for daily log files when `output = "file"`
    #[serde(default = "default_log_directory")]
    pub directory: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutputName {
    Stdout,
    #[default]
    Stderr,
    File,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatName {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            allow_overloads: true,
            trace_calls: false,
        }
    }
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            show_signatures: true,
            color: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormatName::Pretty,
            filter: None,
            output: LogOutputName::Stderr,
            directory: default_log_directory(),
        }
    }
}

fn default_true() -> bool { true }
fn default_false() -> bool { false }
fn default_level() -> String { "warn".to_string() }
fn default_log_directory() -> String { "logs".to_string() }

const CONFIG_NAMES: [&str; 2] = [".dynbindrc", ".dynbindrc.toml"];

impl Config {
    /// Load configuration from a `.dynbindrc` file
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Find and load configuration file from current directory or parents
    pub fn discover() -> Self {
        match std::env::current_dir() {
            Ok(dir) => Self::discover_from(&dir),
            Err(_) => Self::default(),
        }
    }

    pub fn discover_from(start: &Path) -> Self {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            for name in CONFIG_NAMES {
                let config_path = dir.join(name);
                if config_path.exists() {
                    if let Ok(config) = Self::load(&config_path) {
                        return config;
                    }
                }
            }
            current = dir.parent().map(|p| p.to_path_buf());
        }

        Self::default()
    }

    /// Generate default configuration file content
    pub fn generate_default() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate config"))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.dispatch.allow_overloads);
        assert!(!config.dispatch.trace_calls);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.output, LogOutputName::Stderr);
        assert_eq!(config.logging.directory, "logs");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[dispatch]
allow_overloads = false
trace_calls = true

[logging]
level = "debug"
format = "json"
filter = "dispatch=trace"
output = "file"
directory = "/var/log/dynbind"
"#;

        let config = Config::parse(toml).unwrap();
        assert!(!config.dispatch.allow_overloads);
        assert!(config.dispatch.trace_calls);
        assert!(config.errors.show_signatures);
        assert_eq!(config.logging.format, LogFormatName::Json);
        assert_eq!(config.logging.filter.as_deref(), Some("dispatch=trace"));
        assert_eq!(config.logging.output, LogOutputName::File);
        assert_eq!(config.logging.directory, "/var/log/dynbind");
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        let err = Config::parse("[dispatch\nallow_overloads = 1").unwrap_err();
        assert!(err.starts_with("Failed to parse config"));
    }

    #[test]
    fn test_default_round_trips() {
        let generated = Config::generate_default();
        assert_eq!(Config::parse(&generated).unwrap(), Config::default());
    }

    #[test]
    fn test_save_and_discover() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let mut config = Config::default();
        config.dispatch.trace_calls = true;
        config.save(&root.path().join(".dynbindrc.toml")).unwrap();

        assert_eq!(Config::discover_from(&nested), config);
        assert_eq!(Config::load(&root.path().join(".dynbindrc.toml")).unwrap(), config);
    }
}
