use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration from `classmap.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
}

/// External renderer and viewer invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Graphviz-compatible renderer executable.
    #[serde(default = "default_renderer")]
    pub renderer: String,
    /// Viewer executable, invoked with the produced document path.
    #[serde(default = "default_viewer")]
    pub viewer: String,
    /// Output format selector passed to the renderer as `-T<format>`.
    #[serde(default = "default_format")]
    pub format: String,
    /// Per-process timeout for renderer and viewer, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_renderer() -> String {
    "dot".to_string()
}

fn default_viewer() -> String {
    if cfg!(target_os = "macos") {
        "open".to_string()
    } else {
        "xdg-open".to_string()
    }
}

fn default_format() -> String {
    "pdf".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            renderer: default_renderer(),
            viewer: default_viewer(),
            format: default_format(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a specific file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Load `classmap.toml` from a directory, falling back to defaults when
    /// the file does not exist or fails to parse.
    pub fn load_or_default(dir: &Path) -> Self {
        let path = dir.join("classmap.toml");
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: failed to load config from '{}': {e:#}. Using defaults.",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Default configuration as a commented TOML document, for `classmap init`.
    pub fn default_toml() -> String {
        let viewer = default_viewer();
        format!(
            r#"# classmap configuration

[render]
# Graphviz-compatible renderer; receives -T<format> and the .gv file.
renderer = "dot"
# Viewer invoked with the produced document path.
viewer = "{viewer}"
# Renderer output format (-T selector).
format = "pdf"
# Timeout in seconds applied to each external process.
timeout_secs = 10
"#
        )
    }
}
