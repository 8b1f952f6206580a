//! Recognized analysis options.

use std::path::PathBuf;

use serde::Deserialize;

fn default_max_completion_items() -> usize {
    50
}

/// The options the analysis core recognizes.
///
/// `quiet` is honored by the process edge (it silences the tracing
/// subscriber); the core itself only emits events. Everything else an
/// editor sends is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Silence logging.
    pub quiet: bool,
    /// Directories to index for Java sources.
    pub workspace_roots: Vec<PathBuf>,
    /// Cap on every completion result assembly.
    #[serde(default = "default_max_completion_items")]
    pub max_completion_items: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            workspace_roots: Vec::new(),
            max_completion_items: default_max_completion_items(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.max_completion_items, 50);
    }

    #[test]
    fn roots_deserialize() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"quiet": true, "workspace_roots": ["/w"]}"#).unwrap();
        assert!(config.quiet);
        assert_eq!(config.workspace_roots, vec![PathBuf::from("/w")]);
    }
}
