//! Configuration loading from critdd.toml
//!
//! The file is optional. It is either given with `--config` or discovered by
//! walking up from the current directory. Command line flags take precedence
//! over its values.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use critdd_diagram::diagram::GroupQuery;
use critdd_tikz::options::{Options, RenderOptions};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "critdd.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CritddConfig {
    /// Defaults of the group queries
    #[serde(default)]
    pub groups: GroupQuery,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Defaults of the TikZ output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub reverse_x: bool,
    pub as_document: bool,
    pub preamble: Option<String>,
    /// Extra or replaced `axis` options
    pub axis_options: BTreeMap<String, String>,
    /// Extra or replaced `tikzpicture` options
    pub tikzpicture_options: BTreeMap<String, String>,
}

impl RenderConfig {
    pub fn to_render_options(&self) -> RenderOptions {
        RenderOptions {
            reverse_x: self.reverse_x,
            as_document: self.as_document,
            tikzpicture_options: self.tikzpicture_options.iter().collect::<Options>(),
            axis_options: self.axis_options.iter().collect::<Options>(),
            preamble: self.preamble.clone(),
        }
    }
}

impl CritddConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Finds the closest critdd.toml in `start` or one of its ancestors.
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut dir = start.to_owned();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Loads the explicit config file, or the discovered one, or the defaults.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_owned()),
            None => {
                let cwd = std::env::current_dir().context("Failed to get current directory")?;
                Self::discover_from(&cwd)
            }
        };
        let Some(path) = path else {
            tracing::debug!("no config file found, using defaults");
            return Ok(Self::default());
        };
        let config = Self::load(&path)?;
        config
            .groups
            .validate()
            .with_context(|| format!("Invalid [groups] in {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn default_toml() -> &'static str {
        r#"# critdd configuration

[groups]
# Significance level of the pairwise tests, between 0 and 1
alpha = 0.05
# Multiple testing adjustment: "holm" or "bonferroni"
adjustment = "holm"
# Keep groups that contain a single treatment
singletons = true

[render]
# Draw the best rank on the right
reverse_x = false
# Wrap the picture in a standalone document
as_document = false
# Extra preamble lines of the document (uncomment to enable)
# preamble = '\usepackage{xcolor}'

[render.axis_options]
# Overrides of the axis options (uncomment to enable)
# title = "Critical difference diagram"
# width = '\textwidth'

[render.tikzpicture_options]
# Overrides of the tikzpicture options (uncomment to enable)
# "treatment label/.style" = "font=\\small"
"#
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use critdd_stats::adjustment::Adjustment;

    use super::*;

    #[test]
    fn test_default_toml_matches_defaults() {
        let config: CritddConfig = toml::from_str(CritddConfig::default_toml()).unwrap();
        assert_eq!(config, CritddConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config: CritddConfig = toml::from_str(
            r#"
            [groups]
            adjustment = "bonferroni"

            [render.axis_options]
            title = "accuracy"
            "#,
        )
        .unwrap();
        assert_eq!(config.groups.alpha, 0.05);
        assert_eq!(config.groups.adjustment, Adjustment::Bonferroni);
        assert!(config.groups.singletons);
        let options = config.render.to_render_options();
        assert_eq!(options.axis_options.get("title"), Some("accuracy"));
        assert!(options.tikzpicture_options.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(toml::from_str::<CritddConfig>("[output]\nformat = \"json\"\n").is_err());
        assert!(toml::from_str::<CritddConfig>("[render]\nreverse = true\n").is_err());

        let err = toml::from_str::<CritddConfig>("[groups]\naplha = 0.01\n").unwrap_err();
        assert!(err.to_string().contains("aplha"), "{err}");
    }

    #[test]
    fn test_discover_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(CritddConfig::discover_from(&nested), None);

        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[groups]\nalpha = 0.1\n").unwrap();
        assert_eq!(CritddConfig::discover_from(&nested), Some(path.clone()));

        let config = CritddConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.groups.alpha, 0.1);
    }

    #[test]
    fn test_invalid_alpha_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[groups]\nalpha = 1.5\n").unwrap();
        assert!(CritddConfig::resolve(Some(&path)).is_err());
    }
}
