use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::config::tables::Configuration;
use crate::config::validation::validate_configuration_result;
use crate::core::inputs::EstimationInputs;

/// File searched for by [`find_config_file`].
pub const CONFIG_FILE_NAME: &str = "estimator.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// On-disk encodings accepted for configuration and scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => bail!(
                "unsupported file type for {} (expected .toml or .json)",
                path.display()
            ),
        }
    }
}

pub(crate) fn read_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse configuration text and normalize it, without validating invariants.
pub fn parse_configuration(contents: &str, format: FileFormat) -> Result<Configuration> {
    let mut config: Configuration = match format {
        FileFormat::Toml => toml::from_str(contents).context("Failed to parse TOML configuration")?,
        FileFormat::Json => {
            serde_json::from_str(contents).context("Failed to parse JSON configuration")?
        }
    };
    let removed = strip_total_rows(&mut config);
    if removed > 0 {
        log::debug!("Dropped {} aggregate Total rows", removed);
    }
    apply_role_aliases(&mut config);
    Ok(config)
}

/// Read and normalize a configuration file. Invariants are not checked.
pub fn read_configuration(path: &Path) -> Result<Configuration> {
    let format = FileFormat::from_path(path)?;
    let contents = read_file(path)
        .with_context(|| format!("Failed to read configuration {}", path.display()))?;
    let config = parse_configuration(&contents, format)
        .with_context(|| format!("Invalid configuration {}", path.display()))?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Read, normalize and validate a configuration file.
pub fn load_configuration(path: &Path) -> Result<Configuration> {
    let config = read_configuration(path)?;
    validate_configuration_result(&config)
        .with_context(|| format!("Invalid configuration {}", path.display()))?;
    Ok(config)
}

/// Explicit path if given, else the nearest `estimator.toml`, else the baseline.
pub fn load_or_baseline(explicit: Option<&Path>) -> Result<Configuration> {
    if let Some(path) = explicit {
        return load_configuration(path);
    }
    match find_config_file() {
        Some(path) => load_configuration(&path),
        None => {
            log::debug!("No {} found, using the compiled baseline", CONFIG_FILE_NAME);
            Ok(Configuration::baseline())
        }
    }
}

/// Read a scenario (an `EstimationInputs` document). Missing optional fields
/// take their documented defaults; missing required fields are an error.
pub fn load_scenario(path: &Path) -> Result<EstimationInputs> {
    let format = FileFormat::from_path(path)?;
    let contents = read_file(path)
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    let inputs = match format {
        FileFormat::Toml => toml::from_str(&contents)
            .with_context(|| format!("Failed to parse scenario {}", path.display()))?,
        FileFormat::Json => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse scenario {}", path.display()))?,
    };
    Ok(inputs)
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `estimator.toml` from the current directory upward.
pub fn find_config_file() -> Option<PathBuf> {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Failed to get current directory: {}", e);
            return None;
        }
    };
    find_config_file_from(current)
}

pub fn find_config_file_from(start: PathBuf) -> Option<PathBuf> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Serialize a snapshot as TOML.
pub fn to_toml_string(config: &Configuration) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize configuration")
}

/// Write the compiled baseline to `path`. Refuses to overwrite unless `force`.
pub fn write_baseline(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }
    let contents = to_toml_string(&Configuration::baseline())?;
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote baseline configuration to {}", path.display());
    Ok(())
}

/// Aggregate labels such as "Total", "Grand Total" or "Total Hours".
fn is_total_label(label: &str) -> bool {
    let label = label.trim();
    ["total", "grand total", "subtotal", "sub-total"]
        .iter()
        .any(|aggregate| label.eq_ignore_ascii_case(aggregate))
        || label.starts_with("Total ")
}

/// Remove aggregate rows a workbook export may carry. Returns the number removed.
///
/// Only stage and role key columns are inspected; activity names are data.
pub fn strip_total_rows(config: &mut Configuration) -> usize {
    let before = row_count(config);

    config.stage_weights.retain(|r| !is_total_label(&r.stage));
    config.stage_presales.retain(|r| !is_total_label(&r.stage));
    config
        .activities
        .retain(|r| !is_total_label(&r.stage));
    config
        .role_mix
        .retain(|r| !is_total_label(&r.stage) && !is_total_label(&r.role));
    config.rates.retain(|r| !is_total_label(&r.role));
    config
        .delivery_mix
        .retain(|r| !r.role.as_deref().is_some_and(is_total_label));
    config.addon_catalog.retain(|r| !is_total_label(&r.role));
    config.product_role_map.retain(|r| !is_total_label(&r.role));

    before - row_count(config)
}

fn row_count(config: &Configuration) -> usize {
    config.stage_weights.len()
        + config.stage_presales.len()
        + config.activities.len()
        + config.role_mix.len()
        + config.rates.len()
        + config.delivery_mix.len()
        + config.addon_catalog.len()
        + config.product_role_map.len()
}

/// Rewrite every role reference through the alias table.
pub fn apply_role_aliases(config: &mut Configuration) {
    if config.role_aliases.is_empty() {
        return;
    }
    let aliases = config.role_aliases.clone();
    let canonical = |role: &mut String| {
        if let Some(alias) = aliases.iter().find(|a| a.alias == *role) {
            *role = alias.canonical.clone();
        }
    };

    config.role_mix.iter_mut().for_each(|r| canonical(&mut r.role));
    config.rates.iter_mut().for_each(|r| canonical(&mut r.role));
    config
        .delivery_mix
        .iter_mut()
        .filter_map(|r| r.role.as_mut())
        .for_each(|role| canonical(role));
    config.addon_catalog.iter_mut().for_each(|r| canonical(&mut r.role));
    config
        .product_role_map
        .iter_mut()
        .for_each(|r| canonical(&mut r.role));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tables::{Activity, RoleAlias, RoleMix};

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            FileFormat::from_path(Path::new("a/estimator.toml")).unwrap(),
            FileFormat::Toml
        );
        assert_eq!(
            FileFormat::from_path(Path::new("scenario.JSON")).unwrap(),
            FileFormat::Json
        );
        assert!(FileFormat::from_path(Path::new("book.xlsx")).is_err());
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }

    #[test]
    fn test_strip_total_rows() {
        let mut config = Configuration::baseline();
        config.role_mix.push(RoleMix {
            stage: "Start".into(),
            role: "Total".into(),
            fraction: 1.0,
        });
        let removed = strip_total_rows(&mut config);
        assert_eq!(removed, 1);
        assert!(validate_configuration_result(&config).is_ok());
    }

    #[test]
    fn test_total_like_activity_names_are_kept() {
        let mut config = Configuration::baseline();
        let start_activities = |config: &Configuration| {
            config.activities.iter().filter(|a| a.stage == "Start").count()
        };
        let before = start_activities(&config);
        for name in ["Totals Reconciliation", "Total Cost of Ownership Review"] {
            config.activities.push(Activity {
                stage: "Start".into(),
                activity: name.into(),
                weight: 1.0,
                is_presales: false,
            });
        }
        assert_eq!(strip_total_rows(&mut config), 0);
        assert_eq!(start_activities(&config), before + 2);
    }

    #[test]
    fn test_total_label_matching() {
        for label in ["Total", " total ", "Grand Total", "SUBTOTAL", "Total Hours"] {
            assert!(is_total_label(label), "{label}");
        }
        for label in ["Totals Reconciliation", "Subtotaling", "QA Engineer", "totalizer"] {
            assert!(!is_total_label(label), "{label}");
        }
    }

    #[test]
    fn test_role_aliases_rewrite_references() {
        let mut config = Configuration::baseline();
        for rm in config.role_mix.iter_mut() {
            if rm.role == "QA Engineer" {
                rm.role = "QA".into();
            }
        }
        config.role_aliases.push(RoleAlias {
            alias: "QA".into(),
            canonical: "QA Engineer".into(),
        });
        apply_role_aliases(&mut config);
        assert!(config.role_mix.iter().all(|rm| rm.role != "QA"));
    }

    #[test]
    fn test_baseline_toml_round_trips() {
        let text = to_toml_string(&Configuration::baseline()).unwrap();
        let parsed = parse_configuration(&text, FileFormat::Toml).unwrap();
        assert_eq!(parsed, Configuration::baseline());
    }
}
