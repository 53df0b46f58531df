use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::config::drift::check_drift;
use crate::config::loader::{find_config_file, read_configuration};
use crate::config::tables::Configuration;
use crate::config::validation::configuration_errors;
use crate::errors::{EstimationError, EstimationWarning};
use crate::formatting::{FormattingConfig, Painter, Style};

/// Findings for one configuration snapshot.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub source: String,
    pub errors: Vec<EstimationError>,
    pub drift: Vec<EstimationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Pure function: collect every error and drift finding.
pub fn build_report(source: String, config: &Configuration) -> ValidationReport {
    ValidationReport {
        source,
        errors: configuration_errors(config),
        drift: check_drift(config),
    }
}

fn render_report(report: &ValidationReport, painter: &Painter) -> String {
    let item = |style, text: String| format!("  {}", painter.paint(style, &text));
    let mut lines = vec![painter.paint(
        Style::Heading,
        &format!("Configuration: {}", report.source),
    )];

    if report.errors.is_empty() {
        lines.push(painter.paint(Style::Good, "No configuration errors"));
    } else {
        let count = format!("{} error(s):", report.errors.len());
        lines.push(painter.paint(Style::Bad, &count));
        lines.extend(report.errors.iter().map(|e| item(Style::Bad, e.to_string())));
    }

    if report.drift.is_empty() {
        lines.push(painter.paint(Style::Muted, "No methodology drift"));
    } else {
        let count = format!("{} drift warning(s):", report.drift.len());
        lines.push(painter.paint(Style::Caution, &count));
        lines.extend(report.drift.iter().map(|w| item(Style::Caution, w.to_string())));
    }
    lines.join("\n")
}

pub fn validate_config_file(config: Option<PathBuf>) -> Result<()> {
    let path = config.or_else(find_config_file);
    let (source, snapshot) = match path {
        Some(path) => (path.display().to_string(), read_configuration(&path)?),
        None => ("compiled baseline".to_string(), Configuration::baseline()),
    };

    let report = build_report(source, &snapshot);
    let painter = Painter::for_config(FormattingConfig::from_env());
    println!("{}", render_report(&report, &painter));

    if !report.is_valid() {
        bail!("configuration has {} error(s)", report.errors.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_report_is_clean() {
        let report = build_report("baseline".into(), &Configuration::baseline());
        assert!(report.is_valid());
        assert!(report.drift.is_empty());
        let text = render_report(&report, &Painter::plain());
        assert!(text.contains("No configuration errors"));
    }

    #[test]
    fn test_report_lists_every_error() {
        let mut config = Configuration::baseline();
        config.baseline_hours = -1.0;
        config.rates[0].onshore = 0.0;
        let report = build_report("broken".into(), &config);
        assert_eq!(report.errors.len(), 2);
        let text = render_report(&report, &Painter::plain());
        assert!(text.contains("2 error(s):"));
        assert!(text.contains("baseline_hours"));
    }
}
