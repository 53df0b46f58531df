//! Report writers for an [`EstimationResult`].

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::core::results::EstimationResult;
use crate::formatting::{
    format_currency, format_hours, format_percent, format_rate, FormattingConfig, Painter,
    Style,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
}

pub trait OutputWriter {
    fn write_estimate(&mut self, result: &EstimationResult) -> Result<()>;
}

/// Writer for `format`, targeting `output` or stdout.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
    formatting: FormattingConfig,
) -> Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout()),
    };
    // Files never receive escape codes.
    let formatting = if output.is_some() {
        FormattingConfig::plain()
    } else {
        formatting
    };

    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink, formatting)),
    })
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_estimate(&mut self, result: &EstimationResult) -> Result<()> {
        let json = serde_json::to_string_pretty(result)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn scenario_line(result: &EstimationResult) -> String {
    let inputs = &result.inputs;
    format!(
        "{} · {} · {} · {}",
        inputs.product, inputs.delivery_type, inputs.size_band, inputs.locale
    )
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_summary(&mut self, result: &EstimationResult) -> Result<()> {
        let k = &result.kpis;
        writeln!(self.writer, "# N2S Estimate")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", scenario_line(result))?;
        writeln!(self.writer)?;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(self.writer, "| Total hours | {} |", format_hours(k.total_hours))?;
        writeln!(self.writer, "| Presales hours | {} |", format_hours(k.presales_hours))?;
        writeln!(self.writer, "| Delivery hours | {} |", format_hours(k.delivery_hours))?;
        writeln!(self.writer, "| Total cost | {} |", format_currency(k.total_cost))?;
        writeln!(self.writer, "| Blended rate | {} |", format_rate(k.blended_rate))?;
        writeln!(self.writer, "| Presales ratio | {} |", format_percent(k.presales_ratio))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_stages(&mut self, result: &EstimationResult) -> Result<()> {
        writeln!(self.writer, "## Stages")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Phase | Stage | Weight | Hours | Presales | Delivery |"
        )?;
        writeln!(
            self.writer,
            "|-------|-------|--------|-------|----------|----------|"
        )?;
        for s in &result.base.stages {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} |",
                s.phase,
                s.stage,
                format_percent(s.weight),
                format_hours(s.hours),
                format_hours(s.presales_hours),
                format_hours(s.delivery_hours)
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_packages(&mut self, result: &EstimationResult) -> Result<()> {
        writeln!(self.writer, "## Packages")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Package | Enabled | Hours | Cost |")?;
        writeln!(self.writer, "|---------|---------|-------|------|")?;
        for p in &result.package_summary {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} |",
                p.package,
                if p.enabled { "yes" } else { "no" },
                format_hours(p.hours),
                format_currency(p.cost)
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_roles(&mut self, result: &EstimationResult) -> Result<()> {
        writeln!(self.writer, "## Roles")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Role | Hours | Cost |")?;
        writeln!(self.writer, "|------|-------|------|")?;
        for r in &result.role_summary {
            writeln!(
                self.writer,
                "| {} | {} | {} |",
                r.role,
                format_hours(r.hours),
                format_currency(r.cost)
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_warnings(&mut self, result: &EstimationResult) -> Result<()> {
        if result.warnings.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Warnings")?;
        writeln!(self.writer)?;
        for w in &result.warnings {
            writeln!(self.writer, "- {}", w)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_estimate(&mut self, result: &EstimationResult) -> Result<()> {
        self.write_summary(result)?;
        self.write_stages(result)?;
        self.write_packages(result)?;
        self.write_roles(result)?;
        self.write_warnings(result)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    painter: Painter,
    unicode: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig) -> Self {
        let painter = Painter::for_config(formatting);
        Self {
            writer,
            painter,
            unicode: painter.is_colored(),
        }
    }

    fn table(&self, header: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(if self.unicode { UTF8_FULL } else { ASCII_FULL })
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header.to_vec());
        table
    }

    fn section(&mut self, title: &str, table: &Table) -> Result<()> {
        writeln!(self.writer, "{}", self.painter.paint(Style::Heading, title))?;
        writeln!(self.writer, "{}", table)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

fn right_align(table: &mut Table, from_column: usize) {
    for column in table.column_iter_mut().skip(from_column) {
        column.set_cell_alignment(CellAlignment::Right);
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_estimate(&mut self, result: &EstimationResult) -> Result<()> {
        let k = &result.kpis;
        writeln!(
            self.writer,
            "{}",
            self.painter.paint(Style::Title, &format!("N2S Estimate: {}", scenario_line(result)))
        )?;
        writeln!(self.writer)?;

        let mut kpis = self.table(&["Metric", "Value"]);
        kpis.add_row(vec!["Total hours".to_string(), format_hours(k.total_hours)]);
        kpis.add_row(vec!["Presales hours".to_string(), format_hours(k.presales_hours)]);
        kpis.add_row(vec!["Delivery hours".to_string(), format_hours(k.delivery_hours)]);
        kpis.add_row(vec!["Total cost".to_string(), format_currency(k.total_cost)]);
        kpis.add_row(vec!["Blended rate".to_string(), format_rate(k.blended_rate)]);
        kpis.add_row(vec![
            "Presales ratio".to_string(),
            format_percent(k.presales_ratio),
        ]);
        right_align(&mut kpis, 1);
        self.section("Summary", &kpis)?;

        let mut stages = self.table(&["Stage", "Weight", "Hours", "Presales", "Delivery", "Cost"]);
        for (s, summary) in result.base.stages.iter().zip(&result.stage_summary) {
            stages.add_row(vec![
                Cell::new(&s.stage),
                Cell::new(format_percent(s.weight)),
                Cell::new(format_hours(s.hours)),
                Cell::new(format_hours(s.presales_hours)),
                Cell::new(format_hours(s.delivery_hours)),
                Cell::new(format_currency(summary.cost)),
            ]);
        }
        right_align(&mut stages, 1);
        self.section("Base N2S stages", &stages)?;

        let mut packages = self.table(&["Package", "Enabled", "Hours", "Cost"]);
        for p in &result.package_summary {
            packages.add_row(vec![
                p.package.clone(),
                if p.enabled { "yes" } else { "no" }.to_string(),
                format_hours(p.hours),
                format_currency(p.cost),
            ]);
        }
        right_align(&mut packages, 2);
        self.section("Packages", &packages)?;

        for addon in &result.addons {
            let mut tiers = self.table(&["Tier", "Items", "Unit hours", "Raw hours", "Hours"]);
            for t in &addon.tiers {
                tiers.add_row(vec![
                    t.tier.to_string(),
                    format!("{:.2}", t.items),
                    format_hours(t.unit_hours),
                    format_hours(t.raw_hours),
                    format_hours(t.hours),
                ]);
            }
            right_align(&mut tiers, 1);
            self.section(&format!("{} tiers", addon.package), &tiers)?;
            if let Some(cap) = addon.cap.filter(|c| c.cap_applied) {
                let note = format!(
                    "Capped at {} hours (pre-cap {}; setup {} kept)",
                    format_hours(cap.cap_hours.unwrap_or(cap.pre_cap_hours)),
                    format_hours(cap.pre_cap_hours),
                    format_hours(cap.setup_hours)
                );
                writeln!(self.writer, "{}", self.painter.paint(Style::Caution, &note))?;
                writeln!(self.writer)?;
            }
        }

        let mut roles = self.table(&["Role", "Hours", "Cost"]);
        for r in &result.role_summary {
            roles.add_row(vec![
                r.role.clone(),
                format_hours(r.hours),
                format_currency(r.cost),
            ]);
        }
        right_align(&mut roles, 1);
        self.section("Roles", &roles)?;

        let mut splits = self.table(&["Split", "Hours", "Cost", "Hour share", "Cost share"]);
        for s in &result.delivery_split_summary {
            splits.add_row(vec![
                s.split.to_string(),
                format_hours(s.hours),
                format_currency(s.cost),
                format_percent(s.hour_share),
                format_percent(s.cost_share),
            ]);
        }
        right_align(&mut splits, 1);
        self.section("Delivery split", &splits)?;

        if !result.warnings.is_empty() {
            writeln!(self.writer, "{}", self.painter.paint(Style::Heading, "Warnings"))?;
            for w in &result.warnings {
                writeln!(self.writer, "  {}", self.painter.paint(Style::Caution, &w.to_string()))?;
            }
        } else {
            writeln!(self.writer, "{}", self.painter.paint(Style::Good, "No warnings"))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
