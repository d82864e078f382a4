//! Scan result output.
//!
//! A [`CoverageWriter`] renders one [`CoverageResult`] to a sink. Three
//! renderers: JSON for tooling, colored terminal output for interactive use,
//! and Markdown for reports.

use crate::core::{Category, CoverageResult};
use anyhow::Result;
use colored::Colorize;
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

pub trait CoverageWriter {
    fn write_result(&mut self, result: &CoverageResult) -> Result<()>;
}

pub fn create_writer(writer: Box<dyn Write>, format: OutputFormat) -> Box<dyn CoverageWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> CoverageWriter for JsonWriter<W> {
    fn write_result(&mut self, result: &CoverageResult) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, result)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

fn score_colored(score: u32) -> colored::ColoredString {
    let text = format!("{score}/100");
    match score {
        80..=100 => text.green(),
        50..=79 => text.yellow(),
        _ => text.red(),
    }
}

impl<W: Write> CoverageWriter for TerminalWriter<W> {
    fn write_result(&mut self, result: &CoverageResult) -> Result<()> {
        writeln!(self.writer, "{}", "Token Coverage".bold())?;
        writeln!(
            self.writer,
            "  {} nodes scanned, {} distinct issues",
            result.total_nodes, result.total_issues
        )?;
        writeln!(
            self.writer,
            "  quality score: {}",
            score_colored(result.quality_score)
        )?;
        writeln!(self.writer)?;

        for category in Category::ALL {
            let issues = &result.issues_by_category[&category];
            if issues.is_empty() {
                continue;
            }
            writeln!(self.writer, "{}", category.to_string().bold().underline())?;
            for issue in issues {
                let count = format!("{}x", issue.count);
                writeln!(
                    self.writer,
                    "  {:>5}  {}: {}",
                    count.cyan(),
                    issue.property,
                    issue.value.yellow()
                )?;
                for var in &issue.matching_variables {
                    writeln!(
                        self.writer,
                        "         {} {} ({})",
                        "->".dimmed(),
                        var.name.green(),
                        var.resolved_value
                    )?;
                }
            }
            writeln!(self.writer)?;
        }

        if result.total_issues == 0 {
            writeln!(self.writer, "{}", "No hard-coded values found.".green())?;
        }
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> CoverageWriter for MarkdownWriter<W> {
    fn write_result(&mut self, result: &CoverageResult) -> Result<()> {
        writeln!(self.writer, "# Token Coverage Report\n")?;
        writeln!(
            self.writer,
            "- Nodes scanned: {}\n- Distinct issues: {}\n- Quality score: **{}/100**\n",
            result.total_nodes, result.total_issues, result.quality_score
        )?;

        writeln!(self.writer, "## Sub-scores\n")?;
        writeln!(self.writer, "| Metric | Score | Weight |")?;
        writeln!(self.writer, "|--------|-------|--------|")?;
        let subs = &result.sub_scores;
        let weights = &result.weights;
        for (name, score, weight) in [
            ("Token coverage", subs.token_coverage, &weights.token_coverage),
            ("Tailwind readiness", subs.tailwind_readiness, &weights.tailwind_readiness),
            ("Component hygiene", subs.component_hygiene, &weights.component_hygiene),
            ("Variable hygiene", subs.variable_hygiene, &weights.variable_hygiene),
        ] {
            writeln!(self.writer, "| {name} | {score} | {weight} |")?;
        }
        writeln!(self.writer)?;

        for category in Category::ALL {
            let issues = &result.issues_by_category[&category];
            if issues.is_empty() {
                continue;
            }
            writeln!(self.writer, "## {category}\n")?;
            writeln!(self.writer, "| Count | Property | Value | Matching variables |")?;
            writeln!(self.writer, "|-------|----------|-------|--------------------|")?;
            for issue in issues {
                let vars = issue
                    .matching_variables
                    .iter()
                    .map(|v| v.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(
                    self.writer,
                    "| {} | {} | `{}` | {} |",
                    issue.count, issue.property, issue.value, vars
                )?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }
}
