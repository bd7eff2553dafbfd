//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::Term;
use docaudit_types::{BatchSummary, ColorChoice};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render the summary of one finished file
    ///
    /// JSON output is deferred to [`render_run`](Self::render_run) so that
    /// stdout carries a single document.
    pub fn render_summary(&self, summary: &BatchSummary) -> io::Result<()> {
        if self.json_output {
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new(format!("{} ({})", summary.source, summary.label))
                .add_attribute(Attribute::Bold),
            Cell::new("Count").add_attribute(Attribute::Bold),
            Cell::new("Share").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("Rows read"),
            count_cell(summary.total_rows),
            Cell::new(""),
        ]);
        table.add_row(vec![
            Cell::new("Blank rows skipped"),
            count_cell(summary.blank_rows),
            Cell::new(""),
        ]);
        table.add_row(vec![
            Cell::new("Identifiers checked"),
            count_cell(summary.checked),
            Cell::new(""),
        ]);
        table.add_row(self.outcome_row("Found", summary.exists, summary, Color::Green));
        table.add_row(self.outcome_row("Missing", summary.missing, summary, Color::Yellow));
        table.add_row(self.outcome_row("Errors", summary.errors, summary, Color::Red));

        println!("{table}");
        println!(
            "Elapsed {:.2}s, {:.1} checks/s",
            millis_to_secs(summary.duration_ms),
            summary.rate_per_second()
        );
        println!();
        Ok(())
    }

    /// Render the whole run once every file is done
    pub fn render_run(&self, summaries: &[BatchSummary]) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(summaries).map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }

        if summaries.len() > 1 {
            let checked: usize = summaries.iter().map(|s| s.checked).sum();
            let missing: usize = summaries.iter().map(|s| s.missing).sum();
            let errors: usize = summaries.iter().map(|s| s.errors).sum();
            println!(
                "{} files: {checked} checked, {missing} missing, {errors} errors",
                summaries.len()
            );
        } else if summaries.is_empty() {
            println!("No identifiers were checked.");
        }
        Ok(())
    }

    fn outcome_row(
        &self,
        label: &str,
        count: usize,
        summary: &BatchSummary,
        color: Color,
    ) -> Vec<Cell> {
        let mut label_cell = Cell::new(label);
        if self.supports_color() && count > 0 {
            label_cell = label_cell.fg(color);
        }
        vec![
            label_cell,
            count_cell(count),
            Cell::new(format!("{:.1}%", summary.percent(count)))
                .set_alignment(CellAlignment::Right),
        ]
    }

    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn count_cell(count: usize) -> Cell {
    Cell::new(count).set_alignment(CellAlignment::Right)
}

#[allow(clippy::cast_precision_loss)]
fn millis_to_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}
