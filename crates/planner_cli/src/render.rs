//! Terminal renderers for interaction cycle reports.

use planner_core::{
    common_days_announcement, format_date, CycleReport, CycleWarning, ViewRenderer,
};
use std::io::{self, Write};

const PRESENT_MARK: &str = "✔";
const DATE_COLUMN: &str = "Date";
const TOTAL_COLUMN: &str = "Total";

/// Plain-text pivot table, common-day announcement and warnings.
pub struct TableView<W: Write> {
    out: W,
}

impl<W: Write> TableView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ViewRenderer for TableView<W> {
    type Error = io::Error;

    fn render(&mut self, report: &CycleReport) -> io::Result<()> {
        for warning in &report.warnings {
            writeln!(self.out, "warning: {}", describe_warning(warning))?;
        }

        let highlighted: Vec<String> = report
            .highlighted
            .iter()
            .map(|date| format_date(*date))
            .collect();
        writeln!(self.out, "Participant: {}", report.viewer)?;
        if highlighted.is_empty() {
            writeln!(self.out, "Your days: none")?;
        } else {
            writeln!(self.out, "Your days: {}", highlighted.join(", "))?;
        }
        writeln!(self.out)?;

        let summary = &report.summary;
        if summary.is_empty() {
            writeln!(self.out, "No availability recorded yet.")?;
        } else {
            let widths: Vec<usize> = summary
                .participants()
                .iter()
                .map(|p| p.as_str().chars().count().max(PRESENT_MARK.chars().count()))
                .collect();
            let date_width = "YYYY-MM-DD".len();

            write!(self.out, "{DATE_COLUMN:<date_width$}")?;
            for (participant, width) in summary.participants().iter().zip(&widths) {
                write!(self.out, "  {:<width$}", participant.as_str())?;
            }
            writeln!(self.out, "  {TOTAL_COLUMN}")?;

            for row in summary.rows() {
                write!(self.out, "{:<date_width$}", format_date(row.date))?;
                for (present, width) in row.presence.iter().zip(&widths) {
                    let mark = if *present { PRESENT_MARK } else { "" };
                    write!(self.out, "  {mark:<width$}")?;
                }
                writeln!(self.out, "  {}", row.total)?;
            }
        }

        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}",
            common_days_announcement(report.common_days.len())
        )?;
        self.out.flush()
    }
}

/// Pretty-printed JSON document of the whole report.
pub struct JsonView<W: Write> {
    out: W,
}

impl<W: Write> JsonView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ViewRenderer for JsonView<W> {
    type Error = io::Error;

    fn render(&mut self, report: &CycleReport) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, report)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

fn describe_warning(warning: &CycleWarning) -> String {
    match warning {
        CycleWarning::PersistenceUnavailable(message) => {
            format!("showing an empty planner, data could not be loaded ({message})")
        }
        CycleWarning::PersistenceError(message) => {
            format!("your change was not saved ({message})")
        }
        CycleWarning::DroppedRows(count) => format!("{count} incomplete row(s) ignored"),
    }
}
