use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{ColumnConstraint, ContentArrangement, Table, Width};
use pwmctl::frame::Reading;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReadingOutput<'a> {
    kind: &'a str,
    unit: &'a str,
    x: f32,
    y: f32,
    z: f32,
    timestamp: String,
}

#[derive(Serialize)]
struct CommandOutput<'a> {
    command: &'a str,
    port: &'a str,
    bytes: usize,
    timestamp: String,
}

/// Prints readings as they arrive.
///
/// The table format draws its header once and then one row per reading;
/// [`finish`](Self::finish) closes the table.
pub struct ReadingPrinter {
    format: OutputFormat,
    footer: Option<String>,
}

impl ReadingPrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            footer: None,
        }
    }

    pub fn print(&mut self, reading: &Reading) {
        for line in self.render(reading) {
            println!("{line}");
        }
    }

    /// Close the table, if one was started.
    pub fn finish(&mut self) {
        if let Some(footer) = self.footer.take() {
            println!("{footer}");
        }
    }

    fn render(&mut self, reading: &Reading) -> Vec<String> {
        match self.format {
            OutputFormat::Json => {
                let out = ReadingOutput {
                    kind: reading.kind.as_str(),
                    unit: reading.kind.unit(),
                    x: reading.x,
                    y: reading.y,
                    z: reading.z,
                    timestamp: now_unix_millis(),
                };
                vec![serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())]
            }
            OutputFormat::Table => {
                let header = self.footer.is_none();
                let mut lines: Vec<String> = reading_table(reading, header).lines().collect();
                let footer = lines.pop();
                if header {
                    self.footer = footer;
                    lines
                } else {
                    // Drop the top border; the rows join the open table.
                    lines.into_iter().skip(1).collect()
                }
            }
            OutputFormat::Pretty => vec![format!(
                "{:<4} x={:>10.4} y={:>10.4} z={:>10.4} {}",
                reading.kind,
                reading.x,
                reading.y,
                reading.z,
                reading.kind.unit()
            )],
        }
    }
}

/// Fixed column widths keep rows from separate renders aligned.
fn reading_table(reading: &Reading, header: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_constraints([6u16, 14, 14, 14, 7].map(|width| {
            ColumnConstraint::Absolute(Width::Fixed(width))
        }));
    if header {
        table.set_header(vec!["KIND", "X", "Y", "Z", "UNIT"]);
    }
    table.add_row(vec![
        reading.kind.to_string(),
        reading.x.to_string(),
        reading.y.to_string(),
        reading.z.to_string(),
        reading.kind.unit().to_string(),
    ]);
    table
}

pub fn print_sent(command: &str, port: &str, bytes: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = CommandOutput {
                command,
                port,
                bytes,
                timestamp: now_unix_millis(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "PORT", "BYTES"])
                .add_row(vec![command.to_string(), port.to_string(), bytes.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("sent {command} to {port} ({bytes} bytes)");
        }
    }
}

fn now_unix_millis() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
