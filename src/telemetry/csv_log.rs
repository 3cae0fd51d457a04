//! Append-only delimited-text logs, one file per record family.
//!
//! Files are created with a header row on first write and only ever appended
//! to afterwards. Reading is limited to recovering the highest session id so a
//! new run continues the numbering.

use super::events::{
    INGREDIENT_USAGE_EVENT, MISTAKE_EVENT, ORDER_COMPLETED_EVENT, SESSION_END_EVENT,
};
use super::sink::TelemetrySink;
use crate::core::event::{Event, EventValue};
use chrono::Local;
use log::{debug, error};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub enum TelemetryError {
    /// The log directory or a log file could not be created or written.
    Io { path: PathBuf, message: String },
    /// A record was missing a field its schema requires.
    MissingField { event_type: String, field: String },
}

impl std::fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelemetryError::Io { path, message } => {
                write!(f, "I/O error on {}: {}", path.display(), message)
            }
            TelemetryError::MissingField { event_type, field } => {
                write!(f, "{} is missing field '{}'", event_type, field)
            }
        }
    }
}

impl std::error::Error for TelemetryError {}

/// The four append-only logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFile {
    Mistakes,
    IngredientUsage,
    OrdersPerSession,
    DishPreparationTime,
}

impl LogFile {
    pub fn file_name(&self) -> &'static str {
        match self {
            LogFile::Mistakes => "mistake.csv",
            LogFile::IngredientUsage => "ingredient_used.csv",
            LogFile::OrdersPerSession => "order_per_session.csv",
            LogFile::DishPreparationTime => "total_time_per_dish.csv",
        }
    }
}

pub struct CsvLogSink {
    dir: PathBuf,
    menu_items: Vec<String>,
    failed_writes: u64,
}

impl CsvLogSink {
    /// Opens (creating if needed) a log directory. `menu_items` fixes the
    /// per-dish columns of the session summary.
    pub fn new(dir: impl Into<PathBuf>, menu_items: Vec<String>) -> Result<Self, TelemetryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| TelemetryError::Io {
            path: dir.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            dir,
            menu_items,
            failed_writes: 0,
        })
    }

    pub fn path_of(&self, file: LogFile) -> PathBuf {
        self.dir.join(file.file_name())
    }

    pub fn failed_writes(&self) -> u64 {
        self.failed_writes
    }

    /// One past the highest `session_id` found in any of the logs, or 1 when
    /// there is no history. Rows with an unreadable id are skipped.
    pub fn next_session_id(&self) -> u64 {
        [
            LogFile::IngredientUsage,
            LogFile::DishPreparationTime,
            LogFile::Mistakes,
            LogFile::OrdersPerSession,
        ]
        .iter()
        .filter_map(|file| max_session_id(&self.path_of(*file)))
        .max()
        .unwrap_or(0)
            + 1
    }

    fn header(&self, file: LogFile) -> Vec<String> {
        let fixed: &[&str] = match file {
            LogFile::Mistakes => &["timestamp", "session_id", "mistake_type", "info"],
            LogFile::IngredientUsage => {
                &["session_id", "id", "timestamp", "ingredient", "action", "quantity"]
            }
            LogFile::OrdersPerSession => {
                &["session_id", "session_start", "session_end", "total_score"]
            }
            LogFile::DishPreparationTime => {
                &["timestamp", "session_id", "dish_type", "preparation_time_seconds"]
            }
        };
        let mut header: Vec<String> = fixed.iter().map(|s| s.to_string()).collect();
        if file == LogFile::OrdersPerSession {
            header.extend(self.menu_items.iter().cloned());
        }
        header
    }

    fn row_for(&self, event: &dyn Event) -> Result<Option<(LogFile, Vec<String>)>, TelemetryError> {
        let data = event.data();
        let now = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let session = event.session_id().to_string();
        let field = |name: &str| -> Result<String, TelemetryError> {
            data.get(name)
                .map(|v| v.to_string())
                .ok_or_else(|| TelemetryError::MissingField {
                    event_type: event.event_type().to_string(),
                    field: name.to_string(),
                })
        };

        let row = match event.event_type() {
            MISTAKE_EVENT => Some((
                LogFile::Mistakes,
                vec![now, session, field("mistake_type")?, field("info")?],
            )),
            INGREDIENT_USAGE_EVENT => Some((
                LogFile::IngredientUsage,
                vec![
                    session,
                    field("id")?,
                    now,
                    field("ingredient")?,
                    field("action")?,
                    field("quantity")?,
                ],
            )),
            ORDER_COMPLETED_EVENT => Some((
                LogFile::DishPreparationTime,
                vec![now, session, field("dish_type")?, field("preparation_time_seconds")?],
            )),
            SESSION_END_EVENT => {
                let mut row = vec![session, field("session_start")?, now, field("total_score")?];
                row.extend(self.menu_items.iter().map(|dish| dish_count(&data, dish)));
                Some((LogFile::OrdersPerSession, row))
            }
            other => {
                debug!("[CsvLogSink] no log file for {}", other);
                None
            }
        };
        Ok(row)
    }

    fn append(&self, file: LogFile, row: &[String]) -> Result<(), TelemetryError> {
        let path = self.path_of(file);
        let io_err = |e: std::io::Error| TelemetryError::Io {
            path: path.clone(),
            message: e.to_string(),
        };
        let is_new = !path.exists();
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_err)?;
        if is_new {
            writeln!(handle, "{}", join_record(&self.header(file))).map_err(io_err)?;
        }
        writeln!(handle, "{}", join_record(row)).map_err(io_err)?;
        Ok(())
    }

    pub fn write_event(&self, event: &dyn Event) -> Result<(), TelemetryError> {
        if let Some((file, row)) = self.row_for(event)? {
            self.append(file, &row)?;
        }
        Ok(())
    }
}

impl TelemetrySink for CsvLogSink {
    fn record(&mut self, event: &dyn Event) {
        if let Err(e) = self.write_event(event) {
            self.failed_writes += 1;
            error!("[CsvLogSink] dropped {} event: {}", event.event_type(), e);
        }
    }
}

fn dish_count(data: &HashMap<String, EventValue>, dish: &str) -> String {
    data.get(dish)
        .and_then(EventValue::as_int)
        .unwrap_or(0)
        .to_string()
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn join_record(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits one record, honouring double-quoted fields.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn max_session_id(path: &Path) -> Option<u64> {
    let file = fs::File::open(path).ok()?;
    let mut lines = BufReader::new(file).lines().map_while(Result::ok);
    let header = split_record(&lines.next()?);
    let column = header.iter().position(|h| h.trim() == "session_id")?;
    lines
        .filter_map(|line| split_record(&line).get(column)?.trim().parse::<u64>().ok())
        .max()
}
