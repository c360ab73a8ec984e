//! In-memory records for message files and calendar weeks.
//!
//! A [`WeekRecord`] exclusively owns its [`DayRecord`]s; the whole graph is
//! rebuilt from the data tree on every engine `init`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use mealday_shared::constants::MAX_MESSAGE_LENGTH;
use mealday_shared::{Status, Translator};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::calendar;
use crate::error::Result;
use crate::files;

/// Timestamp format of [`LogEntry::log_date`], local wall-clock time.
pub const LOG_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Number of leading `log_date` characters shown in "sent at" strings
/// (`YYYY-MM-DD HH:MM`).
const LOG_DATE_MINUTE_PRECISION: usize = 16;

// ---------------------------------------------------------------------------
// LogEntry
// ---------------------------------------------------------------------------

/// One send or stop attempt, as persisted in a week's `log.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogEntry {
    pub message_sent: bool,
    pub log_date: String,
    pub error: String,
    pub message: String,
    pub message_stopped: bool,
}

impl LogEntry {
    fn minute_stamp(&self) -> String {
        self.log_date
            .chars()
            .take(LOG_DATE_MINUTE_PRECISION)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// DayRecord
// ---------------------------------------------------------------------------

/// One day's message file and its send history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    /// Source text file.
    pub filepath: PathBuf,
    /// Real calendar date of this day.
    pub date: NaiveDate,
    /// Message text, NFC-normalized.
    pub message: String,
    /// Number of characters after normalization.
    pub message_length: usize,
    pub length_exceeded: bool,
    pub sendable: bool,
    /// Set by [`WeekRecord::aggregate_status`].
    pub status: Option<Status>,
    /// Holiday or special-day note for this date.
    pub special_note: Option<String>,
    /// Send/stop attempts in insertion order.
    pub log: Vec<LogEntry>,
}

impl DayRecord {
    /// Read the message file at `path` and derive its status.
    pub fn load(path: impl Into<PathBuf>, date: NaiveDate) -> Result<Self> {
        let filepath = path.into();
        let raw = files::read_text(&filepath)?;
        Ok(Self::from_text(filepath, date, &raw))
    }

    /// Build a record from already-read text.
    pub fn from_text(filepath: impl Into<PathBuf>, date: NaiveDate, raw: &str) -> Self {
        let mut day = Self {
            filepath: filepath.into(),
            date,
            message: raw.nfc().collect(),
            message_length: 0,
            length_exceeded: false,
            sendable: false,
            status: None,
            special_note: None,
            log: Vec::new(),
        };
        day.derive_status();
        day
    }

    /// Recompute length, length limit and sendability from `message`.
    pub fn derive_status(&mut self) {
        self.message_length = self.message.chars().count();
        self.length_exceeded = self.message_length > MAX_MESSAGE_LENGTH;
        self.sendable = self.message_length > 0 && !self.length_exceeded;
    }

    /// Weekday number of this day, Monday = 0.
    pub fn weekday(&self) -> u8 {
        calendar::weekday_num(self.date)
    }

    /// Classification used for the day icon.
    pub fn classify(&self) -> Status {
        if self.length_exceeded {
            Status::Fail
        } else if !self.sendable {
            Status::Warn
        } else {
            Status::Ok
        }
    }

    /// Translated reason this day cannot be sent, or `fallback` if it can.
    ///
    /// Emptiness is reported before an exceeded length.
    pub fn error_text<'a>(&self, translator: &'a Translator, fallback: &'a str) -> &'a str {
        if self.message_length == 0 {
            translator.get("message empty")
        } else if self.length_exceeded {
            translator.get("message too long")
        } else {
            fallback
        }
    }

    /// `"sent at -> YYYY-MM-DD HH:MM"` for the first sent, unstopped entry.
    pub fn has_been_sent(&self, translator: &Translator) -> Option<String> {
        self.log
            .iter()
            .find(|e| e.message_sent && !e.message_stopped)
            .map(|e| format!("{} -> {}", translator.get("sent at"), e.minute_stamp()))
    }

    /// `"stopped at -> YYYY-MM-DD HH:MM"` for the first stop entry.
    pub fn has_been_stopped(&self, translator: &Translator) -> Option<String> {
        self.log
            .iter()
            .find(|e| e.message_sent && e.message_stopped)
            .map(|e| format!("{} -> {}", translator.get("stopped at"), e.minute_stamp()))
    }

    /// Record an attempt.  The caller is responsible for persisting the log.
    pub fn append_log(
        &mut self,
        sent: bool,
        stopped: bool,
        now: NaiveDateTime,
        translator: &Translator,
    ) {
        let error = self.error_text(translator, "").to_string();
        self.log.push(LogEntry {
            message_sent: sent,
            log_date: now.format(LOG_DATE_FORMAT).to_string(),
            error,
            message: self.message.clone(),
            message_stopped: stopped,
        });
    }
}

// ---------------------------------------------------------------------------
// WeekRecord
// ---------------------------------------------------------------------------

/// One ISO calendar week and the days found in its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRecord {
    /// Year directory name.
    pub year: String,
    /// Week directory name.
    pub week: String,
    /// Monday of the week.
    pub first_day: NaiveDate,
    /// Sunday of the week.
    pub last_day: NaiveDate,
    /// Days present on disk, keyed by weekday number.
    pub days: BTreeMap<u8, DayRecord>,
    /// Set by [`WeekRecord::aggregate_status`]; only `Ok` or `Warn`.
    pub status: Option<Status>,
}

impl WeekRecord {
    pub fn new(year: impl Into<String>, week: impl Into<String>) -> Result<Self> {
        let year = year.into();
        let week = week.into();
        let (first_day, last_day) = Self::compute_span(&year, &week)?;

        Ok(Self {
            year,
            week,
            first_day,
            last_day,
            days: BTreeMap::new(),
            status: None,
        })
    }

    /// Monday and Sunday of the ISO week `week` in `year`.
    pub fn compute_span(year: &str, week: &str) -> Result<(NaiveDate, NaiveDate)> {
        calendar::week_span(year, week)
    }

    /// Numeric `(year, week)` used for chronological comparison.
    pub fn key(&self) -> Option<(i32, u32)> {
        calendar::week_key(&self.year, &self.week)
    }

    /// Load the message file at `path` as the day falling on `date`.
    /// Returns the weekday number it was stored under.
    pub fn add_day(&mut self, path: impl Into<PathBuf>, date: NaiveDate) -> Result<u8> {
        let day = DayRecord::load(path, date)?;
        let num = day.weekday();
        self.days.insert(num, day);
        Ok(num)
    }

    /// Reattach a persisted log.  Returns `false` if no such day was added.
    pub fn restore_log(&mut self, weekday: u8, entries: Vec<LogEntry>) -> bool {
        match self.days.get_mut(&weekday) {
            Some(day) => {
                day.log = entries;
                true
            }
            None => false,
        }
    }

    /// Set every day's icon and the week icon.
    pub fn aggregate_status(&mut self) {
        let mut week_status = Status::Ok;
        for day in self.days.values_mut() {
            let status = day.classify();
            if !status.is_ok() {
                week_status = Status::Warn;
            }
            day.status = Some(status);
        }
        self.status = Some(week_status);
    }

    /// Weekday-string to log mapping, skipping days without entries.
    pub fn log_snapshot(&self) -> BTreeMap<String, Vec<LogEntry>> {
        self.days
            .iter()
            .filter(|(_, day)| !day.log.is_empty())
            .map(|(num, day)| (num.to_string(), day.log.clone()))
            .collect()
    }

    /// The icon to render, `Ok` before aggregation has run.
    pub fn icon(&self) -> Status {
        self.status.unwrap_or(Status::Ok)
    }
}
