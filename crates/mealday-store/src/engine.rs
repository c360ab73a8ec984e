//! The schedule engine: bootstrap, tree parsing and "today" lookups.
//!
//! Dispatch lives in [`crate::dispatch`] and report rendering in
//! [`crate::report`]; both extend [`ScheduleEngine`] with further `impl`
//! blocks.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use mealday_shared::constants::{DAY_FILE_EXTENSION, DEFAULT_ACTIVE_DAYS, LOG_FILE_NAME};
use mealday_shared::translate::default_weekday_names;
use mealday_shared::{Notifier, Translator};
use tracing::{debug, info, warn};

use crate::calendar;
use crate::clock::Clock;
use crate::error::Result;
use crate::files;
use crate::models::{DayRecord, LogEntry, WeekRecord};

/// Number of weeks prepared by every bootstrap, starting at the target week.
const BOOTSTRAP_WEEKS: usize = 2;

/// Year directory name → week directory name → week.
pub type WeekIndex = BTreeMap<String, BTreeMap<String, WeekRecord>>;

/// Plain configuration handed to [`ScheduleEngine::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Root of the `year/week/day` tree.
    pub data_root: PathBuf,
    /// Output directory of [`ScheduleEngine::render_document`].
    pub report_dir: PathBuf,
    /// Weekday numbers (Monday = 0) that carry a message.
    pub active_days: BTreeSet<u8>,
    /// Weekday number to display name, used for template files and reports.
    pub weekday_names: BTreeMap<u8, String>,
    /// `"DD.MM"` to note text.
    pub special_days: HashMap<String, String>,
    pub translator: Translator,
}

impl EngineConfig {
    /// Monday to Friday, English weekday names, no special days.
    pub fn new(data_root: impl Into<PathBuf>, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            report_dir: report_dir.into(),
            active_days: DEFAULT_ACTIVE_DAYS.into_iter().collect(),
            weekday_names: default_weekday_names(),
            special_days: HashMap::new(),
            translator: Translator::default(),
        }
    }

    /// Display name for `num`, or the number itself if unmapped.
    pub fn weekday_name(&self, num: u8) -> String {
        self.weekday_names
            .get(&num)
            .cloned()
            .unwrap_or_else(|| num.to_string())
    }
}

/// Owns the in-memory week index and every operation on it.
pub struct ScheduleEngine {
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) today: NaiveDate,
    pub(crate) config: EngineConfig,
    pub(crate) notifier: Box<dyn Notifier>,
    pub(crate) weeks: WeekIndex,
    initialized: bool,
}

impl ScheduleEngine {
    /// Create an engine.  `today` is read from `clock` once, here.
    pub fn new(config: EngineConfig, clock: Box<dyn Clock>, notifier: Box<dyn Notifier>) -> Self {
        let today = clock.today();
        info!(
            data_root = %config.data_root.display(),
            today = %today,
            active_days = ?config.active_days,
            "schedule engine created"
        );

        Self {
            clock,
            today,
            config,
            notifier,
            weeks: WeekIndex::new(),
            initialized: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// The index built by the last [`init`](Self::init).
    pub fn weeks(&self) -> &WeekIndex {
        &self.weeks
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Bootstrap upcoming weeks and rebuild the whole index from disk.
    ///
    /// Safe to call repeatedly; every call starts from scratch.
    pub fn init(&mut self) -> Result<()> {
        self.bootstrap()?;
        self.weeks = self.parse_tree(&self.config.data_root)?;
        self.initialized = true;

        debug!(
            years = self.weeks.len(),
            weeks = self.weeks.values().map(BTreeMap::len).sum::<usize>(),
            "week index rebuilt"
        );
        Ok(())
    }

    /// Whether an active weekday is still ahead of (or is) today.
    pub fn has_active_days_left(&self) -> bool {
        calendar::has_active_days_left(&self.config.active_days, calendar::weekday_num(self.today))
    }

    /// Create directories and empty day templates for two successive weeks.
    ///
    /// The first week is the current one, unless no active weekday remains
    /// in it, in which case preparation starts at next Monday.  Returns the
    /// `(year, week)` pairs prepared.
    pub fn bootstrap(&self) -> Result<Vec<(String, String)>> {
        let mut target = self.today;
        if !self.has_active_days_left() {
            target = calendar::next_monday(target);
        }

        let mut prepared = Vec::with_capacity(BOOTSTRAP_WEEKS);
        for _ in 0..BOOTSTRAP_WEEKS {
            let (year, week) = calendar::iso_year_week(target);
            self.prepare_week(&year, &week)?;
            prepared.push((year, week));
            target = calendar::next_monday(target);
        }
        Ok(prepared)
    }

    fn prepare_week(&self, year: &str, week: &str) -> Result<()> {
        let dir = self.config.data_root.join(year).join(week);
        if files::ensure_dir(&dir)? {
            info!(path = %dir.display(), "created week directory");
        }

        for &num in &self.config.active_days {
            let path = dir.join(format!(
                "{num}_{}.{DAY_FILE_EXTENSION}",
                self.config.weekday_name(num)
            ));
            if path.is_file() {
                continue;
            }
            match files::write_text(&path, "") {
                Ok(()) => debug!(path = %path.display(), "created day template"),
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "{}",
                    self.config.translator.get("couldn't create file, check permissions")
                ),
            }
        }
        Ok(())
    }

    /// Parse every `year/week` directory under `root`.
    pub fn parse_tree(&self, root: &Path) -> Result<WeekIndex> {
        let mut index = WeekIndex::new();

        for year in files::list_dir(root)? {
            if year.name.ends_with(".json") || !year.is_dir {
                debug!(name = %year.name, "skipping non-year entry");
                continue;
            }

            let mut weeks = BTreeMap::new();
            for week in files::list_dir(&year.path)? {
                if !week.is_dir {
                    debug!(path = %week.path.display(), "skipping non-week entry");
                    continue;
                }
                let record = self.parse_week_dir(&year.name, &week.name, &week.path)?;
                weeks.insert(week.name, record);
            }
            index.insert(year.name, weeks);
        }

        Ok(index)
    }

    fn parse_week_dir(&self, year: &str, week: &str, dir: &Path) -> Result<WeekRecord> {
        let log_path = dir.join(LOG_FILE_NAME);
        let stored: BTreeMap<String, Option<Vec<LogEntry>>> = if log_path.is_file() {
            files::read_json(&log_path)?
        } else {
            BTreeMap::new()
        };
        let mut logs = BTreeMap::new();
        for (weekday, entries) in stored {
            match entries {
                Some(entries) if !entries.is_empty() => {
                    logs.insert(weekday, entries);
                }
                _ => warn!(year, week, %weekday, "skipping empty log value"),
            }
        }

        let mut record = WeekRecord::new(year, week)?;
        for entry in files::list_dir(dir)? {
            if entry.is_dir {
                continue;
            }
            let Some(num) = day_file_number(&entry.name) else {
                if entry.name != LOG_FILE_NAME {
                    debug!(path = %entry.path.display(), "skipping unrecognized file");
                }
                continue;
            };

            let date = calendar::date_in_week(record.first_day, num);
            record.add_day(&entry.path, date)?;

            let note_key = date.format("%d.%m").to_string();
            if let Some(note) = self.config.special_days.get(&note_key) {
                if let Some(day) = record.days.get_mut(&num) {
                    day.special_note = Some(note.clone());
                }
            }

            if let Some(entries) = logs.remove(&num.to_string()) {
                record.restore_log(num, entries);
            }
        }

        for orphan in logs.keys() {
            warn!(year, week, weekday = %orphan, "log entries without a message file");
        }

        record.aggregate_status();
        Ok(record)
    }

    /// ISO `(year, week)` directory names for today.
    pub fn current_key(&self) -> (String, String) {
        calendar::iso_year_week(self.today)
    }

    /// Today's week from the last built index, without re-reading disk.
    pub fn current_week(&self) -> Option<&WeekRecord> {
        let (year, week) = self.current_key();
        self.weeks.get(&year)?.get(&week)
    }

    /// Re-read the tree and return today's record, if one exists.
    pub fn current_day(&mut self) -> Result<Option<&DayRecord>> {
        self.init()?;
        Ok(self.today_record())
    }

    /// Today's record from the last built index.
    pub(crate) fn today_record(&self) -> Option<&DayRecord> {
        let num = calendar::weekday_num(self.today);
        self.current_week()?.days.get(&num)
    }
}

/// Weekday number of a `"<0-6>_<name>.txt"` file name.
fn day_file_number(name: &str) -> Option<u8> {
    let stem = name.strip_suffix(DAY_FILE_EXTENSION)?.strip_suffix('.')?;
    let (num, _) = stem.split_once('_')?;
    num.parse::<u8>().ok().filter(|n| *n < 7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{engine_at, engine_with, write_day, RecordingNotifier};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_day_file_number() {
        assert_eq!(day_file_number("0_Monday.txt"), Some(0));
        assert_eq!(day_file_number("6_Sonntag.txt"), Some(6));
        assert_eq!(day_file_number("7_Nope.txt"), None);
        assert_eq!(day_file_number("notes.txt"), None);
        assert_eq!(day_file_number("x_Monday.txt"), None);
        assert_eq!(day_file_number("0_Monday.md"), None);
        assert_eq!(day_file_number("log.json"), None);
    }

    #[test]
    fn test_bootstrap_midweek_creates_current_and_next_week() {
        let dir = TempDir::new().unwrap();
        // Wednesday of week 42.
        let (engine, _) = engine_at(dir.path(), 2021, 10, 20);

        let prepared = engine.bootstrap().unwrap();
        assert_eq!(
            prepared,
            [
                ("2021".to_string(), "42".to_string()),
                ("2021".to_string(), "43".to_string())
            ]
        );

        let week = dir.path().join("2021").join("42");
        for name in ["0_Monday", "1_Tuesday", "2_Wednesday", "3_Thursday", "4_Friday"] {
            assert!(week.join(format!("{name}.txt")).is_file(), "{name}");
        }
        assert!(!week.join("5_Saturday.txt").exists());
    }

    #[test]
    fn test_bootstrap_on_saturday_skips_current_week() {
        let dir = TempDir::new().unwrap();
        let (engine, _) = engine_at(dir.path(), 2021, 10, 23);

        engine.bootstrap().unwrap();

        let year = dir.path().join("2021");
        assert!(!year.join("42").exists());
        assert!(year.join("43").join("0_Monday.txt").is_file());
        assert!(year.join("44").join("4_Friday.txt").is_file());
    }

    #[test]
    fn test_bootstrap_crosses_year_boundary() {
        let dir = TempDir::new().unwrap();
        // Monday 2024-12-23 is in week 52; the following week is 2025-W01.
        let (engine, _) = engine_at(dir.path(), 2024, 12, 23);

        engine.bootstrap().unwrap();
        assert!(dir.path().join("2024").join("52").is_dir());
        assert!(dir.path().join("2025").join("1").is_dir());
    }

    #[test]
    fn test_bootstrap_keeps_existing_messages() {
        let dir = TempDir::new().unwrap();
        let (engine, _) = engine_at(dir.path(), 2021, 10, 18);
        write_day(dir.path(), "2021", "42", "0_Monday.txt", "Soup of the day");

        engine.bootstrap().unwrap();
        let text = fs::read_to_string(dir.path().join("2021/42/0_Monday.txt")).unwrap();
        assert_eq!(text, "Soup of the day");
    }

    #[test]
    fn test_bootstrap_uses_translated_weekday_names() {
        let dir = TempDir::new().unwrap();
        let mut config = EngineConfig::new(dir.path(), dir.path().join("report"));
        config.weekday_names.insert(0, "Montag".to_string());
        config.active_days = [0].into_iter().collect();
        let (engine, _) = engine_with(config, RecordingNotifier::default(), 2021, 10, 18);

        engine.bootstrap().unwrap();
        assert!(dir.path().join("2021/42/0_Montag.txt").is_file());
    }

    #[test]
    fn test_parse_tree_builds_index() {
        let dir = TempDir::new().unwrap();
        let (mut engine, _) = engine_at(dir.path(), 2021, 10, 18);
        write_day(dir.path(), "2021", "42", "0_Monday.txt", "Soup of the day");
        write_day(dir.path(), "2021", "42", "notes.txt", "ignored");
        fs::write(dir.path().join("config.json"), "{}").unwrap();

        engine.init().unwrap();
        assert!(engine.is_initialized());

        let week = engine.current_week().unwrap();
        assert_eq!(week.first_day, NaiveDate::from_ymd_opt(2021, 10, 18).unwrap());
        assert_eq!(week.days.len(), 5);
        assert_eq!(week.days[&0].message, "Soup of the day");
        assert_eq!(week.days[&1].message, "");
        assert_eq!(week.status, Some(mealday_shared::Status::Warn));
        assert!(!engine.weeks().contains_key("config.json"));
    }

    #[test]
    fn test_parse_tree_dates_and_special_days() {
        let dir = TempDir::new().unwrap();
        let mut config = EngineConfig::new(dir.path(), dir.path().join("report"));
        config
            .special_days
            .insert("20.10".to_string(), "Staff outing".to_string());
        let (engine, _) = engine_with(config, RecordingNotifier::default(), 2021, 10, 18);
        write_day(dir.path(), "2021", "42", "2_Wednesday.txt", "Fish");

        let index = engine.parse_tree(dir.path()).unwrap();
        let day = &index["2021"]["42"].days[&2];
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2021, 10, 20).unwrap());
        assert_eq!(day.special_note.as_deref(), Some("Staff outing"));
    }

    #[test]
    fn test_parse_tree_restores_logs() {
        let dir = TempDir::new().unwrap();
        let (engine, _) = engine_at(dir.path(), 2021, 10, 18);
        write_day(dir.path(), "2021", "42", "0_Monday.txt", "Soup");
        write_day(
            dir.path(),
            "2021",
            "42",
            "log.json",
            r#"{"0": [{"message_sent": true, "log_date": "2021-10-18 11:45:00.000001",
                       "error": "", "message": "Soup", "message_stopped": false}]}"#,
        );

        let index = engine.parse_tree(dir.path()).unwrap();
        let day = &index["2021"]["42"].days[&0];
        assert_eq!(day.log.len(), 1);
        assert_eq!(
            day.has_been_sent(&Translator::default()).as_deref(),
            Some("sent at -> 2021-10-18 11:45")
        );
    }

    #[test]
    fn test_parse_tree_rejects_invalid_week_directory() {
        let dir = TempDir::new().unwrap();
        let (engine, _) = engine_at(dir.path(), 2021, 10, 18);
        fs::create_dir_all(dir.path().join("2021").join("archive")).unwrap();

        assert!(matches!(
            engine.parse_tree(dir.path()),
            Err(crate::StoreError::InvalidWeek { .. })
        ));
    }

    #[test]
    fn test_parse_tree_fails_on_undecodable_message() {
        let dir = TempDir::new().unwrap();
        let (engine, _) = engine_at(dir.path(), 2021, 10, 18);
        let week = dir.path().join("2021").join("42");
        fs::create_dir_all(&week).unwrap();
        fs::write(week.join("0_Monday.txt"), [0xff, 0xfe]).unwrap();

        assert!(matches!(
            engine.parse_tree(dir.path()),
            Err(crate::StoreError::Encoding { .. })
        ));
    }

    #[test]
    fn test_init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let (mut engine, _) = engine_at(dir.path(), 2021, 10, 20);
        write_day(dir.path(), "2021", "42", "0_Monday.txt", "Soup");
        write_day(dir.path(), "2021", "41", "4_Friday.txt", &"x".repeat(300));

        engine.init().unwrap();
        let first = engine.weeks().clone();
        engine.init().unwrap();
        assert_eq!(engine.weeks(), &first);
    }

    #[test]
    fn test_current_day_rereads_disk() {
        let dir = TempDir::new().unwrap();
        let (mut engine, _) = engine_at(dir.path(), 2021, 10, 18);
        engine.init().unwrap();
        assert_eq!(engine.current_day().unwrap().unwrap().message, "");

        write_day(dir.path(), "2021", "42", "0_Monday.txt", "Goulash");
        assert_eq!(engine.current_day().unwrap().unwrap().message, "Goulash");
    }

    #[test]
    fn test_current_day_missing_on_weekend() {
        let dir = TempDir::new().unwrap();
        let (mut engine, _) = engine_at(dir.path(), 2021, 10, 23);
        assert!(engine.current_day().unwrap().is_none());
    }

    #[test]
    fn test_template_failure_does_not_abort_init() {
        let dir = TempDir::new().unwrap();
        let (mut engine, _) = engine_at(dir.path(), 2021, 10, 20);
        let week = dir.path().join("2021").join("42");
        fs::create_dir_all(week.join("0_Monday.txt")).unwrap();

        engine.init().unwrap();

        for name in ["1_Tuesday", "2_Wednesday", "3_Thursday", "4_Friday"] {
            assert!(week.join(format!("{name}.txt")).is_file(), "{name}");
        }
        let days = &engine.weeks()["2021"]["42"].days;
        assert!(!days.contains_key(&0));
        assert_eq!(days.keys().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_tree_skips_empty_log_values() {
        let dir = TempDir::new().unwrap();
        let (engine, _) = engine_at(dir.path(), 2021, 10, 18);
        write_day(dir.path(), "2021", "42", "0_Monday.txt", "Soup");
        write_day(dir.path(), "2021", "42", "1_Tuesday.txt", "Stew");
        write_day(
            dir.path(),
            "2021",
            "42",
            "log.json",
            r#"{"0": null, "1": [], "2": [{"message_sent": true}]}"#,
        );

        let index = engine.parse_tree(dir.path()).unwrap();
        let days = &index["2021"]["42"].days;
        assert!(days[&0].log.is_empty());
        assert!(days[&1].log.is_empty());
    }
}
