//! Terminal and reStructuredText reports over the week index.

use std::path::PathBuf;

use mealday_shared::constants::{
    HISTORY_REPORT_FILE, PLANNED_REPORT_FILE, SYMBOL_FAIL, SYMBOL_OK, SYMBOL_WARN,
    TEXT_REPORT_RULE_WIDTH,
};
use tracing::info;

use crate::calendar;
use crate::engine::ScheduleEngine;
use crate::error::Result;
use crate::files;
use crate::models::WeekRecord;

/// Locations of the two documents written by
/// [`ScheduleEngine::render_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub planned: PathBuf,
    pub history: PathBuf,
}

impl ScheduleEngine {
    /// Every week in chronological (numeric-aware) order.
    pub fn sorted_weeks(&self) -> Vec<&WeekRecord> {
        let mut years: Vec<_> = self.weeks.iter().collect();
        years.sort_by(|a, b| calendar::numeric_cmp(a.0, b.0));

        let mut out = Vec::new();
        for (_, weeks) in years {
            let mut weeks: Vec<_> = weeks.iter().collect();
            weeks.sort_by(|a, b| calendar::numeric_cmp(a.0, b.0));
            out.extend(weeks.into_iter().map(|(_, record)| record));
        }
        out
    }

    /// Short plain-text overview, one block per week.
    pub fn render_text_report(&self) -> String {
        let t = &self.config.translator;
        let mut out = String::new();

        for week in self.sorted_weeks() {
            out.push_str(&"=".repeat(TEXT_REPORT_RULE_WIDTH));
            out.push('\n');
            out.push_str(&format!(
                "{} {} {} - {} {}\n",
                t.get("calendarweek"),
                week.week,
                week.first_day.format("%d.%m.%Y"),
                week.last_day.format("%d.%m.%Y"),
                week.icon()
            ));

            for day in week.days.values() {
                let mut status_text = String::new();
                if let Some(note) = &day.special_note {
                    status_text.push_str(&rst_quote(t.get("Info"), note));
                }
                match day.has_been_sent(t) {
                    Some(sent) => status_text.push_str(&sent),
                    None => status_text.push_str(t.get("unsent")),
                }

                out.push_str(&format!(
                    "{} {}  {}\n",
                    day.filepath.display(),
                    day.status.unwrap_or_else(|| day.classify()),
                    day.error_text(t, &status_text)
                ));
            }
        }
        out
    }

    /// Rewrite the report directory with the planned and history documents.
    ///
    /// A week counts as history once it lies before the current ISO week,
    /// or is the current week and no active weekday remains in it.
    pub fn render_document(&self) -> Result<ReportPaths> {
        let t = &self.config.translator;
        let dir = &self.config.report_dir;
        files::remove_dir(dir);
        files::ensure_dir(dir)?;

        let mut planned = self.rst_legend(t.get("Future & Active calendar weeks"), false);
        let mut history = self.rst_legend(t.get("Past calendar weeks"), true);
        let (mut planned_weeks, mut history_weeks) = (0usize, 0usize);

        for week in self.sorted_weeks() {
            if self.is_history(week) {
                history.push_str(&self.rst_week(week));
                history_weeks += 1;
            } else {
                planned.push_str(&self.rst_week(week));
                planned_weeks += 1;
            }
        }

        let paths = ReportPaths {
            planned: dir.join(PLANNED_REPORT_FILE),
            history: dir.join(HISTORY_REPORT_FILE),
        };
        files::write_text(&paths.planned, &planned)?;
        files::write_text(&paths.history, &history)?;

        info!(
            dir = %dir.display(),
            planned_weeks,
            history_weeks,
            "report written"
        );
        Ok(paths)
    }

    fn is_history(&self, week: &WeekRecord) -> bool {
        let (year, current) = self.current_key();
        let (Some(key), Some(today)) = (week.key(), calendar::week_key(&year, &current)) else {
            return false;
        };
        key < today || (key == today && !self.has_active_days_left())
    }

    fn rst_legend(&self, header: &str, history: bool) -> String {
        let t = &self.config.translator;
        let (ok, warn, fail) = if history {
            ("Message was sent", "Message was not sent", "Message was not sent")
        } else {
            (
                "Planned message can be sent",
                "Planned message is empty",
                "Planned message cant be sent",
            )
        };
        let legend = format!(
            ":{SYMBOL_OK}: {}\n:{SYMBOL_WARN}: {}\n:{SYMBOL_FAIL}: {}",
            t.get(ok),
            t.get(warn),
            t.get(fail)
        );

        let mut out = rst_header(header, false, '=');
        out.push_str(&rst_quote(t.get("Legend"), &legend));
        out
    }

    fn rst_week(&self, week: &WeekRecord) -> String {
        let t = &self.config.translator;
        let title = format!("{} {} {}", t.get("calendarweek"), week.week, week.icon());
        let mut out = rst_header(&title, true, '=');

        for (&num, day) in &week.days {
            let day_title = format!(
                "{}, {} {}",
                self.config.weekday_name(num),
                day.date.format("%d.%m.%Y"),
                day.status.unwrap_or_else(|| day.classify())
            );
            out.push_str(&rst_header(&day_title, false, '^'));

            if let Some(note) = &day.special_note {
                out.push_str(&rst_quote(t.get("Info"), note));
            }
            if day.message_length == 0 {
                out.push_str(&rst_quote(t.get("Info"), t.get("message empty")));
                continue;
            }
            if day.length_exceeded {
                out.push_str(&rst_quote(t.get("Error"), t.get("message too long")));
            }
            if let Some(sent) = day.has_been_sent(t) {
                out.push_str(&rst_quote(t.get("Info"), &sent));
            }
            if let Some(stopped) = day.has_been_stopped(t) {
                out.push_str(&rst_quote(t.get("Info"), &stopped));
            }
            out.push_str(&rst_quote("", &day.message));
        }
        out
    }
}

/// Section title with a rule one character longer than the title below it,
/// and above it too when `doubled`.
pub fn rst_header(title: &str, doubled: bool, ch: char) -> String {
    let rule: String = std::iter::repeat(ch)
        .take(title.chars().count() + 1)
        .collect();
    let mut out = String::new();
    if doubled {
        out.push_str(&rule);
        out.push('\n');
    }
    out.push_str(title);
    out.push('\n');
    out.push_str(&rule);
    out.push_str("\n\n");
    out
}

/// `:label:` field followed by each line of `message`, trimmed and indented.
pub fn rst_quote(label: &str, message: &str) -> String {
    let mut out = format!(":{label}:\n\n");
    for line in message.split('\n') {
        out.push_str("    ");
        out.push_str(line.trim());
        out.push('\n');
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::models::DayRecord;
    use crate::test_support::{engine_at, engine_with, write_day, RecordingNotifier};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rst_header() {
        assert_eq!(rst_header("abc", false, '^'), "abc\n^^^^\n\n");
        assert_eq!(rst_header("abc", true, '='), "====\nabc\n====\n\n");
        // Rule length follows characters, not bytes.
        assert_eq!(rst_header("Über", false, '-'), "Über\n-----\n\n");
    }

    #[test]
    fn test_rst_quote() {
        assert_eq!(rst_quote("Info", "  a \nb"), ":Info:\n\n    a\n    b\n\n");
        assert_eq!(rst_quote("", "Soup"), "::\n\n    Soup\n\n");
    }

    #[test]
    fn test_planned_legend() {
        let dir = TempDir::new().unwrap();
        let (engine, _) = engine_at(dir.path(), 2021, 10, 18);
        let header = "Future & Active calendar weeks";

        let expected = format!(
            "{header}\n{rule}\n\n:Legend:\n\n    :✅: Planned message can be sent\n    \
             :❎: Planned message is empty\n    :❌: Planned message cant be sent\n\n",
            rule = "=".repeat(header.chars().count() + 1)
        );
        assert_eq!(engine.rst_legend(header, false), expected);
    }

    #[test]
    fn test_history_legend_wording() {
        let dir = TempDir::new().unwrap();
        let (engine, _) = engine_at(dir.path(), 2021, 10, 18);
        let legend = engine.rst_legend("Past calendar weeks", true);

        assert!(legend.contains("    :✅: Message was sent\n"));
        assert!(legend.contains("    :❎: Message was not sent\n"));
        assert!(legend.contains("    :❌: Message was not sent\n"));
    }

    fn week_of(days: &[(u8, &str)]) -> WeekRecord {
        let mut week = WeekRecord::new("2021", "42").unwrap();
        for &(num, text) in days {
            let date = calendar::date_in_week(week.first_day, num);
            week.days.insert(
                num,
                DayRecord::from_text(format!("/data/2021/42/{num}.txt"), date, text),
            );
        }
        week.aggregate_status();
        week
    }

    #[test]
    fn test_week_block_markup() {
        let dir = TempDir::new().unwrap();
        let (engine, _) = engine_at(dir.path(), 2021, 10, 18);
        let week = week_of(&[(0, "Soup")]);

        let title = "calendarweek 42 ✅";
        let day_title = "Monday, 18.10.2021 ✅";
        let expected = format!(
            "{wrule}\n{title}\n{wrule}\n\n{day_title}\n{drule}\n\n::\n\n    Soup\n\n",
            wrule = "=".repeat(title.chars().count() + 1),
            drule = "^".repeat(day_title.chars().count() + 1),
        );
        assert_eq!(engine.rst_week(&week), expected);
    }

    #[test]
    fn test_week_block_empty_and_too_long_days() {
        let dir = TempDir::new().unwrap();
        let (engine, _) = engine_at(dir.path(), 2021, 10, 18);
        let long = "x".repeat(281);
        let week = week_of(&[(0, ""), (1, &long)]);

        let block = engine.rst_week(&week);
        assert!(block.starts_with(&format!("{}\ncalendarweek 42 ❎\n", "=".repeat(18))));
        assert!(block.contains("Monday, 18.10.2021 ❎\n"));
        assert!(block.contains(":Info:\n\n    message empty\n\n"));
        assert!(block.contains("Tuesday, 19.10.2021 ❌\n"));
        assert!(block.contains(":Error:\n\n    message too long\n\n"));
        // The empty day gets no message block; the long one still does.
        assert_eq!(block.matches("::\n\n").count(), 1);
    }

    #[test]
    fn test_week_block_sent_stopped_and_special_day() {
        let dir = TempDir::new().unwrap();
        let (engine, _) = engine_at(dir.path(), 2021, 10, 18);
        let mut week = week_of(&[(0, "Soup")]);
        let translator = mealday_shared::Translator::default();
        let now = NaiveDate::from_ymd_opt(2021, 10, 18)
            .unwrap()
            .and_hms_opt(11, 30, 0)
            .unwrap();
        let day = week.days.get_mut(&0).unwrap();
        day.special_note = Some("Staff outing".to_string());
        day.append_log(true, false, now, &translator);
        day.append_log(true, true, now, &translator);

        let block = engine.rst_week(&week);
        let note = block.find(":Info:\n\n    Staff outing\n").unwrap();
        let sent = block.find("    sent at -> 2021-10-18 11:30\n").unwrap();
        let stopped = block.find("    stopped at -> 2021-10-18 11:30\n").unwrap();
        let message = block.find("::\n\n    Soup\n").unwrap();
        assert!(note < sent && sent < stopped && stopped < message);
    }

    #[test]
    fn test_sorted_weeks_is_numeric() {
        let dir = TempDir::new().unwrap();
        let (mut engine, _) = engine_at(dir.path(), 2021, 10, 18);
        write_day(dir.path(), "2021", "9", "0_Monday.txt", "Soup");
        write_day(dir.path(), "2020", "53", "0_Monday.txt", "Soup");
        engine.init().unwrap();

        let order: Vec<_> = engine
            .sorted_weeks()
            .iter()
            .map(|w| format!("{}/{}", w.year, w.week))
            .collect();
        assert_eq!(order, ["2020/53", "2021/9", "2021/42", "2021/43"]);
    }

    #[test]
    fn test_text_report() {
        let dir = TempDir::new().unwrap();
        let (mut engine, _) = engine_at(dir.path(), 2021, 10, 18);
        write_day(dir.path(), "2021", "42", "0_Monday.txt", "Soup of the day");
        engine.init().unwrap();

        let report = engine.render_text_report();
        let mut lines = report.lines();
        assert_eq!(lines.next(), Some("=".repeat(44).as_str()));
        assert_eq!(
            lines.next(),
            Some("calendarweek 42 18.10.2021 - 24.10.2021 ❎")
        );

        let monday = dir.path().join("2021/42/0_Monday.txt");
        assert_eq!(
            lines.next().map(str::to_string),
            Some(format!("{} ✅  unsent", monday.display()))
        );
        let tuesday = dir.path().join("2021/42/1_Tuesday.txt");
        assert_eq!(
            lines.next().map(str::to_string),
            Some(format!("{} ❎  message empty", tuesday.display()))
        );
    }

    #[test]
    fn test_render_document_routes_weeks() {
        let data = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let config = EngineConfig::new(data.path(), out.path().join("report"));
        // Wednesday of week 42: active days remain.
        let (mut engine, _) = engine_with(config, RecordingNotifier::default(), 2021, 10, 20);
        write_day(data.path(), "2021", "41", "0_Monday.txt", "Old soup");
        write_day(data.path(), "2020", "50", "0_Monday.txt", "Older soup");
        engine.init().unwrap();

        let paths = engine.render_document().unwrap();
        let planned = fs::read_to_string(&paths.planned).unwrap();
        let history = fs::read_to_string(&paths.history).unwrap();

        assert!(planned.starts_with("Future & Active calendar weeks\n"));
        assert!(history.starts_with("Past calendar weeks\n"));
        assert!(planned.contains("\ncalendarweek 42 "));
        assert!(planned.contains("\ncalendarweek 43 "));
        assert!(history.contains("\ncalendarweek 41 "));
        assert!(history.contains("\ncalendarweek 50 "));
        assert!(!planned.contains("calendarweek 41 "));
        assert!(!history.contains("calendarweek 42 "));
    }

    #[test]
    fn test_render_document_current_week_is_history_on_weekend() {
        let data = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let config = EngineConfig::new(data.path(), out.path().join("report"));
        let (mut engine, _) = engine_with(config, RecordingNotifier::default(), 2021, 10, 23);
        write_day(data.path(), "2021", "42", "4_Friday.txt", "Fish");
        engine.init().unwrap();

        let paths = engine.render_document().unwrap();
        let history = fs::read_to_string(&paths.history).unwrap();
        let planned = fs::read_to_string(&paths.planned).unwrap();
        assert!(history.contains("\ncalendarweek 42 "));
        assert!(planned.contains("\ncalendarweek 43 "));
    }

    #[test]
    fn test_render_document_clears_stale_output() {
        let data = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let report_dir = out.path().join("report");
        fs::create_dir_all(&report_dir).unwrap();
        fs::write(report_dir.join("stale.rst"), "old").unwrap();

        let config = EngineConfig::new(data.path(), &report_dir);
        let (mut engine, _) = engine_with(config, RecordingNotifier::default(), 2021, 10, 18);
        engine.init().unwrap();
        engine.render_document().unwrap();

        assert!(!report_dir.join("stale.rst").exists());
        assert!(report_dir.join(PLANNED_REPORT_FILE).is_file());
        assert!(report_dir.join(HISTORY_REPORT_FILE).is_file());
    }
}
