//! Posting today's message and the sold-out notice, with log recording.

use std::path::Path;

use mealday_shared::constants::LOG_FILE_NAME;
use tracing::info;

use crate::calendar;
use crate::engine::ScheduleEngine;
use crate::error::Result;
use crate::files;
use crate::models::WeekRecord;

/// Translation key of the fixed stop message.
pub const SOLD_OUT_MESSAGE: &str = "Meal of the day is sold-out!";

impl ScheduleEngine {
    /// Today's message is sendable and was neither sent nor stopped.
    pub fn should_show_send_prompt(&mut self) -> Result<bool> {
        self.init()?;
        let translator = &self.config.translator;
        Ok(self.today_record().is_some_and(|day| {
            day.sendable
                && day.has_been_sent(translator).is_none()
                && day.has_been_stopped(translator).is_none()
        }))
    }

    /// Today's message was sent and not yet stopped.
    pub fn should_show_stop_prompt(&mut self) -> Result<bool> {
        self.init()?;
        let translator = &self.config.translator;
        Ok(self.today_record().is_some_and(|day| {
            day.has_been_sent(translator).is_some() && day.has_been_stopped(translator).is_none()
        }))
    }

    /// Post today's message.
    ///
    /// Returns `false` without side effects if there is no message for today
    /// or it was already sent.  A message that cannot be sent is not posted,
    /// but the attempt and its reason are still logged.  A failed post is
    /// returned as an error and leaves the log untouched.
    pub fn dispatch_today(&mut self) -> Result<bool> {
        self.init()?;
        let num = calendar::weekday_num(self.today);
        let now = self.clock.now();

        let translator = &self.config.translator;
        let notifier = &self.notifier;
        let data_root = &self.config.data_root;
        let (year, week_name) = calendar::iso_year_week(self.today);
        let Some(week) = self
            .weeks
            .get_mut(&year)
            .and_then(|weeks| weeks.get_mut(&week_name))
        else {
            info!(%year, week = %week_name, "no week directory for today");
            return Ok(false);
        };
        let Some(day) = week.days.get_mut(&num) else {
            info!(weekday = num, "no message file for today");
            return Ok(false);
        };

        if let Some(sent) = day.has_been_sent(translator) {
            info!(path = %day.filepath.display(), %sent, "message already sent");
            return Ok(false);
        }

        let sent = if day.sendable {
            let posted = notifier.post(&day.message)?;
            info!(path = %day.filepath.display(), id = %posted.id, "message posted");
            true
        } else {
            info!(
                path = %day.filepath.display(),
                reason = day.error_text(translator, ""),
                "message not sendable"
            );
            false
        };

        day.append_log(sent, false, now, translator);
        write_week_log(data_root, week)?;
        Ok(sent)
    }

    /// Post the sold-out notice for a message that was sent today.
    ///
    /// Returns `false` without side effects unless today's message was sent
    /// and not yet stopped.
    pub fn dispatch_stop(&mut self) -> Result<bool> {
        self.init()?;
        let num = calendar::weekday_num(self.today);
        let now = self.clock.now();

        let translator = &self.config.translator;
        let notifier = &self.notifier;
        let data_root = &self.config.data_root;
        let (year, week_name) = calendar::iso_year_week(self.today);
        let Some(week) = self
            .weeks
            .get_mut(&year)
            .and_then(|weeks| weeks.get_mut(&week_name))
        else {
            return Ok(false);
        };
        let Some(day) = week.days.get_mut(&num) else {
            return Ok(false);
        };

        if day.has_been_sent(translator).is_none() || day.has_been_stopped(translator).is_some() {
            info!(path = %day.filepath.display(), "nothing to stop");
            return Ok(false);
        }

        let posted = notifier.post(translator.get(SOLD_OUT_MESSAGE))?;
        info!(path = %day.filepath.display(), id = %posted.id, "sold-out notice posted");

        day.append_log(true, true, now, translator);
        write_week_log(data_root, week)?;
        Ok(true)
    }

    /// Write `week`'s log to `<data_root>/<year>/<week>/log.json`.
    pub fn persist_week_log(&self, week: &WeekRecord) -> Result<()> {
        write_week_log(&self.config.data_root, week)
    }
}

fn write_week_log(data_root: &Path, week: &WeekRecord) -> Result<()> {
    let path = data_root
        .join(&week.year)
        .join(&week.week)
        .join(LOG_FILE_NAME);
    let snapshot = week.log_snapshot();
    files::write_json_atomic(&path, &snapshot)?;
    info!(path = %path.display(), days = snapshot.len(), "week log written");
    Ok(())
}
