//! Issue-day tally: sums the numeric article scores per publication date.
//!
//! Unlike the daily rollup, which counts flags, this pass adds up the values
//! the analysis model assigned to each article (messaging scores, mention
//! counts, propaganda and pro-protest counts) for every `date_of_news_issue`.

use super::{Aggregator, PassStats, aggregate_records};
use crate::dates::date_key;
use crate::models::{AnalysisRecord, IssueDayRecord, MentionCounts, non_empty, to_integer};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Default)]
pub struct IssueDayTally {
    days: BTreeMap<String, IssueDayRecord>,
    normalize_dates: bool,
}

impl IssueDayTally {
    pub fn new(normalize_dates: bool) -> Self {
        Self {
            days: BTreeMap::new(),
            normalize_dates,
        }
    }
}

impl Aggregator for IssueDayTally {
    type Record = AnalysisRecord;
    type Output = IssueDayRecord;

    const NAME: &'static str = "tally";

    fn fold(&mut self, line: usize, record: AnalysisRecord, stats: &mut PassStats) {
        let Some(date) = non_empty(record.date_of_news_issue) else {
            stats.skipped += 1;
            return;
        };
        let date = date_key(date, self.normalize_dates);
        let day = self
            .days
            .entry(date.clone())
            .or_insert_with(|| IssueDayRecord::empty(date));
        day.articles += 1;

        let mut add = |sum: &mut i64, raw: Option<Value>, field: &'static str| {
            let Some(raw) = raw else {
                return;
            };
            match to_integer(&raw) {
                Some(n) => *sum = sum.saturating_add(n),
                None => {
                    stats.invalid_values += 1;
                    warn!(line, field, value = %raw, "Invalid score; not added");
                }
            }
        };

        add(&mut day.state_driven_messaging, record.state_driven_messaging, "state_driven_messaging");
        add(&mut day.pro_student_messaging, record.pro_student_messaging, "pro_student_messaging");
        add(&mut day.propaganda_count, record.propaganda_count, "propaganda_count");
        add(&mut day.pro_protest_count, record.pro_protest_count, "pro_protest_count");

        let students = record.student_mentions.unwrap_or_default();
        add(&mut day.student_mentions.good_count, students.good_count, "student_mentions.good_count");
        add(&mut day.student_mentions.bad_count, students.bad_count, "student_mentions.bad_count");

        let MentionCounts { good_count, bad_count } = record.state_mentions.unwrap_or_default();
        add(&mut day.state_mentions.good_count, good_count, "state_mentions.good_count");
        add(&mut day.state_mentions.bad_count, bad_count, "state_mentions.bad_count");

        stats.folded += 1;
    }

    fn finish(self) -> Vec<IssueDayRecord> {
        self.days.into_values().collect()
    }
}

/// Sum decoded records into one [`IssueDayRecord`] per publication date.
pub fn tally_issue_days<I>(records: I) -> Vec<IssueDayRecord>
where
    I: IntoIterator<Item = AnalysisRecord>,
{
    aggregate_records(IssueDayTally::default(), records)
}
