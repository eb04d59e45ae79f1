//! Per-day rollup of student sentiment, propaganda and protest flags.

use super::{Aggregator, PassStats, aggregate_records};
use crate::dates::date_key;
use crate::models::{DailyRecord, ExtendedAnalysisRecord, Sentiment, SourceType, non_empty};
use std::collections::BTreeMap;
use tracing::debug;

/// Accumulator for the daily rollup pass. Days are created lazily with all
/// counters at zero the first time their date is seen.
#[derive(Debug, Default)]
pub struct DailyAggregator {
    days: BTreeMap<String, DailyRecord>,
    normalize_dates: bool,
}

impl DailyAggregator {
    pub fn new(normalize_dates: bool) -> Self {
        Self {
            days: BTreeMap::new(),
            normalize_dates,
        }
    }
}

impl Aggregator for DailyAggregator {
    type Record = ExtendedAnalysisRecord;
    type Output = DailyRecord;

    const NAME: &'static str = "daily";

    fn fold(&mut self, line: usize, record: ExtendedAnalysisRecord, stats: &mut PassStats) {
        let Some(date) = non_empty(record.publish_date) else {
            stats.skipped += 1;
            return;
        };
        let date = date_key(date, self.normalize_dates);
        let day = self
            .days
            .entry(date.clone())
            .or_insert_with(|| DailyRecord::empty(date));
        let flags = record.analysis.unwrap_or_default();

        if flags.mentions_students {
            let source = record.source_type.as_deref().and_then(SourceType::from_label);
            let sentiment = flags
                .student_mention_sentiment
                .as_deref()
                .and_then(Sentiment::from_label);
            match (source, sentiment) {
                (Some(source), Some(sentiment)) => day.student_mentions.bump(source, sentiment),
                _ => debug!(
                    line,
                    source_type = ?record.source_type,
                    sentiment = ?flags.student_mention_sentiment,
                    "Student mention not attributable; not counted"
                ),
            }
        }
        if flags.is_propaganda {
            day.state_driven_messaging += 1;
        }
        if flags.mentions_protest {
            day.protest_count += 1;
        }

        stats.folded += 1;
    }

    fn finish(self) -> Vec<DailyRecord> {
        self.days.into_values().collect()
    }
}

/// Roll decoded records up into one [`DailyRecord`] per date, ascending.
pub fn aggregate_daily<I>(records: I) -> Vec<DailyRecord>
where
    I: IntoIterator<Item = ExtendedAnalysisRecord>,
{
    aggregate_records(DailyAggregator::default(), records)
}
