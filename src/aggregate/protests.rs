//! Protest deduplication.
//!
//! Many articles describe the same demonstration. This pass collapses every
//! protest mention into one [`ProtestRecord`] per `(date, location)` key.
//!
//! # Merge Policy
//!
//! First write wins, field by field. The organizer and each crowd estimate
//! are taken from the first record that supplies a usable value for that
//! specific field and are never overwritten afterward. A crowd estimate that
//! fails integer conversion leaves its slot open for a later record.
//!
//! Coordinates follow the same rule as a pair. Each mention offers the
//! position of its location from [`crate::geo`], or failing that the `x`/`y`
//! it carries itself; the first mention offering a position sets it.

use super::{Aggregator, PassStats, aggregate_records};
use crate::dates::date_key;
use crate::geo;
use crate::models::{AnalysisRecord, ProtestRecord, non_empty, to_integer};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Accumulator for the protest deduplication pass.
#[derive(Debug, Default)]
pub struct ProtestDeduplicator {
    protests: BTreeMap<(String, String), ProtestRecord>,
    normalize_dates: bool,
}

impl ProtestDeduplicator {
    /// Create an empty deduplicator.
    ///
    /// # Arguments
    ///
    /// * `normalize_dates` - Rewrite `D.M.YYYY.` dates to ISO before keying,
    ///   so both spellings of a day merge into one protest
    pub fn new(normalize_dates: bool) -> Self {
        Self {
            protests: BTreeMap::new(),
            normalize_dates,
        }
    }
}

impl Aggregator for ProtestDeduplicator {
    type Record = AnalysisRecord;
    type Output = ProtestRecord;

    const NAME: &'static str = "protests";

    fn fold(&mut self, line: usize, record: AnalysisRecord, stats: &mut PassStats) {
        let analysis = record.analysis.unwrap_or_default();
        if !analysis.mentions_protest {
            stats.skipped += 1;
            return;
        }

        let info = analysis.protest_info.unwrap_or_default();
        let (Some(date), Some(location)) = (non_empty(info.date), non_empty(info.location)) else {
            debug!(line, "Protest mention without date or location; skipping");
            stats.skipped += 1;
            return;
        };
        let date = date_key(date, self.normalize_dates);

        let protest = self
            .protests
            .entry((date.clone(), location.clone()))
            .or_insert_with(|| ProtestRecord::new(date, location));

        if protest.organizer.is_none() {
            protest.organizer = non_empty(info.organizer);
        }

        if !protest.is_located() {
            let supplied = info.x.zip(info.y).map(|(x, y)| geo::Coordinates { x, y });
            if let Some(at) = geo::lookup(&protest.location).or(supplied) {
                protest.x = Some(at.x);
                protest.y = Some(at.y);
            }
        }

        let count = info.count.unwrap_or_default();
        fill_once(&mut protest.count.government, count.government, "government", line, stats);
        fill_once(&mut protest.count.independent, count.independent, "independent", line, stats);

        stats.folded += 1;
    }

    fn finish(self) -> Vec<ProtestRecord> {
        self.protests.into_values().collect()
    }
}

/// Set `slot` from `raw` unless it is already set or `raw` is null.
fn fill_once(
    slot: &mut Option<i64>,
    raw: Option<Value>,
    field: &'static str,
    line: usize,
    stats: &mut PassStats,
) {
    if slot.is_some() {
        return;
    }
    let Some(raw) = raw else {
        return;
    };
    match to_integer(&raw) {
        Some(n) => *slot = Some(n),
        None => {
            stats.invalid_values += 1;
            warn!(line, field, value = %raw, "Invalid head count; leaving it unset");
        }
    }
}

/// Deduplicate decoded analysis records into one record per protest.
///
/// # Arguments
///
/// * `records` - Decoded analyses in input order; order decides which value
///   wins each field
///
/// # Returns
///
/// One [`ProtestRecord`] per distinct `(date, location)`, sorted by that key.
/// Dates are used verbatim.
pub fn deduplicate<I>(records: I) -> Vec<ProtestRecord>
where
    I: IntoIterator<Item = AnalysisRecord>,
{
    aggregate_records(ProtestDeduplicator::default(), records)
}
