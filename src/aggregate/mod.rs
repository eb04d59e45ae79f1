//! Streaming aggregation passes over JSON Lines analysis files.
//!
//! Each pass folds a stream of per-article records into a keyed in-memory
//! map and emits one JSON object per key, sorted by key:
//!
//! | Pass | Module | Input | Key | Output |
//! |------|--------|-------|-----|--------|
//! | Protest deduplication | [`protests`] | `AnalysisRecord` | `(date, location)` | `ProtestRecord` |
//! | Daily rollup | [`daily`] | `ExtendedAnalysisRecord` | `publish_date` | `DailyRecord` |
//! | Issue-day tally | [`tally`] | `AnalysisRecord` | `date_of_news_issue` | `IssueDayRecord` |
//!
//! Record-level problems are logged and counted in [`PassStats`]; only file
//! level failures surface as [`AggregateError`].

pub mod daily;
pub mod protests;
pub mod tally;

use crate::error::{AggregateError, Result};
use crate::utils::{ensure_writable_dir, truncate_for_log};
use itertools::Itertools;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};

pub use daily::{DailyAggregator, aggregate_daily};
pub use protests::{ProtestDeduplicator, deduplicate};
pub use tally::{IssueDayTally, tally_issue_days};

/// A single keyed fold over one record stream.
///
/// Implementors own their accumulator; one value lives for exactly one pass.
pub trait Aggregator {
    /// The per-line input record.
    type Record: DeserializeOwned;
    /// The per-key output record.
    type Output: Serialize;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Fold one decoded record. `line` is 1-based and only used for logging.
    fn fold(&mut self, line: usize, record: Self::Record, stats: &mut PassStats);

    /// Consume the accumulator, yielding outputs sorted by key.
    fn finish(self) -> Vec<Self::Output>;
}

/// Bookkeeping for one pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassStats {
    /// Non-blank lines seen.
    pub lines: usize,
    /// Lines that failed to decode.
    pub malformed: usize,
    /// Decoded records that did not qualify for the pass (missing key, no mention).
    pub skipped: usize,
    /// Individual field values that failed integer conversion.
    pub invalid_values: usize,
    /// Records that contributed to the output.
    pub folded: usize,
    /// Output records written.
    pub emitted: usize,
}

/// Decode one raw line and fold it. Blank lines are ignored.
pub fn ingest_line<A: Aggregator>(agg: &mut A, line_no: usize, raw: &str, stats: &mut PassStats) {
    let line = raw.trim();
    if line.is_empty() {
        debug!(line = line_no, "Skipping blank line");
        return;
    }
    stats.lines += 1;

    match serde_json::from_str::<A::Record>(line) {
        Ok(record) => agg.fold(line_no, record, stats),
        Err(e) => {
            stats.malformed += 1;
            warn!(
                pass = A::NAME,
                line = line_no,
                error = %e,
                preview = %truncate_for_log(line, 120),
                "Skipping invalid JSON line"
            );
        }
    }
}

/// Run an aggregator over in-memory JSON Lines text.
pub fn aggregate_str<A: Aggregator>(mut agg: A, text: &str) -> (Vec<A::Output>, PassStats) {
    let mut stats = PassStats::default();
    for (i, line) in text.lines().enumerate() {
        ingest_line(&mut agg, i + 1, line, &mut stats);
    }
    let out = agg.finish();
    stats.emitted = out.len();
    (out, stats)
}

/// Run an aggregator over already decoded records.
pub fn aggregate_records<A, I>(mut agg: A, records: I) -> Vec<A::Output>
where
    A: Aggregator,
    I: IntoIterator<Item = A::Record>,
{
    let mut stats = PassStats::default();
    for (i, record) in records.into_iter().enumerate() {
        stats.lines += 1;
        agg.fold(i + 1, record, &mut stats);
    }
    agg.finish()
}

/// Encode records as JSON Lines: one compact object per line, each line
/// terminated by `\n`. No records means an empty string.
pub fn encode_jsonl<T: Serialize>(records: &[T]) -> Result<String> {
    let body = records
        .iter()
        .map(serde_json::to_string)
        .process_results(|mut lines| lines.join("\n"))?;
    Ok(if body.is_empty() { body } else { body + "\n" })
}

/// Run one full pass: stream `input`, fold every line, write `output`.
///
/// Lines are read as raw bytes; a line that is not valid UTF-8 counts as
/// malformed like any other undecodable line.
///
/// # Arguments
///
/// * `agg` - A fresh accumulator for this pass
/// * `input` - JSON Lines file to read
/// * `output` - File to (over)write; its parent directory is created
///
/// # Returns
///
/// The [`PassStats`] ledger for the pass.
///
/// # Errors
///
/// A missing or unreadable input file, an unusable output directory or a
/// failed write abort the pass. Malformed lines and bad values never do.
#[instrument(level = "info", skip_all, fields(pass = A::NAME, input = %input.display(), output = %output.display()))]
pub async fn run_pass<A: Aggregator>(mut agg: A, input: &Path, output: &Path) -> Result<PassStats> {
    let file = File::open(input)
        .await
        .map_err(|e| AggregateError::from_input(input, e))?;

    let out_dir = output.parent().unwrap_or_else(|| Path::new(""));
    ensure_writable_dir(out_dir)
        .await
        .map_err(|source| AggregateError::OutputDir {
            path: out_dir.to_path_buf(),
            source,
        })?;

    let mut stats = PassStats::default();
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| AggregateError::from_input(input, e))?;
        if read == 0 {
            break;
        }
        line_no += 1;
        match std::str::from_utf8(&buf) {
            Ok(line) => ingest_line(&mut agg, line_no, line, &mut stats),
            Err(e) => {
                stats.lines += 1;
                stats.malformed += 1;
                warn!(
                    pass = A::NAME,
                    line = line_no,
                    error = %e,
                    preview = %truncate_for_log(&String::from_utf8_lossy(&buf), 120),
                    "Skipping line that is not valid UTF-8"
                );
            }
        }
    }

    let records = agg.finish();
    stats.emitted = records.len();
    let body = encode_jsonl(&records)?;
    tokio::fs::write(output, body)
        .await
        .map_err(|source| AggregateError::Write {
            path: output.to_path_buf(),
            source,
        })?;

    info!(
        lines = stats.lines,
        malformed = stats.malformed,
        skipped = stats.skipped,
        invalid_values = stats.invalid_values,
        folded = stats.folded,
        emitted = stats.emitted,
        "Pass complete"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyRecord;

    const DAILY_INPUT: &str = r#"{"publish_date": "2024-01-15", "source_type": "government", "analysis": {"is_propaganda": true}}
{"publish_date": "2024-01-16", "source_type": "government", "analysis": {"is_propaganda": true}}
"#;

    #[test]
    fn test_encode_jsonl_empty() {
        let records: Vec<DailyRecord> = vec![];
        assert_eq!(encode_jsonl(&records).unwrap(), "");
    }

    #[test]
    fn test_encode_jsonl_terminates_every_line() {
        let records = vec![
            DailyRecord::empty("2024-01-15".into()),
            DailyRecord::empty("2024-01-16".into()),
        ];
        let body = encode_jsonl(&records).unwrap();
        assert_eq!(body.lines().count(), 2);
        assert!(body.ends_with("}\n"));
    }

    #[test]
    fn test_blank_lines_are_not_counted() {
        let text = "\n   \n{\"publish_date\": \"2024-01-15\"}\n\n";
        let (out, stats) = aggregate_str(DailyAggregator::default(), text);
        assert_eq!(out.len(), 1);
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.malformed, 0);
    }

    #[tokio::test]
    async fn test_run_pass_writes_output_and_creates_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("daily_input.jsonl");
        let output = tmp.path().join("nested").join("out").join("daily.jsonl");
        tokio::fs::write(&input, DAILY_INPUT).await.unwrap();

        let stats = run_pass(DailyAggregator::default(), &input, &output)
            .await
            .unwrap();
        assert_eq!(stats.folded, 2);
        assert_eq!(stats.emitted, 2);

        let written = tokio::fs::read_to_string(&output).await.unwrap();
        let dates: Vec<String> = written
            .lines()
            .map(|l| serde_json::from_str::<DailyRecord>(l).unwrap().date)
            .collect();
        assert_eq!(dates, vec!["2024-01-15", "2024-01-16"]);
    }

    #[tokio::test]
    async fn test_run_pass_skips_invalid_utf8_line() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("analyses.jsonl");
        let output = tmp.path().join("protests.jsonl");
        let mut body = br#"{"analysis": {"mentions_protest": true, "protest_info": {"date": "2024-03-15", "location": "Novi Sad"}}}"#.to_vec();
        body.extend_from_slice(b"\n\xff\xfe garbage\n");
        body.extend_from_slice(br#"{"analysis": {"mentions_protest": true, "protest_info": {"date": "2024-03-16", "location": "Kragujevac"}}}"#);
        body.push(b'\n');
        tokio::fs::write(&input, body).await.unwrap();

        let stats = run_pass(ProtestDeduplicator::default(), &input, &output)
            .await
            .unwrap();
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.folded, 2);
        assert_eq!(stats.emitted, 2);
        let written = tokio::fs::read_to_string(&output).await.unwrap();
        assert_eq!(written.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_run_pass_handles_crlf_and_missing_final_newline() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("daily_input.jsonl");
        let output = tmp.path().join("daily.jsonl");
        tokio::fs::write(
            &input,
            "{\"publish_date\": \"2024-01-15\"}\r\n{\"publish_date\": \"2024-01-16\"}",
        )
        .await
        .unwrap();

        let stats = run_pass(DailyAggregator::default(), &input, &output)
            .await
            .unwrap();
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.malformed, 0);
        assert_eq!(stats.emitted, 2);
    }

    #[tokio::test]
    async fn test_run_pass_missing_input_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("does_not_exist.jsonl");
        let output = tmp.path().join("out.jsonl");

        let err = run_pass(DailyAggregator::default(), &input, &output)
            .await
            .unwrap_err();
        assert!(matches!(err, AggregateError::InputNotFound(_)));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_run_pass_output_dir_blocked_by_file() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("daily_input.jsonl");
        tokio::fs::write(&input, DAILY_INPUT).await.unwrap();
        let blocker = tmp.path().join("blocker");
        tokio::fs::write(&blocker, "not a directory").await.unwrap();
        let output = blocker.join("daily.jsonl");

        let err = run_pass(DailyAggregator::default(), &input, &output)
            .await
            .unwrap_err();
        assert!(matches!(err, AggregateError::OutputDir { .. }));
    }
}
