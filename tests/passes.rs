// tests/passes.rs
use protest_digest::models::{DailyRecord, ProtestRecord};
use protest_digest::{
    AggregateError, DailyAggregator, IssueDayTally, PassStats, ProtestDeduplicator, run_pass,
};
use std::path::Path;

const ANALYSES: &str = r#"{"analysis": {"mentions_protest": true, "protest_info": {"organizer": "Students Union", "date": "2024-03-15", "location": "Capital City", "count": {"government": 5000, "independent": null}}}, "source": "State News Agency", "date_of_news_issue": "2024-03-16", "state_driven_messaging": 4, "pro_student_messaging": 1, "student_mentions": {"good_count": 1, "bad_count": 5}, "state_mentions": {"good_count": 6, "bad_count": 0}}
{"analysis": {"mentions_protest": true, "protest_info": {"organizer": null, "date": "2024-03-15", "location": "Capital City", "count": {"government": null, "independent": 8000}}}, "source": "Independent Observer", "date_of_news_issue": "2024-03-16", "state_driven_messaging": 1, "pro_student_messaging": 4, "student_mentions": {"good_count": 7, "bad_count": 1}, "state_mentions": {"good_count": 1, "bad_count": 2}}
this line is not json
{"analysis": {"mentions_protest": true, "protest_info": {"organizer": "Civic Group", "date": "2024-04-01", "location": "Second City", "count": {"government": null, "independent": 1500}}}, "source": "Local Paper", "date_of_news_issue": "2024-04-02", "state_driven_messaging": 2, "pro_student_messaging": 3}
{"analysis": {"mentions_protest": false, "protest_info": {}}, "source": "Financial Times", "date_of_news_issue": "2024-03-17", "state_driven_messaging": 1, "pro_student_messaging": 0}
{"analysis": {"mentions_protest": true, "protest_info": {"organizer": "Anonymous", "date": "2024-05-10", "location": null, "count": {"government": 100, "independent": 150}}}, "source": "Blog Post", "date_of_news_issue": "2024-05-11", "state_driven_messaging": 0, "pro_student_messaging": 5}
"#;

const DAILY_INPUT: &str = r#"{"publish_date": "2024-01-16", "source_type": "independent", "analysis": {"mentions_students": true, "student_mention_sentiment": "good", "is_propaganda": false, "mentions_protest": false}}
{"publish_date": "2024-01-15", "source_type": "government", "analysis": {"mentions_students": true, "student_mention_sentiment": "good", "is_propaganda": true, "mentions_protest": false}}
{"publish_date": "2024-01-15", "source_type": "unknown", "analysis": {"mentions_students": true, "student_mention_sentiment": "good"}}
"#;

async fn write(path: &Path, body: &str) {
    tokio::fs::write(path, body).await.unwrap();
}

async fn read(path: &Path) -> String {
    tokio::fs::read_to_string(path).await.unwrap()
}

#[tokio::test]
async fn protest_pass_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("analyses.jsonl");
    let output = tmp.path().join("out").join("protests.jsonl");
    write(&input, ANALYSES).await;

    let stats = run_pass(ProtestDeduplicator::default(), &input, &output)
        .await
        .unwrap();
    assert_eq!(stats.malformed, 1);
    assert_eq!(stats.folded, 3);
    assert_eq!(stats.skipped, 2);

    let written = read(&output).await;
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines[0],
        r#"{"date":"2024-03-15","location":"Capital City","organizer":"Students Union","count":{"government":5000,"independent":8000}}"#
    );
    let second: ProtestRecord = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second.location, "Second City");
    assert_eq!(second.count.government, None);
    assert_eq!(lines.len(), 2);
}

#[tokio::test]
async fn passes_are_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("analyses.jsonl");
    write(&input, ANALYSES).await;
    let first = tmp.path().join("first.jsonl");
    let second = tmp.path().join("second.jsonl");

    run_pass(ProtestDeduplicator::default(), &input, &first).await.unwrap();
    run_pass(ProtestDeduplicator::default(), &input, &second).await.unwrap();
    assert_eq!(read(&first).await, read(&second).await);

    run_pass(IssueDayTally::default(), &input, &first).await.unwrap();
    run_pass(IssueDayTally::default(), &input, &second).await.unwrap();
    assert_eq!(read(&first).await, read(&second).await);

    let daily_input = tmp.path().join("daily_input.jsonl");
    write(&daily_input, DAILY_INPUT).await;
    run_pass(DailyAggregator::default(), &daily_input, &first).await.unwrap();
    run_pass(DailyAggregator::default(), &daily_input, &second).await.unwrap();
    let daily = read(&first).await;
    assert_eq!(daily, read(&second).await);
    assert_eq!(daily.lines().count(), 2);
}

#[tokio::test]
async fn daily_pass_sorts_by_date() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("daily_input.jsonl");
    let output = tmp.path().join("daily.jsonl");
    write(&input, DAILY_INPUT).await;

    run_pass(DailyAggregator::default(), &input, &output).await.unwrap();

    let days: Vec<DailyRecord> = read(&output)
        .await
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, "2024-01-15");
    assert_eq!(days[0].student_mentions.government.good, 1);
    assert_eq!(days[0].state_driven_messaging, 1);
    assert_eq!(days[1].student_mentions.independent.good, 1);
}

#[tokio::test]
async fn tally_pass_counts_issue_days() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("analyses.jsonl");
    let output = tmp.path().join("issue_days.jsonl");
    write(&input, ANALYSES).await;

    let stats = run_pass(IssueDayTally::default(), &input, &output)
        .await
        .unwrap();
    assert_eq!(stats.emitted, 4);

    let written = read(&output).await;
    let first: serde_json::Value = serde_json::from_str(written.lines().next().unwrap()).unwrap();
    assert_eq!(first["date"], "2024-03-16");
    assert_eq!(first["articles"], 2);
    assert_eq!(first["state_driven_messaging"], 5);
    assert_eq!(first["student_mentions"]["good_count"], 8);
}

#[tokio::test]
async fn missing_input_aborts_without_output() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("out").join("protests.jsonl");

    let err = run_pass(
        ProtestDeduplicator::default(),
        &tmp.path().join("nope.jsonl"),
        &output,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AggregateError::InputNotFound(_)));
    assert!(!output.exists());
}

#[tokio::test]
async fn empty_input_writes_empty_output() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("empty.jsonl");
    let output = tmp.path().join("protests.jsonl");
    write(&input, "").await;

    let stats = run_pass(ProtestDeduplicator::default(), &input, &output)
        .await
        .unwrap();
    assert_eq!(stats, PassStats::default());
    assert_eq!(read(&output).await, "");
}
