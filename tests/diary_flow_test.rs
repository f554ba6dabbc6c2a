//! Diary screens end to end against a mock backend.

mod common;

use chrono::NaiveDate;
use common::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moodlog::error::{MoodlogError, NetworkError};
use moodlog::models::{AnalysisResponse, Sentiment};
use moodlog::screens::SubmitOutcome;

fn entries() -> serde_json::Value {
    json!([
        {"id": 1, "diaryTitle": "Beach", "diaryContent": "sunny walk", "createdAt": "2025-05-01T09:00:00"},
        {"id": 2, "diaryTitle": "Office", "diaryContent": "rain again", "createdAt": "2025-05-02T09:00:00"},
        {"id": 3, "diaryTitle": "Rain", "diaryContent": "stayed home", "createdAt": "2025-05-02T21:00:00"},
        {"id": 4, "diaryTitle": "Gym", "diaryContent": "legs", "createdAt": "2025-05-09T18:00:00"},
        {"id": 5, "diaryTitle": "Rainbow", "diaryContent": "after the storm", "createdAt": "2025-05-10T18:00:00"},
    ])
}

#[tokio::test]
async fn test_search_pages_on_the_client() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server, &user_token(1, "bora"), 1, "bora").await;
    Mock::given(method("GET"))
        .and(path("/api/diary/responses/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries()))
        .mount(&server)
        .await;
    let mut list = client.diary_list();

    let page = list.search("ain").await.unwrap().unwrap();
    let ids: Vec<&str> = page.items.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "3"]);
    assert_eq!(page.total_count, 3);
    assert_eq!(page.total_pages(), 2);
    assert!(!page.has_prev());
    assert!(page.has_next());

    let page = list.go_to_page(1).await.unwrap().unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "Rainbow");
    assert!(page.has_prev());
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_date_mode_uses_range_query() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server, &user_token(1, "bora"), 1, "bora").await;
    Mock::given(method("GET"))
        .and(path("/api/diary/responses/1/range"))
        .and(query_param("startDate", "2025-05-02"))
        .and(query_param("endDate", "2025-05-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "diaryTitle": "Office", "createdAt": "2025-05-02T09:00:00"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let mut list = client.diary_list();
    list.search("something").await.ok();

    let day = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
    let page = list.select_date(day).await.unwrap().unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].date, "2025-05-02");
    assert!(list.query().search.is_empty());
    assert_eq!(list.query().page, 0);
}

#[tokio::test]
async fn test_calendar_marks_for_month() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server, &user_token(1, "bora"), 1, "bora").await;
    Mock::given(method("GET"))
        .and(path("/api/diary/responses/1/range"))
        .and(query_param("startDate", "2025-05-01"))
        .and(query_param("endDate", "2025-05-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries()))
        .mount(&server)
        .await;

    let marks = client.diary_list().calendar_marks(2025, 5).await.unwrap().unwrap();

    let days: Vec<u32> = marks.iter().map(|d| chrono::Datelike::day(d)).collect();
    assert_eq!(days, vec![1, 2, 9, 10]);
}

#[tokio::test]
async fn test_write_then_poll_analysis() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server, &user_token(1, "bora"), 1, "bora").await;
    Mock::given(method("POST"))
        .and(path("/api/diary/analyze"))
        .and(body_json(json!({"title": "Exam", "content": "Nervous but ready.", "userId": "1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 30})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/diaries/30/analysis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"message": "분석 중입니다", "progress": 42, "estimatedRemaining": "30s"}),
        ))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/diaries/30/analysis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "analysis": {
                "emotionDetection": {"joy": 20, "sadness": 10, "surprise": 5, "calm": 65},
                "emotionSummary": "Mostly calm",
                "automaticThought": "I will fail",
                "promptForChange": "What evidence do you have?",
                "alternativeThought": "I prepared well",
                "status": "NEUTRAL"
            }
        })))
        .mount(&server)
        .await;

    let mut editor = client.new_entry();
    editor.set_title("Exam");
    editor.set_content("Nervous but ready.");
    let SubmitOutcome::Created { entry_id } = editor.submit().await.unwrap() else {
        panic!("create mode should create");
    };
    assert_eq!(entry_id, "30");

    let analysis = client.analysis(&entry_id);
    let first = analysis.load().await.unwrap().unwrap();
    match first {
        AnalysisResponse::InProgress(progress) => {
            assert_eq!(progress.progress, 42.0);
            assert_eq!(progress.estimated_remaining.as_deref(), Some("30s"));
        }
        other => panic!("expected progress, got {:?}", other),
    }

    let done = analysis
        .poll(Duration::from_millis(10), 5)
        .await
        .unwrap()
        .unwrap();
    let AnalysisResponse::Complete(result) = done else {
        panic!("expected a complete analysis");
    };
    assert_eq!(result.status, Some(Sentiment::Neutral));
    assert_eq!(result.emotion_detection.calm, 65.0);
    assert_eq!(result.alternative_thought, "I prepared well");
    assert_eq!(requests_to(&server, "/api/diaries/30/analysis").await.len(), 3);
}

#[tokio::test]
async fn test_view_edit_delete() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server, &user_token(1, "bora"), 1, "bora").await;
    Mock::given(method("GET"))
        .and(path("/api/diary/response/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "title": "Office", "content": "rain again",
            "date": "2025-05-02T09:00:00", "aiResponse": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/diary/response/2"))
        .and(body_json(json!({"diaryTitle": "Office", "diaryContent": "rain stopped"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/diary/response/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/diaries/2/analysis"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut view = client.entry_view("2");
    let entry = view.load().await.unwrap().unwrap();
    assert_eq!(entry.created_date(), NaiveDate::from_ymd_opt(2025, 5, 2));
    assert!(entry.has_analysis);
    assert_eq!(view.analyze().await.unwrap(), "2");

    let mut editor = client.edit_entry("2");
    editor.load().await.unwrap();
    editor.set_content("rain stopped");
    assert_eq!(
        editor.submit().await.unwrap(),
        SubmitOutcome::Updated {
            entry_id: "2".to_string()
        }
    );

    view.delete().await.unwrap();
}

#[tokio::test]
async fn test_detail_with_both_spellings_then_off_schema_analysis() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server, &user_token(1, "bora"), 1, "bora").await;
    Mock::given(method("GET"))
        .and(path("/api/diary/response/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "title": "Picnic", "diaryTitle": "Picnic",
            "content": "ants everywhere", "diaryContent": "ants everywhere",
            "date": "2025-05-03", "createdAt": "2025-05-03T12:00:00",
            "aiResponse": null
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/diaries/5/analysis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/diaries/5/analysis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "analysis": {
                "status": "MIXED",
                "confidence": "0.4",
                "emotionDetection": {"joy": null},
                "emotionSummary": null
            }
        })))
        .mount(&server)
        .await;

    let mut view = client.entry_view("5");
    let entry = view.load().await.unwrap().unwrap();
    assert_eq!(entry.title, "Picnic");
    assert_eq!(entry.content, "ants everywhere");
    assert_eq!(entry.created_date(), NaiveDate::from_ymd_opt(2025, 5, 3));
    assert!(!entry.has_analysis);
    assert_eq!(view.analyze().await.unwrap(), "5");

    let AnalysisResponse::Complete(result) = client.analysis("5").load().await.unwrap().unwrap()
    else {
        panic!("an analysis object is always complete");
    };
    assert_eq!(result.status, Some(Sentiment::Unknown));
    assert_eq!(result.confidence, Some(0.4));
    assert_eq!(result.emotion_detection.joy, 0.0);
    assert_eq!(result.emotion_summary, "");
}

#[tokio::test]
async fn test_missing_entry_is_not_found() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server, &user_token(1, "bora"), 1, "bora").await;
    Mock::given(method("GET"))
        .and(path("/api/diary/response/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "없는 일기"})))
        .mount(&server)
        .await;

    let err = client.entry_view("99").load().await.unwrap_err();
    assert!(matches!(err, MoodlogError::Network(NetworkError::NotFound { .. })));
}

#[tokio::test]
async fn test_server_error_message_reaches_user() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server, &user_token(1, "bora"), 1, "bora").await;
    Mock::given(method("GET"))
        .and(path("/api/diary/responses/1"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "DB unavailable"})),
        )
        .mount(&server)
        .await;

    let err = client.diary_list().load().await.unwrap_err();
    assert_eq!(err.user_message(), "DB unavailable");
}
