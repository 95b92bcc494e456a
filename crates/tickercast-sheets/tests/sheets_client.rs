//! Integration tests for `SheetsClient` against a wiremock server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tickercast_core::AnalysisRecord;
use tickercast_sheets::{SheetsClient, SheetsError, HEADER};

fn test_client(server: &MockServer) -> SheetsClient {
    SheetsClient::with_base_url("test-token", 5, &server.uri())
        .expect("failed to build test SheetsClient")
}

fn record(ticker: &str, pct: f64) -> AnalysisRecord {
    AnalysisRecord {
        date: "2026-08-07".into(),
        ticker: ticker.into(),
        predicted_change_pct: pct,
        reason: "test".into(),
    }
}

fn header_json() -> serde_json::Value {
    json!(HEADER.iter().map(ToString::to_string).collect::<Vec<_>>())
}

#[tokio::test]
async fn create_with_rows_creates_then_writes_header_and_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets"))
        .and(body_partial_json(
            json!({"properties": {"title": "Stock Analysis"}}),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"spreadsheetId": "sheet-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-1/values/A1:D3"))
        .and(query_param("valueInputOption", "RAW"))
        .and(body_partial_json(json!({
            "values": [
                header_json(),
                ["2026-08-07", "AAPL", "2.5", "test"],
                ["2026-08-07", "MSFT", "1.5", "test"]
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let id = test_client(&server)
        .create_with_rows("Stock Analysis", &[record("AAPL", 2.5), record("MSFT", 1.5)])
        .await
        .expect("expected a spreadsheet id");
    assert_eq!(id, "sheet-1");
}

#[tokio::test]
async fn append_skips_header_write_when_header_matches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/A1:D1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"values": [header_json()]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-1/values/A1:D1:append"))
        .and(body_partial_json(json!({
            "values": [["2026-08-07", "AAPL", "2.5", "test"]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updates": {"updatedRows": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let appended = test_client(&server)
        .append_rows("sheet-1", &[record("AAPL", 2.5)])
        .await
        .expect("expected append to succeed");
    assert_eq!(appended, 1);
}

#[tokio::test]
async fn append_repairs_a_missing_header_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/A1:D1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-1/values/A1:D1"))
        .and(body_partial_json(json!({"values": [header_json()]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-1/values/A1:D1:append"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updates": {"updatedRows": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let appended = test_client(&server)
        .append_rows("sheet-1", &[record("AAPL", 2.5)])
        .await
        .expect("expected append to succeed");
    assert_eq!(appended, 1);
}

#[tokio::test]
async fn empty_append_only_verifies_the_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/A1:D1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"values": [header_json()]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let appended = test_client(&server)
        .append_rows("sheet-1", &[])
        .await
        .expect("expected empty append to succeed");
    assert_eq!(appended, 0);
}

#[tokio::test]
async fn non_2xx_is_surfaced_with_context() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/A1:D1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .append_rows("sheet-1", &[record("AAPL", 2.5)])
        .await
        .unwrap_err();
    assert!(
        matches!(err, SheetsError::UnexpectedStatus { status: 403, .. }),
        "got: {err:?}"
    );
}
