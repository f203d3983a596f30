use httpmock::prelude::*;
use secrecy::SecretString;
use sheet_splitter::adapters::google::GoogleSession;
use sheet_splitter::core::WorkerStep;
use sheet_splitter::{
    Coordinator, CsvSource, FailurePolicy, GoogleDrive, GoogleSheets, GroupWorker, SplitEngine,
    SplitError,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn shift_jis_file(text: &str) -> NamedTempFile {
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(text);
    assert!(!had_errors);
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file
}

fn engine(
    server: &MockServer,
    source: CsvSource,
    policy: FailurePolicy,
) -> SplitEngine<CsvSource, GoogleSheets, GoogleDrive> {
    let session = Arc::new(GoogleSession::new(
        reqwest::Client::new(),
        SecretString::from("test-token".to_string()),
    ));
    let sheets = GoogleSheets::new(Arc::clone(&session), &server.base_url()).unwrap();
    let drive = GoogleDrive::new(session, &server.base_url()).unwrap();
    let worker = GroupWorker::new(Arc::new(sheets), Arc::new(drive)).with_policy(policy);
    SplitEngine::new(source, Coordinator::new(worker))
}

/// Mocks create for `key`, answering with id `sheet-{key}`.
fn mock_create<'a>(server: &'a MockServer, key: &str) -> httpmock::Mock<'a> {
    let title = format!("案件名 (ID: {})", key);
    let id = format!("sheet-{}", key);
    server.mock(|when, then| {
        when.method(POST)
            .path("/v4/spreadsheets")
            .body_contains(title.as_str());
        then.status(200)
            .json_body(serde_json::json!({ "spreadsheetId": id }));
    })
}

fn mock_grant<'a>(server: &'a MockServer, key: &str, status: u16) -> httpmock::Mock<'a> {
    let path = format!("/drive/v3/files/sheet-{}/permissions", key);
    server.mock(|when, then| {
        when.method(POST).path(path.as_str());
        then.status(status).json_body(serde_json::json!({ "id": "anyoneWithLink" }));
    })
}

fn mock_write<'a>(server: &'a MockServer, key: &str, range: &str) -> httpmock::Mock<'a> {
    let path = format!("/v4/spreadsheets/sheet-{}/values/", key);
    let range = format!(r#""range":"{}""#, range);
    server.mock(|when, then| {
        when.method(PUT)
            .path_contains(path.as_str())
            .query_param("valueInputOption", "USER_ENTERED")
            .body_contains(range.as_str());
        then.status(200).json_body(serde_json::json!({ "updatedRows": 1 }));
    })
}

#[tokio::test]
async fn test_end_to_end_two_groups() {
    let server = MockServer::start();
    let file = shift_jis_file("x,y,z\na,b,g1\nc,d,g2\ne,f,g1\n");

    let creates = [mock_create(&server, "g1"), mock_create(&server, "g2")];
    let grants = [mock_grant(&server, "g1", 200), mock_grant(&server, "g2", 200)];
    let writes = [
        mock_write(&server, "g1", "Sheet1!A1:C3"),
        mock_write(&server, "g2", "Sheet1!A1:C2"),
    ];

    let source = CsvSource::new(file.path());
    let report = engine(&server, source, FailurePolicy::StopAtFirstFailure)
        .run()
        .await
        .unwrap();

    for mock in creates.iter().chain(&grants).chain(&writes) {
        mock.assert();
    }
    assert_eq!(report.launched, 2);
    assert!(report.failures.is_empty());
    assert_eq!(report.success_for("g1").unwrap().rows_written, 2);
    assert_eq!(report.success_for("g2").unwrap().spreadsheet_id, "sheet-g2");
}

#[tokio::test]
async fn test_end_to_end_grant_failure_is_isolated() {
    let server = MockServer::start();
    let file = shift_jis_file("x,y,z\na,b,g1\nc,d,g2\n");

    mock_create(&server, "g1");
    mock_create(&server, "g2");
    mock_grant(&server, "g1", 200);
    mock_grant(&server, "g2", 500);
    let write_g1 = mock_write(&server, "g1", "Sheet1!A1:C2");
    let write_g2 = mock_write(&server, "g2", "Sheet1!A1:C2");

    let source = CsvSource::new(file.path());
    let report = engine(&server, source, FailurePolicy::StopAtFirstFailure)
        .run()
        .await
        .unwrap();

    write_g1.assert();
    assert_eq!(write_g2.hits(), 0);
    assert_eq!(report.produced_counts(), vec![1]);
    let failure = report.failure_for("g2").unwrap();
    assert_eq!(failure.failed_steps(), vec![WorkerStep::Grant]);
    assert!(matches!(
        failure.errors[0].error,
        SplitError::RemoteError { status: 500, .. }
    ));
}

#[tokio::test]
async fn test_end_to_end_continue_policy_still_writes() {
    let server = MockServer::start();
    let file = shift_jis_file("x,y,z\na,b,g2\n");

    mock_create(&server, "g2");
    mock_grant(&server, "g2", 500);
    let write_g2 = mock_write(&server, "g2", "Sheet1!A1:C2");

    let source = CsvSource::new(file.path());
    let report = engine(&server, source, FailurePolicy::ContinueAfterFailure)
        .run()
        .await
        .unwrap();

    write_g2.assert();
    assert_eq!(
        report.failure_for("g2").unwrap().failed_steps(),
        vec![WorkerStep::Grant]
    );
}

#[tokio::test]
async fn test_end_to_end_header_only_source() {
    let server = MockServer::start();
    let any_request = server.mock(|when, then| {
        when.path_contains("/");
        then.status(500);
    });
    let file = shift_jis_file("名前,職種,案件ID\n");

    let source = CsvSource::new(file.path());
    let report = engine(&server, source, FailurePolicy::StopAtFirstFailure)
        .run()
        .await
        .unwrap();

    assert_eq!(report.launched, 0);
    assert!(report.successes.is_empty());
    assert!(report.failures.is_empty());
    assert_eq!(any_request.hits(), 0);
}

#[tokio::test]
async fn test_end_to_end_shared_key_single_spreadsheet() {
    let server = MockServer::start();
    let file = shift_jis_file("名前,職種,案件ID\n山田,看護師,101\n佐藤,薬剤師,101\n");

    let create = mock_create(&server, "101");
    mock_grant(&server, "101", 200);
    let write = mock_write(&server, "101", "Sheet1!A1:C3");

    let source = CsvSource::new(file.path());
    let report = engine(&server, source, FailurePolicy::StopAtFirstFailure)
        .run()
        .await
        .unwrap();

    assert_eq!(create.hits(), 1);
    write.assert();
    assert_eq!(report.produced_counts(), vec![2]);
}

#[tokio::test]
async fn test_end_to_end_unreadable_source_is_fatal() {
    let server = MockServer::start();
    let source = CsvSource::new("/nonexistent/medridge-jobs.csv");

    let result = engine(&server, source, FailurePolicy::StopAtFirstFailure)
        .run()
        .await;

    assert!(matches!(result, Err(SplitError::IoError(_))));
}
