use reqwest::header;

use crate::common::*;

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}

#[tokio::test]
async fn empty_store_returns_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::EXPORT_PDF).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
    assert_eq!(res.body["error"], "No data to export");
}

#[tokio::test]
async fn latest_batch_is_rendered_as_pdf() {
    let app = TestApp::spawn().await;
    app.upload_ok("sample_equipment_data.csv", &fixture("sample_equipment_data.csv"))
        .await;

    let (status, headers, bytes) = app.get_bytes(routes::EXPORT_PDF).await;

    assert_eq!(status, 200);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Report_sample_equipment_data.csv.pdf\""
    );
    assert_eq!(
        headers[header::CONTENT_LENGTH].to_str().unwrap(),
        bytes.len().to_string()
    );
    assert!(bytes.starts_with(b"%PDF-"));

    let doc = lopdf::Document::load_mem(&bytes).expect("valid PDF");
    assert_eq!(doc.get_pages().len(), 1);
    assert!(contains(&bytes, "Chemical Equipment Report"));
    assert!(contains(&bytes, "Source File: sample_equipment_data.csv"));
    assert!(contains(&bytes, "Total Units: 15"));
    assert!(contains(&bytes, "Avg Flowrate: 114"));
    assert!(contains(&bytes, "Pump-1"));
}

#[tokio::test]
async fn table_is_capped_at_configured_rows() {
    let mut config = server::config::AppConfig::default();
    config.report.max_rows = 3;
    let app = TestApp::spawn_with(config).await;
    app.upload_ok(
        "five.csv",
        &csv(&[
            "Row-A,Pump,10,1.0,100",
            "Row-B,Pump,10,1.0,100",
            "Row-C,Pump,10,1.0,100",
            "Row-D,Pump,10,1.0,100",
            "Row-E,Pump,10,1.0,100",
        ]),
    )
    .await;

    let (status, _, bytes) = app.get_bytes(routes::EXPORT_PDF).await;

    assert_eq!(status, 200);
    assert!(contains(&bytes, "Row-C"));
    assert!(!contains(&bytes, "Row-D"));
    assert!(contains(&bytes, "Total Units: 5"));
}
