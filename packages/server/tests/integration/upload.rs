use crate::common::*;

mod accepted {
    use super::*;

    #[tokio::test]
    async fn sample_file_creates_batch() {
        let app = TestApp::spawn().await;

        let res = app
            .upload("sample_equipment_data.csv", &fixture("sample_equipment_data.csv"))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["message"], "File uploaded and processed successfully");
        assert_eq!(res.body["records"], 15);
        assert_eq!(res.body["evicted"].as_array().unwrap().len(), 0);
        assert_eq!(app.batch_count().await, 1);
        assert_eq!(app.record_count().await, 15);
    }

    #[tokio::test]
    async fn header_whitespace_and_column_order_are_ignored() {
        let app = TestApp::spawn().await;
        let content = "Temperature , Pressure,Type ,  Equipment Name,Flowrate\n\
                       110,5.2,Pump,Pump-1,120\n";

        let res = app.upload("reordered.csv", content).await;

        assert_eq!(res.status, 201, "{}", res.text);
        let summary = app.get(routes::SUMMARY).await;
        let row = &summary.body["data"][0];
        assert_eq!(row["equipment_name"], "Pump-1");
        assert_eq!(row["equipment_type"], "Pump");
        assert_eq!(row["flowrate"], 120);
        assert_eq!(row["pressure"], 5.2);
        assert_eq!(row["temperature"], 110);
    }

    #[tokio::test]
    async fn extra_columns_are_dropped() {
        let app = TestApp::spawn().await;
        let content = "Equipment Name,Type,Flowrate,Pressure,Temperature,Notes\n\
                       Pump-1,Pump,120,5.2,110,recently serviced\n";

        let res = app.upload("extra.csv", content).await;

        assert_eq!(res.status, 201, "{}", res.text);
        let summary = app.get(routes::SUMMARY).await;
        assert!(summary.body["data"][0].get("Notes").is_none());
    }

    #[tokio::test]
    async fn utf8_bom_is_accepted() {
        let app = TestApp::spawn().await;
        let content = format!("\u{feff}{}", csv(&["Pump-1,Pump,120,5.2,110"]));

        let res = app.upload("excel-export.csv", &content).await;

        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn stored_name_is_the_base_name() {
        let app = TestApp::spawn().await;

        app.upload_ok("plant/line-3/readings.csv", &csv(&["Pump-1,Pump,120,5.2,110"]))
            .await;

        let history = app.get(routes::HISTORY).await;
        assert_eq!(history.body[0]["file_name"], "readings.csv");
    }
}

mod rejected {
    use super::*;

    #[tokio::test]
    async fn missing_column_lists_missing_and_found() {
        let app = TestApp::spawn().await;

        let res = app
            .upload("missing_pressure.csv", &fixture("missing_pressure.csv"))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MISSING_COLUMNS");
        assert!(res.body["error"].as_str().unwrap().contains("Pressure"));
        assert_eq!(res.body["details"]["missing"], serde_json::json!(["Pressure"]));
        assert_eq!(
            res.body["details"]["found"],
            serde_json::json!(["Equipment Name", "Type", "Flowrate", "Temperature"])
        );
        assert_eq!(app.batch_count().await, 0);
    }

    #[tokio::test]
    async fn column_names_are_case_sensitive() {
        let app = TestApp::spawn().await;
        let content = "equipment name,Type,Flowrate,Pressure,Temperature\nPump-1,Pump,120,5.2,110\n";

        let res = app.upload("lowercase.csv", content).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MISSING_COLUMNS");
        assert_eq!(
            res.body["details"]["missing"],
            serde_json::json!(["Equipment Name"])
        );
    }

    #[tokio::test]
    async fn non_numeric_value_rejects_whole_file() {
        let app = TestApp::spawn().await;
        let content = csv(&[
            "Pump-1,Pump,120,5.2,110",
            "Pump-2,Pump,fast,5.6,115",
            "Pump-3,Pump,125,5.9,118",
        ]);

        let res = app.upload("bad-flow.csv", &content).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "PARSE_ERROR");
        let message = res.body["error"].as_str().unwrap();
        assert!(message.contains("row 2"), "{message}");
        assert!(message.contains("Flowrate"), "{message}");
        assert_eq!(app.batch_count().await, 0);
        assert_eq!(app.record_count().await, 0);
    }

    #[tokio::test]
    async fn fractional_integer_column_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .upload("fractional.csv", &csv(&["Pump-1,Pump,120.5,5.2,110"]))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "PARSE_ERROR");
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.upload("empty.csv", "").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "PARSE_ERROR");
    }

    #[tokio::test]
    async fn header_only_file_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.upload("header.csv", &csv(&[])).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "PARSE_ERROR");
        assert_eq!(app.batch_count().await, 0);
    }

    #[tokio::test]
    async fn ragged_row_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.upload("ragged.csv", &csv(&["Pump-1,Pump,120,5.2"])).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "PARSE_ERROR");
    }

    #[tokio::test]
    async fn missing_file_field_is_rejected() {
        let app = TestApp::spawn().await;
        let form = reqwest::multipart::Form::new().text("note", "no file here");

        let res = app.post_form(routes::UPLOAD, form).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["error"], "No file provided");
    }

    #[tokio::test]
    async fn failed_upload_keeps_previous_batches() {
        let app = TestApp::spawn().await;
        let id = app
            .upload_ok("good.csv", &csv(&["Pump-1,Pump,120,5.2,110"]))
            .await;

        let res = app
            .upload("bad.csv", &csv(&["Pump-1,Pump,120,high,110"]))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(app.history_ids().await, vec![id]);
        let summary = app.get(routes::SUMMARY).await;
        assert_eq!(summary.body["filename"], "good.csv");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut config = server::config::AppConfig::default();
        config.upload.max_bytes = 1024;
        let app = TestApp::spawn_with(config).await;
        let rows: Vec<String> = (0..200)
            .map(|i| format!("Pump-{i},Pump,120,5.2,110"))
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();

        let res = app.upload("huge.csv", &csv(&rows)).await;

        assert!(res.status == 400 || res.status == 413, "got {}", res.status);
        assert_eq!(app.batch_count().await, 0);
    }
}
