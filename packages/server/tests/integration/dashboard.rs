use crate::common::*;

mod summary {
    use super::*;

    #[tokio::test]
    async fn empty_store_returns_no_content() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::SUMMARY).await;

        assert_eq!(res.status, 204);
        assert!(res.text.is_empty());
    }

    #[tokio::test]
    async fn averages_and_distribution_for_sample_file() {
        let app = TestApp::spawn().await;
        app.upload_ok("sample_equipment_data.csv", &fixture("sample_equipment_data.csv"))
            .await;

        let res = app.get(routes::SUMMARY).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["filename"], "sample_equipment_data.csv");
        let stats = &res.body["stats"];
        assert_eq!(stats["total_count"], 15);
        assert!((stats["avg_flow"].as_f64().unwrap() - 114.0).abs() < 1e-9);

        let distribution: Vec<(String, u64)> = res.body["distribution"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| {
                (
                    e["equipment_type"].as_str().unwrap().to_string(),
                    e["count"].as_u64().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            distribution,
            vec![
                ("Compressor".to_string(), 2),
                ("Condenser".to_string(), 2),
                ("HeatExchanger".to_string(), 2),
                ("Pump".to_string(), 4),
                ("Reactor".to_string(), 2),
                ("Valve".to_string(), 3),
            ]
        );
        assert_eq!(res.body["data"].as_array().unwrap().len(), 15);
    }

    #[tokio::test]
    async fn small_batch_averages() {
        let app = TestApp::spawn().await;
        app.upload_ok(
            "three.csv",
            &csv(&[
                "P1,Pump,10,1.0,100",
                "P2,Pump,20,2.0,110",
                "V1,Valve,30,3.0,120",
            ]),
        )
        .await;

        let res = app.get(routes::SUMMARY).await;

        let stats = &res.body["stats"];
        assert_eq!(stats["total_count"], 3);
        assert!((stats["avg_flow"].as_f64().unwrap() - 20.0).abs() < 1e-9);
        assert!((stats["avg_pressure"].as_f64().unwrap() - 2.0).abs() < 1e-9);
        assert!((stats["avg_temp"].as_f64().unwrap() - 110.0).abs() < 1e-9);
        assert_eq!(res.body["distribution"][0]["equipment_type"], "Pump");
        assert_eq!(res.body["distribution"][0]["count"], 2);
        assert_eq!(res.body["distribution"][1]["equipment_type"], "Valve");
        assert_eq!(res.body["distribution"][1]["count"], 1);
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let app = TestApp::spawn().await;
        app.upload_ok(
            "three.csv",
            &csv(&[
                "P1,Pump,10,1.0,100",
                "P2,Pump,20,2.0,110",
                "V1,Valve,30,3.0,120",
            ]),
        )
        .await;

        let first = app.get(routes::SUMMARY).await;
        let second = app.get(routes::SUMMARY).await;

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 200);
        assert_eq!(first.text, second.text);
        assert_eq!(first.body["stats"]["avg_flow"], 20.0);
        assert_eq!(first.body["distribution"][0]["count"], 2);
        assert_eq!(first.body["distribution"][1]["count"], 1);
    }

    #[tokio::test]
    async fn records_keep_upload_order() {
        let app = TestApp::spawn().await;
        app.upload_ok(
            "order.csv",
            &csv(&[
                "Zeta,Valve,10,1.0,100",
                "Alpha,Pump,20,2.0,110",
                "Mid,Reactor,30,3.0,120",
            ]),
        )
        .await;

        let res = app.get(routes::SUMMARY).await;

        let names: Vec<&str> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["equipment_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[tokio::test]
    async fn reflects_only_the_latest_batch() {
        let app = TestApp::spawn().await;
        app.upload_ok("first.csv", &csv(&["P1,Pump,10,1.0,100"])).await;
        app.upload_ok(
            "second.csv",
            &csv(&["C1,Compressor,50,8.0,90", "C2,Compressor,70,9.0,95"]),
        )
        .await;

        let res = app.get(routes::SUMMARY).await;

        assert_eq!(res.body["filename"], "second.csv");
        assert_eq!(res.body["stats"]["total_count"], 2);
        assert!((res.body["stats"]["avg_flow"].as_f64().unwrap() - 60.0).abs() < 1e-9);
        assert_eq!(res.body["distribution"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn older_batches_can_be_summarized_by_id() {
        let app = TestApp::spawn().await;
        let first = app
            .upload_ok("first.csv", &csv(&["P1,Pump,10,1.0,100", "V1,Valve,30,3.0,120"]))
            .await;
        app.upload_ok("second.csv", &csv(&["C1,Compressor,50,8.0,90"]))
            .await;

        let summary = server::aggregate::summarize(&app.db, first)
            .await
            .unwrap()
            .expect("first batch is retained");

        assert_eq!(summary.batch.file_name, "first.csv");
        assert_eq!(summary.count, 2);
        assert_eq!(summary.avg_flow, Some(20.0));
        assert!(
            server::aggregate::summarize(&app.db, first + 100)
                .await
                .unwrap()
                .is_none()
        );
    }
}

mod history {
    use super::*;

    #[tokio::test]
    async fn empty_store_returns_empty_list() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::HISTORY).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let app = TestApp::spawn().await;
        let a = app.upload_ok("a.csv", &csv(&["P1,Pump,10,1.0,100"])).await;
        let b = app.upload_ok("b.csv", &csv(&["P1,Pump,10,1.0,100"])).await;
        let c = app.upload_ok("c.csv", &csv(&["P1,Pump,10,1.0,100"])).await;

        let res = app.get(routes::HISTORY).await;

        assert_eq!(res.status, 200);
        assert_eq!(app.history_ids().await, vec![c, b, a]);
        let names: Vec<&str> = res.body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["file_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["c.csv", "b.csv", "a.csv"]);
        assert!(res.body[0]["uploaded_at"].is_string());
    }
}

#[tokio::test]
async fn openapi_document_lists_endpoints() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::OPENAPI).await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().unwrap();
    for path in [routes::UPLOAD, routes::SUMMARY, routes::HISTORY, routes::EXPORT_PDF] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}
