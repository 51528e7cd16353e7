mod common;

use axum::http::StatusCode;
use common::{assert_redirect, json_body, location, TestApp};
use serde_json::Value;

const VALID_SELLER: [(&str, &str); 5] = [
    ("name", "Ana Silva"),
    ("email", "ana@gmail.com"),
    ("birth_date", "1990-05-17"),
    ("base_salary", "2500.00"),
    ("department_id", "2"),
];

fn with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
    let mut fields: Vec<(&str, &str)> = VALID_SELLER
        .iter()
        .filter(|(k, _)| !overrides.iter().any(|(o, _)| o == k))
        .copied()
        .collect();
    fields.extend_from_slice(overrides);
    fields
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let app = TestApp::new().await;
    let response = app.get("/sellers").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn create_form_lists_departments() {
    let app = TestApp::new().await;
    let body = json_body(app.get("/sellers/create").await).await;
    let departments = body["data"]["departments"].as_array().unwrap();
    assert_eq!(departments.len(), 4);
    assert_eq!(departments[0]["name"], "Books");
}

#[tokio::test]
async fn valid_create_redirects_to_index() {
    let app = TestApp::new().await;
    let response = app.post_form("/sellers/create", &VALID_SELLER).await;
    assert_redirect(&response, "/sellers");

    let body = json_body(app.get("/sellers").await).await;
    let sellers = body["data"].as_array().unwrap();
    assert_eq!(sellers.len(), 7);
    assert_eq!(sellers[6]["name"], "Ana Silva");
}

#[tokio::test]
async fn invalid_create_rerenders_form_with_errors() {
    let app = TestApp::new().await;
    let fields = with(&[("name", "Al"), ("base_salary", "20")]);
    let response = app.post_form("/sellers/create", &fields).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    let view = &body["data"];
    assert_eq!(view["seller"]["name"], "Al");
    assert_eq!(view["seller"]["email"], "ana@gmail.com");
    let error_fields: Vec<&str> = view["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(error_fields, vec!["base_salary", "name"]);
    assert_eq!(view["departments"].as_array().map(Vec::len), Some(4));

    let sellers = json_body(app.get("/sellers").await).await;
    assert_eq!(sellers["data"].as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn non_numeric_department_rerenders_form_with_field_error() {
    let app = TestApp::new().await;
    let fields = with(&[("department_id", "abc")]);
    let response = app.post_form("/sellers/create", &fields).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    let view = &body["data"];
    assert_eq!(view["seller"]["department_id"], "abc");
    assert_eq!(view["errors"][0]["field"], "department_id");
    assert_eq!(view["departments"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn non_numeric_hidden_id_on_edit_is_a_field_error() {
    let app = TestApp::new().await;
    let fields = with(&[("id", "three"), ("version", "1")]);
    let response = app.post_form("/sellers/3/edit", &fields).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn details_of_known_seller() {
    let app = TestApp::new().await;
    let response = app.get("/sellers/2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["seller"]["name"], "Maria Green");
    assert_eq!(body["data"]["department"]["name"], "Electronics");
}

#[tokio::test]
async fn unknown_and_unparsable_ids_redirect_to_error_page() {
    let app = TestApp::new().await;
    for uri in ["/sellers/999", "/sellers/999/edit", "/sellers/999/delete"] {
        assert_redirect(&app.get(uri).await, "/error?message=Id+not+found");
    }
    for uri in ["/sellers/abc", "/sellers/abc/edit", "/sellers/abc/delete"] {
        assert_redirect(&app.get(uri).await, "/error?message=Id+not+provided");
    }
}

#[tokio::test]
async fn edit_form_is_prefilled() {
    let app = TestApp::new().await;
    let body = json_body(app.get("/sellers/3/edit").await).await;
    let seller = &body["data"]["seller"];
    assert_eq!(seller["id"], "3");
    assert_eq!(seller["version"], "1");
    assert_eq!(seller["name"], "Alex Grey");
    assert_eq!(seller["birth_date"], "1988-01-15");
}

#[tokio::test]
async fn edit_with_mismatched_id_redirects() {
    let app = TestApp::new().await;
    let fields = with(&[("id", "4")]);
    let response = app.post_form("/sellers/3/edit", &fields).await;
    assert_redirect(&response, "/error?message=Id+mismatch");
}

#[tokio::test]
async fn edit_updates_and_redirects() {
    let app = TestApp::new().await;
    let fields = with(&[("id", "3"), ("version", "1"), ("name", "Alex Gray")]);
    let response = app.post_form("/sellers/3/edit", &fields).await;
    assert_redirect(&response, "/sellers");

    let body = json_body(app.get("/sellers/3").await).await;
    assert_eq!(body["data"]["seller"]["name"], "Alex Gray");
    assert_eq!(body["data"]["seller"]["version"], 2);
}

#[tokio::test]
async fn edit_with_stale_version_redirects_with_conflict_message() {
    let app = TestApp::new().await;
    let first = with(&[("id", "3"), ("version", "1"), ("name", "Alex Gray")]);
    assert_redirect(&app.post_form("/sellers/3/edit", &first).await, "/sellers");

    let stale = with(&[("id", "3"), ("version", "1"), ("name", "Alex Late")]);
    let response = app.post_form("/sellers/3/edit", &stale).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/error?message="));
}

#[tokio::test]
async fn invalid_edit_rerenders_before_checking_ids() {
    let app = TestApp::new().await;
    let fields = with(&[("id", "4"), ("email", "nope")]);
    let response = app.post_form("/sellers/3/edit", &fields).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn deleting_seller_with_sales_redirects_with_integrity_message() {
    let app = TestApp::new().await;
    let response = app.post_form("/sellers/1/delete", &[]).await;
    assert_redirect(
        &response,
        "/error?message=Can%27t+delete+seller+because+they+have+sales",
    );
    assert_eq!(app.get("/sellers/1").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleting_seller_without_sales_redirects_to_index() {
    let app = TestApp::new().await;
    assert_redirect(
        &app.post_form("/sellers/create", &VALID_SELLER).await,
        "/sellers",
    );

    assert_redirect(&app.post_form("/sellers/7/delete", &[]).await, "/sellers");
    assert_redirect(&app.get("/sellers/7").await, "/error?message=Id+not+found");
}

#[tokio::test]
async fn simple_search_echoes_window_and_lists_records() {
    let app = TestApp::new().await;
    let response = app
        .get("/sales-records/simple-search?minDate=2018-09-01&maxDate=2018-09-30")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let data = &body["data"];
    assert_eq!(data["minDate"], "2018-09-01");
    assert_eq!(data["maxDate"], "2018-09-30");
    let records = data["records"].as_array().unwrap();
    assert_eq!(records.len(), 14);
    assert_eq!(records[0]["id"], 13);
    assert_eq!(records[0]["date_display"], "29/09/2018");
}

#[tokio::test]
async fn blank_search_parameters_fall_back_to_this_year() {
    let app = TestApp::new().await;
    let body = json_body(
        app.get("/sales-records/simple-search?minDate=&maxDate=")
            .await,
    )
    .await;
    let data = &body["data"];
    let min = data["minDate"].as_str().unwrap();
    assert!(min.ends_with("-01-01"));
    assert_eq!(data["maxDate"].as_str().unwrap()[..4], min[..4]);
    // Sample data is from 2018.
    assert_eq!(data["records"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn unreadable_search_dates_fall_back_to_defaults() {
    let app = TestApp::new().await;
    for query in ["minDate=2018-13-45", "minDate=09/01/2018&maxDate=soon"] {
        let response = app
            .get(&format!("/sales-records/simple-search?{query}"))
            .await;
        assert_eq!(response.status(), StatusCode::OK, "{query}");
        let body = json_body(response).await;
        assert!(body["data"]["minDate"].as_str().unwrap().ends_with("-01-01"));
    }

    let body = json_body(
        app.get("/sales-records/grouping-search?minDate=2018-09-01&maxDate=bogus")
            .await,
    )
    .await;
    assert_eq!(body["data"]["minDate"], "2018-09-01");
    assert_ne!(body["data"]["maxDate"], "bogus");
}

#[tokio::test]
async fn grouping_search_returns_department_groups() {
    let app = TestApp::new().await;
    let body = json_body(
        app.get("/sales-records/grouping-search?minDate=2018-01-01&maxDate=2018-12-31")
            .await,
    )
    .await;
    let groups = body["data"]["groups"].as_array().unwrap();
    let names: Vec<&str> = groups
        .iter()
        .filter_map(|g| g["department"]["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Computers", "Books", "Fashion", "Electronics"]);
}

#[tokio::test]
async fn error_page_reports_message_and_request_id() {
    let app = TestApp::new().await;
    let response = app.get("/error?message=Id+mismatch").await;
    let header_id = response.headers()["x-request-id"]
        .to_str()
        .unwrap()
        .to_string();

    let body = json_body(response).await;
    assert_eq!(body["data"]["message"], "Id mismatch");
    assert_eq!(body["data"]["request_id"], Value::String(header_id));
}

#[tokio::test]
async fn health_reports_database_up() {
    let app = TestApp::new().await;
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "up");
    assert_eq!(body["details"]["database"]["status"], "up");
}

#[tokio::test]
async fn departments_and_openapi_are_served() {
    let app = TestApp::new().await;
    let body = json_body(app.get("/departments").await).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(4));

    let doc = json_body(app.get("/api-docs/openapi.json").await).await;
    assert!(doc["paths"]["/sellers/{id}/edit"].is_object());
}
