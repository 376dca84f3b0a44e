//! In-process tests of the router against the mock client.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use crate::irail::{Direction, MockIrailClient};
use crate::view::format_local_clock;

use super::{AppState, FAILED_MESSAGE, create_router};

const COLOGNE_BOARD: &str = r#"{
    "station": "Cologne",
    "departures": {"number": "1", "departure": [
        {"id": "1", "station": "Liège", "vehicleinfo": {"shortname": "IC529"}, "time": "1700000000"}
    ]}
}"#;

const IC529_VEHICLE: &str = r#"{
    "vehicle": "BE.NMBS.IC529",
    "stops": {"number": "4", "stop": [
        {"id": "0", "station": "Oostende", "time": "1700000000", "delay": "0"},
        {"id": "1", "station": "Brugge", "time": "1700000900", "delay": "0"},
        {"id": "2", "station": "Gent-Sint-Pieters", "time": "1700002400",
         "delay": "1", "departureDelay": "180", "platform": "3"},
        {"id": "3", "station": "Bruxelles-Midi", "time": "1700004600", "delay": "0"}
    ]}
}"#;

const IC529_COMPOSITION: &str = r#"{"composition": {"segments": {"number": "1", "segment": [
    {"origin": {"name": "Oostende"}, "destination": {"name": "Eupen"},
     "composition": {"source": "Atlas", "units": {"unit": [
        {"id": "0", "hasToilets": "1", "hasBikeSection": "0"},
        {"id": "1", "hasToilets": "0", "hasBikeSection": "1", "materialSubTypeName": "M7BUH"}
     ]}}}
]}}}"#;

fn app(api: &MockIrailClient) -> Router {
    create_router(AppState::new(api.clone(), "Cologne"))
}

async fn get(app: Router, uri: &str, accept: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .header(header::ACCEPT, accept)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_html(app: Router, uri: &str) -> (StatusCode, String) {
    get(app, uri, "text/html,application/xhtml+xml").await
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(app, uri, "application/json").await;
    (status, serde_json::from_str(&body).unwrap())
}

async fn ic529() -> MockIrailClient {
    let api = MockIrailClient::new();
    api.insert_vehicle("BE.NMBS.IC529", IC529_VEHICLE).await;
    api.insert_composition("BE.NMBS.IC529", IC529_COMPOSITION).await;
    api
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = get(app(&MockIrailClient::new()), "/health", "*/*").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn default_liveboard_renders_one_row() {
    let api = MockIrailClient::new();
    api.insert_liveboard("Cologne", Direction::Departures, COLOGNE_BOARD)
        .await;

    let (status, html) = get_html(app(&api), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Liège"));
    assert!(html.contains("IC529"));
    assert!(html.contains(&format_local_clock("1700000000").unwrap()));
    assert!(html.contains("/train/IC529/Li%C3%A8ge"));
    assert!(!html.contains(FAILED_MESSAGE));
}

#[tokio::test]
async fn liveboard_json_keeps_source_order() {
    let api = MockIrailClient::new();
    api.insert_liveboard(
        "Gent-Sint-Pieters",
        Direction::Arrivals,
        r#"{"arrivals": {"arrival": [
            {"station": "Oostende", "vehicle": "BE.NMBS.IC1", "time": "1700000900"},
            {"station": "Antwerpen-Centraal", "vehicle": "BE.NMBS.IC2", "time": "1700000000"}
        ]}}"#,
    )
    .await;

    let (status, json) = get_json(
        app(&api),
        "/?station=Gent-Sint-Pieters&arrdep=arrivals",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["direction"], "arrivals");
    assert_eq!(json["rows"][0]["station"], "Oostende");
    assert_eq!(json["rows"][1]["station"], "Antwerpen-Centraal");
    assert_eq!(json["rows"][0]["href"], "/train/BE.NMBS.IC1/Oostende");
}

#[tokio::test]
async fn empty_station_is_passed_through() {
    let api = MockIrailClient::new();
    api.insert_liveboard("", Direction::Departures, r#"{"departures": {}}"#)
        .await;

    let (status, json) = get_json(app(&api), "/?station=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["station"], "");
    assert_eq!(json["rows"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn toggle_link_targets_other_direction() {
    let api = MockIrailClient::new();
    api.insert_liveboard("Cologne", Direction::Arrivals, r#"{"arrivals": {}}"#)
        .await;

    let (_, html) = get_html(app(&api), "/?station=Cologne&arrdep=arrivals").await;

    assert!(html.contains("Arrivals at"));
    assert!(html.contains("arrdep=departures"));
}

#[tokio::test]
async fn unreachable_liveboard_shows_failure() {
    let api = MockIrailClient::new();
    api.fail_liveboard("Cologne", Direction::Departures).await;

    let (status, html) = get_html(app(&api), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(FAILED_MESSAGE));
    assert!(!html.contains("Loading"));

    let (status, json) = get_json(app(&api), "/").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], FAILED_MESSAGE);
}

#[tokio::test]
async fn train_page_lists_stops_after_station() {
    let api = ic529().await;

    let (status, html) = get_html(app(&api), "/train/BE.NMBS.IC529/Brugge").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Gent-Sint-Pieters"));
    assert!(html.contains("Bruxelles-Midi"));
    assert!(!html.contains("Oostende</strong>"));
    assert!(html.contains("Delayed"));
    assert!(html.contains("Oostende → Eupen"));
    assert!(html.contains("🚻"));
    assert!(html.contains("🚲"));
    assert!(html.contains("M7BUH"));
}

#[tokio::test]
async fn train_json_reports_delay_quirk_and_units() {
    let api = ic529().await;

    let (status, json) = get_json(app(&api), "/train/BE.NMBS.IC529/Brugge").await;

    assert_eq!(status, StatusCode::OK);
    let stops = json["stops"].as_array().unwrap();
    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0]["name"], "Gent-Sint-Pieters");
    assert_eq!(stops[0]["delayed"], true);
    assert_eq!(
        stops[0]["delayed_time"],
        format_local_clock("180").unwrap().as_str()
    );
    assert_eq!(stops[1]["delayed"], false);

    let units = json["segments"][0]["units"].as_array().unwrap();
    assert_eq!(units[0]["number"], 1);
    assert_eq!(units[0]["toilets"], true);
    assert_eq!(units[0]["bike"], false);
    assert_eq!(units[1]["number"], 2);
    assert_eq!(units[1]["bike"], true);
}

#[tokio::test]
async fn train_without_station_has_no_stops() {
    let api = ic529().await;

    let (status, json) = get_json(app(&api), "/train/BE.NMBS.IC529").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json.get("station").is_none());
    assert_eq!(json["stops"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["segments"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn encoded_path_segments_are_decoded() {
    let api = MockIrailClient::new();
    api.insert_vehicle(
        "IC 1",
        r#"{"stops": {"stop": [{"station": "Liège"}, {"station": "Namur"}]}}"#,
    )
    .await;
    api.insert_composition("IC 1", r#"{"composition": {"segments": {}}}"#)
        .await;

    let (status, json) = get_json(app(&api), "/train/IC%201/Li%C3%A8ge").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stops"][0]["name"], "Namur");
}

#[tokio::test]
async fn failed_composition_fails_train_page() {
    let api = MockIrailClient::new();
    api.insert_vehicle("BE.NMBS.IC529", IC529_VEHICLE).await;
    api.fail_composition("BE.NMBS.IC529", 500).await;

    let (status, html) = get_html(app(&api), "/train/BE.NMBS.IC529/Brugge").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(FAILED_MESSAGE));
    assert!(!html.contains("Gent-Sint-Pieters"));
}

#[tokio::test]
async fn unreachable_vehicle_fails_train_json() {
    let api = MockIrailClient::new();
    api.fail_vehicle("IC1").await;
    api.insert_composition("IC1", r#"{"composition": {"segments": {}}}"#)
        .await;

    let (status, json) = get_json(app(&api), "/train/IC1/Brugge").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], FAILED_MESSAGE);
}

#[tokio::test]
async fn bundled_fixtures_serve_both_pages() {
    let api = MockIrailClient::from_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/data/mock")).unwrap();

    let (status, html) = get_html(app(&api), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("ICE 10"));
    assert!(html.contains("/train/BE.NMBS.ICE10/Li%C3%A8ge-Guillemins"));

    let (status, json) = get_json(app(&api), "/train/BE.NMBS.ICE10/Aachen%20Hbf").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stops"][0]["name"], "Liège-Guillemins");
    assert_eq!(json["stops"][0]["delayed"], true);
    assert_eq!(json["segments"][0]["units"][2]["luggage"], true);
}
