//! Integration tests for the OpenWeather provider and the dashboard fetch cycle,
//! run against a wiremock server.

use serde_json::json;
use skywatch_core::{
    Coordinates, CycleOutcome, Dashboard, FetchError, FixedLocation, Geolocator, IpGeolocator,
    LocationError, LocationQuery, OpenWeatherProvider, WeatherProvider, dashboard, run_cycle,
};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "TEST_KEY";

fn current_body(name: &str, country: &str, temp: f64) -> serde_json::Value {
    json!({
        "coord": {"lon": -0.13, "lat": 51.51},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": temp, "feels_like": temp - 1.0, "humidity": 81},
        "sys": {"country": country},
        "name": name
    })
}

fn forecast_body(entries: usize) -> serde_json::Value {
    let list: Vec<_> = (0..entries)
        .map(|i| {
            json!({
                "dt": 1_792_368_000 + i as i64 * 10_800,
                "main": {"temp": 285.0, "temp_max": 286.0 + i as f64, "temp_min": 284.0},
                "weather": [{"description": "overcast clouds", "icon": "04d"}]
            })
        })
        .collect();
    json!({ "cod": "200", "cnt": entries, "list": list })
}

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new(KEY, format!("{}/data/2.5", server.uri()))
}

#[tokio::test]
async fn current_by_city_sends_q_and_appid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "New York"))
        .and(query_param("appid", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("New York", "US", 295.5)))
        .expect(1)
        .mount(&server)
        .await;

    let current = provider_for(&server)
        .current(&LocationQuery::City("New York".into()))
        .await
        .unwrap();

    assert_eq!(current.city_name, "New York");
    assert_eq!(current.country_code, "US");
    assert_eq!(current.temperature_kelvin, 295.5);
    assert_eq!(current.description, "light rain");
    assert_eq!(current.icon_id, "10d");
}

#[tokio::test]
async fn current_by_coordinates_sends_lat_lon() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "51.51"))
        .and(query_param("lon", "-0.13"))
        .and(query_param("appid", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London", "GB", 288.0)))
        .expect(1)
        .mount(&server)
        .await;

    let query = LocationQuery::Coordinates(Coordinates {
        latitude: 51.51,
        longitude: -0.13,
    });
    let current = provider_for(&server).current(&query).await.unwrap();

    assert_eq!(current.city_name, "London");
}

#[tokio::test]
async fn current_not_found_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current(&LocationQuery::City("Atlantis".into()))
        .await
        .unwrap_err();

    match err {
        FetchError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("city not found"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn current_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current(&LocationQuery::City("London".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Parse { endpoint: "weather", .. }));
}

#[tokio::test]
async fn forecast_keeps_api_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "London"))
        .and(query_param("appid", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(40)))
        .expect(1)
        .mount(&server)
        .await;

    let list = provider_for(&server).forecast("London").await.unwrap();

    assert_eq!(list.len(), 40);
    assert!(list.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert_eq!(list[3].temp_max_kelvin, 289.0);
    assert_eq!(list[0].description, "overcast clouds");
}

#[tokio::test]
async fn search_uses_resolved_name_for_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "london"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London", "GB", 288.0)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(40)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let mut board = Dashboard::new();
    board.set_city_input("london");
    board.search(&provider).await;

    let view = board.view();
    assert!(!view.is_loading());
    assert!(view.error().is_none());
    assert!(view.current().is_some());
    assert_eq!(view.forecast().map(<[_]>::len), Some(40));
}

#[tokio::test]
async fn failed_current_never_calls_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(40)))
        .expect(0)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let mut board = Dashboard::new();
    board.set_city_input("London");
    board.search(&provider).await;

    let view = board.view();
    assert!(!view.is_loading());
    assert_eq!(view.error(), Some(dashboard::FETCH_FAILED_MESSAGE));
    assert!(view.current().is_none());
    assert!(view.forecast().is_none());
}

#[tokio::test]
async fn failed_forecast_keeps_current_without_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London", "GB", 288.0)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let mut board = Dashboard::new();
    board.set_city_input("London");
    board.search(&provider).await;

    let view = board.view();
    assert!(!view.is_loading());
    assert!(view.error().is_none());
    assert!(view.current().is_some());
    assert!(view.forecast().is_none());
}

#[tokio::test]
async fn mount_resolves_coordinates_to_city() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Paris", "FR", 291.0)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(8)))
        .expect(1)
        .mount(&server)
        .await;

    let here = FixedLocation(Coordinates {
        latitude: 48.85,
        longitude: 2.35,
    });
    let provider = provider_for(&server);
    let mut board = Dashboard::new();
    board.mount(&here, &provider).await;

    assert_eq!(
        board.view().current().map(|c| c.city_name.as_str()),
        Some("Paris")
    );
}

#[tokio::test]
async fn slower_older_search_cannot_overwrite_newer_one() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Berlin"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("Berlin", "DE", 280.0))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Rome"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Rome", "IT", 295.0)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(8)))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let mut board = Dashboard::new();

    board.set_city_input("Berlin");
    let (slow_ticket, slow_query) = board.submit_search().expect("valid input");
    board.set_city_input("Rome");
    let (fast_ticket, fast_query) = board.submit_search().expect("valid input");

    let (slow_outcome, fast_outcome) = tokio::join!(
        run_cycle(&provider, &slow_query),
        run_cycle(&provider, &fast_query),
    );

    // Apply in completion order: Rome first, Berlin later.
    assert!(board.finish(fast_ticket, fast_outcome));
    assert!(matches!(slow_outcome, CycleOutcome::Fetched { .. }));
    assert!(!board.finish(slow_ticket, slow_outcome));

    assert_eq!(
        board.view().current().map(|c| c.city_name.as_str()),
        Some("Rome")
    );
}

#[tokio::test]
async fn ip_geolocator_parses_loc_field() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "203.0.113.7",
            "city": "Zurich",
            "region": "Zurich",
            "country": "CH",
            "loc": "47.3667,8.5500",
            "timezone": "Europe/Zurich"
        })))
        .mount(&server)
        .await;

    let coords = IpGeolocator::new(format!("{}/json", server.uri()))
        .locate()
        .await
        .unwrap();

    assert_eq!(coords.latitude, 47.3667);
    assert_eq!(coords.longitude, 8.55);
}

#[tokio::test]
async fn ip_geolocator_forbidden_is_denied() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = IpGeolocator::new(format!("{}/json", server.uri()))
        .locate()
        .await
        .unwrap_err();

    assert!(matches!(err, LocationError::Denied));
}
