//! Integration tests for `ApiClient` using wiremock HTTP mocks.

use petmap_client::{ApiClient, ClientError, FilterRequest, SearchRequest};
use petmap_core::{Category, Coordinate, FacilityId};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, 30, "petmap-test").expect("client construction should not fail")
}

#[tokio::test]
async fn districts_returns_parsed_list() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "id": 1, "name": "강남구", "en_name": "Gangnam-gu", "Latitude": 37.5172, "Longitude": 127.0473 },
        { "id": "2", "name": "마포구", "en_name": "Mapo-gu" }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/districts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let districts = client.districts().await.expect("should parse districts");

    assert_eq!(districts.len(), 2);
    assert_eq!(districts[0].key(), "Gangnam-gu");
    assert!(districts[0].coordinate().is_some());
    assert!(districts[1].coordinate().is_none());
}

#[tokio::test]
async fn filter_posts_expanded_body_and_skips_bad_records() {
    let server = MockServer::start().await;

    let response = serde_json::json!([
        {
            "id": 10, "name": "Mapo Bistro", "category": "restaurant",
            "address": "Yeonnam-ro 1", "district": "Mapo-gu",
            "Latitude": 37.56, "Longitude": 126.92
        },
        {
            "id": 11, "name": "Broken", "category": "restaurant",
            "address": "", "district": "Mapo-gu",
            "Latitude": 999.0, "Longitude": 126.92
        },
        {
            "id": 12, "name": "Mystery", "category": "spaceport",
            "address": "", "district": "Mapo-gu",
            "Latitude": 37.5, "Longitude": 126.9
        },
        {
            "id": 13, "name": "Happy Paws", "category": "cafe",
            "address": "Yeonnam-ro 2", "district": "Mapo-gu",
            "Latitude": 37.561, "Longitude": 126.921
        }
    ]);

    Mock::given(method("POST"))
        .and(path("/api/filter"))
        .and(body_json(serde_json::json!({
            "district": "Mapo-gu",
            "categories": ["restaurant", "cafe"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let request = FilterRequest {
        district: Some("Mapo-gu".to_string()),
        categories: vec![Category::Restaurant, Category::Cafe],
    };
    let facilities = client.filter(&request).await.expect("should parse facilities");

    let ids: Vec<&str> = facilities.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["10", "13"]);
}

#[tokio::test]
async fn search_posts_query_and_origin() {
    let server = MockServer::start().await;

    let response = serde_json::json!([
        {
            "id": "uuid-hospital-1", "name": "가까운 24시 동물병원", "category": "hospital",
            "address": "서울 어딘가", "district": "강남구",
            "latitude": 37.5715, "longitude": 126.983, "distance_km": 0.7
        }
    ]);

    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(body_json(serde_json::json!({
            "query": "24시 병원",
            "lat": 37.5665,
            "lon": 126.978
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let origin = Coordinate::new(37.5665, 126.978).unwrap();
    let facilities = client
        .search(&SearchRequest::new("24시 병원", origin))
        .await
        .expect("should parse search results");

    assert_eq!(facilities.len(), 1);
    assert_eq!(facilities[0].category, Category::VeterinaryHospital);
    assert_eq!(facilities[0].distance_km, Some(0.7));
}

#[tokio::test]
async fn search_error_envelope_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "필수 정보(query, lat, lon)가 누락되었습니다."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let origin = Coordinate::new(37.5665, 126.978).unwrap();
    let err = client
        .search(&SearchRequest::new("", origin))
        .await
        .unwrap_err();

    assert!(err.is_network());
    assert!(
        matches!(err, ClientError::Status { status: 400, ref message, .. } if message.contains("누락")),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn facility_detail_uses_id_path_segment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 42, "name": "튼튼 동물약국", "category": "pharmacy",
            "address": "서울 저기", "district": "Mapo-gu",
            "Latitude": 37.55, "Longitude": 126.91, "phone": "02-222-2222"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let facility = client
        .facility(&FacilityId::from("42"))
        .await
        .expect("should parse facility");
    assert_eq!(facility.name, "튼튼 동물약국");
    assert_eq!(facility.phone.as_deref(), Some("02-222-2222"));
}

#[tokio::test]
async fn facility_detail_not_found_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .facility(&FacilityId::from("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 404, .. }));
}

#[tokio::test]
async fn login_stores_token_used_by_profile() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(serde_json::json!({ "username": "dana", "password": "pw" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "access_token": "tok-1" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "username": "dana",
            "nickname": "멍멍",
            "favorite_hospitals": [1, 2]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let token = client.login("dana", "pw").await.expect("login should succeed");
    assert_eq!(token, "tok-1");

    let profile = client.profile().await.expect("profile should load");
    assert_eq!(profile.username, "dana");
    assert_eq!(profile.nickname.as_deref(), Some("멍멍"));
    assert_eq!(profile.favorite_hospitals.len(), 2);
}

#[tokio::test]
async fn login_with_wrong_password_is_not_auth_expired() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "아이디 또는 비밀번호가 잘못되었습니다."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.login("dana", "nope").await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 401, .. }));
    assert!(client.token().is_none());
}

#[tokio::test]
async fn rejected_token_is_cleared() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/profile/nickname"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.set_token("stale".to_string());
    let err = client.update_nickname("새닉네임").await.unwrap_err();

    assert!(err.is_auth_failure());
    assert!(matches!(err, ClientError::AuthExpired { status: 401 }));
    assert!(client.token().is_none(), "rejected token must be dropped");
}

#[tokio::test]
async fn profile_without_token_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.profile().await.unwrap_err();
    assert!(matches!(err, ClientError::NotAuthenticated));
}

#[tokio::test]
async fn register_conflict_reports_backend_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "error": "이미 존재하는 아이디입니다."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.register("dana", "pw").await.unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("409") && msg.contains("이미 존재하는 아이디입니다."),
        "unexpected message: {msg}"
    );
}

#[tokio::test]
async fn change_password_sends_both_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/profile/password"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(serde_json::json!({
            "current_password": "old",
            "new_password": "new"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "ok" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.set_token("tok".to_string());
    client
        .change_password("old", "new")
        .await
        .expect("password change should succeed");
}

#[tokio::test]
async fn upload_profile_picture_returns_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/profile/upload"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "profile_url": "/uploads/dana.png"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.set_token("tok".to_string());
    let response = client
        .upload_profile_picture("dana.png", vec![0x89, 0x50, 0x4e, 0x47], "image/png")
        .await
        .expect("upload should succeed");
    assert_eq!(response.profile_url.as_deref(), Some("/uploads/dana.png"));
}
