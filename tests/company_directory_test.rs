mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::TestApp;
use maintenance_api::backend::{CompanyDirectory, RestCompanyDirectory};
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, header, method, path, path_regex, query_param},
    Mock, MockServer, ResponseTemplate,
};

const TOKEN: &str = "session-token";

fn directory(server: &MockServer) -> Arc<dyn CompanyDirectory> {
    Arc::new(
        RestCompanyDirectory::new(
            &server.uri(),
            "anon-key",
            None,
            "logos",
            Duration::from_secs(5),
        )
        .expect("client"),
    )
}

async fn mock_session(server: &MockServer, company_id: Option<&str>) {
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user-1" })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.user-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "user-1",
            "company_id": company_id,
            "nome": "Marina"
        }])))
        .mount(server)
        .await;
}

async fn mock_company(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/companies"))
        .and(query_param("id", "eq.c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "c1",
            "nome": "Hospital Central",
            "address": "Rua das Flores, 100",
            "phone": "11 5555-0000",
            "email": "manutencao@hospital.example",
            "website": null
        }])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn profile_joins_company_and_logos() {
    let server = MockServer::start().await;
    mock_session(&server, Some("c1")).await;
    mock_company(&server).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/company_logos"))
        .and(query_param("company_id", "eq.c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "l1",
            "company_id": "c1",
            "logo_url": "https://cdn.example/left.png",
            "logo_position": "left"
        }])))
        .mount(&server)
        .await;

    let app = TestApp::with_directory(Some(directory(&server))).await;
    let response = app
        .request(Method::GET, "/api/v1/company", None, Some(TOKEN))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();
    assert_eq!(data["company"]["nome"], "Hospital Central");
    assert_eq!(data["logos"][0]["logo_position"], "left");
}

#[tokio::test]
async fn missing_session_is_unauthorized() {
    let server = MockServer::start().await;
    let app = TestApp::with_directory(Some(directory(&server))).await;

    let response = app.get("/api/v1/company").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.error_message(),
        "Unauthorized: Usuário não autenticado"
    );
}

#[tokio::test]
async fn rejected_session_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let app = TestApp::with_directory(Some(directory(&server))).await;
    let response = app
        .request(Method::GET, "/api/v1/company", None, Some("expired"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn first_save_creates_and_links_the_company() {
    let server = MockServer::start().await;
    mock_session(&server, None).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/companies"))
        .and(header("prefer", "return=representation"))
        .and(body_partial_json(json!({ "nome": "Clínica Norte" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": "c9",
            "nome": "Clínica Norte"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.user-1"))
        .and(body_partial_json(json!({ "company_id": "c9" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let app = TestApp::with_directory(Some(directory(&server))).await;
    let response = app
        .request(
            Method::PUT,
            "/api/v1/company",
            Some(json!({ "name": "  Clínica Norte " })),
            Some(TOKEN),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.json());
    assert_eq!(response.data()["id"], "c9");
    assert_eq!(
        response.json()["message"],
        "Dados da empresa salvos com sucesso!"
    );
}

#[tokio::test]
async fn save_requires_a_name() {
    let server = MockServer::start().await;
    let app = TestApp::with_directory(Some(directory(&server))).await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/company",
            Some(json!({ "name": " ", "phone": "11 4000-0000" })),
            Some(TOKEN),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.error_message(),
        "Validation error: O nome da empresa é obrigatório"
    );
}

fn logo_request(content_type: &str, bytes: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/company/logos/right?filename=marca.PNG")
        .header("authorization", format!("Bearer {}", TOKEN))
        .header("content-type", content_type)
        .body(Body::from(bytes))
        .expect("request")
}

#[tokio::test]
async fn logo_upload_stores_file_and_records_url() {
    let server = MockServer::start().await;
    mock_session(&server, Some("c1")).await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/logos/company-logos/c1/[0-9a-f-]+\.png$"))
        .and(header("content-type", "image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/company_logos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/company_logos"))
        .and(body_partial_json(json!({ "company_id": "c1", "logo_position": "right" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": "l2",
            "company_id": "c1",
            "logo_url": "https://cdn.example/right.png",
            "logo_position": "right"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let app = TestApp::with_directory(Some(directory(&server))).await;
    let response = app
        .send(logo_request("image/png", vec![0x89, b'P', b'N', b'G']))
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.json());
    assert_eq!(response.data()["logo_position"], "right");
}

#[tokio::test]
async fn logo_upload_rejects_non_images_and_large_files() {
    let server = MockServer::start().await;
    let app = TestApp::with_directory(Some(directory(&server))).await;

    let text = app
        .send(logo_request("text/plain", b"not an image".to_vec()))
        .await;
    assert_eq!(text.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        text.error_message(),
        "Unsupported media type: Por favor, selecione apenas arquivos de imagem"
    );

    let large = app
        .send(logo_request("image/jpeg", vec![0u8; 2 * 1024 * 1024 + 1]))
        .await;
    assert_eq!(large.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        large.error_message(),
        "Payload too large: O tamanho máximo do arquivo é 2MB"
    );
}

#[tokio::test]
async fn logo_upload_needs_a_saved_company() {
    let server = MockServer::start().await;
    mock_session(&server, None).await;

    let app = TestApp::with_directory(Some(directory(&server))).await;
    let response = app.send(logo_request("image/png", vec![1, 2, 3])).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.error_message(),
        "Validation error: Salve os dados da empresa antes de enviar logos."
    );
}

#[tokio::test]
async fn remove_logo_filters_by_position() {
    let server = MockServer::start().await;
    mock_session(&server, Some("c1")).await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/company_logos"))
        .and(query_param("company_id", "eq.c1"))
        .and(query_param("logo_position", "eq.left"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let app = TestApp::with_directory(Some(directory(&server))).await;
    let response = app
        .request(Method::DELETE, "/api/v1/company/logos/left", None, Some(TOKEN))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn backend_failures_map_to_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = TestApp::with_directory(Some(directory(&server))).await;
    let response = app
        .request(Method::GET, "/api/v1/company", None, Some(TOKEN))
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn company_endpoints_without_backend_are_bad_gateway() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::GET, "/api/v1/company", None, Some(TOKEN))
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
}
