mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

fn generator(tag: &str) -> serde_json::Value {
    json!({
        "category": "generator",
        "tag": tag,
        "location": "Subsolo 1",
        "name": "Gerador principal",
        "description": "Gerador diesel 500 kVA",
        "model": "GD-500",
        "brand": "Stemac"
    })
}

#[tokio::test]
async fn employee_crud_and_required_fields() {
    let app = TestApp::new().await;

    let missing = app
        .post("/api/v1/employees", json!({ "name": "Ana", "drt": "" }))
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        missing.error_message(),
        "Validation error: Todos os campos são obrigatórios."
    );

    let id = app.seed_employee("Bruno Costa").await;
    let updated = app
        .put(
            &format!("/api/v1/employees/{}", id),
            json!({ "name": "Bruno Costa", "drt": "DRT-2002", "role": "Supervisor" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["role"], "Supervisor");
    assert_eq!(updated.data()["id"], id.as_str());

    let listed = app.get("/api/v1/employees?search=bruno").await;
    assert_eq!(listed.data()["total"], 1);

    assert_eq!(
        app.delete(&format!("/api/v1/employees/{}", id)).await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.get(&format!("/api/v1/employees/{}", id)).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn equipment_categories_are_fixed() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/equipment-categories").await;
    assert_eq!(response.status, StatusCode::OK);
    let categories = response.data();
    let ids: Vec<&str> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec!["generator", "elevator", "pump", "aircon", "electrical", "bathrooms", "gases"]
    );

    let one = app.get("/api/v1/equipment-categories/gases").await;
    assert_eq!(one.data()["name"], "Gases Medicinais");
    assert_eq!(
        app.get("/api/v1/equipment-categories/boiler").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn equipment_validation_reports_first_failure() {
    let app = TestApp::new().await;

    let bad_tag = app.post("/api/v1/equipment", generator("GE-01-001")).await;
    assert_eq!(bad_tag.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        bad_tag.error_message(),
        "Validation error: TAG deve seguir o formato AAA-AA-999."
    );

    let mut no_brand = generator("GER-01-001");
    no_brand["brand"] = json!(" ");
    let response = app.post("/api/v1/equipment", no_brand).await;
    assert_eq!(
        response.error_message(),
        "Validation error: Todos os campos são obrigatórios, exceto número de série."
    );

    let bathroom = app
        .post(
            "/api/v1/equipment",
            json!({ "category": "bathrooms", "tag": "BAN-02-010", "location": "Bloco B" }),
        )
        .await;
    assert_eq!(
        bathroom.error_message(),
        "Validation error: Pavimento é obrigatório."
    );
}

#[tokio::test]
async fn equipment_crud_with_category_filter() {
    let app = TestApp::new().await;

    let created = app.post("/api/v1/equipment", generator("GER-01-001")).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.data()["id"].as_str().unwrap().to_string();
    assert_eq!(created.data()["category"], "generator");

    let panel = app
        .post(
            "/api/v1/equipment",
            json!({ "category": "electrical", "tag": "QDE-03-100", "location": "Casa de máquinas" }),
        )
        .await;
    assert_eq!(panel.status, StatusCode::CREATED);

    let mut verbose = generator("GER-01-002");
    verbose["description"] = json!("Gerador diesel com painel de transferência automática. ".repeat(60));
    verbose["location"] = json!("Subsolo 1, ".repeat(40));
    let long_fields = app.post("/api/v1/equipment", verbose).await;
    assert_eq!(long_fields.status, StatusCode::CREATED, "{:?}", long_fields.json());
    let long_id = long_fields.data()["id"].as_str().unwrap().to_string();
    assert_eq!(
        app.delete(&format!("/api/v1/equipment/{}", long_id)).await.status,
        StatusCode::NO_CONTENT
    );

    let generators = app.get("/api/v1/equipment?category=generator").await;
    assert_eq!(generators.data()["total"], 1);
    let unknown = app.get("/api/v1/equipment?category=boiler").await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    let by_location = app.get("/api/v1/equipment?search=casa").await;
    assert_eq!(by_location.data()["total"], 1);

    let mut moved = generator("GER-01-001");
    moved["location"] = json!("Cobertura");
    let updated = app.put(&format!("/api/v1/equipment/{}", id), moved).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["location"], "Cobertura");

    assert_eq!(
        app.delete(&format!("/api/v1/equipment/{}", id)).await.status,
        StatusCode::NO_CONTENT
    );
    let remaining = app.get("/api/v1/equipment").await;
    assert_eq!(remaining.data()["total"], 1);
}

#[tokio::test]
async fn default_inspection_categories_are_seeded_once() {
    let app = TestApp::new().await;

    let seeded_again = app
        .state
        .services
        .inspection_categories
        .seed_defaults()
        .await
        .unwrap();
    assert!(!seeded_again);

    let response = app.get("/api/v1/inspection-categories?limit=100").await;
    let data = response.data();
    assert_eq!(data["total"], 7);
    assert_eq!(data["items"][0]["id"], "1");
    assert_eq!(data["items"][0]["name"], "RONDA DIÁRIA DE GERADORES");

    let created = app
        .post("/api/v1/inspection-categories", json!({ "name": "PREVENTIVA DE BOMBAS" }))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let empty = app
        .post("/api/v1/inspection-categories", json!({ "name": "" }))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checklists_are_instantiated_from_templates() {
    let app = TestApp::new().await;

    let templates = app.get("/api/v1/checklist-templates").await;
    assert_eq!(templates.data().as_array().unwrap().len(), 7);

    let created = app
        .post(
            "/api/v1/checklists",
            json!({ "categoryId": "1", "name": "Ronda gerador" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let checklist = created.data();
    let items = checklist["items"].as_array().unwrap();
    assert!(!items.is_empty());
    assert!(items.iter().all(|item| item["type"].is_string()));

    // A category without a template yields an empty checklist
    let custom = app
        .post("/api/v1/inspection-categories", json!({ "name": "VISTORIA DE TELHADO" }))
        .await;
    let custom_id = custom.data()["id"].as_str().unwrap().to_string();
    let empty = app
        .post(
            "/api/v1/checklists",
            json!({ "categoryId": custom_id, "name": "Telhado" }),
        )
        .await;
    assert_eq!(empty.status, StatusCode::CREATED);
    assert!(empty.data()["items"].as_array().unwrap().is_empty());

    let invalid = app
        .post(
            "/api/v1/checklists",
            json!({ "categoryId": "999", "name": "Fantasma" }),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.error_message(), "Validation error: Categoria inválida.");

    let by_category_name = app.get("/api/v1/checklists?search=geradores").await;
    assert_eq!(by_category_name.data()["total"], 1);
    let by_category = app
        .get(&format!("/api/v1/checklists?categoryId={}", custom_id))
        .await;
    assert_eq!(by_category.data()["total"], 1);
}

#[tokio::test]
async fn list_endpoints_paginate() {
    let app = TestApp::new().await;
    for i in 0..5 {
        app.seed_employee(&format!("Técnico {}", i)).await;
    }

    let page = app.get("/api/v1/employees?page=2&limit=2").await;
    let data = page.data();
    assert_eq!(data["total"], 5);
    assert_eq!(data["page"], 2);
    assert_eq!(data["total_pages"], 3);
    assert_eq!(data["items"].as_array().unwrap().len(), 2);
}
