//! End-to-end API tests against the SeaORM repository on in-memory SQLite.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

mod test_utils;
use test_utils::setup_app;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/productos")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn create_then_fetch_product() {
    let (app, _db) = setup_app().await.unwrap();

    let (status, body) = send(
        &app,
        post(json!({
            "codigo": "tel005",
            "nombre": "Algodón Azul",
            "precio": 28.5,
            "stock_actual": 75,
            "stock_minimo": 15
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Producto creado exitosamente en la base de datos");
    assert_eq!(body["data"]["codigo"], "TEL005");
    assert_eq!(body["data"]["precio"], 28.5);
    assert!(body["data"]["fecha_creacion"].is_string());

    let id = body["data"]["id"].as_i64().unwrap();
    let (status, body) = send(&app, get(&format!("/api/productos/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nombre"], "Algodón Azul");
    assert!(body["data"]["tipo_tela"].is_null());
}

#[tokio::test]
async fn duplicate_codigo_is_rejected() {
    let (app, _db) = setup_app().await.unwrap();
    let producto = json!({"codigo": "TEL001", "nombre": "Lino", "precio": 10});

    let (status, _) = send(&app, post(producto.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same code after normalization
    let (status, body) = send(
        &app,
        post(json!({"codigo": " tel001 ", "nombre": "Otro", "precio": 12})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "CODIGO_DUPLICADO");
    assert_eq!(body["message"], "El código del producto ya existe en el sistema");

    let (_, list) = send(&app, get("/api/productos")).await;
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn invalid_creates_leave_storage_untouched() {
    let (app, _db) = setup_app().await.unwrap();

    for body in [
        json!({"nombre": "Lino", "precio": 10}),
        json!({"codigo": "A1", "precio": 10}),
        json!({"codigo": "A1", "nombre": "Lino"}),
        json!({"codigo": "A1", "nombre": "Lino", "precio": 0}),
        json!({"codigo": "A1", "nombre": "Lino", "precio": -5}),
        json!({"codigo": "A1", "nombre": "Lino", "precio": "abc"}),
    ] {
        let (status, response) = send(&app, post(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["success"], false);
    }

    let (_, list) = send(&app, get("/api/productos")).await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn lookup_errors() {
    let (app, _db) = setup_app().await.unwrap();

    let (status, body) = send(&app, get("/api/productos/999999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("999999"));

    let (status, _) = send(&app, get("/api/productos/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/api/productos/99999999999")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summary_of_empty_inventory() {
    let (app, _db) = setup_app().await.unwrap();

    let (status, body) = send(&app, get("/api/inventario")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Resumen de inventario obtenido correctamente");
    assert_eq!(body["data"]["totalProductos"], 0);
    assert_eq!(body["data"]["productosStockBajo"], 0);
    assert_eq!(body["data"]["valorTotal"], "0.00");
    assert_eq!(body["data"]["productosConStockBajo"], json!([]));
}

#[tokio::test]
async fn summary_lists_exactly_the_low_stock_products() {
    let (app, _db) = setup_app().await.unwrap();

    for body in [
        json!({"codigo": "TEL001", "nombre": "Algodón", "precio": 25.5, "stock_actual": 100, "stock_minimo": 10}),
        json!({"codigo": "TEL002", "nombre": "Poliéster", "precio": "18.75", "stock_actual": "5", "stock_minimo": 5}),
        json!({"codigo": "TEL003", "nombre": "Seda", "precio": 45, "stock_actual": 3}),
    ] {
        let (status, _) = send(&app, post(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, get("/api/inventario")).await;
    let data = &body["data"];

    assert_eq!(data["totalProductos"], 3);
    assert_eq!(data["productosStockBajo"], 2);
    // 25.5*100 + 18.75*5 + 45*3
    assert_eq!(data["valorTotal"], "2778.75");

    let low: Vec<&str> = data["productosConStockBajo"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["codigo"].as_str().unwrap())
        .collect();
    assert_eq!(low, vec!["TEL003", "TEL002"]);

    let (_, list) = send(&app, get("/api/productos")).await;
    for producto in list["data"].as_array().unwrap() {
        let bajo = producto["stock_actual"].as_i64() <= producto["stock_minimo"].as_i64();
        let listed = low.contains(&producto["codigo"].as_str().unwrap());
        assert_eq!(bajo, listed);
    }
}

#[tokio::test]
async fn unmatched_route_returns_json_404() {
    let (app, _db) = setup_app().await.unwrap();

    let (status, body) = send(&app, get("/api/clientes?x=1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["ruta"], "/api/clientes?x=1");
    assert_eq!(body["metodo"], "GET");
}

#[tokio::test]
async fn service_info_and_readiness() {
    let (app, _db) = setup_app().await.unwrap();

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "inventario-textil");

    let (status, _) = send(&app, get("/readyz")).await;
    assert_eq!(status, StatusCode::OK);
}
