// End-to-end tests of the gateway router against a fake dealership backend.

use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, Path},
    http::{HeaderMap, Request, StatusCode, header},
    routing::{delete, get, patch, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

use mycar_catalog::{AppState, config::Settings, routes::create_router};

fn backend_listing(id: i64, make: &str, price: f64, fuel: &str, km: Value) -> Value {
    json!({
        "id": id,
        "descripcion": format!("{make} usado, único dueño"),
        "auto": {
            "marca": make,
            "modelo": "Base",
            "precio": price,
            "anio": 2019,
            "km": km,
            "color": "Gris",
            "fichaTecnica": {
                "motor": "1.6",
                "combustible": fuel,
                "caja": "Manual",
                "puertas": 5,
                "potencia": "110"
            },
            "imagenesUrl": [format!("/uploads/{id}.jpg")]
        },
        "estado": "ACEPTADA",
        "vendedorEmail": "ventas@mycar.com",
        "nombreVendedor": "MyCar",
        "vendedorTelefono": "1122334455"
    })
}

fn reservation(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "usuarioReserva": { "nombre": "Ana", "email": "ana@example.com", "telefono": "1144556677" },
        "fecha": "2099-05-01T10:30:00",
        "idPublicacion": 2,
        "montoReserva": 500.0,
        "estadoReserva": status
    })
}

fn pending(mut listing: Value) -> Value {
    listing["estado"] = json!("PENDIENTE");
    listing
}

// Echoes the submitted listing back as the created one, with one image URL per uploaded file
async fn accept_submission(headers: HeaderMap, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    if !is_bearer(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(Value::Null));
    }
    let mut listing = Value::Null;
    let mut images = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name().unwrap_or_default().to_string().as_str() {
            "publicacion" => listing = serde_json::from_str(&field.text().await.unwrap()).unwrap(),
            "files" => images.push(json!(format!("/uploads/{}", field.file_name().unwrap()))),
            _ => {}
        }
    }
    listing["id"] = json!(40);
    listing["estado"] = json!("PENDIENTE");
    listing["auto"]["imagenesUrl"] = Value::Array(images);
    (StatusCode::OK, Json(listing))
}

fn is_bearer(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer secret-token")
}

async fn spawn_backend() -> String {
    let backend = Router::new()
        .route(
            "/publicacion/tienda",
            get(|| async {
                Json(json!([
                    backend_listing(1, "Fiat", 12_000.0, "Nafta", json!("60.000 km")),
                    backend_listing(2, "Toyota", 30_000.0, "Diesel", json!(20000)),
                    backend_listing(3, "Ford", 18_000.0, "Diesel", json!("35000")),
                ]))
            }),
        )
        .route(
            "/publicacion/usados",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database down") }),
        )
        .route(
            "/reserva/crear",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                if !is_bearer(&headers) {
                    return (StatusCode::UNAUTHORIZED, String::new());
                }
                if body["idPublicacion"] == json!(99) {
                    return (StatusCode::OK, "reserva registrada".to_string());
                }
                (StatusCode::OK, "https://pagos.example.com/checkout/abc".to_string())
            }),
        )
        .route(
            "/reserva/admin/lista",
            get(|| async { Json(json!([reservation(7, "PENDIENTE")])) }),
        )
        .route(
            "/reserva/modificar-reserva",
            axum::routing::put(|Json(body): Json<Value>| async move { Json(body) }),
        )
        .route("/publicacion/crearPublicacion", post(accept_submission))
        .route(
            "/publicacion/admin/pendientes",
            get(|| async { Json(json!([pending(backend_listing(5, "Chevrolet", 9_000.0, "Nafta", json!("80000")))])) }),
        )
        .route(
            "/publicacion/admin/aprobar/:id",
            patch(|Path(id): Path<i64>| async move { Json(backend_listing(id, "Chevrolet", 9_000.0, "Nafta", json!("80000"))) }),
        )
        .route(
            "/publicacion/admin/rechazar/:id",
            delete(|Path(id): Path<i64>| async move {
                if id == 5 { StatusCode::OK } else { StatusCode::NOT_FOUND }
            }),
        )
        .route(
            "/publicacion/:id",
            axum::routing::delete(|Path(id): Path<i64>| async move {
                if id == 1 { StatusCode::OK } else { StatusCode::FORBIDDEN }
            }),
        )
        .route(
            "/usuario/login",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "token": "secret-token", "id": 1, "rol": "ADMIN", "email": body["email"] }))
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, backend.into_make_service()).await.unwrap();
    });
    format!("http://{addr}")
}

async fn gateway() -> Router {
    let backend_url = spawn_backend().await;
    let settings = Settings {
        server_address: "127.0.0.1:0".into(),
        backend_url,
    };
    create_router(AppState::new(settings, reqwest::Client::new()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

const BOUNDARY: &str = "mycar-listing-boundary";

fn submission_listing(description: &str) -> Value {
    json!({
        "descripcion": description,
        "auto": {
            "marca": "Peugeot",
            "modelo": "208",
            "precio": 18500,
            "anio": 2021,
            "km": "32000",
            "color": "Blanco",
            "fichaTecnica": {
                "motor": "1.6",
                "combustible": "Nafta",
                "caja": "Manual",
                "puertas": "5",
                "potencia": "115"
            }
        }
    })
}

fn submission_request(listing: Option<Value>, images: &[&str]) -> Request<Body> {
    let mut body = Vec::new();
    if let Some(listing) = listing {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"publicacion\"\r\nContent-Type: application/json\r\n\r\n{listing}\r\n"
            )
            .as_bytes(),
        );
    }
    for image in images {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{image}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/listings")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(header::AUTHORIZATION, "Bearer secret-token")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_check_reports_backend() {
    let (status, body) = send(gateway().await, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert!(body["backendUrl"].as_str().unwrap().starts_with("http://127.0.0.1:"));
}

#[tokio::test]
async fn unknown_catalog_kind_is_a_json_bad_request() {
    let (status, body) = send(gateway().await, get_request("/api/catalog/boats")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_range_query_is_a_json_bad_request() {
    let (status, body) = send(gateway().await, get_request("/api/catalog/store?priceMax=cheap")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn listing_submission_is_forwarded_with_its_images() {
    let app = gateway().await;
    let request = submission_request(
        Some(submission_listing("Peugeot 208 con service oficial")),
        &["frente.jpg", "interior.jpg"],
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], json!(40));
    assert_eq!(body["estado"], json!("PENDIENTE"));
    assert_eq!(body["descripcion"], json!("Peugeot 208 con service oficial"));
    let images = body["auto"]["imagenesUrl"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert!(images[0].as_str().unwrap().ends_with("/uploads/frente.jpg"));
    assert!(images[1].as_str().unwrap().starts_with("http://127.0.0.1:"));
}

#[tokio::test]
async fn listing_submission_without_images_is_rejected() {
    let app = gateway().await;
    let request = submission_request(Some(submission_listing("Peugeot 208 con service oficial")), &[]);
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("at least one image"));
}

#[tokio::test]
async fn listing_submission_without_listing_part_is_rejected() {
    let app = gateway().await;
    let (status, body) = send(app, submission_request(None, &["frente.jpg"])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("publicacion"));
}

#[tokio::test]
async fn invalid_listing_submission_never_reaches_the_backend() {
    let app = gateway().await;
    let (status, body) = send(app, submission_request(Some(submission_listing("Hey")), &["frente.jpg"])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("description"));
}

#[tokio::test]
async fn moderation_lists_approves_and_rejects() {
    let app = gateway().await;

    let (status, body) = send(
        app.clone(),
        json_request("GET", "/api/admin/listings/pending", json!(null), Some("secret-token")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], json!(5));
    assert_eq!(body[0]["estado"], json!("PENDIENTE"));

    let (status, body) = send(
        app.clone(),
        json_request("POST", "/api/admin/listings/5/approve", json!({}), Some("secret-token")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(5));
    assert_eq!(body["estado"], json!("ACEPTADA"));

    let (status, _) = send(
        app.clone(),
        json_request("POST", "/api/admin/listings/5/reject", json!({}), Some("secret-token")),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        app,
        json_request("POST", "/api/admin/listings/6/reject", json!({}), Some("secret-token")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_catalog_is_filtered_and_sorted() {
    let app = gateway().await;
    let (status, body) = send(app, get_request("/api/catalog/store?fuel=Diesel&sort=desc&mileageMax=30000")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], json!(true));
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["listings"][0]["id"], json!(2));
    assert_eq!(body["bounds"]["priceMax"], json!(30000.0));
    assert_eq!(body["filters"]["sortOrder"], json!("desc"));
}

#[tokio::test]
async fn store_catalog_without_filters_keeps_backend_order() {
    let app = gateway().await;
    let (status, body) = send(app, get_request("/api/catalog/tienda")).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["listings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    // Relative image paths come back absolute
    let image = body["listings"][0]["auto"]["imagenesUrl"][0].as_str().unwrap();
    assert!(image.starts_with("http://127.0.0.1:"));
    assert!(image.ends_with("/uploads/1.jpg"));
}

#[tokio::test]
async fn failed_catalog_fetch_is_reported_unavailable() {
    let app = gateway().await;
    let (status, body) = send(app, get_request("/api/catalog/used?fuel=Nafta")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["available"], json!(false));
    assert_eq!(body["total"], json!(0));
    assert_eq!(body["listings"], json!([]));
    assert_eq!(body["bounds"]["priceMax"], json!(1000000.0));
    assert!(body["notice"].as_str().unwrap().contains("unavailable"));
}

#[tokio::test]
async fn unknown_filter_values_are_bad_requests() {
    let app = gateway().await;
    let (status, body) = send(app, get_request("/api/catalog/store?fuel=Steam")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Steam"));
}

#[tokio::test]
async fn reservations_require_a_bearer_token() {
    let app = gateway().await;
    let body = json!({
        "usuarioReservaDTO": { "nombre": "Ana", "email": "ana@example.com", "telefono": "1144556677" },
        "idPublicacion": 2,
        "fecha": "2099-05-01T10:30:00"
    });
    let (status, _) = send(app, json_request("POST", "/api/reservations", body, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reservation_returns_payment_url() {
    let app = gateway().await;
    let body = json!({
        "usuarioReservaDTO": { "nombre": "Ana", "email": "ana@example.com", "telefono": "1144556677" },
        "idPublicacion": 2,
        "fecha": "2099-05-01T10:30:00"
    });
    let (status, body) = send(app, json_request("POST", "/api/reservations", body, Some("secret-token"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paymentUrl"], json!("https://pagos.example.com/checkout/abc"));
}

#[tokio::test]
async fn reservation_without_payment_url_is_a_gateway_error() {
    let app = gateway().await;
    let body = json!({
        "usuarioReservaDTO": { "nombre": "Ana", "email": "ana@example.com", "telefono": "1144556677" },
        "idPublicacion": 99,
        "fecha": "2099-05-01T10:30:00"
    });
    let (status, _) = send(app, json_request("POST", "/api/reservations", body, Some("secret-token"))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn past_reservation_dates_are_rejected_before_the_backend() {
    let app = gateway().await;
    let body = json!({
        "usuarioReservaDTO": { "nombre": "Ana", "email": "ana@example.com", "telefono": "1144556677" },
        "idPublicacion": 2,
        "fecha": "2001-01-01T09:00:00"
    });
    let (status, _) = send(app, json_request("POST", "/api/reservations", body, Some("secret-token"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_accepts_a_known_reservation() {
    let app = gateway().await;
    let (status, body) = send(
        app.clone(),
        json_request("POST", "/api/admin/reservations/7/accept", json!({}), Some("secret-token")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estadoReserva"], json!("ACEPTADA"));

    let (status, _) = send(
        app,
        json_request("POST", "/api/admin/reservations/8/reject", json!({}), Some("secret-token")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn backend_refusals_are_passed_on() {
    let app = gateway().await;
    let delete = |id: i64| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/listings/{id}"))
            .header(header::AUTHORIZATION, "Bearer secret-token")
            .body(Body::empty())
            .unwrap()
    };

    let (status, _) = send(app.clone(), delete(1)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(app, delete(2)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("not allowed"));
}

#[tokio::test]
async fn login_returns_the_backend_session() {
    let app = gateway().await;
    let credentials = json!({ "email": "admin@mycar.com", "password": "hunter22" });
    let (status, body) = send(app, json_request("POST", "/api/auth/login", credentials, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], json!("secret-token"));
    assert_eq!(body["rol"], json!("ADMIN"));
}
