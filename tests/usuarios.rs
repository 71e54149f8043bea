//! End-to-end behaviour of the `/api` surface, driven in-process.

use bytes::Bytes;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use usuarios::{Config, Environment, Service, SharedStore, UserStore, app};

struct Harness {
    service: Service,
    store: SharedStore,
}

impl Harness {
    async fn send(&self, method: &str, path: &str, body: Option<Value>) -> (u16, Vec<u8>) {
        let mut builder = http::Request::builder().method(method).uri(path);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Bytes::from(serde_json::to_vec(&v).unwrap())
            }
            None => Bytes::new(),
        };
        let res = self.service.call(builder.body(body).unwrap()).await;
        (res.status_code(), res.body().to_vec())
    }

    async fn json(&self, method: &str, path: &str, body: Option<Value>) -> (u16, Value) {
        let (status, bytes) = self.send(method, path, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn text(&self, method: &str, path: &str, body: Option<Value>) -> (u16, String) {
        let (status, bytes) = self.send(method, path, body).await;
        (status, String::from_utf8(bytes).unwrap())
    }

    async fn send_raw(&self, method: &str, path: &str, body: &'static str) -> (u16, String) {
        let req = http::Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap();
        let res = self.service.call(req).await;
        (res.status_code(), String::from_utf8_lossy(res.body()).into_owned())
    }

    fn names(&self) -> Vec<String> {
        self.store.lock().list().iter().map(|u| u.nombre.clone()).collect()
    }
}

#[fixture]
fn harness() -> Harness {
    let config = Config {
        environment: Environment::Production,
        static_dir: "does-not-exist".into(),
        ..Config::default()
    };
    let store = SharedStore::new(UserStore::seeded());
    let service = app::router(&config, store.clone()).into_service();
    Harness { service, store }
}

#[rstest]
#[tokio::test]
async fn seeded_crud_walkthrough(harness: Harness) {
    let (status, list) = harness.json("GET", "/api/usuarios", None).await;
    assert_eq!(status, 200);
    assert_eq!(
        list,
        json!([
            {"id": 1, "nombre": "Juan"},
            {"id": 2, "nombre": "Karen"},
            {"id": 3, "nombre": "Diego"},
            {"id": 4, "nombre": "Luis"},
        ]),
    );

    let (status, user) = harness.json("GET", "/api/usuarios/2", None).await;
    assert_eq!((status, user), (200, json!({"id": 2, "nombre": "Karen"})));

    let (status, user) = harness.json("POST", "/api/usuarios", Some(json!({"nombre": "Eva"}))).await;
    assert_eq!((status, user), (200, json!({"id": 5, "nombre": "Eva"})));
    let (_, list) = harness.json("GET", "/api/usuarios", None).await;
    assert_eq!(list.as_array().map(Vec::len), Some(5));

    let (status, user) = harness.json("DELETE", "/api/usuarios/1", None).await;
    assert_eq!((status, user), (200, json!({"id": 1, "nombre": "Juan"})));

    let (status, message) = harness.text("GET", "/api/usuarios/1", None).await;
    assert_eq!(status, 404);
    assert_eq!(message, "El usuario 1 no se encuentra");
}

#[rstest]
#[case(json!({"nombre": "Al"}), "\"nombre\" length must be at least 3 characters long")]
#[case(json!({}), "\"nombre\" is required")]
#[case(json!({"nombre": 123}), "\"nombre\" must be a string")]
#[tokio::test]
async fn create_rejects_invalid_names(harness: Harness, #[case] body: Value, #[case] message: &str) {
    let (status, text) = harness.text("POST", "/api/usuarios", Some(body)).await;
    assert_eq!(status, 400);
    assert_eq!(text, message);
    assert_eq!(harness.names().len(), 4);
}

#[rstest]
#[tokio::test]
async fn create_rejects_malformed_json(harness: Harness) {
    let (status, text) = harness.send_raw("POST", "/api/usuarios", r#"{"nombre":"#).await;
    assert_eq!(status, 400);
    assert!(text.starts_with("invalid request body"), "{text}");
    assert_eq!(harness.names().len(), 4);
}

#[rstest]
#[case(r#"["Eva"]"#)]
#[case(r#""Eva""#)]
#[case("5")]
#[case("null")]
#[tokio::test]
async fn create_rejects_non_object_json(harness: Harness, #[case] body: &'static str) {
    let (status, text) = harness.send_raw("POST", "/api/usuarios", body).await;
    assert_eq!((status, text.as_str()), (400, "request body must be a JSON object"));
    assert_eq!(harness.names().len(), 4);
}

#[rstest]
#[tokio::test]
async fn create_accepts_form_bodies(harness: Harness) {
    let req = http::Request::post("/api/usuarios")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Bytes::from_static(b"nombre=Ana"))
        .unwrap();
    let res = harness.service.call(req).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.body(), br#"{"id":5,"nombre":"Ana"}"#);
}

#[rstest]
#[tokio::test]
async fn update_validates_and_keeps_old_name(harness: Harness) {
    let (status, text) = harness.text("PUT", "/api/usuarios/3", Some(json!({"nombre": "Bo"}))).await;
    assert_eq!(status, 400);
    assert_eq!(text, "\"nombre\" length must be at least 3 characters long");
    assert_eq!(harness.names()[2], "Diego");

    let (status, user) = harness.json("PUT", "/api/usuarios/3", Some(json!({"nombre": "Roberto"}))).await;
    assert_eq!((status, user), (200, json!({"id": 3, "nombre": "Roberto"})));
    let (_, user) = harness.json("GET", "/api/usuarios/3", None).await;
    assert_eq!(user["nombre"], "Roberto");
}

#[rstest]
#[case(r#"{"nombre":"#)]
#[case(r#"["Roberto"]"#)]
#[tokio::test]
async fn update_rejects_undecodable_bodies(harness: Harness, #[case] body: &'static str) {
    let (status, text) = harness.send_raw("PUT", "/api/usuarios/3", body).await;
    assert_eq!(status, 400);
    assert!(text.starts_with("invalid request body") || text == "request body must be a JSON object", "{text}");
    assert_eq!(harness.names()[2], "Diego");
}

#[rstest]
#[tokio::test]
async fn update_checks_existence_before_body(harness: Harness) {
    let (status, text) = harness.text("PUT", "/api/usuarios/99", Some(json!({"nombre": "x"}))).await;
    assert_eq!(status, 404);
    assert_eq!(text, "El usuario 99 no se encuentra");

    let (status, text) = harness.send_raw("PUT", "/api/usuarios/99", r#"{"nombre":"#).await;
    assert_eq!((status, text.as_str()), (404, "El usuario 99 no se encuentra"));
}

#[rstest]
#[case("GET")]
#[case("PUT")]
#[case("DELETE")]
#[tokio::test]
async fn unknown_or_unparseable_ids_are_404(harness: Harness, #[case] method: &str) {
    for id in ["99", "abc", "0"] {
        let body = (method == "PUT").then(|| json!({"nombre": "Roberto"}));
        let (status, text) = harness.text(method, &format!("/api/usuarios/{id}"), body).await;
        assert_eq!(status, 404, "{method} {id}");
        assert_eq!(text, format!("El usuario {id} no se encuentra"));
    }
    assert_eq!(harness.names(), ["Juan", "Karen", "Diego", "Luis"]);
}

#[rstest]
#[tokio::test]
async fn signed_ids_resolve_like_plain_ones(harness: Harness) {
    let (status, user) = harness.json("GET", "/api/usuarios/+2", None).await;
    assert_eq!((status, user), (200, json!({"id": 2, "nombre": "Karen"})));
}

#[rstest]
#[tokio::test]
async fn trailing_slash_reaches_the_same_routes(harness: Harness) {
    let (status, list) = harness.json("GET", "/api/usuarios/", None).await;
    assert_eq!(status, 200);
    assert_eq!(list.as_array().map(Vec::len), Some(4));

    let (status, user) = harness.json("GET", "/api/usuarios/2/", None).await;
    assert_eq!((status, user), (200, json!({"id": 2, "nombre": "Karen"})));
}

#[rstest]
#[tokio::test]
async fn deleted_ids_are_not_reassigned(harness: Harness) {
    harness.send("DELETE", "/api/usuarios/4", None).await;
    let (_, user) = harness.json("POST", "/api/usuarios", Some(json!({"nombre": "Eva"}))).await;
    assert_eq!(user["id"], 5);
    let (_, user) = harness.json("POST", "/api/usuarios", Some(json!({"nombre": "Pía"}))).await;
    assert_eq!(user["id"], 6);
}

#[rstest]
#[tokio::test]
async fn products_and_greeting(harness: Harness) {
    let (status, products) = harness.json("GET", "/api/productos", None).await;
    assert_eq!((status, products), (200, json!(["mouse", "teclado", "bocinas"])));

    let (status, text) = harness.text("GET", "/", None).await;
    assert_eq!((status, text.as_str()), (200, "Hola mundo desde Express!!"));
}

#[rstest]
#[tokio::test]
async fn echoes_query_for_year_and_month(harness: Harness) {
    let (status, query) = harness
        .json("GET", "/api/usuarios/1990/2?nombre=xxxx&single=y&tag=a&tag=b", None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(query, json!({"nombre": "xxxx", "single": "y", "tag": ["a", "b"]}));

    let (_, query) = harness.json("GET", "/api/usuarios/1990/2", None).await;
    assert_eq!(query, json!({}));
}

#[rstest]
#[tokio::test]
async fn health_endpoints_report_ready(harness: Harness) {
    let (status, text) = harness.text("GET", "/healthz", None).await;
    assert_eq!((status, text.as_str()), (200, "ok"));

    let res = harness.service.call(http::Request::get("/readyz").body(Bytes::new()).unwrap()).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("x-user-count"), Some("4"));
}

#[rstest]
#[tokio::test]
async fn unrouted_requests_get_framework_errors(harness: Harness) {
    let (status, text) = harness.text("GET", "/api/clientes", None).await;
    assert_eq!((status, text.as_str()), (404, "Cannot GET /api/clientes"));

    let (status, _) = harness.send("PATCH", "/api/usuarios/1", None).await;
    assert_eq!(status, 405);
}
