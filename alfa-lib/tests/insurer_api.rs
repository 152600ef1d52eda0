//! Integration tests against a local stub of the console API.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::Mutex;

use alfa_grid::Column;
use alfa_grid::DynamicTable;
use alfa_grid::Row;
use alfa_grid::TableConfiguration;
use alfa_lib::AlfaClient;
use alfa_lib::api::InsurerService;
use alfa_lib::auth::AuthService;
use alfa_lib::auth::MemorySessionStore;
use alfa_lib::auth::StaticTokenProvider;
use alfa_lib::error::AuthError;
use alfa_lib::error::Error;
use alfa_lib::error::UserFacing;
use alfa_lib::model::Credentials;
use alfa_lib::model::InsurerInput;
use alfa_lib::model::PolicyType;
use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

/// Method, path with query, status, JSON body.
type Route = (&'static str, &'static str, u16, &'static str);

#[derive(Debug, Clone)]
struct SeenRequest {
    method: String,
    path: String,
    authorization: Option<String>,
    body: String,
}

type Seen = Arc<Mutex<Vec<SeenRequest>>>;

const INSURERS: &str = r#"{"aseguradoras": [
    {"id": 1, "nombre": "Seguros Bolívar", "correo_comercial": "comercial@bolivar.com",
     "comisiones_normales": {"HOGAR": 15, "VEHICULO": 10}},
    {"id": 2, "nombre": "Allianz", "contacto_asignado": "Marta Ruiz"},
    {"id": 3, "nombre": "Sura"}
]}"#;

const LOGIN_OK: &str = r#"{
    "success": true,
    "message": "Login exitoso",
    "data": {
        "agente": {"id": 9, "nombre": "Laura Gómez", "correo": "laura@alfa.com", "usuario": "lgomez",
                   "rol": "admin", "activo": true, "fecha_creacion": "2024-03-01T10:00:00Z"},
        "token": "jwt-token",
        "expires_in": 3600
    }
}"#;

async fn serve(routes: Vec<Route>) -> (String, Seen) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let routes = routes.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let routes = routes.clone();
                    let log = log.clone();
                    async move {
                        let method = req.method().to_string();
                        let path = req
                            .uri()
                            .path_and_query()
                            .map(|p| p.to_string())
                            .unwrap_or_default();
                        let authorization = req
                            .headers()
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(String::from);
                        let body = match req.into_body().collect().await {
                            Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).into_owned(),
                            Err(_) => String::new(),
                        };
                        log.lock().unwrap().push(SeenRequest {
                            method: method.clone(),
                            path: path.clone(),
                            authorization,
                            body,
                        });

                        let (status, body) = routes
                            .iter()
                            .find(|(m, p, _, _)| *m == method && *p == path)
                            .map(|(_, _, status, body)| (*status, *body))
                            .unwrap_or((404, r#"{"error": "Ruta no encontrada"}"#));

                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(StatusCode::from_u16(status).unwrap())
                                .header("Content-Type", "application/json")
                                .body(Full::new(Bytes::from(body)))
                                .unwrap(),
                        )
                    }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    (format!("http://{}/api", addr), seen)
}

fn client(url: &str) -> AlfaClient {
    AlfaClient::builder().url(url).build().unwrap()
}

fn seen(seen: &Seen) -> Vec<SeenRequest> {
    seen.lock().unwrap().clone()
}

// =============================================================================
// Insurers
// =============================================================================

#[tokio::test]
async fn test_list_sends_bearer_token() {
    let (url, log) = serve(vec![("GET", "/api/aseguradoras", 200, INSURERS)]).await;
    let service = InsurerService::new(client(&url).with_token_provider(StaticTokenProvider::new("abc")));

    let insurers = service.list(false).await.unwrap();
    assert_eq!(insurers.len(), 3);
    assert_eq!(insurers[0].commission(PolicyType::Hogar), Some(15.0));

    let requests = seen(&log);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer abc"));
}

#[tokio::test]
async fn test_list_with_templates_query() {
    let (url, log) = serve(vec![(
        "GET",
        "/api/aseguradoras?include_plantillas=true",
        200,
        r#"{"aseguradoras": [{"id": 1, "nombre": "Sura", "deducibles": [], "coberturas": [], "financiaciones": [
            {"id": 4, "aseguradora_id": 1, "nombre_financiera": "Finesa", "tasa_efectiva_mensual": 1.9}
        ]}]}"#,
    )])
    .await;
    let service = InsurerService::new(client(&url));

    let insurers = service.list(true).await.unwrap();
    let financings = insurers[0].financings.clone().unwrap_or_default();
    assert_eq!(financings[0].lender_name, "Finesa");
    assert_eq!(seen(&log)[0].authorization, None);
}

#[tokio::test]
async fn test_listed_insurers_feed_a_table() {
    let (url, _) = serve(vec![("GET", "/api/aseguradoras", 200, INSURERS)]).await;
    let insurers = InsurerService::new(client(&url)).list(false).await.unwrap();

    let config = TableConfiguration::new(vec![
        Column::text("id", "ID").sortable(),
        Column::text("aseguradora", "Aseguradora").sortable(),
        Column::text("contacto_asignado", "Contacto"),
    ])
    .paginated(2)
    .searchable("Buscar aseguradoras...");
    let mut table = DynamicTable::with_records(config, insurers.iter().map(Row::from).collect());

    assert_eq!(table.total_pages(), 2);
    table.search("marta");
    assert_eq!(table.view_rows().len(), 1);
    assert_eq!(table.view_rows()[0].value("aseguradora").display(), "Allianz");
}

#[tokio::test]
async fn test_get_not_found_message() {
    let (url, _) = serve(vec![(
        "GET",
        "/api/aseguradoras/99?include_plantillas=true",
        404,
        r#"{"message": "Aseguradora no encontrada"}"#,
    )])
    .await;
    let service = InsurerService::new(client(&url));

    let result = service.get(99, true).await;
    assert!(matches!(&result, Err(Error::Api(e)) if e.status_code() == Some(404)));
    assert_eq!(result.user_facing().unwrap_err(), "Aseguradora no encontrada");
}

#[tokio::test]
async fn test_create_update_delete() {
    let (url, log) = serve(vec![
        (
            "POST",
            "/api/aseguradoras",
            201,
            r#"{"message": "Aseguradora creada", "aseguradora": {"id": 10, "nombre": "Nueva"}}"#,
        ),
        (
            "PUT",
            "/api/aseguradoras/10",
            200,
            r#"{"aseguradora": {"id": 10, "nombre": "Nueva", "correo_reclamaciones": "r@n.com"}}"#,
        ),
        ("DELETE", "/api/aseguradoras/10", 200, r#"{"message": "Aseguradora eliminada"}"#),
    ])
    .await;
    let service = InsurerService::new(client(&url));

    let created = service.create(&InsurerInput::new("Nueva")).await.unwrap();
    assert_eq!(created.id, 10);

    let update = InsurerInput {
        claims_email: Some("r@n.com".into()),
        ..InsurerInput::default()
    };
    let updated = service.update(10, &update).await.unwrap();
    assert_eq!(updated.claims_email.as_deref(), Some("r@n.com"));

    assert_eq!(service.delete(10).await.unwrap(), "Aseguradora eliminada");

    let requests = seen(&log);
    let bodies: Vec<serde_json::Value> = requests
        .iter()
        .take(2)
        .map(|r| serde_json::from_str(&r.body).unwrap())
        .collect();
    assert_eq!(bodies[0], serde_json::json!({"nombre": "Nueva"}));
    assert_eq!(bodies[1], serde_json::json!({"correo_reclamaciones": "r@n.com"}));
    assert_eq!(requests[2].method, "DELETE");
}

#[tokio::test]
async fn test_templates_by_policy_type() {
    let (url, _) = serve(vec![(
        "GET",
        "/api/aseguradoras/1/plantillas/VEHICULO",
        200,
        r#"{"deducibles": [{"id": 1, "aseguradora_id": 1, "tipo_poliza": "VEHICULO", "categoria": "Hurto"}]}"#,
    )])
    .await;
    let templates = InsurerService::new(client(&url))
        .templates(1, PolicyType::Vehiculo)
        .await
        .unwrap();
    assert_eq!(templates.deductibles[0].category, "Hurto");
    assert!(templates.coverages.is_empty());
}

#[tokio::test]
async fn test_server_error_field_preferred() {
    let (url, _) = serve(vec![(
        "POST",
        "/api/aseguradoras/1/financiaciones",
        422,
        r#"{"message": "Validación fallida", "error": "La tasa debe ser positiva"}"#,
    )])
    .await;
    let financing = alfa_lib::model::NewFinancing {
        lender_name: "Finesa".into(),
        monthly_rate: -1.0,
    };
    let result = InsurerService::new(client(&url)).create_financing(1, &financing).await;
    assert_eq!(result.user_facing().unwrap_err(), "La tasa debe ser positiva");
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_login_then_authenticated_calls() {
    let (url, log) = serve(vec![
        ("POST", "/api/auth/agente/login", 200, LOGIN_OK),
        ("GET", "/api/aseguradoras", 200, INSURERS),
    ])
    .await;
    let base = client(&url);
    let auth = Arc::new(AuthService::new(base.clone(), Arc::new(MemorySessionStore::new())));
    let mut agents = auth.subscribe();
    assert!(agents.borrow().is_none());

    assert!(auth.login(&Credentials::new("lgomez", "secreto")).await);
    assert!(auth.is_authenticated());
    assert_eq!(auth.current_token().as_deref(), Some("jwt-token"));
    assert!(agents.has_changed().unwrap());
    assert_eq!(
        agents.borrow_and_update().as_ref().map(|a| a.name.clone()),
        Some("Laura Gómez".to_string())
    );

    let service = InsurerService::new(base.with_token_provider(auth.clone()));
    service.list(false).await.unwrap();

    let requests = seen(&log);
    let login: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(login, serde_json::json!({"usuario": "lgomez", "password": "secreto"}));
    assert_eq!(requests[1].authorization.as_deref(), Some("Bearer jwt-token"));
}

#[tokio::test]
async fn test_login_rejected() {
    let (url, _) = serve(vec![(
        "POST",
        "/api/auth/agente/login",
        200,
        r#"{"success": false, "message": "Error de autenticación", "error": "Credenciales inválidas"}"#,
    )])
    .await;
    let auth = AuthService::new(client(&url), Arc::new(MemorySessionStore::new()));

    let err = auth.try_login(&Credentials::new("lgomez", "mala")).await.unwrap_err();
    assert_eq!(err.user_message(), "Credenciales inválidas");
    assert!(!auth.login(&Credentials::new("lgomez", "mala")).await);
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_login_http_failure_returns_false() {
    let (url, _) = serve(vec![(
        "POST",
        "/api/auth/agente/login",
        401,
        r#"{"success": false, "message": "Usuario o contraseña incorrectos"}"#,
    )])
    .await;
    let auth = AuthService::new(client(&url), Arc::new(MemorySessionStore::new()));
    assert!(!auth.login(&Credentials::new("lgomez", "mala")).await);
}

#[tokio::test]
async fn test_logged_out_calls_never_reach_server() {
    let (url, log) = serve(vec![("GET", "/api/aseguradoras", 200, INSURERS)]).await;
    let base = client(&url);
    let auth = Arc::new(AuthService::new(base.clone(), Arc::new(MemorySessionStore::new())));
    let service = InsurerService::new(base.with_token_provider(auth));

    let result = service.list(false).await;
    assert!(matches!(result, Err(Error::Auth(AuthError::NotAuthenticated))));
    assert!(seen(&log).is_empty());
}
