//! HTTP router.
//!
//! Resource paths keep the clinic's Portuguese naming. Layers, innermost
//! first: request timeout, timeout reporting, audit logger. The audit logger
//! is outermost so timed-out requests are logged and carry a request id.
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::timeout::TimeoutLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the clinic API router over shared state.
pub fn api_router(core: Arc<CoreState>, request_timeout: Duration) -> Router {
    build_router(ApiContext::new(core), request_timeout)
}

fn with_boundary_layers(routes: Router, request_timeout: Duration) -> Router {
    routes
        .layer(TimeoutLayer::new(request_timeout))
        .layer(axum::middleware::from_fn(middleware::deadline::report_timeout))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
}

fn build_router(ctx: ApiContext, request_timeout: Duration) -> Router {
    use endpoints::{claims, dentists, diagnoses, health, patients, procedures};

    let routes = Router::new()
        .route("/health", get(health::check))
        .route("/dentistas", get(dentists::list).post(dentists::create))
        .route(
            "/dentistas/:id",
            get(dentists::detail)
                .put(dentists::update)
                .delete(dentists::deactivate),
        )
        .route("/dentistas/:id/reativar", post(dentists::reactivate))
        .route("/pacientes", get(patients::list).post(patients::create))
        .route("/pacientes/busca", get(patients::search))
        .route(
            "/pacientes/:id",
            get(patients::detail)
                .put(patients::update)
                .delete(patients::deactivate),
        )
        .route("/procedimentos", get(procedures::list).post(procedures::create))
        .route("/procedimentos/suspeitas-fraude", get(procedures::fraud_risk))
        .route(
            "/procedimentos/:id",
            get(procedures::detail)
                .put(procedures::update)
                .delete(procedures::delete),
        )
        .route("/diagnosticos", get(diagnoses::list).post(diagnoses::create))
        .route(
            "/diagnosticos/:id",
            get(diagnoses::detail)
                .put(diagnoses::update)
                .delete(diagnoses::delete),
        )
        .route("/sinistros", get(claims::list).post(claims::create))
        .route("/sinistros/suspeitas-fraude", get(claims::fraud_risk))
        .route(
            "/sinistros/:id",
            get(claims::detail).put(claims::update).delete(claims::delete),
        )
        .with_state(ctx);

    with_boundary_layers(routes, request_timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let core = Arc::new(CoreState::in_memory().unwrap());
        api_router(core, Duration::from_secs(5))
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        app.clone().oneshot(request(method, uri, body)).await.unwrap()
    }

    async fn json_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn seed_people(app: &Router) -> (i64, i64) {
        let dentist = send(
            app,
            "POST",
            "/dentistas",
            Some(json!({"nome": "Dr. Silva", "numeroLicenca": "CRO12345"})),
        )
        .await;
        assert_eq!(dentist.status(), StatusCode::CREATED);
        let patient = send(
            app,
            "POST",
            "/pacientes",
            Some(json!({"nome": "Ana", "cpf": "111.111.111-11", "idade": 30})),
        )
        .await;
        assert_eq!(patient.status(), StatusCode::CREATED);
        (
            json_of(dentist).await["id"].as_i64().unwrap(),
            json_of(patient).await["id"].as_i64().unwrap(),
        )
    }

    #[tokio::test]
    async fn health_reports_schema_version() {
        let response = send(&app(), "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let json = json_of(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["schema_version"], 2);
    }

    #[tokio::test]
    async fn dentist_lifecycle() {
        let app = app();
        let created = send(
            &app,
            "POST",
            "/dentistas",
            Some(json!({"nome": "Dr. Silva", "numeroLicenca": "CRO12345"})),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = json_of(created).await;
        assert_eq!(created["ativo"], true);
        let id = created["id"].as_i64().unwrap();

        let updated = send(
            &app,
            "PUT",
            &format!("/dentistas/{id}"),
            Some(json!({"nome": "Dr. Silva Neto", "numeroLicenca": "CRO12345"})),
        )
        .await;
        assert_eq!(json_of(updated).await["nome"], "Dr. Silva Neto");

        let deleted = send(&app, "DELETE", &format!("/dentistas/{id}"), None).await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
        let gone = send(&app, "GET", &format!("/dentistas/{id}"), None).await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_of(gone).await["error"]["code"], "DENTISTA_NOT_FOUND");

        let back = send(&app, "POST", &format!("/dentistas/{id}/reativar"), None).await;
        assert_eq!(back.status(), StatusCode::OK);
        let listed = json_of(send(&app, "GET", "/dentistas?nome=Neto", None).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_license_returns_field_errors() {
        let response = send(
            &app(),
            "POST",
            "/dentistas",
            Some(json!({"nome": "Dr. Silva", "numeroLicenca": "12345"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_of(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(json["error"]["fields"][0]["field"], "numeroLicenca");
    }

    #[tokio::test]
    async fn duplicate_license_is_conflict() {
        let app = app();
        let body = json!({"nome": "Dr. Silva", "numeroLicenca": "CRO12345"});
        send(&app, "POST", "/dentistas", Some(body.clone())).await;
        let again = send(&app, "POST", "/dentistas", Some(body)).await;
        assert_eq!(again.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn malformed_json_and_path_are_bad_requests() {
        let app = app();
        let bad_body = Request::builder()
            .method("POST")
            .uri("/pacientes")
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(bad_body).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"]["code"], "BAD_REQUEST");

        let bad_id = send(&app, "GET", "/pacientes/abc", None).await;
        assert_eq!(bad_id.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn created_patient_appears_in_listing_immediately() {
        let app = app();
        let empty = json_of(send(&app, "GET", "/pacientes", None).await).await;
        assert!(empty.as_array().unwrap().is_empty());

        send(
            &app,
            "POST",
            "/pacientes",
            Some(json!({"nome": "Ana", "cpf": "111.111.111-11", "idade": 30})),
        )
        .await;
        let listed = json_of(send(&app, "GET", "/pacientes", None).await).await;
        let names: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["nome"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ana"]);
    }

    #[tokio::test]
    async fn deactivated_patient_is_hidden_but_still_referenced() {
        let app = app();
        let (dentist_id, patient_id) = seed_people(&app).await;
        let proc = send(
            &app,
            "POST",
            "/procedimentos",
            Some(json!({
                "tipoProcedimento": "Limpeza",
                "dataProcedimento": "2024-01-10",
                "custo": 150.0,
                "pacienteId": patient_id,
                "dentistaId": dentist_id
            })),
        )
        .await;
        let proc_id = json_of(proc).await["id"].as_i64().unwrap();

        let deleted = send(&app, "DELETE", &format!("/pacientes/{patient_id}"), None).await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let listed = json_of(send(&app, "GET", "/pacientes", None).await).await;
        assert!(listed.as_array().unwrap().is_empty());
        let direct = send(&app, "GET", &format!("/pacientes/{patient_id}"), None).await;
        assert_eq!(direct.status(), StatusCode::NOT_FOUND);

        let fetched = json_of(send(&app, "GET", &format!("/procedimentos/{proc_id}"), None).await).await;
        assert_eq!(fetched["pacienteId"], patient_id);
    }

    #[tokio::test]
    async fn fraud_flag_scenario() {
        let app = app();
        let (dentist_id, patient_id) = seed_people(&app).await;
        let body = json!({
            "tipoProcedimento": "Limpeza",
            "dataProcedimento": "2024-01-10",
            "custo": 150.0,
            "riscoFraude": false,
            "pacienteId": patient_id,
            "dentistaId": dentist_id
        });
        let created = send(&app, "POST", "/procedimentos", Some(body.clone())).await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let id = json_of(created).await["id"].as_i64().unwrap();

        let none = json_of(send(&app, "GET", "/procedimentos/suspeitas-fraude", None).await).await;
        assert!(none.as_array().unwrap().is_empty());

        let mut flagged = body;
        flagged["riscoFraude"] = json!(true);
        let updated = send(&app, "PUT", &format!("/procedimentos/{id}"), Some(flagged)).await;
        assert_eq!(updated.status(), StatusCode::OK);

        let fraud = json_of(send(&app, "GET", "/procedimentos/suspeitas-fraude", None).await).await;
        let ids: Vec<i64> = fraud
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![id]);
    }

    #[tokio::test]
    async fn dangling_dentist_returns_404_and_inserts_nothing() {
        let app = app();
        let (_, patient_id) = seed_people(&app).await;
        let response = send(
            &app,
            "POST",
            "/procedimentos",
            Some(json!({
                "tipoProcedimento": "Limpeza",
                "dataProcedimento": "2024-01-10",
                "custo": 150.0,
                "pacienteId": patient_id,
                "dentistaId": 999
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_of(response).await["error"]["code"], "DENTISTA_NOT_FOUND");

        let all = json_of(send(&app, "GET", "/procedimentos", None).await).await;
        assert!(all.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn diagnosis_and_claim_routes() {
        let app = app();
        let (dentist_id, patient_id) = seed_people(&app).await;

        let diag = send(
            &app,
            "POST",
            "/diagnosticos",
            Some(json!({
                "tipoDiagnostico": "Cárie",
                "dataDiagnostico": "2024-01-05",
                "descricao": "Molar inferior",
                "pacienteId": patient_id
            })),
        )
        .await;
        assert_eq!(diag.status(), StatusCode::CREATED);
        let filtered = json_of(send(&app, "GET", "/diagnosticos?aposData=2024-02-01", None).await).await;
        assert!(filtered.as_array().unwrap().is_empty());

        let proc = send(
            &app,
            "POST",
            "/procedimentos",
            Some(json!({
                "tipoProcedimento": "Canal",
                "dataProcedimento": "2024-01-10",
                "custo": 900.0,
                "pacienteId": patient_id,
                "dentistaId": dentist_id
            })),
        )
        .await;
        let proc_id = json_of(proc).await["id"].as_i64().unwrap();

        let claim = send(
            &app,
            "POST",
            "/sinistros",
            Some(json!({
                "tipoSinistro": "Reembolso",
                "dataSinistro": "2024-01-20",
                "riscoFraude": true,
                "procedimentoId": proc_id,
                "dentistaId": dentist_id,
                "pacienteId": patient_id
            })),
        )
        .await;
        assert_eq!(claim.status(), StatusCode::CREATED);

        let fraud = json_of(send(&app, "GET", "/sinistros/suspeitas-fraude", None).await).await;
        assert_eq!(fraud.as_array().unwrap().len(), 1);

        let blocked = send(&app, "DELETE", &format!("/procedimentos/{proc_id}"), None).await;
        assert_eq!(blocked.status(), StatusCode::CONFLICT);

        let missing = send(&app, "GET", "/sinistros/99", None).await;
        assert_eq!(json_of(missing).await["error"]["code"], "SINISTRO_NOT_FOUND");
    }

    #[tokio::test]
    async fn patient_search_by_plan() {
        let app = app();
        for (name, cpf, plan) in [
            ("Ana", "111.111.111-11", Some("OdontoPrev")),
            ("Bruno", "222.222.222-22", None),
        ] {
            send(
                &app,
                "POST",
                "/pacientes",
                Some(json!({"nome": name, "cpf": cpf, "idade": 40, "planoOdontologico": plan})),
            )
            .await;
        }
        let found = json_of(send(&app, "GET", "/pacientes/busca?plano=OdontoPrev", None).await).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["nome"], "Ana");
    }

    #[tokio::test]
    async fn timed_out_request_gets_error_envelope() {
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "late"
            }),
        );
        let app = with_boundary_layers(slow, Duration::from_millis(20));

        let response = send(&app, "GET", "/slow", None).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(json_of(response).await["error"]["code"], "REQUEST_TIMEOUT");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = send(&app(), "GET", "/nonexistent", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
