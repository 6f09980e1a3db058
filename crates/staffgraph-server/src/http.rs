//! HTTP REST API using axum.
//!
//! Translates requests into `StaffStore` calls and their results back to JSON.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use staffgraph_core::{
    Department, DepartmentFilter, DepartmentMember, Employee, EmployeeFilter, EmployeeSummary,
    EmployeeUpdate, NewEmployee, NodeId, StaffError, StaffStore, Subordinate,
};

use crate::error::{ApiError, ErrorBody};

/// Store shared by every request handler.
pub type SharedStore = Arc<dyn StaffStore>;

type ApiResult<T> = Result<T, ApiError>;

// Extractors are taken as `Result` so their rejections leave as JSON errors.
type IdPath = Result<Path<String>, PathRejection>;
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;
type RawBody = Result<Bytes, BytesRejection>;

const WELCOME: &str = "Neo4j employee graph API. You can visit /employees to see all employees \
                       and /departments to see all departments.";

// ─── JSON request / response types ──────────────────────────────────────────

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateEmployeeRequest {
    name: Option<String>,
    role: Option<String>,
    department: Option<String>,
}

#[derive(Serialize)]
struct EmployeeList {
    employees: Vec<Employee>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<NodeId>,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

// ─── Router construction ────────────────────────────────────────────────────

/// Build the axum Router with all routes.
pub fn build_router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Employee routes.
        .route("/employees", get(list_employees).post(add_employee))
        .route(
            "/employees/:id",
            get(employee_summary)
                .put(update_employee)
                .delete(delete_employee),
        )
        .route("/employees/:id/subordinates", get(subordinates))
        // Department routes.
        .route("/departments", get(list_departments))
        .route("/departments/:id/employees", get(department_employees))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

// ─── Input helpers ──────────────────────────────────────────────────────────

fn parse_id(path: IdPath) -> ApiResult<NodeId> {
    let Path(raw) = path?;
    Ok(raw.parse::<NodeId>()?)
}

/// Decode a JSON body, distinguishing an absent body from a malformed one.
fn parse_body<T: DeserializeOwned>(body: RawBody) -> ApiResult<T> {
    let body = body?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(StaffError::EmptyBody.into());
    }
    let value: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| StaffError::InvalidInput(format!("Malformed JSON body: {e}")))?;
    if value.is_null() {
        return Err(StaffError::EmptyBody.into());
    }
    serde_json::from_value(value)
        .map_err(|e| StaffError::InvalidInput(format!("Unexpected body shape: {e}")).into())
}

fn query_pairs(query: QueryPairs) -> ApiResult<Vec<(String, String)>> {
    let Query(params) = query?;
    Ok(params)
}

fn pairs(params: &[(String, String)]) -> impl Iterator<Item = (&str, &str)> {
    params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

// ─── Handlers ───────────────────────────────────────────────────────────────

async fn root() -> &'static str {
    WELCOME
}

async fn health(State(store): State<SharedStore>) -> impl IntoResponse {
    match store.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            let body = ErrorBody {
                error: "Store unavailable".to_string(),
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}

async fn list_employees(
    State(store): State<SharedStore>,
    query: QueryPairs,
) -> ApiResult<Json<EmployeeList>> {
    let params = query_pairs(query)?;
    let filter = EmployeeFilter::from_params(pairs(&params))?;
    let employees = store.list_employees(&filter).await?;
    Ok(Json(EmployeeList { employees }))
}

async fn add_employee(
    State(store): State<SharedStore>,
    body: RawBody,
) -> ApiResult<impl IntoResponse> {
    let request: CreateEmployeeRequest = parse_body(body)?;
    let employee = NewEmployee::from_parts(request.name, request.role, request.department)?;
    let id = store.add_employee(&employee).await?;

    let response = MessageResponse {
        message: "Employee added successfully.".to_string(),
        id: Some(id),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_employee(
    State(store): State<SharedStore>,
    id: IdPath,
    body: RawBody,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(id)?;
    let update: EmployeeUpdate = parse_body(body)?;
    update.validate()?;
    store.update_employee(id, &update).await?;
    Ok(Json(MessageResponse::new("Employee updated successfully")))
}

async fn delete_employee(
    State(store): State<SharedStore>,
    id: IdPath,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(id)?;
    let outcome = store.delete_employee(id).await?;
    Ok(Json(MessageResponse::new(outcome.message())))
}

async fn subordinates(
    State(store): State<SharedStore>,
    id: IdPath,
) -> ApiResult<Json<Vec<Subordinate>>> {
    let id = parse_id(id)?;
    Ok(Json(store.subordinates(id).await?))
}

async fn employee_summary(
    State(store): State<SharedStore>,
    id: IdPath,
) -> ApiResult<Json<EmployeeSummary>> {
    let id = parse_id(id)?;
    Ok(Json(store.employee_summary(id).await?))
}

async fn list_departments(
    State(store): State<SharedStore>,
    query: QueryPairs,
) -> ApiResult<Json<Vec<Department>>> {
    let params = query_pairs(query)?;
    let filter = DepartmentFilter::from_params(pairs(&params))?;
    Ok(Json(store.list_departments(&filter).await?))
}

async fn department_employees(
    State(store): State<SharedStore>,
    id: IdPath,
) -> ApiResult<Json<Vec<DepartmentMember>>> {
    let id = parse_id(id)?;
    Ok(Json(store.department_employees(id).await?))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use staffgraph_graph::MemoryStore;
    use tower::ServiceExt;

    fn make_app() -> (Arc<MemoryStore>, Router) {
        let store = Arc::new(MemoryStore::new());
        let app = build_router(store.clone());
        (store, app)
    }

    async fn body_to_json(body: Body) -> serde_json::Value {
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    async fn create(app: &Router, name: &str, role: &str, department: &str) -> i64 {
        let body = serde_json::json!({ "name": name, "role": role, "department": department });
        let (status, json) = send(app, "POST", "/employees", Some(&body.to_string())).await;
        assert_eq!(status, StatusCode::CREATED, "create {name}: {json}");
        json["id"].as_i64().unwrap()
    }

    fn names(json: &serde_json::Value) -> Vec<String> {
        json.as_array()
            .unwrap()
            .iter()
            .map(|v| v["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let (_, app) = make_app();
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_to_json(resp.into_body()).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_then_filter_case_insensitively() {
        let (_, app) = make_app();
        let (status, json) = send(
            &app,
            "POST",
            "/employees",
            Some(r#"{"name":"Ann","role":"Engineer","department":"R&D"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["message"], "Employee added successfully.");
        create(&app, "Joe", "Accountant", "Finance").await;

        let (status, json) = send(&app, "GET", "/employees?name=ann", None).await;
        assert_eq!(status, StatusCode::OK);
        let employees = json["employees"].as_array().unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0]["name"], "Ann");
        assert_eq!(employees[0]["role"], "Engineer");
        assert_eq!(employees[0]["department"], "R&D");

        let (_, json) = send(&app, "GET", "/employees?role=ENGIN", None).await;
        assert_eq!(json["employees"].as_array().unwrap().len(), 1);

        let (_, json) = send(&app, "GET", "/employees?department=r%26d", None).await;
        assert_eq!(json["employees"][0]["name"], "Ann");

        // Second identical POST is a duplicate and creates nothing.
        let (status, json) = send(
            &app,
            "POST",
            "/employees",
            Some(r#"{"name":"Ann","role":"Engineer","department":"R&D"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Employee already exists.");

        let (_, json) = send(&app, "GET", "/employees?name=ann", None).await;
        assert_eq!(json["employees"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_bodies() {
        let (_, app) = make_app();

        let (status, json) = send(&app, "POST", "/employees", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Request body is empty");

        let (status, json) = send(&app, "POST", "/employees", Some(r#"{"name":"Ann"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Not all required fields have been provided");

        let (status, _) = send(&app, "POST", "/employees", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_body_fields() {
        let (_, app) = make_app();
        let (status, json) = send(
            &app,
            "POST",
            "/employees",
            Some(r#"{"name":"Ann","role":"Engineer","department":"R&D","salary":10}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("salary"));

        let (_, json) = send(&app, "GET", "/employees", None).await;
        assert!(json["employees"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_path_id_is_json_error() {
        let (_, app) = make_app();
        for (method, uri) in [
            ("GET", "/employees/%FF"),
            ("PUT", "/employees/%FF"),
            ("DELETE", "/employees/%FF"),
            ("GET", "/employees/%FF/subordinates"),
            ("GET", "/departments/%FF/employees"),
        ] {
            let body = (method == "PUT").then_some(r#"{"role":"Lead"}"#);
            let builder = Request::builder().method(method).uri(uri);
            let req = match body {
                Some(json) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(json))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            let resp = app.clone().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method} {uri}");
            assert_eq!(
                resp.headers()["content-type"],
                "application/json",
                "{method} {uri}"
            );
            let json = body_to_json(resp.into_body()).await;
            assert!(json["error"].as_str().unwrap().starts_with("Invalid request"));
        }
    }

    #[tokio::test]
    async fn test_oversized_body_is_json_error() {
        let (_, app) = make_app();
        let padding = "x".repeat(3 * 1024 * 1024);
        let body = format!(r#"{{"name":"{padding}","role":"r","department":"d"}}"#);
        let req = Request::builder()
            .method("POST")
            .uri("/employees")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(resp.headers()["content-type"], "application/json");
        let json = body_to_json(resp.into_body()).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_employee_listing_sorts_and_fails_closed() {
        let (_, app) = make_app();
        create(&app, "Carl", "Clerk", "Sales").await;
        create(&app, "Ann", "Engineer", "R&D").await;
        create(&app, "Bea", "Engineer", "R&D").await;

        let (_, json) = send(&app, "GET", "/employees?sort=name_asc", None).await;
        assert_eq!(names(&json["employees"]), vec!["Ann", "Bea", "Carl"]);

        let (_, json) = send(&app, "GET", "/employees?sort=name_desc", None).await;
        assert_eq!(names(&json["employees"]), vec!["Carl", "Bea", "Ann"]);

        let (status, json) = send(&app, "GET", "/employees?salary=10", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Unknown query parameter: salary");

        let (status, _) = send(&app, "GET", "/employees?sort=e_asc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (_, app) = make_app();
        let id = create(&app, "Ann", "Engineer", "R&D").await;

        let (status, json) = send(
            &app,
            "PUT",
            &format!("/employees/{id}"),
            Some(r#"{"role":"Lead"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Employee updated successfully");

        let (_, json) = send(&app, "GET", "/employees?name=ann", None).await;
        let ann = &json["employees"][0];
        assert_eq!(ann["role"], "Lead");
        assert_eq!(ann["name"], "Ann");
        assert_eq!(ann["department"], "R&D");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_404() {
        let (_, app) = make_app();
        let (status, json) = send(&app, "PUT", "/employees/999", Some(r#"{"role":"Lead"}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Employee not found.");

        let (status, _) = send(&app, "PUT", "/employees/abc", Some(r#"{"role":"Lead"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let id = create(&app, "Ann", "Engineer", "R&D").await;
        let (status, json) = send(&app, "PUT", &format!("/employees/{id}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Request body is empty");
    }

    #[tokio::test]
    async fn test_update_rename_conflict() {
        let (_, app) = make_app();
        create(&app, "Ann", "Engineer", "R&D").await;
        let ben = create(&app, "Ben", "Engineer", "R&D").await;

        let (status, json) =
            send(&app, "PUT", &format!("/employees/{ben}"), Some(r#"{"name":"Ann"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Employee already exists.");
    }

    #[tokio::test]
    async fn test_delete_manager_removes_department() {
        let (store, app) = make_app();
        let bob = create(&app, "Bob", "Manager", "Head Office").await;
        let carl = create(&app, "Carl", "Clerk", "Sales").await;
        store.assign_manager(NodeId(bob), "Sales").await.unwrap();

        let (status, json) = send(&app, "DELETE", &format!("/employees/{bob}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["message"],
            "Employee and its department Sales deleted successfully."
        );

        let (status, _) = send(&app, "GET", &format!("/employees/{bob}/subordinates"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "DELETE", &format!("/employees/{bob}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, json) = send(&app, "GET", "/departments?name=sales", None).await;
        assert!(json.as_array().unwrap().is_empty());

        // Carl's department went with its manager.
        let (status, json) = send(&app, "GET", &format!("/employees/{carl}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Employee not found or has no department");
    }

    #[tokio::test]
    async fn test_delete_plain_employee_keeps_department() {
        let (_, app) = make_app();
        let ann = create(&app, "Ann", "Engineer", "R&D").await;
        create(&app, "Ben", "Engineer", "R&D").await;

        let (status, json) = send(&app, "DELETE", &format!("/employees/{ann}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Employee deleted successfully");

        let (_, json) = send(&app, "GET", "/departments", None).await;
        assert_eq!(json[0]["name"], "R&D");
        assert_eq!(json[0]["number_of_employees"], 1);
    }

    #[tokio::test]
    async fn test_subordinates_of_manager() {
        let (store, app) = make_app();
        let bob = create(&app, "Bob", "Manager", "Head Office").await;
        create(&app, "Carl", "Clerk", "Sales").await;
        create(&app, "Dora", "Clerk", "Sales").await;
        store.assign_manager(NodeId(bob), "Sales").await.unwrap();

        let (status, json) = send(&app, "GET", &format!("/employees/{bob}/subordinates"), None).await;
        assert_eq!(status, StatusCode::OK);
        // Bob does not WORKS_IN Sales, so he is not listed.
        assert_eq!(names(&json), vec!["Carl", "Dora"]);
    }

    #[tokio::test]
    async fn test_subordinates_include_manager_working_in_department() {
        let (store, app) = make_app();
        let bob = create(&app, "Bob", "Manager", "Sales").await;
        create(&app, "Carl", "Clerk", "Sales").await;
        store.assign_manager(NodeId(bob), "Sales").await.unwrap();

        let (_, json) = send(&app, "GET", &format!("/employees/{bob}/subordinates"), None).await;
        assert_eq!(names(&json), vec!["Bob", "Carl"]);
    }

    #[tokio::test]
    async fn test_subordinates_of_non_manager_is_404() {
        let (_, app) = make_app();
        let carl = create(&app, "Carl", "Clerk", "Sales").await;
        let (status, json) =
            send(&app, "GET", &format!("/employees/{carl}/subordinates"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json["error"],
            "Employee not found or has no department to manage"
        );
    }

    #[tokio::test]
    async fn test_employee_summary() {
        let (store, app) = make_app();
        let bob = create(&app, "Bob", "Manager", "Sales").await;
        let carl = create(&app, "Carl", "Clerk", "Sales").await;
        store.assign_manager(NodeId(bob), "Sales").await.unwrap();

        let (status, json) = send(&app, "GET", &format!("/employees/{carl}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["department_name"], "Sales");
        assert_eq!(json["manager"], "Bob");
        assert_eq!(json["number_of_employees"], 2);

        let (status, _) = send(&app, "GET", "/employees/12345", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_summary_for_unmanaged_department() {
        let (_, app) = make_app();
        let ann = create(&app, "Ann", "Engineer", "R&D").await;
        let (status, json) = send(&app, "GET", &format!("/employees/{ann}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["manager"].is_null());
        assert_eq!(json["number_of_employees"], 1);
    }

    #[tokio::test]
    async fn test_department_listing_sorts() {
        let (_, app) = make_app();
        create(&app, "Ann", "Engineer", "R&D").await;
        create(&app, "Ben", "Engineer", "R&D").await;
        create(&app, "Cal", "Engineer", "R&D").await;
        create(&app, "Dan", "Clerk", "Sales").await;
        create(&app, "Eve", "Analyst", "Finance").await;
        create(&app, "Fay", "Analyst", "Finance").await;

        let (_, json) = send(&app, "GET", "/departments?sort=name_asc", None).await;
        assert_eq!(names(&json), vec!["Finance", "R&D", "Sales"]);

        let (_, json) = send(&app, "GET", "/departments?sort=name_desc", None).await;
        assert_eq!(names(&json), vec!["Sales", "R&D", "Finance"]);

        let (_, json) = send(&app, "GET", "/departments?sort=e_asc", None).await;
        assert_eq!(names(&json), vec!["Sales", "Finance", "R&D"]);

        let (_, json) = send(&app, "GET", "/departments?sort=e_desc", None).await;
        assert_eq!(names(&json), vec!["R&D", "Finance", "Sales"]);
        assert_eq!(json[0]["number_of_employees"], 3);

        let (_, json) = send(&app, "GET", "/departments?name=FIN", None).await;
        assert_eq!(names(&json), vec!["Finance"]);

        let (status, _) = send(&app, "GET", "/departments?sort=biggest", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_department_employees() {
        let (store, app) = make_app();
        create(&app, "Ann", "Engineer", "R&D").await;
        create(&app, "Ben", "Tester", "R&D").await;
        create(&app, "Dan", "Clerk", "Sales").await;
        let rd = store.department_id("R&D").await.unwrap();

        let (status, json) = send(&app, "GET", &format!("/departments/{rd}/employees"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!([
                { "name": "Ann", "role": "Engineer" },
                { "name": "Ben", "role": "Tester" }
            ])
        );

        let (status, json) = send(&app, "GET", "/departments/4242/employees", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.as_array().unwrap().is_empty());
    }
}
