//! In-memory implementation of the forms REST API.
//!
//! Serves `/api/business-spec`, `/api/requirements` and `/api/tests` from
//! process memory. Used as the live peer in `forms-core` integration tests
//! and runnable on its own as a dev backend.

pub mod config;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessSpec {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feature {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Requirement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
}

#[derive(Deserialize)]
pub struct NewRequirement {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: u32,
    pub value: String,
}

#[derive(Deserialize)]
pub struct SaveTest {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Default)]
struct TestStore {
    records: BTreeMap<i64, TestRecord>,
    last_id: i64,
}

/// Shared server state. Cloning shares the underlying stores.
#[derive(Clone, Default)]
pub struct Db {
    specs: Arc<RwLock<HashMap<String, BusinessSpec>>>,
    requirements: Arc<RwLock<Vec<Requirement>>>,
    tests: Arc<RwLock<TestStore>>,
}

impl Db {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test under its own id, e.g. to seed fixtures.
    pub async fn seed_test(&self, record: TestRecord) {
        let mut tests = self.tests.write().await;
        tests.last_id = tests.last_id.max(record.id);
        tests.records.insert(record.id, record);
    }

    pub async fn seed_requirement(&self, requirement: Requirement) {
        self.requirements.write().await.push(requirement);
    }
}

pub fn app() -> Router {
    app_with(Db::new())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/api/business-spec", post(create_spec))
        .route("/api/business-spec/{id}", get(get_spec))
        .route("/api/requirements", get(list_requirements).post(add_requirement))
        .route("/api/requirements/{id}", put(toggle_requirement))
        .route("/api/tests", get(list_tests).post(create_test))
        .route("/api/tests/{id}", get(get_test).put(save_test))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Db::new()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

// --- business specifications ---

async fn create_spec(
    State(db): State<Db>,
    Json(mut input): Json<BusinessSpec>,
) -> Result<(StatusCode, Json<BusinessSpec>), StatusCode> {
    if input.id.is_empty() {
        input.id = Uuid::new_v4().to_string();
    }
    let mut specs = db.specs.write().await;
    if specs.contains_key(&input.id) {
        return Err(StatusCode::CONFLICT);
    }
    info!(id = %input.id, features = input.features.len(), "business spec created");
    specs.insert(input.id.clone(), input.clone());
    Ok((StatusCode::CREATED, Json(input)))
}

async fn get_spec(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<BusinessSpec>, StatusCode> {
    let specs = db.specs.read().await;
    specs.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

// --- requirements ---

async fn list_requirements(State(db): State<Db>) -> Json<Vec<Requirement>> {
    Json(db.requirements.read().await.clone())
}

async fn add_requirement(
    State(db): State<Db>,
    Json(input): Json<NewRequirement>,
) -> Result<(StatusCode, Json<Requirement>), StatusCode> {
    if input.name.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let requirement = Requirement {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        description: String::new(),
        is_completed: false,
    };
    info!(id = %requirement.id, "requirement added");
    db.requirements.write().await.push(requirement.clone());
    Ok((StatusCode::CREATED, Json(requirement)))
}

async fn toggle_requirement(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Requirement>, StatusCode> {
    let mut requirements = db.requirements.write().await;
    let requirement = requirements
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    requirement.is_completed = !requirement.is_completed;
    info!(id = %requirement.id, completed = requirement.is_completed, "requirement toggled");
    Ok(Json(requirement.clone()))
}

// --- tests ---

async fn list_tests(State(db): State<Db>) -> Json<Vec<TestRecord>> {
    let tests = db.tests.read().await;
    Json(tests.records.values().cloned().collect())
}

async fn create_test(
    State(db): State<Db>,
    Json(input): Json<SaveTest>,
) -> (StatusCode, Json<TestRecord>) {
    let mut tests = db.tests.write().await;
    tests.last_id += 1;
    let record = TestRecord {
        id: tests.last_id,
        name: input.name,
        description: input.description,
        questions: input.questions,
    };
    info!(id = record.id, "test created");
    tests.records.insert(record.id, record.clone());
    (StatusCode::CREATED, Json(record))
}

async fn get_test(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<TestRecord>, StatusCode> {
    let tests = db.tests.read().await;
    tests.records.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn save_test(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<SaveTest>,
) -> Result<Json<TestRecord>, StatusCode> {
    let mut tests = db.tests.write().await;
    let record = tests.records.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    record.name = input.name;
    record.description = input.description;
    record.questions = input.questions;
    info!(id, "test saved");
    Ok(Json(record.clone()))
}
