//! Domain DTOs for the forms API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently;
//! integration tests catch schema drift between the two crates. Field names
//! on the wire follow the frontend's camelCase where they differ from Rust.

use serde::{Deserialize, Serialize};

/// A business specification as created by `POST /api/business-spec`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessSpec {
    /// Client-assigned uuid text.
    pub id: String,
    pub name: String,
    pub description: String,
    pub features: Vec<Feature>,
}

/// A feature of a business specification. `id` is unique within its spec only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feature {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Requirement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
}

/// Request payload for `POST /api/requirements`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRequirement {
    pub name: String,
}

/// A test with its questions, as returned by `GET /api/tests/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestRecord {
    /// `-1` for a test that has never been saved.
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

/// One answer option of a question. `id` is unique within its question only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: u32,
    pub value: String,
}

/// Request payload for `PUT /api/tests/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveTest {
    pub name: String,
    pub description: String,
    pub questions: Vec<Question>,
}
