//! Form state, REST sync and view state for the business-spec, requirements
//! and test-authoring forms.
//!
//! # Overview
//! Three layers, leaf to root:
//! - `draft` holds the editable record each form owns and every in-memory
//!   edit on it. No I/O.
//! - `client` builds `HttpRequest`s and parses `HttpResponse`s
//!   (host-does-IO); `Remote` runs them through an injected `Transport`.
//! - `forms` combines a draft, a `Remote` and a `ViewState` into the three
//!   user-facing components, with navigation injected as a `Navigator`.
//!
//! # Design
//! - Child identifiers come from per-list counters and are never reused.
//! - Validation happens before any request is built; a rejected submit
//!   performs zero network calls.
//! - Every network operation is a single attempt. Failures become a fixed
//!   per-operation message in the component's view state.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod draft;
pub mod error;
pub mod forms;
pub mod http;
pub mod types;
pub mod view;

pub use client::{FormsClient, Remote};
pub use config::ClientConfig;
pub use draft::{
    BusinessSpecDraft, DraftSource, FeaturePatch, Field, ItemList, QuestionDraft, QuestionPatch,
    RequirementList, TestDraft,
};
pub use error::{ApiError, DraftError, FormError, Operation, ValidationError};
pub use forms::{BusinessSpecForm, Navigator, RecordingNavigator, RequirementsBoard, TestEditor};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use types::{AnswerOption, BusinessSpec, Feature, NewRequirement, Question, Requirement, SaveTest, TestRecord};
pub use view::{Screen, ViewState};
