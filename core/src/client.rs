//! Stateless HTTP request builder and response parser for the forms API.
//!
//! # Design
//! `FormsClient` holds only a `base_url` and carries no mutable state between
//! calls. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `Remote` glues the two halves together around an injected `Transport`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{BusinessSpec, NewRequirement, Requirement, SaveTest, TestRecord};

/// Synchronous, stateless client for the forms API.
#[derive(Debug, Clone)]
pub struct FormsClient {
    base_url: String,
}

impl FormsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    // --- business specifications ---

    pub fn build_create_business_spec(&self, spec: &BusinessSpec) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/api/business-spec".to_string(), spec)
    }

    pub fn build_get_business_spec(&self, id: &str) -> HttpRequest {
        self.bare_request(HttpMethod::Get, format!("/api/business-spec/{id}"))
    }

    pub fn parse_create_business_spec(&self, response: HttpResponse) -> Result<BusinessSpec, ApiError> {
        check_status(&response, &[200, 201])?;
        decode(&response)
    }

    pub fn parse_get_business_spec(&self, response: HttpResponse) -> Result<BusinessSpec, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    // --- requirements ---

    pub fn build_list_requirements(&self) -> HttpRequest {
        self.bare_request(HttpMethod::Get, "/api/requirements".to_string())
    }

    pub fn build_add_requirement(&self, input: &NewRequirement) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/api/requirements".to_string(), input)
    }

    /// The toggle endpoint takes no body; the server flips the flag itself.
    pub fn build_toggle_requirement(&self, id: &str) -> HttpRequest {
        self.bare_request(HttpMethod::Put, format!("/api/requirements/{id}"))
    }

    pub fn parse_list_requirements(&self, response: HttpResponse) -> Result<Vec<Requirement>, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    /// Returns the created record when the server echoes one, `None` for a
    /// bare acknowledgment with an empty body. Any other body must decode.
    pub fn parse_add_requirement(&self, response: HttpResponse) -> Result<Option<Requirement>, ApiError> {
        check_status(&response, &[200, 201])?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        decode(&response).map(Some)
    }

    pub fn parse_toggle_requirement(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])
    }

    // --- tests ---

    pub fn build_get_test(&self, id: i64) -> HttpRequest {
        self.bare_request(HttpMethod::Get, format!("/api/tests/{id}"))
    }

    /// First save of a test that has no server identifier yet.
    pub fn build_create_test(&self, input: &SaveTest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/api/tests".to_string(), input)
    }

    pub fn build_save_test(&self, id: i64, input: &SaveTest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, format!("/api/tests/{id}"), input)
    }

    pub fn parse_get_test(&self, response: HttpResponse) -> Result<TestRecord, ApiError> {
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn parse_create_test(&self, response: HttpResponse) -> Result<TestRecord, ApiError> {
        check_status(&response, &[200, 201])?;
        decode(&response)
    }

    pub fn parse_save_test(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])
    }

    fn bare_request(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(&self, method: HttpMethod, path: String, body: &B) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, accepted: &[u16]) -> Result<(), ApiError> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// A `FormsClient` bound to a transport: build, execute, parse in one call.
///
/// Every call is a single attempt. There is no retry and no de-duplication
/// of in-flight requests.
#[derive(Debug, Clone)]
pub struct Remote<T> {
    client: FormsClient,
    transport: T,
}

impl<T: Transport> Remote<T> {
    pub fn new(client: FormsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn create_business_spec(&self, spec: &BusinessSpec) -> Result<BusinessSpec, ApiError> {
        let request = self.client.build_create_business_spec(spec)?;
        let response = self.send(request)?;
        self.client.parse_create_business_spec(response)
    }

    pub fn fetch_business_spec(&self, id: &str) -> Result<BusinessSpec, ApiError> {
        let response = self.send(self.client.build_get_business_spec(id))?;
        self.client.parse_get_business_spec(response)
    }

    pub fn list_requirements(&self) -> Result<Vec<Requirement>, ApiError> {
        let response = self.send(self.client.build_list_requirements())?;
        self.client.parse_list_requirements(response)
    }

    pub fn add_requirement(&self, input: &NewRequirement) -> Result<Option<Requirement>, ApiError> {
        let request = self.client.build_add_requirement(input)?;
        let response = self.send(request)?;
        self.client.parse_add_requirement(response)
    }

    pub fn toggle_requirement(&self, id: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_toggle_requirement(id))?;
        self.client.parse_toggle_requirement(response)
    }

    pub fn fetch_test(&self, id: i64) -> Result<TestRecord, ApiError> {
        let response = self.send(self.client.build_get_test(id))?;
        self.client.parse_get_test(response)
    }

    pub fn create_test(&self, input: &SaveTest) -> Result<TestRecord, ApiError> {
        let request = self.client.build_create_test(input)?;
        let response = self.send(request)?;
        self.client.parse_create_test(response)
    }

    pub fn save_test(&self, id: i64, input: &SaveTest) -> Result<(), ApiError> {
        let request = self.client.build_save_test(id, input)?;
        let response = self.send(request)?;
        self.client.parse_save_test(response)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.execute(request).map_err(|err| {
            warn!(error = %err, "transport failed");
            ApiError::from(err)
        })?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}
