//! The "create business specification" form.
//!
//! Owns a `BusinessSpecDraft`. `submit` is gated on validation, so a rejected
//! draft never reaches the transport. A successful create navigates to
//! `/business/{id}`.

use std::fmt::Write as _;

use tracing::{info, warn};
use uuid::Uuid;

use super::Navigator;
use crate::client::Remote;
use crate::draft::BusinessSpecDraft;
use crate::error::{FormError, Operation};
use crate::http::Transport;
use crate::types::BusinessSpec;
use crate::view::{Screen, ViewState};

/// "Create business specification" form.
pub struct BusinessSpecForm<T, N> {
    remote: Remote<T>,
    navigator: N,
    draft: BusinessSpecDraft,
    state: ViewState,
    inline_message: Option<String>,
}

impl<T: Transport, N: Navigator> BusinessSpecForm<T, N> {
    pub fn new(remote: Remote<T>, navigator: N) -> Self {
        Self {
            remote,
            navigator,
            draft: BusinessSpecDraft::new(),
            state: ViewState::Idle,
            inline_message: None,
        }
    }

    pub fn draft(&self) -> &BusinessSpecDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut BusinessSpecDraft {
        &mut self.draft
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Validation message from the last rejected submit, if any.
    pub fn inline_message(&self) -> Option<&str> {
        self.inline_message.as_deref()
    }

    /// Validate, POST the draft under a fresh id, then navigate to the
    /// created record.
    pub fn submit(&mut self) -> Result<BusinessSpec, FormError> {
        self.inline_message = None;
        if let Err(err) = self.draft.validate() {
            warn!(reason = %err, "business spec submit rejected");
            self.inline_message = Some(err.to_string());
            return Err(err.into());
        }

        self.state.begin_loading();
        let record = self.draft.to_record(Uuid::new_v4().to_string());
        match self.remote.create_business_spec(&record) {
            Ok(created) => {
                info!(id = %created.id, features = created.features.len(), "business spec created");
                self.state.succeed();
                self.navigator.navigate(&format!("/business/{}", created.id));
                Ok(created)
            }
            Err(err) => {
                let err = FormError::from(err);
                warn!(error = %err, "business spec create failed");
                self.state.fail(err.user_message(&Operation::CreateBusinessSpec));
                Err(err)
            }
        }
    }

    /// The form is never empty, so this is `Data`, `Loading` or `Error`.
    ///
    /// Unlike the other components, an `Error` here does not hide the data:
    /// a failed create leaves the draft intact and editable for another
    /// attempt, so `render` draws the alert above the form fields.
    pub fn screen(&self) -> Screen<'_> {
        self.state.screen(false, "")
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Create Business Specification\n");
        if let Some(message) = self.state.error() {
            let _ = writeln!(out, "[alert] {message}");
        }
        if let Some(message) = &self.inline_message {
            let _ = writeln!(out, "[invalid] {message}");
        }
        let _ = writeln!(out, "Business Name: {}", self.draft.name());
        let _ = writeln!(out, "Description: {}", self.draft.description());
        let _ = writeln!(out, "Features:");
        for feature in self.draft.features().iter() {
            let _ = writeln!(out, "  - {} [Remove #{}]", feature.title, feature.id);
        }
        out.push_str(if self.state.is_loading() { "[Creating...]" } else { "[Create]" });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::Field;
    use crate::error::ValidationError;
    use crate::forms::testing::{remote, ScriptedTransport};
    use crate::forms::RecordingNavigator;
    use crate::http::HttpMethod;

    const CREATED: &str = r#"{"id":"srv-1","name":"Acme","description":"desc","features":[{"id":1,"title":"F1","description":""}]}"#;

    #[test]
    fn empty_draft_is_blocked_without_network() {
        let transport = ScriptedTransport::new();
        let nav = RecordingNavigator::new();
        let mut form = BusinessSpecForm::new(remote(&transport), &nav);

        let err = form.submit().unwrap_err();
        assert_eq!(err, FormError::Validation(ValidationError::MissingName));
        assert_eq!(form.inline_message(), Some("Name is required."));
        assert_eq!(transport.calls(), 0);
        assert!(nav.visited().is_empty());
        assert_eq!(form.state(), &ViewState::Idle);
    }

    #[test]
    fn valid_draft_posts_once_and_navigates() {
        let transport = ScriptedTransport::new().reply(201, CREATED);
        let nav = RecordingNavigator::new();
        let mut form = BusinessSpecForm::new(remote(&transport), &nav);
        form.draft_mut().set_field(Field::Name, "Acme");
        form.draft_mut().set_field(Field::Description, "desc");
        form.draft_mut().add_feature("F1").unwrap();

        let created = form.submit().unwrap();
        assert_eq!(created.id, "srv-1");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].path, "http://api.test/api/business-spec");
        let body: serde_json::Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
        assert_eq!(body["name"], "Acme");
        assert_eq!(body["description"], "desc");
        assert_eq!(body["features"][0]["id"], 1);
        assert_eq!(body["features"][0]["title"], "F1");

        assert_eq!(nav.visited(), ["/business/srv-1"]);
        assert_eq!(form.state(), &ViewState::Success);
    }

    #[test]
    fn server_failure_shows_creation_message_and_stays_put() {
        let transport = ScriptedTransport::new().reply(500, "boom");
        let nav = RecordingNavigator::new();
        let mut form = BusinessSpecForm::new(remote(&transport), &nav);
        form.draft_mut().set_field(Field::Name, "Acme");
        form.draft_mut().set_field(Field::Description, "desc");
        form.draft_mut().add_feature("F1").unwrap();

        assert!(form.submit().is_err());
        assert_eq!(
            form.screen(),
            Screen::Error("Failed to create the business specification.")
        );
        assert!(form.render().contains("[alert] Failed to create the business specification."));
        assert!(nav.visited().is_empty());
        assert_eq!(form.draft().features().len(), 1);
    }

    #[test]
    fn failed_create_keeps_the_draft_on_screen() {
        let transport = ScriptedTransport::new().fail("connection refused").reply(201, CREATED);
        let nav = RecordingNavigator::new();
        let mut form = BusinessSpecForm::new(remote(&transport), &nav);
        form.draft_mut().set_field(Field::Name, "Acme");
        form.draft_mut().set_field(Field::Description, "desc");
        form.draft_mut().add_feature("F1").unwrap();
        assert!(form.submit().is_err());

        let rendered = form.render();
        assert!(rendered.starts_with("Create Business Specification\n[alert] "));
        assert!(rendered.contains("Business Name: Acme"));
        assert!(rendered.contains("  - F1 [Remove #1]"));
        assert!(rendered.ends_with("[Create]"));

        form.submit().unwrap();
        assert_eq!(form.screen(), Screen::Data);
        assert_eq!(nav.last().as_deref(), Some("/business/srv-1"));
    }

    #[test]
    fn resubmit_after_validation_clears_inline_message() {
        let transport = ScriptedTransport::new().reply(201, CREATED);
        let nav = RecordingNavigator::new();
        let mut form = BusinessSpecForm::new(remote(&transport), &nav);
        form.draft_mut().set_field(Field::Name, "Acme");
        form.draft_mut().set_field(Field::Description, "desc");
        assert!(form.submit().is_err());
        assert_eq!(form.inline_message(), Some("At least one feature is required."));

        form.draft_mut().add_feature("F1").unwrap();
        form.submit().unwrap();
        assert_eq!(form.inline_message(), None);
    }
}
