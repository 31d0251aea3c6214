//! Editor for a test with its questions and answer options.
//!
//! Opened on a `DraftSource`: `New` starts blank and offline, `Existing(id)`
//! fetches first. The first save of a new test creates it and adopts the
//! returned id; later saves update it in place.

use std::fmt::Write as _;

use tracing::{info, warn};

use super::Navigator;
use crate::client::Remote;
use crate::draft::{DraftSource, TestDraft, UNSAVED_TEST_ID};
use crate::error::{ApiError, FormError, Operation};
use crate::http::Transport;
use crate::types::TestRecord;
use crate::view::{Screen, ViewState};

pub const SAVED_NOTICE: &str = "Test saved successfully.";
pub const TESTS_ROUTE: &str = "/tests";

/// Editor for a test and its questions/options, new or existing.
pub struct TestEditor<T, N> {
    remote: Remote<T>,
    navigator: N,
    source: DraftSource<i64>,
    draft: TestDraft,
    state: ViewState,
    inline_message: Option<String>,
    notice: Option<&'static str>,
}

impl<T: Transport, N: Navigator> TestEditor<T, N> {
    /// Resolve `source` once: a new test starts blank, an existing one is
    /// fetched before anything is shown.
    pub fn open(remote: Remote<T>, navigator: N, source: DraftSource<i64>) -> Self {
        let mut editor = Self {
            remote,
            navigator,
            source,
            draft: TestDraft::blank(),
            state: ViewState::Idle,
            inline_message: None,
            notice: None,
        };
        match source {
            DraftSource::New => editor.state.succeed(),
            DraftSource::Existing(id) => {
                let _ = editor.fetch(id);
            }
        }
        editor
    }

    pub fn source(&self) -> DraftSource<i64> {
        self.source
    }

    pub fn draft(&self) -> &TestDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut TestDraft {
        &mut self.draft
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn inline_message(&self) -> Option<&str> {
        self.inline_message.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice
    }

    /// Re-fetch the test this editor was opened on. A no-op for new tests.
    pub fn reload(&mut self) -> Result<(), FormError> {
        match self.source {
            DraftSource::New => Ok(()),
            DraftSource::Existing(id) => self.fetch(id),
        }
    }

    fn fetch(&mut self, id: i64) -> Result<(), FormError> {
        self.state.begin_loading();
        let loaded = self
            .remote
            .fetch_test(id)
            .and_then(draft_from_server);
        match loaded {
            Ok(draft) => {
                info!(id, questions = draft.questions().len(), "test loaded");
                self.draft = draft;
                self.state.succeed();
                Ok(())
            }
            Err(err) => Err(self.record_failure(err.into(), Operation::FetchTest)),
        }
    }

    /// Validate, then persist. A test that was never saved is created and
    /// adopts the server's id; later saves update it in place.
    pub fn save(&mut self) -> Result<(), FormError> {
        self.inline_message = None;
        self.notice = None;
        if let Err(err) = self.draft.validate() {
            warn!(reason = %err, "test save rejected");
            self.inline_message = Some(err.to_string());
            return Err(err.into());
        }

        self.state.begin_loading();
        let payload = self.draft.to_payload();
        let result = if self.draft.id() == UNSAVED_TEST_ID {
            self.remote.create_test(&payload).and_then(draft_from_server).map(|created| {
                let id = created.id();
                self.draft = created;
                self.source = DraftSource::Existing(id);
                id
            })
        } else {
            let id = self.draft.id();
            self.remote.save_test(id, &payload).map(|()| id)
        };

        match result {
            Ok(id) => {
                info!(id, "test saved");
                self.state.succeed();
                self.notice = Some(SAVED_NOTICE);
                Ok(())
            }
            Err(err) => Err(self.record_failure(err.into(), Operation::SaveTest)),
        }
    }

    pub fn cancel(&self) {
        self.navigator.navigate(TESTS_ROUTE);
    }

    pub fn screen(&self) -> Screen<'_> {
        self.state.screen(false, "")
    }

    pub fn render(&self) -> String {
        match self.screen() {
            Screen::Data => {}
            other => return other.to_string(),
        }
        let mut out = String::from("Write Tests\n");
        if let Some(message) = &self.inline_message {
            let _ = writeln!(out, "[invalid] {message}");
        }
        if let Some(notice) = self.notice {
            let _ = writeln!(out, "[notice] {notice}");
        }
        let _ = writeln!(out, "Name: {}", self.draft.name());
        let _ = writeln!(out, "Description: {}", self.draft.description());
        for (index, question) in self.draft.questions().iter().enumerate() {
            let _ = writeln!(out, "Q{}: {}", index + 1, question.text);
            for option in question.options.iter() {
                let _ = writeln!(out, "    ({}) {}", option.id, option.value);
            }
        }
        out.push_str("[Save Test] [Cancel]");
        out
    }

    fn record_failure(&mut self, err: FormError, operation: Operation) -> FormError {
        warn!(error = %err, ?operation, "test editor operation failed");
        self.state.fail(err.user_message(&operation));
        err
    }
}

/// A record whose identifiers leave no room for new children is treated as
/// an undecodable response.
fn draft_from_server(record: TestRecord) -> Result<TestDraft, ApiError> {
    TestDraft::from_record(record).map_err(|err| ApiError::Deserialization(err.to_string()))
}
