//! The "gather requirements" board.
//!
//! Loads the list on mount, adds by name, toggles completion through the
//! server and edits descriptions locally. A failed operation replaces the
//! list with its fixed message until a later load or add succeeds.

use std::fmt::Write as _;

use tracing::{info, warn};
use uuid::Uuid;

use crate::client::Remote;
use crate::draft::RequirementList;
use crate::error::{FormError, Operation};
use crate::http::Transport;
use crate::types::{NewRequirement, Requirement};
use crate::view::{Screen, ViewState};

pub const NO_REQUIREMENTS: &str = "No requirements found.";

/// "Gather requirements" board: list, add, describe, toggle.
pub struct RequirementsBoard<T> {
    remote: Remote<T>,
    list: RequirementList,
    state: ViewState,
    inline_message: Option<String>,
}

impl<T: Transport> RequirementsBoard<T> {
    pub fn new(remote: Remote<T>) -> Self {
        Self {
            remote,
            list: RequirementList::new(),
            state: ViewState::Idle,
            inline_message: None,
        }
    }

    /// Construct and immediately fetch, as a freshly mounted board does.
    pub fn mount(remote: Remote<T>) -> Self {
        let mut board = Self::new(remote);
        let _ = board.load();
        board
    }

    pub fn list(&self) -> &RequirementList {
        &self.list
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn inline_message(&self) -> Option<&str> {
        self.inline_message.as_deref()
    }

    pub fn load(&mut self) -> Result<(), FormError> {
        self.state.begin_loading();
        match self.remote.list_requirements() {
            Ok(items) => {
                info!(count = items.len(), "requirements loaded");
                self.list.replace(items);
                self.state.succeed();
                Ok(())
            }
            Err(err) => Err(self.record_failure(err.into(), Operation::LoadRequirements)),
        }
    }

    pub fn set_new_name(&mut self, name: impl Into<String>) {
        self.list.set_new_name(name);
    }

    /// Whether the "Add" action is currently enabled.
    pub fn can_add(&self) -> bool {
        self.list.validated_new_name().is_ok()
    }

    pub fn add(&mut self) -> Result<(), FormError> {
        self.inline_message = None;
        let name = match self.list.validated_new_name() {
            Ok(name) => name.to_string(),
            Err(err) => {
                self.inline_message = Some(err.to_string());
                return Err(err.into());
            }
        };

        self.state.begin_loading();
        let input = NewRequirement { name: name.clone() };
        match self.remote.add_requirement(&input) {
            Ok(created) => {
                let requirement = created.unwrap_or_else(|| Requirement {
                    id: Uuid::new_v4().to_string(),
                    name,
                    description: String::new(),
                    is_completed: false,
                });
                info!(id = %requirement.id, "requirement added");
                self.list.push(requirement);
                self.state.succeed();
                Ok(())
            }
            Err(err) => Err(self.record_failure(err.into(), Operation::AddRequirement)),
        }
    }

    /// Ask the server to flip completion; the local flag flips only once
    /// the server acknowledges.
    pub fn toggle(&mut self, id: &str) -> Result<(), FormError> {
        match self.remote.toggle_requirement(id) {
            Ok(()) => {
                let completed = self.list.toggle(id);
                info!(id, ?completed, "requirement toggled");
                Ok(())
            }
            Err(err) => Err(self.record_failure(err.into(), Operation::ToggleRequirement(id.to_string()))),
        }
    }

    /// Local edit of a requirement's description; never reaches the server.
    pub fn describe(&mut self, index: usize, text: impl Into<String>) -> Result<(), FormError> {
        self.list.update_description(index, text)?;
        Ok(())
    }

    pub fn screen(&self) -> Screen<'_> {
        self.state.screen(self.list.is_empty(), NO_REQUIREMENTS)
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Gather Requirements\n");
        let _ = writeln!(
            out,
            "New requirement: {} [{}]",
            self.list.new_name(),
            if self.can_add() { "Add" } else { "Add (disabled)" }
        );
        if let Some(message) = &self.inline_message {
            let _ = writeln!(out, "[invalid] {message}");
        }
        match self.screen() {
            Screen::Data => {
                for requirement in self.list.items() {
                    let mark = if requirement.is_completed { "✓" } else { " " };
                    let _ = writeln!(
                        out,
                        "[{mark}] {}: {}",
                        requirement.name, requirement.description
                    );
                }
            }
            other => {
                let _ = writeln!(out, "{other}");
            }
        }
        out
    }

    fn record_failure(&mut self, err: FormError, operation: Operation) -> FormError {
        warn!(error = %err, ?operation, "requirements operation failed");
        self.state.fail(err.user_message(&operation));
        err
    }
}
