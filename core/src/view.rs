//! Per-component view state and the screens derived from it.
//!
//! `Idle -> Loading -> {Success, Error}`; `Success` and `Error` go back to
//! `Loading` whenever the user retries. `Loading` and `Error` both hide the
//! data container, and a successful but empty result shows an explicit
//! "no data" line instead of an empty list.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

impl ViewState {
    pub fn begin_loading(&mut self) {
        *self = ViewState::Loading;
    }

    pub fn succeed(&mut self) {
        *self = ViewState::Success;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = ViewState::Error(message.into());
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Which screen to show, given whether the data set is empty.
    pub fn screen<'a>(&'a self, is_empty: bool, empty_message: &'a str) -> Screen<'a> {
        match self {
            ViewState::Loading => Screen::Loading,
            ViewState::Error(message) => Screen::Error(message),
            ViewState::Idle | ViewState::Success if is_empty => Screen::Empty(empty_message),
            ViewState::Idle | ViewState::Success => Screen::Data,
        }
    }
}

/// What the host should draw. `Data` means "draw the component's data".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen<'a> {
    Loading,
    Error(&'a str),
    Empty(&'a str),
    Data,
}

impl Screen<'_> {
    pub fn shows_data(&self) -> bool {
        matches!(self, Screen::Data)
    }
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Loading => f.write_str("Loading..."),
            Screen::Error(message) => write!(f, "[alert] {message}"),
            Screen::Empty(message) => f.write_str(message),
            Screen::Data => Ok(()),
        }
    }
}
