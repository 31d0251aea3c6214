//! Form components: one draft, one view state, one remote each.
//!
//! # Design
//! A component exclusively owns its draft for its whole lifetime. User
//! actions either edit the draft directly (`draft_mut`) or run one network
//! operation. Network operations go through the validation gate first, flip
//! the view to `Loading`, make a single attempt, and land in `Success` or
//! `Error`. Failures are returned to the caller *and* recorded as the
//! operation's fixed message, so the host can ignore the `Result` and still
//! render the right thing.
//!
//! Navigation after a successful mutation goes through an injected
//! `Navigator` rather than a global router.

mod business_spec;
mod requirements;
mod test_editor;

use std::cell::RefCell;

pub use business_spec::BusinessSpecForm;
pub use requirements::RequirementsBoard;
pub use test_editor::TestEditor;

/// Moves the host's view to another route.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn navigate(&self, path: &str) {
        (**self).navigate(path)
    }
}

/// A `Navigator` that only remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visited.borrow().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited.borrow_mut().push(path.to_string());
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use crate::client::{FormsClient, Remote};
    use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};

    /// Replies with queued responses in order and records every request.
    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        replies: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, status: u16, body: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        pub fn fail(self, message: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Err(TransportError(message.to_string())));
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.seen.borrow().clone()
        }

        pub fn calls(&self) -> usize {
            self.seen.borrow().len()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("no scripted reply".to_string())))
        }
    }

    pub fn remote(transport: &ScriptedTransport) -> Remote<&ScriptedTransport> {
        Remote::new(FormsClient::new("http://api.test"), transport)
    }
}
