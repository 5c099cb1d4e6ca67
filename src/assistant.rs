//! Writing assistant: chat transcript, in-flight request tracking, and the
//! provider seam the runtime calls into.

use thiserror::Error;

use crate::model::DocumentId;
use crate::selection::Selection;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("no API key found in ${0}")]
    MissingCredential(String),

    #[error("assistant request failed: {0}")]
    Network(String),

    #[error("assistant returned an unusable response: {0}")]
    MalformedResponse(String),

    #[error("no assistant provider configured")]
    Unavailable,
}

/// Per-request settings handed to the provider
#[derive(Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Generative-text backend
pub trait CompletionProvider {
    fn complete(&self, prompt: &str, context: &RequestContext) -> Result<String, AssistantError>;
}

/// Read the API key from the named environment variable
pub fn credential_from_env(var: &str) -> Result<String, AssistantError> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(AssistantError::MissingCredential(var.to_string())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// What an outstanding request will act on when it returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlightRequest {
    pub id: u64,
    /// Edit target; `None` for a plain chat question
    pub target: Option<(DocumentId, Selection)>,
    /// The user selected something else while the request was out
    pub target_moved: bool,
}

/// A prompt ready to send to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    pub id: u64,
    pub prompt: String,
}

/// Outcome of a provider response for the in-flight request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Plain chat reply
    Answered,
    /// Reply that should replace `selection` in `document_id`
    Edit {
        text: String,
        document_id: DocumentId,
        selection: Selection,
    },
    /// Edit reply whose target the user has since moved away from
    Stale {
        text: String,
        document_id: DocumentId,
        selection: Selection,
    },
    Failed(AssistantError),
}

const ERROR_MESSAGE: &str = "Something went wrong while talking to the assistant.";

#[derive(Debug, Clone, Default)]
pub struct AssistantState {
    messages: Vec<ChatMessage>,
    in_flight: Option<InFlightRequest>,
    next_request_id: u64,
}

impl AssistantState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&InFlightRequest> {
        self.in_flight.as_ref()
    }

    /// Start a request. Returns `None` while another request is outstanding
    /// or when `input` is blank.
    pub fn begin(
        &mut self,
        input: &str,
        target: Option<(DocumentId, Selection)>,
    ) -> Option<OutgoingRequest> {
        if self.in_flight.is_some() || input.trim().is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::new(Role::User, input));
        let prompt = build_prompt(input, target.as_ref().map(|(_, s)| s));
        self.next_request_id += 1;
        let id = self.next_request_id;
        self.in_flight = Some(InFlightRequest {
            id,
            target,
            target_moved: false,
        });
        tracing::debug!(id, "assistant request started");
        Some(OutgoingRequest { id, prompt })
    }

    /// Track the editor selection while an edit request is outstanding.
    /// Once it differs from the request's target, the reply resolves as stale.
    pub fn note_selection(&mut self, current: Option<&Selection>) {
        let Some(request) = self.in_flight.as_mut() else {
            return;
        };
        if let Some((_, target)) = &request.target {
            if current != Some(target) && !request.target_moved {
                tracing::debug!(id = request.id, "selection moved off the assistant target");
                request.target_moved = true;
            }
        }
    }

    /// Settle the in-flight request. Responses for any other id are ignored.
    pub fn resolve(
        &mut self,
        id: u64,
        result: Result<String, AssistantError>,
    ) -> Option<Resolution> {
        if self.in_flight.as_ref().map(|r| r.id) != Some(id) {
            tracing::debug!(id, "ignoring response for a request no longer in flight");
            return None;
        }
        let request = self.in_flight.take()?;

        match result {
            Ok(reply) => {
                self.messages.push(ChatMessage::new(Role::Model, reply.clone()));
                Some(match request.target {
                    Some((document_id, selection)) if request.target_moved => Resolution::Stale {
                        text: reply,
                        document_id,
                        selection,
                    },
                    Some((document_id, selection)) => Resolution::Edit {
                        text: reply,
                        document_id,
                        selection,
                    },
                    None => Resolution::Answered,
                })
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "assistant request failed");
                self.messages
                    .push(ChatMessage::new(Role::System, format!("{} ({})", ERROR_MESSAGE, err)));
                Some(Resolution::Failed(err))
            }
        }
    }
}

/// Wrap the instruction around the selected text, or pass a chat question through
pub fn build_prompt(input: &str, selection: Option<&Selection>) -> String {
    match selection {
        Some(selection) => format!(
            "You are a markdown editing assistant. This text is selected in the user's document:\n\n\
             ---\n{}\n---\n\n\
             Apply this instruction to it: \"{}\"\n\n\
             Reply with the modified markdown only. No explanation, no preamble, no code fences.",
            selection.text(),
            input
        ),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Space;

    fn selection() -> Selection {
        Selection::capture(0, 5, "Hello", Space::Text).unwrap().unwrap()
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut state = AssistantState::new();
        assert!(state.begin("   ", None).is_none());
        assert!(state.messages().is_empty());
    }

    #[test]
    fn test_single_request_in_flight() {
        let mut state = AssistantState::new();
        let first = state.begin("hi", None).unwrap();
        assert!(state.begin("again", None).is_none());
        assert_eq!(state.resolve(first.id, Ok("hello".into())), Some(Resolution::Answered));
        assert!(!state.is_loading());
        assert_eq!(state.messages().len(), 2);
    }

    #[test]
    fn test_edit_request_resolves_to_edit() {
        let mut state = AssistantState::new();
        let request = state
            .begin("shorter", Some((DocumentId(1), selection())))
            .unwrap();
        assert!(request.prompt.contains("---\nHello\n---"));
        assert!(request.prompt.contains("\"shorter\""));

        let resolution = state.resolve(request.id, Ok("Hi".into())).unwrap();
        assert_eq!(
            resolution,
            Resolution::Edit {
                text: "Hi".to_string(),
                document_id: DocumentId(1),
                selection: selection(),
            }
        );
    }

    #[test]
    fn test_moved_selection_resolves_stale() {
        let mut state = AssistantState::new();
        let request = state
            .begin("shorter", Some((DocumentId(1), selection())))
            .unwrap();

        state.note_selection(Some(&selection()));
        assert!(!state.in_flight().unwrap().target_moved);

        let elsewhere = Selection::capture(6, 11, "world", Space::Text).unwrap().unwrap();
        state.note_selection(Some(&elsewhere));
        // Moving back does not revive the request
        state.note_selection(Some(&selection()));
        assert!(state.in_flight().unwrap().target_moved);

        assert!(matches!(
            state.resolve(request.id, Ok("Hi".into())),
            Some(Resolution::Stale { .. })
        ));
        assert_eq!(state.messages().last().unwrap().role, Role::Model);
    }

    #[test]
    fn test_collapsed_selection_makes_edit_stale() {
        let mut state = AssistantState::new();
        let request = state
            .begin("shorter", Some((DocumentId(1), selection())))
            .unwrap();
        state.note_selection(None);
        assert!(matches!(
            state.resolve(request.id, Ok("Hi".into())),
            Some(Resolution::Stale { .. })
        ));
    }

    #[test]
    fn test_chat_request_ignores_selection_changes() {
        let mut state = AssistantState::new();
        let request = state.begin("hi", None).unwrap();
        state.note_selection(Some(&selection()));
        assert_eq!(state.resolve(request.id, Ok("hello".into())), Some(Resolution::Answered));
    }

    #[test]
    fn test_failure_appends_system_message() {
        let mut state = AssistantState::new();
        let request = state.begin("hi", Some((DocumentId(1), selection()))).unwrap();
        let resolution = state
            .resolve(request.id, Err(AssistantError::Network("timeout".into())))
            .unwrap();
        assert!(matches!(resolution, Resolution::Failed(_)));
        assert_eq!(state.messages().last().unwrap().role, Role::System);
    }

    #[test]
    fn test_unknown_response_id_is_ignored() {
        let mut state = AssistantState::new();
        let request = state.begin("hi", None).unwrap();
        assert_eq!(state.resolve(request.id + 1, Ok("x".into())), None);
        assert!(state.is_loading());
    }

    #[test]
    fn test_chat_prompt_is_raw_input() {
        assert_eq!(build_prompt("what is markdown?", None), "what is markdown?");
    }

    #[test]
    fn test_request_context_hides_key() {
        let context = RequestContext {
            api_key: "secret".to_string(),
            model: "m".to_string(),
        };
        assert!(!format!("{:?}", context).contains("secret"));
    }

    #[test]
    fn test_missing_credential() {
        assert_eq!(
            credential_from_env("TWINMARK_TEST_SURELY_UNSET_KEY"),
            Err(AssistantError::MissingCredential(
                "TWINMARK_TEST_SURELY_UNSET_KEY".to_string()
            ))
        );
    }
}
