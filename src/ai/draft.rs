//! Drafting action: validate bullet points, request a completion, clean it up

use std::collections::BTreeMap;

use super::client::Completer;
use super::prompts::build_prompt;
use super::sanitize::strip_bold;

/// Form field holding the bullet points
pub const BULLET_POINTS_FIELD: &str = "bulletPoints";

pub const MSG_VALIDATION: &str = "Please provide some bullet points to draft an email.";
pub const MSG_BULLET_POINTS_REQUIRED: &str = "Bullet points are required";
pub const MSG_SUCCESS: &str = "Email drafted successfully!";
pub const MSG_FAILURE_PREFIX: &str = "Failed to draft email: ";

/// Field name -> validation messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Raw submitted form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: BTreeMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form with only the bullet-points field set
    pub fn with_bullet_points(text: impl Into<String>) -> Self {
        let mut form = Self::new();
        form.set(BULLET_POINTS_FIELD, text);
        form
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Validated request. `bullet_points` is the raw, untrimmed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRequest {
    bullet_points: String,
}

impl DraftRequest {
    /// Validate a form submission. Bullet points must be non-empty after trimming.
    pub fn from_form(form: &FormData) -> Result<Self, FieldErrors> {
        match form.get(BULLET_POINTS_FIELD) {
            Some(text) if !text.trim().is_empty() => Ok(Self {
                bullet_points: text.to_string(),
            }),
            _ => {
                let mut errors = FieldErrors::new();
                errors.insert(
                    BULLET_POINTS_FIELD.to_string(),
                    vec![MSG_BULLET_POINTS_REQUIRED.to_string()],
                );
                Err(errors)
            }
        }
    }

    pub fn bullet_points(&self) -> &str {
        &self.bullet_points
    }
}

/// Outcome of one drafting run; exactly one variant per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftResult {
    ValidationError { field_errors: FieldErrors },
    ServiceError { message: String },
    Success { email: String },
}

/// What the presentation layer renders. Replaced wholesale on every outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub errors: Option<FieldErrors>,
    pub message: Option<String>,
    pub email: Option<String>,
}

impl FormState {
    /// Validation messages for one field, if any
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors
            .as_ref()
            .and_then(|e| e.get(field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Message to show in the error panel: a message without an email
    pub fn error_message(&self) -> Option<&str> {
        match (&self.message, &self.email) {
            (Some(message), None) => Some(message),
            _ => None,
        }
    }
}

impl From<DraftResult> for FormState {
    fn from(result: DraftResult) -> Self {
        match result {
            DraftResult::ValidationError { field_errors } => FormState {
                errors: Some(field_errors),
                message: Some(MSG_VALIDATION.to_string()),
                email: None,
            },
            DraftResult::ServiceError { message } => FormState {
                errors: None,
                message: Some(message),
                email: None,
            },
            DraftResult::Success { email } => FormState {
                errors: None,
                message: Some(MSG_SUCCESS.to_string()),
                email: Some(email),
            },
        }
    }
}

/// Run the drafting pipeline and return the discriminated result.
///
/// Service failures are logged before being reduced to a user-facing message.
pub async fn run_draft<C: Completer>(completer: &C, form: &FormData) -> DraftResult {
    let request = match DraftRequest::from_form(form) {
        Ok(request) => request,
        Err(field_errors) => {
            tracing::debug!(?field_errors, "Draft request rejected by validation");
            return DraftResult::ValidationError { field_errors };
        }
    };

    let envelope = build_prompt(request.bullet_points());

    match completer.complete(envelope).await {
        Ok(text) => DraftResult::Success {
            email: strip_bold(&text),
        },
        Err(e) => {
            tracing::error!(error = ?e, status = ?e.status(), "Error drafting email");
            DraftResult::ServiceError {
                message: format!("{}{}", MSG_FAILURE_PREFIX, e),
            }
        }
    }
}

/// Drafting action. `previous` is read-only; a fresh state is always returned.
pub async fn draft_email<C: Completer>(
    completer: &C,
    previous: &FormState,
    form: &FormData,
) -> FormState {
    tracing::trace!(had_email = previous.email.is_some(), "draft_email called");
    run_draft(completer, form).await.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::parse_completion;
    use crate::ai::error::CompletionError;
    use crate::ai::prompts::PromptEnvelope;
    use reqwest::StatusCode;
    use std::future::Future;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Completer that replays a canned provider response through the real parser
    struct ScriptedProvider {
        status: StatusCode,
        body: &'static str,
        calls: AtomicUsize,
        last_user_message: Mutex<Option<String>>,
    }

    impl ScriptedProvider {
        fn new(status: StatusCode, body: &'static str) -> Self {
            Self {
                status,
                body,
                calls: AtomicUsize::new(0),
                last_user_message: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Completer for ScriptedProvider {
        fn complete(
            &self,
            envelope: PromptEnvelope,
        ) -> impl Future<Output = Result<String, CompletionError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_user_message.lock().unwrap() = Some(envelope.user().content.clone());
            let result = parse_completion(self.status, self.body);
            async move { result }
        }
    }

    fn ok_provider() -> ScriptedProvider {
        ScriptedProvider::new(
            StatusCode::OK,
            r#"{"choices":[{"message":{"content":"**Hi** team"}}]}"#,
        )
    }

    #[tokio::test]
    async fn test_blank_input_never_calls_provider() {
        for input in ["", "   ", "\n\t \n"] {
            let provider = ok_provider();
            let result = run_draft(&provider, &FormData::with_bullet_points(input)).await;
            assert!(matches!(result, DraftResult::ValidationError { .. }), "input {:?}", input);
            assert_eq!(provider.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_validation_error() {
        let provider = ok_provider();
        let state = draft_email(&provider, &FormState::default(), &FormData::new()).await;

        assert_eq!(state.message.as_deref(), Some(MSG_VALIDATION));
        assert_eq!(state.field_errors(BULLET_POINTS_FIELD), [MSG_BULLET_POINTS_REQUIRED]);
        assert!(state.email.is_none());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_strips_bold() {
        let provider = ok_provider();
        let state = draft_email(
            &provider,
            &FormState::default(),
            &FormData::with_bullet_points("- greet the team"),
        )
        .await;

        assert_eq!(state.email.as_deref(), Some("Hi team"));
        assert_eq!(state.message.as_deref(), Some(MSG_SUCCESS));
        assert!(state.errors.is_none());
        assert!(state.error_message().is_none());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_bullet_points_passed_verbatim() {
        let provider = ok_provider();
        let raw = "  • Discuss Q2 results\n• Request budget approval  \n";
        run_draft(&provider, &FormData::with_bullet_points(raw)).await;

        let sent = provider.last_user_message.lock().unwrap().clone().unwrap();
        assert_eq!(
            sent,
            format!("Draft a professional business email based on these bullet points:\n{}", raw)
        );
    }

    #[tokio::test]
    async fn test_upstream_error_message_surfaces() {
        let provider = ScriptedProvider::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":{"message":"overloaded"}}"#,
        );
        let state = draft_email(
            &provider,
            &FormState::default(),
            &FormData::with_bullet_points("- x"),
        )
        .await;

        let message = state.message.as_deref().unwrap();
        assert!(message.starts_with(MSG_FAILURE_PREFIX));
        assert!(message.contains("overloaded"));
        assert!(state.email.is_none());
        assert_eq!(state.error_message(), Some(message));
    }

    #[tokio::test]
    async fn test_malformed_response_is_service_error() {
        let provider = ScriptedProvider::new(StatusCode::OK, r#"{"object":"chat.completion"}"#);
        let result = run_draft(&provider, &FormData::with_bullet_points("- x")).await;

        match result {
            DraftResult::ServiceError { message } => assert!(message.starts_with(MSG_FAILURE_PREFIX)),
            other => panic!("Expected ServiceError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_previous_state_is_replaced_not_merged() {
        let previous = FormState {
            errors: Some(FieldErrors::from([(
                BULLET_POINTS_FIELD.to_string(),
                vec![MSG_BULLET_POINTS_REQUIRED.to_string()],
            )])),
            message: Some(MSG_VALIDATION.to_string()),
            email: None,
        };
        let state = draft_email(&ok_provider(), &previous, &FormData::with_bullet_points("- y")).await;

        assert!(state.errors.is_none());
        assert_eq!(state.email.as_deref(), Some("Hi team"));
        // previous is untouched
        assert_eq!(previous.message.as_deref(), Some(MSG_VALIDATION));
    }
}
