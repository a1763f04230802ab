//! Prompt construction for email drafting

use serde::Serialize;

/// System prompt for drafting an email from bullet points
pub const DRAFT_EMAIL_SYSTEM: &str = r#"You are an assistant that drafts professional business emails based on bullet points. Structure every email as follows:
1. A greeting appropriate for a business recipient
2. A short statement of the purpose of the email
3. Body paragraphs that fully develop each bullet point
4. A conclusion with a clear call to action
5. A professional closing
Keep the tone professional but friendly. DO NOT use markdown formatting like ** for bold text or * for italic text. Use plain text only."#;

/// Prefix of the user message; the bullet points follow on the next line
pub const DRAFT_EMAIL_USER_PREFIX: &str =
    "Draft a professional business email based on these bullet points:\n";

/// Role of a message in a chat completion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A role-tagged chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// The system + user message pair sent to the completion service.
///
/// Built fresh for every request and consumed by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEnvelope {
    system: Message,
    user: Message,
}

impl PromptEnvelope {
    /// Messages in wire order (system first)
    pub fn messages(&self) -> [&Message; 2] {
        [&self.system, &self.user]
    }

    pub fn system(&self) -> &Message {
        &self.system
    }

    pub fn user(&self) -> &Message {
        &self.user
    }
}

/// Build the drafting prompt. The bullet points are embedded verbatim.
pub fn build_prompt(bullet_points: &str) -> PromptEnvelope {
    PromptEnvelope {
        system: Message {
            role: Role::System,
            content: DRAFT_EMAIL_SYSTEM.to_string(),
        },
        user: Message {
            role: Role::User,
            content: format!("{}{}", DRAFT_EMAIL_USER_PREFIX, bullet_points),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_order() {
        let envelope = build_prompt("- budget");
        let [first, second] = envelope.messages();
        assert_eq!(first.role, Role::System);
        assert_eq!(second.role, Role::User);
        assert_eq!(first.content, DRAFT_EMAIL_SYSTEM);
    }

    #[test]
    fn test_user_message_template() {
        let envelope = build_prompt("• Schedule a meeting\n• Discuss Q2 results");
        assert_eq!(
            envelope.user().content,
            "Draft a professional business email based on these bullet points:\n\
             • Schedule a meeting\n• Discuss Q2 results"
        );
    }

    #[test]
    fn test_bullet_points_not_escaped_or_trimmed() {
        let raw = "  <b>\"quotes\"</b> & **stars**\n\n";
        let envelope = build_prompt(raw);
        assert!(envelope.user().content.ends_with(raw));
        assert_eq!(
            envelope.user().content.len(),
            DRAFT_EMAIL_USER_PREFIX.len() + raw.len()
        );
    }

    #[test]
    fn test_system_prompt_forbids_markdown() {
        assert!(DRAFT_EMAIL_SYSTEM.contains("DO NOT use markdown"));
        assert!(DRAFT_EMAIL_SYSTEM.contains("greeting"));
        assert!(DRAFT_EMAIL_SYSTEM.contains("call to action"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message {
            role: Role::System,
            content: "x".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"role":"system","content":"x"}"#);
    }
}
