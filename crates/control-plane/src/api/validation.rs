// Input validation for agent and chat APIs
//
// Field rules for each request body, plus last-resort size limits that guard
// the service from abuse. Every violated rule is reported in one response.

use agentry_core::{ModelId, NewAgent, ValidationErrors, Validator};

// =============================================================================
// Input Size Limits
// =============================================================================

/// Maximum size for agent name field.
pub const MAX_AGENT_NAME_BYTES: usize = 2 * 1024; // 2 KB

/// Maximum size for agent description field.
pub const MAX_AGENT_DESCRIPTION_BYTES: usize = 10 * 1024; // 10 KB

/// Maximum size for agent behavior.
pub const MAX_AGENT_BEHAVIOR_BYTES: usize = 1024 * 1024; // 1 MB

/// Maximum size for a prompt or chat message.
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024; // 1 MB

/// Minimum length of an agent's behavior, in characters.
pub const MIN_BEHAVIOR_CHARS: usize = 10;

// =============================================================================
// Validation Functions
// =============================================================================

/// Validate the fields of a create-agent request and build the store input.
pub fn validate_create_agent(
    name: &str,
    description: Option<&str>,
    behavior: &str,
    model: &str,
) -> Result<NewAgent, ValidationErrors> {
    let allowed = ModelId::allowed_ids();
    let model_message = format!("Invalid model, expected one of: {}", allowed.join(", "));

    let mut v = Validator::new();
    v.non_empty("name", name, "Name is required")
        .max_bytes("name", name, MAX_AGENT_NAME_BYTES, "Name is too long")
        .min_chars(
            "behavior",
            behavior,
            MIN_BEHAVIOR_CHARS,
            "Behavior must be at least 10 characters long",
        )
        .max_bytes(
            "behavior",
            behavior,
            MAX_AGENT_BEHAVIOR_BYTES,
            "Behavior is too long",
        )
        .one_of("model", model, &allowed, &model_message);
    if let Some(desc) = description {
        v.max_bytes(
            "description",
            desc,
            MAX_AGENT_DESCRIPTION_BYTES,
            "Description is too long",
        );
    }
    v.finish()?;

    let model = model
        .parse::<ModelId>()
        .map_err(|e| ValidationErrors::single("model", e))?;

    Ok(NewAgent {
        name: name.to_string(),
        description: description.map(str::to_string),
        behavior: behavior.to_string(),
        model,
    })
}

/// Validate a prompt or chat message.
pub fn validate_message(message: &str) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    v.non_empty("message", message, "Message is required")
        .max_bytes("message", message, MAX_MESSAGE_BYTES, "Message is too long");
    v.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEHAVIOR: &str = "You answer billing questions";

    #[test]
    fn test_valid_agent() {
        let agent = validate_create_agent("Billing", None, BEHAVIOR, "gpt-4o").unwrap();
        assert_eq!(agent.model, ModelId::Gpt4o);
        assert_eq!(agent.description, None);
    }

    #[test]
    fn test_short_behavior_names_behavior_field() {
        let errors = validate_create_agent("Billing", None, "too short", "gpt-4o").unwrap_err();
        assert_eq!(errors.fields(), vec!["behavior"]);
    }

    #[test]
    fn test_behavior_boundary() {
        assert!(validate_create_agent("Billing", None, "0123456789", "gpt-4o").is_ok());
        assert!(validate_create_agent("Billing", None, "012345678", "gpt-4o").is_err());
    }

    #[test]
    fn test_all_violations_reported() {
        let errors = validate_create_agent("", None, "", "gpt-5").unwrap_err();
        assert_eq!(errors.fields(), vec!["name", "behavior", "model"]);
        assert!(errors.errors[2].message.contains("claude-3-sonnet"));
    }

    #[test]
    fn test_oversized_fields() {
        let name = "x".repeat(MAX_AGENT_NAME_BYTES + 1);
        let desc = "x".repeat(MAX_AGENT_DESCRIPTION_BYTES + 1);
        let errors = validate_create_agent(&name, Some(&desc), BEHAVIOR, "gpt-4o").unwrap_err();
        assert_eq!(errors.fields(), vec!["name", "description"]);
    }

    #[test]
    fn test_message_rules() {
        assert!(validate_message("hello").is_ok());
        assert!(validate_message("").unwrap_err().has_field("message"));
        assert!(validate_message(&"x".repeat(MAX_MESSAGE_BYTES + 1)).is_err());
    }
}
