//! Wire shapes exchanged with the authentication service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ports::RejectedFields;
use crate::domain::{RegistrationField, RegistrationPayload};

/// Body of `POST users/register/`. Deliberately not `Debug`.
#[derive(Serialize)]
pub(super) struct RegisterUserRequestDto<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a RegistrationPayload> for RegisterUserRequestDto<'a> {
    fn from(payload: &'a RegistrationPayload) -> Self {
        Self {
            first_name: payload.first_name(),
            last_name: payload.last_name(),
            email: payload.email(),
            password: payload.password(),
        }
    }
}

/// Form-level keys that carry a message rather than a field error.
const MESSAGE_KEYS: [&str; 4] = ["detail", "message", "error", "non_field_errors"];

/// A single message or a list of messages, as REST frameworks emit them.
#[derive(Deserialize)]
#[serde(untagged)]
enum MessagesDto {
    One(String),
    Many(Vec<String>),
}

impl MessagesDto {
    fn joined(self) -> Option<String> {
        let joined = match self {
            Self::One(message) => message,
            Self::Many(messages) => messages.join(" "),
        };
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}

/// Messages extracted from a rejection body.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct RejectionDto {
    pub(super) message: Option<String>,
    pub(super) fields: RejectedFields,
}

impl RejectionDto {
    /// Parse a JSON object body. Unknown keys and non-JSON bodies are ignored.
    pub(super) fn from_body(body: &[u8]) -> Self {
        let Ok(object) = serde_json::from_slice::<Map<String, Value>>(body) else {
            return Self::default();
        };

        let mut rejection = Self::default();
        for (key, value) in object {
            let Some(text) = serde_json::from_value::<MessagesDto>(value)
                .ok()
                .and_then(MessagesDto::joined)
            else {
                continue;
            };

            if let Some(field) = RegistrationField::from_wire_name(&key) {
                rejection.fields.insert(field, text);
            } else if MESSAGE_KEYS.contains(&key.as_str()) && rejection.message.is_none() {
                rejection.message = Some(text);
            }
        }
        rejection
    }

    /// Message for the banner: the form-level one, else the first field's.
    pub(super) fn summary(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.fields.values().next().cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for request encoding and rejection body parsing.
    use super::*;
    use crate::domain::{RegistrationInput, validate};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn request_uses_snake_case_wire_names() {
        let payload = validate(&RegistrationInput::new(
            "Ana",
            "Cruz",
            "ana@example.com",
            "secret1",
            "secret1",
        ))
        .expect("valid input")
        .into_payload();

        let encoded =
            serde_json::to_value(RegisterUserRequestDto::from(&payload)).expect("serialise");
        assert_eq!(
            encoded,
            json!({
                "first_name": "Ana",
                "last_name": "Cruz",
                "email": "ana@example.com",
                "password": "secret1",
            })
        );
    }

    #[rstest]
    fn field_lists_map_onto_form_fields() {
        let body = json!({
            "email": ["user with this email already exists."],
            "password": ["This password is too common.", "It is entirely numeric."],
            "username": ["ignored"],
        });
        let rejection = RejectionDto::from_body(body.to_string().as_bytes());

        assert_eq!(rejection.message, None);
        assert_eq!(
            rejection.fields,
            RejectedFields::from([
                (
                    RegistrationField::Email,
                    "user with this email already exists.".to_owned()
                ),
                (
                    RegistrationField::Password,
                    "This password is too common. It is entirely numeric.".to_owned()
                ),
            ])
        );
        assert_eq!(
            rejection.summary().as_deref(),
            Some("user with this email already exists.")
        );
    }

    #[rstest]
    #[case(json!({"detail": "Registration is closed."}), "Registration is closed.")]
    #[case(json!({"non_field_errors": ["Try again later."]}), "Try again later.")]
    #[case(json!({"message": "Nope", "first_name": "Too long."}), "Nope")]
    fn form_level_messages_become_the_summary(#[case] body: Value, #[case] expected: &str) {
        let rejection = RejectionDto::from_body(body.to_string().as_bytes());
        assert_eq!(rejection.summary().as_deref(), Some(expected));
    }

    #[rstest]
    #[case(b"<html>Bad Request</html>".as_slice())]
    #[case(b"[\"not\", \"an\", \"object\"]".as_slice())]
    #[case(b"{\"email\": 42, \"detail\": \"   \"}".as_slice())]
    #[case(b"".as_slice())]
    fn unusable_bodies_yield_nothing(#[case] body: &[u8]) {
        assert_eq!(RejectionDto::from_body(body), RejectionDto::default());
    }
}
