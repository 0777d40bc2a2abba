//! The current-user record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The current-user record exactly as the server returned it.
///
/// No shape is enforced; the accessors only read well-known fields when
/// they happen to be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(Value);

impl UserRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Server-side id, rendered as a string whether it arrives as a number or text.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.str_field("username")
    }

    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    pub fn first_name(&self) -> Option<&str> {
        self.str_field("first_name")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.str_field("last_name")
    }

    /// "First Last", falling back to the username, then the email.
    pub fn display_name(&self) -> String {
        let full = [self.first_name(), self.last_name()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        self.username()
            .or_else(|| self.email())
            .unwrap_or("unknown user")
            .to_string()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors_read_known_fields() {
        let user = UserRecord::new(json!({
            "id": 42,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "username": "ada",
            "email": "ada@example.com"
        }));

        assert_eq!(user.id().as_deref(), Some("42"));
        assert_eq!(user.username(), Some("ada"));
        assert_eq!(user.email(), Some("ada@example.com"));
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_fallbacks() {
        let user = UserRecord::new(json!({ "username": "ada", "last_name": null }));
        assert_eq!(user.display_name(), "ada");

        let user = UserRecord::new(json!({ "email": "ada@example.com" }));
        assert_eq!(user.display_name(), "ada@example.com");

        let user = UserRecord::new(json!([]));
        assert_eq!(user.display_name(), "unknown user");
        assert_eq!(user.id(), None);
    }

    #[test]
    fn test_serializes_transparently() {
        let raw = json!({ "id": "u-1", "extra": { "nested": true } });
        let user: UserRecord = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(user.id().as_deref(), Some("u-1"));
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }
}
