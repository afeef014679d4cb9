//! User Models

use serde::{Deserialize, Deserializer, Serialize};

/// Role code assigned to ordinary storefront customers; every other role
/// may enter the dashboard.
pub const CUSTOMER_ROLE: &str = "2001";

/// User Model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,

    /// Role code. The backend emits it as a number or a string depending on
    /// the endpoint; both normalize to the string form.
    #[serde(default, deserialize_with = "role_from_any")]
    pub role: String,
}

fn role_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    Ok(match value {
        serde_json::Value::String(role) => role,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl User {
    /// Whether this user may use the dashboard CRUD screens.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role != CUSTOMER_ROLE
    }
}

/// Payload for `POST /user/add`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Payload for `POST /user/edit/:id`; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_role_is_not_admin() {
        let user = User {
            id: 1,
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            role: CUSTOMER_ROLE.to_string(),
        };

        assert!(!user.is_admin(), "customers must not reach the dashboard");
    }

    #[test]
    fn numeric_role_normalizes_to_string() {
        let user: User = serde_json::from_str(
            r#"{"id": 2, "name": "Ada", "email": "ada@example.com", "role": 2001}"#,
        )
        .expect("user should deserialize");

        assert_eq!(user.role, CUSTOMER_ROLE);
        assert!(!user.is_admin(), "numeric customer role should still gate");
    }

    #[test]
    fn update_serializes_only_set_fields() {
        let update = UserUpdate {
            email: Some("new@example.com".to_string()),
            ..UserUpdate::default()
        };

        let body = serde_json::to_value(update).unwrap_or_default();

        assert_eq!(body, serde_json::json!({"email": "new@example.com"}));
    }
}
