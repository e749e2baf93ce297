use serde::{Deserialize, Serialize};

/// Error payload returned by the backend on non-2xx responses.
///
/// The hosted backend answers with a bare string or `{ "message": .. }`; the
/// local mock server answers with `{ "error": .. }`. Both fields are optional so
/// either shape decodes.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Returns the most specific message carried by the body.
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|msg| !msg.trim().is_empty())
    }
}

pub mod user {
    use super::*;

    /// User record as stored by the backend.
    ///
    /// The backend keeps the password in clear text and returns it on reads;
    /// the client compares it locally on login.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct User {
        pub id: String,
        pub username: String,
        #[serde(default)]
        pub password: String,
        #[serde(default)]
        pub created_at: String,
    }

    /// Request body for `POST /users`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserNew {
        pub username: String,
        pub password: String,
        /// RFC3339 timestamp stamped by the client at signup.
        #[serde(default)]
        pub created_at: String,
    }
}

pub mod expense {
    use super::*;

    /// Expense record as stored by the backend.
    ///
    /// `amount` is decimal text, never a float. `user_id` is the owner.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Expense {
        pub id: String,
        pub name: String,
        pub amount: String,
        #[serde(default)]
        pub description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub title: Option<String>,
        /// RFC3339 timestamp of when the expense happened.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub date: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub payment_method: Option<String>,
        #[serde(default)]
        pub created_at: String,
        pub user_id: String,
    }

    /// Request body for `POST /expenses`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        pub name: String,
        pub amount: String,
        pub description: String,
        pub category: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub title: Option<String>,
        pub date: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub payment_method: Option<String>,
        pub user_id: String,
    }

    /// Request body for `PUT /expenses/{id}`.
    ///
    /// Every field is optional: only the present ones are changed.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub date: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub payment_method: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub user_id: Option<String>,
    }

    impl ExpenseUpdate {
        /// Returns `true` when no field would be changed.
        pub fn is_empty(&self) -> bool {
            self.name.is_none()
                && self.amount.is_none()
                && self.description.is_none()
                && self.category.is_none()
                && self.title.is_none()
                && self.date.is_none()
                && self.payment_method.is_none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expense_uses_camel_case_on_the_wire() {
        let raw = r#"{
            "id": "7",
            "name": "Lunch",
            "amount": "12.50",
            "description": "sandwich",
            "category": "Food",
            "createdAt": "2025-02-12T10:00:00.000Z",
            "userId": "3"
        }"#;
        let expense: expense::Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(expense.user_id, "3");
        assert_eq!(expense.created_at, "2025-02-12T10:00:00.000Z");
        assert_eq!(expense.date, None);
    }

    #[test]
    fn update_skips_absent_fields() {
        let update = expense::ExpenseUpdate {
            name: Some("Dinner".to_string()),
            user_id: Some("3".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Dinner", "userId": "3" }));
    }

    #[test]
    fn error_body_prefers_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"nope","error":"other"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("nope"));

        let body: ErrorBody = serde_json::from_str(r#"{"error":"missing"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("missing"));
    }
}
