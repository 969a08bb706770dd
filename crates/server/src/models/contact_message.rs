//! Contact message record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fenet_core::{ContactMessageId, Email};

/// A message submitted through the public contact form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(rename = "_id")]
    pub id: ContactMessageId,
    pub name: String,
    pub email: Email,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_serializes_with_client_field_names() {
        let message = ContactMessage {
            id: ContactMessageId::new(3),
            name: "Selam".to_owned(),
            email: Email::parse("selam@example.com").unwrap(),
            message: "Do you open on holidays?".to_owned(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["_id"], 3);
        assert!(json.get("id").is_none());
        assert_eq!(json["email"], "selam@example.com");
        assert!(json["createdAt"].is_string());
    }
}
