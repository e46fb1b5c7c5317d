use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type SubscriberId = TypedId<NewsletterSubscriber>;

/// A newsletter subscriber. Unsubscribing is a soft delete: the row is kept
/// with `is_active = false` and an unsubscribe timestamp so a later
/// subscription can reactivate it.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewsletterSubscriber {
    #[serde(rename = "_id")]
    pub id: SubscriberId,
    /// Stored normalized: trimmed and lowercased.
    pub email: String,
    pub name: Option<String>,
    pub is_active: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

impl TypedIdMarker for NewsletterSubscriber {
    fn tag() -> &'static str {
        "SUB"
    }
}

/// Canonical form used for both the existence check and storage.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Cheap shape check, applied before any store call.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = match parts.next() {
        Some(domain) => domain,
        None => return false,
    };

    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
        && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(normalize_email("Foo@Bar.com "), "foo@bar.com");
        assert_eq!(normalize_email("  LEITOR@GAZETA.COM.BR"), "leitor@gazeta.com.br");
    }

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("leitor@gazeta.com.br"));
        assert!(is_valid_email("foo.bar@example.com"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("semarroba"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("foo@"));
        assert!(!is_valid_email("foo@semponto"));
        assert!(!is_valid_email("foo@.com"));
        assert!(!is_valid_email("foo bar@example.com"));
        assert!(!is_valid_email("foo@bar@example.com"));
    }
}
