use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type AdminUserId = TypedId<AdminUser>;
pub type SessionId = TypedId<AdminSession>;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AdminUser {
    #[serde(rename = "_id")]
    pub id: AdminUserId,
    pub email: String,
    /// Argon2 PHC string; never rendered in any body.
    pub password_hash: String,
    pub display_name: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl TypedIdMarker for AdminUser {
    fn tag() -> &'static str {
        "ADM"
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AdminSession {
    #[serde(rename = "_id")]
    pub id: SessionId,
    pub user_id: AdminUserId,
    pub token: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub expires_at: DateTime<Utc>,
}

impl TypedIdMarker for AdminSession {
    fn tag() -> &'static str {
        "SES"
    }
}
