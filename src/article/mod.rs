use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::CategoryId;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type ArticleId = TypedId<Article>;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: ArticleId,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub body: String,
    pub category_id: Option<CategoryId>,
    pub is_published: bool,
    /// Set once, on first publish; survives later unpublish toggles.
    pub published_at: Option<DateTime<Utc>>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub modified_at: DateTime<Utc>,
}

impl TypedIdMarker for Article {
    fn tag() -> &'static str {
        "ART"
    }
}
