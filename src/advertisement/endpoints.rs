use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;

use super::manager::{self, AdvertisementDraft, AdvertisementPatch};
use super::{AdPosition, AdType, Advertisement, AdvertisementId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdvertisementBody {
    pub id: AdvertisementId,
    pub title: String,
    pub ad_type: AdType,
    pub content: String,
    pub link_url: Option<String>,
    pub position: AdPosition,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub impression_count: i64,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl AdvertisementBody {
    pub fn render(advertisement: Advertisement) -> AdvertisementBody {
        AdvertisementBody {
            id: advertisement.id,
            title: advertisement.title,
            ad_type: advertisement.ad_type,
            content: advertisement.content,
            link_url: advertisement.link_url,
            position: advertisement.position,
            is_active: advertisement.is_active,
            start_date: advertisement.start_date,
            end_date: advertisement.end_date,
            impression_count: advertisement.impression_count,
            click_count: advertisement.click_count,
            created_at: advertisement.created_at,
            modified_at: advertisement.modified_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateAdvertisementBody {
    pub title: String,
    pub ad_type: AdType,
    pub content: String,
    #[serde(default)]
    pub link_url: Option<String>,
    pub position: AdPosition,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

fn default_is_active() -> bool {
    true
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateAdvertisementBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub ad_type: Option<AdType>,
    #[serde(default)]
    pub content: Option<String>,
    // double Option: absent leaves the field alone, null clears it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<Option<String>>,
    #[serde(default)]
    pub position: Option<AdPosition>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<DateTime<Utc>>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActiveAdvertisementsQuery {
    #[serde(default)]
    pub position: Option<AdPosition>,
}

#[get("/advertisements")]
#[tracing::instrument(skip(db))]
async fn get_advertisements(
    db: Data<Box<dyn Database>>,
) -> Result<Json<Vec<AdvertisementBody>>, Error> {
    let advertisements = manager::get_advertisements(&***db).await?;

    let body = advertisements
        .into_iter()
        .map(AdvertisementBody::render)
        .collect();

    Ok(Json(body))
}

/// Delivery lookup. Never fails: store errors degrade to an empty list.
#[get("/advertisements/active")]
#[tracing::instrument(skip(db))]
async fn get_active_advertisements(
    db: Data<Box<dyn Database>>,
    query: Query<ActiveAdvertisementsQuery>,
) -> Json<Vec<AdvertisementBody>> {
    let advertisements = manager::get_active_by_position(&***db, query.position).await;

    let body = advertisements
        .into_iter()
        .map(AdvertisementBody::render)
        .collect();

    Json(body)
}

#[get("/advertisements/{advertisement_id}")]
#[tracing::instrument(skip(db))]
async fn get_advertisement_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<AdvertisementId>,
) -> Result<Json<AdvertisementBody>, Error> {
    let advertisement_id = params.into_inner();
    let advertisement = manager::get_advertisement_by_id(&***db, advertisement_id).await?;

    Ok(Json(AdvertisementBody::render(advertisement)))
}

#[post("/advertisements")]
#[tracing::instrument(skip(db))]
async fn create_advertisement(
    db: Data<Box<dyn Database>>,
    body: Json<CreateAdvertisementBody>,
) -> Result<Json<AdvertisementBody>, Error> {
    let body = body.into_inner();

    let draft = AdvertisementDraft {
        title: body.title,
        ad_type: body.ad_type,
        content: body.content,
        link_url: body.link_url,
        position: body.position,
        is_active: body.is_active,
        start_date: body.start_date,
        end_date: body.end_date,
    };
    let advertisement = manager::create_advertisement(&***db, draft).await?;

    Ok(Json(AdvertisementBody::render(advertisement)))
}

#[put("/advertisements/{advertisement_id}")]
#[tracing::instrument(skip(db))]
async fn update_advertisement(
    db: Data<Box<dyn Database>>,
    params: Path<AdvertisementId>,
    body: Json<UpdateAdvertisementBody>,
) -> Result<Json<AdvertisementBody>, Error> {
    let advertisement_id = params.into_inner();
    let body = body.into_inner();

    let patch = AdvertisementPatch {
        title: body.title,
        ad_type: body.ad_type,
        content: body.content,
        link_url: body.link_url,
        position: body.position,
        is_active: body.is_active,
        start_date: body.start_date,
        end_date: body.end_date,
    };
    let advertisement = manager::update_advertisement(&***db, advertisement_id, patch).await?;

    Ok(Json(AdvertisementBody::render(advertisement)))
}

#[delete("/advertisements/{advertisement_id}")]
#[tracing::instrument(skip(db))]
async fn delete_advertisement(
    db: Data<Box<dyn Database>>,
    params: Path<AdvertisementId>,
) -> Result<HttpResponse, Error> {
    let advertisement_id = params.into_inner();
    manager::delete_advertisement(&***db, advertisement_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Tracking endpoints always answer 204: a lost count must never surface as
/// a page error.
#[post("/advertisements/{advertisement_id}/impressions")]
#[tracing::instrument(skip(db))]
async fn track_impression(
    db: Data<Box<dyn Database>>,
    params: Path<AdvertisementId>,
) -> HttpResponse {
    manager::track_impression(&***db, params.into_inner()).await;

    HttpResponse::NoContent().finish()
}

#[post("/advertisements/{advertisement_id}/clicks")]
#[tracing::instrument(skip(db))]
async fn track_click(
    db: Data<Box<dyn Database>>,
    params: Path<AdvertisementId>,
) -> HttpResponse {
    manager::track_click(&***db, params.into_inner()).await;

    HttpResponse::NoContent().finish()
}
