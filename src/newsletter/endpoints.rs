use actix_web::web::{Data, Json};
use actix_web::{get, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;

use super::manager::{self, SubscribeOutcome};
use super::{NewsletterSubscriber, SubscriberId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubscriberBody {
    pub id: SubscriberId,
    pub email: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

impl SubscriberBody {
    pub fn render(subscriber: NewsletterSubscriber) -> SubscriberBody {
        SubscriberBody {
            id: subscriber.id,
            email: subscriber.email,
            name: subscriber.name,
            is_active: subscriber.is_active,
            subscribed_at: subscriber.subscribed_at,
            unsubscribed_at: subscriber.unsubscribed_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubscribeBody {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubscribeResponseBody {
    pub subscriber: SubscriberBody,
    pub reactivated: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnsubscribeBody {
    pub email: String,
}

#[post("/newsletter/subscriptions")]
#[tracing::instrument(skip(db))]
async fn subscribe(
    db: Data<Box<dyn Database>>,
    body: Json<SubscribeBody>,
) -> Result<Json<SubscribeResponseBody>, Error> {
    let body = body.into_inner();
    let (subscriber, outcome) = manager::subscribe(&***db, &body.email, body.name).await?;

    Ok(Json(SubscribeResponseBody {
        subscriber: SubscriberBody::render(subscriber),
        reactivated: outcome == SubscribeOutcome::Reactivated,
    }))
}

#[post("/newsletter/unsubscriptions")]
#[tracing::instrument(skip(db))]
async fn unsubscribe(
    db: Data<Box<dyn Database>>,
    body: Json<UnsubscribeBody>,
) -> Result<Json<SubscriberBody>, Error> {
    let subscriber = manager::unsubscribe(&***db, &body.email).await?;

    Ok(Json(SubscriberBody::render(subscriber)))
}

#[get("/newsletter/subscribers")]
#[tracing::instrument(skip(db))]
async fn get_subscribers(
    db: Data<Box<dyn Database>>,
) -> Result<Json<Vec<SubscriberBody>>, Error> {
    let subscribers = manager::get_subscribers(&***db).await?;

    let body = subscribers.into_iter().map(SubscriberBody::render).collect();

    Ok(Json(body))
}
