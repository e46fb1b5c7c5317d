use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson;
use mongodb::options::FindOptions;

use crate::database::MongoSubscriberStore;
use crate::error::Error;

use super::NewsletterSubscriber;

#[async_trait]
pub trait SubscriberStore {
    async fn insert_subscriber(&self, subscriber: &NewsletterSubscriber) -> Result<(), Error>;

    /// Lookup by normalized email; emails are unique per subscriber.
    async fn fetch_subscriber_by_email(
        &self,
        email: &str,
    ) -> Result<Option<NewsletterSubscriber>, Error>;

    async fn fetch_subscribers(&self) -> Result<Vec<NewsletterSubscriber>, Error>;

    async fn update_subscriber(
        &self,
        subscriber: &NewsletterSubscriber,
        previous_subscribed_at: DateTime<Utc>,
    ) -> Result<(), Error>;
}

#[async_trait]
impl SubscriberStore for MongoSubscriberStore {
    #[tracing::instrument(skip(self))]
    async fn insert_subscriber(&self, subscriber: &NewsletterSubscriber) -> Result<(), Error> {
        self.insert_one(subscriber, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_subscriber_by_email(
        &self,
        email: &str,
    ) -> Result<Option<NewsletterSubscriber>, Error> {
        let subscriber: Option<NewsletterSubscriber> =
            self.find_one(bson::doc! { "email": email }, None).await?;

        Ok(subscriber)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_subscribers(&self) -> Result<Vec<NewsletterSubscriber>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "subscribed_at": -1 })
            .build();
        let subscribers: Vec<NewsletterSubscriber> =
            self.find(bson::doc! {}, options).await?.try_collect().await?;

        Ok(subscribers)
    }

    #[tracing::instrument(skip(self))]
    async fn update_subscriber(
        &self,
        subscriber: &NewsletterSubscriber,
        previous_subscribed_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let previous_subscribed_at = bson::DateTime::from_chrono(previous_subscribed_at);

        let result = self
            .replace_one(
                bson::doc! { "_id": subscriber.id, "subscribed_at": previous_subscribed_at },
                subscriber,
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Error::ConcurrentModificationDetected);
        }

        Ok(())
    }
}
