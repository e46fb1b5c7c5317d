use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson;
use mongodb::options::FindOptions;

use crate::database::MongoAdvertisementStore;
use crate::error::Error;

use super::{AdPosition, Advertisement, AdvertisementId};

#[async_trait]
pub trait AdvertisementStore {
    async fn insert_advertisement(&self, advertisement: &Advertisement) -> Result<(), Error>;

    /// All ads, newest first.
    async fn fetch_advertisements(&self) -> Result<Vec<Advertisement>, Error>;

    /// Single-row existence probe used by the startup seed.
    async fn fetch_any_advertisement(&self) -> Result<Option<Advertisement>, Error>;

    async fn fetch_advertisement_by_id(
        &self,
        advertisement_id: AdvertisementId,
    ) -> Result<Option<Advertisement>, Error>;

    /// Server-side filter: `is_active` and (optionally) position. The date
    /// window is the caller's concern.
    async fn fetch_active_advertisements(
        &self,
        position: Option<AdPosition>,
    ) -> Result<Vec<Advertisement>, Error>;

    async fn update_advertisement(
        &self,
        advertisement: &Advertisement,
        previous_modified_at: DateTime<Utc>,
    ) -> Result<(), Error>;

    /// Unguarded counter write. Concurrent read-increment-write cycles can
    /// lose an update; the counters are approximate analytics.
    async fn update_advertisement_counters(
        &self,
        advertisement_id: AdvertisementId,
        impression_count: i64,
        click_count: i64,
    ) -> Result<(), Error>;

    async fn delete_advertisement(
        &self,
        advertisement_id: AdvertisementId,
    ) -> Result<bool, Error>;
}

#[async_trait]
impl AdvertisementStore for MongoAdvertisementStore {
    #[tracing::instrument(skip(self))]
    async fn insert_advertisement(&self, advertisement: &Advertisement) -> Result<(), Error> {
        self.insert_one(advertisement, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_advertisements(&self) -> Result<Vec<Advertisement>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": -1 })
            .build();
        let advertisements: Vec<Advertisement> =
            self.find(bson::doc! {}, options).await?.try_collect().await?;

        Ok(advertisements)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_any_advertisement(&self) -> Result<Option<Advertisement>, Error> {
        let advertisement: Option<Advertisement> = self.find_one(bson::doc! {}, None).await?;

        Ok(advertisement)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_advertisement_by_id(
        &self,
        advertisement_id: AdvertisementId,
    ) -> Result<Option<Advertisement>, Error> {
        let advertisement: Option<Advertisement> = self
            .find_one(bson::doc! { "_id": advertisement_id }, None)
            .await?;

        Ok(advertisement)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_active_advertisements(
        &self,
        position: Option<AdPosition>,
    ) -> Result<Vec<Advertisement>, Error> {
        let mut filter = bson::doc! { "is_active": true };
        if let Some(position) = position {
            filter.insert("position", bson::to_bson(&position)?);
        }

        let advertisements: Vec<Advertisement> =
            self.find(filter, None).await?.try_collect().await?;

        Ok(advertisements)
    }

    #[tracing::instrument(skip(self))]
    async fn update_advertisement(
        &self,
        advertisement: &Advertisement,
        previous_modified_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let previous_modified_at = bson::DateTime::from_chrono(previous_modified_at);

        let result = self
            .replace_one(
                bson::doc! { "_id": advertisement.id, "modified_at": previous_modified_at },
                advertisement,
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Error::ConcurrentModificationDetected);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn update_advertisement_counters(
        &self,
        advertisement_id: AdvertisementId,
        impression_count: i64,
        click_count: i64,
    ) -> Result<(), Error> {
        self.update_one(
            bson::doc! { "_id": advertisement_id },
            bson::doc! { "$set": {
                "impression_count": impression_count,
                "click_count": click_count,
            } },
            None,
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_advertisement(
        &self,
        advertisement_id: AdvertisementId,
    ) -> Result<bool, Error> {
        let result = self
            .delete_one(bson::doc! { "_id": advertisement_id }, None)
            .await?;

        Ok(result.deleted_count > 0)
    }
}
