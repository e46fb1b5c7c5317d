use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson;
use mongodb::options::FindOptions;

use crate::database::MongoCategoryStore;
use crate::error::Error;

use super::{Category, CategoryId};

#[async_trait]
pub trait CategoryStore {
    async fn insert_category(&self, category: &Category) -> Result<(), Error>;

    async fn fetch_categories(&self) -> Result<Vec<Category>, Error>;

    async fn fetch_category_by_id(
        &self,
        category_id: CategoryId,
    ) -> Result<Option<Category>, Error>;

    async fn fetch_category_by_slug(&self, slug: &str) -> Result<Option<Category>, Error>;

    async fn delete_category(&self, category_id: CategoryId) -> Result<bool, Error>;
}

#[async_trait]
impl CategoryStore for MongoCategoryStore {
    #[tracing::instrument(skip(self))]
    async fn insert_category(&self, category: &Category) -> Result<(), Error> {
        self.insert_one(category, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_categories(&self) -> Result<Vec<Category>, Error> {
        let options = FindOptions::builder().sort(bson::doc! { "name": 1 }).build();
        let categories: Vec<Category> =
            self.find(bson::doc! {}, options).await?.try_collect().await?;

        Ok(categories)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_category_by_id(
        &self,
        category_id: CategoryId,
    ) -> Result<Option<Category>, Error> {
        let category: Option<Category> =
            self.find_one(bson::doc! { "_id": category_id }, None).await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_category_by_slug(&self, slug: &str) -> Result<Option<Category>, Error> {
        let category: Option<Category> =
            self.find_one(bson::doc! { "slug": slug }, None).await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_category(&self, category_id: CategoryId) -> Result<bool, Error> {
        let result = self
            .delete_one(bson::doc! { "_id": category_id }, None)
            .await?;

        Ok(result.deleted_count > 0)
    }
}
