use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson;
use mongodb::options::FindOptions;

use crate::category::CategoryId;
use crate::database::MongoArticleStore;
use crate::error::Error;

use super::{Article, ArticleId};

#[async_trait]
pub trait ArticleStore {
    async fn insert_article(&self, article: &Article) -> Result<(), Error>;

    /// All articles, or only published ones, newest first.
    async fn fetch_articles(&self, published_only: bool) -> Result<Vec<Article>, Error>;

    async fn fetch_article_by_id(&self, article_id: ArticleId) -> Result<Option<Article>, Error>;

    async fn fetch_article_by_slug(&self, slug: &str) -> Result<Option<Article>, Error>;

    async fn fetch_articles_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Article>, Error>;

    async fn update_article(
        &self,
        article: &Article,
        previous_modified_at: DateTime<Utc>,
    ) -> Result<(), Error>;

    async fn delete_article(&self, article_id: ArticleId) -> Result<bool, Error>;

    /// Detaches every article pointing at `category_id`.
    async fn clear_category(&self, category_id: CategoryId) -> Result<(), Error>;
}

#[async_trait]
impl ArticleStore for MongoArticleStore {
    #[tracing::instrument(skip(self))]
    async fn insert_article(&self, article: &Article) -> Result<(), Error> {
        self.insert_one(article, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_articles(&self, published_only: bool) -> Result<Vec<Article>, Error> {
        let filter = if published_only {
            bson::doc! { "is_published": true }
        } else {
            bson::doc! {}
        };
        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": -1 })
            .build();
        let articles: Vec<Article> = self.find(filter, options).await?.try_collect().await?;

        Ok(articles)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_article_by_id(&self, article_id: ArticleId) -> Result<Option<Article>, Error> {
        let article: Option<Article> =
            self.find_one(bson::doc! { "_id": article_id }, None).await?;

        Ok(article)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_article_by_slug(&self, slug: &str) -> Result<Option<Article>, Error> {
        let article: Option<Article> = self.find_one(bson::doc! { "slug": slug }, None).await?;

        Ok(article)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_articles_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Article>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": -1 })
            .build();
        let articles: Vec<Article> = self
            .find(bson::doc! { "category_id": category_id }, options)
            .await?
            .try_collect()
            .await?;

        Ok(articles)
    }

    #[tracing::instrument(skip(self))]
    async fn update_article(
        &self,
        article: &Article,
        previous_modified_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let previous_modified_at = bson::DateTime::from_chrono(previous_modified_at);

        let result = self
            .replace_one(
                bson::doc! { "_id": article.id, "modified_at": previous_modified_at },
                article,
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Error::ConcurrentModificationDetected);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_article(&self, article_id: ArticleId) -> Result<bool, Error> {
        let result = self.delete_one(bson::doc! { "_id": article_id }, None).await?;

        Ok(result.deleted_count > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn clear_category(&self, category_id: CategoryId) -> Result<(), Error> {
        self.update_many(
            bson::doc! { "category_id": category_id },
            bson::doc! { "$set": { "category_id": bson::Bson::Null } },
            None,
        )
        .await?;

        Ok(())
    }
}
