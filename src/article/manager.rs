use chrono::Utc;

use crate::category::{slugify, CategoryId};
use crate::database::Database;
use crate::error::Error;

use super::{Article, ArticleId};

#[derive(Clone, Debug)]
pub struct ArticleDraft {
    pub title: String,
    pub summary: String,
    pub body: String,
    pub category_id: Option<CategoryId>,
    pub is_published: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub category_id: Option<Option<CategoryId>>,
    pub is_published: Option<bool>,
}

#[tracing::instrument(skip(db))]
pub async fn create_article(db: &dyn Database, draft: ArticleDraft) -> Result<Article, Error> {
    let slug = slugify(&draft.title);
    if db.articles().fetch_article_by_slug(&slug).await?.is_some() {
        return Err(Error::SlugAlreadyExists { slug });
    }

    if let Some(category_id) = draft.category_id {
        db.categories()
            .fetch_category_by_id(category_id)
            .await?
            .ok_or(Error::CategoryDoesNotExist { category_id })?;
    }

    let now = Utc::now();
    let article = Article {
        id: ArticleId::new(),
        title: draft.title,
        slug,
        summary: draft.summary,
        body: draft.body,
        category_id: draft.category_id,
        is_published: draft.is_published,
        published_at: if draft.is_published { Some(now) } else { None },
        created_at: now,
        modified_at: now,
    };

    db.articles().insert_article(&article).await?;

    Ok(article)
}

#[tracing::instrument(skip(db))]
pub async fn get_articles(db: &dyn Database, published_only: bool) -> Result<Vec<Article>, Error> {
    let mut articles = db.articles().fetch_articles(published_only).await?;

    // published listings are ordered by publish date where known
    if published_only {
        articles.sort_by_key(|article| {
            std::cmp::Reverse(article.published_at.unwrap_or(article.created_at))
        });
    }

    Ok(articles)
}

#[tracing::instrument(skip(db))]
pub async fn get_article_by_id(db: &dyn Database, article_id: ArticleId) -> Result<Article, Error> {
    let article = db
        .articles()
        .fetch_article_by_id(article_id)
        .await?
        .ok_or(Error::ArticleDoesNotExist { article_id })?;

    Ok(article)
}

#[tracing::instrument(skip(db))]
pub async fn get_article_by_slug(db: &dyn Database, slug: &str) -> Result<Article, Error> {
    let article = db
        .articles()
        .fetch_article_by_slug(slug)
        .await?
        .ok_or_else(|| Error::ArticleSlugDoesNotExist {
            slug: slug.to_string(),
        })?;

    Ok(article)
}

#[tracing::instrument(skip(db))]
pub async fn get_articles_by_category(
    db: &dyn Database,
    category_id: CategoryId,
) -> Result<Vec<Article>, Error> {
    db.categories()
        .fetch_category_by_id(category_id)
        .await?
        .ok_or(Error::CategoryDoesNotExist { category_id })?;

    let articles = db.articles().fetch_articles_by_category(category_id).await?;

    Ok(articles)
}

#[tracing::instrument(skip(db))]
pub async fn update_article(
    db: &dyn Database,
    article_id: ArticleId,
    patch: ArticlePatch,
) -> Result<Article, Error> {
    let mut article = get_article_by_id(db, article_id).await?;
    let previous_modified_at = article.modified_at;

    if let Some(title) = patch.title {
        article.title = title;
    }
    if let Some(summary) = patch.summary {
        article.summary = summary;
    }
    if let Some(body) = patch.body {
        article.body = body;
    }
    if let Some(category_id) = patch.category_id {
        if let Some(category_id) = category_id {
            db.categories()
                .fetch_category_by_id(category_id)
                .await?
                .ok_or(Error::CategoryDoesNotExist { category_id })?;
        }
        article.category_id = category_id;
    }
    if let Some(is_published) = patch.is_published {
        article.is_published = is_published;
        if is_published && article.published_at.is_none() {
            article.published_at = Some(Utc::now());
        }
    }
    article.modified_at = Utc::now();

    db.articles()
        .update_article(&article, previous_modified_at)
        .await?;

    Ok(article)
}

#[tracing::instrument(skip(db))]
pub async fn delete_article(db: &dyn Database, article_id: ArticleId) -> Result<(), Error> {
    let deleted = db.articles().delete_article(article_id).await?;

    if !deleted {
        return Err(Error::ArticleDoesNotExist { article_id });
    }

    Ok(())
}
