use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::CategoryId;
use crate::database::Database;
use crate::error::Error;

use super::manager::{self, ArticleDraft, ArticlePatch};
use super::{Article, ArticleId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArticleBody {
    pub id: ArticleId,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub body: String,
    pub category_id: Option<CategoryId>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl ArticleBody {
    pub fn render(article: Article) -> ArticleBody {
        ArticleBody {
            id: article.id,
            title: article.title,
            slug: article.slug,
            summary: article.summary,
            body: article.body,
            category_id: article.category_id,
            is_published: article.is_published,
            published_at: article.published_at,
            created_at: article.created_at,
            modified_at: article.modified_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateArticleBody {
    pub title: String,
    pub summary: String,
    pub body: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateArticleBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<CategoryId>>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArticlesQuery {
    #[serde(default)]
    pub published: Option<bool>,
}

#[get("/articles")]
#[tracing::instrument(skip(db))]
async fn get_articles(
    db: Data<Box<dyn Database>>,
    query: Query<ArticlesQuery>,
) -> Result<Json<Vec<ArticleBody>>, Error> {
    let published_only = query.published.unwrap_or(false);
    let articles = manager::get_articles(&***db, published_only).await?;

    let body = articles.into_iter().map(ArticleBody::render).collect();

    Ok(Json(body))
}

#[get("/articles/{article_id}")]
#[tracing::instrument(skip(db))]
async fn get_article_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<ArticleId>,
) -> Result<Json<ArticleBody>, Error> {
    let article = manager::get_article_by_id(&***db, params.into_inner()).await?;

    Ok(Json(ArticleBody::render(article)))
}

/// Slug alias for article detail; the SPA serves the same page under two
/// paths.
#[get("/articles/by-slug/{slug}")]
#[tracing::instrument(skip(db))]
async fn get_article_by_slug(
    db: Data<Box<dyn Database>>,
    params: Path<String>,
) -> Result<Json<ArticleBody>, Error> {
    let article = manager::get_article_by_slug(&***db, &params.into_inner()).await?;

    Ok(Json(ArticleBody::render(article)))
}

#[get("/categories/{category_id}/articles")]
#[tracing::instrument(skip(db))]
async fn get_articles_in_category(
    db: Data<Box<dyn Database>>,
    params: Path<CategoryId>,
) -> Result<Json<Vec<ArticleBody>>, Error> {
    let articles = manager::get_articles_by_category(&***db, params.into_inner()).await?;

    let body = articles.into_iter().map(ArticleBody::render).collect();

    Ok(Json(body))
}

#[post("/articles")]
#[tracing::instrument(skip(db))]
async fn create_article(
    db: Data<Box<dyn Database>>,
    body: Json<CreateArticleBody>,
) -> Result<Json<ArticleBody>, Error> {
    let body = body.into_inner();

    let draft = ArticleDraft {
        title: body.title,
        summary: body.summary,
        body: body.body,
        category_id: body.category_id,
        is_published: body.is_published,
    };
    let article = manager::create_article(&***db, draft).await?;

    Ok(Json(ArticleBody::render(article)))
}

#[put("/articles/{article_id}")]
#[tracing::instrument(skip(db))]
async fn update_article(
    db: Data<Box<dyn Database>>,
    params: Path<ArticleId>,
    body: Json<UpdateArticleBody>,
) -> Result<Json<ArticleBody>, Error> {
    let article_id = params.into_inner();
    let body = body.into_inner();

    let patch = ArticlePatch {
        title: body.title,
        summary: body.summary,
        body: body.body,
        category_id: body.category_id,
        is_published: body.is_published,
    };
    let article = manager::update_article(&***db, article_id, patch).await?;

    Ok(Json(ArticleBody::render(article)))
}

#[delete("/articles/{article_id}")]
#[tracing::instrument(skip(db))]
async fn delete_article(
    db: Data<Box<dyn Database>>,
    params: Path<ArticleId>,
) -> Result<HttpResponse, Error> {
    manager::delete_article(&***db, params.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
