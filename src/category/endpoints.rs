use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;

use super::{manager, Category, CategoryId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryBody {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CategoryBody {
    pub fn render(category: Category) -> CategoryBody {
        CategoryBody {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            created_at: category.created_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateCategoryBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[get("/categories")]
#[tracing::instrument(skip(db))]
async fn get_categories(db: Data<Box<dyn Database>>) -> Result<Json<Vec<CategoryBody>>, Error> {
    let categories = manager::get_categories(&***db).await?;

    let body = categories.into_iter().map(CategoryBody::render).collect();

    Ok(Json(body))
}

#[get("/categories/{slug}")]
#[tracing::instrument(skip(db))]
async fn get_category_by_slug(
    db: Data<Box<dyn Database>>,
    params: Path<String>,
) -> Result<Json<CategoryBody>, Error> {
    let category = manager::get_category_by_slug(&***db, &params.into_inner()).await?;

    Ok(Json(CategoryBody::render(category)))
}

#[post("/categories")]
#[tracing::instrument(skip(db))]
async fn create_category(
    db: Data<Box<dyn Database>>,
    body: Json<CreateCategoryBody>,
) -> Result<Json<CategoryBody>, Error> {
    let body = body.into_inner();
    let category = manager::create_category(&***db, body.name, body.description).await?;

    Ok(Json(CategoryBody::render(category)))
}

#[delete("/categories/{category_id}")]
#[tracing::instrument(skip(db))]
async fn delete_category(
    db: Data<Box<dyn Database>>,
    params: Path<CategoryId>,
) -> Result<HttpResponse, Error> {
    manager::delete_category(&***db, params.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
