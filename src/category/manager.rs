use chrono::Utc;

use crate::database::Database;
use crate::error::Error;

use super::{slugify, Category, CategoryId};

#[tracing::instrument(skip(db))]
pub async fn create_category(
    db: &dyn Database,
    name: String,
    description: Option<String>,
) -> Result<Category, Error> {
    let slug = slugify(&name);
    if db.categories().fetch_category_by_slug(&slug).await?.is_some() {
        return Err(Error::SlugAlreadyExists { slug });
    }

    let category = Category {
        id: CategoryId::new(),
        name,
        slug,
        description,
        created_at: Utc::now(),
    };

    db.categories().insert_category(&category).await?;

    Ok(category)
}

#[tracing::instrument(skip(db))]
pub async fn get_categories(db: &dyn Database) -> Result<Vec<Category>, Error> {
    let categories = db.categories().fetch_categories().await?;

    Ok(categories)
}

#[tracing::instrument(skip(db))]
pub async fn get_category_by_slug(db: &dyn Database, slug: &str) -> Result<Category, Error> {
    let category = db
        .categories()
        .fetch_category_by_slug(slug)
        .await?
        .ok_or_else(|| Error::CategorySlugDoesNotExist {
            slug: slug.to_string(),
        })?;

    Ok(category)
}

/// Deletes the category and detaches every article that pointed at it.
#[tracing::instrument(skip(db))]
pub async fn delete_category(db: &dyn Database, category_id: CategoryId) -> Result<(), Error> {
    let deleted = db.categories().delete_category(category_id).await?;
    if !deleted {
        return Err(Error::CategoryDoesNotExist { category_id });
    }

    db.articles().clear_category(category_id).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test::MockDatabase;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn create_category_derives_slug_from_name() {
        let mut db = MockDatabase::new();
        db.categories.on_fetch_category_by_slug = Box::new(|_| Ok(None));
        db.categories.on_insert_category = Box::new(|category| {
            assert_eq!(category.slug, "tecnologia");
            Ok(())
        });

        let category = create_category(&db, "Tecnologia".to_string(), None)
            .await
            .unwrap();

        assert_eq!(category.slug, "tecnologia");
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let mut db = MockDatabase::new();
        db.categories.on_fetch_category_by_slug = Box::new(|slug| {
            Ok(Some(Category {
                id: CategoryId::new(),
                name: "Tecnologia".to_string(),
                slug: slug.to_string(),
                description: None,
                created_at: Utc::now(),
            }))
        });

        let result = create_category(&db, "Tecnologia".to_string(), None).await;

        assert_eq!(
            result.unwrap_err(),
            Error::SlugAlreadyExists {
                slug: "tecnologia".to_string()
            }
        );
    }

    #[tokio::test]
    async fn deleting_a_category_detaches_its_articles() {
        let mut db = MockDatabase::new();
        db.categories.on_delete_category = Box::new(|_| Ok(true));
        let cleared = Arc::new(Mutex::new(false));
        let cleared_clone = Arc::clone(&cleared);
        db.articles.on_clear_category = Box::new(move |_| {
            *cleared_clone.lock().unwrap() = true;
            Ok(())
        });

        delete_category(&db, CategoryId::new()).await.unwrap();

        assert!(*cleared.lock().unwrap(), "articles were not detached");
    }
}
