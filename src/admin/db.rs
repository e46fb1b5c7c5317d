use async_trait::async_trait;
use mongodb::bson;

use crate::database::{MongoAdminUserStore, MongoSessionStore};
use crate::error::Error;

use super::{AdminSession, AdminUser, AdminUserId};

#[async_trait]
pub trait AdminUserStore {
    async fn insert_admin_user(&self, user: &AdminUser) -> Result<(), Error>;

    async fn fetch_admin_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, Error>;

    async fn fetch_admin_user_by_id(
        &self,
        user_id: AdminUserId,
    ) -> Result<Option<AdminUser>, Error>;

    /// Existence probe for the bootstrap seed.
    async fn fetch_any_admin_user(&self) -> Result<Option<AdminUser>, Error>;
}

#[async_trait]
impl AdminUserStore for MongoAdminUserStore {
    #[tracing::instrument(skip(self, user))]
    async fn insert_admin_user(&self, user: &AdminUser) -> Result<(), Error> {
        self.insert_one(user, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_admin_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, Error> {
        let user: Option<AdminUser> = self.find_one(bson::doc! { "email": email }, None).await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_admin_user_by_id(
        &self,
        user_id: AdminUserId,
    ) -> Result<Option<AdminUser>, Error> {
        let user: Option<AdminUser> = self.find_one(bson::doc! { "_id": user_id }, None).await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_any_admin_user(&self) -> Result<Option<AdminUser>, Error> {
        let user: Option<AdminUser> = self.find_one(bson::doc! {}, None).await?;

        Ok(user)
    }
}

#[async_trait]
pub trait SessionStore {
    async fn insert_session(&self, session: &AdminSession) -> Result<(), Error>;

    async fn fetch_session_by_token(&self, token: &str) -> Result<Option<AdminSession>, Error>;

    async fn delete_session_by_token(&self, token: &str) -> Result<bool, Error>;
}

#[async_trait]
impl SessionStore for MongoSessionStore {
    #[tracing::instrument(skip(self, session))]
    async fn insert_session(&self, session: &AdminSession) -> Result<(), Error> {
        self.insert_one(session, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, token))]
    async fn fetch_session_by_token(&self, token: &str) -> Result<Option<AdminSession>, Error> {
        let session: Option<AdminSession> =
            self.find_one(bson::doc! { "token": token }, None).await?;

        Ok(session)
    }

    #[tracing::instrument(skip(self, token))]
    async fn delete_session_by_token(&self, token: &str) -> Result<bool, Error> {
        let result = self.delete_one(bson::doc! { "token": token }, None).await?;

        Ok(result.deleted_count > 0)
    }
}
