use actix_web::web::{Data, Json};
use actix_web::{post, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;

use super::manager;
use super::AdminUserId;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionBody {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: AdminUserId,
    pub display_name: String,
}

#[post("/admin/login")]
#[tracing::instrument(skip(db, body))]
async fn login(
    db: Data<Box<dyn Database>>,
    body: Json<LoginBody>,
) -> Result<Json<SessionBody>, Error> {
    let body = body.into_inner();
    let (session, user) = manager::login(&***db, &body.email, &body.password).await?;

    Ok(Json(SessionBody {
        token: session.token,
        expires_at: session.expires_at,
        user_id: user.id,
        display_name: user.display_name,
    }))
}

#[post("/admin/logout")]
#[tracing::instrument(skip(db, request))]
async fn logout(db: Data<Box<dyn Database>>, request: HttpRequest) -> Result<HttpResponse, Error> {
    let token = bearer_token(&request)?;
    manager::logout(&***db, token).await?;

    Ok(HttpResponse::NoContent().finish())
}

fn bearer_token(request: &HttpRequest) -> Result<&str, Error> {
    request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(Error::SessionDoesNotExist)
}
