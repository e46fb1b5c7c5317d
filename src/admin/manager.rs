use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::database::Database;
use crate::error::Error;
use crate::newsletter::normalize_email;

use super::{AdminSession, AdminUser, SessionId};

const SESSION_TOKEN_LENGTH: usize = 48;
const SESSION_LIFETIME_HOURS: i64 = 24;

pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;

    Ok(hash.to_string())
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = match PasswordHash::new(password_hash) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Credential check and session creation. Unknown emails and wrong passwords
/// are indistinguishable to the caller.
#[tracing::instrument(skip(db, password))]
pub async fn login(
    db: &dyn Database,
    email: &str,
    password: &str,
) -> Result<(AdminSession, AdminUser), Error> {
    let email = normalize_email(email);

    let user = db
        .admin_users()
        .fetch_admin_user_by_email(&email)
        .await?
        .ok_or(Error::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(Error::InvalidCredentials);
    }

    let now = Utc::now();
    let session = AdminSession {
        id: SessionId::new(),
        user_id: user.id,
        token: generate_token(),
        created_at: now,
        expires_at: now + Duration::hours(SESSION_LIFETIME_HOURS),
    };

    db.sessions().insert_session(&session).await?;

    Ok((session, user))
}

#[tracing::instrument(skip(db, token))]
pub async fn logout(db: &dyn Database, token: &str) -> Result<(), Error> {
    let deleted = db.sessions().delete_session_by_token(token).await?;

    if !deleted {
        return Err(Error::SessionDoesNotExist);
    }

    Ok(())
}

#[tracing::instrument(skip(db, token))]
pub async fn authenticate(db: &dyn Database, token: &str) -> Result<AdminUser, Error> {
    let session = db
        .sessions()
        .fetch_session_by_token(token)
        .await?
        .ok_or(Error::SessionDoesNotExist)?;

    if session.expires_at < Utc::now() {
        return Err(Error::SessionExpired);
    }

    let user = db
        .admin_users()
        .fetch_admin_user_by_id(session.user_id)
        .await?
        .ok_or(Error::SessionDoesNotExist)?;

    Ok(user)
}
