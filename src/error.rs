use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use argon2::password_hash::Error as PasswordHashError;
use derivative::Derivative;
use mongodb::bson::ser::Error as BsonError;
use mongodb::error::Error as DatabaseError;
use serde::{Serialize, Serializer};

use crate::advertisement::AdvertisementId;
use crate::article::ArticleId;
use crate::category::CategoryId;

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq, Eq)]
#[serde(untagged)]
pub enum Error {
    // 400
    #[serde(serialize_with = "display")]
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    #[serde(serialize_with = "display")]
    InvalidForm(#[derivative(PartialEq = "ignore")] UrlencodedError),
    #[serde(serialize_with = "display")]
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    InvalidEmailAddress {
        email: String,
    },

    // 401
    InvalidCredentials,
    SessionDoesNotExist,
    SessionExpired,

    // 404
    PathDoesNotExist,
    AdvertisementDoesNotExist {
        advertisement_id: AdvertisementId,
    },
    ArticleDoesNotExist {
        article_id: ArticleId,
    },
    ArticleSlugDoesNotExist {
        slug: String,
    },
    CategoryDoesNotExist {
        category_id: CategoryId,
    },
    CategorySlugDoesNotExist {
        slug: String,
    },
    SubscriberDoesNotExist {
        email: String,
    },

    // 409
    ConcurrentModificationDetected,
    AlreadySubscribed {
        email: String,
    },
    SlugAlreadyExists {
        slug: String,
    },

    // 500
    #[serde(serialize_with = "display")]
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    #[serde(serialize_with = "display")]
    FailedToSerializeToBson(#[derivative(PartialEq = "ignore")] BsonError),
    #[serde(serialize_with = "display")]
    FailedToHashPassword(#[derivative(PartialEq = "ignore")] PasswordHashError),
    #[serde(serialize_with = "display")]
    IoError(#[derivative(PartialEq = "ignore")] IoError),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "E4001000",
            Error::InvalidPath(_) => "E4001001",
            Error::InvalidForm(_) => "E4001002",
            Error::InvalidQuery(_) => "E4001003",
            Error::InvalidEmailAddress { .. } => "E4001004",
            Error::InvalidCredentials => "E4011000",
            Error::SessionDoesNotExist => "E4011001",
            Error::SessionExpired => "E4011002",
            Error::PathDoesNotExist => "E4041000",
            Error::AdvertisementDoesNotExist { .. } => "E4041001",
            Error::ArticleDoesNotExist { .. } => "E4041002",
            Error::ArticleSlugDoesNotExist { .. } => "E4041003",
            Error::CategoryDoesNotExist { .. } => "E4041004",
            Error::CategorySlugDoesNotExist { .. } => "E4041005",
            Error::SubscriberDoesNotExist { .. } => "E4041006",
            Error::ConcurrentModificationDetected => "E4091000",
            Error::AlreadySubscribed { .. } => "E4091001",
            Error::SlugAlreadyExists { .. } => "E4091002",
            Error::FailedDatabaseCall(_) => "E5001000",
            Error::FailedToSerializeToBson(_) => "E5001001",
            Error::FailedToHashPassword(_) => "E5001002",
            Error::IoError(_) => "E5001003",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidForm(_) => "The given form could not be parsed",
            Error::InvalidQuery(_) => "The given query could not be parsed",
            Error::InvalidEmailAddress { .. } => "The given email address is not valid",
            Error::InvalidCredentials => "The given credentials are not valid",
            Error::SessionDoesNotExist => "The given session token is not known",
            Error::SessionExpired => "The given session has expired",
            Error::PathDoesNotExist => "The requested path was not found",
            Error::AdvertisementDoesNotExist { .. } => {
                "The requested advertisement was not found"
            }
            Error::ArticleDoesNotExist { .. } => "The requested article was not found",
            Error::ArticleSlugDoesNotExist { .. } => {
                "No article exists with the requested slug"
            }
            Error::CategoryDoesNotExist { .. } => "The requested category was not found",
            Error::CategorySlugDoesNotExist { .. } => {
                "No category exists with the requested slug"
            }
            Error::SubscriberDoesNotExist { .. } => {
                "No subscriber exists with the requested email"
            }
            Error::ConcurrentModificationDetected => {
                "The server detected a concurrent modification"
            }
            Error::AlreadySubscribed { .. } => "The given email is already subscribed",
            Error::SlugAlreadyExists { .. } => "The given slug is already in use",
            Error::FailedDatabaseCall(_) => {
                "An error occurred when communicating with the database"
            }
            Error::FailedToSerializeToBson(_) => {
                "An error occurred when serializing an object to bson"
            }
            Error::FailedToHashPassword(_) => {
                "An error occurred when processing a password hash"
            }
            Error::IoError(_) => "An error occurred during an I/O operation",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::InvalidEmailAddress { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::SessionDoesNotExist => StatusCode::UNAUTHORIZED,
            Error::SessionExpired => StatusCode::UNAUTHORIZED,
            Error::PathDoesNotExist => StatusCode::NOT_FOUND,
            Error::AdvertisementDoesNotExist { .. } => StatusCode::NOT_FOUND,
            Error::ArticleDoesNotExist { .. } => StatusCode::NOT_FOUND,
            Error::ArticleSlugDoesNotExist { .. } => StatusCode::NOT_FOUND,
            Error::CategoryDoesNotExist { .. } => StatusCode::NOT_FOUND,
            Error::CategorySlugDoesNotExist { .. } => StatusCode::NOT_FOUND,
            Error::SubscriberDoesNotExist { .. } => StatusCode::NOT_FOUND,
            Error::ConcurrentModificationDetected => StatusCode::CONFLICT,
            Error::AlreadySubscribed { .. } => StatusCode::CONFLICT,
            Error::SlugAlreadyExists { .. } => StatusCode::CONFLICT,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToSerializeToBson(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToHashPassword(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        #[derive(Serialize)]
        struct Dummy<'a> {
            error_code: &'static str,
            error_message: &'static str,
            error_meta: &'a Error,
        }

        HttpResponse::build(self.status_code()).json(&Dummy {
            error_code: self.error_code(),
            error_message: self.error_message(),
            error_meta: self,
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<BsonError> for Error {
    fn from(error: BsonError) -> Error {
        Error::FailedToSerializeToBson(error)
    }
}

impl From<PasswordHashError> for Error {
    fn from(error: PasswordHashError) -> Error {
        Error::FailedToHashPassword(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::InvalidForm(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::FailedToSerializeToBson(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
