use actix_web::web::{self, Data, FormConfig, JsonConfig, PathConfig, QueryConfig};
use actix_web::{App, HttpServer, ResponseError};
use mongodb::Client;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod admin;
pub mod advertisement;
pub mod article;
pub mod category;
pub mod database;
pub mod delivery;
pub mod error;
pub mod newsletter;
pub mod seed;
pub mod typedid;

pub use admin::{LoginBody, SessionBody};
pub use advertisement::{
    ActiveAdvertisementsQuery, AdvertisementBody, CreateAdvertisementBody, UpdateAdvertisementBody,
};
pub use article::{ArticleBody, ArticlesQuery, CreateArticleBody, UpdateArticleBody};
pub use category::{CategoryBody, CreateCategoryBody};
pub use newsletter::{SubscribeBody, SubscribeResponseBody, SubscriberBody, UnsubscribeBody};

use crate::database::{Database, MongoDatabase};
use crate::delivery::ScriptGate;
use crate::error::Error;

/// Blocking entry point; spawned on its own thread by the integration tests.
pub fn run(seed_on_start: bool) -> Result<(), Error> {
    actix_web::rt::System::new().block_on(serve(seed_on_start))
}

pub async fn serve(seed_on_start: bool) -> Result<(), Error> {
    let uri =
        std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    info!("connecting to db: {}", uri);
    let db = Client::with_uri_str(&uri).await?.database("gazeta");
    let db = MongoDatabase::new(db);

    if seed_on_start {
        seed::seed(&db).await?;
    }

    let gate = ScriptGate::new();

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    info!("listening on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(JsonConfig::default().error_handler(|err, _req| {
                // format json errors with custom format
                Error::InvalidJson(err).into()
            }))
            .app_data(PathConfig::default().error_handler(|err, _req| {
                // format path errors with custom format
                Error::InvalidPath(err).into()
            }))
            .app_data(FormConfig::default().error_handler(|err, _req| {
                // format form errors with custom format
                Error::InvalidForm(err).into()
            }))
            .app_data(QueryConfig::default().error_handler(|err, _req| {
                // format query errors with custom format
                Error::InvalidQuery(err).into()
            }))
            .app_data(Data::new(Box::new(db.clone()) as Box<dyn Database>))
            .app_data(Data::new(gate.clone()))
            .wrap(TracingLogger::default())
            // /advertisements/active must come before the by-id route
            .service(advertisement::endpoints::get_active_advertisements)
            .service(advertisement::endpoints::get_advertisements)
            .service(advertisement::endpoints::create_advertisement)
            .service(advertisement::endpoints::get_advertisement_by_id)
            .service(advertisement::endpoints::update_advertisement)
            .service(advertisement::endpoints::delete_advertisement)
            .service(advertisement::endpoints::track_impression)
            .service(advertisement::endpoints::track_click)
            .service(delivery::endpoints::deliver_slot)
            .service(delivery::endpoints::script_ready)
            .service(newsletter::endpoints::subscribe)
            .service(newsletter::endpoints::unsubscribe)
            .service(newsletter::endpoints::get_subscribers)
            // slug alias before the by-id route
            .service(article::endpoints::get_article_by_slug)
            .service(article::endpoints::get_articles)
            .service(article::endpoints::create_article)
            .service(article::endpoints::get_article_by_id)
            .service(article::endpoints::update_article)
            .service(article::endpoints::delete_article)
            .service(article::endpoints::get_articles_in_category)
            .service(category::endpoints::get_categories)
            .service(category::endpoints::create_category)
            .service(category::endpoints::get_category_by_slug)
            .service(category::endpoints::delete_category)
            .service(admin::endpoints::login)
            .service(admin::endpoints::logout)
            .default_service(web::to(|| async { Error::PathDoesNotExist.error_response() }))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
