use mongodb::{Collection, Database as MongoDb};

use crate::admin::db::{AdminUserStore, SessionStore};
use crate::admin::{AdminSession, AdminUser};
use crate::advertisement::db::AdvertisementStore;
use crate::advertisement::Advertisement;
use crate::article::db::ArticleStore;
use crate::article::Article;
use crate::category::db::CategoryStore;
use crate::category::Category;
use crate::newsletter::db::SubscriberStore;
use crate::newsletter::NewsletterSubscriber;

pub type MongoAdvertisementStore = Collection<Advertisement>;
pub type MongoSubscriberStore = Collection<NewsletterSubscriber>;
pub type MongoArticleStore = Collection<Article>;
pub type MongoCategoryStore = Collection<Category>;
pub type MongoAdminUserStore = Collection<AdminUser>;
pub type MongoSessionStore = Collection<AdminSession>;

pub trait Database: Send + Sync {
    fn advertisements(&self) -> &dyn AdvertisementStore;
    fn subscribers(&self) -> &dyn SubscriberStore;
    fn articles(&self) -> &dyn ArticleStore;
    fn categories(&self) -> &dyn CategoryStore;
    fn admin_users(&self) -> &dyn AdminUserStore;
    fn sessions(&self) -> &dyn SessionStore;
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    advertisements: Collection<Advertisement>,
    subscribers: Collection<NewsletterSubscriber>,
    articles: Collection<Article>,
    categories: Collection<Category>,
    admin_users: Collection<AdminUser>,
    sessions: Collection<AdminSession>,
}

impl MongoDatabase {
    pub fn new(db: MongoDb) -> MongoDatabase {
        MongoDatabase {
            advertisements: db.collection("advertisements"),
            subscribers: db.collection("newsletter_subscribers"),
            articles: db.collection("articles"),
            categories: db.collection("categories"),
            admin_users: db.collection("admin_users"),
            sessions: db.collection("admin_sessions"),
        }
    }
}

impl Database for MongoDatabase {
    fn advertisements(&self) -> &dyn AdvertisementStore {
        &self.advertisements
    }

    fn subscribers(&self) -> &dyn SubscriberStore {
        &self.subscribers
    }

    fn articles(&self) -> &dyn ArticleStore {
        &self.articles
    }

    fn categories(&self) -> &dyn CategoryStore {
        &self.categories
    }

    fn admin_users(&self) -> &dyn AdminUserStore {
        &self.admin_users
    }

    fn sessions(&self) -> &dyn SessionStore {
        &self.sessions
    }
}
