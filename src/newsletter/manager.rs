use chrono::Utc;

use crate::database::Database;
use crate::error::Error;

use super::{is_valid_email, normalize_email, NewsletterSubscriber, SubscriberId};

/// How a successful subscribe was fulfilled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// First time this email was seen: a new active row was inserted.
    Subscribed,
    /// The email had unsubscribed before and was flipped back to active.
    Reactivated,
}

/// Subscribe state machine:
/// - unknown email: insert a new active subscriber
/// - known and active: rejected, no mutation
/// - known and inactive: reactivate, clear the unsubscribe stamp, refresh
///   the subscribe stamp, and take the new name when one is given
#[tracing::instrument(skip(db))]
pub async fn subscribe(
    db: &dyn Database,
    email: &str,
    name: Option<String>,
) -> Result<(NewsletterSubscriber, SubscribeOutcome), Error> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(Error::InvalidEmailAddress { email });
    }

    let existing = db.subscribers().fetch_subscriber_by_email(&email).await?;

    match existing {
        None => {
            let subscriber = NewsletterSubscriber {
                id: SubscriberId::new(),
                email,
                name,
                is_active: true,
                subscribed_at: Utc::now(),
                unsubscribed_at: None,
            };
            db.subscribers().insert_subscriber(&subscriber).await?;

            Ok((subscriber, SubscribeOutcome::Subscribed))
        }
        Some(subscriber) if subscriber.is_active => Err(Error::AlreadySubscribed { email }),
        Some(mut subscriber) => {
            let previous_subscribed_at = subscriber.subscribed_at;
            subscriber.is_active = true;
            subscriber.unsubscribed_at = None;
            subscriber.subscribed_at = Utc::now();
            if name.is_some() {
                subscriber.name = name;
            }

            db.subscribers()
                .update_subscriber(&subscriber, previous_subscribed_at)
                .await?;

            Ok((subscriber, SubscribeOutcome::Reactivated))
        }
    }
}

/// Soft delete: the row is kept, flagged inactive, and stamped. Already
/// inactive subscribers unsubscribe idempotently.
#[tracing::instrument(skip(db))]
pub async fn unsubscribe(db: &dyn Database, email: &str) -> Result<NewsletterSubscriber, Error> {
    let email = normalize_email(email);

    let subscriber = db
        .subscribers()
        .fetch_subscriber_by_email(&email)
        .await?
        .ok_or(Error::SubscriberDoesNotExist { email })?;

    if !subscriber.is_active {
        return Ok(subscriber);
    }

    let previous_subscribed_at = subscriber.subscribed_at;
    let mut subscriber = subscriber;
    subscriber.is_active = false;
    subscriber.unsubscribed_at = Some(Utc::now());

    db.subscribers()
        .update_subscriber(&subscriber, previous_subscribed_at)
        .await?;

    Ok(subscriber)
}

#[tracing::instrument(skip(db))]
pub async fn get_subscribers(db: &dyn Database) -> Result<Vec<NewsletterSubscriber>, Error> {
    let subscribers = db.subscribers().fetch_subscribers().await?;

    Ok(subscribers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test::MockDatabase;
    use std::sync::{Arc, Mutex};

    fn subscriber(email: &str, is_active: bool) -> NewsletterSubscriber {
        NewsletterSubscriber {
            id: SubscriberId::new(),
            email: email.to_string(),
            name: None,
            is_active,
            subscribed_at: Utc::now() - chrono::Duration::days(90),
            unsubscribed_at: if is_active {
                None
            } else {
                Some(Utc::now() - chrono::Duration::days(30))
            },
        }
    }

    #[tokio::test]
    async fn new_email_inserts_an_active_subscriber() {
        let mut db = MockDatabase::new();
        db.subscribers.on_fetch_subscriber_by_email = Box::new(|_| Ok(None));
        let inserted = Arc::new(Mutex::new(None));
        let inserted_clone = Arc::clone(&inserted);
        db.subscribers.on_insert_subscriber = Box::new(move |subscriber| {
            *inserted_clone.lock().unwrap() = Some(subscriber.clone());
            Ok(())
        });

        let (subscriber, outcome) = subscribe(&db, "leitor@gazeta.com.br", None)
            .await
            .unwrap();

        assert_eq!(outcome, SubscribeOutcome::Subscribed);
        assert!(subscriber.is_active);
        assert_eq!(subscriber.unsubscribed_at, None);
        let inserted = inserted.lock().unwrap().clone().unwrap();
        assert_eq!(inserted.email, "leitor@gazeta.com.br");
    }

    #[tokio::test]
    async fn email_is_normalized_before_lookup_and_storage() {
        let mut db = MockDatabase::new();
        let looked_up = Arc::new(Mutex::new(None));
        let looked_up_clone = Arc::clone(&looked_up);
        db.subscribers.on_fetch_subscriber_by_email = Box::new(move |email| {
            *looked_up_clone.lock().unwrap() = Some(email.to_string());
            Ok(None)
        });
        db.subscribers.on_insert_subscriber = Box::new(|subscriber| {
            assert_eq!(subscriber.email, "foo@bar.com");
            Ok(())
        });

        subscribe(&db, "Foo@Bar.com ", None).await.unwrap();

        assert_eq!(looked_up.lock().unwrap().as_deref(), Some("foo@bar.com"));
    }

    #[tokio::test]
    async fn malformed_email_never_reaches_the_store() {
        let mut db = MockDatabase::new();
        db.subscribers.on_fetch_subscriber_by_email =
            Box::new(|_| panic!("store must not be called for an invalid email"));

        let result = subscribe(&db, "not-an-email", None).await;

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidEmailAddress {
                email: "not-an-email".to_string()
            }
        );
    }

    #[tokio::test]
    async fn active_subscriber_is_rejected_without_mutation() {
        let mut db = MockDatabase::new();
        db.subscribers.on_fetch_subscriber_by_email =
            Box::new(|email| Ok(Some(subscriber(email, true))));
        db.subscribers.on_insert_subscriber =
            Box::new(|_| panic!("no insert for an already subscribed email"));
        db.subscribers.on_update_subscriber =
            Box::new(|_, _| panic!("no update for an already subscribed email"));

        let result = subscribe(&db, "leitor@gazeta.com.br", None).await;

        assert_eq!(
            result.unwrap_err(),
            Error::AlreadySubscribed {
                email: "leitor@gazeta.com.br".to_string()
            }
        );
    }

    #[tokio::test]
    async fn inactive_subscriber_is_reactivated() {
        let mut db = MockDatabase::new();
        db.subscribers.on_fetch_subscriber_by_email =
            Box::new(|email| Ok(Some(subscriber(email, false))));
        let updated = Arc::new(Mutex::new(None));
        let updated_clone = Arc::clone(&updated);
        db.subscribers.on_update_subscriber = Box::new(move |subscriber, _| {
            *updated_clone.lock().unwrap() = Some(subscriber.clone());
            Ok(())
        });

        let (_, outcome) = subscribe(
            &db,
            "leitor@gazeta.com.br",
            Some("Leitor Assíduo".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(outcome, SubscribeOutcome::Reactivated);
        let updated = updated.lock().unwrap().clone().unwrap();
        assert!(updated.is_active);
        assert_eq!(updated.unsubscribed_at, None);
        assert_eq!(updated.name.as_deref(), Some("Leitor Assíduo"));
    }

    #[tokio::test]
    async fn reactivation_keeps_the_old_name_when_none_is_given() {
        let mut db = MockDatabase::new();
        db.subscribers.on_fetch_subscriber_by_email = Box::new(|email| {
            let mut subscriber = subscriber(email, false);
            subscriber.name = Some("Nome Antigo".to_string());
            Ok(Some(subscriber))
        });
        let updated = Arc::new(Mutex::new(None));
        let updated_clone = Arc::clone(&updated);
        db.subscribers.on_update_subscriber = Box::new(move |subscriber, _| {
            *updated_clone.lock().unwrap() = Some(subscriber.clone());
            Ok(())
        });

        subscribe(&db, "leitor@gazeta.com.br", None).await.unwrap();

        let updated = updated.lock().unwrap().clone().unwrap();
        assert_eq!(updated.name.as_deref(), Some("Nome Antigo"));
    }

    #[tokio::test]
    async fn unsubscribe_flags_inactive_and_stamps() {
        let mut db = MockDatabase::new();
        db.subscribers.on_fetch_subscriber_by_email =
            Box::new(|email| Ok(Some(subscriber(email, true))));
        let updated = Arc::new(Mutex::new(None));
        let updated_clone = Arc::clone(&updated);
        db.subscribers.on_update_subscriber = Box::new(move |subscriber, _| {
            *updated_clone.lock().unwrap() = Some(subscriber.clone());
            Ok(())
        });

        let subscriber = unsubscribe(&db, "leitor@gazeta.com.br").await.unwrap();

        assert!(!subscriber.is_active);
        assert!(subscriber.unsubscribed_at.is_some());
        assert!(updated.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn unsubscribe_of_inactive_subscriber_is_idempotent() {
        let mut db = MockDatabase::new();
        db.subscribers.on_fetch_subscriber_by_email =
            Box::new(|email| Ok(Some(subscriber(email, false))));
        db.subscribers.on_update_subscriber =
            Box::new(|_, _| panic!("no update for an already inactive subscriber"));

        let subscriber = unsubscribe(&db, "leitor@gazeta.com.br").await.unwrap();

        assert!(!subscriber.is_active);
    }

    #[tokio::test]
    async fn unsubscribe_of_unknown_email_is_an_error() {
        let mut db = MockDatabase::new();
        db.subscribers.on_fetch_subscriber_by_email = Box::new(|_| Ok(None));

        let result = unsubscribe(&db, "desconhecido@gazeta.com.br").await;

        assert_eq!(
            result.unwrap_err(),
            Error::SubscriberDoesNotExist {
                email: "desconhecido@gazeta.com.br".to_string()
            }
        );
    }
}
