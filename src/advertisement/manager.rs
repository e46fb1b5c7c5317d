use chrono::{DateTime, Utc};
use tracing::warn;

use crate::database::Database;
use crate::error::Error;

use super::{AdPosition, AdType, Advertisement, AdvertisementId};

#[derive(Clone, Debug)]
pub struct AdvertisementDraft {
    pub title: String,
    pub ad_type: AdType,
    pub content: String,
    pub link_url: Option<String>,
    pub position: AdPosition,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default)]
pub struct AdvertisementPatch {
    pub title: Option<String>,
    pub ad_type: Option<AdType>,
    pub content: Option<String>,
    pub link_url: Option<Option<String>>,
    pub position: Option<AdPosition>,
    pub is_active: Option<bool>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
}

#[tracing::instrument(skip(db))]
pub async fn get_advertisements(db: &dyn Database) -> Result<Vec<Advertisement>, Error> {
    let advertisements = db.advertisements().fetch_advertisements().await?;

    Ok(advertisements)
}

#[tracing::instrument(skip(db))]
pub async fn get_advertisement_by_id(
    db: &dyn Database,
    advertisement_id: AdvertisementId,
) -> Result<Advertisement, Error> {
    let advertisement = db
        .advertisements()
        .fetch_advertisement_by_id(advertisement_id)
        .await?
        .ok_or(Error::AdvertisementDoesNotExist { advertisement_id })?;

    Ok(advertisement)
}

#[tracing::instrument(skip(db))]
pub async fn create_advertisement(
    db: &dyn Database,
    draft: AdvertisementDraft,
) -> Result<Advertisement, Error> {
    let now = Utc::now();
    let advertisement = Advertisement {
        id: AdvertisementId::new(),
        title: draft.title,
        ad_type: draft.ad_type,
        content: draft.content,
        link_url: draft.link_url,
        position: draft.position,
        is_active: draft.is_active,
        start_date: draft.start_date,
        end_date: draft.end_date,
        impression_count: 0,
        click_count: 0,
        created_at: now,
        modified_at: now,
    };

    db.advertisements()
        .insert_advertisement(&advertisement)
        .await?;

    Ok(advertisement)
}

#[tracing::instrument(skip(db))]
pub async fn update_advertisement(
    db: &dyn Database,
    advertisement_id: AdvertisementId,
    patch: AdvertisementPatch,
) -> Result<Advertisement, Error> {
    let mut advertisement = get_advertisement_by_id(db, advertisement_id).await?;
    let previous_modified_at = advertisement.modified_at;

    if let Some(title) = patch.title {
        advertisement.title = title;
    }
    if let Some(ad_type) = patch.ad_type {
        advertisement.ad_type = ad_type;
    }
    if let Some(content) = patch.content {
        advertisement.content = content;
    }
    if let Some(link_url) = patch.link_url {
        advertisement.link_url = link_url;
    }
    if let Some(position) = patch.position {
        advertisement.position = position;
    }
    if let Some(is_active) = patch.is_active {
        advertisement.is_active = is_active;
    }
    if let Some(start_date) = patch.start_date {
        advertisement.start_date = start_date;
    }
    if let Some(end_date) = patch.end_date {
        advertisement.end_date = end_date;
    }
    advertisement.modified_at = Utc::now();

    db.advertisements()
        .update_advertisement(&advertisement, previous_modified_at)
        .await?;

    Ok(advertisement)
}

#[tracing::instrument(skip(db))]
pub async fn delete_advertisement(
    db: &dyn Database,
    advertisement_id: AdvertisementId,
) -> Result<(), Error> {
    let deleted = db
        .advertisements()
        .delete_advertisement(advertisement_id)
        .await?;

    if !deleted {
        return Err(Error::AdvertisementDoesNotExist { advertisement_id });
    }

    Ok(())
}

/// Ads deliverable right now: the store filters on `is_active` (and position
/// when given), the date window is applied here in memory. Store failures
/// propagate; use [`get_active_by_position`] for the swallowing variant.
#[tracing::instrument(skip(db))]
pub async fn active_advertisements(
    db: &dyn Database,
    position: Option<AdPosition>,
) -> Result<Vec<Advertisement>, Error> {
    let advertisements = db
        .advertisements()
        .fetch_active_advertisements(position)
        .await?;

    let now = Utc::now();
    let deliverable = advertisements
        .into_iter()
        .filter(|ad| match position {
            Some(position) => ad.is_deliverable(position, now),
            None => ad.is_active && ad.is_within_window(now),
        })
        .collect();

    Ok(deliverable)
}

/// Public delivery lookup. Failures are logged and degrade to an empty list:
/// ads are decoration, a broken ad fetch must never break the page.
#[tracing::instrument(skip(db))]
pub async fn get_active_by_position(
    db: &dyn Database,
    position: Option<AdPosition>,
) -> Vec<Advertisement> {
    match active_advertisements(db, position).await {
        Ok(advertisements) => advertisements,
        Err(err) => {
            warn!("failed to fetch active advertisements: {}", err);
            vec![]
        }
    }
}

/// Counter bump via read-increment-write. Two concurrent bumps can lose an
/// update; the backing store has no atomic increment and the counts are
/// approximate. Failures are logged and dropped.
#[tracing::instrument(skip(db))]
pub async fn track_impression(db: &dyn Database, advertisement_id: AdvertisementId) {
    if let Err(err) = bump_counters(db, advertisement_id, 1, 0).await {
        warn!(
            "failed to track impression for {}: {}",
            advertisement_id, err
        );
    }
}

#[tracing::instrument(skip(db))]
pub async fn track_click(db: &dyn Database, advertisement_id: AdvertisementId) {
    if let Err(err) = bump_counters(db, advertisement_id, 0, 1).await {
        warn!("failed to track click for {}: {}", advertisement_id, err);
    }
}

async fn bump_counters(
    db: &dyn Database,
    advertisement_id: AdvertisementId,
    impressions: i64,
    clicks: i64,
) -> Result<(), Error> {
    let advertisement = get_advertisement_by_id(db, advertisement_id).await?;

    db.advertisements()
        .update_advertisement_counters(
            advertisement_id,
            advertisement.impression_count + impressions,
            advertisement.click_count + clicks,
        )
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test::MockDatabase;
    use std::sync::{Arc, Mutex};

    fn advertisement(position: AdPosition) -> Advertisement {
        let now = Utc::now();
        Advertisement {
            id: AdvertisementId::new(),
            title: "Campanha".to_string(),
            ad_type: AdType::Banner,
            content: "https://cdn.example.com/banner.png".to_string(),
            link_url: Some("https://anunciante.example.com".to_string()),
            position,
            is_active: true,
            start_date: None,
            end_date: None,
            impression_count: 0,
            click_count: 0,
            created_at: now,
            modified_at: now,
        }
    }

    #[tokio::test]
    async fn create_advertisement_starts_counters_at_zero() {
        let mut db = MockDatabase::new();
        let called_insert = Arc::new(Mutex::new(false));
        let called_insert_clone = Arc::clone(&called_insert);
        db.advertisements.on_insert_advertisement = Box::new(move |ad| {
            *called_insert_clone.lock().unwrap() = true;
            assert_eq!(ad.impression_count, 0);
            assert_eq!(ad.click_count, 0);
            assert_eq!(ad.created_at, ad.modified_at);
            Ok(())
        });

        let draft = AdvertisementDraft {
            title: "Campanha".to_string(),
            ad_type: AdType::Banner,
            content: "https://cdn.example.com/banner.png".to_string(),
            link_url: None,
            position: AdPosition::Header,
            is_active: true,
            start_date: None,
            end_date: None,
        };
        let advertisement = create_advertisement(&db, draft).await.unwrap();

        assert_eq!(advertisement.impression_count, 0);
        assert!(
            *called_insert.lock().unwrap(),
            "db.insert_advertisement was not called"
        );
    }

    #[tokio::test]
    async fn active_advertisements_excludes_expired_window() {
        let mut db = MockDatabase::new();
        db.advertisements.on_fetch_active_advertisements = Box::new(|_| {
            let mut expired = advertisement(AdPosition::Sidebar);
            expired.end_date = Some(Utc::now() - chrono::Duration::days(30));
            let current = advertisement(AdPosition::Sidebar);
            Ok(vec![expired, current.clone()])
        });

        let ads = active_advertisements(&db, Some(AdPosition::Sidebar))
            .await
            .unwrap();

        assert_eq!(ads.len(), 1);
        assert!(ads[0].end_date.is_none());
    }

    #[tokio::test]
    async fn active_advertisements_excludes_future_start() {
        let mut db = MockDatabase::new();
        db.advertisements.on_fetch_active_advertisements = Box::new(|_| {
            let mut upcoming = advertisement(AdPosition::Header);
            upcoming.start_date = Some(Utc::now() + chrono::Duration::days(7));
            Ok(vec![upcoming])
        });

        let ads = active_advertisements(&db, Some(AdPosition::Header))
            .await
            .unwrap();

        assert!(ads.is_empty());
    }

    #[tokio::test]
    async fn repeated_lookup_returns_the_same_set() {
        let mut db = MockDatabase::new();
        let fixed = advertisement(AdPosition::Header);
        let fixed_clone = fixed.clone();
        db.advertisements.on_fetch_active_advertisements =
            Box::new(move |_| Ok(vec![fixed_clone.clone()]));

        let first = active_advertisements(&db, Some(AdPosition::Header))
            .await
            .unwrap();
        let second = active_advertisements(&db, Some(AdPosition::Header))
            .await
            .unwrap();

        let first_ids: Vec<_> = first.iter().map(|ad| ad.id).collect();
        let second_ids: Vec<_> = second.iter().map(|ad| ad.id).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[tokio::test]
    async fn get_active_by_position_swallows_store_failure() {
        let mut db = MockDatabase::new();
        db.advertisements.on_fetch_active_advertisements =
            Box::new(|_| Err(Error::ConcurrentModificationDetected));

        let ads = get_active_by_position(&db, Some(AdPosition::Sidebar)).await;

        assert!(ads.is_empty());
    }

    #[tokio::test]
    async fn track_impression_bumps_counter_by_one() {
        let mut db = MockDatabase::new();
        let ad = advertisement(AdPosition::Header);
        let ad_id = ad.id;
        let mut readback = ad.clone();
        readback.impression_count = 5;
        db.advertisements.on_fetch_advertisement_by_id =
            Box::new(move |_| Ok(Some(readback.clone())));
        let written = Arc::new(Mutex::new(None));
        let written_clone = Arc::clone(&written);
        db.advertisements.on_update_advertisement_counters =
            Box::new(move |_, impressions, clicks| {
                *written_clone.lock().unwrap() = Some((impressions, clicks));
                Ok(())
            });

        track_impression(&db, ad_id).await;

        assert_eq!(*written.lock().unwrap(), Some((6, 0)));
    }

    #[tokio::test]
    async fn concurrent_impressions_can_lose_an_update() {
        // Both bumps read the same stale count of 5 and both write 6. The
        // final count is 6, not 7, and that is the accepted behavior.
        let mut db = MockDatabase::new();
        let ad = advertisement(AdPosition::Header);
        let ad_id = ad.id;
        let mut stale = ad.clone();
        stale.impression_count = 5;
        db.advertisements.on_fetch_advertisement_by_id =
            Box::new(move |_| Ok(Some(stale.clone())));
        let writes = Arc::new(Mutex::new(Vec::new()));
        let writes_clone = Arc::clone(&writes);
        db.advertisements.on_update_advertisement_counters =
            Box::new(move |_, impressions, _| {
                writes_clone.lock().unwrap().push(impressions);
                Ok(())
            });

        track_impression(&db, ad_id).await;
        track_impression(&db, ad_id).await;

        assert_eq!(*writes.lock().unwrap(), vec![6, 6]);
    }

    #[tokio::test]
    async fn track_click_swallows_unknown_advertisement() {
        let mut db = MockDatabase::new();
        db.advertisements.on_fetch_advertisement_by_id = Box::new(|_| Ok(None));

        // must not panic or propagate
        track_click(&db, AdvertisementId::new()).await;
    }

    #[tokio::test]
    async fn delete_unknown_advertisement_is_an_error() {
        let mut db = MockDatabase::new();
        db.advertisements.on_delete_advertisement = Box::new(|_| Ok(false));

        let advertisement_id = AdvertisementId::new();
        let result = delete_advertisement(&db, advertisement_id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::AdvertisementDoesNotExist { advertisement_id }
        );
    }

    #[tokio::test]
    async fn update_patches_only_provided_fields() {
        let mut db = MockDatabase::new();
        let ad = advertisement(AdPosition::Header);
        let ad_id = ad.id;
        let stored = ad.clone();
        db.advertisements.on_fetch_advertisement_by_id =
            Box::new(move |_| Ok(Some(stored.clone())));
        let updated = Arc::new(Mutex::new(None));
        let updated_clone = Arc::clone(&updated);
        db.advertisements.on_update_advertisement = Box::new(move |ad, _| {
            *updated_clone.lock().unwrap() = Some(ad.clone());
            Ok(())
        });

        let patch = AdvertisementPatch {
            is_active: Some(false),
            link_url: Some(None),
            ..AdvertisementPatch::default()
        };
        update_advertisement(&db, ad_id, patch).await.unwrap();

        let updated = updated.lock().unwrap().clone().unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.link_url, None);
        assert_eq!(updated.title, ad.title);
        assert_eq!(updated.position, ad.position);
    }
}
