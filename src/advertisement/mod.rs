use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type AdvertisementId = TypedId<Advertisement>;

/// A single advertisement record. `content` is an image URL for banner ads
/// and raw embed markup for third-party script ads.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Advertisement {
    #[serde(rename = "_id")]
    pub id: AdvertisementId,
    pub title: String,
    pub ad_type: AdType,
    pub content: String,
    pub link_url: Option<String>,
    pub position: AdPosition,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub impression_count: i64,
    pub click_count: i64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub modified_at: DateTime<Utc>,
}

impl TypedIdMarker for Advertisement {
    fn tag() -> &'static str {
        "ADV"
    }
}

impl Advertisement {
    /// Whether this ad may be shown in `position` at instant `now`. The
    /// active flag and the inclusive date window must both hold.
    pub fn is_deliverable(&self, position: AdPosition, now: DateTime<Utc>) -> bool {
        if !self.is_active || self.position != position {
            return false;
        }
        if let Some(start) = self.start_date {
            if now < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if now > end {
                return false;
            }
        }
        true
    }

    /// The date-window half of the deliverability check, position ignored.
    pub fn is_within_window(&self, now: DateTime<Utc>) -> bool {
        self.start_date.map_or(true, |start| start <= now)
            && self.end_date.map_or(true, |end| now <= end)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdType {
    Banner,
    ThirdPartyScript,
}

/// The fixed set of page slots an ad can be assigned to. An ad is only ever
/// eligible for its own slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdPosition {
    Header,
    BetweenArticles,
    Sidebar,
    ArticleFooter,
    SiteFooter,
    ExitPopup,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn advertisement(position: AdPosition) -> Advertisement {
        let now = Utc::now();
        Advertisement {
            id: AdvertisementId::new(),
            title: "Campanha".to_string(),
            ad_type: AdType::Banner,
            content: "https://cdn.example.com/banner.png".to_string(),
            link_url: None,
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

    #[test]
    fn unbounded_active_ad_is_deliverable() {
        let ad = advertisement(AdPosition::Header);
        assert!(ad.is_deliverable(AdPosition::Header, Utc::now()));
    }

    #[test]
    fn ad_is_only_deliverable_in_its_own_position() {
        let ad = advertisement(AdPosition::Header);
        assert!(!ad.is_deliverable(AdPosition::Sidebar, Utc::now()));
    }

    #[test]
    fn inactive_ad_is_never_deliverable() {
        let mut ad = advertisement(AdPosition::Sidebar);
        ad.is_active = false;
        assert!(!ad.is_deliverable(AdPosition::Sidebar, Utc::now()));
    }

    #[test]
    fn expired_ad_is_excluded() {
        let mut ad = advertisement(AdPosition::Sidebar);
        ad.end_date = Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(!ad.is_deliverable(AdPosition::Sidebar, now));
    }

    #[test]
    fn not_yet_started_ad_is_excluded() {
        let mut ad = advertisement(AdPosition::Header);
        let now = Utc::now();
        ad.start_date = Some(now + chrono::Duration::days(7));
        assert!(!ad.is_deliverable(AdPosition::Header, now));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let mut ad = advertisement(AdPosition::Header);
        let now = Utc::now();
        ad.start_date = Some(now);
        ad.end_date = Some(now);
        assert!(ad.is_deliverable(AdPosition::Header, now));
    }
}
