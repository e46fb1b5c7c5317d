use serde::{Deserialize, Serialize};

use crate::advertisement::{AdType, Advertisement, AdvertisementId};

/// Disclosure label attached to every rendered slot.
pub const DISCLOSURE_LABEL: &str = "Publicidade";

/// A single ad prepared for a page slot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderedAd {
    pub advertisement_id: AdvertisementId,
    pub label: String,
    pub markup: AdMarkup,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AdMarkup {
    /// An image creative. With a `link_url` the banner is interactive and
    /// opens the destination in a new tab, with the click tracked before
    /// navigation; without one it is a plain image.
    Banner {
        image_url: String,
        link_url: Option<String>,
        role: AdRole,
    },
    /// Raw embed markup, injected verbatim. Initialization is deferred until
    /// the third-party script signals readiness.
    Script { markup: String },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdRole {
    Button,
    Image,
}

pub fn render(advertisement: &Advertisement) -> RenderedAd {
    let markup = match advertisement.ad_type {
        AdType::Banner => AdMarkup::Banner {
            image_url: advertisement.content.clone(),
            link_url: advertisement.link_url.clone(),
            role: if advertisement.link_url.is_some() {
                AdRole::Button
            } else {
                AdRole::Image
            },
        },
        AdType::ThirdPartyScript => AdMarkup::Script {
            markup: advertisement.content.clone(),
        },
    };

    RenderedAd {
        advertisement_id: advertisement.id,
        label: DISCLOSURE_LABEL.to_string(),
        markup,
    }
}
