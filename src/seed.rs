use chrono::{Duration, Utc};
use tracing::info;

use crate::admin::{manager as admin_manager, AdminUser, AdminUserId};
use crate::advertisement::{AdPosition, AdType, Advertisement};
use crate::database::Database;
use crate::error::Error;

/// Seeds sample data on first run. Guarded by single-row existence probes:
/// a store that already has content is left untouched.
pub async fn seed(db: &dyn Database) -> Result<(), Error> {
    seed_advertisements(db).await?;
    seed_admin_user(db).await?;

    Ok(())
}

async fn seed_advertisements(db: &dyn Database) -> Result<(), Error> {
    if db.advertisements().fetch_any_advertisement().await?.is_some() {
        info!("advertisements already present, skipping sample seed");
        return Ok(());
    }

    let ad1_id = "ADV-7D2FA6C1-41B9-4E0D-9B67-0A4F3C2D81E5".parse().unwrap();
    let ad2_id = "ADV-3B8E90F2-6C11-4A7D-8D35-F21E60B4A9C7".parse().unwrap();
    let ad3_id = "ADV-C54A1D88-2E67-4F90-B10C-7E8D93A5F246".parse().unwrap();
    let ad4_id = "ADV-91F06B3E-D8A4-4C52-A7F9-5B20C18E64D3".parse().unwrap();

    let now = Utc::now();
    let advertisements = vec![
        Advertisement {
            id: ad1_id,
            title: "Banner de topo".to_string(),
            ad_type: AdType::Banner,
            content: "https://cdn.example.com/ads/topo-728x90.png".to_string(),
            link_url: Some("https://anunciante.example.com/promo".to_string()),
            position: AdPosition::Header,
            is_active: true,
            start_date: None,
            end_date: None,
            impression_count: 0,
            click_count: 0,
            created_at: now,
            modified_at: now,
        },
        Advertisement {
            id: ad2_id,
            title: "Banner lateral institucional".to_string(),
            ad_type: AdType::Banner,
            content: "https://cdn.example.com/ads/lateral-300x250.png".to_string(),
            link_url: None,
            position: AdPosition::Sidebar,
            is_active: true,
            start_date: None,
            end_date: None,
            impression_count: 0,
            click_count: 0,
            created_at: now,
            modified_at: now,
        },
        Advertisement {
            id: ad3_id,
            title: "Embed entre matérias".to_string(),
            ad_type: AdType::ThirdPartyScript,
            content: "<div class=\"ad-embed\" data-slot=\"between\"></div>".to_string(),
            link_url: None,
            position: AdPosition::BetweenArticles,
            is_active: true,
            start_date: Some(now - Duration::days(1)),
            end_date: Some(now + Duration::days(30)),
            impression_count: 0,
            click_count: 0,
            created_at: now,
            modified_at: now,
        },
        Advertisement {
            id: ad4_id,
            title: "Campanha encerrada (exemplo)".to_string(),
            ad_type: AdType::Banner,
            content: "https://cdn.example.com/ads/rodape-970x90.png".to_string(),
            link_url: Some("https://anunciante.example.com/antiga".to_string()),
            position: AdPosition::SiteFooter,
            is_active: true,
            start_date: None,
            end_date: Some(now - Duration::days(7)),
            impression_count: 0,
            click_count: 0,
            created_at: now,
            modified_at: now,
        },
    ];

    for advertisement in &advertisements {
        db.advertisements()
            .insert_advertisement(advertisement)
            .await?;
    }
    info!("seeded {} sample advertisements", advertisements.len());

    Ok(())
}

async fn seed_admin_user(db: &dyn Database) -> Result<(), Error> {
    if db.admin_users().fetch_any_admin_user().await?.is_some() {
        return Ok(());
    }

    let password =
        std::env::var("ADMIN_BOOTSTRAP_PASSWORD").unwrap_or_else(|_| "trocar-agora".to_string());
    let user = AdminUser {
        id: AdminUserId::new(),
        email: "admin@gazeta.local".to_string(),
        password_hash: admin_manager::hash_password(&password)?,
        display_name: "Administração".to_string(),
        created_at: Utc::now(),
    };

    db.admin_users().insert_admin_user(&user).await?;
    info!("seeded bootstrap admin user {}", user.email);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test::MockDatabase;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn seed_skips_a_non_empty_advertisement_store() {
        let mut db = MockDatabase::new();
        db.advertisements.on_fetch_any_advertisement = Box::new(|| {
            let now = Utc::now();
            Ok(Some(Advertisement {
                id: crate::advertisement::AdvertisementId::new(),
                title: "Existente".to_string(),
                ad_type: AdType::Banner,
                content: "https://cdn.example.com/x.png".to_string(),
                link_url: None,
                position: AdPosition::Header,
                is_active: true,
                start_date: None,
                end_date: None,
                impression_count: 0,
                click_count: 0,
                created_at: now,
                modified_at: now,
            }))
        });
        db.advertisements.on_insert_advertisement =
            Box::new(|_| panic!("no insert when ads already exist"));
        db.admin_users.on_fetch_any_admin_user = Box::new(|| {
            Ok(Some(AdminUser {
                id: AdminUserId::new(),
                email: "admin@gazeta.local".to_string(),
                password_hash: "x".to_string(),
                display_name: "Administração".to_string(),
                created_at: Utc::now(),
            }))
        });

        seed(&db).await.unwrap();
    }

    #[tokio::test]
    async fn seed_populates_an_empty_store() {
        let mut db = MockDatabase::new();
        db.advertisements.on_fetch_any_advertisement = Box::new(|| Ok(None));
        let inserted = Arc::new(Mutex::new(0));
        let inserted_clone = Arc::clone(&inserted);
        db.advertisements.on_insert_advertisement = Box::new(move |ad| {
            *inserted_clone.lock().unwrap() += 1;
            assert_eq!(ad.impression_count, 0);
            assert_eq!(ad.click_count, 0);
            Ok(())
        });
        db.admin_users.on_fetch_any_admin_user = Box::new(|| Ok(None));
        db.admin_users.on_insert_admin_user = Box::new(|_| Ok(()));

        seed(&db).await.unwrap();

        assert_eq!(*inserted.lock().unwrap(), 4);
    }
}
