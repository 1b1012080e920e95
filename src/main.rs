#[cfg(not(target_family = "wasm"))]
#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    use ecohub::{
        config::EcohubConfig,
        frontend::{
            api::ApiClient,
            components::notification_bell::BellController,
            store::NotificationStore,
            utils::{formatting::badge_label, notices::LogNotices},
        },
    };
    use log::{info, LevelFilter};
    use std::{sync::Arc, time::Duration};

    if std::env::args().nth(1).as_deref() == Some("--print-config") {
        println!("{}", doku::to_toml::<EcohubConfig>());
        std::process::exit(0);
    }

    env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .filter_module("ecohub", LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = EcohubConfig::read()?;
    info!("Using backend at {}", config.api.base_url);
    let api = ApiClient::new(&config.api)?;
    let store = Arc::new(NotificationStore::new(Arc::new(api), Arc::new(LogNotices)));
    let mut bell = BellController::new(store.clone(), &config.notifications);
    bell.mount();

    // report changes of the unread badge until interrupted
    let mut last_badge = None;
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let badge = badge_label(store.unread_count(), config.notifications.badge_ceiling);
                if badge != last_badge {
                    info!("Unread notifications: {}", badge.as_deref().unwrap_or("none"));
                    last_badge = badge;
                }
            }
        }
    }

    bell.unmount();
    store.close();
    Ok(())
}

#[cfg(target_family = "wasm")]
fn main() {
    // the browser build starts through `hydrate`
}
