use anyhow::Result;
use energy_dashboard::actions::ActionDispatcher;
use energy_dashboard::config::AppConfig;
use energy_dashboard::console::{self, Console};
use energy_dashboard::notify::Notifier;
use energy_dashboard::page::Page;
use energy_dashboard::poller::PollerHandle;
use energy_dashboard::render::{BatteryView, FloorDetailView, FloorsView, RoomDetailView, VisitorsView};
use energy_dashboard::transport::{HttpTransport, Transport};
use energy_dashboard::version;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = AppConfig::load()?;
    tracing::info!(
        version = version::VERSION,
        api = %app_config.api.base_url,
        "Starting {}",
        version::NAME
    );

    let transport: Arc<dyn Transport> = Arc::new(
        HttpTransport::new(&app_config.api.base_url, app_config.api.request_timeout())
            .map_err(|e| anyhow::anyhow!("http client: {}", e))?,
    );
    let polling = &app_config.polling;
    let pages = &app_config.pages;
    let timing = app_config.notifications.timing();
    let mut handles: Vec<PollerHandle> = Vec::new();
    let mut console = Console::new();

    if pages.battery {
        let page = Page::new(BatteryView);
        handles.push(page.start(transport.clone(), polling.poller(polling.battery_interval_ms)));
    }
    if pages.floors {
        let page = Page::new(FloorsView::new(pages.floor_ids.clone()));
        handles.push(page.start(transport.clone(), polling.poller(polling.floors_interval_ms)));
    }
    for floor_id in &pages.floor_ids {
        // No room cards in the headless skeleton; the floor overview is what gets rendered.
        let page = Page::new(FloorDetailView::new(floor_id.clone(), Vec::new()));
        handles.push(page.start(
            transport.clone(),
            polling.poller(polling.floor_detail_interval_ms),
        ));
    }
    for room_id in &pages.room_ids {
        let page = Page::new(RoomDetailView::new(room_id.clone(), pages.appliance_ids(room_id)));
        let notifier = Notifier::new(page.document(), timing);
        let dispatcher = ActionDispatcher::new(transport.clone(), page.document(), notifier);
        console.add_room(room_id.clone(), page.document(), dispatcher);
        handles.push(page.start(
            transport.clone(),
            polling.poller(polling.room_detail_interval_ms),
        ));
    }
    if pages.visitors {
        let page = Page::new(VisitorsView);
        handles.push(page.start(transport.clone(), polling.poller(polling.visitors_interval_ms)));
    }

    if handles.is_empty() {
        tracing::warn!("No pages enabled; nothing to poll");
        return Ok(());
    }

    // Blocking stdin reads live on their own thread so they never hold up runtime shutdown.
    let (line_tx, line_rx) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if line_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    tracing::info!(usage = console::USAGE, "Console commands read from stdin");
    let console_task = tokio::spawn(async move { console.run(line_rx).await });

    shutdown_signal().await;
    tracing::info!(pollers = handles.len(), "Received shutdown signal");
    console_task.abort();
    futures_util::future::join_all(handles.into_iter().map(PollerHandle::stop)).await;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
