use frodo_broker::{AmqpBroker, BrokerMessage};
use frodo_config::Config;
use frodo_hub::{
    ChannelName, Dispatcher, Hub, HubConfig, HubError, Metrics, ShutdownCoordinator,
};
use frodo_server::{AppState, Cli, ServerError, build_router, logger};
use frodo_store::RedisStore;

use std::sync::Arc;

use clap::Parser;
use log::{debug, error, info, warn};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Configuration: config.toml < FRODO_* env < command-line flags
    let cli = Cli::parse();
    let mut config = Config::load()?;
    cli.apply_to(&mut config);
    config.validate()?;

    // Initialize logger (before any other logging)
    logger::initialize(&config.logging)?;

    info!("Starting frodo v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let store = Arc::new(RedisStore::connect(&config.cache.url, config.cache.ttl_secs).await?);

    let hub = Hub::new(
        HubConfig {
            client_buffer_size: config.streaming.client_buffer_size,
            write_timeout: config.streaming.write_timeout(),
        },
        store.clone(),
        Metrics::new(),
    );
    let dispatcher = Dispatcher::new(hub.clone());

    let broker = Arc::new(AmqpBroker::connect(&config.broker.url, &config.broker.queue).await?);
    let consumer = broker
        .start_listening({
            let dispatcher = dispatcher.clone();
            move |message| {
                let dispatcher = dispatcher.clone();
                async move { on_broker_message(&dispatcher, message).await }
            }
        })
        .await?;

    let shutdown = ShutdownCoordinator::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    let app_state = AppState {
        hub: hub.clone(),
        cache: store.clone(),
        broker: broker.clone(),
        shutdown: shutdown.clone(),
        keep_alive: config.streaming.keep_alive(),
    };
    let app = build_router(app_state);

    let listener = TcpListener::bind(config.server.socket_addr()?).await?;
    info!("Server listening on {}", listener.local_addr()?);

    // Open SSE streams end on the same signal, so graceful shutdown can finish
    axum::serve(listener, app)
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move {
                shutdown.subscribe_guard().wait().await;
                info!("No longer accepting connections");
            }
        })
        .await?;

    hub.close();
    dispatcher.shutdown().await;

    if let Err(e) = broker.close().await {
        warn!("Broker did not close cleanly: {e}");
        consumer.abort();
    }
    if let Err(e) = consumer.await {
        warn!("Broker consumer ended abnormally: {e}");
    }

    store.close();
    info!("Graceful shutdown complete");

    Ok(())
}

/// Route one upstream message into the hub.
///
/// Waits while the channel's dispatch lane is full, which holds back the ack
/// and so the broker's deliveries.
async fn on_broker_message(dispatcher: &Dispatcher, message: BrokerMessage) {
    if !ChannelName::is_valid(&message.channel) {
        warn!("Dropping message for invalid channel '{}'", message.channel);
        return;
    }

    match dispatcher.dispatch(&message.channel, message.payload).await {
        Ok(()) => {}
        Err(e @ HubError::HubClosed { .. }) => {
            debug!("Dropping message for {} during shutdown: {e}", message.channel);
        }
        Err(e) => error!("Failed to dispatch message for {}: {e}", message.channel),
    }
}

/// Trigger shutdown on Ctrl+C or SIGTERM
async fn watch_signals(shutdown: ShutdownCoordinator) {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
            Err(e) => {
                error!("Failed to listen for SIGINT: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    shutdown.shutdown();
}
