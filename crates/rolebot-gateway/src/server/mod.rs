//! Process wiring
//!
//! Builds the engine from configuration, subscribes to the event bus, runs
//! the startup reconciler, then dispatches events until shutdown.

use std::sync::Arc;

use rolebot_cache::{Subscriber, SubscriberBuilder, Topic};
use rolebot_common::{AppConfig, AppError, AppResult};
use rolebot_engine::{
    EngineContext, EngineContextBuilder, EngineError, MessageLocks, ReconcileReport, Reconciler,
};
use tracing::{info, warn};

use crate::commands::{CommandHandler, CommandRegistry};
use crate::dispatcher::EventDispatcher;
use crate::platform::{RestPlatform, RestPlatformConfig};

fn engine_error(e: EngineError) -> AppError {
    match e {
        EngineError::Store(e) => AppError::Store(e),
        EngineError::Platform(e) => AppError::Platform(e),
        other => AppError::internal(other),
    }
}

/// Connect the store and the platform client and build the engine context
pub async fn create_engine(config: &AppConfig) -> AppResult<EngineContext> {
    info!("Connecting to PostgreSQL...");
    let pool_config = rolebot_db::PoolConfig::from(&config.database);
    let pool = rolebot_db::create_pool(&pool_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    let platform = RestPlatform::new(&RestPlatformConfig::from(&config.platform))?;

    EngineContextBuilder::new()
        .tracked_repo(Arc::new(rolebot_db::PgTrackedMessageRepository::new(pool.clone())))
        .schema_repo(Arc::new(rolebot_db::PgSchemaRepository::new(pool)))
        .platform(Arc::new(platform))
        .build()
        .map_err(engine_error)
}

/// Start the bus subscriber on the configured event topic
pub fn create_subscriber(config: &AppConfig) -> AppResult<Subscriber> {
    info!(pattern = %config.redis.event_channel_pattern, "Subscribing to event bus...");
    SubscriberBuilder::new()
        .redis_url(&config.redis.url)
        .broadcast_buffer(config.redis.event_buffer)
        .reconnect_delay_ms(config.redis.reconnect_delay_ms)
        .subscribe(Topic::parse(&config.redis.event_channel_pattern))
        .start()
        .map_err(|e| AppError::EventBus(format!("Failed to start event subscriber: {e}")))
}

/// Run one reconciliation pass
pub async fn reconcile(engine: &EngineContext) -> AppResult<ReconcileReport> {
    Reconciler::new(engine).run().await.map_err(engine_error)
}

pub fn create_dispatcher(engine: EngineContext, config: &AppConfig) -> EventDispatcher {
    let registry = Arc::new(CommandRegistry::with_defaults());
    let commands = Arc::new(CommandHandler::new(registry, config.bot.prefix.clone()));

    let dispatcher = EventDispatcher::new(engine).with_commands(commands);
    if config.bot.serialize_per_message {
        dispatcher.with_message_locks(MessageLocks::new())
    } else {
        dispatcher
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Run the bot until the event bus closes or Ctrl-C
pub async fn run(config: AppConfig) -> AppResult<()> {
    let engine = create_engine(&config).await?;

    // Subscribe first so events arriving during reconciliation are queued
    let subscriber = create_subscriber(&config)?;
    let receiver = subscriber.receiver();

    let report = reconcile(&engine).await?;
    if report.schema_created {
        info!("Store initialized");
    }

    let dispatcher = create_dispatcher(engine, &config);
    dispatcher.run(receiver, shutdown_signal()).await;

    if let Err(e) = subscriber.shutdown() {
        warn!(error = %e, "Failed to stop event subscriber");
    }
    info!("Bot stopped");
    Ok(())
}
