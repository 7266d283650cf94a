//! Eventia Engine - demo entry point.
//!
//! Wires the in-memory adapters, publishes an event with a single-seat
//! ticket tier and lets a crowd of buyers race for it.

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use eventia_domain::{
    EventCreateProps, EventId, EventStatus, Money, TicketCreateProps, TicketId, TicketType, UserId,
};
use eventia_engine::infrastructure::config::EngineConfig;
use eventia_engine::use_cases::ticket::TicketError;
use eventia_engine::App;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventia_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env();
    tracing::info!(
        max_conflict_retries = config.max_conflict_retries,
        currency = %config.default_currency,
        buyers = config.demo_buyers,
        "Starting Eventia Engine demo"
    );

    let app = Arc::new(App::in_memory(config));

    // Create and publish the event
    let start = Utc::now() + Duration::days(30);
    let mut props = EventCreateProps::new(
        "RustConf Madrid",
        "Charlas y talleres sobre Rust",
        start,
        start + Duration::hours(9),
        UserId::new("organizer-1")?,
    );
    props.capacity = Some(u32::try_from(app.config.demo_buyers).unwrap_or(u32::MAX));
    props.tags = vec!["rust".into(), "conference".into()];

    let event = app.use_cases.event.create.execute(props).await?;
    let event_id = event.value.id();
    app.use_cases
        .event
        .change_status
        .execute(event_id, EventStatus::Published)
        .await?;

    let tier = app
        .use_cases
        .ticket
        .create
        .execute(TicketCreateProps {
            id: None,
            name: "Front Row".into(),
            description: "Single seat next to the stage".into(),
            price: Money::new(150, &app.config.default_currency)?,
            quantity: 1,
            ticket_type: TicketType::Vip,
            event_id,
        })
        .await?;
    let ticket_id = tier.value.id();

    // Race the buyers for the only unit
    let mut handles = Vec::with_capacity(app.config.demo_buyers);
    for n in 0..app.config.demo_buyers {
        handles.push(tokio::spawn(buy(app.clone(), event_id, ticket_id, n)));
    }

    let mut sold = 0usize;
    for handle in handles {
        if handle.await.context("buyer task panicked")?? {
            sold += 1;
        }
    }

    let event = app
        .use_cases
        .event
        .ops
        .get(event_id)
        .await?
        .context("demo event disappeared")?;
    let tier = app
        .use_cases
        .ticket
        .ops
        .get(ticket_id)
        .await?
        .context("demo ticket disappeared")?;

    tracing::info!(
        event_id = %event_id,
        attendees = event.attendee_count(),
        ticket_id = %ticket_id,
        sold,
        available = tier.available_quantity(),
        buyer = ?tier.purchased_by().map(UserId::as_str),
        "Demo finished"
    );

    Ok(())
}

/// Register buyer `n` for the event, then try to buy the ticket.
///
/// Returns whether the purchase landed. Domain rejections are expected and
/// reported as `false`; anything else aborts the demo.
async fn buy(
    app: Arc<App>,
    event_id: EventId,
    ticket_id: TicketId,
    n: usize,
) -> anyhow::Result<bool> {
    let buyer = UserId::new(format!("buyer-{n}"))?;

    if let Err(e) = app
        .use_cases
        .event
        .register_attendee
        .execute(event_id, buyer.clone())
        .await
    {
        tracing::warn!(user_id = %buyer, error = %e, "Registration failed");
    }

    match app.use_cases.ticket.purchase.execute(ticket_id, buyer.clone()).await {
        Ok(_) => Ok(true),
        Err(TicketError::Domain(e)) => {
            tracing::info!(
                user_id = %buyer,
                code = e.code().unwrap_or("VALIDATION"),
                "Purchase rejected"
            );
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
