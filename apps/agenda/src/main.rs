use std::env;

use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, Utc};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use scheduling_cell::{parse_schedule_date, parse_schedule_instant, AvailabilityService, DaySlots};
use shared_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitalia agenda");

    // Load configuration
    let config = AppConfig::from_env();
    if !config.is_configured() {
        bail!("VITALIA_BACKEND_URL is not set");
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let (doctor_id, date, now) = parse_args(&args)?;

    let auth_token = env::var("VITALIA_AUTH_TOKEN").ok();

    let service = AvailabilityService::new(&config);
    let day = match now {
        Some(now) => {
            service
                .day_slots_at(doctor_id, date, now, auth_token.as_deref())
                .await?
        }
        None => service.day_slots(doctor_id, date, auth_token.as_deref()).await?,
    };

    print_day(&day);

    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<(Uuid, NaiveDate, Option<DateTime<Utc>>)> {
    if args.len() < 2 || args.len() > 3 {
        bail!("usage: vitalia-agenda <doctor-id> <date> [now]");
    }

    let doctor_id = Uuid::parse_str(&args[0]).context("doctor-id is not a UUID")?;
    let date = parse_schedule_date(&args[1])?;
    let now = match args.get(2) {
        Some(raw) => Some(parse_schedule_instant(raw)?),
        None => None,
    };

    Ok((doctor_id, date, now))
}

fn print_day(day: &DaySlots) {
    println!("Slots for doctor {} on {}", day.doctor_id, day.date);

    if day.slots.is_empty() {
        println!("  (none)");
        return;
    }

    for slot in &day.slots {
        let state = if slot.available { "open" } else { "taken" };
        println!(
            "  {} - {}  {}",
            slot.start_time.format("%H:%M"),
            slot.end_time.format("%H:%M"),
            state
        );
    }

    println!("{} of {} slots open", day.open_count(), day.slots.len());
}
