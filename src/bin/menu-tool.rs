//! Menu week maintenance from the command line.
//!
//! Usage:
//!   menu-tool current
//!   menu-tool show [--date YYYY-MM-DD]
//!   menu-tool month --date YYYY-MM-DD
//!   menu-tool copy --from YYYY-MM-DD --to YYYY-MM-DD [--publish]
//!
//! Reads BACKEND_URL (and optionally BACKEND_SESSION, a session cookie) from the
//! environment or `.env`.
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use meal_admin_api::{
    config::Config,
    middleware::session::BackendSession,
    models::menu::{MenuStatus, WeekMenu},
    services::{
        backend::BackendClient,
        menu::MenuService,
        order_store::WeeklyOrderStore,
        week::{day_label, menu_days, week_start},
    },
};

#[derive(Parser)]
#[command(name = "menu-tool", about = "Inspect and copy menu weeks on the backend")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the days of the week the kitchen is composing now
    Current,
    /// Print the menu week containing a date (default: the current menu week)
    Show {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List every menu week touching a month
    Month {
        #[arg(long)]
        date: NaiveDate,
    },
    /// Copy the dishes of one week onto another
    Copy {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        /// Save the copy as published instead of draft
        #[arg(long)]
        publish: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let backend = BackendClient::new(&config.backend_url, config.backend_timeout)?;
    let session = BackendSession(std::env::var("BACKEND_SESSION").ok());

    match args.command {
        Command::Current => {
            let monday = config.current_menu_monday()?;
            println!("Semaine en cours de composition : {}", monday);
            for day in menu_days(monday) {
                println!("  {}  {}", day.jour(), day.label);
            }
        }
        Command::Show { date } => {
            let monday = match date {
                Some(date) => week_start(date),
                None => config.current_menu_monday()?,
            };
            match MenuService::find_week(&backend, &session, monday).await {
                Some(week) => print_week(&week),
                None => println!("Aucun menu pour la semaine du {}", monday),
            }
        }
        Command::Month { date } => {
            let weeks = MenuService::weeks_for_month(&backend, &session, date).await;
            if weeks.is_empty() {
                println!("Aucun menu pour ce mois");
            }
            for week in &weeks {
                println!(
                    "{} → {}  {}",
                    week.date_debut,
                    week.date_fin,
                    week.status.as_deref().unwrap_or("?")
                );
            }
        }
        Command::Copy { from, to, publish } => {
            let source = MenuService::find_week(&backend, &session, week_start(from))
                .await
                .with_context(|| format!("No menu week starts on {}", week_start(from)))?;
            let status = if publish { MenuStatus::Publie } else { MenuStatus::Brouillon };
            let payload = shifted_copy(&source, week_start(to))
                .to_week_payload(status)
                .context("Target week has no days")?;
            let saved = MenuService::create_or_update(&backend, &session, &payload).await?;
            tracing::info!(
                "Copied week {} onto {} ({})",
                source.date_debut,
                saved.date_debut,
                status
            );
        }
    }

    Ok(())
}

/// Same dishes, same weekdays, a different week.
fn shifted_copy(source: &WeekMenu, target_monday: NaiveDate) -> WeeklyOrderStore {
    let mut store = WeeklyOrderStore::new(menu_days(target_monday));
    let source_monday = week_start(source.date_debut);
    for jour in &source.menu_jours {
        let date = target_monday + (jour.date - source_monday);
        if store.days().iter().any(|d| d.date == date) {
            store.load_day(date, jour);
        }
    }
    store
}

fn print_week(week: &WeekMenu) {
    println!(
        "Semaine du {} au {} ({})",
        week.date_debut,
        week.date_fin,
        week.status.as_deref().unwrap_or("BROUILLON")
    );
    for jour in &week.menu_jours {
        let ids = |v: &[i64]| {
            v.iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        println!(
            "  {:<16} déj {:>5}  dîn {:>5}  alt [{}|{}]  entrées [{}]  desserts [{}]",
            day_label(jour.date),
            jour.plat_dejeuner_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
            jour.plat_diner_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
            ids(&jour.alternatives_dejeuner_ids),
            ids(&jour.alternatives_diner_ids),
            ids(&jour.entrees_jours_ids),
            ids(&jour.desserts_jours_ids),
        );
    }
}
