use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use client::domain;
use client::shared::config::{load_config, resolve_path};
use client::shared::http::ReqwestTransport;
use client::system::auth::FileTokenStorage;
use client::App;
use contracts::domain::a012_report::ReportQuery;
use contracts::shared::penalty::{parse_date, PenaltyAccrual};
use contracts::shared::{ListQuery, RecordId, SortSpec};

/// Password for `login` when not given on the command line
const PASSWORD_ENV: &str = "CONDO_PASSWORD";

#[derive(Parser)]
#[command(name = "condo-admin")]
#[command(about = "Condominium administration client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the token pair
    Login {
        /// Username or email
        user: String,
        /// Password (default: $CONDO_PASSWORD)
        password: Option<String>,
    },

    /// Forget the stored tokens
    Logout,

    /// Print one page of a collection as JSON
    List {
        /// Collection name (users, visits, fines, ...)
        resource: String,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        page_size: u32,
        /// Filter as name=value, repeatable
        #[arg(long = "filter")]
        filters: Vec<String>,
        /// Ordering field, `-` prefix for descending
        #[arg(long)]
        sort: Option<String>,
    },

    /// Export a whole collection to CSV (visits, payments, logs)
    Export {
        resource: String,
        /// Log entries from this day, YYYY-MM-DD (logs only)
        #[arg(long)]
        from: Option<String>,
        /// Log entries up to this day, YYYY-MM-DD (logs only)
        #[arg(long)]
        to: Option<String>,
    },

    /// Delete one record
    Delete { resource: String, id: String },

    /// Download an invoice PDF
    InvoicePdf { id: String },

    /// Estimate late-payment interest on a fine
    FinePenalty {
        principal: f64,
        /// Daily interest, percent
        daily_percent: f64,
        /// Due date, YYYY-MM-DD
        due_date: String,
        /// Evaluation date (default: today)
        #[arg(long)]
        today: Option<String>,
    },

    /// List access events recorded by the facial recognition terminal
    FaceEvents {
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Resolve every known endpoint and report where it lives
    Check,
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Логи пишем и в консоль, и в файл
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("condo-admin.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,reqwest=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

fn parse_query(page: u32, page_size: u32, filters: &[String], sort: Option<&str>) -> anyhow::Result<ListQuery> {
    let mut query = ListQuery::new().page(page).page_size(page_size);
    for filter in filters {
        let (name, value) = filter
            .split_once('=')
            .with_context(|| format!("Filter must be name=value: {}", filter))?;
        query = query.filter(name.trim(), value.trim());
    }
    if let Some(sort) = sort {
        let spec = SortSpec::parse(sort).with_context(|| format!("Invalid sort: {}", sort))?;
        query = query.sort(spec);
    }
    Ok(query)
}

fn parse_day(value: &str) -> anyhow::Result<NaiveDate> {
    parse_date(value).with_context(|| format!("Invalid date: {}", value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Штраф считается локально, без обращения к серверу
    if let Commands::FinePenalty {
        principal,
        daily_percent,
        due_date,
        today,
    } = &cli.command
    {
        let due = parse_day(due_date)?;
        let today = match today {
            Some(day) => parse_day(day)?,
            None => Local::now().date_naive(),
        };
        let accrual = PenaltyAccrual::compute(*principal, *daily_percent, due, today);
        println!("{}", serde_json::to_string_pretty(&accrual)?);
        return Ok(());
    }

    init_tracing()?;
    let config = load_config()?;
    tracing::info!("API: {}", config.api.base_url);

    let transport = Arc::new(ReqwestTransport::new(config.api.timeout())?);
    let storage = Arc::new(FileTokenStorage::new(resolve_path(&config.auth.token_file)));
    let app = App::new(&config, transport, storage);
    app.session().restore().await?;

    match cli.command {
        Commands::Login { user, password } => {
            let password = match password {
                Some(p) => p,
                None => std::env::var(PASSWORD_ENV)
                    .with_context(|| format!("Pass a password or set {}", PASSWORD_ENV))?,
            };
            app.session().login(&user, &password).await?;
            println!("Logged in as {}", user);
        }
        Commands::Logout => {
            app.session().logout().await;
        }
        Commands::List {
            resource,
            page,
            page_size,
            filters,
            sort,
        } => {
            let query = parse_query(page, page_size, &filters, sort.as_deref())?;
            let listed = app.list_json(&resource, &query).await?;
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
        Commands::Export { resource, from, to } => {
            let path = if resource == "logs" {
                let range = ReportQuery {
                    from: from.as_deref().map(parse_day).transpose()?,
                    to: to.as_deref().map(parse_day).transpose()?,
                    ..Default::default()
                };
                app.export_logs(&range).await?
            } else {
                anyhow::ensure!(
                    from.is_none() && to.is_none(),
                    "--from/--to only apply to the logs export"
                );
                app.export_csv(&resource, Local::now().naive_local()).await?
            };
            println!("{}", path.display());
        }
        Commands::Delete { resource, id } => {
            app.delete(&resource, &RecordId::from(id.as_str())).await?;
            println!("Deleted {} {}", resource, id);
        }
        Commands::InvoicePdf { id } => {
            let path = app.save_invoice_pdf(&RecordId::from(id.as_str())).await?;
            println!("{}", path.display());
        }
        Commands::FaceEvents { page } => {
            let events = app.faces().list_events(&ListQuery::new().page(page)).await?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        Commands::Check => {
            let all = domain::endpoints();
            let required: Vec<_> = all
                .iter()
                .filter(|e| config.discovery.required.iter().any(|r| r == e.collection))
                .copied()
                .collect();
            app.resolver().check(&required).await?;
            for endpoint in &all {
                let path = app.resolver().resolve(endpoint).await?;
                println!("{:<20} {}", endpoint.collection, path);
            }
        }
        Commands::FinePenalty { .. } => {}
    }

    Ok(())
}
