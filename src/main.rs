mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pulse_boost::config::EngineConfig;
use pulse_boost::engine::{BoostEngine, PurchaseOutcome};
use pulse_boost::pricing::{PriceCalculator, PriceContext};
use pulse_boost::store::ListingStore;
use pulse_boost::{
    current_timestamp, format_percent, format_price, hour_of_day, AccountRole, InteractionCounters,
    ListingProfile,
};

#[derive(Parser)]
#[command(name = "pulse-boost", about = "Visibility boost scoring and pricing engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    Upsert(UpsertArgs),
    Score(ListingArgs),
    Price(PriceArgs),
    Eligibility(ListingArgs),
    Purchase(PurchaseArgs),
    Cancel(ListingArgs),
    Status(StatusArgs),
    Restore(StatusArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct CommonArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    data: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct UpsertArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long)]
    listing_id: String,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    primary_image: String,
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value_t = 0.0)]
    rating: f64,
    #[arg(long)]
    verified: bool,
    #[arg(long, default_value = "regular")]
    role: String,
    #[arg(long, default_value_t = 0)]
    age_days: i64,
    #[arg(long, default_value_t = 0)]
    gallery: u32,
    #[arg(long, default_value_t = 0)]
    videos: u32,
    #[arg(long, default_value_t = 0)]
    services: u32,
    #[arg(long, default_value_t = 0.0)]
    hourly_rate: f64,
    #[arg(long, default_value_t = 0)]
    availability_days: u32,
    #[arg(long, default_value_t = 0)]
    languages: u32,
    #[arg(long, default_value_t = 0)]
    views: u64,
    #[arg(long, default_value_t = 0)]
    messages: u64,
    #[arg(long, default_value_t = 0)]
    bookings: u64,
}

#[derive(Args, Debug, Clone)]
struct ListingArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long)]
    listing_id: String,
}

#[derive(Args, Debug, Clone)]
struct PriceArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long, default_value_t = 100)]
    completeness: u8,
    #[arg(long, default_value_t = 0.0)]
    rating: f64,
    #[arg(long)]
    hour: Option<u8>,
    #[arg(long, default_value = "regular")]
    role: String,
    #[arg(long)]
    base_price: Option<f64>,
}

#[derive(Args, Debug, Clone)]
struct PurchaseArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long)]
    listing_id: String,
    #[arg(long)]
    package_id: String,
    #[arg(long)]
    purchaser_id: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
struct StatusArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Status(StatusArgs::default()));

    match command {
        Command::Upsert(args) => run_upsert(args).await,
        Command::Score(args) => run_score(args).await,
        Command::Price(args) => run_price(args),
        Command::Eligibility(args) => run_eligibility(args).await,
        Command::Purchase(args) => run_purchase(args).await,
        Command::Cancel(args) => run_cancel(args).await,
        Command::Status(args) => run_status(args).await,
        Command::Restore(args) => run_restore(args).await,
        Command::Serve(args) => run_serve(args).await,
    }
}

async fn build_engine(common: &CommonArgs) -> Result<Arc<BoostEngine>, String> {
    let (mut config, _) = EngineConfig::load(common.config.clone())?;
    if let Some(data) = common.data.as_ref() {
        config.store.data_path = data.clone();
    }
    let store = Arc::new(ListingStore::load(PathBuf::from(&config.store.data_path)).await?);
    Ok(Arc::new(BoostEngine::new(config, store).await?))
}

async fn run_upsert(args: UpsertArgs) -> Result<(), String> {
    let (mut config, _) = EngineConfig::load(args.common.config.clone())?;
    if let Some(data) = args.common.data.as_ref() {
        config.store.data_path = data.clone();
    }
    let store = ListingStore::load(PathBuf::from(&config.store.data_path)).await?;

    let now = current_timestamp();
    let role = AccountRole::from_str(&args.role)
        .ok_or_else(|| format!("invalid role: {}", args.role))?;
    let profile = ListingProfile {
        listing_id: args.listing_id.clone(),
        verified: args.verified || role == AccountRole::Verified,
        role,
        country: args.country,
        rating: args.rating,
        created_at: now - args.age_days * 86_400,
        last_active_at: Some(now),
        last_boost_at: None,
        name: args.name,
        description: args.description,
        primary_image: args.primary_image,
        gallery_count: args.gallery,
        video_count: args.videos,
        service_count: args.services,
        hourly_rate: args.hourly_rate,
        availability_days: args.availability_days,
        language_count: args.languages,
        location: args.location,
    };

    store.upsert_profile(profile).await?;
    store
        .set_counters(
            &args.listing_id,
            InteractionCounters {
                views: args.views,
                messages: args.messages,
                bookings: args.bookings,
            },
        )
        .await?;

    println!("Listing {} saved", args.listing_id);
    Ok(())
}

async fn run_score(args: ListingArgs) -> Result<(), String> {
    let engine = build_engine(&args.common).await?;
    let report = engine
        .calculate_boost_score(&args.listing_id, current_timestamp())
        .await?;

    println!(
        "Boost score for {}: {}",
        report.listing_id, report.breakdown.total
    );
    println!("Completeness: {}%", report.completeness);
    println!(
        "Engagement: interaction {} | content {}",
        report.engagement.interaction, report.engagement.content
    );
    println!(
        "Factors: verified {:.1} | completeness {:.1} | recency {:.1} | interaction {:.1} | content {:.1} | spend {:.1}",
        report.breakdown.verified,
        report.breakdown.completeness,
        report.breakdown.recency,
        report.breakdown.interaction,
        report.breakdown.content,
        report.breakdown.spend
    );
    println!(
        "Hours inactive: {:.1} (ceiling applied)",
        report.breakdown.hours_inactive
    );
    Ok(())
}

fn run_price(args: PriceArgs) -> Result<(), String> {
    let (config, _) = EngineConfig::load(args.common.config.clone())?;
    if args.completeness > 100 {
        return Err(format!(
            "completeness out of range (0-100): {}",
            args.completeness
        ));
    }
    if !(0.0..=5.0).contains(&args.rating) {
        return Err(format!("rating out of range (0-5): {}", args.rating));
    }
    let hour = match args.hour {
        Some(hour) if hour > 23 => return Err(format!("invalid hour (0-23): {}", hour)),
        Some(hour) => hour,
        None => hour_of_day(current_timestamp()),
    };
    let role = AccountRole::from_str(&args.role)
        .ok_or_else(|| format!("invalid role: {}", args.role))?;

    let calculator = PriceCalculator::new(config.pricing.clone());
    let quote = calculator.quote(&PriceContext {
        base_price: args.base_price.unwrap_or(config.pricing.base_price),
        country: args.country,
        completeness: args.completeness,
        rating: args.rating,
        hour_of_day: hour,
        role,
    });

    println!("Base price: {}", format_price(quote.base));
    for adjustment in &quote.adjustments {
        println!("  {:+.2}  {}", adjustment.amount, adjustment.label);
    }
    println!(
        "Final price: {} (floor {})",
        format_price(quote.total),
        format_price(config.pricing.minimum_price)
    );
    Ok(())
}

async fn run_eligibility(args: ListingArgs) -> Result<(), String> {
    let engine = build_engine(&args.common).await?;
    let eligibility = engine
        .check_eligibility(&args.listing_id, current_timestamp())
        .await?;

    if eligibility.eligible {
        println!("Listing {} is eligible to boost", args.listing_id);
    } else {
        println!(
            "Listing {} is not eligible: {}",
            args.listing_id,
            eligibility.reason.unwrap_or_default()
        );
    }
    Ok(())
}

async fn run_purchase(args: PurchaseArgs) -> Result<(), String> {
    let engine = build_engine(&args.common).await?;
    let purchaser = args
        .purchaser_id
        .clone()
        .unwrap_or_else(|| args.listing_id.clone());
    let outcome = engine
        .purchase_boost(
            &args.listing_id,
            &args.package_id,
            &purchaser,
            current_timestamp(),
        )
        .await?;

    match outcome {
        PurchaseOutcome::Completed { purchase, quote } => {
            println!(
                "Boost {} active until {} for {}",
                purchase.purchase_id,
                purchase.ends_at,
                format_price(purchase.price_charged)
            );
            for adjustment in &quote.adjustments {
                println!("  {:+.2}  {}", adjustment.amount, adjustment.label);
            }
        }
        PurchaseOutcome::Rejected { reason } => {
            println!("Purchase rejected: {}", reason);
        }
    }
    Ok(())
}

async fn run_cancel(args: ListingArgs) -> Result<(), String> {
    let engine = build_engine(&args.common).await?;
    let cancelled = engine
        .cancel_boost(&args.listing_id, current_timestamp())
        .await?;
    println!("Boost {} cancelled", cancelled.purchase_id);
    Ok(())
}

async fn run_status(args: StatusArgs) -> Result<(), String> {
    let engine = build_engine(&args.common).await?;
    let status = engine.compliance_status().await;
    let rotation = engine.rotation_snapshot().await;

    println!("Compliance mode: {}", status.mode.label());
    println!(
        "Compliance rate: {} ({} violations total)",
        format_percent(status.compliance_rate),
        status.violation_count
    );
    for violation in &status.recent_violations {
        println!("  [{}] x{} {}", violation.observed_at, violation.count, violation.detail);
    }
    println!(
        "Rotation: {}/{} slots | synthetic {} ({}) vs organic {} | deviation {}",
        rotation.occupied,
        rotation.total_slots,
        rotation.synthetic,
        format_percent(rotation.actual_synthetic_pct),
        rotation.organic,
        format_percent(rotation.deviation_pct)
    );
    Ok(())
}

async fn run_restore(args: StatusArgs) -> Result<(), String> {
    let engine = build_engine(&args.common).await?;
    let mode = engine.restore_health(current_timestamp()).await;
    println!("Compliance mode: {}", mode.label());
    Ok(())
}

async fn run_serve(args: ServeArgs) -> Result<(), String> {
    let engine = build_engine(&args.common).await?;
    server::serve(engine, args.host, args.port).await
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
