//! The `estimate` command: run the engine end to end.

use std::path::PathBuf;

use clap::Args;
use rust_decimal::Decimal;

use crate::building::{
    BuildingFeatures, BuildingType, Dimensions, ExteriorMaterial, FoundationType, Measurement,
    RoofStyle,
};
use crate::config::{DatabaseConfig, VisionConfig};
use crate::db::Database;
use crate::estimate::{EstimateEngine, EstimateResult, Trade, TradeStatus};
use crate::history::Store;
use crate::settings::Settings;
use crate::tables::{ReferenceTables, TableOverrides};
use crate::vision::{self, OpenAiVision, PhotoPayload};

#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Building length in feet
    #[arg(long)]
    pub length: f64,

    /// Building width in feet
    #[arg(long)]
    pub width: f64,

    /// Wall height per story in feet
    #[arg(long, default_value_t = 9.0)]
    pub wall_height: f64,

    /// Number of stories
    #[arg(long, default_value_t = 1)]
    pub stories: u32,

    /// Bathroom count (plumbing is unavailable without it)
    #[arg(long)]
    pub bathrooms: Option<u32>,

    /// IRC climate zone (1-8)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub zone: u8,

    /// Mark the entered dimensions as tape-measured rather than estimated
    #[arg(long)]
    pub measured: bool,

    /// Foundation system: slab, crawl, or basement
    #[arg(long, value_parser = parse_foundation, default_value = "slab")]
    pub foundation: FoundationType,

    /// Building type override (defaults to the photo-detected type)
    #[arg(long, value_parser = parse_building_type)]
    pub building_type: Option<BuildingType>,

    /// Roof style, when photos are absent or wrong
    #[arg(long, value_parser = parse_roof_style)]
    pub roof_style: Option<RoofStyle>,

    /// Exterior material, when photos are absent or wrong
    #[arg(long, value_parser = parse_exterior)]
    pub exterior: Option<ExteriorMaterial>,

    /// Window count override
    #[arg(long)]
    pub windows: Option<u32>,

    /// Door count override
    #[arg(long)]
    pub doors: Option<u32>,

    /// Garage door count override
    #[arg(long)]
    pub garage_doors: Option<u32>,

    /// Building photo to analyze (repeatable)
    #[arg(long = "photo")]
    pub photos: Vec<PathBuf>,

    /// Contingency percent override
    #[arg(long)]
    pub contingency: Option<f64>,

    /// Regional pricing overrides file (JSON)
    #[arg(long)]
    pub regional_pricing: Option<PathBuf>,

    /// Profile whose stored pricing overrides apply
    #[arg(long)]
    pub profile: Option<String>,

    /// Save the estimate to the history database
    #[arg(long)]
    pub save: bool,

    /// Emit JSON instead of a rendered breakdown
    #[arg(long)]
    pub json: bool,
}

fn parse_foundation(s: &str) -> Result<FoundationType, String> {
    s.parse()
        .map_err(|_| format!("unknown foundation type: {s} (expected slab, crawl, or basement)"))
}

fn parse_building_type(s: &str) -> Result<BuildingType, String> {
    s.parse().map_err(|_| format!("unknown building type: {s}"))
}

fn parse_roof_style(s: &str) -> Result<RoofStyle, String> {
    s.parse().map_err(|_| format!("unknown roof style: {s}"))
}

fn parse_exterior(s: &str) -> Result<ExteriorMaterial, String> {
    s.parse().map_err(|_| format!("unknown exterior material: {s}"))
}

pub async fn run(args: EstimateArgs) -> anyhow::Result<()> {
    let settings = Settings::load();

    let mut tables = ReferenceTables::builtin()?;
    if let Some(path) = &args.regional_pricing {
        let contents = std::fs::read_to_string(path)?;
        let layer: TableOverrides = serde_json::from_str(&contents)?;
        tables.apply_regional(&layer);
    }

    // The store is needed for profile overrides and for --save.
    let store = match DatabaseConfig::from_env(&settings) {
        Some(config) if args.save || args.profile.is_some() => {
            let store = Store::new(&config).await?;
            store.run_migrations().await?;
            Some(store)
        }
        None if args.save => {
            anyhow::bail!("--save requires GROUNDWORK_DATABASE_URL to be set");
        }
        _ => None,
    };

    if let Some(profile) = &args.profile {
        match &store {
            Some(store) => {
                if let Some(layer) = store.load_overrides(profile).await? {
                    tables.apply_user(&layer);
                } else {
                    tracing::warn!(profile, "no stored overrides for profile");
                }
            }
            None => {
                anyhow::bail!("--profile requires GROUNDWORK_DATABASE_URL to be set");
            }
        }
    }

    let mut features = if args.photos.is_empty() {
        BuildingFeatures::unavailable()
    } else {
        let photos: Result<Vec<_>, _> = args
            .photos
            .iter()
            .map(|p| PhotoPayload::from_path(p))
            .collect();
        let photos = photos?;
        let config = VisionConfig::from_env(&settings);
        if photos.len() > config.max_photos {
            anyhow::bail!(
                "too many photos: {} (max {})",
                photos.len(),
                config.max_photos
            );
        }
        match OpenAiVision::new(config) {
            Ok(analyzer) => vision::analyze_or_degrade(&analyzer, &photos).await,
            Err(e) => {
                tracing::warn!("vision analysis unavailable: {e}");
                BuildingFeatures::unavailable()
            }
        }
    };

    // Explicit flags beat photo detection.
    if args.roof_style.is_some() {
        features.roof_style = args.roof_style;
    }
    if args.exterior.is_some() {
        features.exterior_material = args.exterior;
    }
    if args.windows.is_some() {
        features.window_count = args.windows;
    }
    if args.doors.is_some() {
        features.door_count = args.doors;
    }
    if args.garage_doors.is_some() {
        features.garage_doors = args.garage_doors;
    }

    let measure: fn(f64) -> Measurement = if args.measured {
        Measurement::measured
    } else {
        Measurement::estimated
    };
    let dims = Dimensions {
        length_ft: measure(args.length),
        width_ft: measure(args.width),
        wall_height_ft: measure(args.wall_height),
        stories: args.stories,
        bathrooms: args.bathrooms,
    };

    let mut engine = EstimateEngine::from_settings(&settings).with_foundation(args.foundation);
    if let Some(bt) = args.building_type {
        engine = engine.with_building_type(bt);
    }
    if let Some(pct) = args.contingency {
        engine = engine.with_contingency_percent(
            Decimal::try_from(pct).map_err(|_| anyhow::anyhow!("bad contingency: {pct}"))?,
        );
    }

    let result = engine.generate(&features, &dims, &tables, args.zone)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    if args.save {
        if let Some(store) = &store {
            store.save_estimate(&result, &dims).await?;
            println!();
            println!("Saved as {}", result.id);
        }
    }

    Ok(())
}

fn print_result(result: &EstimateResult) {
    println!("Estimate {}", result.id);
    println!("  {} | climate zone {}", result.building_type, result.climate_zone);
    println!();

    for trade in Trade::ALL {
        let outcome = result.trades.iter().find(|t| t.trade == trade);
        match outcome.map(|o| &o.status) {
            Some(TradeStatus::Unavailable { missing }) => {
                println!("{trade}: estimate unavailable (missing {missing})");
                println!();
                continue;
            }
            _ => println!("{trade}"),
        }

        for item in result.items_for(trade) {
            let annotations = if item.annotations.is_empty() {
                String::new()
            } else {
                let rendered: Vec<String> =
                    item.annotations.iter().map(|a| a.to_string()).collect();
                format!("  [{}]", rendered.join("; "))
            };
            println!(
                "  {:<28} {:>10.2} {:>7} @ {:>10} = {:>12}{}",
                item.description,
                item.quantity,
                item.unit.to_string(),
                item.unit_price.round_dp(2),
                item.subtotal.round_dp(2),
                annotations,
            );
        }
        println!();
    }

    println!("  {:<28} {:>12}", "subtotal", result.subtotal.round_dp(2));
    println!(
        "  {:<28} {:>12}",
        format!("contingency ({}%)", result.contingency_percent),
        result.contingency.round_dp(2)
    );
    println!("  {:<28} {:>12}", "permit", result.permit_cost.round_dp(2));
    println!("  {:<28} {:>12}", "total", result.rounded_total());
    println!();

    match result.accuracy {
        Some(score) => println!("  accuracy: {score:.2}"),
        None => println!("  accuracy: unavailable"),
    }
    for note in &result.notes {
        println!("  note: {note}");
    }
}
