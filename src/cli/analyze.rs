//! The `analyze` command: run photo analysis on its own.

use std::path::PathBuf;

use clap::Args;

use crate::config::VisionConfig;
use crate::settings::Settings;
use crate::vision::{self, OpenAiVision, PhotoPayload};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Photos to analyze
    #[arg(required = true)]
    pub photos: Vec<PathBuf>,

    /// Emit JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let settings = Settings::load();
    let config = VisionConfig::from_env(&settings);
    if args.photos.len() > config.max_photos {
        anyhow::bail!("too many photos: {} (max {})", args.photos.len(), config.max_photos);
    }

    let photos: Result<Vec<_>, _> = args
        .photos
        .iter()
        .map(|p| PhotoPayload::from_path(p))
        .collect();
    let photos = photos?;

    let analyzer = OpenAiVision::new(config)?;
    let features = vision::analyze_batch(&analyzer, &photos).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&features)?);
        return Ok(());
    }

    fn opt<T: std::fmt::Display>(value: &Option<T>) -> String {
        value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "not detected".to_string())
    }

    println!("Detected features ({} photos):", args.photos.len());
    println!("  building type:     {}", opt(&features.building_type));
    println!("  roof style:        {}", opt(&features.roof_style));
    println!("  exterior material: {}", opt(&features.exterior_material));
    println!("  stories:           {}", opt(&features.stories));
    println!("  windows:           {}", opt(&features.window_count));
    println!("  doors:             {}", opt(&features.door_count));
    println!("  garage doors:      {}", opt(&features.garage_doors));
    println!("  porch: {}  deck: {}", features.has_porch, features.has_deck);
    if !features.special_features.is_empty() {
        println!("  special:           {}", features.special_features.join(", "));
    }
    println!("  photo quality:     {:?}", features.photo_quality);
    println!("  confidence:        {:.2}", features.confidence);

    Ok(())
}
