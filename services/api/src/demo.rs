use crate::infra::{load_reference_data, parse_condition, InMemoryWardrobeRepository};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use wardrobe::config::AppConfig;
use wardrobe::customization::{Outfit, OutfitCustomizer, ReferenceData};
use wardrobe::domain::{Category, Color, Garment, GarmentId, OwnerId};
use wardrobe::error::AppError;
use wardrobe::import::WardrobeImporter;
use wardrobe::recommendation::{
    candidate_pool, RecommendationError, RecommendationService, StaticWeatherProvider,
    WardrobeRepository, WeatherCondition, WeatherReading,
};

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Wardrobe CSV export (Name,Category,Subtype,Color,Formality[,Id])
    #[arg(long)]
    pub(crate) wardrobe: PathBuf,
    /// Occasion formality, e.g. casual or formal
    #[arg(long)]
    pub(crate) formality: String,
    /// Current temperature in degrees Fahrenheit
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) temperature: f64,
    /// Simplified weather condition (clear, sunny, cloudy, rainy, snowy, windy)
    #[arg(long, value_parser = parse_condition)]
    pub(crate) condition: Option<WeatherCondition>,
    /// Seed the selection for a reproducible outfit
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AuditArgs {
    /// Directory holding the four reference CSVs (defaults to WARDROBE_REFERENCE_DIR, then the bundled tables)
    #[arg(long)]
    pub(crate) dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Temperature in degrees Fahrenheit for the demo forecast
    #[arg(long, default_value_t = 45.0, allow_negative_numbers = true)]
    pub(crate) temperature: f64,
    /// Weather condition for the demo forecast
    #[arg(long, value_parser = parse_condition)]
    pub(crate) condition: Option<WeatherCondition>,
    /// Occasion formality
    #[arg(long, default_value = "casual")]
    pub(crate) formality: String,
    /// Seed the selection for a reproducible outfit
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let tables = load_reference_data(config.reference.data_dir.as_deref())?;
    let customizer = OutfitCustomizer::new(Arc::new(tables));

    let garments = WardrobeImporter::from_path(&args.wardrobe)?;
    let pool = candidate_pool(&garments, &args.formality)?;
    let reading = WeatherReading {
        temperature_f: args.temperature,
        condition: args.condition,
    };

    let mut rng = rng_for(args.seed);
    let outfit = customizer.customize_with_rng(
        &pool,
        reading.temperature_f,
        reading.condition.map(WeatherCondition::as_str),
        &mut rng,
    )?;

    println!(
        "Wardrobe: {} ({} items)",
        args.wardrobe.display(),
        garments.len()
    );
    print!("{}", format_outfit(&args.formality, &reading, &outfit));
    Ok(())
}

pub(crate) fn run_reference_audit(args: AuditArgs) -> Result<(), AppError> {
    let dir = match args.dir {
        Some(dir) => Some(dir),
        None => AppConfig::load()?.reference.data_dir,
    };
    let data = match dir.as_deref() {
        Some(dir) => ReferenceData::from_dir(dir)?,
        None => ReferenceData::bundled()?,
    };

    let source = dir
        .as_deref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "bundled tables".to_string());
    print!("{}", format_audit(&source, &data));
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let reading = WeatherReading {
        temperature_f: args.temperature,
        condition: args.condition,
    };
    let outfit = demo_outfit(&args.formality, reading, args.seed)?;

    println!("Sample wardrobe: {} items", sample_wardrobe().len());
    print!("{}", format_outfit(&args.formality, &reading, &outfit));
    Ok(())
}

fn demo_outfit(
    formality: &str,
    reading: WeatherReading,
    seed: Option<u64>,
) -> Result<Outfit, AppError> {
    let owner = OwnerId("demo".to_string());
    let repository = Arc::new(InMemoryWardrobeRepository::default());
    for garment in sample_wardrobe() {
        repository
            .insert(&owner, garment)
            .map_err(RecommendationError::from)?;
    }

    let tables = ReferenceData::bundled()?;
    let service = RecommendationService::new(
        repository,
        Arc::new(StaticWeatherProvider::new(reading)),
        Arc::new(OutfitCustomizer::new(Arc::new(tables))),
    );

    let mut rng = rng_for(seed);
    Ok(service.recommend_with_rng(&owner, formality, reading, &mut rng)?)
}

fn sample_garment(
    id: &str,
    name: &str,
    category: Category,
    subtype: &str,
    color: Color,
    formality: &str,
) -> Garment {
    Garment {
        id: GarmentId(id.to_string()),
        name: name.to_string(),
        category,
        subtype: subtype.to_string(),
        color,
        formality: formality.to_string(),
    }
}

pub(crate) fn sample_wardrobe() -> Vec<Garment> {
    vec![
        sample_garment("top-01", "White crew tee", Category::Top, "t-shirt", Color::White, "casual"),
        sample_garment("top-02", "Charcoal hoodie", Category::Top, "hoodie", Color::Grey, "casual"),
        sample_garment("top-03", "Blue oxford", Category::Top, "button-up", Color::SkyBlue, "formal"),
        sample_garment("top-04", "Cream cable knit", Category::Top, "sweater", Color::Cream, "any"),
        sample_garment("bottom-01", "Dark denim", Category::Bottom, "jeans", Color::NavyBlue, "casual"),
        sample_garment("bottom-02", "Olive chinos", Category::Bottom, "chinos", Color::Olive, "any"),
        sample_garment("bottom-03", "Grey wool slacks", Category::Bottom, "slacks", Color::Grey, "formal"),
        sample_garment("bottom-04", "Canvas shorts", Category::Bottom, "shorts", Color::Brown, "casual"),
        sample_garment("shoes-01", "White sneakers", Category::Footwear, "sneakers", Color::White, "casual"),
        sample_garment("shoes-02", "Brown boots", Category::Footwear, "boots", Color::Brown, "any"),
        sample_garment("shoes-03", "Black derbies", Category::Footwear, "dress shoes", Color::Black, "formal"),
        sample_garment("shoes-04", "Yellow wellies", Category::Footwear, "rain boots", Color::Yellow, "casual"),
        sample_garment("outer-01", "Down parka", Category::Outerwear, "parka", Color::Black, "any"),
        sample_garment("outer-02", "Rain shell", Category::Outerwear, "raincoat", Color::Yellow, "casual"),
        sample_garment("outer-03", "Navy blazer", Category::Outerwear, "blazer", Color::NavyBlue, "formal"),
        sample_garment("head-01", "Ribbed beanie", Category::Headwear, "beanie", Color::Grey, "any"),
        sample_garment("head-02", "Ball cap", Category::Headwear, "cap", Color::NavyBlue, "casual"),
    ]
}

pub(crate) fn format_outfit(formality: &str, reading: &WeatherReading, outfit: &Outfit) -> String {
    let mut out = String::new();
    let condition = reading
        .condition
        .map(WeatherCondition::as_str)
        .unwrap_or("unknown");
    let _ = writeln!(
        out,
        "Outfit for a {} occasion at {:.1}°F ({})",
        formality, reading.temperature_f, condition
    );

    for selection in &outfit.selections {
        let score = selection.score;
        let _ = writeln!(
            out,
            "  {:<10} {} [{} {}, {}] score {} (temp {}, weather {}, color {}, pairing {})",
            selection.garment.category.as_str(),
            selection.garment.name,
            selection.garment.color,
            selection.garment.subtype,
            selection.garment.id,
            score.total(),
            score.temperature,
            score.weather,
            score.color,
            score.compatibility,
        );
    }

    for category in Category::PROCESSING_ORDER {
        if !category.is_required() && outfit.get(category).is_none() {
            let _ = writeln!(out, "  {:<10} (skipped)", category.as_str());
        }
    }
    out
}

pub(crate) fn format_audit(source: &str, data: &ReferenceData) -> String {
    let audit = data.audit();
    let mut out = String::new();
    let _ = writeln!(out, "Reference tables: {source}");
    let _ = writeln!(out, "  subtypes with temperature ranges: {}", audit.known_subtypes);

    if audit.is_clean() {
        let _ = writeln!(out, "  every referenced subtype can be scored");
    } else {
        let _ = writeln!(out, "  subtypes missing a temperature range:");
        for subtype in &audit.missing_temperature_ranges {
            let _ = writeln!(out, "    - {subtype}");
        }
    }
    out
}
