use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::sync::Arc;
use wardrobe::customization::{OutfitCustomizer, ReferenceData};
use wardrobe::domain::{CandidatePool, Category, Color, Garment, GarmentId};

fn garment(id: &str, category: Category, subtype: &str, color: Color) -> Garment {
    Garment {
        id: GarmentId(id.to_string()),
        name: id.replace('-', " "),
        category,
        subtype: subtype.to_string(),
        color,
        formality: "any".to_string(),
    }
}

fn customizer() -> OutfitCustomizer {
    let tables = ReferenceData::bundled().expect("bundled tables load");
    OutfitCustomizer::new(Arc::new(tables))
}

fn full_pool() -> CandidatePool {
    let mut pool = CandidatePool::new();
    pool.insert(
        Category::Top,
        vec![
            garment("white-tee", Category::Top, "t-shirt", Color::White),
            garment("grey-hoodie", Category::Top, "hoodie", Color::Grey),
            garment("oxford", Category::Top, "button-up", Color::SkyBlue),
            garment("cable-knit", Category::Top, "sweater", Color::Cream),
        ],
    );
    pool.insert(
        Category::Bottom,
        vec![
            garment("raw-denim", Category::Bottom, "jeans", Color::NavyBlue),
            garment("khakis", Category::Bottom, "chinos", Color::Olive),
            garment("cutoffs", Category::Bottom, "shorts", Color::Blue),
        ],
    );
    pool.insert(
        Category::Footwear,
        vec![
            garment("runners", Category::Footwear, "sneakers", Color::White),
            garment("chelsea", Category::Footwear, "boots", Color::Brown),
            garment("slides", Category::Footwear, "sandals", Color::Black),
        ],
    );
    pool.insert(
        Category::Outerwear,
        vec![
            garment("down-parka", Category::Outerwear, "parka", Color::Black),
            garment("shell", Category::Outerwear, "raincoat", Color::Yellow),
        ],
    );
    pool.insert(
        Category::Headwear,
        vec![
            garment("knit-beanie", Category::Headwear, "beanie", Color::Grey),
            garment("ball-cap", Category::Headwear, "cap", Color::NavyBlue),
        ],
    );
    pool
}

#[test]
fn every_outfit_fills_required_slots_once() {
    let customizer = customizer();
    let pool = full_pool();

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let temperature = 10.0 + (seed as f64) * 2.0;
        let outfit = customizer
            .customize_with_rng(&pool, temperature, Some("cloudy"), &mut rng)
            .expect("bundled tables cover every subtype");

        for category in Category::REQUIRED {
            assert!(outfit.get(category).is_some(), "seed {seed} missed {category}");
        }

        let categories: Vec<_> = outfit
            .garments()
            .iter()
            .map(|garment| garment.category)
            .collect();
        let distinct: BTreeSet<_> = categories.iter().copied().collect();
        assert_eq!(distinct.len(), categories.len(), "seed {seed}: {categories:?}");
    }
}

#[test]
fn freezing_weather_keeps_outerwear_and_never_a_cap() {
    let customizer = customizer();
    let pool = full_pool();

    for seed in 0..30 {
        let mut rng = StdRng::seed_from_u64(seed);
        let outfit = customizer
            .customize_with_rng(&pool, 12.0, Some("snowy"), &mut rng)
            .expect("outfit builds");

        assert!(outfit.get(Category::Outerwear).is_some(), "seed {seed}");
        if let Some(headwear) = outfit.get(Category::Headwear) {
            assert_eq!(headwear.garment.subtype, "beanie");
        }
    }
}

#[test]
fn outfit_follows_processing_order() {
    let customizer = customizer();
    let mut rng = StdRng::seed_from_u64(21);

    let outfit = customizer
        .customize_with_rng(&full_pool(), 30.0, None, &mut rng)
        .expect("outfit builds");

    let order: Vec<_> = outfit
        .garments()
        .iter()
        .map(|garment| garment.category)
        .collect();
    let expected: Vec<_> = Category::PROCESSING_ORDER
        .into_iter()
        .filter(|category| order.contains(category))
        .collect();
    assert_eq!(order, expected);
}

#[test]
fn hot_weather_shortlist_prefers_summer_pieces() {
    let customizer = customizer();
    let mut pool = CandidatePool::new();
    pool.insert(
        Category::Top,
        vec![garment("white-tee", Category::Top, "t-shirt", Color::White)],
    );
    pool.insert(
        Category::Bottom,
        vec![
            garment("cutoffs", Category::Bottom, "shorts", Color::Blue),
            garment("flannel-lined", Category::Bottom, "sweatpants", Color::Grey),
        ],
    );
    pool.insert(
        Category::Footwear,
        vec![garment("slides", Category::Footwear, "sandals", Color::Black)],
    );

    let mut shorts = 0;
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let outfit = customizer
            .customize_with_rng(&pool, 92.0, Some("sunny"), &mut rng)
            .expect("outfit builds");
        let bottom = outfit.get(Category::Bottom).expect("bottom chosen");
        if bottom.garment.subtype == "shorts" {
            shorts += 1;
        }
    }

    assert!(shorts > 120, "shorts chosen {shorts} times out of 200");
}

#[test]
fn compatibility_table_is_symmetric() {
    let tables = ReferenceData::bundled().expect("bundled tables load");
    for (a, b) in [("t-shirt", "jeans"), ("blazer", "cap"), ("raincoat", "rain boots")] {
        assert_eq!(
            tables.compatibility.weight(a, b),
            tables.compatibility.weight(b, a)
        );
    }
}
