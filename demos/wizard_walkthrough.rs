//! # Wizard Walkthrough Example
//!
//! Drives the size wizard headlessly, without Telegram: classify a product
//! link, enter measurements, and print each panel the bot would show. Also
//! demonstrates the URL classifier and matcher on their own, and what the
//! wizard does with input it declines.

use size_finder::bot::panel_text;
use size_finder::catalog::{default_catalog, Category, Gender};
use size_finder::matching::{recommend, MeasurementUnit, UserMeasurements};
use size_finder::url_classifier::classify_product_url;
use size_finder::wizard::{WizardAction, WizardSession};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📏 Size Wizard Walkthrough");
    println!("==========================\n");

    let catalog = default_catalog();

    // Example 1: a complete walk, printing every panel along the way
    println!("🚶 Example 1: Full Walk (Women's Dress, Centimeters)");
    println!("----------------------------------------------------");

    let mut session = WizardSession::new();
    println!("{}\n", panel_text(&session, &catalog));

    session = session.apply(WizardAction::Advance, &catalog.chart)?;
    session = session.apply(
        WizardAction::SetProductUrl(
            "https://shop.example.com/women/dresses/floral-42".to_string(),
        ),
        &catalog.chart,
    )?;
    println!("{}\n", panel_text(&session, &catalog));

    session = session.apply(WizardAction::Advance, &catalog.chart)?;
    for (dimension, value) in [("bust", "93"), ("waist", "76"), ("hips", "102")] {
        session = session.apply(
            WizardAction::SetMeasurement {
                dimension: dimension.to_string(),
                value: value.to_string(),
            },
            &catalog.chart,
        )?;
    }
    println!("{}\n", panel_text(&session, &catalog));

    session = session.apply(WizardAction::Advance, &catalog.chart)?;
    println!("{}\n", panel_text(&session, &catalog));

    // Example 2: what the classifier makes of various links
    println!("🔗 Example 2: URL Classification");
    println!("--------------------------------");

    let urls = [
        "https://shop.example.com/men/tops/tee-1",
        "https://site/men/trousers/blue-jeans",
        "https://shop.example.com/WOMENS/Jumpsuits/J-1",
        "https://shop.example.com/women/shoes/heel-2",
        "https://site/kids/shoes/red",
    ];

    for url in urls {
        match classify_product_url(url) {
            Ok(c) => println!("  {} → {} / {}", url, c.gender, c.category),
            Err(e) => println!("  {} → {}", url, e),
        }
    }

    println!();

    // Example 3: the matcher on its own, in both units
    println!("📐 Example 3: Matching in Both Units");
    println!("------------------------------------");

    let mut cm_values = UserMeasurements::new();
    cm_values.insert("waist".to_string(), "82.5".to_string());
    cm_values.insert("inseam".to_string(), "83".to_string());

    let mut inch_values = UserMeasurements::new();
    inch_values.insert("waist".to_string(), "32.5".to_string());
    inch_values.insert("inseam".to_string(), "32".to_string());

    let from_cm = recommend(
        &catalog.chart,
        Gender::Men,
        Category::Trousers,
        &cm_values,
        MeasurementUnit::Cm,
    );
    let from_inch = recommend(
        &catalog.chart,
        Gender::Men,
        Category::Trousers,
        &inch_values,
        MeasurementUnit::Inch,
    );

    println!("  Men's trousers, waist 82.5 cm / inseam 83 cm → {:?}", from_cm);
    println!("  Men's trousers, waist 32.5 in / inseam 32 in → {:?}", from_inch);

    println!();

    // Example 4: actions the wizard declines
    println!("🚨 Example 4: Declined Actions");
    println!("------------------------------");

    let fresh = WizardSession::new().apply(WizardAction::Advance, &catalog.chart)?;

    match fresh.apply(WizardAction::Advance, &catalog.chart) {
        Ok(_) => println!("  Unexpected advance without a link"),
        Err(e) => println!("  Advance without a link → {}", e),
    }

    let with_kids_url = fresh.apply(
        WizardAction::SetProductUrl("https://site/kids/shoes/red".to_string()),
        &catalog.chart,
    )?;
    match with_kids_url.apply(WizardAction::Advance, &catalog.chart) {
        Ok(_) => println!("  Unexpected advance with a kids link"),
        Err(e) => println!("  Advance with a kids link → {}", e),
    }

    println!();

    // Example 5: restarting keeps the unit choice
    println!("🔄 Example 5: Restart Keeps the Unit");
    println!("------------------------------------");

    let inch_session = session.apply(WizardAction::StartOver, &catalog.chart)?;
    println!(
        "  After restart from centimeters: unit = {}",
        inch_session.unit
    );

    let restarted = WizardSession::new()
        .apply(WizardAction::Advance, &catalog.chart)?
        .apply(
            WizardAction::SetProductUrl("https://shop.example.com/men/jeans/j-5".to_string()),
            &catalog.chart,
        )?
        .apply(WizardAction::Advance, &catalog.chart)?
        .apply(WizardAction::SetUnit(MeasurementUnit::Inch), &catalog.chart)?
        .apply(WizardAction::StartOver, &catalog.chart)?;
    println!("  After restart from inches: unit = {}", restarted.unit);

    println!("\n✨ Wizard walkthrough completed!");

    Ok(())
}
