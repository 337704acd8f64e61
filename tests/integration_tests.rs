//! # Integration Tests
//!
//! End-to-end tests for the size finder: URL classification feeding the
//! wizard, the wizard feeding the matcher, and completed walks landing in
//! the database.

use anyhow::{Context, Result};
use size_finder::catalog::{default_catalog, Category, Gender};
use size_finder::db::{init_database_schema, recent_sessions, save_completed_session};
use size_finder::dialogue::parse_measurement_entry;
use size_finder::url_classifier::{classify_product_url, ClassificationError};
use size_finder::wizard::{WizardAction, WizardError, WizardSession, WizardStep};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::thread;
use tempfile::NamedTempFile;

async fn setup_test_db() -> Result<(SqlitePool, NamedTempFile)> {
    let temp_file = NamedTempFile::new().context("Failed to create temporary database file")?;
    let url = format!("sqlite://{}", temp_file.path().display());
    let pool = SqlitePool::connect(&url)
        .await
        .context("Failed to connect to test database")?;
    init_database_schema(&pool).await?;
    Ok((pool, temp_file))
}

fn set(dimension: &str, value: &str) -> WizardAction {
    WizardAction::SetMeasurement {
        dimension: dimension.to_string(),
        value: value.to_string(),
    }
}

/// Test the complete journey from a pasted link to a stored result
#[tokio::test]
async fn test_end_to_end_walk_to_database() -> Result<()> {
    let catalog = default_catalog();
    let (pool, _temp_file) = setup_test_db().await?;
    let chat_id = 12345;

    // Step 1: walk the wizard from the intro to a recommendation
    let session = WizardSession::new()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap()
        .apply(
            WizardAction::SetProductUrl(
                "https://shop.example.com/women/dresses/floral-42".to_string(),
            ),
            &catalog.chart,
        )
        .unwrap()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap()
        .apply(set("bust", "93"), &catalog.chart)
        .unwrap()
        .apply(set("waist", "76"), &catalog.chart)
        .unwrap()
        .apply(set("hips", "102"), &catalog.chart)
        .unwrap()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap();

    assert_eq!(session.step, WizardStep::Results);
    assert_eq!(session.recommended_size.as_deref(), Some("M"));

    // Step 2: persist the finished walk
    let session_id = save_completed_session(&pool, chat_id, &session).await?;
    assert!(session_id > 0);

    // Step 3: the history shows the stored walk with all its context
    let records = recent_sessions(&pool, chat_id, 5).await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].recommended_size, "M");
    assert_eq!(records[0].gender, "women");
    assert_eq!(records[0].category, "dresses");
    assert!(records[0].measurements.contains("\"waist\""));

    println!("✅ End-to-end walk stored and read back as session {session_id}");
    Ok(())
}

/// Test the URL scenarios shoppers actually paste
#[test]
fn test_url_classification_scenarios() {
    // A trousers link that also mentions jeans in the product slug
    let c = classify_product_url("https://site/men/trousers/blue-jeans").unwrap();
    assert_eq!(c.gender, Gender::Men);
    assert_eq!(c.category, Category::Trousers);

    // A kids link has neither signal and says so in one message
    let err = classify_product_url("https://site/kids/shoes/red").unwrap_err();
    assert_eq!(err, ClassificationError::GenderAndCategoryNotDetected);
    assert!(err.gender_missing());
    assert!(err.category_missing());

    // When two category groups match, the earlier group wins
    let c = classify_product_url("https://shop.example.com/women/tops/jeans/mix-3").unwrap();
    assert_eq!(c.category, Category::Tops);

    // Uppercase shop URLs classify the same as lowercase ones
    let c = classify_product_url("https://SHOP.example.com/WOMENS/Jumpsuits/J-1").unwrap();
    assert_eq!(c.gender, Gender::Women);
    assert_eq!(c.category, Category::Dresses);
}

/// Test typed quick entries flowing into the wizard
#[test]
fn test_quick_entry_feeds_the_wizard() {
    let catalog = default_catalog();

    let session = WizardSession::new()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap()
        .apply(
            WizardAction::SetProductUrl("https://shop.example.com/women/tops/blouse-5".to_string()),
            &catalog.chart,
        )
        .unwrap()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap();

    // The shopper types "Waist: 76" instead of pressing the button.
    let (dimension, value) = parse_measurement_entry("Waist: 76").unwrap();
    assert!(session.dimensions().contains(&dimension.as_str()));

    let session = session
        .apply(
            WizardAction::SetMeasurement { dimension, value },
            &catalog.chart,
        )
        .unwrap()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap();

    // Waist 76 on the women's tops table is closest to M (76).
    assert_eq!(session.recommended_size.as_deref(), Some("M"));
}

/// Test that an aborted walk leaves nothing in the database
#[tokio::test]
async fn test_abandoned_walk_stores_nothing() -> Result<()> {
    let catalog = default_catalog();
    let (pool, _temp_file) = setup_test_db().await?;

    // The shopper stops at the measurements screen.
    let session = WizardSession::new()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap()
        .apply(
            WizardAction::SetProductUrl("https://shop.example.com/men/tops/tee-1".to_string()),
            &catalog.chart,
        )
        .unwrap()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap();

    // Saving an unfinished session is refused outright.
    let err = save_completed_session(&pool, 12345, &session).await.unwrap_err();
    assert!(err.to_string().contains("recommendation"));

    let records = recent_sessions(&pool, 12345, 5).await?;
    assert!(records.is_empty());

    Ok(())
}

/// Test that two chats keep fully separate histories
#[tokio::test]
async fn test_two_chats_keep_separate_histories() -> Result<()> {
    let catalog = default_catalog();
    let (pool, _temp_file) = setup_test_db().await?;

    let walk = |url: &str, dim: &str, value: &str| -> WizardSession {
        WizardSession::new()
            .apply(WizardAction::Advance, &catalog.chart)
            .unwrap()
            .apply(WizardAction::SetProductUrl(url.to_string()), &catalog.chart)
            .unwrap()
            .apply(WizardAction::Advance, &catalog.chart)
            .unwrap()
            .apply(set(dim, value), &catalog.chart)
            .unwrap()
            .apply(WizardAction::Advance, &catalog.chart)
            .unwrap()
    };

    let dress_walk = walk("https://shop.example.com/women/dresses/d-1", "waist", "76");
    let chino_walk = walk("https://shop.example.com/men/pants/chino-9", "waist", "82.5");

    save_completed_session(&pool, 111, &dress_walk).await?;
    save_completed_session(&pool, 222, &chino_walk).await?;

    let first = recent_sessions(&pool, 111, 5).await?;
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].category, "dresses");

    let second = recent_sessions(&pool, 222, 5).await?;
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].category, "trousers");
    assert_eq!(second[0].recommended_size, "M");

    Ok(())
}

/// Test concurrent walks over a shared chart
#[test]
fn test_concurrent_walks_share_the_chart() {
    let catalog = Arc::new(default_catalog());
    let mut handles = vec![];

    let cases = [
        ("https://shop.example.com/women/dresses/d-1", "waist", "76", "M"),
        ("https://shop.example.com/men/trousers/t-2", "waist", "72.5", "XS"),
        ("https://shop.example.com/women/tops/b-3", "waist", "88", "XL"),
    ];

    for (url, dim, value, expected) in cases {
        let catalog = Arc::clone(&catalog);
        let handle = thread::spawn(move || {
            let session = WizardSession::new()
                .apply(WizardAction::Advance, &catalog.chart)
                .unwrap()
                .apply(WizardAction::SetProductUrl(url.to_string()), &catalog.chart)
                .unwrap()
                .apply(WizardAction::Advance, &catalog.chart)
                .unwrap()
                .apply(set(dim, value), &catalog.chart)
                .unwrap()
                .apply(WizardAction::Advance, &catalog.chart)
                .unwrap();
            assert_eq!(session.recommended_size.as_deref(), Some(expected));
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    println!("✅ Concurrent walks completed against the shared chart");
}

/// Test that a walk over an uncovered pair still completes and stores
#[tokio::test]
async fn test_uncovered_pair_walk_stores_not_found() -> Result<()> {
    let catalog = default_catalog();
    let (pool, _temp_file) = setup_test_db().await?;

    let session = WizardSession::new()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap()
        .apply(
            WizardAction::SetProductUrl("https://shop.example.com/men/dresses/kilt-7".to_string()),
            &catalog.chart,
        )
        .unwrap()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap()
        .apply(set("waist", "80"), &catalog.chart)
        .unwrap()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap();

    assert_eq!(session.recommended_size.as_deref(), Some("Size not found"));

    save_completed_session(&pool, 12345, &session).await?;
    let records = recent_sessions(&pool, 12345, 1).await?;
    assert_eq!(records[0].recommended_size, "Size not found");
    assert_eq!(records[0].gender, "men");
    assert_eq!(records[0].category, "dresses");

    Ok(())
}

/// Test the declined-into-corrected flow a real shopper goes through
#[test]
fn test_correction_flow_after_declines() {
    let catalog = default_catalog();

    // Advancing without a link is declined with a clear reason.
    let session = WizardSession::new().apply(WizardAction::Advance, &catalog.chart).unwrap();
    let err = session.apply(WizardAction::Advance, &catalog.chart).unwrap_err();
    assert_eq!(err, WizardError::MissingProductUrl);

    // A bad link is declined too; the shopper fixes it and moves on.
    let session = session
        .apply(
            WizardAction::SetProductUrl("https://site/kids/shoes/red".to_string()),
            &catalog.chart,
        )
        .unwrap();
    assert!(session.apply(WizardAction::Advance, &catalog.chart).is_err());

    let session = session
        .apply(
            WizardAction::SetProductUrl("https://shop.example.com/men/jeans/j-5".to_string()),
            &catalog.chart,
        )
        .unwrap()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap();
    assert_eq!(session.step, WizardStep::Measurements);
    assert_eq!(session.category, Some(Category::Trousers));

    // Asking for a size with no values is declined until one arrives.
    let err = session.apply(WizardAction::Advance, &catalog.chart).unwrap_err();
    assert_eq!(err, WizardError::NoMeasurementsProvided);

    let session = session
        .apply(set("waist", "77.5"), &catalog.chart)
        .unwrap()
        .apply(WizardAction::Advance, &catalog.chart)
        .unwrap();
    assert_eq!(session.recommended_size.as_deref(), Some("S"));
}
