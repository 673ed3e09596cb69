//! The shipped sample config and catalog seed stay loadable

use intake_server::IntakeConfig;
use intake_store::{CatalogSeed, IntakeStore};
use pretty_assertions::assert_eq;
use std::path::Path;

#[test]
fn test_sample_config_parses() {
    let config = IntakeConfig::from_toml_str(include_str!("../config/intake.toml")).unwrap();
    assert_eq!(config.server.route, "contact-handler");
    assert_eq!(config.notifications.recipient, "hello@sparknest.co.ke");
    assert!(!config.logging.json);
}

#[test]
fn test_sample_seed_fills_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("intake.db");
    let store = IntakeStore::open(&path, &IntakeConfig::default().database.store_options()).unwrap();

    let seed = CatalogSeed::load(Path::new(env!("CARGO_MANIFEST_DIR")).join("seed/catalog.toml"))
        .unwrap();
    let report = store.seed_catalog(&seed).unwrap();
    assert_eq!(report.services, 4);
    assert_eq!(report.pricing, 4);

    let stats = store.stats().unwrap();
    assert_eq!(stats.services, 4);
    assert_eq!(stats.testimonials, 2);
    assert_eq!(store.featured_testimonials().unwrap().len(), 1);
    assert_eq!(store.equipment_by_category().unwrap().len(), 3);
}
