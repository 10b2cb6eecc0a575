//! Tests for HierarchyService

use std::sync::Arc;

use access_core::application::services::HierarchyService;
use access_core::application::ApplicationError;
use access_core::config::Settings;
use access_core::domain::Record;

fn departments() -> Vec<Record> {
    vec![
        Record::new("HQ", "Headquarters"),
        Record::new("FIN", "Finance").with_parent("HQ"),
        Record::new("it-ops", "IT Operations").with_parent("HQ"),
        Record::new("LAB", "Research Lab").with_parent("NOWHERE"),
    ]
}

fn service(strict: bool) -> HierarchyService {
    let settings = Settings {
        strict_codes: strict,
        ..Settings::default()
    };
    HierarchyService::new(Arc::new(settings)).unwrap()
}

#[test]
fn given_lenient_settings_when_building_then_invalid_codes_are_reported() {
    // Act
    let view = service(false).build(&departments(), None).unwrap();

    // Assert
    assert_eq!(view.invalid_codes, vec!["it-ops"]);
    assert_eq!(view.total, 4);
    assert_eq!(view.shown, 4);
    assert_eq!(view.roots.len(), 2);
    assert_eq!(view.diagnostics.orphans, vec!["LAB"]);
}

#[test]
fn given_strict_settings_when_building_then_invalid_codes_are_rejected() {
    // Act
    let result = service(true).build(&departments(), None);

    // Assert
    match result {
        Err(ApplicationError::InvalidCodes { codes, .. }) => assert_eq!(codes, vec!["it-ops"]),
        other => panic!("expected InvalidCodes, got {other:?}"),
    }
}

#[test]
fn given_search_when_building_then_only_matches_and_ancestors_are_shown() {
    // Act
    let view = service(false).build(&departments(), Some("fin")).unwrap();

    // Assert
    assert_eq!(view.total, 4);
    assert_eq!(view.shown, 2);
    assert_eq!(view.roots[0].entity.code, "HQ");
    assert_eq!(view.roots[0].children[0].entity.code, "FIN");
}

#[test]
fn given_broken_pattern_when_creating_service_then_config_error() {
    // Arrange
    let settings = Settings {
        code_pattern: "([A-Z".into(),
        ..Settings::default()
    };

    // Act
    let result = HierarchyService::new(Arc::new(settings));

    // Assert
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}
