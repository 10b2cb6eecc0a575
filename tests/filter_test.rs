//! Tests for forest filtering and search

use access_core::domain::{
    build_forest, count_nodes, filter_forest, search_forest, Forest, Record, SearchMatcher,
};

fn org() -> Forest<Record> {
    let items = vec![
        Record::new("HQ", "Headquarters"),
        Record::new("FIN", "Finance").with_parent("HQ"),
        Record::new("AP", "Accounts Payable").with_parent("FIN"),
        Record::new("AR", "Accounts Receivable").with_parent("FIN"),
        Record::new("HR", "Human Resources").with_parent("HQ"),
        Record::new("LAB", "Research Lab"),
    ];
    build_forest(&items, |r| r.code.as_str(), |r| r.parent_code.as_deref())
}

#[test]
fn given_always_true_predicate_when_filtering_then_forest_is_unchanged() {
    // Arrange
    let forest = org();

    // Act
    let filtered = filter_forest(&forest, |_| true);

    // Assert
    assert_eq!(filtered, forest);
}

#[test]
fn given_always_false_predicate_when_filtering_then_forest_is_empty() {
    let filtered = filter_forest(&org(), |_| false);
    assert!(filtered.is_empty());
}

#[test]
fn given_matching_leaf_when_filtering_then_ancestor_chain_is_kept() {
    // Arrange
    let forest = org();

    // Act
    let filtered = filter_forest(&forest, |r| r.code == "AR");

    // Assert: HQ > FIN > AR only
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].entity.code, "HQ");
    assert_eq!(filtered[0].children.len(), 1);
    assert_eq!(filtered[0].children[0].entity.code, "FIN");
    assert_eq!(filtered[0].children[0].children.len(), 1);
    assert_eq!(filtered[0].children[0].children[0].entity.code, "AR");
    assert_eq!(count_nodes(&filtered), 3);
}

#[test]
fn given_matching_inner_node_when_filtering_then_unmatched_children_are_dropped() {
    // Act
    let filtered = filter_forest(&org(), |r| r.code == "FIN");

    // Assert
    assert_eq!(count_nodes(&filtered), 2);
    assert!(filtered[0].children[0].is_leaf());
}

#[test]
fn given_filter_when_applied_then_input_forest_is_not_modified() {
    // Arrange
    let forest = org();
    let before = forest.clone();

    // Act
    let _ = filter_forest(&forest, |r| r.code == "LAB");

    // Assert
    assert_eq!(forest, before);
}

#[test]
fn given_empty_search_term_when_searching_then_everything_is_retained() {
    // Arrange
    let forest = org();

    // Act
    let result = search_forest(&forest, "  ", |r| vec![r.name.as_str(), r.code.as_str()]);

    // Assert
    assert_eq!(result, forest);
}

#[test]
fn given_name_substring_when_searching_then_matches_case_insensitively() {
    // Act
    let result = search_forest(&org(), "accounts", |r| vec![r.name.as_str(), r.code.as_str()]);

    // Assert: HQ, FIN, AP, AR
    assert_eq!(count_nodes(&result), 4);
}

#[test]
fn given_record_matcher_when_matching_code_then_works_like_name() {
    let matcher = SearchMatcher::new("lab");
    assert!(matcher.matches_record(&Record::new("LAB", "Something else")));
    assert!(!matcher.matches_record(&Record::new("HQ", "Headquarters")));
}
