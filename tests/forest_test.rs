//! Tests for ForestBuilder

use access_core::domain::{
    ancestors_of, build_forest, count_nodes, depth, filter_forest, find, walk, ForestBuilder, Node,
    Record,
};
use access_core::util::testing;
use rstest::rstest;

fn rec(code: &str, parent: Option<&str>) -> Record {
    let r = Record::new(code, code.to_lowercase());
    match parent {
        Some(p) => r.with_parent(p),
        None => r,
    }
}

fn codes(nodes: &[Node<Record>]) -> Vec<&str> {
    nodes.iter().map(|n| n.entity.code.as_str()).collect()
}

fn build(items: &[Record]) -> Vec<Node<Record>> {
    build_forest(items, |r| r.code.as_str(), |r| r.parent_code.as_deref())
}

#[test]
fn given_departments_with_orphan_when_building_then_matches_expected_forest() {
    testing::init_test_setup();
    // Arrange
    let items = vec![
        rec("A", None),
        rec("B", Some("A")),
        rec("C", Some("B")),
        rec("D", Some("Z")),
    ];

    // Act
    let forest = build(&items);

    // Assert
    assert_eq!(codes(&forest), vec!["A", "D"]);
    assert_eq!(codes(&forest[0].children), vec!["B"]);
    assert_eq!(codes(&forest[0].children[0].children), vec!["C"]);
    assert!(forest[1].is_leaf());
}

#[test]
fn given_two_node_cycle_when_building_then_both_are_roots() {
    // Arrange
    let items = vec![rec("A", Some("B")), rec("B", Some("A"))];

    // Act
    let built = ForestBuilder::new().build_hierarchy(&items);

    // Assert
    assert_eq!(codes(&built.roots), vec!["A", "B"]);
    assert!(built.roots.iter().all(|n| n.is_leaf()));
    assert_eq!(built.diagnostics.cycles, vec!["A", "B"]);
}

#[test]
fn given_self_parent_when_building_then_node_is_root() {
    // Arrange
    let items = vec![rec("A", Some("A")), rec("B", Some("A"))];

    // Act
    let built = ForestBuilder::new().build_hierarchy(&items);

    // Assert
    assert_eq!(codes(&built.roots), vec!["A"]);
    assert_eq!(codes(&built.roots[0].children), vec!["B"]);
    assert_eq!(built.diagnostics.cycles, vec!["A"]);
}

#[test]
fn given_branch_hanging_off_cycle_when_building_then_branch_stays_attached() {
    // Arrange: X -> A, A <-> B
    let items = vec![rec("X", Some("A")), rec("A", Some("B")), rec("B", Some("A"))];

    // Act
    let built = ForestBuilder::new().build_hierarchy(&items);

    // Assert
    assert_eq!(codes(&built.roots), vec!["A", "B"]);
    assert_eq!(codes(&built.roots[0].children), vec!["X"]);
    assert_eq!(count_nodes(&built.roots), 3);
}

#[test]
fn given_duplicate_codes_when_building_then_first_occurrence_wins() {
    // Arrange
    let mut second = rec("A", None);
    second.name = "second".into();
    let items = vec![rec("A", None), second, rec("B", Some("A"))];

    // Act
    let built = ForestBuilder::new().build_hierarchy(&items);

    // Assert
    assert_eq!(count_nodes(&built.roots), 2);
    assert_eq!(built.roots[0].entity.name, "a");
    assert_eq!(built.diagnostics.duplicates, vec!["A"]);
}

#[test]
fn given_orphan_when_building_then_reported_and_kept() {
    // Arrange
    let items = vec![rec("A", Some("MISSING"))];

    // Act
    let built = ForestBuilder::new().build_hierarchy(&items);

    // Assert
    assert_eq!(codes(&built.roots), vec!["A"]);
    assert_eq!(built.diagnostics.orphans, vec!["A"]);
    assert!(built.diagnostics.cycles.is_empty());
}

#[test]
fn given_children_listed_before_parent_when_building_then_input_order_is_kept() {
    // Arrange
    let items = vec![
        rec("C2", Some("P")),
        rec("R2", None),
        rec("C1", Some("P")),
        rec("P", None),
    ];

    // Act
    let forest = build(&items);

    // Assert
    assert_eq!(codes(&forest), vec!["R2", "P"]);
    assert_eq!(codes(&forest[1].children), vec!["C2", "C1"]);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(17)]
#[case(500)]
fn given_unique_codes_when_building_then_node_count_matches(#[case] n: usize) {
    // Arrange: every item hangs off item i / 3
    let items: Vec<Record> = (0..n)
        .map(|i| {
            let parent = (i > 0).then(|| format!("N{}", i / 3));
            let r = Record::new(format!("N{i}"), "");
            match parent {
                Some(p) => r.with_parent(p),
                None => r,
            }
        })
        .collect();

    // Act
    let forest = build(&items);

    // Assert
    assert_eq!(count_nodes(&forest), n);
    for item in items.iter().skip(1) {
        let parent_code = item.parent_code.as_deref().unwrap();
        let parent = find(&forest, |r| r.code == parent_code).unwrap();
        assert!(parent.children.iter().any(|c| c.entity.code == item.code));
    }
}

#[test]
fn given_long_chain_when_building_then_completes() {
    // Arrange
    let n = 2_000;
    let items = chain(n);

    // Act
    let forest = build(&items);

    // Assert
    assert_eq!(forest.len(), 1);
    assert_eq!(depth(&forest), n);
    assert_eq!(count_nodes(&forest), n);
}

#[test]
fn given_forest_when_walking_then_preorder_with_depth() {
    // Arrange
    let items = vec![
        rec("A", None),
        rec("B", Some("A")),
        rec("C", Some("B")),
        rec("D", None),
    ];
    let forest = build(&items);

    // Act
    let visited: Vec<(usize, &str)> = walk(&forest)
        .map(|(d, n)| (d, n.entity.code.as_str()))
        .collect();

    // Assert
    assert_eq!(visited, vec![(0, "A"), (1, "B"), (2, "C"), (0, "D")]);
}

#[test]
fn given_nested_node_when_asking_ancestors_then_returns_root_path() {
    // Arrange
    let items = vec![rec("A", None), rec("B", Some("A")), rec("C", Some("B"))];
    let forest = build(&items);

    // Act & Assert
    assert_eq!(
        ancestors_of(&forest, |r| r.code.as_str(), "C"),
        Some(vec!["A".to_string(), "B".to_string()])
    );
    assert_eq!(ancestors_of(&forest, |r| r.code.as_str(), "A"), Some(vec![]));
    assert_eq!(ancestors_of(&forest, |r| r.code.as_str(), "Z"), None);
}

#[test]
fn given_input_when_building_then_input_is_untouched() {
    // Arrange
    let items = vec![rec("A", None), rec("B", Some("A"))];
    let before = items.clone();

    // Act
    let mut forest = build(&items);
    forest[0].entity.name = "changed".into();

    // Assert
    assert_eq!(items, before);
}

fn chain(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let r = Record::new(format!("N{i}"), "");
            if i == 0 {
                r
            } else {
                r.with_parent(format!("N{}", i - 1))
            }
        })
        .collect()
}

#[test]
fn given_very_deep_chain_when_filtering_and_dropping_then_no_stack_overflow() {
    // Arrange
    let n = 200_000;
    let items = chain(n);
    let forest = build(&items);
    let deepest = format!("N{}", n - 1);

    // Act
    let filtered = filter_forest(&forest, |r| r.code == deepest);

    // Assert
    assert_eq!(count_nodes(&filtered), n);
    assert_eq!(depth(&filtered), n);
    drop(filtered);
    drop(forest);
}

#[test]
fn given_deep_subtree_when_counting_then_subtree_len_includes_root() {
    let forest = build(&chain(50));
    assert_eq!(forest[0].subtree_len(), 50);
    assert_eq!(forest[0].children[0].subtree_len(), 49);
}
