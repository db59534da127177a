use super::{dwithin_point, intersects_box};
use crate::index::IndexCompiler;
use model::{
    error::FilterError,
    filter::{Comparison, ComparisonOperator, Logical, LogicalOperator, PredicateTree},
    query::{MATCH_ALL, SpatialFilter},
};
use tracing_test::traced_test;

fn compile(tree: impl Into<PredicateTree>) -> Result<model::query::CompositeQuery, FilterError> {
    IndexCompiler::index().compile(&tree.into())
}

#[test]
fn test_equal_leaf() {
    let query = compile(Comparison::equal("Title", "VM")).unwrap();
    assert_eq!(query.text, "Title:\"VM\"");
    assert_eq!(query.combinator, LogicalOperator::And);
    assert!(query.predicate_chain.is_none());
}

#[test]
fn test_not_equal_leaf() {
    let query = compile(Comparison::not_equal("Title", "VM")).unwrap();
    assert_eq!(query.text, "metafile:doc NOT Title:\"VM\"");
}

#[test]
fn test_leaf_rendering_is_idempotent() {
    let tree: PredicateTree = Comparison::like("apiso:Title", "*VM?").into();
    assert_eq!(compile(tree.clone()).unwrap(), compile(tree).unwrap());
}

#[test]
fn test_comparisons_are_parenthesized() {
    let and = Logical::and()
        .comparison(Comparison::equal("Title", "a"))
        .comparison(Comparison::equal("Subject", "b"));
    assert_eq!(compile(and).unwrap().text, "(Title:\"a\" AND Subject:\"b\")");

    let or = Logical::or()
        .comparison(Comparison::equal("Title", "a"))
        .comparison(Comparison::is_null("Subject"));
    assert_eq!(compile(or).unwrap().text, "(Title:\"a\" OR Subject:null)");
}

#[test]
fn test_like_with_spatial_sibling() {
    let tree = Logical::and()
        .comparison(Comparison::like("Title", "*VM*"))
        .spatial(intersects_box());

    let query = compile(tree).unwrap();
    assert_eq!(query.text, "(Title:(*VM*))");
    assert!(query.sub_queries.is_empty());

    let chain = query.predicate_chain.unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain.predicates()[0].operator.to_string(), "Intersects");
}

#[test]
#[traced_test]
fn test_mixed_group_is_demoted_under_or() {
    let tree = Logical::or()
        .comparison(Comparison::not_equal("Title", "VMAI"))
        .logical(
            Logical::and()
                .comparison(Comparison::like("Title", "LO?Li"))
                .spatial(dwithin_point(1000.0)),
        );

    let query = compile(tree).unwrap();
    assert_eq!(query.text, "(metafile:doc NOT Title:\"VMAI\")");
    assert_eq!(query.combinator, LogicalOperator::Or);
    assert!(query.predicate_chain.is_none());
    assert_eq!(query.sub_queries.len(), 1);

    let sub = &query.sub_queries[0];
    assert_eq!(sub.text, "(Title:(LO?Li))");
    assert_eq!(sub.combinator, LogicalOperator::And);
    let chain = sub.predicate_chain.as_ref().unwrap();
    assert_eq!(chain.len(), 1);
    assert!(chain.connectors().is_empty());
    match &chain.filters()[0] {
        SpatialFilter::Predicate(p) => {
            assert_eq!(p.operator.to_string(), "DWithin");
            assert_eq!(p.distance.map(|d| d.in_meters()), Some(1000.0));
        }
        other => panic!("expected a predicate, got {other:?}"),
    }

    assert!(logs_contain("Demoting AND group under OR to a subquery"));
}

#[test]
fn test_spatial_only_child_is_folded() {
    let tree = Logical::or()
        .comparison(Comparison::equal("Title", "a"))
        .logical(
            Logical::and()
                .spatial(intersects_box())
                .spatial(dwithin_point(10.0)),
        );

    let query = compile(tree).unwrap();
    assert_eq!(query.text, "(Title:\"a\")");
    assert!(query.sub_queries.is_empty());

    // The lone folded chain is adopted as the level's chain.
    let chain = query.predicate_chain.unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.connectors(), &[LogicalOperator::And]);
}

#[test]
fn test_spatial_negation_downgrades_combinator() {
    let query = compile(Logical::not_spatial(intersects_box())).unwrap();
    assert_eq!(query.combinator, LogicalOperator::And);
    assert!(query.predicate_chain.unwrap().is_negation());
    // The root still needs a term query to run against.
    assert_eq!(query.text, MATCH_ALL);
}

#[test]
fn test_comparison_negation_keeps_text() {
    let query = compile(Logical::not_comparison(Comparison::equal("Title", "VM"))).unwrap();
    assert_eq!(query.text, "Title:\"VM\"");
    assert_eq!(query.combinator, LogicalOperator::Not);
}

#[test]
fn test_text_negation_is_demoted_under_and() {
    let tree = Logical::and()
        .comparison(Comparison::equal("Title", "a"))
        .logical(Logical::not_comparison(Comparison::equal("Title", "b")));

    let query = compile(tree).unwrap();
    assert_eq!(query.text, "(Title:\"a\")");
    assert_eq!(query.sub_queries.len(), 1);
    assert_eq!(query.sub_queries[0].combinator, LogicalOperator::Not);
}

#[test]
fn test_negated_spatial_conjunction_wraps_whole_chain() {
    let tree = Logical::not_logical(
        Logical::and()
            .spatial(intersects_box())
            .spatial(dwithin_point(10.0)),
    );

    let query = compile(tree).unwrap();
    assert_eq!(query.text, MATCH_ALL);
    assert_eq!(query.combinator, LogicalOperator::And);
    assert!(query.sub_queries.is_empty());

    let chain = query.predicate_chain.unwrap();
    assert!(chain.is_negation());
    assert_eq!(chain.predicates().len(), 2);
}

#[test]
fn test_negated_mixed_disjunction_is_demoted() {
    let tree = Logical::not_logical(
        Logical::or()
            .comparison(Comparison::equal("Title", "a"))
            .spatial(intersects_box()),
    );

    let query = compile(tree).unwrap();
    assert_eq!(query.text, "");
    assert_eq!(query.combinator, LogicalOperator::Not);
    assert!(query.predicate_chain.is_none());
    assert_eq!(query.sub_queries.len(), 1);

    let sub = &query.sub_queries[0];
    assert_eq!(sub.text, "(Title:\"a\")");
    assert_eq!(sub.combinator, LogicalOperator::Or);
    assert_eq!(sub.predicate_chain.as_ref().map(|c| c.len()), Some(1));
}

#[test]
fn test_negated_text_disjunction_stays_inline() {
    let tree = Logical::not_logical(
        Logical::or()
            .comparison(Comparison::equal("Title", "a"))
            .comparison(Comparison::equal("Title", "b")),
    );

    let query = compile(tree).unwrap();
    assert_eq!(query.text, "(Title:\"a\" OR Title:\"b\")");
    assert_eq!(query.combinator, LogicalOperator::Not);
    assert!(query.predicate_chain.is_none());
    assert!(query.sub_queries.is_empty());
}

#[test]
fn test_double_negation_is_demoted() {
    let tree = Logical::not_logical(Logical::not_comparison(Comparison::equal("Title", "a")));

    let query = compile(tree).unwrap();
    assert_eq!(query.text, "");
    assert_eq!(query.combinator, LogicalOperator::Not);
    assert_eq!(query.sub_queries.len(), 1);
    assert_eq!(query.sub_queries[0].text, "Title:\"a\"");
    assert_eq!(query.sub_queries[0].combinator, LogicalOperator::Not);
}

#[test]
fn test_date_range_brackets() {
    let inclusive = Comparison::new(ComparisonOperator::GreaterOrEqual, "Modified", "2007-01-01");
    let strict = Comparison::new(ComparisonOperator::GreaterThan, "Modified", "2007-01-01");

    assert_eq!(compile(inclusive).unwrap().text, "Modified:[20070101 30000101]");
    assert_eq!(compile(strict).unwrap().text, "Modified:{20070101 30000101}");
}

#[test]
fn test_empty_logical_yields_empty_text() {
    let query = compile(Logical::or()).unwrap();
    assert_eq!(query.text, "");
}

#[test]
fn test_errors_surface() {
    assert!(matches!(
        compile(PredicateTree::Identifiers(vec!["urn:1".to_string()])),
        Err(FilterError::UnsupportedFeature(_))
    ));

    let missing = Comparison {
        operator: ComparisonOperator::Equal,
        property: None,
        literal: Some("VM".to_string()),
    };
    assert_eq!(
        compile(Logical::and().comparison(missing)).unwrap_err(),
        FilterError::malformed("PropertyIsEqualTo", "missing propertyName")
    );

    let mut no_units = dwithin_point(5.0);
    no_units.units = None;
    assert!(matches!(
        compile(Logical::and().spatial(no_units)),
        Err(FilterError::MalformedFilter { .. })
    ));

    let two = Logical::new(LogicalOperator::Not)
        .comparison(Comparison::equal("Title", "a"))
        .comparison(Comparison::equal("Title", "b"));
    assert!(matches!(compile(two), Err(FilterError::MalformedFilter { .. })));
}

#[test]
fn test_compiles_json_tree() {
    let json = r#"{
        "logical": {
            "operator": "Or",
            "comparisons": [
                { "operator": "equal", "property": "dc:subject", "literal": "elevation" },
                { "operator": { "between": { "lower": "2006-01-01", "upper": "2007-12-31Z" } },
                  "property": "apiso:CreationDate" }
            ]
        }
    }"#;

    let tree: PredicateTree = serde_json::from_str(json).unwrap();
    assert_eq!(
        compile(tree).unwrap().text,
        "(subject:\"elevation\" OR CreationDate:[20060101 30000101]CreationDate:[00000101 20071231])"
    );
}
