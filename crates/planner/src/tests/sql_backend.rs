use super::intersects_box;
use crate::sql::{NamespaceBindings, QualifiedName, SqlCompiler, SqlQueryRenderer, SqlSchema, dialect::DialectKind};
use model::{
    error::FilterError,
    filter::{Comparison, ComparisonOperator, Logical, LogicalOperator, PredicateTree},
    query::CompositeQuery,
};

const EBRIM_V3: &str = "urn:oasis:names:tc:ebxml-regrep:xsd:rim:3.0";

fn bindings() -> NamespaceBindings {
    NamespaceBindings::default()
        .with_standard_name(EBRIM_V3, "Ebrim v3.0")
        .with_prefix("rim", EBRIM_V3)
        .with_variable("e1", QualifiedName::new(EBRIM_V3, "ExtrinsicObject"))
}

fn compile(tree: impl Into<PredicateTree>) -> Result<CompositeQuery, FilterError> {
    SqlCompiler::sql(bindings()).compile(&tree.into())
}

fn clause(alias: &str, attribute: &str, op: &str, literal: &str) -> String {
    format!(
        "{alias}.path = 'Ebrim v3.0:ExtrinsicObject:{attribute}' AND {alias}.value {op} '{literal}' AND {alias}.form=\"identifier\""
    )
}

#[test]
fn test_conjunction_shares_one_select() {
    let tree = Logical::and()
        .comparison(Comparison::equal("$e1/@mimeType", "application/octet-stream"))
        .comparison(Comparison::equal("$e1/@home", "http://demo.example/csw"))
        .comparison(Comparison::equal("$e1/@minorVersion", "0"))
        .comparison(Comparison::equal("$e1/@majorVersion", "1"));

    let query = compile(tree).unwrap();
    let expected = format!(
        "SELECT distinct \"identifier\" FROM \"Records\", \"TextValues\" v1, \"TextValues\" v2, \"TextValues\" v3, \"TextValues\" v4 WHERE ({} AND {} AND {} AND {})",
        clause("v1", "mimeType", "=", "application/octet-stream"),
        clause("v2", "home", "=", "http://demo.example/csw"),
        clause("v3", "minorVersion", "=", "0"),
        clause("v4", "majorVersion", "=", "1"),
    );
    assert_eq!(query.text, expected);
    assert!(query.sub_queries.is_empty());
}

#[test]
fn test_disjunction_is_a_union() {
    let tree = Logical::or()
        .comparison(Comparison::equal("rim:ExtrinsicObject/@mimeType", "text/xml"))
        .comparison(Comparison::equal("rim:ExtrinsicObject/@home", "local"));

    let query = compile(tree).unwrap();
    assert_eq!(query.text.matches("UNION").count(), 1);

    let branches: Vec<&str> = query.text.split(" UNION ").collect();
    assert_eq!(branches.len(), 2);
    for branch in branches {
        assert!(branch.starts_with("(SELECT distinct"));
        assert!(branch.contains("\"TextValues\" v1 WHERE v1.path"));
        assert!(!branch.contains("v2"));
    }
}

#[test]
fn test_negation_inverts_leaf_symbols() {
    let query = compile(Logical::not_comparison(Comparison::equal(
        "rim:ExtrinsicObject/@mimeType",
        "text/xml",
    )))
    .unwrap();
    assert!(query.text.contains(&clause("v1", "mimeType", "!=", "text/xml")));
    assert_eq!(query.combinator, LogicalOperator::And);
}

#[test]
fn test_negated_conjunction_becomes_union_of_inversions() {
    let tree = Logical::not_logical(
        Logical::and()
            .comparison(Comparison::equal("$e1/@home", "a"))
            .comparison(Comparison::like("$e1/@mimeType", "text*")),
    );

    let query = compile(tree).unwrap();
    assert_eq!(query.combinator, LogicalOperator::Or);
    assert!(query.text.contains(&clause("v1", "home", "!=", "a")));
    assert!(query.text.contains(&clause("v1", "mimeType", "NOT LIKE", "text%")));
    assert_eq!(query.text.matches("UNION").count(), 1);
}

#[test]
fn test_union_under_conjunction_is_demoted() {
    let tree = Logical::and()
        .comparison(Comparison::equal("$e1/@home", "a"))
        .logical(
            Logical::or()
                .comparison(Comparison::equal("$e1/@mimeType", "text/xml"))
                .comparison(Comparison::equal("$e1/@mimeType", "text/plain")),
        );

    let query = compile(tree).unwrap();
    assert!(!query.text.contains("UNION"));
    assert_eq!(query.sub_queries.len(), 1);
    assert_eq!(query.sub_queries[0].combinator, LogicalOperator::Or);
    assert!(query.sub_queries[0].text.contains(" UNION "));
}

#[test]
fn test_date_ranges_and_between() {
    let tree = Logical::and()
        .comparison(Comparison::new(
            ComparisonOperator::GreaterOrEqual,
            "$e1/@lastModified",
            "2007-06-02",
        ))
        .comparison(Comparison::between("$e1/@creationDate", "2007-01-01", "2008-01-01"));

    let query = compile(tree).unwrap();
    assert!(query.text.contains("v1.value >= '2007-06-02'"));
    assert!(query.text.contains("v2.value >= '2007-01-01' AND v2.value <= '2008-01-01'"));

    let not_date = Comparison::new(ComparisonOperator::LessThan, "$e1/@minorVersion", "3");
    assert!(matches!(
        compile(not_date),
        Err(FilterError::UnsupportedComparison { .. })
    ));
    assert!(matches!(
        compile(Comparison::new(ComparisonOperator::LessThan, "$e1/@lastModified", "soon")),
        Err(FilterError::UnparsableDate(_))
    ));
}

#[test]
fn test_literals_are_quoted() {
    let query = compile(Comparison::equal("$e1/@home", "O'Neil")).unwrap();
    assert!(query.text.contains("v1.value = 'O''Neil'"));
}

#[test]
fn test_spatial_sibling_travels_in_chain() {
    let tree = Logical::and()
        .comparison(Comparison::equal("$e1/@home", "a"))
        .spatial(intersects_box());

    let query = compile(tree).unwrap();
    assert!(query.text.starts_with("SELECT distinct"));
    assert_eq!(query.predicate_chain.unwrap().len(), 1);
}

#[test]
fn test_schema_and_dialect() {
    let renderer = SqlQueryRenderer::new(bindings())
        .with_schema(SqlSchema {
            records_table: "records".to_string(),
            values_table: "text_values".to_string(),
            identifier_column: "id".to_string(),
        })
        .with_dialect(DialectKind::MySql);

    let query = SqlCompiler::new(renderer)
        .compile(&Comparison::is_null("$e1/@home").into())
        .unwrap();
    assert_eq!(
        query.text,
        "SELECT distinct `id` FROM `records`, `text_values` v1 WHERE v1.path = 'Ebrim v3.0:ExtrinsicObject:home' AND v1.value IS NULL AND v1.form=`id`"
    );
}

#[test]
fn test_unbound_variable_is_malformed() {
    assert!(matches!(
        compile(Comparison::equal("$e9/@home", "a")),
        Err(FilterError::MalformedFilter { .. })
    ));
}
