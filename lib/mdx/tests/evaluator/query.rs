use crate::test_utils::{render, TestMetadata};
use rdf_olap_mdx::parse_tree::{
    IdentifierNode, ParseTreeNode, SelectNode, Syntax, WithMemberNode, WithSetNode,
};
use rdf_olap_mdx::{EvaluatedValue, EvaluationContext, MdxEvaluator};
use rdf_olap_model::metadata::{Aggregator, MetadataObject};
use rdf_olap_model::{AxisOrdinal, OlapError, OlapResult};

fn id(unique_name: &str) -> ParseTreeNode {
    ParseTreeNode::parse_identifier(unique_name)
}

fn property(name: &str, arg: ParseTreeNode) -> ParseTreeNode {
    ParseTreeNode::call(name, Syntax::Property, [arg])
}

fn years() -> ParseTreeNode {
    ParseTreeNode::set([id("[Time].[2020]"), id("[Time].[2021]")])
}

#[test]
fn test_crossjoin_iterates_left_set_in_outer_loop() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let select = SelectNode::from_cube("Sales").with_axis(
        AxisOrdinal::COLUMNS,
        ParseTreeNode::function("Crossjoin", [years(), property("Members", id("[Geo]"))]),
    );

    let query = MdxEvaluator::new(&metadata).evaluate_query(&select)?;
    assert_eq!(query.cube.name(), "Sales");
    assert_eq!(query.axes.len(), 1);
    insta::assert_snapshot!(render(&query.axes[0]), @r"
    ([Time].[2020], [Geo].[AT])
    ([Time].[2020], [Geo].[DE])
    ([Time].[2021], [Geo].[AT])
    ([Time].[2021], [Geo].[DE])
    ");
    assert_eq!(query.axes[0].hierarchies(), ["[Time]", "[Geo]"]);

    Ok(())
}

#[test]
fn test_crossjoin_concatenates_tuples() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let pairs = ParseTreeNode::function(
        "Crossjoin",
        [
            ParseTreeNode::set([id("[Time].[2020]")]),
            ParseTreeNode::set([id("[Geo].[AT]")]),
        ],
    );
    let select = SelectNode::from_cube("Sales").with_axis(
        AxisOrdinal::COLUMNS,
        ParseTreeNode::function("Crossjoin", [pairs, property("Members", id("[Measures]"))]),
    );

    let query = MdxEvaluator::new(&metadata).evaluate_query(&select)?;
    insta::assert_snapshot!(render(&query.axes[0]), @r"
    ([Time].[2020], [Geo].[AT], [Measures].[Amount])
    ([Time].[2020], [Geo].[AT], [Measures].[Count])
    ");
    assert_eq!(query.axes[0].dimensionality(), 2);

    Ok(())
}

#[test]
fn test_set_of_tuples_keeps_tuples_intact() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let select = SelectNode::from_cube("Sales").with_axis(
        AxisOrdinal::COLUMNS,
        ParseTreeNode::set([
            ParseTreeNode::tuple([id("[Time].[2020]"), id("[Geo].[AT]")]),
            ParseTreeNode::tuple([id("[Time].[2021]"), id("[Geo].[DE]")]),
        ]),
    );

    let query = MdxEvaluator::new(&metadata).evaluate_query(&select)?;
    insta::assert_snapshot!(render(&query.axes[0]), @r"
    ([Time].[2020], [Geo].[AT])
    ([Time].[2021], [Geo].[DE])
    ");
    assert_eq!(query.axes[0].positions().len(), 2);
    assert_eq!(query.axes[0].dimensionality(), 2);

    Ok(())
}

#[test]
fn test_members_of_level_and_hierarchy() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let select = SelectNode::from_cube("Sales")
        .with_axis(AxisOrdinal::COLUMNS, property("Members", id("[Time].[Year]")))
        .with_axis(
            AxisOrdinal::ROWS,
            ParseTreeNode::function("Hierarchize", [property("Members", id("[Time]"))]),
        );

    let query = MdxEvaluator::new(&metadata).evaluate_query(&select)?;
    insta::assert_snapshot!(render(&query.axes[0]), @r"
    ([Time].[2020])
    ([Time].[2021])
    ");
    insta::assert_snapshot!(render(&query.axes[1]), @r"
    ([Time].[2020])
    ([Time].[2021])
    ([Time].[2020].[Q1])
    ([Time].[2021].[Q1])
    ");

    Ok(())
}

#[test]
fn test_axes_are_ordered_by_ordinal() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let select = SelectNode::from_cube("Sales")
        .with_axis(AxisOrdinal::ROWS, id("[Geo].[AT]"))
        .with_axis(AxisOrdinal::COLUMNS, years());

    let query = MdxEvaluator::new(&metadata).evaluate_query(&select)?;
    assert_eq!(query.axes[0].ordinal(), AxisOrdinal::COLUMNS);
    assert_eq!(query.axes[0].position_count(), 2);
    assert_eq!(query.axes[1].ordinal(), AxisOrdinal::ROWS);
    assert_eq!(query.axes[1].position_count(), 1);

    Ok(())
}

#[test]
fn test_filter_keeps_order_and_scopes_current_member() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let year = ParseTreeNode::call(
        "Cast",
        Syntax::Cast,
        [
            property("Name", property("CurrentMember", id("[Time]"))),
            ParseTreeNode::symbol("NUMERIC"),
        ],
    );
    let predicate = ParseTreeNode::infix(">=", year, ParseTreeNode::numeric(2020_i64));
    let select = SelectNode::from_cube("Sales").with_axis(
        AxisOrdinal::COLUMNS,
        ParseTreeNode::function("Filter", [property("Members", id("[Time].[Year]")), predicate]),
    );

    let query = MdxEvaluator::new(&metadata).evaluate_query(&select)?;
    insta::assert_snapshot!(render(&query.axes[0]), @r"
    ([Time].[2020])
    ([Time].[2021])
    ");

    Ok(())
}

#[test]
fn test_filter_drops_elements_without_true_predicate() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let predicate = ParseTreeNode::infix(
        "AND",
        ParseTreeNode::infix(
            ">",
            property("CurrentMember", id("[Time]")),
            ParseTreeNode::numeric(2020_i64),
        ),
        ParseTreeNode::infix(
            "<",
            property("CurrentMember", id("[Time]")),
            ParseTreeNode::numeric(3000_i64),
        ),
    );
    let select = SelectNode::from_cube("Sales").with_axis(
        AxisOrdinal::COLUMNS,
        ParseTreeNode::function("Filter", [years(), predicate]),
    );

    let query = MdxEvaluator::new(&metadata).evaluate_query(&select)?;
    insta::assert_snapshot!(render(&query.axes[0]), @"([Time].[2021])");

    Ok(())
}

#[test]
fn test_current_member_outside_of_filter_is_not_a_member() {
    let metadata = TestMetadata::sales();
    let select = SelectNode::from_cube("Sales")
        .with_axis(AxisOrdinal::COLUMNS, property("CurrentMember", id("[Time]")));

    let result = MdxEvaluator::new(&metadata).evaluate_query(&select);
    assert!(matches!(result, Err(OlapError::MalformedTuple(_))));
}

#[test]
fn test_cast_to_other_types_is_unsupported() {
    let metadata = TestMetadata::sales();
    let evaluator = MdxEvaluator::new(&metadata);
    let context = EvaluationContext::new(metadata.cube());
    let cast = ParseTreeNode::call(
        "Cast",
        Syntax::Cast,
        [ParseTreeNode::string("1"), ParseTreeNode::symbol("STRING")],
    );

    let result = evaluator.evaluate(&cast, &context);
    assert!(matches!(result, Err(OlapError::UnsupportedCast(t)) if t == "STRING"));
}

#[test]
fn test_cast_of_non_numeric_value_fails() {
    let metadata = TestMetadata::sales();
    let evaluator = MdxEvaluator::new(&metadata);
    let context = EvaluationContext::new(metadata.cube());
    let cast = ParseTreeNode::call(
        "Cast",
        Syntax::Cast,
        [ParseTreeNode::string("abc"), ParseTreeNode::symbol("NUMERIC")],
    );

    let result = evaluator.evaluate(&cast, &context);
    assert!(matches!(result, Err(OlapError::UnsupportedOperation(_))));
}

#[test]
fn test_arithmetic_on_non_numeric_operands_is_null() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let evaluator = MdxEvaluator::new(&metadata);
    let context = EvaluationContext::new(metadata.cube());

    let sum = ParseTreeNode::infix("+", id("[Time].[2020]"), ParseTreeNode::numeric(1_i64));
    assert_eq!(
        evaluator.evaluate(&sum, &context)?,
        EvaluatedValue::Number(2021.0)
    );

    let invalid = ParseTreeNode::infix("*", id("[Geo].[AT]"), ParseTreeNode::numeric(2_i64));
    assert_eq!(evaluator.evaluate(&invalid, &context)?, EvaluatedValue::Null);

    let negated = ParseTreeNode::call("-", Syntax::Prefix, [ParseTreeNode::string("x")]);
    assert_eq!(evaluator.evaluate(&negated, &context)?, EvaluatedValue::Null);

    Ok(())
}

#[test]
fn test_comparison_requires_numbers() {
    let metadata = TestMetadata::sales();
    let evaluator = MdxEvaluator::new(&metadata);
    let context = EvaluationContext::new(metadata.cube());
    let comparison = ParseTreeNode::infix("<", id("[Geo].[AT]"), ParseTreeNode::numeric(1_i64));

    let result = evaluator.evaluate(&comparison, &context);
    assert!(matches!(result, Err(OlapError::UnsupportedOperation(_))));
}

#[test]
fn test_name_of_member() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let evaluator = MdxEvaluator::new(&metadata);
    let context = EvaluationContext::new(metadata.cube());

    let name = evaluator.evaluate(&property("Name", id("[Geo].[DE]")), &context)?;
    assert_eq!(name, EvaluatedValue::String("DE".to_owned()));

    let result = evaluator.evaluate(&property("Name", ParseTreeNode::numeric(1_i64)), &context);
    assert!(matches!(result, Err(OlapError::UnsupportedOperation(_))));

    Ok(())
}

#[test]
fn test_calculated_members_follow_the_measures() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let average = WithMemberNode::new(
        IdentifierNode::parse("[Measures].[Average]"),
        ParseTreeNode::infix("/", id("[Measures].[Amount]"), id("[Measures].[Count]")),
    );
    let doubled = WithMemberNode::new(
        IdentifierNode::parse("[Measures].[Doubled]"),
        ParseTreeNode::infix("+", id("[Measures].[Amount]"), id("[Measures].[Amount]")),
    );
    let select = SelectNode::from_cube("Sales")
        .with_definition(ParseTreeNode::WithMember(average))
        .with_definition(ParseTreeNode::WithMember(doubled))
        .with_axis(
            AxisOrdinal::COLUMNS,
            ParseTreeNode::set([id("[Measures].[Average]"), id("[Measures].[Doubled]")]),
        );

    let query = MdxEvaluator::new(&metadata).evaluate_query(&select)?;
    let ordinals = query
        .calculated_members
        .iter()
        .map(|m| m.ordinal)
        .collect::<Vec<_>>();
    assert_eq!(ordinals, [2, 3]);

    let average = &query.calculated_members[0];
    assert!(average.is_calculated());
    assert_eq!(average.aggregator(), Some(Aggregator::Calculated));
    let formula = average
        .measure
        .as_ref()
        .and_then(|m| m.formula.as_ref())
        .map(ToString::to_string);
    assert_eq!(
        formula.as_deref(),
        Some("[Measures].[Amount] / [Measures].[Count]")
    );

    insta::assert_snapshot!(render(&query.axes[0]), @r"
    ([Measures].[Average])
    ([Measures].[Doubled])
    ");
    assert_eq!(query.axes[0].measures().len(), 2);

    Ok(())
}

#[test]
fn test_calculated_member_must_be_binary_arithmetic() {
    let metadata = TestMetadata::sales();
    let member = WithMemberNode::new(
        IdentifierNode::parse("[Measures].[Constant]"),
        ParseTreeNode::numeric(42_i64),
    );
    let select = SelectNode::from_cube("Sales")
        .with_definition(ParseTreeNode::WithMember(member))
        .with_axis(AxisOrdinal::COLUMNS, years());

    let result = MdxEvaluator::new(&metadata).evaluate_query(&select);
    assert!(matches!(result, Err(OlapError::UnsupportedOperation(_))));
}

#[test]
fn test_named_set() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let set = WithSetNode::new(IdentifierNode::parse("[Years]"), years());
    let select = SelectNode::from_cube("Sales")
        .with_definition(ParseTreeNode::WithSet(set))
        .with_axis(AxisOrdinal::COLUMNS, id("[Years]"))
        .with_filter(ParseTreeNode::tuple([id("[Geo].[AT]"), id("[Measures].[Count]")]));

    let query = MdxEvaluator::new(&metadata).evaluate_query(&select)?;
    insta::assert_snapshot!(render(&query.axes[0]), @r"
    ([Time].[2020])
    ([Time].[2021])
    ");

    let filter = query.filter.as_ref().expect("filter axis");
    assert_eq!(filter.ordinal(), AxisOrdinal::Filter);
    insta::assert_snapshot!(render(filter), @"([Geo].[AT], [Measures].[Count])");

    Ok(())
}

#[test]
fn test_identifier_descends_through_member_children() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let evaluator = MdxEvaluator::new(&metadata);
    let context = EvaluationContext::new(metadata.cube());

    let quarter = evaluator.evaluate(&id("[Time].[2020].[Q1]"), &context)?;
    assert_eq!(
        quarter.as_member().map(|m| m.unique_name()),
        Some("[Time].[2020].[Q1]")
    );

    let unmatched_tail = evaluator.evaluate(&id("[Time].[2021].[Q4]"), &context)?;
    assert_eq!(
        unmatched_tail.as_member().map(|m| m.unique_name()),
        Some("[Time].[2021]")
    );

    Ok(())
}

#[test]
fn test_unmatched_segment_lists_each_level_once() {
    let metadata = TestMetadata::sales();
    let evaluator = MdxEvaluator::new(&metadata);
    let context = EvaluationContext::new(metadata.cube());

    let result = evaluator.evaluate(&id("[Nowhere]"), &context);
    assert!(matches!(result, Err(OlapError::UnresolvedIdentifier(_))));
    // Year, Quarter and Country. The measures level lists the measures instead.
    assert_eq!(metadata.member_requests(), 3);

    let quarter = evaluator.evaluate(&id("[Time].[Q1]"), &context);
    assert_eq!(
        quarter.ok().and_then(|q| q.as_member().map(|m| m.unique_name().to_owned())),
        Some("[Time].[2020].[Q1]".to_owned())
    );
}

#[test]
fn test_unresolved_identifier() {
    let metadata = TestMetadata::sales();
    let select =
        SelectNode::from_cube("Sales").with_axis(AxisOrdinal::COLUMNS, id("[Product].[Bike]"));

    let result = MdxEvaluator::new(&metadata).evaluate_query(&select);
    assert!(
        matches!(result, Err(OlapError::UnresolvedIdentifier(name)) if name == "[Product].[Bike]")
    );
}

#[test]
fn test_unknown_cube() {
    let metadata = TestMetadata::sales();
    let select = SelectNode::from_cube("Inventory").with_axis(AxisOrdinal::COLUMNS, years());

    let result = MdxEvaluator::new(&metadata).evaluate_query(&select);
    assert!(matches!(result, Err(OlapError::UnresolvedIdentifier(_))));
}

#[test]
fn test_more_than_two_axes_are_unsupported() {
    let metadata = TestMetadata::sales();
    let select = SelectNode::from_cube("Sales")
        .with_axis(AxisOrdinal::COLUMNS, years())
        .with_axis(AxisOrdinal::ROWS, id("[Geo].[AT]"))
        .with_axis(AxisOrdinal::Axis(2), id("[Measures].[Amount]"));

    let result = MdxEvaluator::new(&metadata).evaluate_query(&select);
    assert!(matches!(result, Err(OlapError::UnsupportedAxisCount(3))));
}

#[test]
fn test_range_operator_is_unsupported() {
    let metadata = TestMetadata::sales();
    let select = SelectNode::from_cube("Sales").with_axis(
        AxisOrdinal::COLUMNS,
        ParseTreeNode::infix(":", id("[Time].[2020]"), id("[Time].[2021]")),
    );

    let result = MdxEvaluator::new(&metadata).evaluate_query(&select);
    assert!(matches!(result, Err(OlapError::UnsupportedOperation(_))));
}

#[test]
fn test_scalar_axis_is_malformed() {
    let metadata = TestMetadata::sales();
    let select = SelectNode::from_cube("Sales").with_axis(
        AxisOrdinal::COLUMNS,
        ParseTreeNode::set([id("[Time].[2020]"), ParseTreeNode::string("2021")]),
    );

    let result = MdxEvaluator::new(&metadata).evaluate_query(&select);
    assert!(matches!(result, Err(OlapError::MalformedTuple(_))));
}
