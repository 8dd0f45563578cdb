use crate::test_utils::{connection, id, set};
use rdf_olap_mdx::parse_tree::{IdentifierNode, ParseTreeNode, SelectNode, Syntax, WithMemberNode};
use rdf_olap_model::{AxisOrdinal, OlapError, OlapResult};

fn years_by_countries() -> SelectNode {
    SelectNode::from_cube("Sales")
        .with_axis(AxisOrdinal::COLUMNS, set(&["[Time].[2020]", "[Time].[2021]"]))
        .with_axis(AxisOrdinal::ROWS, set(&["[Geo].[AT]", "[Geo].[DE]"]))
}

#[test]
fn test_cells_are_rolled_up_to_the_axis_levels() -> OlapResult<()> {
    let connection = connection();
    let cell_set = connection.execute(&years_by_countries())?;

    insta::assert_snapshot!(cell_set.plan(), @r"
    Rollup: hierarchies=[[Time], [Geo]] levels=[[Time].[Year], [Geo].[Country]]
      Slice: dimensions=[]
        Dice: hierarchies=[] tuples=[]
          Projection: measures=[[Measures].[Amount]]
            BaseCube: Sales
    ");
    assert_eq!(cell_set.cell_count(), 4);
    assert_eq!(cell_set.cell(&[0, 0])?.value(), Some("15.5"));
    assert_eq!(cell_set.cell(&[0, 1])?.value(), Some("7"));
    assert_eq!(cell_set.cell(&[1, 1])?.double_value(), Some(20.0));

    Ok(())
}

#[test]
fn test_cells_without_facts_are_empty() -> OlapResult<()> {
    let connection = connection();
    let cell_set = connection.execute(&years_by_countries())?;

    let cell = cell_set.cell(&[1, 0])?;
    assert!(cell.is_empty());
    assert_eq!(cell.value(), None);
    assert_eq!(cell.formatted_value(), "");
    assert_eq!(cell.double_value(), None);

    Ok(())
}

#[test]
fn test_first_axis_varies_fastest() -> OlapResult<()> {
    let connection = connection();
    let cell_set = connection.execute(&years_by_countries())?;

    assert_eq!(cell_set.ordinal_to_coordinates(1)?, [1, 0]);
    assert_eq!(cell_set.ordinal_to_coordinates(2)?, [0, 1]);
    assert_eq!(cell_set.coordinates_to_ordinal(&[1, 1])?, 3);

    let cell = cell_set.cell_by_ordinal(2)?;
    assert_eq!(cell.coordinates(), [0, 1]);
    assert_eq!(cell.value(), Some("7"));

    let positions = [
        &cell_set.axes()[0].positions()[1],
        &cell_set.axes()[1].positions()[1],
    ];
    let cell = cell_set.cell_by_positions(&positions)?;
    assert_eq!(cell.ordinal(), 3);
    assert_eq!(cell.value(), Some("20"));

    Ok(())
}

#[test]
fn test_cells_outside_the_axes_are_rejected() -> OlapResult<()> {
    let connection = connection();
    let cell_set = connection.execute(&years_by_countries())?;

    assert!(matches!(
        cell_set.cell_by_ordinal(4),
        Err(OlapError::IndexOutOfBounds { index: 4, size: 4 })
    ));
    assert!(matches!(
        cell_set.cell(&[2, 0]),
        Err(OlapError::IndexOutOfBounds { .. })
    ));

    Ok(())
}

#[test]
fn test_measure_of_cell_is_taken_from_positions() -> OlapResult<()> {
    let connection = connection();
    let select = SelectNode::from_cube("Sales")
        .with_axis(AxisOrdinal::COLUMNS, set(&["[Time].[2020]", "[Time].[2021]"]))
        .with_axis(
            AxisOrdinal::ROWS,
            set(&["[Measures].[Amount]", "[Measures].[Price]"]),
        );
    let cell_set = connection.execute(&select)?;

    assert_eq!(cell_set.measures().len(), 2);
    assert_eq!(cell_set.cell(&[0, 0])?.formatted_value(), "22.5");
    assert_eq!(cell_set.cell(&[1, 0])?.formatted_value(), "20");
    assert_eq!(cell_set.cell(&[0, 1])?.formatted_value(), "2.21");
    assert!(cell_set.cell(&[1, 1])?.is_empty());

    Ok(())
}

#[test]
fn test_measure_of_filter_axis_is_used_without_measure_on_positions() -> OlapResult<()> {
    let connection = connection();
    let select = SelectNode::from_cube("Sales")
        .with_axis(AxisOrdinal::COLUMNS, set(&["[Geo].[AT]"]))
        .with_filter(id("[Measures].[Price]"));
    let cell_set = connection.execute(&select)?;

    assert_eq!(cell_set.cell(&[0])?.value(), Some("1.75"));

    Ok(())
}

#[test]
fn test_two_measures_in_one_cell_are_rejected() -> OlapResult<()> {
    let connection = connection();
    let select = SelectNode::from_cube("Sales")
        .with_axis(AxisOrdinal::COLUMNS, set(&["[Measures].[Amount]"]))
        .with_axis(AxisOrdinal::ROWS, set(&["[Measures].[Price]"]));
    let cell_set = connection.execute(&select)?;

    assert!(matches!(
        cell_set.cell(&[0, 0]),
        Err(OlapError::MultipleMeasuresUnsupported(_))
    ));

    Ok(())
}

#[test]
fn test_filter_axis_dices_the_facts() -> OlapResult<()> {
    let connection = connection();
    let select = SelectNode::from_cube("Sales")
        .with_axis(AxisOrdinal::COLUMNS, set(&["[Time].[2020]", "[Time].[2021]"]))
        .with_filter(ParseTreeNode::tuple([
            id("[Geo].[AT]"),
            id("[Measures].[Amount]"),
        ]));
    let cell_set = connection.execute(&select)?;

    insta::assert_snapshot!(cell_set.plan(), @r"
    Rollup: hierarchies=[[Time]] levels=[[Time].[Year]]
      Slice: dimensions=[[Geo]]
        Dice: hierarchies=[[Geo]] tuples=[([Geo].[AT])]
          Projection: measures=[[Measures].[Amount]]
            BaseCube: Sales
    ");
    assert_eq!(cell_set.cell(&[0])?.value(), Some("15.5"));
    assert!(cell_set.cell(&[1])?.is_empty());

    Ok(())
}

#[test]
fn test_filter_set_of_tuples_dices_by_each_tuple() -> OlapResult<()> {
    let connection = connection();
    let select = SelectNode::from_cube("Sales")
        .with_axis(AxisOrdinal::COLUMNS, set(&["[Time].[2020]", "[Time].[2021]"]))
        .with_filter(ParseTreeNode::set([
            ParseTreeNode::tuple([id("[Geo].[AT]"), id("[Time].[2020]")]),
            ParseTreeNode::tuple([id("[Geo].[DE]"), id("[Time].[2021]")]),
        ]));
    let cell_set = connection.execute(&select)?;

    insta::assert_snapshot!(cell_set.plan(), @r"
    Rollup: hierarchies=[[Time]] levels=[[Time].[Year]]
      Slice: dimensions=[[Geo]]
        Dice: hierarchies=[[Geo], [Time]] tuples=[([Geo].[AT], [Time].[2020]), ([Geo].[DE], [Time].[2021])]
          Projection: measures=[[Measures].[Amount]]
            BaseCube: Sales
    ");
    assert_eq!(cell_set.cell(&[0])?.value(), Some("15.5"));
    assert_eq!(cell_set.cell(&[1])?.value(), Some("20"));

    Ok(())
}

#[test]
fn test_quarters_are_grouped_by_their_own_members() -> OlapResult<()> {
    let connection = connection();
    let select = SelectNode::from_cube("Sales").with_axis(
        AxisOrdinal::COLUMNS,
        set(&["[Time].[2020].[Q1]", "[Time].[2020].[Q2]", "[Time].[2021].[Q1]"]),
    );
    let cell_set = connection.execute(&select)?;

    let values = (0..cell_set.cell_count())
        .map(|ordinal| Ok(cell_set.cell_by_ordinal(ordinal)?.formatted_value().to_owned()))
        .collect::<OlapResult<Vec<_>>>()?;
    assert_eq!(values, ["17", "5.5", "20"]);

    Ok(())
}

#[test]
fn test_crossjoin_keys_span_both_hierarchies() -> OlapResult<()> {
    let connection = connection();
    let select = SelectNode::from_cube("Sales")
        .with_axis(
            AxisOrdinal::COLUMNS,
            ParseTreeNode::function(
                "Crossjoin",
                [
                    set(&["[Time].[2020]"]),
                    ParseTreeNode::call("Members", Syntax::Property, [id("[Geo]")]),
                ],
            ),
        )
        .with_axis(AxisOrdinal::ROWS, set(&["[Measures].[Price]"]));
    let cell_set = connection.execute(&select)?;

    assert_eq!(cell_set.axes()[0].dimensionality(), 2);
    assert_eq!(cell_set.cell(&[0, 0])?.value(), Some("1.75"));
    assert_eq!(cell_set.cell(&[1, 0])?.formatted_value(), "3.14");

    Ok(())
}

#[test]
fn test_calculated_measures_combine_stored_measures() -> OlapResult<()> {
    let connection = connection();
    let doubled = WithMemberNode::new(
        IdentifierNode::parse("[Measures].[Doubled]"),
        ParseTreeNode::infix("+", id("[Measures].[Amount]"), id("[Measures].[Amount]")),
    );
    let select = SelectNode::from_cube("Sales")
        .with_definition(ParseTreeNode::WithMember(doubled))
        .with_axis(AxisOrdinal::COLUMNS, set(&["[Time].[2020]", "[Time].[2021]"]))
        .with_axis(AxisOrdinal::ROWS, set(&["[Measures].[Doubled]"]));
    let cell_set = connection.execute(&select)?;

    assert_eq!(cell_set.cell(&[0, 0])?.double_value(), Some(45.0));
    assert_eq!(cell_set.cell(&[1, 0])?.double_value(), Some(40.0));

    Ok(())
}
