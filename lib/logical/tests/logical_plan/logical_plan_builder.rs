use crate::test_utils::TestMetadata;
use rdf_olap_logical::LogicalOlapPlanBuilder;
use rdf_olap_model::{AxisOrdinal, OlapError, OlapResult};

#[test]
fn test_default_measure_is_first_measure_of_cube() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let columns = metadata.axis(
        AxisOrdinal::COLUMNS,
        &[&["[Time].[2020]"], &["[Time].[2021]"]],
    );

    let plan = LogicalOlapPlanBuilder::new(&metadata).build(metadata.cube(), &[columns], None)?;
    insta::assert_snapshot!(plan, @r"
    Rollup: hierarchies=[[Time]] levels=[[Time].[Year]]
      Slice: dimensions=[[Geo]]
        Dice: hierarchies=[] tuples=[]
          Projection: measures=[[Measures].[Amount]]
            BaseCube: Sales
    ");

    Ok(())
}

#[test]
fn test_dice_never_contains_measures() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let columns = metadata.axis(
        AxisOrdinal::COLUMNS,
        &[&["[Time].[2020]"], &["[Time].[2021]"]],
    );
    let rows = metadata.axis(AxisOrdinal::ROWS, &[&["[Measures].[Count]"]]);
    let filter = metadata.axis(
        AxisOrdinal::Filter,
        &[&["[Geo].[AT]", "[Measures].[Amount]"]],
    );

    let plan = LogicalOlapPlanBuilder::new(&metadata).build(
        metadata.cube(),
        &[columns, rows],
        Some(&filter),
    )?;
    insta::assert_snapshot!(plan, @r"
    Rollup: hierarchies=[[Time]] levels=[[Time].[Year]]
      Slice: dimensions=[[Geo]]
        Dice: hierarchies=[[Geo]] tuples=[([Geo].[AT])]
          Projection: measures=[[Measures].[Count], [Measures].[Amount]]
            BaseCube: Sales
    ");

    Ok(())
}

#[test]
fn test_filter_positions_without_dimension_members_are_dropped() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let columns = metadata.axis(AxisOrdinal::COLUMNS, &[&["[Geo].[AT]"], &["[Geo].[DE]"]]);
    let filter = metadata.axis(AxisOrdinal::Filter, &[&["[Measures].[Count]"]]);

    let plan =
        LogicalOlapPlanBuilder::new(&metadata).build(metadata.cube(), &[columns], Some(&filter))?;
    insta::assert_snapshot!(plan, @r"
    Rollup: hierarchies=[[Geo]] levels=[[Geo].[Country]]
      Slice: dimensions=[[Time]]
        Dice: hierarchies=[] tuples=[]
          Projection: measures=[[Measures].[Count]]
            BaseCube: Sales
    ");

    Ok(())
}

#[test]
fn test_crossjoined_axis_rolls_up_every_hierarchy() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let columns = metadata.axis(AxisOrdinal::COLUMNS, &[&["[Measures].[Amount]"]]);
    let rows = metadata.axis(
        AxisOrdinal::ROWS,
        &[
            &["[Time].[2020].[Q1]", "[Geo].[AT]"],
            &["[Time].[2020].[Q1]", "[Geo].[DE]"],
            &["[Time].[2021].[Q1]", "[Geo].[AT]"],
            &["[Time].[2021].[Q1]", "[Geo].[DE]"],
        ],
    );

    let plan =
        LogicalOlapPlanBuilder::new(&metadata).build(metadata.cube(), &[columns, rows], None)?;
    insta::assert_snapshot!(plan, @r"
    Rollup: hierarchies=[[Time], [Geo]] levels=[[Time].[Quarter], [Geo].[Country]]
      Slice: dimensions=[]
        Dice: hierarchies=[] tuples=[]
          Projection: measures=[[Measures].[Amount]]
            BaseCube: Sales
    ");
    assert_eq!(
        plan.rollup_levels().map(|levels| levels.len()),
        Some(2),
        "one level per hierarchy"
    );

    Ok(())
}

#[test]
fn test_heterogeneous_axis_is_rejected() {
    let metadata = TestMetadata::sales();
    let columns = metadata.axis(
        AxisOrdinal::COLUMNS,
        &[&["[Time].[2020]"], &["[Time].[2020].[Q1]"]],
    );

    let result = LogicalOlapPlanBuilder::new(&metadata).build(metadata.cube(), &[columns], None);
    assert!(
        matches!(result, Err(OlapError::HeterogeneousAxis { ref axis, .. }) if axis == "COLUMNS"),
        "unexpected result {result:?}"
    );
}

#[test]
fn test_cube_without_measures_fails() {
    let metadata = TestMetadata::sales_without_measures();
    let columns = metadata.axis(AxisOrdinal::COLUMNS, &[&["[Time].[2020]"]]);

    let result = LogicalOlapPlanBuilder::new(&metadata).build(metadata.cube(), &[columns], None);
    assert!(
        matches!(result, Err(OlapError::NoMeasureAvailable(ref cube)) if cube == "Sales"),
        "unexpected result {result:?}"
    );
}

#[test]
fn test_plan_accessors() -> OlapResult<()> {
    let metadata = TestMetadata::sales();
    let columns = metadata.axis(AxisOrdinal::COLUMNS, &[&["[Measures].[Count]"]]);

    let plan = LogicalOlapPlanBuilder::new(&metadata).build(metadata.cube(), &[columns], None)?;
    let names = plan.chain().map(|op| op.name()).collect::<Vec<_>>();
    assert_eq!(
        names,
        ["Rollup", "Slice", "Dice", "Projection", "BaseCube"],
        "fixed operator order"
    );
    assert_eq!(plan.cube().len(), 1, "single cube row");
    assert_eq!(
        plan.projected_measures().map(|m| m.len()),
        Some(1),
        "single projected measure"
    );

    Ok(())
}
