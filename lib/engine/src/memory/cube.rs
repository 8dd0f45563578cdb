use rdf_olap_model::identifier::quote_segment;
use rdf_olap_model::metadata::{
    Aggregator, ArithmeticOperator, CalculatedFormula, Cube, Dimension, DimensionType, Hierarchy,
    Level, Member, MetadataElement, MetadataObject, MEASURES_DIMENSION, MEASURES_HIERARCHY,
    MEASURES_LEVEL,
};
use rdf_olap_model::{OlapError, OlapResult};
use rustc_hash::FxHashMap;

/// An observation of an in-memory cube.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    /// The unique names of the members the observation refers to, at most one per hierarchy.
    pub members: Vec<String>,
    /// The values keyed by measure unique name.
    pub values: FxHashMap<String, f64>,
}

/// A cube whose schema objects and observations are held in memory.
#[derive(Debug, Clone)]
pub struct MemoryCube {
    pub(crate) cube: Cube,
    pub(crate) dimensions: Vec<Dimension>,
    pub(crate) hierarchies: Vec<Hierarchy>,
    pub(crate) levels: Vec<Level>,
    pub(crate) members: Vec<Member>,
    pub(crate) measures: Vec<Member>,
    pub(crate) facts: Vec<Fact>,
    /// Index into `members` by unique name.
    member_index: FxHashMap<String, usize>,
}

impl MemoryCube {
    /// Starts the description of a cube called `name`.
    pub fn builder(name: impl Into<String>) -> MemoryCubeBuilder {
        MemoryCubeBuilder {
            name: name.into(),
            dimensions: Vec::new(),
            members: Vec::new(),
            measures: Vec::new(),
            facts: Vec::new(),
        }
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    /// Returns the member with the given unique name.
    pub fn member(&self, unique_name: &str) -> Option<&Member> {
        self.member_index
            .get(unique_name)
            .map(|index| &self.members[*index])
    }

    /// Returns the ancestor of `member` at `depth`, or `member` itself if it is at that depth.
    pub fn ancestor_at(&self, member: &Member, depth: usize) -> Option<&Member> {
        let mut current = self.member(member.unique_name())?;
        while current.level_depth > depth {
            current = self.member(current.parent_unique_name.as_deref()?)?;
        }
        (current.level_depth == depth).then_some(current)
    }

    /// Returns whether `ancestor` is `member` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: &Member, member: &Member) -> bool {
        ancestor.hierarchy_unique_name == member.hierarchy_unique_name
            && self
                .ancestor_at(member, ancestor.level_depth)
                .is_some_and(|m| m.unique_name() == ancestor.unique_name())
    }
}

struct DimensionDescription {
    name: String,
    dimension_type: DimensionType,
    levels: Vec<String>,
}

struct MemberDescription {
    level_unique_name: String,
    name: String,
    parent_unique_name: Option<String>,
}

enum MeasureDescription {
    Stored(String, Aggregator),
    Calculated(String, CalculatedFormula),
}

/// Describes a [MemoryCube]. The description is validated by [MemoryCubeBuilder::build].
pub struct MemoryCubeBuilder {
    name: String,
    dimensions: Vec<DimensionDescription>,
    members: Vec<MemberDescription>,
    measures: Vec<MeasureDescription>,
    facts: Vec<(Vec<String>, Vec<(String, f64)>)>,
}

impl MemoryCubeBuilder {
    /// Adds a dimension with a single hierarchy of the same name. The levels are given from the
    /// root level downwards.
    #[must_use]
    pub fn dimension(
        mut self,
        name: impl Into<String>,
        dimension_type: DimensionType,
        levels: &[&str],
    ) -> Self {
        self.dimensions.push(DimensionDescription {
            name: name.into(),
            dimension_type,
            levels: levels.iter().map(|l| (*l).to_owned()).collect(),
        });
        self
    }

    /// Adds a member to the level with the unique name `level`. The unique name of the member
    /// extends the unique name of its parent or, for root members, of its dimension.
    #[must_use]
    pub fn member(mut self, level: &str, name: impl Into<String>, parent: Option<&str>) -> Self {
        self.members.push(MemberDescription {
            level_unique_name: level.to_owned(),
            name: name.into(),
            parent_unique_name: parent.map(str::to_owned),
        });
        self
    }

    #[must_use]
    pub fn measure(mut self, name: impl Into<String>, aggregator: Aggregator) -> Self {
        self.measures
            .push(MeasureDescription::Stored(name.into(), aggregator));
        self
    }

    /// Adds a measure that combines the values of two measures (given by unique name).
    #[must_use]
    pub fn calculated_measure(
        mut self,
        name: impl Into<String>,
        operator: ArithmeticOperator,
        lhs: &str,
        rhs: &str,
    ) -> Self {
        let formula = CalculatedFormula {
            operator,
            lhs: lhs.to_owned(),
            rhs: rhs.to_owned(),
        };
        self.measures
            .push(MeasureDescription::Calculated(name.into(), formula));
        self
    }

    /// Adds an observation of the given members with values for the measures (given by name).
    #[must_use]
    pub fn fact(mut self, members: &[&str], values: &[(&str, f64)]) -> Self {
        self.facts.push((
            members.iter().map(|m| (*m).to_owned()).collect(),
            values
                .iter()
                .map(|(name, value)| ((*name).to_owned(), *value))
                .collect(),
        ));
        self
    }

    /// Creates the cube.
    ///
    /// # Errors
    ///
    /// Returns an error if a member refers to an unknown level or parent, or if a fact refers to
    /// an unknown member or measure.
    pub fn build(self) -> OlapResult<MemoryCube> {
        let Self {
            name: cube_name,
            dimensions: dimension_descriptions,
            members: member_descriptions,
            measures: measure_descriptions,
            facts: fact_descriptions,
        } = self;
        let cube = Cube::new(
            MetadataElement::new(quote_segment(&cube_name), cube_name.clone()),
            "",
            "",
        );

        let mut dimensions = Vec::new();
        let mut hierarchies = Vec::new();
        let mut levels = Vec::new();
        for (ordinal, description) in dimension_descriptions.iter().enumerate() {
            let unique_name = quote_segment(&description.name);
            dimensions.push(Dimension {
                element: MetadataElement::new(&unique_name, &description.name),
                cube_name: cube_name.clone(),
                dimension_type: description.dimension_type,
                ordinal,
            });
            hierarchies.push(Hierarchy {
                element: MetadataElement::new(&unique_name, &description.name),
                cube_name: cube_name.clone(),
                dimension_unique_name: unique_name.clone(),
            });
            for (depth, level) in description.levels.iter().enumerate() {
                levels.push(Level {
                    element: MetadataElement::new(
                        format!("{unique_name}.{}", quote_segment(level)),
                        level,
                    ),
                    cube_name: cube_name.clone(),
                    dimension_unique_name: unique_name.clone(),
                    hierarchy_unique_name: unique_name.clone(),
                    depth,
                    cardinality: 0,
                });
            }
        }

        let mut members: Vec<Member> = Vec::new();
        let mut member_index = FxHashMap::default();
        for description in member_descriptions {
            let level = levels
                .iter_mut()
                .find(|l| l.unique_name() == description.level_unique_name)
                .ok_or_else(|| {
                    OlapError::InvalidMetadata(format!(
                        "Unknown level {}",
                        description.level_unique_name
                    ))
                })?;
            let prefix = match &description.parent_unique_name {
                Some(parent) => {
                    let known = member_index
                        .get(parent)
                        .map(|index: &usize| &members[*index])
                        .is_some_and(|p: &Member| p.level_depth + 1 == level.depth);
                    if !known {
                        return OlapError::invalid_metadata(format!(
                            "{parent} is not a member of the level above {}",
                            level.unique_name()
                        ));
                    }
                    parent.clone()
                }
                None => level.dimension_unique_name.clone(),
            };
            let unique_name = format!("{prefix}.{}", quote_segment(&description.name));
            let member = Member::new(
                MetadataElement::new(&unique_name, &description.name),
                level,
                level.cardinality,
            );
            level.cardinality += 1;
            let member = match description.parent_unique_name {
                Some(parent) => member.with_parent(parent),
                None => member,
            };
            member_index.insert(unique_name, members.len());
            members.push(member);
        }

        let measures = build_measures(
            &measure_descriptions,
            &cube_name,
            &mut dimensions,
            &mut hierarchies,
            &mut levels,
        )?;

        let facts = fact_descriptions
            .into_iter()
            .map(|(fact_members, values)| {
                if let Some(unknown) = fact_members.iter().find(|m| !member_index.contains_key(*m)) {
                    return OlapError::invalid_metadata(format!("Unknown member {unknown}"));
                }
                let values = values
                    .into_iter()
                    .map(|(name, value)| {
                        measures
                            .iter()
                            .find(|m| m.is_named(&name) && !m.is_calculated())
                            .map(|m| (m.unique_name().to_owned(), value))
                            .ok_or_else(|| {
                                OlapError::InvalidMetadata(format!("Unknown measure {name}"))
                            })
                    })
                    .collect::<OlapResult<_>>()?;
                Ok(Fact {
                    members: fact_members,
                    values,
                })
            })
            .collect::<OlapResult<Vec<_>>>()?;

        Ok(MemoryCube {
            cube,
            dimensions,
            hierarchies,
            levels,
            members,
            measures,
            facts,
            member_index,
        })
    }
}

/// Creates the measures together with the measures dimension, hierarchy and level.
fn build_measures(
    descriptions: &[MeasureDescription],
    cube_name: &str,
    dimensions: &mut Vec<Dimension>,
    hierarchies: &mut Vec<Hierarchy>,
    levels: &mut Vec<Level>,
) -> OlapResult<Vec<Member>> {
    if descriptions.is_empty() {
        return Ok(Vec::new());
    }

    let level = Level {
        element: MetadataElement::new(MEASURES_LEVEL, "MeasuresLevel"),
        cube_name: cube_name.to_owned(),
        dimension_unique_name: MEASURES_DIMENSION.to_owned(),
        hierarchy_unique_name: MEASURES_HIERARCHY.to_owned(),
        depth: 0,
        cardinality: descriptions.len(),
    };
    let mut measures: Vec<Member> = Vec::new();
    for (ordinal, description) in descriptions.iter().enumerate() {
        let measure = match description {
            MeasureDescription::Stored(name, aggregator) => Member::new_measure(
                measure_element(name),
                &level,
                ordinal,
                *aggregator,
            ),
            MeasureDescription::Calculated(name, formula) => {
                let sibling = measures
                    .iter()
                    .find(|m| m.unique_name() == formula.lhs)
                    .ok_or_else(|| {
                        OlapError::InvalidMetadata(format!(
                            "The formula {formula} must refer to a measure defined before {name}"
                        ))
                    })?;
                Member::new_calculated(measure_element(name), sibling, ordinal, formula.clone())
            }
        };
        measures.push(measure);
    }

    dimensions.push(Dimension {
        element: MetadataElement::new(MEASURES_DIMENSION, "Measures"),
        cube_name: cube_name.to_owned(),
        dimension_type: DimensionType::Measure,
        ordinal: dimensions.len(),
    });
    hierarchies.push(Hierarchy {
        element: MetadataElement::new(MEASURES_HIERARCHY, "Measures"),
        cube_name: cube_name.to_owned(),
        dimension_unique_name: MEASURES_DIMENSION.to_owned(),
    });
    levels.push(level);
    Ok(measures)
}

fn measure_element(name: &str) -> MetadataElement {
    MetadataElement::new(format!("{MEASURES_DIMENSION}.{}", quote_segment(name)), name)
}
