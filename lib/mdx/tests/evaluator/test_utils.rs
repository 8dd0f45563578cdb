use rdf_olap_model::metadata::{
    Aggregator, Cube, Dimension, DimensionType, Hierarchy, Level, Member, MetadataElement,
    MetadataObject, MetadataProvider,
};
use rdf_olap_model::{Axis, OlapResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A `Sales` cube with the dimensions `Time` (`Year > Quarter`), `Geo` (`Country`) and the measures
/// `Amount` (SUM) and `Count` (COUNT).
pub struct TestMetadata {
    cube: Arc<Cube>,
    dimensions: Arc<[Arc<Dimension>]>,
    hierarchies: Vec<Arc<Hierarchy>>,
    levels: Vec<Arc<Level>>,
    members: Vec<Arc<Member>>,
    measures: Arc<[Arc<Member>]>,
    member_requests: AtomicUsize,
}

impl TestMetadata {
    pub fn sales() -> Self {
        let cube = Cube::new(MetadataElement::new("[Sales]", "Sales"), "LdCatalog", "LdSchema");
        let dimensions = [
            ("Time", DimensionType::Time),
            ("Geo", DimensionType::Other),
            ("Measures", DimensionType::Measure),
        ]
        .into_iter()
        .enumerate()
        .map(|(ordinal, (name, dimension_type))| {
            Arc::new(Dimension {
                element: MetadataElement::new(format!("[{name}]"), name),
                cube_name: "Sales".to_owned(),
                dimension_type,
                ordinal,
            })
        })
        .collect::<Arc<[_]>>();
        let hierarchies = dimensions
            .iter()
            .map(|d| {
                Arc::new(Hierarchy {
                    element: d.element.clone(),
                    cube_name: "Sales".to_owned(),
                    dimension_unique_name: d.unique_name().to_owned(),
                })
            })
            .collect();

        let year = level("[Time]", "Year", 0, 2);
        let quarter = level("[Time]", "Quarter", 1, 2);
        let country = level("[Geo]", "Country", 0, 2);
        let measures_level = level("[Measures]", "MeasuresLevel", 0, 2);

        let members = vec![
            member(&year, "[Time].[2020]", None),
            member(&year, "[Time].[2021]", None),
            member(&quarter, "[Time].[2020].[Q1]", Some("[Time].[2020]")),
            member(&quarter, "[Time].[2021].[Q1]", Some("[Time].[2021]")),
            member(&country, "[Geo].[AT]", None),
            member(&country, "[Geo].[DE]", None),
        ];
        let measures = [("Amount", Aggregator::Sum), ("Count", Aggregator::Count)]
            .into_iter()
            .enumerate()
            .map(|(ordinal, (name, aggregator))| {
                Arc::new(Member::new_measure(
                    MetadataElement::new(format!("[Measures].[{name}]"), name),
                    &measures_level,
                    ordinal,
                    aggregator,
                ))
            })
            .collect();

        Self {
            cube: Arc::new(cube),
            dimensions,
            hierarchies,
            levels: vec![
                Arc::new(year),
                Arc::new(quarter),
                Arc::new(country),
                Arc::new(measures_level),
            ],
            members,
            measures,
            member_requests: AtomicUsize::new(0),
        }
    }

    pub fn cube(&self) -> Arc<Cube> {
        Arc::clone(&self.cube)
    }

    /// Returns how often the members of a level have been requested.
    pub fn member_requests(&self) -> usize {
        self.member_requests.load(Ordering::SeqCst)
    }

    /// Returns the member or measure with the given unique name.
    pub fn member(&self, unique_name: &str) -> Arc<Member> {
        self.members
            .iter()
            .chain(self.measures.iter())
            .find(|m| m.unique_name() == unique_name)
            .cloned()
            .unwrap_or_else(|| panic!("Unknown member {unique_name}"))
    }
}

impl MetadataProvider for TestMetadata {
    fn cube(&self, name: &str) -> OlapResult<Option<Arc<Cube>>> {
        Ok(self.cube.is_named(name).then(|| Arc::clone(&self.cube)))
    }

    fn dimensions(&self, _cube: &Cube) -> OlapResult<Arc<[Arc<Dimension>]>> {
        Ok(Arc::clone(&self.dimensions))
    }

    fn hierarchies(
        &self,
        _cube: &Cube,
        dimension: &Dimension,
    ) -> OlapResult<Arc<[Arc<Hierarchy>]>> {
        Ok(self
            .hierarchies
            .iter()
            .filter(|h| h.dimension_unique_name == dimension.unique_name())
            .cloned()
            .collect())
    }

    fn levels(&self, _cube: &Cube, hierarchy: &Hierarchy) -> OlapResult<Arc<[Arc<Level>]>> {
        Ok(self
            .levels
            .iter()
            .filter(|l| l.hierarchy_unique_name == hierarchy.unique_name())
            .cloned()
            .collect())
    }

    fn members(&self, _cube: &Cube, level: &Level) -> OlapResult<Arc<[Arc<Member>]>> {
        self.member_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .members
            .iter()
            .filter(|m| m.level_unique_name == level.unique_name())
            .cloned()
            .collect())
    }

    fn measures(&self, _cube: &Cube) -> OlapResult<Arc<[Arc<Member>]>> {
        Ok(Arc::clone(&self.measures))
    }
}

fn level(hierarchy: &str, name: &str, depth: usize, cardinality: usize) -> Level {
    Level {
        element: MetadataElement::new(format!("{hierarchy}.[{name}]"), name),
        cube_name: "Sales".to_owned(),
        dimension_unique_name: hierarchy.to_owned(),
        hierarchy_unique_name: hierarchy.to_owned(),
        depth,
        cardinality,
    }
}

fn member(level: &Level, unique_name: &str, parent: Option<&str>) -> Arc<Member> {
    let name = unique_name
        .rsplit('.')
        .next()
        .unwrap_or(unique_name)
        .trim_matches(['[', ']']);
    let member = Member::new(MetadataElement::new(unique_name, name), level, 0);
    Arc::new(match parent {
        Some(parent) => member.with_parent(parent),
        None => member,
    })
}

/// Renders one position per line, each as the tuple of its members.
pub fn render(axis: &Axis) -> String {
    axis.positions()
        .iter()
        .map(|position| {
            let members = position
                .members()
                .iter()
                .map(|m| m.unique_name())
                .collect::<Vec<_>>()
                .join(", ");
            format!("({members})")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
