use rdf_olap_logical::LogicalOlapOp;
use rdf_olap_model::metadata::columns::{
    CATALOG_NAME, CUBE_NAME, DATA_SOURCE_NAME, DIMENSION_UNIQUE_NAME, HIERARCHY_UNIQUE_NAME, LEVEL_UNIQUE_NAME,
    MEMBER_UNIQUE_NAME, SCHEMA_NAME,
};
use rdf_olap_model::{term_value, OlapResult, RowSet, TupleRef};

/// The backend that answers metadata requests and executes logical OLAP plans, usually by
/// translating them into SPARQL queries against Linked Data sources.
///
/// Every operation returns a [RowSet]. Metadata row sets use the column names of
/// [columns](rdf_olap_model::metadata::columns). The calls are blocking. Statement timeouts and
/// cancellation are the responsibility of the implementation.
pub trait LinkedDataEngine: Send + Sync {
    /// Returns the databases (data sources) that are available.
    fn databases(&self, restrictions: &Restrictions) -> OlapResult<RowSet>;

    fn catalogs(&self, restrictions: &Restrictions) -> OlapResult<RowSet>;

    fn schemas(&self, restrictions: &Restrictions) -> OlapResult<RowSet>;

    fn cubes(&self, restrictions: &Restrictions) -> OlapResult<RowSet>;

    /// Returns the dimensions of a cube, including the measures dimension.
    fn dimensions(&self, restrictions: &Restrictions) -> OlapResult<RowSet>;

    /// Returns the measures of a cube in declaration order.
    fn measures(&self, restrictions: &Restrictions) -> OlapResult<RowSet>;

    fn hierarchies(&self, restrictions: &Restrictions) -> OlapResult<RowSet>;

    /// Returns the levels of a hierarchy ordered by depth.
    fn levels(&self, restrictions: &Restrictions) -> OlapResult<RowSet>;

    /// Returns the members of a level ordered by ordinal.
    fn members(&self, restrictions: &Restrictions) -> OlapResult<RowSet>;

    /// Executes the operator chain of `plan`.
    ///
    /// The result has one row per cell group. The first columns hold the canonical unique names
    /// of the rolled-up members (one per roll-up level, in roll-up order), followed by one column
    /// per projected measure (in projection order).
    fn execute_olap_query(&self, plan: &LogicalOlapOp) -> OlapResult<RowSet>;
}

/// The name-value pairs that restrict a metadata request.
///
/// Absent fields do not restrict the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Restrictions {
    pub database_name: Option<String>,
    pub catalog_name: Option<String>,
    pub schema_name: Option<String>,
    pub cube_name: Option<String>,
    pub dimension_unique_name: Option<String>,
    pub hierarchy_unique_name: Option<String>,
    pub level_unique_name: Option<String>,
    pub member_unique_name: Option<String>,
}

impl Restrictions {
    /// Restricts the request to a catalog and a schema.
    pub fn new(catalog_name: impl Into<String>, schema_name: impl Into<String>) -> Self {
        Self {
            catalog_name: Some(catalog_name.into()),
            schema_name: Some(schema_name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_database(mut self, database_name: impl Into<String>) -> Self {
        self.database_name = Some(database_name.into());
        self
    }

    #[must_use]
    pub fn with_cube(mut self, cube_name: impl Into<String>) -> Self {
        self.cube_name = Some(cube_name.into());
        self
    }

    #[must_use]
    pub fn with_dimension(mut self, unique_name: impl Into<String>) -> Self {
        self.dimension_unique_name = Some(unique_name.into());
        self
    }

    #[must_use]
    pub fn with_hierarchy(mut self, unique_name: impl Into<String>) -> Self {
        self.hierarchy_unique_name = Some(unique_name.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, unique_name: impl Into<String>) -> Self {
        self.level_unique_name = Some(unique_name.into());
        self
    }

    #[must_use]
    pub fn with_member(mut self, unique_name: impl Into<String>) -> Self {
        self.member_unique_name = Some(unique_name.into());
        self
    }

    /// Returns the restrictions as pairs of column name and value.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (DATA_SOURCE_NAME, &self.database_name),
            (CATALOG_NAME, &self.catalog_name),
            (SCHEMA_NAME, &self.schema_name),
            (CUBE_NAME, &self.cube_name),
            (DIMENSION_UNIQUE_NAME, &self.dimension_unique_name),
            (HIERARCHY_UNIQUE_NAME, &self.hierarchy_unique_name),
            (LEVEL_UNIQUE_NAME, &self.level_unique_name),
            (MEMBER_UNIQUE_NAME, &self.member_unique_name),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.as_deref().map(|value| (column, value)))
    }

    /// Returns whether `tuple` satisfies every restriction on a column that the tuple has.
    pub fn matches(&self, tuple: &TupleRef<'_>) -> bool {
        self.pairs().all(|(column, value)| {
            tuple
                .get(column)
                .map_or(true, |actual| term_value(actual) == value)
        })
    }
}
