use crate::cell_set::OlapCellSet;
use crate::engine::LinkedDataEngine;
use crate::metadata::{Items, MetadataStore};
use rdf_olap_logical::{LogicalOlapOp, LogicalOlapPlanBuilder};
use rdf_olap_mdx::parse_tree::SelectNode;
use rdf_olap_mdx::MdxEvaluator;
use rdf_olap_model::metadata::{Catalog, Cube, Database, MetadataProvider, Schema};
use rdf_olap_model::OlapResult;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// The catalog used if none is configured.
pub const DEFAULT_CATALOG: &str = "LdCatalog";
/// The schema used if none is configured.
pub const DEFAULT_SCHEMA: &str = "LdSchema";

/// The configuration of an [OlapConnection].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OlapConnectionConfig {
    /// The catalog whose cubes are queried.
    pub catalog: String,
    /// The schema whose cubes are queried.
    pub schema: String,
    /// The data source, if the Linked Data Engine serves more than one. Restricts the listed
    /// databases.
    pub database: Option<String>,
    /// The locale of captions and formatted values.
    pub locale: Option<String>,
}

impl Default for OlapConnectionConfig {
    fn default() -> Self {
        Self {
            catalog: DEFAULT_CATALOG.to_owned(),
            schema: DEFAULT_SCHEMA.to_owned(),
            database: None,
            locale: None,
        }
    }
}

/// A connection to the cubes of a [LinkedDataEngine].
///
/// The schema objects are requested lazily and cached by the connection. Executing a query
/// evaluates its parse tree, plans the logical operators, lets the engine execute them and wraps
/// the result in an [OlapCellSet].
pub struct OlapConnection {
    config: OlapConnectionConfig,
    metadata: MetadataStore,
}

impl OlapConnection {
    pub fn new(engine: Arc<dyn LinkedDataEngine>, config: OlapConnectionConfig) -> Self {
        let metadata = MetadataStore::new(engine, &config.catalog, &config.schema)
            .with_database(config.database.clone());
        Self { config, metadata }
    }

    pub fn config(&self) -> &OlapConnectionConfig {
        &self.config
    }

    /// Provides access to the cached schema objects.
    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    pub fn databases(&self) -> OlapResult<Items<Database>> {
        self.metadata.databases()
    }

    pub fn catalogs(&self) -> OlapResult<Items<Catalog>> {
        self.metadata.catalogs()
    }

    pub fn schemas(&self) -> OlapResult<Items<Schema>> {
        self.metadata.schemas()
    }

    /// Returns the cubes of the configured catalog and schema.
    pub fn cubes(&self) -> OlapResult<Items<Cube>> {
        self.metadata.cubes()
    }

    /// Returns the cube named `name`, if there is one.
    pub fn cube(&self, name: &str) -> OlapResult<Option<Arc<Cube>>> {
        self.metadata.cube(name)
    }

    pub fn locale(&self) -> Option<&str> {
        self.config.locale.as_deref()
    }

    /// Changes the locale. Captions depend on the locale, hence every cached schema object is
    /// discarded.
    pub fn set_locale(&mut self, locale: Option<String>) {
        debug!("Changing the locale from {:?} to {locale:?}", self.config.locale);
        self.config.locale = locale;
        self.metadata.reset();
    }

    /// Returns the logical plan of `select` without executing it.
    pub fn explain(&self, select: &SelectNode) -> OlapResult<LogicalOlapOp> {
        let query = MdxEvaluator::new(&self.metadata).evaluate_query(select)?;
        LogicalOlapPlanBuilder::new(&self.metadata).build(
            &query.cube,
            &query.axes,
            query.filter.as_ref(),
        )
    }

    /// Executes `select` and returns its cells.
    pub fn execute(&self, select: &SelectNode) -> OlapResult<OlapCellSet> {
        let start = Instant::now();
        let query = MdxEvaluator::new(&self.metadata).evaluate_query(select)?;
        let plan = LogicalOlapPlanBuilder::new(&self.metadata).build(
            &query.cube,
            &query.axes,
            query.filter.as_ref(),
        )?;
        debug!("Executing the plan\n{plan}");

        let result = self.metadata.engine().execute_olap_query(&plan)?;
        let cell_set = OlapCellSet::try_new(query, plan, &result)?;
        info!(
            "Executed query on cube {} with {} cells from {} result rows in {:?}",
            cell_set.cube().element.name,
            cell_set.cell_count(),
            result.len(),
            start.elapsed()
        );
        Ok(cell_set)
    }
}
