use crate::engine::{LinkedDataEngine, Restrictions};
use crate::metadata::deferred::{DeferredList, DeferredMap, Items};
use rdf_olap_model::metadata::{
    Catalog, Cube, Database, Dimension, Hierarchy, Level, Member, MetadataObject,
    MetadataProvider, Schema,
};
use rdf_olap_model::{OlapResult, RowSet};
use std::sync::Arc;
use tracing::debug;

/// Caches the schema objects that have been requested from a [LinkedDataEngine].
///
/// Each collection is requested once, on first access, and kept until [MetadataStore::reset] is
/// called. The collections below a cube are keyed by the unique names of their containers.
pub struct MetadataStore {
    engine: Arc<dyn LinkedDataEngine>,
    database_name: Option<String>,
    catalog_name: String,
    schema_name: String,
    databases: DeferredList<Database>,
    catalogs: DeferredList<Catalog>,
    schemas: DeferredList<Schema>,
    cubes: DeferredList<Cube>,
    /// Keyed by cube name.
    dimensions: DeferredMap<String, Dimension>,
    /// Keyed by cube name.
    measures: DeferredMap<String, Member>,
    /// Keyed by cube name and dimension unique name.
    hierarchies: DeferredMap<(String, String), Hierarchy>,
    /// Keyed by cube name and hierarchy unique name.
    levels: DeferredMap<(String, String), Level>,
    /// Keyed by cube name and level unique name.
    members: DeferredMap<(String, String), Member>,
}

impl MetadataStore {
    /// Creates a store for the cubes of the given catalog and schema.
    pub fn new(
        engine: Arc<dyn LinkedDataEngine>,
        catalog_name: impl Into<String>,
        schema_name: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            database_name: None,
            catalog_name: catalog_name.into(),
            schema_name: schema_name.into(),
            databases: DeferredList::new(),
            catalogs: DeferredList::new(),
            schemas: DeferredList::new(),
            cubes: DeferredList::new(),
            dimensions: DeferredMap::new(),
            measures: DeferredMap::new(),
            hierarchies: DeferredMap::new(),
            levels: DeferredMap::new(),
            members: DeferredMap::new(),
        }
    }

    /// Restricts the requested databases to the one named `database_name`.
    #[must_use]
    pub fn with_database(mut self, database_name: Option<String>) -> Self {
        self.database_name = database_name;
        self
    }

    pub fn engine(&self) -> &Arc<dyn LinkedDataEngine> {
        &self.engine
    }

    /// Returns the databases of the engine, only the configured one if there is one.
    pub fn databases(&self) -> OlapResult<Items<Database>> {
        self.databases.get_or_populate(|| {
            let restrictions = Restrictions {
                database_name: self.database_name.clone(),
                ..Restrictions::default()
            };
            let rows = self.engine.databases(&restrictions)?;
            load("databases", &rows)
        })
    }

    pub fn catalogs(&self) -> OlapResult<Items<Catalog>> {
        self.catalogs.get_or_populate(|| {
            let rows = self.engine.catalogs(&Restrictions::default())?;
            load("catalogs", &rows)
        })
    }

    /// Returns the schemas of the catalog of this store.
    pub fn schemas(&self) -> OlapResult<Items<Schema>> {
        self.schemas.get_or_populate(|| {
            let restrictions = Restrictions {
                catalog_name: Some(self.catalog_name.clone()),
                ..Restrictions::default()
            };
            let rows = self.engine.schemas(&restrictions)?;
            load("schemas", &rows)
        })
    }

    /// Returns the cubes of the catalog and schema of this store.
    pub fn cubes(&self) -> OlapResult<Items<Cube>> {
        self.cubes.get_or_populate(|| {
            let rows = self.engine.cubes(&self.restrictions())?;
            load("cubes", &rows)
        })
    }

    /// Discards every cached collection.
    pub fn reset(&self) {
        debug!("Resetting the metadata of {}.{}", self.catalog_name, self.schema_name);
        self.databases.reset();
        self.catalogs.reset();
        self.schemas.reset();
        self.cubes.reset();
        self.dimensions.clear();
        self.measures.clear();
        self.hierarchies.clear();
        self.levels.clear();
        self.members.clear();
    }

    fn restrictions(&self) -> Restrictions {
        Restrictions::new(&self.catalog_name, &self.schema_name)
    }
}

impl MetadataProvider for MetadataStore {
    fn cube(&self, name: &str) -> OlapResult<Option<Arc<Cube>>> {
        Ok(self.cubes()?.iter().find(|c| c.is_named(name)).cloned())
    }

    fn dimensions(&self, cube: &Cube) -> OlapResult<Arc<[Arc<Dimension>]>> {
        self.dimensions
            .list(cube.name().to_owned())
            .get_or_populate(|| {
                let restrictions = self.restrictions().with_cube(cube.name());
                let mut dimensions: Vec<Dimension> =
                    load("dimensions", &self.engine.dimensions(&restrictions)?)?;
                dimensions.sort_by_key(|d| d.ordinal);
                Ok(dimensions)
            })
    }

    fn hierarchies(
        &self,
        cube: &Cube,
        dimension: &Dimension,
    ) -> OlapResult<Arc<[Arc<Hierarchy>]>> {
        let key = (cube.name().to_owned(), dimension.unique_name().to_owned());
        self.hierarchies.list(key).get_or_populate(|| {
            let restrictions = self
                .restrictions()
                .with_cube(cube.name())
                .with_dimension(dimension.unique_name());
            load("hierarchies", &self.engine.hierarchies(&restrictions)?)
        })
    }

    fn levels(&self, cube: &Cube, hierarchy: &Hierarchy) -> OlapResult<Arc<[Arc<Level>]>> {
        let key = (cube.name().to_owned(), hierarchy.unique_name().to_owned());
        self.levels.list(key).get_or_populate(|| {
            let restrictions = self
                .restrictions()
                .with_cube(cube.name())
                .with_dimension(&hierarchy.dimension_unique_name)
                .with_hierarchy(hierarchy.unique_name());
            let mut levels: Vec<Level> = load("levels", &self.engine.levels(&restrictions)?)?;
            levels.sort_by_key(|l| l.depth);
            Ok(levels)
        })
    }

    fn members(&self, cube: &Cube, level: &Level) -> OlapResult<Arc<[Arc<Member>]>> {
        let key = (cube.name().to_owned(), level.unique_name().to_owned());
        self.members.list(key).get_or_populate(|| {
            let restrictions = self
                .restrictions()
                .with_cube(cube.name())
                .with_dimension(&level.dimension_unique_name)
                .with_hierarchy(&level.hierarchy_unique_name)
                .with_level(level.unique_name());
            let mut members: Vec<Member> = load("members", &self.engine.members(&restrictions)?)?;
            members.sort_by_key(|m| m.ordinal);
            Ok(members)
        })
    }

    fn measures(&self, cube: &Cube) -> OlapResult<Arc<[Arc<Member>]>> {
        self.measures
            .list(cube.name().to_owned())
            .get_or_populate(|| {
                let restrictions = self.restrictions().with_cube(cube.name());
                let rows = self.engine.measures(&restrictions)?;
                let measures = Member::measures_from_row_set(&rows)?;
                debug!("Loaded {} measures of cube {}", measures.len(), cube.name());
                Ok(measures)
            })
    }
}

fn load<T: MetadataObject>(kind: &str, rows: &RowSet) -> OlapResult<Vec<T>> {
    let objects = T::from_row_set(rows)?;
    debug!("Loaded {} {kind}", objects.len());
    Ok(objects)
}
