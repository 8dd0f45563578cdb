//! A [LinkedDataEngine] that answers requests from cubes held in memory.
//!
//! It is used for testing and for embedding small, pre-aggregated data sets. Every cube must be
//! registered before the engine is shared with a connection.

mod cube;
mod execution;

pub use cube::{Fact, MemoryCube, MemoryCubeBuilder};

use crate::engine::{LinkedDataEngine, Restrictions};
use rdf_olap_logical::LogicalOlapOp;
use rdf_olap_model::metadata::{
    Catalog, Cube, Database, Member, MetadataElement, MetadataObject, Schema,
};
use rdf_olap_model::{OlapError, OlapResult, RowSet};
use tracing::debug;

/// Serves the metadata and the observations of [MemoryCube]s.
pub struct MemoryLinkedDataEngine {
    database: Database,
    catalog: Catalog,
    schema: Schema,
    cubes: Vec<MemoryCube>,
}

impl MemoryLinkedDataEngine {
    /// Creates an engine without cubes whose single schema is `schema_name` in `catalog_name`.
    pub fn new(catalog_name: impl Into<String>, schema_name: impl Into<String>) -> Self {
        let catalog_name = catalog_name.into();
        let schema_name = schema_name.into();
        Self {
            database: Database {
                element: MetadataElement::new("memory", "memory")
                    .with_description("Cubes held in memory"),
                url: None,
            },
            catalog: Catalog {
                element: MetadataElement::new(&catalog_name, &catalog_name),
            },
            schema: Schema {
                element: MetadataElement::new(&schema_name, &schema_name),
                catalog_name,
            },
            cubes: Vec::new(),
        }
    }

    /// Registers `cube` in the schema of the engine.
    #[must_use]
    pub fn with_cube(mut self, mut cube: MemoryCube) -> Self {
        cube.cube.catalog_name.clone_from(&self.schema.catalog_name);
        cube.cube.schema_name.clone_from(&self.schema.element.name);
        self.cubes.push(cube);
        self
    }

    /// Returns the cubes whose catalog, schema and name satisfy `restrictions`.
    fn matching_cubes<'engine>(
        &'engine self,
        restrictions: &'engine Restrictions,
    ) -> impl Iterator<Item = &'engine MemoryCube> + 'engine {
        self.cubes.iter().filter(|memory_cube| {
            let cube = memory_cube.cube();
            restrictions
                .catalog_name
                .as_ref()
                .map_or(true, |name| *name == cube.catalog_name)
                && restrictions
                    .schema_name
                    .as_ref()
                    .map_or(true, |name| *name == cube.schema_name)
                && restrictions
                    .cube_name
                    .as_ref()
                    .map_or(true, |name| cube.is_named(name))
        })
    }

    /// Serializes the objects of the matching cubes and keeps the rows that satisfy
    /// `restrictions`.
    fn rows<T: MetadataObject>(
        &self,
        restrictions: &Restrictions,
        objects: impl Fn(&MemoryCube) -> &[T],
    ) -> RowSet {
        let rows = T::row_set(self.matching_cubes(restrictions).flat_map(|c| objects(c)));
        rows.filter(|tuple| restrictions.matches(tuple))
    }
}

impl LinkedDataEngine for MemoryLinkedDataEngine {
    fn databases(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        Ok(Database::row_set([&self.database]).filter(|tuple| restrictions.matches(tuple)))
    }

    fn catalogs(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        Ok(Catalog::row_set([&self.catalog]).filter(|tuple| restrictions.matches(tuple)))
    }

    fn schemas(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        Ok(Schema::row_set([&self.schema]).filter(|tuple| restrictions.matches(tuple)))
    }

    fn cubes(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        Ok(Cube::row_set(
            self.matching_cubes(restrictions).map(MemoryCube::cube),
        ))
    }

    fn dimensions(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        Ok(self.rows(restrictions, |c| &c.dimensions))
    }

    fn measures(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        let measures = self
            .matching_cubes(restrictions)
            .flat_map(|c| c.measures.iter())
            .collect::<Vec<&Member>>();
        Ok(Member::measure_row_set(measures).filter(|tuple| restrictions.matches(tuple)))
    }

    fn hierarchies(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        Ok(self.rows(restrictions, |c| &c.hierarchies))
    }

    fn levels(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        Ok(self.rows(restrictions, |c| &c.levels))
    }

    fn members(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        Ok(self.rows(restrictions, |c| &c.members))
    }

    fn execute_olap_query(&self, plan: &LogicalOlapOp) -> OlapResult<RowSet> {
        let name = Cube::from_row_set(plan.cube())?
            .into_iter()
            .next()
            .map(|cube| cube.name().to_owned())
            .ok_or_else(|| OlapError::MalformedResult("The plan has no base cube".to_owned()))?;
        let cube = self
            .cubes
            .iter()
            .find(|c| c.cube().is_named(&name))
            .ok_or(OlapError::UnresolvedIdentifier(name))?;
        debug!("Executing plan on the memory cube {}", cube.cube().name());
        execution::execute(cube, plan)
    }
}
