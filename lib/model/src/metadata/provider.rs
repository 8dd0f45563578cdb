use crate::metadata::{Cube, Dimension, Hierarchy, Level, Member, MetadataObject};
use crate::{OlapError, OlapResult};
use std::sync::Arc;

/// Provides access to the schema objects of the cubes.
///
/// Implementations may populate their collections lazily (e.g., by sending metadata requests to a
/// Linked Data Engine). The query translation only navigates the containment hierarchy through
/// this trait, which is why schema objects can refer to their ancestors by unique name.
pub trait MetadataProvider: Send + Sync {
    /// Returns the cube whose name or unique name is `name`.
    fn cube(&self, name: &str) -> OlapResult<Option<Arc<Cube>>>;

    /// Returns the dimensions of `cube` (including the measures dimension).
    fn dimensions(&self, cube: &Cube) -> OlapResult<Arc<[Arc<Dimension>]>>;

    fn hierarchies(
        &self,
        cube: &Cube,
        dimension: &Dimension,
    ) -> OlapResult<Arc<[Arc<Hierarchy>]>>;

    /// Returns the levels of `hierarchy` ordered by depth.
    fn levels(&self, cube: &Cube, hierarchy: &Hierarchy) -> OlapResult<Arc<[Arc<Level>]>>;

    /// Returns the members of `level` ordered by ordinal.
    fn members(&self, cube: &Cube, level: &Level) -> OlapResult<Arc<[Arc<Member>]>>;

    /// Returns the measures of `cube` in declaration order.
    fn measures(&self, cube: &Cube) -> OlapResult<Arc<[Arc<Member>]>>;

    /// Returns the dimension with the given unique name.
    fn dimension(&self, cube: &Cube, unique_name: &str) -> OlapResult<Arc<Dimension>> {
        self.dimensions(cube)?
            .iter()
            .find(|d| d.unique_name() == unique_name)
            .cloned()
            .ok_or_else(|| OlapError::UnresolvedIdentifier(unique_name.to_owned()))
    }

    /// Returns the hierarchy with the given unique name.
    fn hierarchy(&self, cube: &Cube, unique_name: &str) -> OlapResult<Arc<Hierarchy>> {
        for dimension in self.dimensions(cube)?.iter() {
            let hierarchies = self.hierarchies(cube, dimension)?;
            if let Some(hierarchy) = hierarchies.iter().find(|h| h.unique_name() == unique_name) {
                return Ok(Arc::clone(hierarchy));
            }
        }
        Err(OlapError::UnresolvedIdentifier(unique_name.to_owned()))
    }

    /// Returns the level with the unique name `level_unique_name` of the given hierarchy.
    fn level(
        &self,
        cube: &Cube,
        hierarchy_unique_name: &str,
        level_unique_name: &str,
    ) -> OlapResult<Arc<Level>> {
        let hierarchy = self.hierarchy(cube, hierarchy_unique_name)?;
        self.levels(cube, &hierarchy)?
            .iter()
            .find(|l| l.unique_name() == level_unique_name)
            .cloned()
            .ok_or_else(|| OlapError::UnresolvedIdentifier(level_unique_name.to_owned()))
    }

    /// Returns the level of `member`.
    fn level_of(&self, cube: &Cube, member: &Member) -> OlapResult<Arc<Level>> {
        self.level(
            cube,
            &member.hierarchy_unique_name,
            &member.level_unique_name,
        )
    }
}
