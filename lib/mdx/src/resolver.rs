//! Resolution of identifiers against the schema objects of the cube.

use crate::evaluator::cube_of;
use crate::parse_tree::IdentifierNode;
use crate::{EvaluatedValue, EvaluationContext, MdxEvaluator, SchemaObject};
use rdf_olap_model::metadata::{Cube, Level, Member, MetadataObject};
use rdf_olap_model::{OlapError, OlapResult};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::warn;

impl MdxEvaluator<'_> {
    /// Resolves an identifier.
    ///
    /// Calculated members and named sets of the query take precedence. Otherwise, the segments are
    /// matched one after another, starting at the cube. A segment is first matched against the
    /// children of the object matched so far and then against all of its descendants. Hence,
    /// `[Time].[2020]` finds the member `2020` of the time dimension even though there are
    /// hierarchies and levels in between, and `[2020]` alone finds it as well.
    ///
    /// The most specific object is returned. The identifier is unresolved if not even the first
    /// segment matches.
    pub(crate) fn resolve_identifier(
        &self,
        identifier: &IdentifierNode,
        context: &EvaluationContext,
    ) -> OlapResult<EvaluatedValue> {
        let unique_name = identifier.unique_name();
        if let Some(member) = context.calculated_member(&unique_name) {
            return Ok(EvaluatedValue::member(Arc::clone(member)));
        }
        if let Some(set) = context.named_set(&unique_name) {
            return Ok(set.clone());
        }

        let cube = cube_of(context)?;
        let mut current = SchemaObject::Cube(Arc::clone(cube));
        let mut matched = 0;
        for segment in identifier.segments() {
            let Some(next) = self.find_descendant(cube, &current, segment)? else {
                break;
            };
            current = next;
            matched += 1;
        }

        if matched == 0 {
            return Err(OlapError::UnresolvedIdentifier(unique_name));
        }
        if matched < identifier.segments().len() {
            warn!(
                "Only {matched} segments of {unique_name} could be resolved, using the {} {}",
                current.kind(),
                current.unique_name()
            );
        }
        Ok(EvaluatedValue::Object(current))
    }

    /// Finds the object named `segment` below `parent`. Direct children are preferred, the
    /// remaining descendants are searched breadth-first.
    ///
    /// Below a level, every member is already listed by its own level. Hence, members are only
    /// expanded if the search starts at a member.
    fn find_descendant(
        &self,
        cube: &Cube,
        parent: &SchemaObject,
        segment: &str,
    ) -> OlapResult<Option<SchemaObject>> {
        let children = self.children(cube, parent)?;
        if let Some(child) = children.iter().find(|c| c.is_named(segment)) {
            return Ok(Some(child.clone()));
        }

        let expand_members = matches!(parent, SchemaObject::Member(_));
        let mut queue = VecDeque::from(children);
        while let Some(object) = queue.pop_front() {
            if matches!(object, SchemaObject::Member(_)) && !expand_members {
                continue;
            }
            for child in self.children(cube, &object)? {
                if child.is_named(segment) {
                    return Ok(Some(child));
                }
                queue.push_back(child);
            }
        }
        Ok(None)
    }

    /// Returns the schema objects directly contained in `parent`.
    pub(crate) fn children(
        &self,
        cube: &Cube,
        parent: &SchemaObject,
    ) -> OlapResult<Vec<SchemaObject>> {
        Ok(match parent {
            SchemaObject::Cube(_) => self
                .metadata
                .dimensions(cube)?
                .iter()
                .cloned()
                .map(SchemaObject::Dimension)
                .collect(),
            SchemaObject::Dimension(dimension) => self
                .metadata
                .hierarchies(cube, dimension)?
                .iter()
                .cloned()
                .map(SchemaObject::Hierarchy)
                .collect(),
            SchemaObject::Hierarchy(hierarchy) => self
                .metadata
                .levels(cube, hierarchy)?
                .iter()
                .cloned()
                .map(SchemaObject::Level)
                .collect(),
            SchemaObject::Level(level) => self
                .level_members(cube, level)?
                .into_iter()
                .map(SchemaObject::Member)
                .collect(),
            SchemaObject::Member(member) => self
                .member_children(cube, member)?
                .into_iter()
                .map(SchemaObject::Member)
                .collect(),
        })
    }

    /// Returns the members of `level`. The members of the measures level are the measures of the
    /// cube.
    pub(crate) fn level_members(&self, cube: &Cube, level: &Level) -> OlapResult<Vec<Arc<Member>>> {
        let measures = self
            .metadata
            .measures(cube)?
            .iter()
            .filter(|m| m.level_unique_name == level.unique_name())
            .cloned()
            .collect::<Vec<_>>();
        if !measures.is_empty() {
            return Ok(measures);
        }
        Ok(self.metadata.members(cube, level)?.to_vec())
    }

    /// Returns the members of the next level whose parent is `member`.
    fn member_children(&self, cube: &Cube, member: &Member) -> OlapResult<Vec<Arc<Member>>> {
        if member.is_measure() {
            return Ok(Vec::new());
        }
        let hierarchy = self.metadata.hierarchy(cube, &member.hierarchy_unique_name)?;
        let levels = self.metadata.levels(cube, &hierarchy)?;
        let Some(child_level) = levels.iter().find(|l| l.depth == member.level_depth + 1) else {
            return Ok(Vec::new());
        };
        Ok(self
            .metadata
            .members(cube, child_level)?
            .iter()
            .filter(|child| child.parent_unique_name.as_deref() == Some(member.unique_name()))
            .cloned()
            .collect())
    }
}
