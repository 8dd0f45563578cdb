use crate::EvaluatedValue;
use rdf_olap_model::metadata::{Cube, Member, MetadataObject};
use std::sync::Arc;

/// The state that is threaded through the evaluation of a parse tree.
///
/// The context is immutable. Evaluating a definition or a `Filter` creates a new context that
/// shares the remaining state with its parent.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    cube: Option<Arc<Cube>>,
    calculated_members: Vec<Arc<Member>>,
    named_sets: Vec<(String, Arc<EvaluatedValue>)>,
    current_member: Option<Arc<EvaluatedValue>>,
}

impl EvaluationContext {
    /// Creates a context for evaluating expressions against `cube`.
    pub fn new(cube: Arc<Cube>) -> Self {
        Self {
            cube: Some(cube),
            ..Self::default()
        }
    }

    /// The cube of the `FROM` clause.
    pub fn cube(&self) -> Option<&Arc<Cube>> {
        self.cube.as_ref()
    }

    /// The members defined with `WITH MEMBER`, in definition order.
    pub fn calculated_members(&self) -> &[Arc<Member>] {
        &self.calculated_members
    }

    /// Returns the calculated member with the given unique name.
    pub fn calculated_member(&self, unique_name: &str) -> Option<&Arc<Member>> {
        self.calculated_members
            .iter()
            .find(|m| m.unique_name() == unique_name)
    }

    /// Returns the set defined with `WITH SET` under the given unique name.
    pub fn named_set(&self, unique_name: &str) -> Option<&EvaluatedValue> {
        self.named_sets
            .iter()
            .rev()
            .find(|(name, _)| name == unique_name)
            .map(|(_, value)| value.as_ref())
    }

    /// The element that is currently tested by `Filter`. Absent outside of a `Filter`.
    pub fn current_member(&self) -> Option<&EvaluatedValue> {
        self.current_member.as_deref()
    }

    #[must_use]
    pub fn with_calculated_member(&self, member: Arc<Member>) -> Self {
        let mut result = self.clone();
        result.calculated_members.push(member);
        result
    }

    #[must_use]
    pub fn with_named_set(&self, unique_name: impl Into<String>, value: EvaluatedValue) -> Self {
        let mut result = self.clone();
        result
            .named_sets
            .push((unique_name.into(), Arc::new(value)));
        result
    }

    #[must_use]
    pub fn with_current_member(&self, value: EvaluatedValue) -> Self {
        Self {
            current_member: Some(Arc::new(value)),
            ..self.clone()
        }
    }
}
