use crate::model::{Arena, Member, Namespace, NamespaceId, TypeDef, TypeId};

/// Trait that each reflection backend must implement.
///
/// The traversal, classifier, and graph builder depend only on this
/// abstraction; where the entities come from (a precomputed manifest, a
/// synthetic fixture, ...) is the backend's business.
pub trait ReflectionSource {
    /// Resolve a namespace handle.
    fn namespace(&self, id: NamespaceId) -> &Namespace;

    /// Resolve a type handle.
    fn type_def(&self, id: TypeId) -> &TypeDef;

    /// Enumerate the named members of a namespace, in declaration order.
    fn members(&self, id: NamespaceId) -> &[Member];
}

impl ReflectionSource for Arena {
    fn namespace(&self, id: NamespaceId) -> &Namespace {
        Arena::namespace(self, id)
    }

    fn type_def(&self, id: TypeId) -> &TypeDef {
        Arena::type_def(self, id)
    }

    fn members(&self, id: NamespaceId) -> &[Member] {
        &Arena::namespace(self, id).members
    }
}
