use std::collections::HashSet;

use tracing::debug;

use crate::classifier::{ClassifyError, LibraryClassifier};
use crate::model::{MemberRef, NamespaceId, TypeId};
use crate::source::ReflectionSource;

/// Unique types found to belong to the target library, keyed by identity.
pub type DiscoveredSet = HashSet<TypeId>;

/// Walk every namespace reachable from `root` and collect the library's types.
///
/// Each reachable namespace is visited exactly once; the visited set bounds
/// the traversal even when namespaces reference one another cyclically.
/// Members that are neither namespaces nor types are skipped.
pub fn discover(
    source: &dyn ReflectionSource,
    root: NamespaceId,
    classifier: &LibraryClassifier,
) -> Result<DiscoveredSet, ClassifyError> {
    let mut visited: HashSet<NamespaceId> = HashSet::new();
    let mut stack = vec![root];
    visited.insert(root);

    let mut discovered = DiscoveredSet::new();

    while let Some(ns) = stack.pop() {
        debug!(namespace = %source.namespace(ns).qname, "visiting namespace");
        for member in source.members(ns) {
            match member.referent {
                MemberRef::Namespace(sub) => {
                    if classifier.belongs_to_library(source, member)? && visited.insert(sub) {
                        stack.push(sub);
                    }
                }
                MemberRef::Type(ty) => {
                    if classifier.belongs_to_library(source, member)? && discovered.insert(ty) {
                        debug!(
                            name = %member.name,
                            namespace = %source.namespace(ns).qname,
                            "discovered type"
                        );
                    }
                }
                MemberRef::Other => {}
            }
        }
    }

    Ok(discovered)
}
