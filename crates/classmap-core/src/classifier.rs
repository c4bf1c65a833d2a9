use thiserror::Error;

use crate::model::{Member, MemberRef};
use crate::source::ReflectionSource;

#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Caller handed the classifier a member that is neither a namespace
    /// nor a type. A contract violation, not a runtime condition.
    #[error("member `{name}` is neither a namespace nor a type")]
    UnsupportedKind { name: String },
}

/// Decides membership in the target library by namespace-name prefix.
///
/// A namespace belongs iff its qualified name is the library root or starts
/// with `root.`. A type belongs iff its *defining* namespace does — so a
/// re-exported alias is classified by where it is defined, not where it is
/// referenced from.
pub struct LibraryClassifier {
    root: String,
}

impl LibraryClassifier {
    pub fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
        }
    }

    fn name_in_library(&self, qname: &str) -> bool {
        qname == self.root
            || (qname.starts_with(&self.root) && qname.as_bytes().get(self.root.len()) == Some(&b'.'))
    }

    /// Whether a namespace or type member belongs to the target library.
    ///
    /// `MemberRef::Other` is a caller defect and yields `UnsupportedKind`.
    pub fn belongs_to_library(
        &self,
        source: &dyn ReflectionSource,
        member: &Member,
    ) -> Result<bool, ClassifyError> {
        match member.referent {
            MemberRef::Namespace(ns) => Ok(self.name_in_library(&source.namespace(ns).qname)),
            MemberRef::Type(ty) => {
                let defining = source.type_def(ty).namespace;
                Ok(self.name_in_library(&source.namespace(defining).qname))
            }
            MemberRef::Other => Err(ClassifyError::UnsupportedKind {
                name: member.name.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Arena;

    fn member(name: &str, referent: MemberRef) -> Member {
        Member {
            name: name.to_string(),
            referent,
        }
    }

    #[test]
    fn test_namespace_prefix_matching() {
        let mut arena = Arena::new();
        let root = arena.add_namespace("lib");
        let sub = arena.add_namespace("lib.m");
        let lookalike = arena.add_namespace("libx.m");
        let foreign = arena.add_namespace("other");

        let classifier = LibraryClassifier::new("lib");
        let check = |ns| {
            classifier
                .belongs_to_library(&arena, &member("n", MemberRef::Namespace(ns)))
                .unwrap()
        };

        assert!(check(root));
        assert!(check(sub));
        assert!(!check(lookalike), "`libx` must not match prefix `lib`");
        assert!(!check(foreign));
    }

    #[test]
    fn test_type_classified_by_defining_namespace() {
        let mut arena = Arena::new();
        let inside = arena.add_namespace("lib.m");
        let outside = arena.add_namespace("vendor.base");
        let own = arena.add_type("A", inside, vec![]);
        // Re-exported from lib but defined elsewhere.
        let alias = arena.add_type("X", outside, vec![]);

        let classifier = LibraryClassifier::new("lib");
        assert!(classifier
            .belongs_to_library(&arena, &member("A", MemberRef::Type(own)))
            .unwrap());
        assert!(!classifier
            .belongs_to_library(&arena, &member("X", MemberRef::Type(alias)))
            .unwrap());
    }

    #[test]
    fn test_other_member_is_unsupported() {
        let arena = Arena::new();
        let classifier = LibraryClassifier::new("lib");
        let err = classifier
            .belongs_to_library(&arena, &member("some_fn", MemberRef::Other))
            .unwrap_err();
        assert!(matches!(err, ClassifyError::UnsupportedKind { ref name } if name == "some_fn"));
    }
}
