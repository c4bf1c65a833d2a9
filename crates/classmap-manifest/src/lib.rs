//! Reflection manifests: a precomputed JSON description of a library's
//! namespace tree, produced by a separate indexing step running inside the
//! host language. Loading resolves every cross-reference to an arena slot
//! once, so the core never deals in names when walking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use classmap_core::model::{Arena, MemberRef, NamespaceId};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate namespace `{name}` in manifest")]
    DuplicateNamespace { name: String },
    #[error("duplicate type `{name}` in manifest")]
    DuplicateType { name: String },
    #[error("member `{member}` of `{namespace}` references unknown namespace `{target}`")]
    UnknownNamespace {
        namespace: String,
        member: String,
        target: String,
    },
    #[error("`{referrer}` references unknown type `{target}`")]
    UnknownType { referrer: String, target: String },
    #[error("type `{name}` declared in unknown namespace `{namespace}`")]
    UnknownDefiningNamespace { name: String, namespace: String },
    #[error("member `{member}` of `{namespace}` has kind `{kind}` but no target")]
    MissingTarget {
        namespace: String,
        member: String,
        kind: String,
    },
    #[error("root namespace `{name}` not present in manifest")]
    MissingRoot { name: String },
}

#[derive(Debug, Deserialize)]
struct ManifestDoc {
    library: String,
    root: String,
    #[serde(default)]
    namespaces: Vec<NamespaceDoc>,
    #[serde(default)]
    types: Vec<TypeDoc>,
}

#[derive(Debug, Deserialize)]
struct NamespaceDoc {
    name: String,
    #[serde(default)]
    members: Vec<MemberDoc>,
}

#[derive(Debug, Deserialize)]
struct MemberDoc {
    name: String,
    kind: MemberKindDoc,
    #[serde(default)]
    target: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MemberKindDoc {
    Namespace,
    Type,
    Other,
}

#[derive(Debug, Deserialize)]
struct TypeDoc {
    name: String,
    namespace: String,
    #[serde(default)]
    bases: Vec<String>,
}

/// A loaded manifest: the arena of entities plus the library identity.
#[derive(Debug)]
pub struct Manifest {
    /// Library root prefix used for membership classification.
    pub library: String,
    /// Namespace the traversal starts from.
    pub root: NamespaceId,
    pub arena: Arena,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(json: &str) -> Result<Self, ManifestError> {
        let doc: ManifestDoc = serde_json::from_str(json)?;
        let mut arena = Arena::new();

        // Pass 1: allocate every namespace slot.
        let mut ns_ids: HashMap<String, NamespaceId> = HashMap::new();
        for ns in &doc.namespaces {
            if ns_ids.contains_key(&ns.name) {
                return Err(ManifestError::DuplicateNamespace {
                    name: ns.name.clone(),
                });
            }
            ns_ids.insert(ns.name.clone(), arena.add_namespace(&ns.name));
        }

        // Pass 2: allocate every type slot; bases resolved afterwards since a
        // base may be declared later in the document.
        let mut ty_ids = HashMap::new();
        for ty in &doc.types {
            let ns = *ns_ids.get(&ty.namespace).ok_or_else(|| {
                ManifestError::UnknownDefiningNamespace {
                    name: ty.name.clone(),
                    namespace: ty.namespace.clone(),
                }
            })?;
            let full_name = format!("{}.{}", ty.namespace, ty.name);
            if ty_ids.contains_key(&full_name) {
                return Err(ManifestError::DuplicateType { name: full_name });
            }
            ty_ids.insert(full_name, arena.add_type(&ty.name, ns, vec![]));
        }

        // Pass 3: base lists, in declaration order.
        for ty in &doc.types {
            let full_name = format!("{}.{}", ty.namespace, ty.name);
            let bases = ty
                .bases
                .iter()
                .map(|base| {
                    ty_ids
                        .get(base)
                        .copied()
                        .ok_or_else(|| ManifestError::UnknownType {
                            referrer: full_name.clone(),
                            target: base.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            arena.set_bases(ty_ids[&full_name], bases);
        }

        // Pass 4: namespace member lists.
        for ns in &doc.namespaces {
            let ns_id = ns_ids[&ns.name];
            for member in &ns.members {
                let referent = match member.kind {
                    MemberKindDoc::Namespace => {
                        let target = required_target(&ns.name, member, "namespace")?;
                        MemberRef::Namespace(*ns_ids.get(target).ok_or_else(|| {
                            ManifestError::UnknownNamespace {
                                namespace: ns.name.clone(),
                                member: member.name.clone(),
                                target: target.clone(),
                            }
                        })?)
                    }
                    MemberKindDoc::Type => {
                        let target = required_target(&ns.name, member, "type")?;
                        MemberRef::Type(*ty_ids.get(target).ok_or_else(|| {
                            ManifestError::UnknownType {
                                referrer: format!("{}.{}", ns.name, member.name),
                                target: target.clone(),
                            }
                        })?)
                    }
                    MemberKindDoc::Other => MemberRef::Other,
                };
                arena.add_member(ns_id, &member.name, referent);
            }
        }

        let root = arena
            .find_namespace(&doc.root)
            .ok_or_else(|| ManifestError::MissingRoot {
                name: doc.root.clone(),
            })?;

        debug!(
            library = %doc.library,
            namespaces = arena.namespace_count(),
            types = arena.type_count(),
            "loaded manifest"
        );

        Ok(Self {
            library: doc.library,
            root,
            arena,
        })
    }
}

fn required_target<'a>(
    namespace: &str,
    member: &'a MemberDoc,
    kind: &str,
) -> Result<&'a String, ManifestError> {
    member
        .target
        .as_ref()
        .ok_or_else(|| ManifestError::MissingTarget {
            namespace: namespace.to_string(),
            member: member.name.clone(),
            kind: kind.to_string(),
        })
}
