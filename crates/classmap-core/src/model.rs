use std::fmt;

/// Arena slot of a namespace. Identity key for visitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceId(u32);

/// Arena slot of a type. Identity key for deduplication and edges;
/// two distinct types may share a qualified name across namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns{}", self.0)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ty{}", self.0)
    }
}

/// What a named member of a namespace refers to.
///
/// The reflection source resolves the kind once at load time; downstream
/// code only ever matches on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRef {
    Namespace(NamespaceId),
    Type(TypeId),
    /// A value that is neither a namespace nor a type (function, constant, ...).
    Other,
}

/// A named member of a namespace, in declaration order.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub referent: MemberRef,
}

/// A container of named members with a dot-separated qualified name.
#[derive(Debug, Clone)]
pub struct Namespace {
    pub qname: String,
    pub members: Vec<Member>,
}

/// A class-like entity: a name, a defining namespace, and its direct bases
/// in declaration order. Bases may lie outside any discovered set.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: String,
    pub namespace: NamespaceId,
    pub bases: Vec<TypeId>,
}

/// Arena holding every namespace and type known to a reflection source.
///
/// Slots are assigned at first sight and never move, so `NamespaceId` and
/// `TypeId` are stable identity keys for the lifetime of the arena.
#[derive(Debug, Default)]
pub struct Arena {
    namespaces: Vec<Namespace>,
    types: Vec<TypeDef>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_namespace(&mut self, qname: &str) -> NamespaceId {
        let id = NamespaceId(self.namespaces.len() as u32);
        self.namespaces.push(Namespace {
            qname: qname.to_string(),
            members: Vec::new(),
        });
        id
    }

    pub fn add_type(&mut self, name: &str, namespace: NamespaceId, bases: Vec<TypeId>) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeDef {
            name: name.to_string(),
            namespace,
            bases,
        });
        id
    }

    /// Append a named member to a namespace, preserving declaration order.
    pub fn add_member(&mut self, ns: NamespaceId, name: &str, referent: MemberRef) {
        self.namespaces[ns.0 as usize].members.push(Member {
            name: name.to_string(),
            referent,
        });
    }

    /// Set the bases of an already-allocated type. Used when base types are
    /// allocated after their subtypes during loading.
    pub fn set_bases(&mut self, ty: TypeId, bases: Vec<TypeId>) {
        self.types[ty.0 as usize].bases = bases;
    }

    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.0 as usize]
    }

    pub fn type_def(&self, id: TypeId) -> &TypeDef {
        &self.types[id.0 as usize]
    }

    /// Look up a namespace by its qualified name.
    pub fn find_namespace(&self, qname: &str) -> Option<NamespaceId> {
        self.namespaces
            .iter()
            .position(|ns| ns.qname == qname)
            .map(|i| NamespaceId(i as u32))
    }

    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
