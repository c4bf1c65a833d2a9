use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::model::TypeId;
use crate::source::ReflectionSource;
use crate::walker::DiscoveredSet;

/// Node in the inheritance graph.
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub type_id: TypeId,
    /// Qualified name of the defining namespace.
    pub namespace: String,
    pub name: String,
}

impl TypeNode {
    /// Display label: the qualified name with the library's own root segment
    /// stripped, so labels read as `sub.path.TypeName`. A type defined
    /// directly in the root namespace is labeled by its bare name.
    pub fn label(&self) -> String {
        match self.namespace.split_once('.') {
            Some((_, rest)) => format!("{rest}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Directed inheritance graph over a discovered set of types.
///
/// Nodes are inserted in sorted key order, so the petgraph `NodeIndex` of a
/// node doubles as its dense identifier `0..N-1`. Immutable once built.
pub struct TypeGraph {
    graph: DiGraph<TypeNode, ()>,
    index: HashMap<TypeId, NodeIndex>,
}

impl TypeGraph {
    /// Build the graph from a discovered set.
    ///
    /// Determinism: types are sorted by (defining-namespace qualified name,
    /// type name) before identifiers are assigned, so identical inputs yield
    /// identical node ids and edge lists regardless of set iteration order.
    /// Edges run base → derived and exist only when both endpoints were
    /// discovered; foreign bases are dropped.
    pub fn build(source: &dyn ReflectionSource, discovered: &DiscoveredSet) -> Self {
        let mut ordered: Vec<TypeId> = discovered.iter().copied().collect();
        ordered.sort_by(|a, b| {
            let ta = source.type_def(*a);
            let tb = source.type_def(*b);
            let ka = (&source.namespace(ta.namespace).qname, &ta.name);
            let kb = (&source.namespace(tb.namespace).qname, &tb.name);
            ka.cmp(&kb)
        });

        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for &ty in &ordered {
            let def = source.type_def(ty);
            let node = TypeNode {
                type_id: ty,
                namespace: source.namespace(def.namespace).qname.clone(),
                name: def.name.clone(),
            };
            index.insert(ty, graph.add_node(node));
        }

        for &ty in &ordered {
            let derived = index[&ty];
            for base in &source.type_def(ty).bases {
                if let Some(&base_idx) = index.get(base) {
                    graph.add_edge(base_idx, derived, ());
                }
            }
        }

        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in ascending identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &TypeNode)> {
        self.graph.node_indices().map(|idx| (idx, &self.graph[idx]))
    }

    /// Edges as (base, derived) pairs, in the order they were produced.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.graph.edge_references().map(|e| (e.source(), e.target()))
    }

    /// Dense identifier of a discovered type, if present.
    pub fn node_id(&self, ty: TypeId) -> Option<NodeIndex> {
        self.index.get(&ty).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LibraryClassifier;
    use crate::model::{Arena, MemberRef, TypeId};
    use crate::walker::discover;

    /// The lib/m/A/B scenario with an external base X.
    fn scenario() -> (Arena, DiscoveredSet, TypeId, TypeId) {
        let mut arena = Arena::new();
        let root = arena.add_namespace("lib");
        let m = arena.add_namespace("lib.m");
        let ext = arena.add_namespace("ext");

        let x = arena.add_type("X", ext, vec![]);
        let a = arena.add_type("A", m, vec![x]);
        let b = arena.add_type("B", m, vec![a]);

        arena.add_member(root, "m", MemberRef::Namespace(m));
        arena.add_member(m, "A", MemberRef::Type(a));
        arena.add_member(m, "B", MemberRef::Type(b));

        let classifier = LibraryClassifier::new("lib");
        let discovered = discover(&arena, root, &classifier).unwrap();
        (arena, discovered, a, b)
    }

    #[test]
    fn test_ids_assigned_in_sorted_order() {
        let (arena, discovered, a, b) = scenario();
        let graph = TypeGraph::build(&arena, &discovered);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node_id(a).unwrap().index(), 0);
        assert_eq!(graph.node_id(b).unwrap().index(), 1);
    }

    #[test]
    fn test_foreign_bases_dropped() {
        let (arena, discovered, a, b) = scenario();
        let graph = TypeGraph::build(&arena, &discovered);

        // A's base X is outside the library: only the A -> B edge survives.
        let edges: Vec<(usize, usize)> = graph
            .edges()
            .map(|(s, t)| (s.index(), t.index()))
            .collect();
        assert_eq!(
            edges,
            vec![(
                graph.node_id(a).unwrap().index(),
                graph.node_id(b).unwrap().index()
            )]
        );
    }

    #[test]
    fn test_isolated_nodes_kept() {
        let mut arena = Arena::new();
        let m = arena.add_namespace("lib.m");
        let lone = arena.add_type("Lone", m, vec![]);
        let discovered: DiscoveredSet = [lone].into_iter().collect();

        let graph = TypeGraph::build(&arena, &discovered);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_deterministic_regardless_of_set_order() {
        let mut arena = Arena::new();
        let m = arena.add_namespace("lib.m");
        let n = arena.add_namespace("lib.a");
        let mut ids = Vec::new();
        for i in 0..8 {
            let ns = if i % 2 == 0 { m } else { n };
            let bases = if i >= 2 { vec![ids[i - 2]] } else { vec![] };
            ids.push(arena.add_type(&format!("T{i}"), ns, bases));
        }

        let forward: DiscoveredSet = ids.iter().copied().collect();
        let reversed: DiscoveredSet = ids.iter().rev().copied().collect();
        let g1 = TypeGraph::build(&arena, &forward);
        let g2 = TypeGraph::build(&arena, &reversed);

        let nodes = |g: &TypeGraph| {
            g.nodes()
                .map(|(idx, n)| (idx.index(), n.type_id))
                .collect::<Vec<_>>()
        };
        let edges = |g: &TypeGraph| {
            g.edges()
                .map(|(s, t)| (s.index(), t.index()))
                .collect::<Vec<_>>()
        };
        assert_eq!(nodes(&g1), nodes(&g2));
        assert_eq!(edges(&g1), edges(&g2));
    }

    #[test]
    fn test_no_dangling_edge_endpoints() {
        let (arena, discovered, ..) = scenario();
        let graph = TypeGraph::build(&arena, &discovered);
        for (s, t) in graph.edges() {
            assert!(s.index() < graph.node_count());
            assert!(t.index() < graph.node_count());
        }
    }

    #[test]
    fn test_label_strips_root_segment() {
        let mut arena = Arena::new();
        let ns = arena.add_namespace("x");
        let ty = arena.add_type("T", ns, vec![]);

        let nested = TypeNode {
            type_id: ty,
            namespace: "lib.m.sub".to_string(),
            name: "A".to_string(),
        };
        assert_eq!(nested.label(), "m.sub.A");

        let at_root = TypeNode {
            type_id: ty,
            namespace: "lib".to_string(),
            name: "B".to_string(),
        };
        assert_eq!(at_root.label(), "B");
    }
}
