use classmap_core::graph::TypeGraph;

/// Serialize an inheritance graph as a Graphviz DOT document.
///
/// Line-oriented and byte-identical across runs for the same graph: one node
/// statement per type in ascending identifier order, then one edge statement
/// per base → derived edge in builder order.
pub fn render(graph: &TypeGraph) -> String {
    let mut out = String::new();
    out.push_str("digraph G {\n");
    out.push_str("rankdir=LR;\n");
    for (idx, node) in graph.nodes() {
        out.push_str(&format!("t{} [label=\"{}\"];\n", idx.index(), node.label()));
    }
    for (base, derived) in graph.edges() {
        out.push_str(&format!("t{} -> t{};\n", base.index(), derived.index()));
    }
    out.push_str("}\n");
    out
}
