//! Graphviz export of the subgraph behind a node.

use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::ops::traits::MatNumeric;
use std::fmt::Write;

/// Layout direction of the exported graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    #[default]
    LeftRight,
    TopBottom,
}

impl RankDir {
    fn as_str(self) -> &'static str {
        match self {
            RankDir::LeftRight => "LR",
            RankDir::TopBottom => "TB",
        }
    }
}

/// Renders every node reachable from `root` (tracked or not) as DOT text.
///
/// Each node becomes a record showing its label, shape and, for `1 x 1`
/// nodes, its value. Op results get an extra ellipse naming the op, with
/// edges `parent -> op -> result`. The graph is only read.
pub fn to_dot<T: MatNumeric>(graph: &Graph<T>, root: NodeId, rankdir: RankDir) -> Result<String, MatGradError> {
    let order = reachable(graph, root)?;

    let mut dot = String::from("digraph {\n");
    push_line(&mut dot, format_args!("  rankdir={};", rankdir.as_str()))?;
    for &id in &order {
        let node = graph.node(id)?;
        let (rows, cols) = node.shape();
        let mut fields = vec![escape(node.label()), format!("{} x {}", rows, cols)];
        if node.value().is_scalar() {
            fields.push(format!("value {:.4}", node.value()[(0, 0)]));
        }
        if let Some(grad) = node.gradient().filter(|g| g.is_scalar()) {
            fields.push(format!("grad {:.4}", grad[(0, 0)]));
        }
        push_line(
            &mut dot,
            format_args!("  n{} [shape=record, label=\"{{ {} }}\"];", id.index(), fields.join(" | ")),
        )?;
        if !node.is_leaf() {
            push_line(
                &mut dot,
                format_args!("  n{}_op [label=\"{}\"];", id.index(), escape(node.op_tag())),
            )?;
            push_line(&mut dot, format_args!("  n{}_op -> n{};", id.index(), id.index()))?;
            for parent in node.parents() {
                push_line(&mut dot, format_args!("  n{} -> n{}_op;", parent.index(), id.index()))?;
            }
        }
    }
    dot.push_str("}\n");
    Ok(dot)
}

fn push_line(dot: &mut String, line: std::fmt::Arguments<'_>) -> Result<(), MatGradError> {
    dot.write_fmt(line)
        .and_then(|_| dot.write_char('\n'))
        .map_err(|e| MatGradError::InternalError(format!("DOT formatting failed: {}", e)))
}

/// Characters with a meaning inside record labels.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '"' | '{' | '}' | '|' | '<' | '>' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Every node reachable from `root` through parent edges, in creation order.
fn reachable<T: MatNumeric>(graph: &Graph<T>, root: NodeId) -> Result<Vec<NodeId>, MatGradError> {
    graph.node(root)?;
    let mut seen = vec![false; root.index() + 1];
    let mut stack = vec![root];
    let mut found = Vec::new();
    while let Some(id) = stack.pop() {
        if seen[id.index()] {
            continue;
        }
        seen[id.index()] = true;
        found.push(id);
        for &parent in graph.node(id)?.parents() {
            if !seen[parent.index()] {
                stack.push(parent);
            }
        }
    }
    found.sort();
    Ok(found)
}
