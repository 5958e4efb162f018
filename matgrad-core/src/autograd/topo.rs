use crate::error::MatGradError;
use crate::graph::{Graph, NodeId};
use crate::ops::traits::MatNumeric;

/// Post-order DFS from `root` along parent edges.
///
/// Every node appears after all of its parents, so walking the result in
/// reverse visits each node before anything it depends on. Visited flags are
/// indexed by arena position, which keeps the order deterministic. Subgraphs
/// that do not require gradients are not entered.
pub(crate) fn topological_sort<T: MatNumeric>(
    graph: &Graph<T>,
    root: NodeId,
) -> Result<Vec<NodeId>, MatGradError> {
    let mut visited = vec![false; graph.len()];
    let mut order = Vec::new();
    // (node, parents already pushed)
    let mut stack: Vec<(NodeId, bool)> = vec![(root, false)];

    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            order.push(id);
            continue;
        }
        let node = graph.node(id)?;
        if visited[id.index()] {
            continue;
        }
        visited[id.index()] = true;
        stack.push((id, true));
        for &parent in node.parents().iter().rev() {
            let parent_node = graph.node(parent)?;
            if parent_node.requires_grad() && !visited[parent.index()] {
                stack.push((parent, false));
            }
        }
    }
    Ok(order)
}
