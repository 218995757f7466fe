//! Details for the currently selected element.

use std::collections::HashSet;

use super::element::{ElementGroup, VisElement, VisualizationSet};

/// What the details panel shows about one element of the set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementSummary {
	/// Element id.
	pub id: String,
	/// Node or edge.
	pub group: ElementGroup,
	/// Display name; edges have none.
	pub name: Option<String>,
	/// Node type or relationship type.
	pub element_type: Option<String>,
	/// Edges in the set ending at this node.
	pub incoming: usize,
	/// Edges in the set starting at this node.
	pub outgoing: usize,
	/// Distinct nodes this node shares an edge with.
	pub neighbours: usize,
}

/// Summarizes the element `id` against the rest of `set`.
///
/// Edge summaries carry their endpoints as the only neighbours.
pub fn summarize(set: &VisualizationSet, id: &str) -> Option<ElementSummary> {
	match set.get(id)? {
		VisElement::Node(node) => {
			let mut neighbours = HashSet::new();
			let (mut incoming, mut outgoing) = (0, 0);
			for edge in set.edges() {
				if edge.target == node.id {
					incoming += 1;
					neighbours.insert(edge.source.as_str());
				}
				if edge.source == node.id {
					outgoing += 1;
					neighbours.insert(edge.target.as_str());
				}
			}
			neighbours.remove(node.id.as_str());
			Some(ElementSummary {
				id: node.id.clone(),
				group: ElementGroup::Nodes,
				name: node.name.clone(),
				element_type: node.node_type.clone(),
				incoming,
				outgoing,
				neighbours: neighbours.len(),
			})
		}
		VisElement::Edge(edge) => Some(ElementSummary {
			id: edge.id.clone(),
			group: ElementGroup::Edges,
			name: None,
			element_type: Some(edge.edge_type.clone()),
			incoming: 0,
			outgoing: 0,
			neighbours: if edge.source == edge.target { 1 } else { 2 },
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::element::{EdgeElement, NodeElement};

	fn node(id: &str) -> VisElement {
		VisElement::Node(NodeElement {
			id: id.into(),
			name: Some(id.trim_start_matches("node_").into()),
			node_type: Some("VirtualMachine".into()),
		})
	}

	fn edge(id: &str, source: &str, target: &str) -> VisElement {
		VisElement::Edge(EdgeElement {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			edge_type: "CONNECTS".into(),
		})
	}

	#[test]
	fn counts_incoming_and_outgoing_edges() {
		let set = VisualizationSet::from_elements([
			node("node_1"),
			node("node_2"),
			node("node_3"),
			edge("edge_1", "node_1", "node_2"),
			edge("edge_2", "node_3", "node_1"),
			edge("edge_3", "node_1", "node_3"),
			edge("edge_4", "node_1", "node_1"),
		]);
		let summary = summarize(&set, "node_1").unwrap();
		assert_eq!(summary.incoming, 2);
		assert_eq!(summary.outgoing, 3);
		assert_eq!(summary.neighbours, 2);
		assert_eq!(summary.name.as_deref(), Some("1"));
		assert_eq!(summary.group, ElementGroup::Nodes);
	}

	#[test]
	fn edge_summary_and_missing_ids() {
		let set = VisualizationSet::from_elements([edge("edge_1", "node_1", "node_2")]);
		let summary = summarize(&set, "edge_1").unwrap();
		assert_eq!(summary.group, ElementGroup::Edges);
		assert_eq!(summary.element_type.as_deref(), Some("CONNECTS"));
		assert_eq!(summary.neighbours, 2);
		assert!(summarize(&set, "node_9").is_none());
	}
}
