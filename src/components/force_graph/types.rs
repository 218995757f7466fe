//! Graph data handed to the force graph component.

use crate::graph::VisualizationSet;

/// A node in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Element id, referenced by links.
	pub id: String,
	/// Display name drawn next to the node.
	pub label: Option<String>,
	/// Node type; picks the fill colour.
	pub group: Option<String>,
}

/// A directed edge between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	/// Element id of the relationship.
	pub id: String,
	/// Id of the start node.
	pub source: String,
	/// Id of the end node.
	pub target: String,
	/// Relationship type drawn along the edge.
	pub label: String,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Nodes, in drawing order.
	pub nodes: Vec<GraphNode>,
	/// Links between `nodes`.
	pub links: Vec<GraphLink>,
}

impl From<&VisualizationSet> for GraphData {
	fn from(set: &VisualizationSet) -> Self {
		Self {
			nodes: set
				.nodes()
				.map(|n| GraphNode {
					id: n.id.clone(),
					label: n.name.clone(),
					group: n.node_type.clone(),
				})
				.collect(),
			links: set
				.edges()
				.map(|e| GraphLink {
					id: e.id.clone(),
					source: e.source.clone(),
					target: e.target.clone(),
					label: e.edge_type.clone(),
				})
				.collect(),
		}
	}
}
