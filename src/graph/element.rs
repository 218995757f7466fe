//! Renderer-ready visualization elements.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value as Json;

use super::value::{NodeValue, RelationshipValue};

const NODE_PREFIX: &str = "node_";
const EDGE_PREFIX: &str = "edge_";

/// Element id of the node with the given database identity.
pub fn node_id(identity: i64) -> String {
	format!("{NODE_PREFIX}{identity}")
}

/// Element id of the relationship with the given database identity.
pub fn edge_id(identity: i64) -> String {
	format!("{EDGE_PREFIX}{identity}")
}

/// Database identity encoded in a node element id.
pub fn node_identity(id: &str) -> Option<i64> {
	id.strip_prefix(NODE_PREFIX)?.parse().ok()
}

/// Which half of the set an element belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementGroup {
	/// Node elements.
	Nodes,
	/// Relationship elements.
	Edges,
}

/// A drawable node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeElement {
	/// `node_<identity>`.
	pub id: String,
	/// The `name` property, path prefix stripped.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// The `type` property.
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub node_type: Option<String>,
}

impl NodeElement {
	/// Shapes a database node. A `name` that looks like a path keeps only its
	/// last segment.
	pub fn from_value(node: &NodeValue) -> Self {
		Self {
			id: node_id(node.identity),
			name: node.properties.get("name").map(display_name),
			node_type: node.properties.get("type").map(json_text),
		}
	}
}

/// A drawable edge.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeElement {
	/// `edge_<identity>`.
	pub id: String,
	/// Id of the start node.
	pub source: String,
	/// Id of the end node.
	pub target: String,
	/// Relationship type.
	#[serde(rename = "type")]
	pub edge_type: String,
}

impl EdgeElement {
	/// Shapes a database relationship.
	pub fn from_value(rel: &RelationshipValue) -> Self {
		Self {
			id: edge_id(rel.identity),
			source: node_id(rel.start),
			target: node_id(rel.end),
			edge_type: rel.rel_type.clone(),
		}
	}
}

fn json_text(value: &Json) -> String {
	match value {
		Json::String(s) => s.clone(),
		other => other.to_string(),
	}
}

fn display_name(value: &Json) -> String {
	let text = json_text(value);
	if text.starts_with('/') {
		text.rsplit('/').next().unwrap_or_default().to_string()
	} else {
		text
	}
}

/// A node or an edge.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "group")]
pub enum VisElement {
	/// A node.
	#[serde(rename = "nodes")]
	Node(NodeElement),
	/// An edge.
	#[serde(rename = "edges")]
	Edge(EdgeElement),
}

impl VisElement {
	/// Unique id within a set.
	pub fn id(&self) -> &str {
		match self {
			VisElement::Node(n) => &n.id,
			VisElement::Edge(e) => &e.id,
		}
	}

	/// Nodes or edges.
	pub fn group(&self) -> ElementGroup {
		match self {
			VisElement::Node(_) => ElementGroup::Nodes,
			VisElement::Edge(_) => ElementGroup::Edges,
		}
	}
}

impl From<NodeElement> for VisElement {
	fn from(node: NodeElement) -> Self {
		VisElement::Node(node)
	}
}

impl From<EdgeElement> for VisElement {
	fn from(edge: EdgeElement) -> Self {
		VisElement::Edge(edge)
	}
}

/// What is currently drawn: an ordered element list with unique ids.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VisualizationSet {
	elements: Vec<VisElement>,
}

impl VisualizationSet {
	/// Empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Collects elements, dropping any whose id was already seen.
	pub fn from_elements(elements: impl IntoIterator<Item = VisElement>) -> Self {
		let mut seen = HashSet::new();
		let elements = elements
			.into_iter()
			.filter(|e| seen.insert(e.id().to_string()))
			.collect();
		Self { elements }
	}

	/// Assembles a set from groups already deduplicated by the caller.
	pub(crate) fn from_groups(nodes: Vec<NodeElement>, edges: Vec<EdgeElement>) -> Self {
		let elements = nodes
			.into_iter()
			.map(VisElement::Node)
			.chain(edges.into_iter().map(VisElement::Edge))
			.collect();
		Self { elements }
	}

	/// Number of elements.
	pub fn len(&self) -> usize {
		self.elements.len()
	}

	/// Whether nothing is drawn.
	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	/// Elements in drawing order.
	pub fn iter(&self) -> impl Iterator<Item = &VisElement> {
		self.elements.iter()
	}

	/// Node elements in drawing order.
	pub fn nodes(&self) -> impl Iterator<Item = &NodeElement> {
		self.elements.iter().filter_map(|e| match e {
			VisElement::Node(n) => Some(n),
			VisElement::Edge(_) => None,
		})
	}

	/// Edge elements in drawing order.
	pub fn edges(&self) -> impl Iterator<Item = &EdgeElement> {
		self.elements.iter().filter_map(|e| match e {
			VisElement::Edge(edge) => Some(edge),
			VisElement::Node(_) => None,
		})
	}

	/// Element with `id`.
	pub fn get(&self, id: &str) -> Option<&VisElement> {
		self.elements.iter().find(|e| e.id() == id)
	}

	/// Whether an element with `id` is drawn.
	pub fn contains(&self, id: &str) -> bool {
		self.get(id).is_some()
	}

	/// Removes every element.
	pub fn clear(&mut self) {
		self.elements.clear();
	}
}

impl<'a> IntoIterator for &'a VisualizationSet {
	type Item = &'a VisElement;
	type IntoIter = std::slice::Iter<'a, VisElement>;

	fn into_iter(self) -> Self::IntoIter {
		self.elements.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn path_names_keep_last_segment() {
		let node = NodeValue::new(1).with_property("name", "/a/b/c");
		assert_eq!(NodeElement::from_value(&node).name.as_deref(), Some("c"));

		let node = NodeValue::new(2).with_property("name", "widget");
		assert_eq!(NodeElement::from_value(&node).name.as_deref(), Some("widget"));

		let node = NodeValue::new(3).with_property("name", "/trailing/");
		assert_eq!(NodeElement::from_value(&node).name.as_deref(), Some(""));
	}

	#[test]
	fn missing_and_non_string_properties() {
		let node = NodeValue::new(4).with_property("name", 42);
		let element = NodeElement::from_value(&node);
		assert_eq!(element.name.as_deref(), Some("42"));
		assert_eq!(element.node_type, None);
		assert_eq!(NodeElement::from_value(&NodeValue::new(5)).name, None);
	}

	#[test]
	fn edge_ids_reference_node_ids() {
		let edge = EdgeElement::from_value(&RelationshipValue::new(9, 5, 6, "MANAGES"));
		assert_eq!(edge.id, "edge_9");
		assert_eq!(edge.source, "node_5");
		assert_eq!(edge.target, "node_6");
		assert_eq!(edge.edge_type, "MANAGES");
	}

	#[test]
	fn node_identity_round_trips_through_ids() {
		assert_eq!(node_identity(&node_id(17)), Some(17));
		assert_eq!(node_identity("edge_17"), None);
		assert_eq!(node_identity("node_x"), None);
	}

	#[test]
	fn serializes_to_renderer_shape() {
		let set = VisualizationSet::from_groups(
			vec![NodeElement {
				id: "node_5".into(),
				name: Some("alice".into()),
				node_type: Some("Person".into()),
			}],
			vec![EdgeElement {
				id: "edge_9".into(),
				source: "node_5".into(),
				target: "node_6".into(),
				edge_type: "MANAGES".into(),
			}],
		);
		assert_eq!(
			serde_json::to_value(&set).unwrap(),
			json!([
				{"group": "nodes", "id": "node_5", "name": "alice", "type": "Person"},
				{"group": "edges", "id": "edge_9", "source": "node_5", "target": "node_6", "type": "MANAGES"},
			])
		);
	}

	#[test]
	fn from_elements_keeps_first_occurrence() {
		let a = NodeElement {
			id: "node_1".into(),
			name: Some("A".into()),
			node_type: None,
		};
		let b = NodeElement {
			name: Some("B".into()),
			..a.clone()
		};
		let set = VisualizationSet::from_elements([a.into(), b.into()]);
		assert_eq!(set.len(), 1);
		assert!(matches!(
			set.get("node_1"),
			Some(VisElement::Node(n)) if n.name.as_deref() == Some("A")
		));
	}
}
