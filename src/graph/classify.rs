//! Value classification strategies.

use serde::Deserialize;

use super::value::{GraphValue, NodeValue, RelationshipValue};

/// Outcome of classifying one database value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Classified<'v> {
	/// Drawn as a node.
	Node(&'v NodeValue),
	/// Drawn as an edge.
	Relationship(&'v RelationshipValue),
	/// Scalars, lists, paths and anything else; skipped.
	Unrecognized,
}

/// Decides whether a value is a node, a relationship, or neither.
pub trait ClassifyValue {
	/// Classifies `value`, borrowing its payload.
	fn classify<'v, V: GraphValue + ?Sized>(&self, value: &'v V) -> Classified<'v>;
}

/// Trusts the value's capability checks.
#[derive(Clone, Copy, Debug, Default)]
pub struct CapabilityProbe;

impl ClassifyValue for CapabilityProbe {
	fn classify<'v, V: GraphValue + ?Sized>(&self, value: &'v V) -> Classified<'v> {
		if let Some(node) = value.as_node() {
			Classified::Node(node)
		} else if let Some(rel) = value.as_relationship() {
			Classified::Relationship(rel)
		} else {
			Classified::Unrecognized
		}
	}
}

/// Trusts the value's type tag; capabilities are only used to read the payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct TagProbe;

impl ClassifyValue for TagProbe {
	fn classify<'v, V: GraphValue + ?Sized>(&self, value: &'v V) -> Classified<'v> {
		let classified = match value.type_name() {
			"Node" => value.as_node().map(Classified::Node),
			"Relationship" => value.as_relationship().map(Classified::Relationship),
			_ => None,
		};
		classified.unwrap_or(Classified::Unrecognized)
	}
}

/// Strategy selected at runtime from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classifier {
	/// [`CapabilityProbe`].
	#[default]
	Capability,
	/// [`TagProbe`].
	Tag,
}

impl ClassifyValue for Classifier {
	fn classify<'v, V: GraphValue + ?Sized>(&self, value: &'v V) -> Classified<'v> {
		match self {
			Classifier::Capability => CapabilityProbe.classify(value),
			Classifier::Tag => TagProbe.classify(value),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::value::DbValue;
	use serde_json::json;

	/// Path-like value that can be read as its first node but is tagged "Path".
	struct PathValue {
		head: NodeValue,
	}

	impl GraphValue for PathValue {
		fn type_name(&self) -> &str {
			"Path"
		}

		fn as_node(&self) -> Option<&NodeValue> {
			Some(&self.head)
		}

		fn as_relationship(&self) -> Option<&RelationshipValue> {
			None
		}
	}

	#[test]
	fn strategies_agree_on_driver_values() {
		let values = [
			DbValue::from(NodeValue::new(1)),
			DbValue::from(RelationshipValue::new(2, 1, 3, "KNOWS")),
			DbValue::from(json!("scalar")),
		];
		for value in &values {
			assert_eq!(CapabilityProbe.classify(value), TagProbe.classify(value));
		}
		assert!(matches!(
			CapabilityProbe.classify(&values[0]),
			Classified::Node(n) if n.identity == 1
		));
		assert!(matches!(
			TagProbe.classify(&values[1]),
			Classified::Relationship(r) if r.identity == 2
		));
		assert_eq!(TagProbe.classify(&values[2]), Classified::Unrecognized);
	}

	#[test]
	fn strategies_differ_when_tag_and_capability_disagree() {
		let path = PathValue {
			head: NodeValue::new(9),
		};
		assert!(matches!(CapabilityProbe.classify(&path), Classified::Node(_)));
		assert_eq!(TagProbe.classify(&path), Classified::Unrecognized);
	}

	#[test]
	fn configured_classifier_dispatches() {
		let path = PathValue {
			head: NodeValue::new(9),
		};
		assert!(matches!(Classifier::Capability.classify(&path), Classified::Node(_)));
		assert_eq!(Classifier::Tag.classify(&path), Classified::Unrecognized);
	}

	#[test]
	fn classifier_deserializes_from_config_names() {
		let tag: Classifier = serde_json::from_str("\"tag\"").unwrap();
		assert_eq!(tag, Classifier::Tag);
		let cap: Classifier = serde_json::from_str("\"capability\"").unwrap();
		assert_eq!(cap, Classifier::Capability);
	}
}
