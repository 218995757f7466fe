//! Database values as handed over by a graph driver.
//!
//! These are the opaque inputs of the normalizer. A driver decodes its wire
//! format into [`Record`]s of [`DbValue`]s; the normalizer only ever looks at
//! them through the [`GraphValue`] capability surface.

use serde_json::{Map, Value as Json};

/// Property map attached to nodes and relationships.
pub type Properties = Map<String, Json>;

/// A vertex returned by the database.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeValue {
	/// Internal identity assigned by the database.
	pub identity: i64,
	/// Node labels, such as `Person`.
	pub labels: Vec<String>,
	/// Stored properties.
	pub properties: Properties,
}

impl NodeValue {
	/// Node without labels or properties.
	pub fn new(identity: i64) -> Self {
		Self {
			identity,
			labels: Vec::new(),
			properties: Properties::new(),
		}
	}

	/// Sets one property.
	pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Json>) -> Self {
		self.properties.insert(key.into(), value.into());
		self
	}

	/// Replaces the labels.
	pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.labels = labels.into_iter().map(Into::into).collect();
		self
	}
}

/// A directed edge returned by the database.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationshipValue {
	/// Internal identity assigned by the database.
	pub identity: i64,
	/// Identity of the start node.
	pub start: i64,
	/// Identity of the end node.
	pub end: i64,
	/// Relationship type, such as `KNOWS`.
	pub rel_type: String,
	/// Stored properties.
	pub properties: Properties,
}

impl RelationshipValue {
	/// Relationship without properties.
	pub fn new(identity: i64, start: i64, end: i64, rel_type: impl Into<String>) -> Self {
		Self {
			identity,
			start,
			end,
			rel_type: rel_type.into(),
			properties: Properties::new(),
		}
	}
}

/// Any value a query column can hold.
#[derive(Clone, Debug, PartialEq)]
pub enum DbValue {
	/// A vertex.
	Node(NodeValue),
	/// An edge.
	Relationship(RelationshipValue),
	/// Scalars, lists, maps and anything else the visualization does not draw.
	Other(Json),
}

impl From<NodeValue> for DbValue {
	fn from(node: NodeValue) -> Self {
		DbValue::Node(node)
	}
}

impl From<RelationshipValue> for DbValue {
	fn from(rel: RelationshipValue) -> Self {
		DbValue::Relationship(rel)
	}
}

impl From<Json> for DbValue {
	fn from(value: Json) -> Self {
		DbValue::Other(value)
	}
}

/// Capability surface the normalizer classifies values through.
///
/// A value can answer two questions: "can you be read as a node / a
/// relationship?" (capability checks) and "what kind of value are you?" (a
/// constructor-style type tag). Which of the two a classifier trusts is up to
/// the [`ClassifyValue`](super::classify::ClassifyValue) strategy.
pub trait GraphValue {
	/// Constructor-style type tag, e.g. `"Node"`, `"Relationship"`, `"String"`.
	fn type_name(&self) -> &str;

	/// The node payload, if this value can be read as one.
	fn as_node(&self) -> Option<&NodeValue>;

	/// The relationship payload, if this value can be read as one.
	fn as_relationship(&self) -> Option<&RelationshipValue>;
}

impl GraphValue for DbValue {
	fn type_name(&self) -> &str {
		match self {
			DbValue::Node(_) => "Node",
			DbValue::Relationship(_) => "Relationship",
			DbValue::Other(Json::Null) => "Null",
			DbValue::Other(Json::Bool(_)) => "Boolean",
			DbValue::Other(Json::Number(_)) => "Number",
			DbValue::Other(Json::String(_)) => "String",
			DbValue::Other(Json::Array(_)) => "List",
			DbValue::Other(Json::Object(_)) => "Map",
		}
	}

	fn as_node(&self) -> Option<&NodeValue> {
		match self {
			DbValue::Node(node) => Some(node),
			_ => None,
		}
	}

	fn as_relationship(&self) -> Option<&RelationshipValue> {
		match self {
			DbValue::Relationship(rel) => Some(rel),
			_ => None,
		}
	}
}

/// One result row: column names paired with their values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
	keys: Vec<String>,
	values: Vec<DbValue>,
}

impl Record {
	/// Builds a record from `(column, value)` pairs, keeping column order.
	pub fn new<K, V>(columns: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<DbValue>,
	{
		let (keys, values) = columns
			.into_iter()
			.map(|(k, v)| -> (String, DbValue) { (k.into(), v.into()) })
			.unzip();
		Self { keys, values }
	}

	/// Column names in order.
	pub fn keys(&self) -> &[String] {
		&self.keys
	}

	/// Value of the named column, if present.
	pub fn get(&self, column: &str) -> Option<&DbValue> {
		self.keys
			.iter()
			.position(|k| k == column)
			.and_then(|i| self.values.get(i))
	}

	/// Values in column order.
	pub fn values(&self) -> impl Iterator<Item = &DbValue> {
		self.values.iter()
	}

	/// `(column, value)` pairs in column order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &DbValue)> {
		self.keys.iter().map(String::as_str).zip(self.values.iter())
	}

	/// Number of columns.
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	/// Whether the row has no columns.
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn record_lookup_by_column() {
		let record = Record::new([
			("n", DbValue::from(NodeValue::new(1))),
			("count", DbValue::from(json!(3))),
		]);
		assert_eq!(record.keys(), ["n", "count"]);
		assert_eq!(record.get("count"), Some(&DbValue::Other(json!(3))));
		assert!(record.get("missing").is_none());
		assert_eq!(record.values().count(), 2);
	}

	#[test]
	fn type_names_follow_value_kind() {
		assert_eq!(DbValue::from(NodeValue::new(1)).type_name(), "Node");
		assert_eq!(
			DbValue::from(RelationshipValue::new(1, 2, 3, "R")).type_name(),
			"Relationship"
		);
		assert_eq!(DbValue::from(json!("x")).type_name(), "String");
		assert_eq!(DbValue::from(json!([1])).type_name(), "List");
		assert_eq!(DbValue::from(json!(null)).type_name(), "Null");
	}

	#[test]
	fn capabilities_only_answer_for_their_kind() {
		let node = DbValue::from(NodeValue::new(7));
		assert!(node.as_node().is_some());
		assert!(node.as_relationship().is_none());

		let scalar = DbValue::from(json!({"a": 1}));
		assert!(scalar.as_node().is_none());
		assert!(scalar.as_relationship().is_none());
	}
}
