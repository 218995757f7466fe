//! Turns query records into a visualization set.
//!
//! Normalization runs in two phases. [`shape`] classifies every value and
//! builds elements; [`normalize`] then deduplicates them and applies the
//! replace/expand policy against what is currently drawn.

use std::collections::HashSet;

use log::debug;

use super::classify::{Classified, ClassifyValue};
use super::element::{EdgeElement, NodeElement, VisualizationSet};
use super::value::Record;

/// How new results combine with the elements already drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueryMode {
	/// Discard the current set.
	#[default]
	Replace,
	/// Union with the current set; freshly fetched elements win on id collision.
	Expand,
}

impl QueryMode {
	/// `Expand` when the merge toggle is on.
	pub fn from_expand(expand: bool) -> Self {
		if expand {
			QueryMode::Expand
		} else {
			QueryMode::Replace
		}
	}
}

/// Result of a normalization pass.
#[derive(Clone, Debug, PartialEq)]
pub enum Normalized {
	/// The query returned no records; the current set stays as it is.
	NoResults,
	/// The set to draw next.
	Updated(VisualizationSet),
}

/// Elements built from records, in encounter order, not yet deduplicated.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Shaped {
	pub nodes: Vec<NodeElement>,
	pub edges: Vec<EdgeElement>,
	/// Number of values that were neither nodes nor relationships.
	pub skipped: usize,
}

/// Classifies every value of every record and shapes the recognized ones.
pub(crate) fn shape<C: ClassifyValue>(classifier: &C, records: &[Record]) -> Shaped {
	let mut shaped = Shaped::default();
	for record in records {
		for (column, value) in record.iter() {
			match classifier.classify(value) {
				Classified::Node(node) => shaped.nodes.push(NodeElement::from_value(node)),
				Classified::Relationship(rel) => shaped.edges.push(EdgeElement::from_value(rel)),
				Classified::Unrecognized => {
					debug!("storm-graph: column {column:?} is not a node or relationship: {value:?}");
					shaped.skipped += 1;
				}
			}
		}
	}
	shaped
}

/// Normalizes `records` against the `current` set.
pub fn normalize<C: ClassifyValue>(
	classifier: &C,
	records: &[Record],
	mode: QueryMode,
	current: &VisualizationSet,
) -> Normalized {
	if records.is_empty() {
		return Normalized::NoResults;
	}

	let Shaped { nodes, edges, .. } = shape(classifier, records);

	let set = match mode {
		QueryMode::Replace => {
			VisualizationSet::from_groups(dedup_by_id(nodes, |n| &n.id), dedup_by_id(edges, |e| &e.id))
		}
		QueryMode::Expand => {
			let nodes = nodes.into_iter().chain(current.nodes().cloned());
			let edges = edges.into_iter().chain(current.edges().cloned());
			VisualizationSet::from_groups(dedup_by_id(nodes, |n| &n.id), dedup_by_id(edges, |e| &e.id))
		}
	};
	Normalized::Updated(set)
}

/// Keeps the first element seen for each id.
fn dedup_by_id<T>(items: impl IntoIterator<Item = T>, id: impl Fn(&T) -> &String) -> Vec<T> {
	let mut seen = HashSet::new();
	items
		.into_iter()
		.filter(|item| seen.insert(id(item).clone()))
		.collect()
}
