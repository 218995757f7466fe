//! Application state owned by the UI.
//!
//! [`AppStore`] bundles the session with what is currently drawn and the
//! current selection. Every mutation goes through a named method; the UI holds
//! the store in a local signal and provides it through context.

use log::{debug, info};

use crate::graph::{
	ClassifyValue, ElementSummary, Normalized, QueryMode, Record, VisualizationSet, normalize,
	summarize,
};
use crate::session::{Credentials, KeyValueStore, Session};

/// Identifies one query issued by [`AppStore::begin_query`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryTicket(u64);

/// What applying a query response did to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryOutcome {
	/// The set was replaced; counts describe the new set.
	Applied {
		/// Nodes now drawn.
		nodes: usize,
		/// Edges now drawn.
		edges: usize,
	},
	/// No records came back; nothing changed.
	NoResults,
	/// A newer query was issued meanwhile; the response was dropped.
	Stale,
}

/// Session, drawn set, selection and query sequencing.
pub struct AppStore {
	session: Session,
	elements: VisualizationSet,
	selected: Option<String>,
	summary: Option<ElementSummary>,
	latest_query: u64,
}

impl AppStore {
	/// Fresh store; the session rehydrates remembered fields from `storage`.
	pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
		Self {
			session: Session::new(storage),
			elements: VisualizationSet::new(),
			selected: None,
			summary: None,
			latest_query: 0,
		}
	}

	/// Login state.
	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Whether the user may see the dashboard.
	pub fn is_logged_in(&self) -> bool {
		self.session.is_logged_in()
	}

	/// Marks the session logged in. Call only after the database accepted `credentials`.
	pub fn authenticate(&mut self, credentials: Credentials, remember: bool) {
		self.session.authenticate(credentials, remember);
	}

	/// Logs out and drops everything derived from the session.
	pub fn logout(&mut self) {
		self.session.logout();
		self.reset();
	}

	/// Clears the drawing and the selection but stays logged in.
	///
	/// Queries still in flight become stale, so their responses cannot
	/// repopulate the cleared set.
	pub fn reset(&mut self) {
		self.latest_query += 1;
		self.elements.clear();
		self.selected = None;
		self.summary = None;
	}

	/// What is drawn.
	pub fn elements(&self) -> &VisualizationSet {
		&self.elements
	}

	/// Starts a query. Only the most recent ticket may apply its results.
	pub fn begin_query(&mut self) -> QueryTicket {
		self.latest_query += 1;
		QueryTicket(self.latest_query)
	}

	/// Whether `ticket` may still apply its response.
	pub fn is_current(&self, ticket: QueryTicket) -> bool {
		ticket.0 == self.latest_query
	}

	/// Normalizes a query response into the set, unless `ticket` is stale.
	pub fn apply_records<C: ClassifyValue>(
		&mut self,
		ticket: QueryTicket,
		classifier: &C,
		records: &[Record],
		mode: QueryMode,
	) -> QueryOutcome {
		if !self.is_current(ticket) {
			debug!(
				"storm-graph: dropping response for query {} (latest is {})",
				ticket.0, self.latest_query
			);
			return QueryOutcome::Stale;
		}
		match normalize(classifier, records, mode, &self.elements) {
			Normalized::NoResults => QueryOutcome::NoResults,
			Normalized::Updated(set) => {
				self.elements = set;
				self.refresh_selection();
				let (nodes, edges) = (self.elements.nodes().count(), self.elements.edges().count());
				info!("storm-graph: showing {nodes} nodes and {edges} edges ({mode:?})");
				QueryOutcome::Applied { nodes, edges }
			}
		}
	}

	/// Selects an element of the set, or clears the selection.
	pub fn select(&mut self, id: Option<&str>) {
		self.selected = id.filter(|id| self.elements.contains(id)).map(str::to_string);
		self.refresh_selection();
	}

	/// Id of the selected element.
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Details of the selected element.
	pub fn summary(&self) -> Option<&ElementSummary> {
		self.summary.as_ref()
	}

	fn refresh_selection(&mut self) {
		self.summary = self
			.selected
			.as_deref()
			.and_then(|id| summarize(&self.elements, id));
		if self.summary.is_none() {
			self.selected = None;
		}
	}
}

impl std::fmt::Debug for AppStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppStore")
			.field("session", &self.session)
			.field("elements", &self.elements.len())
			.field("selected", &self.selected)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{CapabilityProbe, NodeValue, RelationshipValue};
	use crate::session::{MemoryStorage, Scheme};

	fn creds() -> Credentials {
		Credentials {
			user: "neo4j".into(),
			pass: "pw".into(),
			host: "localhost".into(),
			port: 7474,
			scheme: Scheme::Http,
		}
	}

	fn records() -> Vec<Record> {
		vec![Record::new([
			("a", crate::graph::DbValue::from(NodeValue::new(1).with_property("name", "a"))),
			("r", RelationshipValue::new(3, 1, 2, "R").into()),
			("b", NodeValue::new(2).with_property("name", "b").into()),
		])]
	}

	#[test]
	fn stale_ticket_is_dropped() {
		let mut store = AppStore::new(Box::new(MemoryStorage::new()));
		let first = store.begin_query();
		let second = store.begin_query();

		assert_eq!(
			store.apply_records(first, &CapabilityProbe, &records(), QueryMode::Replace),
			QueryOutcome::Stale
		);
		assert!(store.elements().is_empty());
		assert_eq!(
			store.apply_records(second, &CapabilityProbe, &records(), QueryMode::Replace),
			QueryOutcome::Applied { nodes: 2, edges: 1 }
		);
	}

	#[test]
	fn no_results_leaves_set_alone() {
		let mut store = AppStore::new(Box::new(MemoryStorage::new()));
		let ticket = store.begin_query();
		store.apply_records(ticket, &CapabilityProbe, &records(), QueryMode::Replace);
		let before = store.elements().clone();

		let ticket = store.begin_query();
		assert_eq!(
			store.apply_records(ticket, &CapabilityProbe, &[], QueryMode::Replace),
			QueryOutcome::NoResults
		);
		assert_eq!(store.elements(), &before);
	}

	#[test]
	fn selection_follows_the_set() {
		let mut store = AppStore::new(Box::new(MemoryStorage::new()));
		let ticket = store.begin_query();
		store.apply_records(ticket, &CapabilityProbe, &records(), QueryMode::Replace);

		store.select(Some("node_1"));
		assert_eq!(store.selected(), Some("node_1"));
		assert_eq!(store.summary().map(|s| s.outgoing), Some(1));

		store.select(Some("node_404"));
		assert_eq!(store.selected(), None);

		store.select(Some("node_2"));
		let ticket = store.begin_query();
		let only_a = [Record::new([("a", NodeValue::new(1))])];
		store.apply_records(ticket, &CapabilityProbe, &only_a, QueryMode::Replace);
		assert_eq!(store.selected(), None);
		assert!(store.summary().is_none());
	}

	#[test]
	fn logout_clears_session_set_and_summary() {
		let storage = MemoryStorage::new();
		let mut store = AppStore::new(Box::new(storage.clone()));
		store.authenticate(creds(), true);
		let ticket = store.begin_query();
		store.apply_records(ticket, &CapabilityProbe, &records(), QueryMode::Replace);
		store.select(Some("edge_3"));

		store.logout();
		assert!(!store.is_logged_in());
		assert!(store.elements().is_empty());
		assert!(store.summary().is_none());
		assert!(storage.is_empty());
	}

	#[test]
	fn reset_keeps_login() {
		let mut store = AppStore::new(Box::new(MemoryStorage::new()));
		store.authenticate(creds(), false);
		let ticket = store.begin_query();
		store.apply_records(ticket, &CapabilityProbe, &records(), QueryMode::Replace);
		store.reset();
		assert!(store.is_logged_in());
		assert!(store.elements().is_empty());
	}

	#[test]
	fn responses_in_flight_at_logout_are_dropped() {
		let mut store = AppStore::new(Box::new(MemoryStorage::new()));
		store.authenticate(creds(), false);
		let ticket = store.begin_query();
		store.logout();

		assert_eq!(
			store.apply_records(ticket, &CapabilityProbe, &records(), QueryMode::Replace),
			QueryOutcome::Stale
		);
		assert!(store.elements().is_empty());
		assert!(!store.is_logged_in());
	}

	#[test]
	fn responses_in_flight_at_reset_are_dropped() {
		let mut store = AppStore::new(Box::new(MemoryStorage::new()));
		let ticket = store.begin_query();
		store.reset();
		assert!(!store.is_current(ticket));
		assert_eq!(
			store.apply_records(ticket, &CapabilityProbe, &records(), QueryMode::Expand),
			QueryOutcome::Stale
		);
		assert!(store.elements().is_empty());

		let ticket = store.begin_query();
		assert!(store.is_current(ticket));
	}
}
