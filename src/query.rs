//! Running a query end to end: driver, normalizer, store, notifications.

use std::cell::RefCell;

use leptos::prelude::*;
use log::warn;
use serde_json::json;

use crate::driver::{GraphDriver, Parameters};
use crate::error::DriverError;
use crate::graph::{ClassifyValue, QueryMode, element::node_identity};
use crate::notify::{Notice, Notify};
use crate::session::Credentials;
use crate::store::{AppStore, QueryOutcome};

/// Shown when a query returns no records.
pub const NO_RESULTS: &str = "No results found";

/// Statement used by the "expand neighbours" action.
pub const NEIGHBOURS_STATEMENT: &str = "MATCH (n)-[r]-(m) WHERE id(n) = $id RETURN n, r, m";

/// A statement to run and how its results combine with the drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryRequest {
	/// Cypher text.
	pub statement: String,
	/// Values bound to `$name` placeholders.
	pub parameters: Parameters,
	/// Replace the drawing or merge into it.
	pub mode: QueryMode,
}

impl QueryRequest {
	/// Request without parameters.
	pub fn new(statement: impl Into<String>, mode: QueryMode) -> Self {
		Self {
			statement: statement.into(),
			parameters: Parameters::new(),
			mode,
		}
	}

	/// Fetches the neighbourhood of a drawn node and merges it in.
	/// `None` when `node_id` is not a node element id.
	pub fn expand_node(node_id: &str) -> Option<Self> {
		let identity = node_identity(node_id)?;
		let mut request = Self::new(NEIGHBOURS_STATEMENT, QueryMode::Expand);
		request.parameters.insert("id".into(), json!(identity));
		Some(request)
	}
}

/// Mutable access to the store, however the caller holds it.
pub trait StoreHandle {
	/// Runs `f` on the store. `None` when the store is gone.
	fn with_store<R>(&self, f: impl FnOnce(&mut AppStore) -> R) -> Option<R>;
}

impl StoreHandle for RefCell<AppStore> {
	fn with_store<R>(&self, f: impl FnOnce(&mut AppStore) -> R) -> Option<R> {
		Some(f(&mut self.borrow_mut()))
	}
}

impl StoreHandle for RwSignal<AppStore, LocalStorage> {
	fn with_store<R>(&self, f: impl FnOnce(&mut AppStore) -> R) -> Option<R> {
		self.try_update(f)
	}
}

/// Runs `request` and folds the response into the store.
///
/// Driver failures are reported through `notifier` and returned; the store
/// is left exactly as it was. A response overtaken by a newer query is
/// dropped silently.
pub async fn execute_query<D, C, S, N>(
	driver: &D,
	classifier: &C,
	store: &S,
	notifier: &N,
	request: QueryRequest,
) -> Result<QueryOutcome, DriverError>
where
	D: GraphDriver + ?Sized,
	C: ClassifyValue,
	S: StoreHandle,
	N: Notify + ?Sized,
{
	let Some(ticket) = store.with_store(AppStore::begin_query) else {
		return Ok(QueryOutcome::Stale);
	};

	let result = match driver.run(&request.statement, &request.parameters).await {
		Ok(result) => result,
		Err(err) => {
			warn!("storm-graph: query failed: {err}");
			if store.with_store(|s| s.is_current(ticket)).unwrap_or(false) {
				notifier.notify(Notice::error(err.to_string()));
			}
			return Err(err);
		}
	};

	let outcome = store
		.with_store(|s| s.apply_records(ticket, classifier, &result.records, request.mode))
		.unwrap_or(QueryOutcome::Stale);
	if outcome == QueryOutcome::NoResults {
		notifier.notify(Notice::warning(NO_RESULTS));
	}
	Ok(outcome)
}

/// Checks `credentials` against the database, then starts the session.
///
/// The store is untouched when the database refuses the connection.
pub async fn log_in<D, S>(
	driver: &D,
	store: &S,
	credentials: Credentials,
	remember: bool,
) -> Result<(), DriverError>
where
	D: GraphDriver + ?Sized,
	S: StoreHandle,
{
	if let Err(err) = driver.verify().await {
		warn!("storm-graph: login to {} failed: {err}", credentials.base_url());
		return Err(err);
	}
	store.with_store(|s| s.authenticate(credentials, remember));
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::collections::VecDeque;

	use crate::driver::QueryResult;
	use crate::graph::{CapabilityProbe, NodeValue, Record};
	use crate::notify::{NoticeLevel, NoticeLog};
	use crate::session::MemoryStorage;

	/// Answers queued responses in order and records what it was asked.
	#[derive(Default)]
	struct ScriptedDriver {
		responses: RefCell<VecDeque<Result<QueryResult, DriverError>>>,
		seen: RefCell<Vec<(String, Parameters)>>,
	}

	impl ScriptedDriver {
		fn answering(responses: impl IntoIterator<Item = Result<QueryResult, DriverError>>) -> Self {
			Self {
				responses: RefCell::new(responses.into_iter().collect()),
				..Self::default()
			}
		}
	}

	#[async_trait(?Send)]
	impl GraphDriver for ScriptedDriver {
		async fn run(&self, statement: &str, parameters: &Parameters) -> Result<QueryResult, DriverError> {
			self.seen
				.borrow_mut()
				.push((statement.to_string(), parameters.clone()));
			self.responses
				.borrow_mut()
				.pop_front()
				.unwrap_or_else(|| Ok(QueryResult::default()))
		}
	}

	fn store() -> RefCell<AppStore> {
		RefCell::new(AppStore::new(Box::new(MemoryStorage::new())))
	}

	fn one_node(id: i64) -> QueryResult {
		QueryResult {
			records: vec![Record::new([("n", NodeValue::new(id))])],
		}
	}

	#[tokio::test]
	async fn applies_results_without_notifying() {
		let driver = ScriptedDriver::answering([Ok(one_node(1))]);
		let (store, log) = (store(), NoticeLog::default());
		let outcome = execute_query(
			&driver,
			&CapabilityProbe,
			&store,
			&log,
			QueryRequest::new("MATCH (n) RETURN n", QueryMode::Replace),
		)
		.await
		.unwrap();

		assert_eq!(outcome, QueryOutcome::Applied { nodes: 1, edges: 0 });
		assert!(log.take().is_empty());
		assert!(store.borrow().elements().contains("node_1"));
	}

	#[tokio::test]
	async fn empty_response_warns_and_keeps_set() {
		let driver = ScriptedDriver::answering([Ok(one_node(1)), Ok(QueryResult::default())]);
		let (store, log) = (store(), NoticeLog::default());
		let request = QueryRequest::new("MATCH (n) RETURN n", QueryMode::Replace);
		execute_query(&driver, &CapabilityProbe, &store, &log, request.clone())
			.await
			.unwrap();
		let outcome = execute_query(&driver, &CapabilityProbe, &store, &log, request)
			.await
			.unwrap();

		assert_eq!(outcome, QueryOutcome::NoResults);
		let notices = log.take();
		assert_eq!(notices.len(), 1);
		assert_eq!(notices[0].level, NoticeLevel::Warning);
		assert_eq!(notices[0].message, NO_RESULTS);
		assert!(store.borrow().elements().contains("node_1"));
	}

	#[tokio::test]
	async fn driver_failure_notifies_and_leaves_state() {
		let driver = ScriptedDriver::answering([
			Ok(one_node(1)),
			Err(DriverError::Transport("connection refused".into())),
		]);
		let (store, log) = (store(), NoticeLog::default());
		let request = QueryRequest::new("MATCH (n) RETURN n", QueryMode::Replace);
		execute_query(&driver, &CapabilityProbe, &store, &log, request.clone())
			.await
			.unwrap();
		let before = store.borrow().elements().clone();

		let err = execute_query(&driver, &CapabilityProbe, &store, &log, request)
			.await
			.unwrap_err();
		assert_eq!(err, DriverError::Transport("connection refused".into()));
		let notices = log.take();
		assert_eq!(notices.len(), 1);
		assert_eq!(notices[0].level, NoticeLevel::Error);
		assert!(notices[0].message.contains("connection refused"));
		assert_eq!(store.borrow().elements(), &before);
	}

	#[tokio::test]
	async fn expand_node_sends_identity_parameter() {
		let driver = ScriptedDriver::answering([Ok(one_node(1)), Ok(one_node(2))]);
		let (store, log) = (store(), NoticeLog::default());
		execute_query(
			&driver,
			&CapabilityProbe,
			&store,
			&log,
			QueryRequest::new("MATCH (n) RETURN n", QueryMode::Replace),
		)
		.await
		.unwrap();

		let request = QueryRequest::expand_node("node_1").unwrap();
		assert_eq!(request.mode, QueryMode::Expand);
		execute_query(&driver, &CapabilityProbe, &store, &log, request)
			.await
			.unwrap();

		let seen = driver.seen.borrow();
		assert_eq!(seen[1].0, NEIGHBOURS_STATEMENT);
		assert_eq!(seen[1].1.get("id"), Some(&json!(1)));
		let store = store.borrow();
		assert!(store.elements().contains("node_1"));
		assert!(store.elements().contains("node_2"));
	}

	#[test]
	fn expand_node_rejects_edge_ids() {
		assert!(QueryRequest::expand_node("edge_1").is_none());
	}

	fn credentials() -> Credentials {
		Credentials {
			user: "neo4j".into(),
			pass: "secret".into(),
			host: "localhost".into(),
			port: 7474,
			scheme: crate::session::Scheme::Http,
		}
	}

	#[tokio::test]
	async fn log_in_verifies_before_authenticating() {
		let driver = ScriptedDriver::answering([Err(DriverError::Unauthorized)]);
		let store = store();
		let err = log_in(&driver, &store, credentials(), true).await.unwrap_err();
		assert_eq!(err, DriverError::Unauthorized);
		assert!(!store.borrow().is_logged_in());

		let driver = ScriptedDriver::answering([Ok(QueryResult::default())]);
		log_in(&driver, &store, credentials(), true).await.unwrap();
		assert!(store.borrow().is_logged_in());
		assert_eq!(driver.seen.borrow()[0].0, crate::driver::CONNECTIVITY_STATEMENT);
	}
}
