//! Query execution against the graph database.
//!
//! The rest of the crate only sees [`GraphDriver`]; [`HttpDriver`] is the
//! implementation the app uses in the browser.

mod http;

use async_trait::async_trait;
use serde_json::{Map, Value as Json};

use crate::error::DriverError;
use crate::graph::Record;

pub use http::{DEFAULT_DATABASE, HttpDriver, TxResponse, decode_response};

/// Cheapest statement the database will answer; used to check credentials.
pub const CONNECTIVITY_STATEMENT: &str = "RETURN 1";

/// Named statement parameters (`$name` in Cypher).
pub type Parameters = Map<String, Json>;

/// Rows returned by one statement.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
	/// One record per row, columns in statement order.
	pub records: Vec<Record>,
}

/// Something that can run a Cypher statement.
///
/// Futures are not `Send`: drivers run on the browser's single thread.
#[async_trait(?Send)]
pub trait GraphDriver {
	/// Runs `statement` in its own transaction.
	async fn run(&self, statement: &str, parameters: &Parameters) -> Result<QueryResult, DriverError>;

	/// Succeeds when the database accepts a trivial statement.
	async fn verify(&self) -> Result<(), DriverError> {
		self.run(CONNECTIVITY_STATEMENT, &Parameters::new())
			.await
			.map(|_| ())
	}
}
