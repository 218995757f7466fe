//! Driver for the database's HTTP transactional endpoint.
//!
//! Statements are sent to `/db/{database}/tx/commit` asking for both the
//! `row` and `graph` result formats. Per-column `meta` entries tell which
//! cells are nodes or relationships; their full shape (labels, endpoints,
//! type) is then looked up in the row's `graph` section.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use gloo_net::http::Request;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::{GraphDriver, Parameters, QueryResult};
use crate::error::DriverError;
use crate::graph::{DbValue, NodeValue, Record, RelationshipValue};
use crate::graph::value::Properties;
use crate::session::Credentials;

/// Database name used when the configuration does not name one.
pub const DEFAULT_DATABASE: &str = "neo4j";

const RESULT_FORMATS: [&str; 2] = ["row", "graph"];

/// Runs statements over HTTP with Basic authentication.
#[derive(Clone)]
pub struct HttpDriver {
	endpoint: String,
	authorization: String,
}

impl HttpDriver {
	/// Driver for `database` at the credentials' address.
	pub fn new(credentials: &Credentials, database: &str) -> Self {
		Self {
			endpoint: format!("{}/db/{}/tx/commit", credentials.base_url(), database),
			authorization: basic_auth(&credentials.user, &credentials.pass),
		}
	}

	/// URL statements are posted to.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}
}

impl std::fmt::Debug for HttpDriver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HttpDriver")
			.field("endpoint", &self.endpoint)
			.finish_non_exhaustive()
	}
}

/// `Authorization` header value; the pair is encoded as UTF-8 bytes.
fn basic_auth(user: &str, pass: &str) -> String {
	format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
}

#[async_trait(?Send)]
impl GraphDriver for HttpDriver {
	async fn run(&self, statement: &str, parameters: &Parameters) -> Result<QueryResult, DriverError> {
		debug!("storm-graph: POST {} {statement:?}", self.endpoint);
		let body = TxRequest {
			statements: [TxStatement {
				statement,
				parameters,
				result_data_contents: &RESULT_FORMATS,
			}],
		};
		let response = Request::post(&self.endpoint)
			.header("Authorization", &self.authorization)
			.header("Accept", "application/json;charset=UTF-8")
			.json(&body)
			.map_err(|e| DriverError::Decode(e.to_string()))?
			.send()
			.await
			.map_err(|e| DriverError::Transport(e.to_string()))?;

		let status = response.status();
		if status == 401 {
			return Err(DriverError::Unauthorized);
		}
		if !response.ok() {
			let message = response.text().await.unwrap_or_else(|_| response.status_text());
			return Err(DriverError::Status { status, message });
		}

		let body: TxResponse = response
			.json()
			.await
			.map_err(|e| DriverError::Decode(e.to_string()))?;
		decode_response(body)
	}
}

#[derive(Serialize)]
struct TxRequest<'a> {
	statements: [TxStatement<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TxStatement<'a> {
	statement: &'a str,
	parameters: &'a Parameters,
	result_data_contents: &'a [&'a str],
}

/// Body of a transactional endpoint response.
#[derive(Debug, Default, Deserialize)]
pub struct TxResponse {
	#[serde(default)]
	results: Vec<TxResult>,
	#[serde(default)]
	errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxError {
	code: String,
	message: String,
}

#[derive(Debug, Deserialize)]
struct TxResult {
	columns: Vec<String>,
	#[serde(default)]
	data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
struct TxRow {
	#[serde(default)]
	row: Vec<Json>,
	#[serde(default)]
	meta: Vec<Json>,
	#[serde(default)]
	graph: TxGraph,
}

#[derive(Debug, Default, Deserialize)]
struct TxGraph {
	#[serde(default)]
	nodes: Vec<TxNode>,
	#[serde(default)]
	relationships: Vec<TxRelationship>,
}

#[derive(Debug, Deserialize)]
struct TxNode {
	id: String,
	#[serde(default)]
	labels: Vec<String>,
	#[serde(default)]
	properties: Properties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxRelationship {
	id: String,
	#[serde(rename = "type")]
	rel_type: String,
	start_node: String,
	end_node: String,
	#[serde(default)]
	properties: Properties,
}

/// Converts a transactional endpoint response into records.
///
/// The first reported error wins over any partial results.
pub fn decode_response(response: TxResponse) -> Result<QueryResult, DriverError> {
	if let Some(error) = response.errors.into_iter().next() {
		return Err(DriverError::Database {
			code: error.code,
			message: error.message,
		});
	}
	let Some(result) = response.results.into_iter().next() else {
		warn!("storm-graph: response carried no result for the statement");
		return Ok(QueryResult::default());
	};

	let records = result
		.data
		.into_iter()
		.map(|row| decode_row(&result.columns, row))
		.collect::<Result<_, _>>()?;
	Ok(QueryResult { records })
}

fn decode_row(columns: &[String], row: TxRow) -> Result<Record, DriverError> {
	let TxRow { row, meta, graph } = row;
	let nodes: HashMap<&str, &TxNode> = graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
	let rels: HashMap<&str, &TxRelationship> = graph
		.relationships
		.iter()
		.map(|r| (r.id.as_str(), r))
		.collect();

	let mut cells = Vec::with_capacity(columns.len());
	for (i, column) in columns.iter().enumerate() {
		let value = match meta.get(i).and_then(entity_ref) {
			Some(Entity::Node(id)) => {
				let node = nodes
					.get(id.as_str())
					.ok_or_else(|| missing(column, "node", &id))?;
				DbValue::Node(NodeValue {
					identity: parse_id(&node.id)?,
					labels: node.labels.clone(),
					properties: node.properties.clone(),
				})
			}
			Some(Entity::Relationship(id)) => {
				let rel = rels
					.get(id.as_str())
					.ok_or_else(|| missing(column, "relationship", &id))?;
				DbValue::Relationship(RelationshipValue {
					identity: parse_id(&rel.id)?,
					start: parse_id(&rel.start_node)?,
					end: parse_id(&rel.end_node)?,
					rel_type: rel.rel_type.clone(),
					properties: rel.properties.clone(),
				})
			}
			None => DbValue::Other(row.get(i).cloned().unwrap_or(Json::Null)),
		};
		cells.push((column.clone(), value));
	}
	Ok(Record::new(cells))
}

enum Entity {
	Node(String),
	Relationship(String),
}

/// Reads a `{"id": .., "type": "node" | "relationship"}` meta entry.
fn entity_ref(meta: &Json) -> Option<Entity> {
	let id = match meta.get("id")? {
		Json::Number(n) => n.to_string(),
		Json::String(s) => s.clone(),
		_ => return None,
	};
	match meta.get("type")?.as_str()? {
		"node" => Some(Entity::Node(id)),
		"relationship" => Some(Entity::Relationship(id)),
		_ => None,
	}
}

fn parse_id(id: &str) -> Result<i64, DriverError> {
	id.parse()
		.map_err(|_| DriverError::Decode(format!("entity id {id:?} is not an integer")))
}

fn missing(column: &str, kind: &str, id: &str) -> DriverError {
	DriverError::Decode(format!("column {column:?} references {kind} {id} absent from the graph section"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn basic_auth_encodes_utf8_credentials() {
		assert_eq!(basic_auth("neo4j", "secret"), "Basic bmVvNGo6c2VjcmV0");
		// "ü€:x" as UTF-8 bytes
		assert_eq!(basic_auth("ü€", "x"), "Basic w7zigqw6eA==");
	}

	#[test]
	fn endpoint_targets_database_commit() {
		let credentials = Credentials {
			user: "neo4j".into(),
			pass: "päss".into(),
			host: "graph.internal".into(),
			port: 7473,
			scheme: crate::session::Scheme::Https,
		};
		let driver = HttpDriver::new(&credentials, "azure");
		assert_eq!(driver.endpoint(), "https://graph.internal:7473/db/azure/tx/commit");
	}

	fn decode(body: Json) -> Result<QueryResult, DriverError> {
		decode_response(serde_json::from_value(body).unwrap())
	}

	#[test]
	fn decodes_nodes_relationships_and_scalars() {
		let result = decode(json!({
			"results": [{
				"columns": ["a", "r", "b", "n"],
				"data": [{
					"row": [{"name": "/org/alice"}, {}, {"name": "bob"}, 2],
					"meta": [
						{"id": 5, "type": "node", "deleted": false},
						{"id": 9, "type": "relationship", "deleted": false},
						{"id": 6, "type": "node", "deleted": false},
						null
					],
					"graph": {
						"nodes": [
							{"id": "5", "labels": ["Person"], "properties": {"name": "/org/alice", "type": "Person"}},
							{"id": "6", "labels": ["Person"], "properties": {"name": "bob", "type": "Person"}}
						],
						"relationships": [
							{"id": "9", "type": "MANAGES", "startNode": "5", "endNode": "6", "properties": {}}
						]
					}
				}]
			}],
			"errors": []
		}))
		.unwrap();

		assert_eq!(result.records.len(), 1);
		let record = &result.records[0];
		assert_eq!(record.keys(), ["a", "r", "b", "n"]);
		match record.get("a") {
			Some(DbValue::Node(node)) => {
				assert_eq!(node.identity, 5);
				assert_eq!(node.labels, ["Person"]);
				assert_eq!(node.properties.get("type"), Some(&json!("Person")));
			}
			other => panic!("expected node, got {other:?}"),
		}
		assert_eq!(
			record.get("r"),
			Some(&DbValue::Relationship(RelationshipValue::new(9, 5, 6, "MANAGES")))
		);
		assert_eq!(record.get("n"), Some(&DbValue::Other(json!(2))));
	}

	#[test]
	fn first_error_becomes_database_error() {
		let err = decode(json!({
			"results": [],
			"errors": [
				{"code": "Neo.ClientError.Statement.SyntaxError", "message": "Invalid input 'X'"},
				{"code": "Other", "message": "ignored"}
			]
		}))
		.unwrap_err();
		assert_eq!(
			err,
			DriverError::Database {
				code: "Neo.ClientError.Statement.SyntaxError".into(),
				message: "Invalid input 'X'".into(),
			}
		);
	}

	#[test]
	fn empty_result_has_no_records() {
		let result = decode(json!({"results": [{"columns": ["n"], "data": []}], "errors": []})).unwrap();
		assert!(result.records.is_empty());
		assert!(decode(json!({})).unwrap().records.is_empty());
	}

	#[test]
	fn dangling_meta_reference_is_a_decode_error() {
		let err = decode(json!({
			"results": [{
				"columns": ["n"],
				"data": [{"row": [{}], "meta": [{"id": 1, "type": "node"}], "graph": {"nodes": [], "relationships": []}}]
			}]
		}))
		.unwrap_err();
		assert!(matches!(err, DriverError::Decode(msg) if msg.contains("node 1")));
	}

	#[test]
	fn request_body_asks_for_row_and_graph() {
		let parameters = Parameters::from_iter([("id".to_string(), json!(5))]);
		let body = TxRequest {
			statements: [TxStatement {
				statement: "MATCH (n) WHERE id(n) = $id RETURN n",
				parameters: &parameters,
				result_data_contents: &RESULT_FORMATS,
			}],
		};
		assert_eq!(
			serde_json::to_value(&body).unwrap(),
			json!({"statements": [{
				"statement": "MATCH (n) WHERE id(n) = $id RETURN n",
				"parameters": {"id": 5},
				"resultDataContents": ["row", "graph"]
			}]})
		);
	}
}
