//! Page-provided configuration.
//!
//! The host page may embed a JSON object in
//! `<script id="storm-config" type="application/json">`. Every field is
//! optional; anything missing falls back to [`AppConfig::default`].

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::driver::DEFAULT_DATABASE;
use crate::error::ConfigError;
use crate::graph::Classifier;
use crate::notify::DEFAULT_TIMEOUT_MS;
use crate::session::Scheme;

/// Id of the script element holding the configuration.
pub const CONFIG_ELEMENT_ID: &str = "storm-config";

/// Settings the host page can override.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Login form default host.
	pub host: String,
	/// Login form default port.
	pub port: u16,
	/// Login form default scheme.
	pub scheme: Scheme,
	/// Database the statements run against.
	pub database: String,
	/// How query values are recognized as nodes and relationships.
	pub classifier: Classifier,
	/// Canvas theme name, see [`Theme::by_name`](crate::components::force_graph::Theme::by_name).
	pub theme: String,
	/// How long toasts stay up unless a notice asks otherwise.
	pub notice_timeout_ms: u32,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			host: "localhost".into(),
			port: 7474,
			scheme: Scheme::Http,
			database: DEFAULT_DATABASE.into(),
			classifier: Classifier::default(),
			theme: "default".into(),
			notice_timeout_ms: DEFAULT_TIMEOUT_MS,
		}
	}
}

impl AppConfig {
	/// Parses a configuration object; absent fields take their defaults.
	pub fn from_json(text: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(text)?)
	}

	/// Reads the configuration element, falling back to defaults on any problem.
	pub fn load() -> Self {
		match Self::read_element() {
			Ok(Some(config)) => {
				info!("storm-graph: loaded configuration from #{CONFIG_ELEMENT_ID}");
				config
			}
			Ok(None) => Self::default(),
			Err(e) => {
				warn!("storm-graph: {e}; using defaults");
				Self::default()
			}
		}
	}

	fn read_element() -> Result<Option<Self>, ConfigError> {
		let Some(element) = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
		else {
			return Ok(None);
		};
		let script: HtmlScriptElement = element.dyn_into().map_err(|_| ConfigError::Unreadable)?;
		let text = script.text().map_err(|_| ConfigError::Unreadable)?;
		Self::from_json(&text).map(Some)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_fields_use_defaults() {
		let config = AppConfig::from_json(r#"{"host": "graph.internal", "classifier": "tag"}"#).unwrap();
		assert_eq!(config.host, "graph.internal");
		assert_eq!(config.classifier, Classifier::Tag);
		assert_eq!(config.port, 7474);
		assert_eq!(config.database, "neo4j");
		assert_eq!(config.notice_timeout_ms, 3000);
	}

	#[test]
	fn empty_object_is_default() {
		assert_eq!(AppConfig::from_json("{}").unwrap(), AppConfig::default());
	}

	#[test]
	fn malformed_json_is_rejected() {
		assert!(matches!(
			AppConfig::from_json("{\"port\": 99999}"),
			Err(ConfigError::Parse(_))
		));
		assert!(AppConfig::from_json("not json").is_err());
	}
}
