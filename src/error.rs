//! Error types.

use thiserror::Error;

/// Failures raised while running a query against the database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
	/// The request never got a response.
	#[error("could not reach the database: {0}")]
	Transport(String),
	/// HTTP 401 from the endpoint.
	#[error("the database rejected the credentials")]
	Unauthorized,
	/// Any other non-success HTTP status.
	#[error("the database answered with HTTP {status}: {message}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, or the status text when it cannot be read.
		message: String,
	},
	/// The statement was accepted by the endpoint but failed to run.
	#[error("{code}: {message}")]
	Database {
		/// Status code reported by the database, such as `Neo.ClientError.Statement.SyntaxError`.
		code: String,
		/// Human-readable description from the database.
		message: String,
	},
	/// The response body did not have the expected shape.
	#[error("unexpected response from the database: {0}")]
	Decode(String),
}

/// Failures loading the page-provided configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The element text is not a valid configuration object.
	#[error("configuration is not valid JSON: {0}")]
	Parse(#[from] serde_json::Error),
	/// The element exists but is not a script element.
	#[error("configuration element is unreadable")]
	Unreadable,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn driver_errors_render_for_toasts() {
		let err = DriverError::Database {
			code: "Neo.ClientError.Statement.SyntaxError".into(),
			message: "Invalid input".into(),
		};
		assert_eq!(
			err.to_string(),
			"Neo.ClientError.Statement.SyntaxError: Invalid input"
		);
		assert_eq!(
			DriverError::Status {
				status: 503,
				message: "unavailable".into()
			}
			.to_string(),
			"the database answered with HTTP 503: unavailable"
		);
	}

	#[test]
	fn config_error_wraps_json_error() {
		let err: ConfigError = serde_json::from_str::<serde_json::Value>("{")
			.unwrap_err()
			.into();
		assert!(err.to_string().starts_with("configuration is not valid JSON"));
	}
}
