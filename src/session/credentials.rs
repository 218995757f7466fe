//! Connection parameters entered on the login page.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// URL scheme of the database's HTTP endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
	/// Plain HTTP.
	#[default]
	Http,
	/// HTTP over TLS.
	Https,
}

impl Scheme {
	/// Every scheme, in the order the login form lists them.
	pub const ALL: [Scheme; 2] = [Scheme::Http, Scheme::Https];

	/// Lowercase URL scheme.
	pub fn as_str(self) -> &'static str {
		match self {
			Scheme::Http => "http",
			Scheme::Https => "https",
		}
	}
}

impl fmt::Display for Scheme {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Scheme {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"http" => Ok(Scheme::Http),
			"https" => Ok(Scheme::Https),
			other => Err(format!("unsupported scheme {other:?}")),
		}
	}
}

/// Everything needed to reach and authenticate against the database.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	/// Database user.
	pub user: String,
	/// Password; never logged.
	pub pass: String,
	/// Host name or address.
	pub host: String,
	/// HTTP endpoint port.
	pub port: u16,
	/// HTTP or HTTPS.
	pub scheme: Scheme,
}

impl Credentials {
	/// Base URL of the HTTP endpoint, e.g. `http://localhost:7474`.
	pub fn base_url(&self) -> String {
		format!("{}://{}:{}", self.scheme, self.host, self.port)
	}
}

// Keeps the password out of logs.
impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("user", &self.user)
			.field("host", &self.host)
			.field("port", &self.port)
			.field("scheme", &self.scheme)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn creds() -> Credentials {
		Credentials {
			user: "neo4j".into(),
			pass: "secret".into(),
			host: "db.local".into(),
			port: 7473,
			scheme: Scheme::Https,
		}
	}

	#[test]
	fn base_url_joins_scheme_host_port() {
		assert_eq!(creds().base_url(), "https://db.local:7473");
	}

	#[test]
	fn debug_hides_password() {
		let rendered = format!("{:?}", creds());
		assert!(rendered.contains("neo4j"));
		assert!(!rendered.contains("secret"));
	}

	#[test]
	fn scheme_parses_case_insensitively() {
		assert_eq!("HTTPS".parse::<Scheme>(), Ok(Scheme::Https));
		assert_eq!(" http ".parse::<Scheme>(), Ok(Scheme::Http));
		assert!("bolt".parse::<Scheme>().is_err());
		assert_eq!(Scheme::Https.to_string(), "https");
	}
}
