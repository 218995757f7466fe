//! Routes and the login gate.
//!
//! Everything except the root login page requires a session; the gate
//! decision is a pure function so it can be checked without a browser.

use leptos::prelude::*;
use leptos_router::{
	StaticSegment,
	components::{ProtectedRoute, Redirect, Route, Router, Routes},
	hooks::use_location,
};

use crate::AppContext;
use crate::components::{Dashboard, Login};

/// Route definitions as constants for type safety
pub mod routes {
	/// Login page.
	pub const ROOT: &str = "/";
	/// Query page, requires a session.
	pub const DASHBOARD: &str = "/dashboard";
}

/// Whether navigation to a path may go ahead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
	/// Render the requested path.
	Proceed,
	/// Navigate to this path instead.
	Redirect(&'static str),
}

/// Logged-out users may only see the root login page; any other path sends
/// them back to it.
pub fn gate(path: &str, logged_in: bool) -> Gate {
	let path = match path.trim_end_matches('/') {
		"" => routes::ROOT,
		trimmed => trimmed,
	};
	if logged_in || path == routes::ROOT {
		Gate::Proceed
	} else {
		Gate::Redirect(routes::ROOT)
	}
}

/// Main router component that wraps the application
#[component]
pub fn AppRouter() -> impl IntoView {
	let app = expect_context::<AppContext>();
	let logged_in = move || app.store.with(|s| s.is_logged_in());

	view! {
		<Router>
			<Routes fallback=|| view! { <Unmatched /> }>
				<Route path=StaticSegment("") view=Login />
				<ProtectedRoute
					path=StaticSegment("dashboard")
					view=Dashboard
					condition=move || Some(gate(routes::DASHBOARD, logged_in()) == Gate::Proceed)
					redirect_path=|| routes::ROOT
				/>
			</Routes>
		</Router>
	}
}

/// Unknown paths: back to login without a session, a not-found page with one.
#[component]
fn Unmatched() -> impl IntoView {
	let app = expect_context::<AppContext>();
	let location = use_location();

	move || {
		let logged_in = app.store.with(|s| s.is_logged_in());
		match gate(&location.pathname.get(), logged_in) {
			Gate::Redirect(to) => view! { <Redirect path=to /> }.into_any(),
			Gate::Proceed => view! {
				<div class="not-found">
					<h2>"Page not found"</h2>
					<a href=routes::DASHBOARD>"Back to the dashboard"</a>
				</div>
			}
			.into_any(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn root_is_always_reachable() {
		for path in [routes::ROOT, ""] {
			assert_eq!(gate(path, false), Gate::Proceed, "{path}");
			assert_eq!(gate(path, true), Gate::Proceed, "{path}");
		}
	}

	#[test]
	fn logged_out_users_are_sent_to_root() {
		for path in [routes::DASHBOARD, "/dashboard/", "/login", "/login/", "/nowhere", "/a/b"] {
			assert_eq!(gate(path, false), Gate::Redirect(routes::ROOT), "{path}");
		}
	}

	#[test]
	fn logged_in_users_pass_everywhere() {
		for path in [routes::DASHBOARD, "/nowhere"] {
			assert_eq!(gate(path, true), Gate::Proceed);
		}
	}
}
