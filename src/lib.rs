//! storm-graph: browser explorer for a property-graph database.
//!
//! Users log in with connection parameters, run Cypher statements, and see
//! the returned nodes and relationships drawn as a force-directed graph.
//! Results either replace the drawing or are merged into it.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod components;
pub mod config;
pub mod driver;
pub mod error;
pub mod graph;
pub mod notify;
pub mod query;
pub mod router;
pub mod session;
pub mod store;

pub use components::force_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};
pub use config::AppConfig;
pub use store::AppStore;

use components::toast::{ToastStack, Toasts};
use router::AppRouter;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("storm-graph: logging initialized");
}

/// Shared handles provided to every page through context.
#[derive(Clone, Copy)]
pub struct AppContext {
	/// Session, drawing and selection. Not `Send`: it owns browser storage.
	pub store: RwSignal<AppStore, LocalStorage>,
	/// Page configuration, read once at startup.
	pub config: StoredValue<AppConfig>,
	/// Notices shown by [`ToastStack`](components::toast::ToastStack).
	pub toasts: Toasts,
}

impl AppContext {
	/// Store backed by browser storage, toasts timed by `config`.
	pub fn new(config: AppConfig) -> Self {
		Self {
			store: RwSignal::new_local(AppStore::new(session::default_storage())),
			toasts: Toasts::new(config.notice_timeout_ms),
			config: StoredValue::new(config),
		}
	}
}

/// Main application component.
/// Loads the page configuration, restores the session and mounts the router.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let app = AppContext::new(AppConfig::load());
	provide_context(app);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Storm Graph Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<AppRouter />
		<ToastStack toasts=app.toasts />
	}
}
