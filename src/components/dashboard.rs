//! Query page: statement box, graph canvas and selection details.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use log::debug;

use super::force_graph::{ForceGraphCanvas, GraphData, Theme};
use crate::AppContext;
use crate::driver::HttpDriver;
use crate::graph::{ElementGroup, ElementSummary, QueryMode};
use crate::notify::{Notice, Notify};
use crate::query::{QueryRequest, execute_query};
use crate::router::routes;
use crate::store::AppStore;

const DEFAULT_STATEMENT: &str = "MATCH (n)-[r]->(m) RETURN n, r, m LIMIT 100";

/// Query page: statement box, graph canvas and selection details.
#[component]
pub fn Dashboard() -> impl IntoView {
	let app = expect_context::<AppContext>();
	let navigate = use_navigate();

	let statement = RwSignal::new(DEFAULT_STATEMENT.to_string());
	let expand = RwSignal::new(false);
	let in_flight = RwSignal::new(0usize);
	let theme = Theme::by_name(&app.config.with_value(|c| c.theme.clone()));

	let run = move |request: QueryRequest| {
		let Some(credentials) = app
			.store
			.with_untracked(|s| s.session().credentials().cloned())
		else {
			app.toasts.notify(Notice::error("Not logged in"));
			return;
		};
		let (database, classifier) = app.config.with_value(|c| (c.database.clone(), c.classifier));
		let driver = HttpDriver::new(&credentials, &database);

		in_flight.update(|n| *n += 1);
		spawn_local(async move {
			if let Ok(outcome) = execute_query(&driver, &classifier, &app.store, &app.toasts, request).await {
				debug!("storm-graph: query finished: {outcome:?}");
			}
			in_flight.update(|n| *n = n.saturating_sub(1));
		});
	};

	let on_run = move |_| {
		let text = statement.get_untracked();
		if text.trim().is_empty() {
			app.toasts.notify(Notice::warning("Enter a statement first"));
			return;
		}
		run(QueryRequest::new(text, QueryMode::from_expand(expand.get_untracked())));
	};

	let on_expand_selected = move |_| {
		let Some(id) = app.store.with_untracked(|s| s.selected().map(str::to_string)) else {
			return;
		};
		if let Some(request) = QueryRequest::expand_node(&id) {
			run(request);
		}
	};

	let on_reset = move |_| app.store.update(AppStore::reset);

	let on_logout = move |_| {
		app.store.update(AppStore::logout);
		navigate(routes::ROOT, Default::default());
	};

	let graph = Memo::new(move |_| app.store.with(|s| GraphData::from(s.elements())));
	let selected = Memo::new(move |_| app.store.with(|s| s.selected().map(str::to_string)));
	let summary = Memo::new(move |_| app.store.with(|s| s.summary().cloned()));
	let counts = move || {
		app.store.with(|s| {
			let set = s.elements();
			format!("{} nodes, {} relationships", set.nodes().count(), set.edges().count())
		})
	};
	let on_select = Callback::new(move |id: Option<String>| {
		app.store.update(|s| s.select(id.as_deref()));
	});

	view! {
		<div class="dashboard">
			<aside class="dashboard-panel">
				<textarea
					class="query-input"
					rows="6"
					spellcheck="false"
					bind:value=statement
				/>
				<label class="query-expand">
					<input type="checkbox" bind:checked=expand />
					"Merge into current graph"
				</label>
				<div class="query-actions">
					<button on:click=on_run disabled=move || in_flight.get() > 0>
						{move || if in_flight.get() > 0 { "Running..." } else { "Run" }}
					</button>
					<button on:click=on_reset>"Reset"</button>
					<button on:click=on_logout>"Log out"</button>
				</div>
				<p class="element-count">{counts}</p>
				{move || {
					summary
						.get()
						.map(|summary| {
							view! {
								<SummaryPanel summary=summary.clone() />
								{(summary.group == ElementGroup::Nodes)
									.then(|| {
										view! {
											<button on:click=on_expand_selected>"Expand neighbours"</button>
										}
									})}
							}
						})
				}}
			</aside>
			<main class="dashboard-graph">
				<ForceGraphCanvas data=graph selected=selected on_select=on_select theme=theme />
			</main>
		</div>
	}
}

/// Details of the selected element.
#[component]
fn SummaryPanel(summary: ElementSummary) -> impl IntoView {
	let kind = match summary.group {
		ElementGroup::Nodes => "Node",
		ElementGroup::Edges => "Relationship",
	};
	view! {
		<dl class="element-summary">
			<dt>{kind}</dt>
			<dd>{summary.id}</dd>
			<dt>"Name"</dt>
			<dd>{summary.name.unwrap_or_else(|| "-".into())}</dd>
			<dt>"Type"</dt>
			<dd>{summary.element_type.unwrap_or_else(|| "-".into())}</dd>
			<dt>"In / out"</dt>
			<dd>{format!("{} / {}", summary.incoming, summary.outgoing)}</dd>
			<dt>"Neighbours"</dt>
			<dd>{summary.neighbours}</dd>
		</dl>
	}
}
