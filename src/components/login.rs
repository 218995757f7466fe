//! Login page.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::AppContext;
use crate::config::AppConfig;
use crate::driver::HttpDriver;
use crate::notify::{Notice, Notify};
use crate::query::log_in;
use crate::router::routes;
use crate::session::{Credentials, Remembered, Scheme};

/// Raw form contents, as typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LoginForm {
	pub user: String,
	pub pass: String,
	pub host: String,
	pub port: String,
	pub scheme: String,
	pub remember: bool,
}

impl LoginForm {
	/// Remembered fields first, configuration defaults for the rest.
	pub fn prefill(remembered: &Remembered, config: &AppConfig) -> Self {
		Self {
			user: remembered.user.clone().unwrap_or_default(),
			pass: remembered.pass.clone().unwrap_or_default(),
			host: remembered.host.clone().unwrap_or_else(|| config.host.clone()),
			port: remembered.port.unwrap_or(config.port).to_string(),
			scheme: remembered.scheme.unwrap_or(config.scheme).to_string(),
			remember: remembered.remember,
		}
	}

	pub fn credentials(&self) -> Result<Credentials, String> {
		let host = self.host.trim();
		if host.is_empty() {
			return Err("Host is required".into());
		}
		let port = self
			.port
			.trim()
			.parse::<u16>()
			.map_err(|_| format!("Invalid port {:?}", self.port))?;
		let scheme: Scheme = self.scheme.parse()?;
		Ok(Credentials {
			user: self.user.trim().to_string(),
			pass: self.pass.clone(),
			host: host.to_string(),
			port,
			scheme,
		})
	}
}

/// Login page. Checks the credentials against the database before opening the dashboard.
#[component]
pub fn Login() -> impl IntoView {
	let app = expect_context::<AppContext>();
	let navigate = use_navigate();

	let initial = app
		.store
		.with_untracked(|s| LoginForm::prefill(s.session().remembered(), &app.config.get_value()));
	let user = RwSignal::new(initial.user);
	let pass = RwSignal::new(initial.pass);
	let host = RwSignal::new(initial.host);
	let port = RwSignal::new(initial.port);
	let scheme = RwSignal::new(initial.scheme);
	let remember = RwSignal::new(initial.remember);
	let pending = RwSignal::new(false);

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		if pending.get_untracked() {
			return;
		}
		let form = LoginForm {
			user: user.get_untracked(),
			pass: pass.get_untracked(),
			host: host.get_untracked(),
			port: port.get_untracked(),
			scheme: scheme.get_untracked(),
			remember: remember.get_untracked(),
		};
		let credentials = match form.credentials() {
			Ok(credentials) => credentials,
			Err(message) => {
				app.toasts.notify(Notice::error(message));
				return;
			}
		};
		let database = app.config.with_value(|c| c.database.clone());
		let driver = HttpDriver::new(&credentials, &database);

		pending.set(true);
		let navigate = navigate.clone();
		spawn_local(async move {
			let address = credentials.base_url();
			match log_in(&driver, &app.store, credentials, form.remember).await {
				Ok(()) => {
					app.toasts.notify(Notice::info(format!("Connected to {address}")));
					navigate(routes::DASHBOARD, Default::default());
				}
				Err(err) => app.toasts.notify(Notice::error(err.to_string())),
			}
			pending.set(false);
		});
	};

	view! {
		<div class="login-page">
			<form class="login-form" on:submit=on_submit>
				<h1>"Storm Graph"</h1>
				<label>
					"User"
					<input type="text" autocomplete="username" bind:value=user />
				</label>
				<label>
					"Password"
					<input type="password" autocomplete="current-password" bind:value=pass />
				</label>
				<div class="login-address">
					<label>
						"Scheme"
						<select
							prop:value=move || scheme.get()
							on:change=move |ev| scheme.set(event_target_value(&ev))
						>
							{Scheme::ALL
								.into_iter()
								.map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> })
								.collect_view()}
						</select>
					</label>
					<label>
						"Host"
						<input type="text" bind:value=host />
					</label>
					<label>
						"Port"
						<input type="number" min="1" max="65535" bind:value=port />
					</label>
				</div>
				<label class="login-remember">
					<input type="checkbox" bind:checked=remember />
					"Remember me"
				</label>
				<button type="submit" disabled=move || pending.get()>
					{move || if pending.get() { "Connecting..." } else { "Log in" }}
				</button>
			</form>
		</div>
	}
}
