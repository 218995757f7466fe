//! On-screen notices.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use log::debug;

use crate::notify::{DEFAULT_TIMEOUT_MS, Notice, Notify};

/// A notice with the id used to dismiss it.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
	/// Handle passed to [`Toasts::dismiss`].
	pub id: u64,
	/// What is shown.
	pub notice: Notice,
}

/// Notices currently on screen, oldest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ToastQueue {
	next_id: u64,
	entries: Vec<Toast>,
}

impl ToastQueue {
	pub fn push(&mut self, notice: Notice) -> u64 {
		self.next_id += 1;
		self.entries.push(Toast {
			id: self.next_id,
			notice,
		});
		self.next_id
	}

	pub fn dismiss(&mut self, id: u64) {
		self.entries.retain(|t| t.id != id);
	}

	pub fn entries(&self) -> &[Toast] {
		&self.entries
	}
}

/// Reactive toast queue; cheap to copy into closures and async tasks.
///
/// Notices carrying the stock timeout are shown for the configured
/// `timeout_ms` instead; explicit timeouts are kept.
#[derive(Clone, Copy, Debug)]
pub struct Toasts {
	queue: RwSignal<ToastQueue>,
	timeout_ms: u32,
}

impl Toasts {
	/// Empty queue showing stock-timeout notices for `timeout_ms`.
	pub fn new(timeout_ms: u32) -> Self {
		Self {
			queue: RwSignal::new(ToastQueue::default()),
			timeout_ms,
		}
	}

	/// Removes the toast with `id`, if it is still shown.
	pub fn dismiss(&self, id: u64) {
		self.queue.update(|q| q.dismiss(id));
	}

	/// Toasts on screen, oldest first. Tracks the queue when read reactively.
	pub fn entries(&self) -> Vec<Toast> {
		self.queue.with(|q| q.entries().to_vec())
	}
}

impl Notify for Toasts {
	fn notify(&self, mut notice: Notice) {
		if notice.timeout_ms == DEFAULT_TIMEOUT_MS {
			notice.timeout_ms = self.timeout_ms;
		}
		debug!("storm-graph: notice {:?}: {}", notice.level, notice.message);
		let timeout = notice.timeout_ms;
		let Some(id) = self.queue.try_update(|q| q.push(notice)) else {
			return;
		};
		let toasts = *self;
		Timeout::new(timeout, move || toasts.dismiss(id)).forget();
	}
}

/// Stack of notices in the bottom-right corner. Clicking one dismisses it.
#[component]
pub fn ToastStack(toasts: Toasts) -> impl IntoView {
	view! {
		<div
			class="toast-stack"
			style="position: fixed; right: 1rem; bottom: 1rem; display: flex; flex-direction: column; gap: 0.5rem; z-index: 10;"
		>
			<For each=move || toasts.entries() key=|toast| toast.id let:toast>
				<div
					class="toast"
					role="status"
					style=format!(
						"background: {}; color: #fff; padding: 0.6rem 1rem; border-radius: 4px; cursor: pointer; max-width: 28rem;",
						toast.notice.level.color(),
					)
					on:click=move |_| toasts.dismiss(toast.id)
				>
					{toast.notice.message.clone()}
				</div>
			</For>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn queue_dismisses_by_id() {
		let mut queue = ToastQueue::default();
		let first = queue.push(Notice::info("connected"));
		let second = queue.push(Notice::warning("No results found"));
		assert_ne!(first, second);

		queue.dismiss(first);
		assert_eq!(queue.entries().len(), 1);
		assert_eq!(queue.entries()[0].id, second);

		queue.dismiss(first);
		assert_eq!(queue.entries().len(), 1);
	}
}
