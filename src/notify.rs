//! Transient user notifications.

use std::cell::RefCell;

/// How long a notice stays on screen unless configured otherwise.
pub const DEFAULT_TIMEOUT_MS: u32 = 3000;

/// Severity, which picks the toast colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
	/// Something succeeded.
	Info,
	/// Nothing broke, but the result is not what the user expected.
	Warning,
	/// Something failed.
	Error,
}

impl NoticeLevel {
	/// CSS colour of the toast.
	pub fn color(self) -> &'static str {
		match self {
			NoticeLevel::Info => "#1976d2",
			NoticeLevel::Warning => "#e65100",
			NoticeLevel::Error => "#c62828",
		}
	}
}

/// A fire-and-forget message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
	/// Severity.
	pub level: NoticeLevel,
	/// Text shown to the user.
	pub message: String,
	/// How long the notice stays up.
	pub timeout_ms: u32,
}

impl Notice {
	/// Notice with the stock timeout.
	pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
		Self {
			level,
			message: message.into(),
			timeout_ms: DEFAULT_TIMEOUT_MS,
		}
	}

	/// Info notice.
	pub fn info(message: impl Into<String>) -> Self {
		Self::new(NoticeLevel::Info, message)
	}

	/// Warning notice.
	pub fn warning(message: impl Into<String>) -> Self {
		Self::new(NoticeLevel::Warning, message)
	}

	/// Error notice.
	pub fn error(message: impl Into<String>) -> Self {
		Self::new(NoticeLevel::Error, message)
	}

	/// Overrides the timeout.
	pub fn with_timeout(self, timeout_ms: u32) -> Self {
		Self { timeout_ms, ..self }
	}
}

/// Notification surface.
pub trait Notify {
	/// Shows `notice` to the user.
	fn notify(&self, notice: Notice);
}

/// Collects notices instead of showing them.
#[derive(Debug, Default)]
pub struct NoticeLog {
	notices: RefCell<Vec<Notice>>,
}

impl NoticeLog {
	/// Drains the collected notices, oldest first.
	pub fn take(&self) -> Vec<Notice> {
		self.notices.take()
	}
}

impl Notify for NoticeLog {
	fn notify(&self, notice: Notice) {
		self.notices.borrow_mut().push(notice);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn constructors_set_level_and_default_timeout() {
		let notice = Notice::warning("No results found");
		assert_eq!(notice.level, NoticeLevel::Warning);
		assert_eq!(notice.timeout_ms, DEFAULT_TIMEOUT_MS);
		assert_eq!(Notice::error("x").with_timeout(10).timeout_ms, 10);
	}

	#[test]
	fn log_drains_in_order() {
		let log = NoticeLog::default();
		log.notify(Notice::info("a"));
		log.notify(Notice::error("b"));
		let taken = log.take();
		assert_eq!(taken.len(), 2);
		assert_eq!(taken[1].message, "b");
		assert!(log.take().is_empty());
	}
}
