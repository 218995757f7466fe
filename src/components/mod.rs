//! UI components.

mod dashboard;
pub mod force_graph;
mod login;
pub mod toast;

pub use dashboard::Dashboard;
pub use login::Login;
