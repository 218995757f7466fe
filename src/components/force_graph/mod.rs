//! Force-directed graph visualization component.
//!
//! Renders the visualization set on an HTML canvas with:
//! - Physics-based node positioning via force simulation
//! - Pan, zoom, node dragging and click-to-select
//! - Relationship types drawn along edges, coloured by direction on hover
//! - Node fills picked by node type
//!
//! # Example
//!
//! ```ignore
//! use storm_graph::components::force_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode { id: "node_1".into(), label: Some("web01".into()), group: Some("VirtualMachine".into()) },
//!         GraphNode { id: "node_2".into(), label: Some("vnet".into()), group: Some("VirtualNetwork".into()) },
//!     ],
//!     links: vec![GraphLink {
//!         id: "edge_7".into(),
//!         source: "node_1".into(),
//!         target: "node_2".into(),
//!         label: "ATTACHED_TO".into(),
//!     }],
//! };
//!
//! view! { <ForceGraphCanvas data=data selected=Signal::stored(None) /> }
//! ```

mod component;
mod render;
pub mod scale;
mod state;
pub mod theme;
mod types;

pub use component::ForceGraphCanvas;
pub use state::default_type_colors;
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode};
