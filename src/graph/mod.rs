//! Query results to visualization elements.
//!
//! - [`value`]: what a driver hands back (records of nodes, relationships, scalars)
//! - [`classify`]: pluggable node/relationship detection
//! - [`element`]: the deduplicated, renderer-ready element set
//! - [`normalize`]: shaping plus the replace/expand merge policy
//! - [`summary`]: details about a selected element

pub mod classify;
pub mod element;
pub mod normalize;
pub mod summary;
pub mod value;

pub use classify::{CapabilityProbe, Classified, Classifier, ClassifyValue, TagProbe};
pub use element::{EdgeElement, ElementGroup, NodeElement, VisElement, VisualizationSet};
pub use normalize::{Normalized, QueryMode, normalize};
pub use summary::{ElementSummary, summarize};
pub use value::{DbValue, GraphValue, NodeValue, Record, RelationshipValue};
