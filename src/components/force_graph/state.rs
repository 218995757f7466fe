//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-node display data, the
//! pan/zoom transform, drag/pan gestures, hover highlighting and selection.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::Theme;
use super::types::GraphData;

/// Fixed fill colours for the resource types the explorer is usually pointed at.
pub fn default_type_colors() -> HashMap<String, String> {
	[
		("AADApplication", "#7b1fa2"),
		("AADGroup", "#8e24aa"),
		("AADRole", "#6a1b9a"),
		("AADServicePrincipal", "#9c27b0"),
		("AADUser", "#ab47bc"),
		("Tenant", "#455a64"),
		("Subscription", "#546e7a"),
		("ResourceGroup", "#78909c"),
		("VirtualMachine", "#e65100"),
		("Disk", "#ef6c00"),
		("ServiceFabric", "#f57c00"),
		("ServerFarm", "#fb8c00"),
		("WebSite", "#ffa726"),
		("VirtualNetwork", "#1565c0"),
		("NetworkInterface", "#1976d2"),
		("NetworkSecurityGroup", "#c62828"),
		("Rule", "#e53935"),
		("PublicIp", "#1e88e5"),
		("IpConfiguration", "#42a5f5"),
		("LoadBalancer", "#0d47a1"),
		("StorageAccount", "#2e7d32"),
		("SQLServer", "#388e3c"),
		("SQLDatabase", "#43a047"),
		("KeyVault", "#f9a825"),
		("GenericAsset", "#757575"),
	]
	.into_iter()
	.map(|(k, v)| (k.to_string(), v.to_string()))
	.collect()
}

/// Per-node display data attached to each node in the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	/// Element id of the node.
	pub id: String,
	pub label: Option<String>,
	pub color: String,
	/// Size multiplier (1.0 = normal); grows with the number of edges.
	pub size: f64,
}

/// A drawn edge between two simulation nodes.
#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub label: String,
	/// Position among edges joining the same pair, used to stack labels.
	pub lane: usize,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Pointer movement (screen pixels) after which a press counts as a drag.
pub const CLICK_TOLERANCE: f64 = 4.0;

/// An in-progress node drag.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
	/// Pointer left the click tolerance; releasing will not select.
	pub moved: bool,
}

/// An in-progress canvas pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

/// Hold time before a highlight may start fading, in seconds.
const MIN_HOLD_TIME: f64 = 0.12;
const FADE_IN_SPEED: f64 = 6.0;
const FADE_OUT_SPEED: f64 = 4.0;

/// Smoothly animated hover highlight.
///
/// The hovered node and its neighbours fade in; nodes that leave the set are
/// held briefly and then decay exponentially, so skimming past a node does
/// not flash the whole graph.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	pub hovered_node: Option<DefaultNodeIdx>,
	targets: HashSet<DefaultNodeIdx>,
	intensity: HashMap<DefaultNodeIdx, f64>,
	hold: HashMap<DefaultNodeIdx, f64>,
	max: f64,
}

impl HighlightState {
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>, edges: &[EdgeInfo]) {
		if self.hovered_node == node {
			return;
		}
		self.hovered_node = node;
		self.targets.clear();
		let Some(idx) = node else {
			return;
		};
		self.targets.insert(idx);
		for edge in edges {
			if edge.source == idx {
				self.targets.insert(edge.target);
			} else if edge.target == idx {
				self.targets.insert(edge.source);
			}
		}
		for &idx in &self.targets {
			self.hold.insert(idx, MIN_HOLD_TIME);
		}
	}

	pub fn tick(&mut self, dt: f64) {
		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for &idx in &self.targets {
			let value = self.intensity.entry(idx).or_insert(0.0);
			*value += (1.0 - *value) * fade_in;
		}

		let targets = &self.targets;
		self.hold.retain(|idx, timer| {
			if targets.contains(idx) {
				return true;
			}
			*timer -= dt;
			*timer > 0.0
		});

		let hold = &self.hold;
		let mut max: f64 = 0.0;
		self.intensity.retain(|idx, value| {
			if !targets.contains(idx) && !hold.contains_key(idx) {
				*value *= fade_out;
			}
			max = max.max(*value);
			*value > 0.005
		});
		self.max = max;
	}

	/// Highlight intensity of a node in 0.0..=1.0.
	pub fn node_intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Geometric mean of both endpoints, so edges fade with their nodes.
	pub fn edge_intensity(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> f64 {
		(self.node_intensity(a) * self.node_intensity(b)).sqrt()
	}

	pub fn max_intensity(&self) -> f64 {
		self.max
	}
}

/// Which way an edge points relative to the hovered node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeDirection {
	Incoming,
	Outgoing,
	Unrelated,
}

/// Physics simulation plus everything needed to draw and interact with it.
///
/// Built when data arrives and rebuilt whenever the visualization set
/// changes; [`ForceGraphState::tick`] advances it once per animation frame.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub highlight: HighlightState,
	pub selected: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	ids: HashMap<String, DefaultNodeIdx>,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64, theme: &Theme) -> Self {
		let mut state = Self {
			graph: new_simulation(),
			edges: Vec::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			selected: None,
			width,
			height,
			ids: HashMap::new(),
		};
		state.rebuild(data, theme, &default_type_colors());
		state
	}

	/// Replaces the simulated graph with `data`.
	///
	/// Nodes that were already on screen keep their position and pin; new
	/// nodes start next to an existing neighbour, or on a ring around the
	/// centre of the view.
	pub fn rebuild(&mut self, data: &GraphData, theme: &Theme, type_colors: &HashMap<String, String>) {
		let mut previous: HashMap<String, (f32, f32, bool)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			previous.insert(
				node.data.user_data.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});

		let mut degree: HashMap<&str, usize> = HashMap::new();
		for link in &data.links {
			*degree.entry(link.source.as_str()).or_insert(0) += 1;
			*degree.entry(link.target.as_str()).or_insert(0) += 1;
		}
		let max_degree = degree.values().copied().max().unwrap_or(1).max(1);

		let mut graph = new_simulation();
		let mut ids = HashMap::new();
		let centre = self.screen_to_graph(self.width / 2.0, self.height / 2.0);
		let count = data.nodes.len().max(1) as f64;

		for (i, node) in data.nodes.iter().enumerate() {
			let color = match &node.group {
				Some(t) => type_colors
					.get(t)
					.cloned()
					.unwrap_or_else(|| theme.palette.for_key(t).to_css()),
				None => theme.node.untyped.to_css(),
			};
			let (x, y, is_anchor) = previous
				.get(&node.id)
				.copied()
				.or_else(|| {
					neighbour_position(&node.id, data, &previous).map(|(x, y)| (x, y, false))
				})
				.unwrap_or_else(|| {
					let angle = i as f64 * 2.0 * PI / count;
					(
						(centre.0 + 100.0 * angle.cos()) as f32,
						(centre.1 + 100.0 * angle.sin()) as f32,
						false,
					)
				});
			let edge_factor =
				(degree.get(node.id.as_str()).copied().unwrap_or(0) as f64 / max_degree as f64).sqrt();

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color,
					size: 0.8 + 0.7 * edge_factor,
				},
			});
			ids.insert(node.id.clone(), idx);
		}

		let mut edges = Vec::with_capacity(data.links.len());
		let mut lanes: HashMap<(DefaultNodeIdx, DefaultNodeIdx), usize> = HashMap::new();
		for link in &data.links {
			let (Some(&source), Some(&target)) = (ids.get(&link.source), ids.get(&link.target))
			else {
				continue;
			};
			let pair = if source.index() <= target.index() {
				(source, target)
			} else {
				(target, source)
			};
			let lane = lanes.entry(pair).or_insert(0);
			graph.add_edge(source, target, EdgeData::default());
			edges.push(EdgeInfo {
				source,
				target,
				label: link.label.clone(),
				lane: *lane,
			});
			*lane += 1;
		}

		let selected_id = self.selected_id();
		self.graph = graph;
		self.edges = edges;
		self.ids = ids;
		self.highlight = HighlightState::default();
		self.drag = DragState::default();
		self.selected = selected_id.and_then(|id| self.ids.get(&id).copied());
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < scale.hit_radius * node.data.user_data.size {
				found = Some(node.index());
			}
		});
		found
	}

	/// Element id of a simulation node.
	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		self.ids
			.iter()
			.find(|&(_, &i)| i == idx)
			.map(|(id, _)| id.clone())
	}

	pub fn selected_id(&self) -> Option<String> {
		self.selected.and_then(|idx| self.node_id(idx))
	}

	/// Marks the node with element id `id` as selected (edges are not drawn as selectable).
	pub fn select(&mut self, id: Option<&str>) {
		self.selected = id.and_then(|id| self.ids.get(id).copied());
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.highlight.set_hover(node, &self.edges);
	}

	pub fn edge_direction(&self, edge: &EdgeInfo) -> EdgeDirection {
		match self.highlight.hovered_node {
			Some(idx) if edge.target == idx => EdgeDirection::Incoming,
			Some(idx) if edge.source == idx => EdgeDirection::Outgoing,
			_ => EdgeDirection::Unrelated,
		}
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.highlight.tick(dt as f64);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

fn new_simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

/// Position next to an already placed neighbour of `id`, if it has one.
fn neighbour_position(
	id: &str,
	data: &GraphData,
	placed: &HashMap<String, (f32, f32, bool)>,
) -> Option<(f32, f32)> {
	data.links.iter().find_map(|link| {
		let other = if link.source == id {
			&link.target
		} else if link.target == id {
			&link.source
		} else {
			return None;
		};
		// Offset derived from the id so siblings do not stack on one point.
		let spread = id.bytes().fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32));
		let angle = (spread % 360) as f32 * std::f32::consts::PI / 180.0;
		placed
			.get(other)
			.map(|&(x, y, _)| (x + 40.0 * angle.cos(), y + 40.0 * angle.sin()))
	})
}
