//! Zoom-dependent sizing for graph visuals.
//!
//! Values are either world-space (they grow when zooming in) or screen-space
//! (constant pixel size). [`ScaledValues`] resolves a [`ScaleConfig`] for one
//! zoom level `k` so the renderer can draw straight after the canvas
//! transform is applied.

/// How a size responds to zoom.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels).
	Screen,
	/// World-space size, clamped to min/max screen-space bounds.
	Clamped {
		/// Smallest on-screen size, in pixels.
		min_screen: f64,
		/// Largest on-screen size, in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// How opacity responds to zoom.
#[derive(Clone, Debug)]
pub enum AlphaBehavior {
	/// Alpha scales linearly with zoom, clamped to [0, 1].
	ScaleWithZoom,
	/// Invisible at `zero_alpha_k`, fully visible from `full_alpha_k`.
	Fade {
		/// Zoom at which the element disappears.
		zero_alpha_k: f64,
		/// Zoom from which the element is opaque.
		full_alpha_k: f64,
	},
}

impl AlphaBehavior {
	/// Opacity at zoom `k`, in [0, 1].
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::ScaleWithZoom => k.clamp(0.0, 1.0),
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				((k - zero_alpha_k) / (full_alpha_k - zero_alpha_k)).clamp(0.0, 1.0)
			}
		}
	}
}

/// Node circle, hit area and label sizing.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Base node radius in world units.
	pub radius: f64,
	/// How `radius` follows zoom.
	pub radius_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	/// How `hit_radius` follows zoom.
	pub hit_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Zoom below which labels stop shrinking.
	pub label_min_k: f64,
}

/// Relationship line and label sizing.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
	/// Relationship-type label font size in screen pixels.
	pub label_size: f64,
	/// Edge labels fade out when zooming out.
	pub label_alpha_behavior: AlphaBehavior,
}

/// Arrowhead sizing and fading.
#[derive(Clone, Debug)]
pub struct ArrowScaleConfig {
	/// Base arrow size in world units.
	pub size: f64,
	/// How `size` follows zoom.
	pub size_behavior: ScaleBehavior,
	/// How arrow opacity follows zoom.
	pub alpha_behavior: AlphaBehavior,
	/// Minimum alpha to bother drawing.
	pub cull_alpha: f64,
}

/// Hover and selection ring sizing.
#[derive(Clone, Debug)]
pub struct RingScaleConfig {
	/// Stroke width of hover and selection rings in screen pixels.
	pub width: f64,
	/// Gap between node and ring in screen pixels.
	pub offset: f64,
}

/// Sizing rules for everything the renderer draws.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Nodes.
	pub node: NodeScaleConfig,
	/// Relationships.
	pub edge: EdgeScaleConfig,
	/// Arrowheads.
	pub arrow: ArrowScaleConfig,
	/// Rings.
	pub ring: RingScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 6.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 5.0,
					max_screen: f64::INFINITY,
				},
				hit_radius: 12.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 6.0,
					max_screen: f64::INFINITY,
				},
				label_size: 10.0,
				label_min_k: 0.5,
			},
			edge: EdgeScaleConfig {
				line_width: 1.5,
				label_size: 8.0,
				label_alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.6,
					full_alpha_k: 1.2,
				},
			},
			arrow: ArrowScaleConfig {
				size: 5.0,
				size_behavior: ScaleBehavior::Clamped {
					min_screen: 0.0,
					max_screen: 18.0,
				},
				alpha_behavior: AlphaBehavior::ScaleWithZoom,
				cull_alpha: 0.05,
			},
			ring: RingScaleConfig {
				width: 1.5,
				offset: 2.0,
			},
		}
	}
}

/// A [`ScaleConfig`] resolved for one zoom level, in world-space units.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Zoom level these values were resolved for.
	pub k: f64,
	/// Node circle radius.
	pub node_radius: f64,
	/// Pointer hit radius around a node.
	pub hit_radius: f64,
	/// Node label font size in world units.
	pub label_size: f64,
	/// Canvas font string for node labels.
	pub label_font: String,
	/// Relationship line width.
	pub edge_line_width: f64,
	/// Canvas font string for relationship types.
	pub edge_label_font: String,
	/// Opacity of relationship types.
	pub edge_label_alpha: f64,
	/// Arrowhead length.
	pub arrow_size: f64,
	/// Arrowhead opacity.
	pub arrow_alpha: f64,
	/// Arrow alpha below the cull threshold.
	pub cull_arrows: bool,
	/// Ring stroke width.
	pub ring_width: f64,
	/// Gap between a node and its ring.
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Resolves `config` at zoom `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_font_size = config.node.label_size / k.max(config.node.label_min_k);
		let edge_label_size = config.edge.label_size / k.max(config.node.label_min_k);
		let arrow_alpha = config.arrow.alpha_behavior.apply(k);

		Self {
			k,
			node_radius: config.node.radius_behavior.apply(config.node.radius, k),
			hit_radius: config.node.hit_behavior.apply(config.node.hit_radius, k),
			label_size: label_font_size,
			label_font: format!("{label_font_size}px sans-serif"),
			edge_line_width: ScaleBehavior::Screen.apply(config.edge.line_width, k),
			edge_label_font: format!("{edge_label_size}px monospace"),
			edge_label_alpha: config.edge.label_alpha_behavior.apply(k),
			arrow_size: config.arrow.size_behavior.apply(config.arrow.size, k),
			arrow_alpha,
			cull_arrows: arrow_alpha < config.arrow.cull_alpha,
			ring_width: config.ring.width / k,
			ring_offset: config.ring.offset / k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_sizes_respect_screen_bounds() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 5.0,
			max_screen: 20.0,
		};
		// zoomed far out: world size grows so the screen size stays >= 5px
		assert_eq!(behavior.apply(1.0, 0.5), 10.0);
		assert_eq!(behavior.apply(10.0, 1.0), 10.0);
		assert_eq!(behavior.apply(10.0, 4.0), 5.0);
	}

	#[test]
	fn edge_labels_fade_when_zoomed_out() {
		let scaled = ScaledValues::new(&ScaleConfig::default(), 0.5);
		assert_eq!(scaled.edge_label_alpha, 0.0);
		let scaled = ScaledValues::new(&ScaleConfig::default(), 2.0);
		assert_eq!(scaled.edge_label_alpha, 1.0);
		assert!(!scaled.cull_arrows);
	}
}
