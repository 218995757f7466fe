//! Canvas rendering for the force graph.
//!
//! Drawing happens in passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edge lines, arrows and relationship labels (world space)
//! 3. Dimmed nodes, then highlighted nodes and the selection ring on top

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{EdgeDirection, EdgeInfo, ForceGraphState, NodeInfo};
use super::theme::{Color, Theme};

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, config: &ScaleConfig, theme: &Theme) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let gradient = theme
		.background
		.use_gradient
		.then(|| ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, state.width.max(state.height) * 0.8))
		.and_then(Result::ok);

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let Ok(gradient) = ctx.create_radial_gradient(
		cx,
		cy,
		state.width.min(state.height) * 0.3,
		cx,
		cy,
		state.width.max(state.height) * 0.7,
	) else {
		return;
	};

	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(1.0, &Color::rgba(0, 0, 0, theme.background.vignette).to_css());

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

/// World-space position and size multiplier of every simulated node.
fn node_positions(state: &ForceGraphState) -> HashMap<DefaultNodeIdx, (f64, f64, f64)> {
	let mut positions = HashMap::new();
	state.graph.visit_nodes(|node| {
		positions.insert(
			node.index(),
			(node.x() as f64, node.y() as f64, node.data.user_data.size),
		);
	});
	positions
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let positions = node_positions(state);
	let max_t = smooth_step(state.highlight.max_intensity());

	for edge in &state.edges {
		let (Some(&(x1, y1, _)), Some(&(x2, y2, target_size))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let edge_t = smooth_step(state.highlight.edge_intensity(edge.source, edge.target));
		let (alpha, width) = if edge_t > 0.01 {
			(0.7 + 0.3 * edge_t, scale.edge_line_width * (1.0 + 0.5 * edge_t))
		} else if max_t > 0.01 {
			(0.7 - 0.5 * max_t, scale.edge_line_width * (1.0 - 0.3 * max_t))
		} else {
			(0.7, scale.edge_line_width)
		};

		let color = match state.edge_direction(edge) {
			EdgeDirection::Incoming => theme.edge.incoming,
			EdgeDirection::Outgoing => theme.edge.outgoing,
			EdgeDirection::Unrelated => theme.edge.color,
		};
		let color = color.with_alpha(alpha * color.a);

		let (ux, uy) = (dx / dist, dy / dist);
		let target_radius = scale.node_radius * target_size;

		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1 + ux * scale.node_radius, y1 + uy * scale.node_radius);
		ctx.line_to(
			x2 - ux * (target_radius + scale.arrow_size),
			y2 - uy * (target_radius + scale.arrow_size),
		);
		ctx.stroke();

		if !scale.cull_arrows {
			let (tip_x, tip_y) = (x2 - ux * target_radius, y2 - uy * target_radius);
			let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
			let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);

			ctx.set_fill_style_str(&color.with_alpha(color.a * scale.arrow_alpha).to_css());
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}

		let label_alpha = scale.edge_label_alpha * if max_t > 0.01 { 0.3 + 0.7 * edge_t } else { 1.0 };
		if label_alpha > 0.01 && !edge.label.is_empty() {
			draw_edge_label(ctx, edge, scale, theme, (x1 + x2) / 2.0, (y1 + y2) / 2.0, label_alpha);
		}
	}
}

fn draw_edge_label(
	ctx: &CanvasRenderingContext2d,
	edge: &EdgeInfo,
	scale: &ScaledValues,
	theme: &Theme,
	x: f64,
	y: f64,
	alpha: f64,
) {
	let label = &theme.edge.label;
	let lane_offset = edge.lane as f64 * scale.ring_offset * 6.0;
	ctx.set_font(&scale.edge_label_font);
	ctx.set_text_align("center");
	ctx.set_fill_style_str(&label.with_alpha(label.a * alpha).to_css());
	let _ = ctx.fill_text(&edge.label, x, y + lane_offset);
	ctx.set_text_align("start");
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let (dim_alpha, dim_radius) = if max_t > 0.01 {
		(1.0 - 0.7 * max_t, 1.0 - 0.15 * max_t)
	} else {
		(1.0, 1.0)
	};

	// Pass 1: nodes outside the highlight
	state.graph.visit_nodes(|node| {
		if state.highlight.node_intensity(node.index()) > 0.001 {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		draw_node(ctx, &node.data.user_data, x, y, scale, theme, dim_alpha, dim_radius);
	});

	// Pass 2: highlighted and fading nodes on top
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let node_t = state.highlight.node_intensity(idx);
		if node_t <= 0.001 {
			return;
		}
		let eased = smooth_step(node_t);
		let target_radius = if state.highlight.hovered_node == Some(idx) { 1.4 } else { 1.2 };
		let alpha = dim_alpha + (1.0 - dim_alpha) * eased;
		let radius_mult = dim_radius + (target_radius - dim_radius) * eased;
		let (x, y) = (node.x() as f64, node.y() as f64);
		draw_node(ctx, &node.data.user_data, x, y, scale, theme, alpha, radius_mult);
	});

	// Pass 3: selection ring
	let Some(selected) = state.selected else {
		return;
	};
	state.graph.visit_nodes(|node| {
		if node.index() != selected {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let radius = scale.node_radius * node.data.user_data.size;
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.node.selected.to_css());
		ctx.set_line_width(scale.ring_width * 2.0);
		ctx.stroke();
	});
}

#[allow(clippy::too_many_arguments)]
fn draw_node(
	ctx: &CanvasRenderingContext2d,
	info: &NodeInfo,
	x: f64,
	y: f64,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	radius_mult: f64,
) {
	let radius = scale.node_radius * radius_mult * info.size;
	let base = Color::parse(&info.color);

	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);

	let gradient = theme
		.node
		.use_gradient
		.then(|| ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius))
		.and_then(Result::ok);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&base.to_css()),
	}
	ctx.fill();
	ctx.set_global_alpha(1.0);

	if let Some(label) = info.label.as_deref().filter(|_| alpha > 0.5) {
		ctx.set_font(&scale.label_font);
		let text_x = x + radius + 4.0;
		if let Ok(metrics) = ctx.measure_text(label) {
			let pad = 2.0 / scale.k;
			let height = scale.label_size;
			ctx.set_fill_style_str(&theme.node.label_background.with_alpha(0.7 * alpha).to_css());
			ctx.fill_rect(text_x - pad, y - height * 0.75, metrics.width() + pad * 2.0, height);
		}
		ctx.set_fill_style_str(&Color::rgba(255, 255, 255, 0.9 * alpha).to_css());
		let _ = ctx.fill_text(label, text_x, y + 3.0);
	}
}
