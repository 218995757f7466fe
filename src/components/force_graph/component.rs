//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, zooming and selection. An animation
//! loop runs via `requestAnimationFrame`, calling the physics simulation and
//! renderer each frame until the component is unmounted.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::scale::ScaleConfig;
use super::state::{CLICK_TOLERANCE, ForceGraphState, default_type_colors};
use super::theme::Theme;
use super::types::GraphData;

/// Bundles graph simulation state with visual configuration.
struct GraphContext {
	state: ForceGraphState,
	scale: ScaleConfig,
	theme: Theme,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Client size of the canvas' parent, or the fallback when it is detached
/// or has not been laid out yet.
fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(FALLBACK_SIZE)
}

/// Pointer position relative to the canvas, in screen pixels.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// The simulation is rebuilt whenever `data` changes, keeping the positions
/// of nodes that survive. A click on a node reports its id through
/// `on_select`; a click on the empty canvas reports `None`. Dragging a node
/// pins it in place.
///
/// The canvas fills its parent container and re-measures it whenever the
/// window is resized.
#[component]
pub fn ForceGraphCanvas(
	/// Graph to draw.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Id of the node drawn with the selection ring.
	#[prop(into)]
	selected: Signal<Option<String>>,
	/// Called with the clicked node id, or `None` for a click on empty canvas.
	#[prop(optional, into)]
	on_select: Option<Callback<Option<String>>>,
	/// Colours.
	#[prop(optional)]
	theme: Theme,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));
	let (context_init, animate_init, resize_cb_init, alive_init) =
		(context.clone(), animate.clone(), resize_cb.clone(), alive.clone());

	let alive_cleanup = alive.clone();
	on_cleanup(move || alive_cleanup.store(false, Ordering::Relaxed));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = container_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			return;
		};

		let mut state = ForceGraphState::new(&data.get_untracked(), w, h, &theme);
		state.select(selected.get_untracked().as_deref());
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			scale: ScaleConfig::default(),
			theme: theme.clone(),
		});

		let (context_resize, canvas_resize, alive_resize) =
			(context_init.clone(), canvas.clone(), alive_init.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_resize.load(Ordering::Relaxed) {
				return;
			}
			let (nw, nh) = container_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner, alive_anim) =
			(context_init.clone(), animate_init.clone(), alive_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_anim.load(Ordering::Relaxed) {
				debug!("storm-graph: canvas unmounted, stopping animation");
				return;
			}
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(0.016);
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_data = context.clone();
	Effect::new(move |_| {
		let graph = data.get();
		if let Some(ref mut c) = *context_data.borrow_mut() {
			let GraphContext { state, theme, .. } = c;
			state.rebuild(&graph, theme, &default_type_colors());
			debug!(
				"storm-graph: canvas rebuilt with {} nodes, {} edges",
				graph.nodes.len(),
				graph.links.len()
			);
		}
	});

	let context_sel = context.clone();
	Effect::new(move |_| {
		let id = selected.get();
		if let Some(ref mut c) = *context_sel.borrow_mut() {
			c.state.select(id.as_deref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			let state = &mut c.state;
			if let Some(idx) = state.node_at_position(x, y, &c.scale) {
				state.drag.active = true;
				state.drag.moved = false;
				state.drag.node_idx = Some(idx);
				state.drag.start_x = x;
				state.drag.start_y = y;
				let mut start = (0.0, 0.0);
				state.graph.visit_nodes(|node| {
					if node.index() == idx {
						start = (node.x(), node.y());
					}
				});
				(state.drag.node_start_x, state.drag.node_start_y) = start;
			} else {
				state.pan.active = true;
				state.pan.moved = false;
				state.pan.start_x = x;
				state.pan.start_y = y;
				state.pan.transform_start_x = state.transform.x;
				state.pan.transform_start_y = state.transform.y;
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			let state = &mut c.state;
			if !state.drag.active {
				let hovered = state.node_at_position(x, y, &c.scale);
				state.set_hover(hovered);
			}

			if state.drag.active {
				let (sx, sy) = (x - state.drag.start_x, y - state.drag.start_y);
				state.drag.moved |= sx.hypot(sy) > CLICK_TOLERANCE;
				if let (Some(idx), true) = (state.drag.node_idx, state.drag.moved) {
					let k = state.transform.k;
					let (nx, ny) = (
						state.drag.node_start_x + (sx / k) as f32,
						state.drag.node_start_y + (sy / k) as f32,
					);
					state.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if state.pan.active {
				let (sx, sy) = (x - state.pan.start_x, y - state.pan.start_y);
				state.pan.moved |= sx.hypot(sy) > CLICK_TOLERANCE;
				state.transform.x = state.pan.transform_start_x + sx;
				state.transform.y = state.pan.transform_start_y + sy;
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = match *context_mu.borrow_mut() {
			Some(ref mut c) => {
				let state = &mut c.state;
				let clicked = if state.drag.active && !state.drag.moved {
					Some(state.drag.node_idx.and_then(|idx| state.node_id(idx)))
				} else if state.pan.active && !state.pan.moved {
					Some(None)
				} else {
					None
				};
				state.drag = Default::default();
				state.pan.active = false;
				clicked
			}
			None => None,
		};
		// Borrow released before handing control to the owner.
		if let (Some(selection), Some(on_select)) = (clicked, on_select) {
			on_select.run(selection);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.drag = Default::default();
			c.state.pan.active = false;
			c.state.set_hover(None);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let transform = &mut c.state.transform;
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / transform.k;
			transform.x = x - (x - transform.x) * ratio;
			transform.y = y - (y - transform.y) * ratio;
			transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
