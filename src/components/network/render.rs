use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{NODE_RADIUS, NetworkState};
use crate::layout::Point;

const BACKGROUND: &str = "#FAFBFC";
const LABEL: &str = "#0F172A";
const MUTED: &str = "#64748B";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// `#RRGGBB` to `rgba(r, g, b, alpha)`; anything else passes through.
fn with_alpha(hex: &str, alpha: f64) -> String {
	let channel = |i: usize| hex.get(i..i + 2).and_then(|c| u8::from_str_radix(c, 16).ok());
	match (hex.len(), channel(1), channel(3), channel(5)) {
		(7, Some(r), Some(g), Some(b)) => format!("rgba({r}, {g}, {b}, {alpha:.3})"),
		_ => hex.to_string(),
	}
}

/// Stroke and arrow opacity of an edge while the hover fade is at `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct EdgeLook {
	stroke: f64,
	arrow: f64,
	width: f64,
}

impl EdgeLook {
	fn new(highlighted: bool, t: f64, width: f64) -> Self {
		let sign = if highlighted { 1.0 } else { -1.0 };
		let (stroke_gain, arrow_gain) = if highlighted { (0.3, 0.2) } else { (0.45, 0.45) };
		Self {
			stroke: 0.6 + sign * stroke_gain * t,
			arrow: 0.8 + sign * arrow_gain * t,
			width: width * (1.0 + sign * 0.3 * t),
		}
	}
}

/// An edge trimmed to the node discs, leaving room for its arrow head.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Arrow {
	tail: Point,
	/// Where the shaft stops and the head begins.
	neck: Point,
	tip: Point,
	barbs: (Point, Point),
}

impl Arrow {
	fn between(from: Point, to: Point, head: f64) -> Option<Self> {
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return None;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let tip = to.offset(-ux * NODE_RADIUS, -uy * NODE_RADIUS);
		let neck = tip.offset(-ux * head, -uy * head);
		let (px, py) = (-uy * head * 0.5, ux * head * 0.5);
		Some(Self {
			tail: from.offset(ux * NODE_RADIUS, uy * NODE_RADIUS),
			neck,
			tip,
			barbs: (neck.offset(px, py), neck.offset(-px, -py)),
		})
	}
}

/// Radius and glow radius of a highlighted node; no glow for plain members.
fn emphasis(hovered: bool, neighbour: bool, t: f64) -> (f64, f64) {
	match (hovered, neighbour) {
		(true, _) => (NODE_RADIUS * (1.0 + 0.35 * t), NODE_RADIUS * (1.8 + 1.2 * t)),
		(false, true) => (NODE_RADIUS * (1.0 + 0.2 * t), NODE_RADIUS * (1.4 + 0.6 * t)),
		(false, false) => (NODE_RADIUS, 0.0),
	}
}

/// One node ready to draw, faded ones first so highlights end up on top.
struct Sprite {
	at: Point,
	color: String,
	label: String,
	value: String,
	active: bool,
	highlighted: bool,
	hovered: bool,
	neighbour: bool,
}

pub fn render(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let t = ease_out_cubic(state.hover.highlight_t);
	draw_edges(state, ctx, t);
	draw_nodes(state, ctx, t);
	ctx.restore();
}

fn dashes(ctx: &CanvasRenderingContext2d, pattern: &[f64]) {
	let array = js_sys::Array::new();
	for step in pattern {
		array.push(&JsValue::from_f64(*step));
	}
	let _ = ctx.set_line_dash(&array);
}

fn disc(ctx: &CanvasRenderingContext2d, at: Point, radius: f64) {
	ctx.begin_path();
	let _ = ctx.arc(at.x, at.y, radius, 0.0, 2.0 * PI);
}

fn draw_edges(state: &NetworkState, ctx: &CanvasRenderingContext2d, t: f64) {
	let k = state.transform.k;
	let (dash, gap) = (8.0 / k, 4.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);

	state.graph.visit_edges(|effect, cause, _| {
		let from = Point::new(effect.x() as f64, effect.y() as f64);
		let to = Point::new(cause.x() as f64, cause.y() as f64);
		let Some(arrow) = Arrow::between(from, to, 9.0 / k) else {
			return;
		};
		let highlighted =
			state.is_highlighted(effect.index()) && state.is_highlighted(cause.index());
		let look = EdgeLook::new(highlighted, t, 2.0 / k);
		let color = &cause.data.user_data.color;

		ctx.set_stroke_style_str(&with_alpha(color, look.stroke));
		ctx.set_line_width(look.width);
		dashes(ctx, &[dash, gap]);
		ctx.set_line_dash_offset(dash_offset);
		ctx.begin_path();
		ctx.move_to(arrow.tail.x, arrow.tail.y);
		ctx.line_to(arrow.neck.x, arrow.neck.y);
		ctx.stroke();

		dashes(ctx, &[]);
		ctx.set_fill_style_str(&with_alpha(color, look.arrow));
		ctx.begin_path();
		for (i, p) in [arrow.tip, arrow.barbs.0, arrow.barbs.1].iter().enumerate() {
			if i == 0 {
				ctx.move_to(p.x, p.y);
			} else {
				ctx.line_to(p.x, p.y);
			}
		}
		ctx.close_path();
		ctx.fill();
	});
	dashes(ctx, &[]);
}

fn draw_label(ctx: &CanvasRenderingContext2d, sprite: &Sprite, radius: f64, k: f64) {
	let size = 12.0 / k.max(0.5);
	let (x, y) = (sprite.at.x + radius + 4.0, sprite.at.y + 4.0);
	ctx.set_fill_style_str(LABEL);
	ctx.set_font(&format!("600 {size}px 'DM Sans', sans-serif"));
	let _ = ctx.fill_text(&sprite.label, x, y);
	ctx.set_fill_style_str(MUTED);
	ctx.set_font(&format!("{}px 'DM Mono', monospace", size * 0.9));
	let _ = ctx.fill_text(&sprite.value, x, y + size * 1.2);
}

fn draw_nodes(state: &NetworkState, ctx: &CanvasRenderingContext2d, t: f64) {
	let k = state.transform.k;
	let fading = state.has_active_highlight();

	let mut sprites = Vec::new();
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let info = &node.data.user_data;
		sprites.push(Sprite {
			at: Point::new(node.x() as f64, node.y() as f64),
			color: info.color.clone(),
			label: info.label.clone(),
			value: info.value.clone(),
			active: info.active,
			highlighted: fading && state.is_highlighted(idx),
			hovered: state.is_hovered(idx),
			neighbour: state.hover.neighbors.contains(&idx)
				|| state.hover.prev_neighbors.contains(&idx),
		});
	});
	sprites.sort_by_key(|s| s.highlighted);

	for sprite in &sprites {
		if !sprite.highlighted {
			let (alpha, radius) = (1.0 - 0.7 * t, NODE_RADIUS * (1.0 - 0.15 * t));
			if sprite.active {
				disc(ctx, sprite.at, radius + 5.0 / k);
				ctx.set_fill_style_str(&with_alpha(&sprite.color, 0.27));
				ctx.fill();
			}
			ctx.set_global_alpha(alpha);
			disc(ctx, sprite.at, radius);
			ctx.set_fill_style_str(&sprite.color);
			ctx.fill();
			draw_label(ctx, sprite, radius, k);
			ctx.set_global_alpha(1.0);
			continue;
		}

		let (radius, glow) = emphasis(sprite.hovered, sprite.neighbour, t);
		if glow > 0.0 && t > 0.01 {
			let at = sprite.at;
			let halo = ctx.create_radial_gradient(at.x, at.y, radius * 0.3, at.x, at.y, glow);
			if let Ok(halo) = halo {
				let strength = t * if sprite.hovered { 0.45 } else { 0.25 };
				for (stop, share) in [(0.0, 1.0), (0.6, 0.3), (1.0, 0.0)] {
					let _ = halo.add_color_stop(stop, &with_alpha(&sprite.color, strength * share));
				}
				disc(ctx, at, glow);
				#[allow(deprecated)]
				ctx.set_fill_style(&halo);
				ctx.fill();
			}
		}

		disc(ctx, sprite.at, radius);
		ctx.set_fill_style_str(&sprite.color);
		ctx.fill();
		if (sprite.hovered && t > 0.01) || sprite.active {
			disc(ctx, sprite.at, radius + 2.0 / k);
			ctx.set_stroke_style_str(LABEL);
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
		draw_label(ctx, sprite, radius, k);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_colours_gain_alpha() {
		assert_eq!(with_alpha("#EF4444", 0.5), "rgba(239, 68, 68, 0.500)");
		assert_eq!(with_alpha("white", 0.5), "white");
	}

	#[test]
	fn arrows_stop_at_the_node_rims() {
		let arrow = Arrow::between(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 9.0).unwrap();
		assert_eq!(arrow.tail, Point::new(NODE_RADIUS, 0.0));
		assert_eq!(arrow.tip, Point::new(100.0 - NODE_RADIUS, 0.0));
		assert_eq!(arrow.neck.x, arrow.tip.x - 9.0);
		assert_eq!(arrow.barbs.0.y, -arrow.barbs.1.y);
		assert!(Arrow::between(Point::new(1.0, 1.0), Point::new(1.0, 1.0), 9.0).is_none());
	}

	#[test]
	fn hover_fade_brightens_highlighted_edges_only() {
		let base = EdgeLook::new(false, 0.0, 2.0);
		assert_eq!(base, EdgeLook::new(true, 0.0, 2.0));
		let lit = EdgeLook::new(true, 1.0, 2.0);
		let dim = EdgeLook::new(false, 1.0, 2.0);
		assert!((lit.stroke - 0.9).abs() < 1e-9);
		assert!((dim.stroke - 0.15).abs() < 1e-9);
		assert!(lit.width > base.width && dim.width < base.width);
	}

	#[test]
	fn hovered_nodes_glow_more_than_neighbours() {
		let (hovered, hovered_glow) = emphasis(true, false, 1.0);
		let (neighbour, neighbour_glow) = emphasis(false, true, 1.0);
		assert!(hovered > neighbour && hovered_glow > neighbour_glow);
		assert_eq!(emphasis(false, false, 1.0), (NODE_RADIUS, 0.0));
	}
}
