//! Pan and zoom shared by the canvas network and the SVG scene viewport.

use std::fmt::Write as _;
use std::ops::RangeInclusive;

use crate::layout::{Point, Rect, Size};

use super::scene::Scene;

/// Zoom factor applied per wheel notch or button press.
pub const ZOOM_STEP: f64 = 1.1;
/// Zoom range of the SVG scene viewport.
pub const SCENE_ZOOM: RangeInclusive<f64> = 0.2..=3.0;
/// Pointer travel (screen px) below which a press is still a click.
pub const PAN_SLOP: f64 = 4.0;
/// Grid spacing in world units.
const GRID_GAP: f64 = 20.0;

/// Screen = world * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Largest zoom (capped at 1) showing all of `content` inside `frame`, centred.
	pub fn fit(content: Size, frame: Size, padding: f64) -> Self {
		let room = Size::new(
			(frame.width - 2.0 * padding).max(1.0),
			(frame.height - 2.0 * padding).max(1.0),
		);
		let k = if content.width <= 0.0 || content.height <= 0.0 {
			1.0
		} else {
			(room.width / content.width)
				.min(room.height / content.height)
				.min(1.0)
		};
		Self {
			x: (frame.width - content.width * k) / 2.0,
			y: (frame.height - content.height * k) / 2.0,
			k,
		}
	}

	pub fn to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zoom one step around the screen point `(sx, sy)`, which stays put.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, zoom_in: bool, limits: RangeInclusive<f64>) {
		let factor = if zoom_in { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
		let k = (self.k * factor).clamp(*limits.start(), *limits.end());
		let ratio = k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = k;
	}

	/// World-space area shown by a `frame` sized screen.
	pub fn visible(&self, frame: Size) -> Rect {
		let (x, y) = self.to_world(0.0, 0.0);
		Rect::new(x, y, frame.width / self.k, frame.height / self.k)
	}

	pub fn css(&self) -> String {
		format!(
			"transform: translate({:.1}px, {:.1}px) scale({:.3}); transform-origin: 0 0;",
			self.x, self.y, self.k
		)
	}
}

/// Pan and zoom of a fixed-size frame showing a scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanZoom {
	pub transform: ViewTransform,
	pub frame: Size,
	/// Pointer and transform at the start of a pan.
	grab: Option<(Point, ViewTransform)>,
	/// Whether the last press travelled beyond [`PAN_SLOP`].
	dragged: bool,
}

impl PanZoom {
	pub fn new(frame: Size) -> Self {
		Self {
			frame,
			..Self::default()
		}
	}

	/// Show all of `content`.
	pub fn fit(&mut self, content: Size) {
		self.transform = ViewTransform::fit(content, self.frame, 24.0);
	}

	pub fn press(&mut self, x: f64, y: f64) {
		self.grab = Some((Point::new(x, y), self.transform));
		self.dragged = false;
	}

	pub fn is_panning(&self) -> bool {
		self.grab.is_some()
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		let Some((start, origin)) = self.grab else {
			return;
		};
		let (dx, dy) = (x - start.x, y - start.y);
		if (dx * dx + dy * dy).sqrt() > PAN_SLOP {
			self.dragged = true;
		}
		if self.dragged {
			self.transform.x = origin.x + dx;
			self.transform.y = origin.y + dy;
		}
	}

	pub fn release(&mut self) {
		self.grab = None;
	}

	/// A click that ends a drag is not a node click.
	pub fn swallows_click(&self) -> bool {
		self.dragged
	}

	pub fn wheel(&mut self, x: f64, y: f64, zoom_in: bool) {
		self.transform.zoom_at(x, y, zoom_in, SCENE_ZOOM);
	}

	/// Zoom around the middle of the frame, for the zoom buttons.
	pub fn step(&mut self, zoom_in: bool) {
		let (cx, cy) = (self.frame.width / 2.0, self.frame.height / 2.0);
		self.transform.zoom_at(cx, cy, zoom_in, SCENE_ZOOM);
	}

	/// Dotted grid that follows the pan and zoom.
	pub fn grid_style(&self) -> String {
		let t = &self.transform;
		format!(
			"background-image: radial-gradient(#E2E8F0 1px, transparent 1px); background-size: {gap:.1}px {gap:.1}px; background-position: {:.1}px {:.1}px;",
			t.x,
			t.y,
			gap = GRID_GAP * t.k
		)
	}
}

/// Overview of `scene` scaled into `mini`, with the visible area outlined.
pub fn minimap_markup(scene: &Scene, view: &PanZoom, mini: Size) -> String {
	let world = scene.size;
	let s = if world.width > 0.0 && world.height > 0.0 {
		(mini.width / world.width).min(mini.height / world.height)
	} else {
		1.0
	};
	let mut out = format!(
		r##"<svg width="{:.0}" height="{:.0}" xmlns="http://www.w3.org/2000/svg"><rect width="100%" height="100%" fill="#FFFFFF"/>"##,
		mini.width, mini.height
	);
	for card in &scene.cards {
		let r = &card.rect;
		let _ = write!(
			out,
			r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="2" fill="{}"/>"#,
			r.origin.x * s,
			r.origin.y * s,
			r.size.width * s,
			r.size.height * s,
			card.style.accent
		);
	}
	let v = view.transform.visible(view.frame);
	let _ = write!(
		out,
		r##"<rect class="minimap-view" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="rgba(0,0,0,0.08)" stroke="#94A3B8"/></svg>"##,
		v.origin.x * s,
		v.origin.y * s,
		v.size.width * s,
		v.size.height * s
	);
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::scene::{CardShape, NodeCard};
	use crate::model::StyledChain;

	#[test]
	fn fit_never_enlarges_and_centres() {
		let t = ViewTransform::fit(Size::new(200.0, 100.0), Size::new(800.0, 600.0), 24.0);
		assert_eq!(t.k, 1.0);
		assert_eq!((t.x, t.y), (300.0, 250.0));

		let t = ViewTransform::fit(Size::new(1504.0, 552.0), Size::new(800.0, 600.0), 24.0);
		assert!((t.k - 0.5).abs() < 1e-9);
		assert!((t.x - 24.0).abs() < 1e-9);
	}

	#[test]
	fn zoom_keeps_the_pointer_on_the_same_world_point() {
		let mut t = ViewTransform {
			x: 40.0,
			y: -10.0,
			k: 0.8,
		};
		let before = t.to_world(300.0, 200.0);
		t.zoom_at(300.0, 200.0, true, SCENE_ZOOM);
		let after = t.to_world(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
		assert!((t.k - 0.88).abs() < 1e-9);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut t = ViewTransform::default();
		for _ in 0..50 {
			t.zoom_at(0.0, 0.0, true, SCENE_ZOOM);
		}
		assert_eq!(t.k, 3.0);
	}

	#[test]
	fn small_moves_are_clicks_and_large_ones_pan() {
		let mut view = PanZoom::new(Size::new(800.0, 600.0));
		view.press(100.0, 100.0);
		view.pointer_move(102.0, 101.0);
		view.release();
		assert!(!view.swallows_click());
		assert_eq!(view.transform, ViewTransform::default());

		view.press(100.0, 100.0);
		view.pointer_move(160.0, 130.0);
		assert!(view.is_panning());
		view.release();
		assert!(view.swallows_click());
		assert_eq!((view.transform.x, view.transform.y), (60.0, 30.0));

		// moving without a press does nothing
		view.pointer_move(0.0, 0.0);
		assert_eq!((view.transform.x, view.transform.y), (60.0, 30.0));
	}

	#[test]
	fn grid_follows_the_zoom() {
		let mut view = PanZoom::new(Size::new(800.0, 600.0));
		view.transform.k = 0.5;
		assert!(view.grid_style().contains("background-size: 10.0px 10.0px"));
	}

	#[test]
	fn minimap_draws_every_card_and_the_visible_area() {
		let chain = StyledChain::reference().unwrap();
		let cards: Vec<NodeCard> = chain
			.entries()
			.map(|e| {
				let rect = Rect::new(0.0, e.index as f64 * 100.0, 200.0, 80.0);
				NodeCard::from_entry(&e, rect, CardShape::Card, None, None)
			})
			.collect();
		let scene = Scene {
			size: Size::new(200.0, 600.0),
			cards,
			..Scene::default()
		};
		let mut view = PanZoom::new(Size::new(400.0, 300.0));
		view.transform.k = 2.0;
		let svg = minimap_markup(&scene, &view, Size::new(100.0, 300.0));
		assert_eq!(svg.matches("rx=\"2\"").count(), 6);
		// a 400x300 frame at zoom 2 shows 200x150 world units, half scale on the map
		assert!(svg.contains(
			r#"class="minimap-view" x="0.0" y="0.0" width="100.0" height="75.0""#
		));
	}
}
