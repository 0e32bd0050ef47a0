//! Positioning: plain geometry, closed-form placements and the layered solver.

mod intrinsic;
mod layered;

pub use intrinsic::Placement;
pub use layered::{
	Direction, GraphLayout, LayeredConfig, LayeredLayout, LayoutError, LayoutRequest, Spacing,
	fallback_positions, layout_or_fallback,
};

/// A point in scene space (y grows downwards).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Linear interpolation towards `other`.
	pub fn lerp(self, other: Point, t: f64) -> Point {
		Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
	}

	pub fn offset(self, dx: f64, dy: f64) -> Point {
		Point::new(self.x + dx, self.y + dy)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Size {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// Axis-aligned box, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub origin: Point,
	pub size: Size,
}

impl Rect {
	pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			origin: Point::new(x, y),
			size: Size::new(width, height),
		}
	}

	pub fn at(origin: Point, size: Size) -> Self {
		Self { origin, size }
	}

	pub fn center(&self) -> Point {
		self.origin
			.offset(self.size.width / 2.0, self.size.height / 2.0)
	}

	pub fn right(&self) -> f64 {
		self.origin.x + self.size.width
	}

	pub fn bottom(&self) -> f64 {
		self.origin.y + self.size.height
	}

	/// Midpoint of the top edge.
	pub fn top_mid(&self) -> Point {
		Point::new(self.center().x, self.origin.y)
	}

	/// Midpoint of the bottom edge.
	pub fn bottom_mid(&self) -> Point {
		Point::new(self.center().x, self.bottom())
	}

	/// Midpoint of the left edge.
	pub fn left_mid(&self) -> Point {
		Point::new(self.origin.x, self.center().y)
	}

	/// Midpoint of the right edge.
	pub fn right_mid(&self) -> Point {
		Point::new(self.right(), self.center().y)
	}

	/// Shrink by `by` on every side; never below zero size.
	pub fn inset(&self, by: f64) -> Rect {
		Rect::new(
			self.origin.x + by,
			self.origin.y + by,
			(self.size.width - 2.0 * by).max(0.0),
			(self.size.height - 2.0 * by).max(0.0),
		)
	}

	pub fn contains(&self, other: &Rect) -> bool {
		other.origin.x >= self.origin.x
			&& other.origin.y >= self.origin.y
			&& other.right() <= self.right()
			&& other.bottom() <= self.bottom()
	}
}

/// Smallest rect containing every input, padded by `margin`.
pub fn bounds(rects: impl IntoIterator<Item = Rect>, margin: f64) -> Rect {
	let mut iter = rects.into_iter();
	let Some(first) = iter.next() else {
		return Rect::new(0.0, 0.0, 2.0 * margin, 2.0 * margin);
	};
	let (mut x0, mut y0, mut x1, mut y1) =
		(first.origin.x, first.origin.y, first.right(), first.bottom());
	for r in iter {
		x0 = x0.min(r.origin.x);
		y0 = y0.min(r.origin.y);
		x1 = x1.max(r.right());
		y1 = y1.max(r.bottom());
	}
	Rect::new(
		x0 - margin,
		y0 - margin,
		x1 - x0 + 2.0 * margin,
		y1 - y0 + 2.0 * margin,
	)
}

/// Point on a cubic Bézier at `t`.
pub fn cubic_point(p0: Point, c1: Point, c2: Point, p3: Point, t: f64) -> Point {
	let u = 1.0 - t;
	let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
	Point::new(
		a * p0.x + b * c1.x + c * c2.x + d * p3.x,
		a * p0.y + b * c1.y + c * c2.y + d * p3.y,
	)
}
