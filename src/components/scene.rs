//! Renderable arrangement produced by every layout strategy.
//!
//! A [`Scene`] is plain data: positioned node cards plus the connectors between
//! them. Views turn it into DOM; tests inspect it directly.

use std::fmt::Write as _;

use crate::layout::{Point, Rect, Size, bounds};
use crate::model::{CategoryStyle, ChainEntry, NodeId};

/// How a card is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardShape {
	/// Boxed card: category line, label, value, detail underneath.
	Card,
	/// Horizontal row with a numbered badge on the left and the value on the right.
	Row,
	/// Thin vertical flow node, label beside it, detail in a floating panel.
	Column,
	/// Horizontal bar whose width carries meaning; text inside.
	Bar,
	/// Nested treemap tile, detail in a floating panel.
	Tile,
	/// Small disc, detail in a floating panel.
	Dot,
}

impl CardShape {
	/// Whether the detail text is drawn inside the card or in a separate panel.
	pub fn inline_detail(self) -> bool {
		!matches!(self, CardShape::Column | CardShape::Tile | CardShape::Dot)
	}
}

/// One positioned node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeCard {
	pub id: NodeId,
	/// One-based depth in the chain.
	pub level: usize,
	pub rect: Rect,
	pub shape: CardShape,
	/// Possibly truncated label.
	pub label: String,
	/// Full label, for tooltips.
	pub title: String,
	/// Metric, verbatim.
	pub value: String,
	pub category_label: String,
	pub style: CategoryStyle,
	pub active: bool,
	/// Only ever `Some` for the active card.
	pub detail: Option<String>,
}

impl NodeCard {
	/// Card for `entry` at `rect`, its label cut to `max_label` characters.
	pub fn from_entry(
		entry: &ChainEntry<'_>,
		rect: Rect,
		shape: CardShape,
		active: Option<&NodeId>,
		max_label: Option<usize>,
	) -> Self {
		let is_active = active == Some(&entry.node.id);
		let label = match max_label {
			Some(n) => truncate(&entry.node.label, n),
			None => entry.node.label.clone(),
		};
		Self {
			id: entry.node.id.clone(),
			level: entry.level(),
			rect,
			shape,
			label,
			title: entry.node.label.clone(),
			value: entry.node.value.clone(),
			category_label: entry.style.label.clone(),
			style: entry.style.clone(),
			active: is_active,
			detail: is_active.then(|| entry.node.detail.clone()),
		}
	}
}

/// Geometry of a connector.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectorPath {
	Straight(Point, Point),
	Polyline(Vec<Point>),
	Cubic {
		from: Point,
		c1: Point,
		c2: Point,
		to: Point,
	},
}

impl ConnectorPath {
	/// SVG path data.
	pub fn to_svg(&self) -> String {
		match self {
			ConnectorPath::Straight(a, b) => {
				format!("M{:.1},{:.1} L{:.1},{:.1}", a.x, a.y, b.x, b.y)
			}
			ConnectorPath::Polyline(points) => {
				let mut d = String::new();
				for (i, p) in points.iter().enumerate() {
					let cmd = if i == 0 { 'M' } else { 'L' };
					let _ = write!(d, "{}{:.1},{:.1} ", cmd, p.x, p.y);
				}
				d.trim_end().to_string()
			}
			ConnectorPath::Cubic { from, c1, c2, to } => format!(
				"M{:.1},{:.1} C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
				from.x, from.y, c1.x, c1.y, c2.x, c2.y, to.x, to.y
			),
		}
	}

	/// First point of the path.
	pub fn start(&self) -> Point {
		match self {
			ConnectorPath::Straight(a, _) => *a,
			ConnectorPath::Polyline(points) => points.first().copied().unwrap_or_default(),
			ConnectorPath::Cubic { from, .. } => *from,
		}
	}

	/// Points the path passes through; curve control points are left out.
	pub fn anchors(&self) -> Vec<Point> {
		match self {
			ConnectorPath::Straight(a, b) => vec![*a, *b],
			ConnectorPath::Polyline(points) => points.clone(),
			ConnectorPath::Cubic { from, to, .. } => vec![*from, *to],
		}
	}

	/// Last point and the direction it is reached from, for arrow heads.
	pub fn end(&self) -> (Point, Point) {
		match self {
			ConnectorPath::Straight(a, b) => (*b, *a),
			ConnectorPath::Polyline(points) => match points.as_slice() {
				[.., prev, last] => (*last, *prev),
				[only] => (*only, *only),
				[] => (Point::default(), Point::default()),
			},
			ConnectorPath::Cubic { c2, to, .. } => (*to, *c2),
		}
	}
}

/// Text placed along a connector.
#[derive(Clone, Debug, PartialEq)]
pub struct Caption {
	pub text: String,
	pub at: Point,
}

/// A directional link between two causally related cards.
#[derive(Clone, Debug, PartialEq)]
pub struct Connector {
	pub from: NodeId,
	pub to: NodeId,
	pub path: ConnectorPath,
	pub color: String,
	/// Start colour of a gradient stroke ending in `color`.
	pub gradient_from: Option<String>,
	pub width: f64,
	pub opacity: f64,
	pub dashed: bool,
	pub animated: bool,
	pub arrow: bool,
	pub caption: Option<Caption>,
}

impl Connector {
	/// Solid arrowed connector of width 2.
	pub fn new(from: NodeId, to: NodeId, path: ConnectorPath, color: impl Into<String>) -> Self {
		Self {
			from,
			to,
			path,
			color: color.into(),
			gradient_from: None,
			width: 2.0,
			opacity: 1.0,
			dashed: false,
			animated: false,
			arrow: true,
			caption: None,
		}
	}

	pub fn width(mut self, width: f64) -> Self {
		self.width = width;
		self
	}

	pub fn dashed(mut self) -> Self {
		self.dashed = true;
		self
	}

	pub fn animated(mut self) -> Self {
		self.dashed = true;
		self.animated = true;
		self
	}

	pub fn opacity(mut self, opacity: f64) -> Self {
		self.opacity = opacity;
		self
	}

	pub fn without_arrow(mut self) -> Self {
		self.arrow = false;
		self
	}

	pub fn gradient_from(mut self, color: impl Into<String>) -> Self {
		self.gradient_from = Some(color.into());
		self
	}

	pub fn caption(mut self, text: &str, at: Point) -> Self {
		self.caption = Some(Caption {
			text: text.into(),
			at,
		});
		self
	}
}

/// Everything a strategy draws for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub size: Size,
	pub cards: Vec<NodeCard>,
	/// One per causal link, `from` being the effect.
	pub connectors: Vec<Connector>,
	/// Strokes that stand for no link, such as a fishbone spine.
	pub guides: Vec<Connector>,
}

impl Scene {
	/// Shift everything so the content starts at `margin` and size the scene to fit.
	pub fn fit(mut self, margin: f64) -> Self {
		let strokes = self.connectors.iter().chain(&self.guides);
		let anchors = strokes
			.flat_map(|c| c.path.anchors())
			.map(|p| Rect::at(p, Size::default()));
		let b = bounds(self.cards.iter().map(|c| c.rect).chain(anchors), margin);
		let (dx, dy) = (-b.origin.x, -b.origin.y);
		for card in &mut self.cards {
			card.rect.origin = card.rect.origin.offset(dx, dy);
		}
		for conn in self.connectors.iter_mut().chain(&mut self.guides) {
			conn.translate(dx, dy);
		}
		self.size = b.size;
		self
	}

	/// The active card, if any.
	pub fn active(&self) -> Option<&NodeCard> {
		self.cards.iter().find(|c| c.active)
	}

	pub fn card(&self, id: &NodeId) -> Option<&NodeCard> {
		self.cards.iter().find(|c| &c.id == id)
	}

	/// Every detail text currently exposed.
	pub fn visible_details(&self) -> Vec<&str> {
		self.cards.iter().filter_map(|c| c.detail.as_deref()).collect()
	}

	/// Whether some connector runs from `from` to `to`.
	pub fn links(&self, from: &NodeId, to: &NodeId) -> bool {
		self.connectors.iter().any(|c| &c.from == from && &c.to == to)
	}

	/// The connector layer as SVG markup (without the outer `<svg>`).
	pub fn connectors_svg(&self, scope: &str) -> String {
		let mut out = String::new();
		for (i, c) in self.guides.iter().chain(&self.connectors).enumerate() {
			let stroke = match &c.gradient_from {
				Some(start) => {
					let id = format!("{scope}-grad-{i}");
					// user space: a zero-height bounding box would hide straight strokes
					let (a, b) = (c.path.start(), c.path.end().0);
					let _ = write!(
						out,
						r#"<defs><linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}"><stop offset="0%" stop-color="{}"/><stop offset="100%" stop-color="{}"/></linearGradient></defs>"#,
						a.x,
						a.y,
						b.x,
						b.y,
						escape(start),
						escape(&c.color)
					);
					format!("url(#{id})")
				}
				None => escape(&c.color),
			};
			let dash = if c.dashed { r#" stroke-dasharray="6 4""# } else { "" };
			let class = if c.animated { r#" class="flow""# } else { "" };
			let _ = write!(
				out,
				r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.1}" stroke-opacity="{:.2}"{}{}/>"#,
				c.path.to_svg(),
				stroke,
				c.width,
				c.opacity,
				dash,
				class
			);
			if c.arrow {
				let _ = write!(
					out,
					r#"<polygon points="{}" fill="{}"/>"#,
					arrow_head(&c.path),
					escape(&c.color)
				);
			}
			if let Some(caption) = &c.caption {
				let _ = write!(
					out,
					r#"<text x="{:.1}" y="{:.1}" class="caption" text-anchor="middle">{}</text>"#,
					caption.at.x,
					caption.at.y,
					escape(&caption.text)
				);
			}
		}
		out
	}
}

impl Connector {
	fn translate(&mut self, dx: f64, dy: f64) {
		let shift = |p: &mut Point| *p = p.offset(dx, dy);
		match &mut self.path {
			ConnectorPath::Straight(a, b) => {
				shift(a);
				shift(b);
			}
			ConnectorPath::Polyline(points) => points.iter_mut().for_each(shift),
			ConnectorPath::Cubic { from, c1, c2, to } => {
				shift(from);
				shift(c1);
				shift(c2);
				shift(to);
			}
		}
		if let Some(caption) = &mut self.caption {
			shift(&mut caption.at);
		}
	}
}

const ARROW_SIZE: f64 = 9.0;

fn arrow_head(path: &ConnectorPath) -> String {
	let (tip, from) = path.end();
	let (dx, dy) = (tip.x - from.x, tip.y - from.y);
	let dist = (dx * dx + dy * dy).sqrt();
	let (ux, uy) = if dist < 0.001 { (0.0, 1.0) } else { (dx / dist, dy / dist) };
	let back = tip.offset(-ux * ARROW_SIZE, -uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	format!(
		"{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
		tip.x,
		tip.y,
		back.x + px,
		back.y + py,
		back.x - px,
		back.y - py
	)
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
	if text.chars().count() <= max {
		return text.to_string();
	}
	let mut out: String = text.chars().take(max).collect();
	out.push('…');
	out
}

fn escape(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn truncate_counts_characters_not_bytes() {
		assert_eq!(truncate("Pénurie logistique", 7), "Pénurie…");
		assert_eq!(truncate("Marge", 7), "Marge");
	}

	#[test]
	fn fit_keeps_connectors_in_frame() {
		let scene = Scene {
			connectors: vec![Connector::new(
				"a".into(),
				"b".into(),
				ConnectorPath::Straight(Point::new(-10.0, -10.0), Point::new(0.0, 0.0)),
				"#000",
			)],
			..Scene::default()
		};
		let fitted = scene.fit(5.0);
		assert_eq!(fitted.size, Size::new(20.0, 20.0));
		assert_eq!(fitted.connectors[0].path.start(), Point::new(5.0, 5.0));
	}

	#[test]
	fn guides_are_drawn_but_are_not_links() {
		let stroke = |from: &str, to: &str| {
			Connector::new(
				from.into(),
				to.into(),
				ConnectorPath::Straight(Point::new(0.0, 0.0), Point::new(40.0, 0.0)),
				"#EF4444",
			)
		};
		let scene = Scene {
			size: Size::new(100.0, 100.0),
			cards: vec![],
			connectors: vec![stroke("a", "b")],
			guides: vec![stroke("b", "a").without_arrow()],
		};
		assert!(scene.links(&"a".into(), &"b".into()));
		assert!(!scene.links(&"b".into(), &"a".into()));
		assert_eq!(scene.connectors_svg("g").matches("<path").count(), 2);
	}

	#[test]
	fn svg_escapes_captions_and_draws_arrows() {
		let scene = Scene {
			size: Size::new(100.0, 100.0),
			guides: vec![],
			cards: vec![],
			connectors: vec![
				Connector::new(
					"a".into(),
					"b".into(),
					ConnectorPath::Straight(Point::new(0.0, 0.0), Point::new(0.0, 50.0)),
					"#EF4444",
				)
				.caption("a < b", Point::new(0.0, 25.0))
				.gradient_from("#3B82F6"),
			],
		};
		let svg = scene.connectors_svg("t");
		assert!(svg.contains("a &lt; b"));
		assert!(svg.contains("url(#t-grad-0)"));
		assert!(svg.contains("<polygon points=\"0.0,50.0"));
	}

	#[test]
	fn polyline_path_data() {
		let path = ConnectorPath::Polyline(vec![
			Point::new(0.0, 0.0),
			Point::new(0.0, 10.0),
			Point::new(5.0, 10.0),
		]);
		assert_eq!(path.to_svg(), "M0.0,0.0 L0.0,10.0 L5.0,10.0");
		assert_eq!(path.end(), (Point::new(5.0, 10.0), Point::new(0.0, 10.0)));
	}
}
