use super::{Point, Rect, Size};

/// Closed-form placement of an ordered sequence: rect *i* depends on *i* alone.
///
/// Every intrinsic-order view is a configuration of one of these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
	/// Left to right, each card `drop` lower than the previous one,
	/// `gap` apart horizontally.
	LinearCascade { gap: f64, drop: f64 },
	/// Top to bottom, each row shifted right by `indent`.
	Indented { indent: f64, gap: f64 },
	/// Left to right with even indices above a spine and odd ones below.
	/// The spine runs at `y = card.height + offset`.
	Alternating { spacing: f64, offset: f64 },
	/// First card centred on the origin, the rest on an outward spiral:
	/// angle `angle_step * i`, radius `base + radius_step * i`.
	RadialBranch {
		angle_step: f64,
		radius_step: f64,
		base: f64,
	},
	/// Stacked bars whose width shrinks by `attenuation` of `max_width` per row.
	ProportionalBar {
		max_width: f64,
		attenuation: f64,
		gap: f64,
	},
}

/// Bars never shrink below this share of the full width.
const MIN_BAR_SHARE: f64 = 0.1;

impl Placement {
	/// Rects for `count` cards of size `card`, in input order.
	pub fn place(&self, count: usize, card: Size) -> Vec<Rect> {
		(0..count).map(|i| self.rect(i, card)).collect()
	}

	/// Rect of the card at `index`.
	pub fn rect(&self, index: usize, card: Size) -> Rect {
		let i = index as f64;
		match *self {
			Placement::LinearCascade { gap, drop } => {
				Rect::at(Point::new(i * (card.width + gap), i * drop), card)
			}
			Placement::Indented { indent, gap } => {
				Rect::at(Point::new(i * indent, i * (card.height + gap)), card)
			}
			Placement::Alternating { spacing, offset } => {
				let y = if index % 2 == 0 {
					0.0
				} else {
					card.height + 2.0 * offset
				};
				Rect::at(Point::new(i * spacing, y), card)
			}
			Placement::RadialBranch {
				angle_step,
				radius_step,
				base,
			} => {
				let center = if index == 0 {
					Point::default()
				} else {
					let (theta, r) = (angle_step * i, base + radius_step * i);
					Point::new(theta.cos() * r, theta.sin() * r)
				};
				Rect::at(
					center.offset(-card.width / 2.0, -card.height / 2.0),
					card,
				)
			}
			Placement::ProportionalBar {
				max_width,
				attenuation,
				gap,
			} => {
				let share = (1.0 - attenuation * i).max(MIN_BAR_SHARE);
				Rect::new(
					0.0,
					i * (card.height + gap),
					max_width * share,
					card.height,
				)
			}
		}
	}

	/// Vertical position of the fishbone spine, if this placement has one.
	pub fn spine_y(&self, card: Size) -> Option<f64> {
		match *self {
			Placement::Alternating { offset, .. } => Some(card.height + offset),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const CARD: Size = Size::new(180.0, 100.0);

	#[test]
	fn cascade_drops_by_a_constant_per_level() {
		let rects = Placement::LinearCascade {
			gap: 56.0,
			drop: 28.0,
		}
		.place(6, CARD);
		for (i, r) in rects.iter().enumerate() {
			assert_eq!(r.origin.y, 28.0 * i as f64);
			assert_eq!(r.origin.x, 236.0 * i as f64);
		}
	}

	#[test]
	fn indentation_grows_with_depth() {
		let rects = Placement::Indented {
			indent: 20.0,
			gap: 32.0,
		}
		.place(3, CARD);
		assert_eq!(rects[2].origin, Point::new(40.0, 264.0));
	}

	#[test]
	fn alternating_follows_parity() {
		let placement = Placement::Alternating {
			spacing: 150.0,
			offset: 40.0,
		};
		let spine = placement.spine_y(CARD).unwrap();
		for (i, r) in placement.place(5, CARD).iter().enumerate() {
			if i % 2 == 0 {
				assert!(r.bottom() < spine);
			} else {
				assert!(r.origin.y > spine);
			}
		}
	}

	#[test]
	fn radial_root_is_centred() {
		let placement = Placement::RadialBranch {
			angle_step: 1.1,
			radius_step: 40.0,
			base: 160.0,
		};
		let rects = placement.place(4, CARD);
		assert_eq!(rects[0].center(), Point::default());
		let r1 = rects[1].center();
		let dist = (r1.x * r1.x + r1.y * r1.y).sqrt();
		assert!((dist - 200.0).abs() < 1e-9);
	}

	#[test]
	fn bars_attenuate_but_never_vanish() {
		let rects = Placement::ProportionalBar {
			max_width: 500.0,
			attenuation: 0.3,
			gap: 8.0,
		}
		.place(6, CARD);
		assert_eq!(rects[0].size.width, 500.0);
		assert!(rects[1].size.width < rects[0].size.width);
		assert_eq!(rects[5].size.width, 50.0);
	}

	#[test]
	fn placement_is_reproducible() {
		let placement = Placement::RadialBranch {
			angle_step: 0.9,
			radius_step: 30.0,
			base: 100.0,
		};
		assert_eq!(placement.place(6, CARD), placement.place(6, CARD));
	}
}
