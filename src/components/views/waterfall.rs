use std::sync::Arc;

use leptos::prelude::*;

use crate::components::scene::{CardShape, Connector, ConnectorPath, NodeCard, Scene};
use crate::components::scene_view::scene_view;
use crate::components::strategy::{LayoutStrategy, StrategyContext};
use crate::layout::{Placement, Point, Size};
use crate::model::{NodeId, StyledChain};

/// Cascade of cards stepping down and to the right, one level per node.
#[derive(Clone, Debug)]
pub struct WaterfallStrategy {
	pub card: Size,
	pub gap: f64,
	pub drop: f64,
	/// Vertical spacing of the detours taken by links between non-neighbours.
	pub lane: f64,
}

impl Default for WaterfallStrategy {
	fn default() -> Self {
		Self {
			card: Size::new(180.0, 130.0),
			gap: 56.0,
			drop: 28.0,
			lane: 18.0,
		}
	}
}

impl LayoutStrategy for WaterfallStrategy {
	fn arrange(&self, chain: &StyledChain, active: Option<&NodeId>) -> Scene {
		let placement = Placement::LinearCascade {
			gap: self.gap,
			drop: self.drop,
		};
		let cards: Vec<NodeCard> = chain
			.entries()
			.map(|entry| {
				let rect = placement.rect(entry.index, self.card);
				NodeCard::from_entry(&entry, rect, CardShape::Card, active, None)
			})
			.collect();

		let floor = cards.iter().map(|c| c.rect.bottom()).fold(0.0, f64::max) + self.lane;
		let mut lanes = 0.0;
		let connectors = chain
			.link_indices()
			.map(|(s, t)| {
				let (from, to) = (&cards[s], &cards[t]);
				let (path, label_at) = if t == s + 1 {
					// Neighbours: the arrow sits in the gap, level with the upper card's title.
					let y = from.rect.origin.y + 26.0;
					let start = Point::new(from.rect.right() + 4.0, y);
					let end = Point::new(to.rect.origin.x - 4.0, y);
					let label_at = start.lerp(end, 0.5).offset(0.0, 18.0);
					(ConnectorPath::Straight(start, end), label_at)
				} else {
					// Any other link runs under the cascade, one lane per link.
					let y = floor + lanes;
					lanes += self.lane;
					let (start, end) = (from.rect.bottom_mid(), to.rect.bottom_mid());
					let path = ConnectorPath::Polyline(vec![
						start,
						Point::new(start.x, y),
						Point::new(end.x, y),
						end,
					]);
					(path, Point::new((start.x + end.x) / 2.0, y - 6.0))
				};
				Connector::new(from.id.clone(), to.id.clone(), path, to.style.accent.clone())
					.width(2.5)
					.dashed()
					.gradient_from(from.style.accent.clone())
					.caption("CAUSE", label_at)
			})
			.collect();

		Scene {
			cards,
			connectors,
			..Scene::default()
		}
		.fit(32.0)
	}

	fn render(self: Arc<Self>, ctx: StrategyContext) -> AnyView {
		scene_view(self, ctx, "waterfall")
	}
}
