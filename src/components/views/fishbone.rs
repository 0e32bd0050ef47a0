use std::sync::Arc;

use leptos::prelude::*;

use crate::components::scene::{CardShape, Connector, ConnectorPath, NodeCard, Scene};
use crate::components::scene_view::scene_view;
use crate::components::strategy::{LayoutStrategy, StrategyContext};
use crate::layout::{Placement, Point, Rect, Size};
use crate::model::{NodeId, StyledChain};

/// Ishikawa diagram: the observed effect is the head, causes hang off the spine
/// alternately above and below it, the first cause nearest the head.
#[derive(Clone, Debug)]
pub struct FishboneStrategy {
	pub card: Size,
	pub head: Size,
	pub spacing: f64,
	/// Distance between the spine and the nearest card edge.
	pub offset: f64,
	/// How far along the spine a rib lands from its card.
	pub slant: f64,
}

impl Default for FishboneStrategy {
	fn default() -> Self {
		Self {
			card: Size::new(170.0, 96.0),
			head: Size::new(200.0, 110.0),
			spacing: 190.0,
			offset: 48.0,
			slant: 36.0,
		}
	}
}

impl FishboneStrategy {
	fn placement(&self) -> Placement {
		Placement::Alternating {
			spacing: self.spacing,
			offset: self.offset,
		}
	}
}

impl LayoutStrategy for FishboneStrategy {
	fn arrange(&self, chain: &StyledChain, active: Option<&NodeId>) -> Scene {
		let placement = self.placement();
		let spine = placement.spine_y(self.card).unwrap_or_default();
		let causes = chain.len().saturating_sub(1);

		let cards: Vec<NodeCard> = chain
			.entries()
			.map(|entry| {
				if entry.index == 0 {
					let origin = Point::new(
						causes as f64 * self.spacing + self.slant,
						spine - self.head.height / 2.0,
					);
					let rect = Rect::at(origin, self.head);
					return NodeCard::from_entry(&entry, rect, CardShape::Card, active, None);
				}
				// parity follows the cause, the column is mirrored towards the head
				let slot = entry.index - 1;
				let mut rect = placement.rect(slot, self.card);
				rect.origin.x = (causes - 1 - slot) as f64 * self.spacing;
				NodeCard::from_entry(&entry, rect, CardShape::Card, active, None)
			})
			.collect();

		let connectors = chain
			.link_indices()
			.filter(|&(_, t)| t > 0)
			.map(|(s, t)| {
				let cause = &cards[t];
				let above = cause.rect.origin.y < spine;
				let start = if above {
					cause.rect.bottom_mid()
				} else {
					cause.rect.top_mid()
				};
				let end = Point::new(start.x + self.slant, spine);
				Connector::new(
					cards[s].id.clone(),
					cause.id.clone(),
					ConnectorPath::Straight(start, end),
					cause.style.accent.clone(),
				)
			})
			.collect();

		let guides = cards
			.first()
			.map(|head| {
				let tail = cards.last().unwrap_or(head);
				let start = Point::new(tail.rect.origin.x.min(head.rect.origin.x - 60.0), spine);
				Connector::new(
					tail.id.clone(),
					head.id.clone(),
					ConnectorPath::Straight(start, head.rect.left_mid()),
					head.style.accent.clone(),
				)
				.width(3.0)
			})
			.into_iter()
			.collect();

		Scene {
			cards,
			connectors,
			guides,
			..Scene::default()
		}
		.fit(32.0)
	}

	fn render(self: Arc<Self>, ctx: StrategyContext) -> AnyView {
		scene_view(self, ctx, "fishbone")
	}
}
