use std::sync::Arc;

use leptos::prelude::*;

use crate::components::scene::{CardShape, Connector, ConnectorPath, NodeCard, Scene};
use crate::components::scene_view::scene_view;
use crate::components::strategy::{LayoutStrategy, StrategyContext};
use crate::layout::{Placement, Point, Size};
use crate::model::{NodeId, StyledChain};

/// Stacked bars whose width fades with causal distance from the observed effect.
#[derive(Clone, Debug)]
pub struct IntensityStrategy {
	pub max_width: f64,
	/// Share of `max_width` lost per level.
	pub attenuation: f64,
	pub bar_height: f64,
	pub gap: f64,
	pub detail_room: f64,
	/// Distance left of the bars per level a gutter arrow spans.
	pub gutter: f64,
}

impl Default for IntensityStrategy {
	fn default() -> Self {
		Self {
			max_width: 560.0,
			attenuation: 0.15,
			bar_height: 52.0,
			gap: 18.0,
			detail_room: 40.0,
			gutter: 16.0,
		}
	}
}

impl LayoutStrategy for IntensityStrategy {
	fn arrange(&self, chain: &StyledChain, active: Option<&NodeId>) -> Scene {
		let placement = Placement::ProportionalBar {
			max_width: self.max_width,
			attenuation: self.attenuation,
			gap: self.gap,
		};
		let bar = Size::new(self.max_width, self.bar_height);
		let mut shift = 0.0;
		let cards: Vec<NodeCard> = chain
			.entries()
			.map(|entry| {
				let mut rect = placement.rect(entry.index, bar);
				rect.origin.y += shift;
				let card = NodeCard::from_entry(&entry, rect, CardShape::Bar, active, None);
				if card.active {
					shift += self.detail_room;
				}
				card
			})
			.collect();

		// Gutter arrows left of the bars, further out the more bars they skip.
		let connectors = chain
			.link_indices()
			.map(|(s, t)| {
				let (from, to) = (&cards[s], &cards[t]);
				let x = -self.gutter * s.abs_diff(t) as f64;
				let below = if from.active { self.detail_room } else { 0.0 };
				let (start, end) = if t > s {
					(from.rect.bottom() + below + 2.0, to.rect.origin.y - 2.0)
				} else {
					(from.rect.origin.y - 2.0, to.rect.bottom() + 2.0)
				};
				Connector::new(
					from.id.clone(),
					to.id.clone(),
					ConnectorPath::Straight(Point::new(x, start), Point::new(x, end)),
					to.style.accent.clone(),
				)
				.width(1.5)
				.dashed()
			})
			.collect();

		Scene {
			cards,
			connectors,
			..Scene::default()
		}
		.fit(28.0)
	}

	fn render(self: Arc<Self>, ctx: StrategyContext) -> AnyView {
		scene_view(self, ctx, "intensity")
	}
}
