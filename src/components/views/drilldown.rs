use std::sync::Arc;

use leptos::prelude::*;

use crate::components::scene::{CardShape, Connector, ConnectorPath, NodeCard, Scene};
use crate::components::scene_view::scene_view;
use crate::components::strategy::{LayoutStrategy, StrategyContext};
use crate::layout::{Placement, Point, Size};
use crate::model::{NodeId, StyledChain};

/// Stacked rows, each indented one step further towards the root cause.
#[derive(Clone, Debug)]
pub struct DrillDownStrategy {
	pub row: Size,
	pub indent: f64,
	pub gap: f64,
	/// Extra height reserved below the active row for its detail text.
	pub detail_room: f64,
	/// Gutter spacing of links that skip rows.
	pub lane: f64,
}

impl Default for DrillDownStrategy {
	fn default() -> Self {
		Self {
			row: Size::new(480.0, 84.0),
			indent: 20.0,
			gap: 32.0,
			detail_room: 44.0,
			lane: 14.0,
		}
	}
}

impl LayoutStrategy for DrillDownStrategy {
	fn arrange(&self, chain: &StyledChain, active: Option<&NodeId>) -> Scene {
		let placement = Placement::Indented {
			indent: self.indent,
			gap: self.gap,
		};
		let mut shift = 0.0;
		let cards: Vec<NodeCard> = chain
			.entries()
			.map(|entry| {
				let mut rect = placement.rect(entry.index, self.row);
				rect.origin.y += shift;
				let card = NodeCard::from_entry(&entry, rect, CardShape::Row, active, None);
				if card.active {
					shift += self.detail_room;
				}
				card
			})
			.collect();

		let mut lanes = 0.0;
		let connectors = chain
			.link_indices()
			.map(|(s, t)| {
				let (from, to) = (&cards[s], &cards[t]);
				if t == s + 1 {
					let x = from.rect.origin.x + 52.0;
					let top = if from.active {
						from.rect.bottom() + self.detail_room
					} else {
						from.rect.bottom()
					};
					let (start, end) = (Point::new(x, top), Point::new(x, to.rect.origin.y));
					return Connector::new(
						from.id.clone(),
						to.id.clone(),
						ConnectorPath::Straight(start, end),
						to.style.accent.clone(),
					)
					.dashed()
					.caption("causé par", start.lerp(end, 0.5).offset(44.0, 4.0));
				}
				// Links skipping rows run down the left gutter, one lane each.
				lanes += self.lane;
				let x = from.rect.origin.x.min(to.rect.origin.x) - lanes;
				let (start, end) = (from.rect.left_mid(), to.rect.left_mid());
				Connector::new(
					from.id.clone(),
					to.id.clone(),
					ConnectorPath::Polyline(vec![
						start,
						Point::new(x, start.y),
						Point::new(x, end.y),
						end,
					]),
					to.style.accent.clone(),
				)
				.dashed()
			})
			.collect();

		Scene {
			cards,
			connectors,
			..Scene::default()
		}
		.fit(24.0)
	}

	fn render(self: Arc<Self>, ctx: StrategyContext) -> AnyView {
		scene_view(self, ctx, "drilldown")
	}
}
