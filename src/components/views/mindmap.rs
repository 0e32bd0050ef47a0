use std::sync::Arc;

use leptos::prelude::*;

use crate::components::scene::{CardShape, Connector, ConnectorPath, NodeCard, Scene};
use crate::components::scene_view::scene_view;
use crate::components::strategy::{LayoutStrategy, StrategyContext};
use crate::layout::{Placement, Point, Size};
use crate::model::{NodeId, StyledChain};

/// Effect in the centre, causes spiralling outwards on curved branches.
#[derive(Clone, Debug)]
pub struct MindMapStrategy {
	pub card: Size,
	/// Radians between consecutive branches.
	pub angle_step: f64,
	pub radius_step: f64,
	pub base: f64,
}

impl Default for MindMapStrategy {
	fn default() -> Self {
		Self {
			card: Size::new(170.0, 92.0),
			angle_step: 1.25,
			radius_step: 36.0,
			base: 170.0,
		}
	}
}

impl LayoutStrategy for MindMapStrategy {
	fn arrange(&self, chain: &StyledChain, active: Option<&NodeId>) -> Scene {
		let placement = Placement::RadialBranch {
			angle_step: self.angle_step,
			radius_step: self.radius_step,
			base: self.base,
		};
		let cards: Vec<NodeCard> = chain
			.entries()
			.map(|entry| {
				let rect = placement.rect(entry.index, self.card);
				NodeCard::from_entry(&entry, rect, CardShape::Card, active, None)
			})
			.collect();

		let connectors = chain
			.link_indices()
			.map(|(s, t)| {
				let (from, to) = (cards[s].rect.center(), cards[t].rect.center());
				let mid = from.lerp(to, 0.5);
				Connector::new(
					cards[s].id.clone(),
					cards[t].id.clone(),
					ConnectorPath::Cubic {
						from,
						c1: Point::new(mid.x, from.y),
						c2: Point::new(mid.x, to.y),
						to,
					},
					cards[t].style.accent.clone(),
				)
				.width(3.0)
				.opacity(0.8)
				.without_arrow()
			})
			.collect();

		Scene {
			cards,
			connectors,
			..Scene::default()
		}
		.fit(40.0)
	}

	fn render(self: Arc<Self>, ctx: StrategyContext) -> AnyView {
		scene_view(self, ctx, "mindmap")
	}
}
