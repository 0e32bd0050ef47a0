//! Force-directed network of the causal chain, drawn on a canvas.

mod component;
mod render;
mod state;

use std::sync::Arc;

use leptos::prelude::*;

pub use component::NetworkCanvas;
pub use state::{NetworkState, SimulationConfig};

use super::scene::{CardShape, Connector, ConnectorPath, NodeCard, Scene};
use super::scene_view::DetailPanel;
use super::strategy::{LayoutStrategy, StrategyContext};
use crate::layout::{Point, Rect, Size};
use crate::model::{NodeId, StyledChain};

/// Force network: positions come from the simulation rather than from the chain order.
#[derive(Clone, Debug)]
pub struct NetworkStrategy {
	pub config: SimulationConfig,
	/// Size of a node disc in the static arrangement.
	pub dot: Size,
	pub canvas_height: f64,
}

impl Default for NetworkStrategy {
	fn default() -> Self {
		Self {
			config: SimulationConfig::default(),
			dot: Size::new(18.0, 18.0),
			canvas_height: 560.0,
		}
	}
}

impl LayoutStrategy for NetworkStrategy {
	/// Settled snapshot of the simulation, the same one the canvas converges to.
	fn arrange(&self, chain: &StyledChain, active: Option<&NodeId>) -> Scene {
		let mut state = NetworkState::new(chain, &self.config, 0.0, 0.0);
		state.settle();
		let positions = state.positions();

		let cards: Vec<NodeCard> = chain
			.entries()
			.map(|entry| {
				let centre = positions.get(&entry.node.id).copied().unwrap_or_default();
				let rect = Rect::at(
					centre.offset(-self.dot.width / 2.0, -self.dot.height / 2.0),
					self.dot,
				);
				NodeCard::from_entry(&entry, rect, CardShape::Dot, active, None)
			})
			.collect();

		let radius = self.dot.width / 2.0;
		let connectors = chain
			.link_indices()
			.filter_map(|(s, t)| {
				let (a, b) = (cards[s].rect.center(), cards[t].rect.center());
				let (dx, dy) = (b.x - a.x, b.y - a.y);
				let dist = (dx * dx + dy * dy).sqrt();
				if dist <= 2.0 * radius {
					return None;
				}
				let (ux, uy) = (dx / dist, dy / dist);
				let path = ConnectorPath::Straight(
					Point::new(a.x + ux * radius, a.y + uy * radius),
					Point::new(b.x - ux * radius, b.y - uy * radius),
				);
				Some(Connector::new(
					cards[s].id.clone(),
					cards[t].id.clone(),
					path,
					cards[t].style.accent.clone(),
				))
			})
			.collect();

		Scene {
			cards,
			connectors,
			..Scene::default()
		}
		.fit(60.0)
	}

	fn render(self: Arc<Self>, ctx: StrategyContext) -> AnyView {
		let StrategyContext {
			chain,
			active,
			on_node_click,
		} = ctx;
		let panel_chain = chain.clone();
		let panel = move || {
			active.with(|a| {
				let id = a.as_ref()?;
				let entry = panel_chain.resolve(id)?;
				let card =
					NodeCard::from_entry(&entry, Rect::default(), CardShape::Dot, Some(id), None);
				Some(view! { <DetailPanel card=card /> })
			})
		};

		view! {
			<div class="network-view">
				<NetworkCanvas
					chain=chain
					active=active
					on_node_click=on_node_click
					config=self.config.clone()
					height=Some(self.canvas_height)
				/>
				{panel}
			</div>
		}
		.into_any()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn snapshot_covers_the_whole_chain() {
		let chain = StyledChain::reference().unwrap();
		let scene = NetworkStrategy::default().arrange(&chain, None);
		assert_eq!(scene.cards.len(), 6);
		assert!(scene.cards.iter().all(|c| c.shape == CardShape::Dot));
		assert!(scene.cards.iter().all(|c| c.rect.origin.x >= 60.0 - 1e-9));
	}

	#[test]
	fn snapshot_is_deterministic() {
		let chain = StyledChain::reference().unwrap();
		let strategy = NetworkStrategy::default();
		assert_eq!(strategy.arrange(&chain, None), strategy.arrange(&chain, None));
	}

	#[test]
	fn arrows_stop_at_the_discs() {
		let chain = StyledChain::reference().unwrap();
		let scene = NetworkStrategy::default().arrange(&chain, Some(&"4".into()));
		for link in &scene.connectors {
			let target = scene.card(&link.to).unwrap().rect.center();
			let tip = link.path.end().0;
			let gap = ((tip.x - target.x).powi(2) + (tip.y - target.y).powi(2)).sqrt();
			assert!((gap - 9.0).abs() < 1e-6);
		}
		assert_eq!(scene.active().unwrap().id.as_str(), "4");
	}
}
