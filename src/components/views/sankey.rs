use std::sync::Arc;

use leptos::prelude::*;

use crate::components::scene::{CardShape, Connector, ConnectorPath, NodeCard, Scene};
use crate::components::scene_view::scene_view;
use crate::components::strategy::{LayoutStrategy, StrategyContext};
use crate::layout::{Point, Rect};
use crate::model::{NodeId, StyledChain};

/// Columns never get thinner than this, even without any flow.
const MIN_COLUMN: f64 = 8.0;

/// Flow diagram: one column per node, bands whose thickness shrinks along the chain.
#[derive(Clone, Debug)]
pub struct SankeyStrategy {
	/// Column thickness.
	pub column: f64,
	/// Horizontal distance between columns.
	pub step: f64,
	/// Height available to the tallest column.
	pub height: f64,
	/// Flow leaving the first node.
	pub flow_start: f64,
	/// Flow lost at each level.
	pub flow_step: f64,
	pub min_flow: f64,
	/// Room kept right of the last column for its outside label.
	pub label_room: f64,
}

impl Default for SankeyStrategy {
	fn default() -> Self {
		Self {
			column: 20.0,
			step: 190.0,
			height: 420.0,
			flow_start: 100.0,
			flow_step: 15.0,
			min_flow: 10.0,
			label_room: 170.0,
		}
	}
}

impl SankeyStrategy {
	/// Flow carried by a link leaving the node at `source`.
	pub fn flow(&self, source: usize) -> f64 {
		(self.flow_start - self.flow_step * source as f64).max(self.min_flow)
	}
}

impl LayoutStrategy for SankeyStrategy {
	fn arrange(&self, chain: &StyledChain, active: Option<&NodeId>) -> Scene {
		let links: Vec<(usize, usize, f64)> = chain
			.link_indices()
			.map(|(s, t)| (s, t, self.flow(s)))
			.collect();

		let mut inflow = vec![0.0; chain.len()];
		let mut outflow = vec![0.0; chain.len()];
		for &(s, t, value) in &links {
			outflow[s] += value;
			inflow[t] += value;
		}
		let through: Vec<f64> = inflow
			.iter()
			.zip(&outflow)
			.map(|(i, o)| f64::max(*i, *o))
			.collect();
		let peak = through.iter().copied().fold(0.0, f64::max);
		let scale = if peak > 0.0 { self.height / peak } else { 0.0 };

		let cards: Vec<NodeCard> = chain
			.entries()
			.map(|entry| {
				let h = (through[entry.index] * scale).max(MIN_COLUMN);
				let rect = Rect::new(
					entry.index as f64 * self.step,
					(self.height - h) / 2.0,
					self.column,
					h,
				);
				NodeCard::from_entry(&entry, rect, CardShape::Column, active, None)
			})
			.collect();

		// Bands leave from the middle of the source column and enter the middle of the target.
		let connectors = links
			.iter()
			.map(|&(s, t, value)| {
				let (from, to) = (&cards[s], &cards[t]);
				let (a, b) = (from.rect.right_mid(), to.rect.left_mid());
				let mid = (a.x + b.x) / 2.0;
				Connector::new(
					from.id.clone(),
					to.id.clone(),
					ConnectorPath::Cubic {
						from: a,
						c1: Point::new(mid, a.y),
						c2: Point::new(mid, b.y),
						to: b,
					},
					to.style.accent.clone(),
				)
				.gradient_from(from.style.accent.clone())
				.width(value * scale)
				.opacity(0.25)
				.without_arrow()
			})
			.collect();

		let mut scene = Scene {
			cards,
			connectors,
			..Scene::default()
		}
		.fit(24.0);
		scene.size.width += self.label_room;
		scene
	}

	fn render(self: Arc<Self>, ctx: StrategyContext) -> AnyView {
		scene_view(self, ctx, "sankey")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flow_attenuates_along_the_chain() {
		let strategy = SankeyStrategy::default();
		assert_eq!(strategy.flow(0), 100.0);
		assert_eq!(strategy.flow(4), 40.0);
		assert_eq!(strategy.flow(9), 10.0);
	}

	#[test]
	fn columns_shrink_with_their_flow() {
		let chain = StyledChain::reference().unwrap();
		let scene = SankeyStrategy::default().arrange(&chain, None);
		assert_eq!(scene.cards[0].rect.size.height, 420.0);
		assert!(scene.cards[5].rect.size.height < scene.cards[1].rect.size.height);
		// every column shares the same centre line
		let centre = scene.cards[0].rect.center().y;
		assert!(scene.cards.iter().all(|c| (c.rect.center().y - centre).abs() < 1e-9));
	}

	#[test]
	fn bands_are_translucent_gradients() {
		let chain = StyledChain::reference().unwrap();
		let scene = SankeyStrategy::default().arrange(&chain, None);
		let first = &scene.connectors[0];
		assert_eq!(first.opacity, 0.25);
		assert!(!first.arrow);
		assert_eq!(first.gradient_from.as_deref(), Some("#EF4444"));
		assert!(scene.connectors[4].width < first.width);
	}

	#[test]
	fn detail_goes_to_the_floating_panel() {
		let chain = StyledChain::reference().unwrap();
		let scene = SankeyStrategy::default().arrange(&chain, Some(&"3".into()));
		let card = scene.active().unwrap();
		assert!(!card.shape.inline_detail());
		assert_eq!(scene.visible_details().len(), 1);
	}
}
