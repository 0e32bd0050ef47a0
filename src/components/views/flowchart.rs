use std::sync::Arc;

use leptos::prelude::*;

use crate::components::scene::{CardShape, Connector, ConnectorPath, NodeCard, Scene};
use crate::components::scene_view::{SceneOptions, scene_view_with};
use crate::components::strategy::{LayoutStrategy, StrategyContext};
use crate::layout::{
	Direction, GraphLayout, LayeredConfig, LayeredLayout, Point, Rect, Size, Spacing,
	layout_or_fallback,
};
use crate::model::{NodeId, StyledChain};

/// Auto-laid-out flowchart; node placement is delegated to a [`GraphLayout`].
#[derive(Clone, Debug)]
pub struct FlowchartStrategy<L = LayeredLayout> {
	pub solver: L,
	pub config: LayeredConfig,
	pub caption: &'static str,
	pub link_width: f64,
	/// Size of the pan and zoom frame the chart is shown in.
	pub viewport: Size,
}

impl FlowchartStrategy {
	/// Top-to-bottom, 240×120 nodes.
	pub fn vertical() -> Self {
		Self {
			solver: LayeredLayout,
			config: LayeredConfig::default(),
			caption: "causé par",
			link_width: 2.5,
			viewport: Size::new(960.0, 560.0),
		}
	}

	/// Left-to-right, 220×100 nodes.
	pub fn horizontal() -> Self {
		Self {
			solver: LayeredLayout,
			config: LayeredConfig {
				direction: Direction::LeftToRight,
				node_size: Size::new(220.0, 100.0),
				spacing: Spacing {
					node: 40.0,
					rank: 80.0,
				},
				margin: 30.0,
			},
			caption: "cause",
			link_width: 2.0,
			viewport: Size::new(960.0, 420.0),
		}
	}
}

impl<L: GraphLayout> FlowchartStrategy<L> {
	/// Smooth-step route between two boxes.
	fn route(&self, from: &Rect, to: &Rect) -> (ConnectorPath, Point) {
		match self.config.direction {
			Direction::TopToBottom => {
				let (a, b) = (from.bottom_mid(), to.top_mid());
				let mid = (a.y + b.y) / 2.0;
				let path = ConnectorPath::Polyline(vec![
					a,
					Point::new(a.x, mid),
					Point::new(b.x, mid),
					b,
				]);
				(path, Point::new((a.x + b.x) / 2.0, mid + 4.0))
			}
			Direction::LeftToRight => {
				let (a, b) = (from.right_mid(), to.left_mid());
				let mid = (a.x + b.x) / 2.0;
				let path = ConnectorPath::Polyline(vec![
					a,
					Point::new(mid, a.y),
					Point::new(mid, b.y),
					b,
				]);
				(path, Point::new(mid, (a.y + b.y) / 2.0 - 6.0))
			}
		}
	}
}

impl<L> LayoutStrategy for FlowchartStrategy<L>
where
	L: GraphLayout + Send + Sync + 'static,
{
	fn arrange(&self, chain: &StyledChain, active: Option<&NodeId>) -> Scene {
		let ids = chain.entries().map(|e| e.node.id.to_string()).collect();
		let edges = chain
			.model()
			.list_edges()
			.iter()
			.map(|l| (l.source.to_string(), l.target.to_string()))
			.collect();
		let request = self.config.request(ids, edges);
		let positions = layout_or_fallback(&self.solver, &request);

		let cards: Vec<NodeCard> = chain
			.entries()
			.map(|entry| {
				let origin = positions
					.get(entry.node.id.as_str())
					.copied()
					.unwrap_or_default();
				let rect = Rect::at(origin, self.config.node_size);
				NodeCard::from_entry(&entry, rect, CardShape::Card, active, None)
			})
			.collect();

		let connectors = chain
			.link_indices()
			.map(|(s, t)| {
				let (path, label_at) = self.route(&cards[s].rect, &cards[t].rect);
				Connector::new(
					cards[s].id.clone(),
					cards[t].id.clone(),
					path,
					cards[t].style.accent.clone(),
				)
				.width(self.link_width)
				.animated()
				.caption(self.caption, label_at)
			})
			.collect();

		Scene {
			cards,
			connectors,
			..Scene::default()
		}
		.fit(self.config.margin)
	}

	fn render(self: Arc<Self>, ctx: StrategyContext) -> AnyView {
		let options = SceneOptions::navigable(self.viewport);
		scene_view_with(self, ctx, "flowchart", options)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::layout::{LayoutError, LayoutRequest};

	struct Broken;

	impl GraphLayout for Broken {
		fn layout(&self, _: &LayoutRequest) -> Result<HashMap<String, Point>, LayoutError> {
			Err(LayoutError::Empty)
		}
	}

	#[test]
	fn vertical_chain_flows_downwards() {
		let chain = StyledChain::reference().unwrap();
		let scene = FlowchartStrategy::vertical().arrange(&chain, None);
		assert_eq!(scene.cards.len(), 6);
		assert_eq!(scene.connectors.len(), 5);
		for pair in scene.cards.windows(2) {
			assert!(pair[1].rect.origin.y > pair[0].rect.bottom());
			assert_eq!(pair[1].rect.origin.x, pair[0].rect.origin.x);
		}
		assert_eq!(scene.cards[0].rect.origin, Point::new(40.0, 40.0));
	}

	#[test]
	fn horizontal_chain_flows_right() {
		let chain = StyledChain::reference().unwrap();
		let scene = FlowchartStrategy::horizontal().arrange(&chain, None);
		for pair in scene.cards.windows(2) {
			assert!(pair[1].rect.origin.x > pair[0].rect.right());
		}
		let caption = scene.connectors[0].caption.as_ref().unwrap();
		assert_eq!(caption.text, "cause");
	}

	#[test]
	fn connectors_take_the_cause_colour() {
		let chain = StyledChain::reference().unwrap();
		let scene = FlowchartStrategy::vertical().arrange(&chain, None);
		// link 3 -> 4 ends on the operational node
		assert_eq!(scene.connectors[3].color, "#F59E0B");
		assert!(scene.connectors.iter().all(|c| c.animated));
	}

	#[test]
	fn solver_failure_still_places_every_node() {
		let chain = StyledChain::reference().unwrap();
		let strategy = FlowchartStrategy {
			solver: Broken,
			config: LayeredConfig::default(),
			caption: "causé par",
			link_width: 2.5,
			viewport: Size::new(400.0, 300.0),
		};
		let scene = strategy.arrange(&chain, Some(&"0".into()));
		assert_eq!(scene.cards.len(), 6);
		assert!(scene.cards[1].rect.origin.y > scene.cards[0].rect.origin.y);
		assert_eq!(scene.visible_details().len(), 1);
	}

	#[test]
	fn wide_charts_start_zoomed_out_to_fit() {
		use crate::components::viewport::PanZoom;

		let chain = StyledChain::reference().unwrap();
		let strategy = FlowchartStrategy::horizontal();
		let scene = strategy.arrange(&chain, None);
		assert!(scene.size.width > strategy.viewport.width);

		let mut view = PanZoom::new(strategy.viewport);
		view.fit(scene.size);
		assert!(view.transform.k < 1.0);
		let shown = view.transform.visible(strategy.viewport);
		assert!(shown.origin.x <= 0.0 && shown.right() >= scene.size.width);
	}
}
