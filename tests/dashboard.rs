//! End-to-end behaviour of the dashboard over the reference chain.

use std::sync::Arc;

use rca_dashboard::components::{LayoutStrategy, StrategyRegistry};
use rca_dashboard::controller::{DashboardController, TransitionPhase};
use rca_dashboard::model::{
	CausalLink, CausalNode, Category, DashboardError, NodeId, StyledChain, TypeTaxonomy,
};

fn controller(registry: StrategyRegistry) -> DashboardController {
	DashboardController::new(Arc::new(registry), StyledChain::reference().unwrap())
}

fn rosters() -> [StrategyRegistry; 2] {
	[StrategyRegistry::standard(), StrategyRegistry::extended()]
}

#[test]
fn reselecting_a_layout_is_idempotent() {
	for registry in rosters() {
		let ids: Vec<&str> = registry.iter().map(|d| d.id).collect();
		let mut c = controller(registry);
		for id in ids {
			c.toggle_active_node(&"1".into()).unwrap();
			c.select_layout(id).unwrap();
			c.select_layout(id).unwrap();
			assert_eq!(c.active_node(), None);
			assert_eq!(c.selection().selected_layout, id);
		}
	}
}

#[test]
fn at_most_one_node_is_active() {
	let mut c = controller(StrategyRegistry::standard());
	let ids: Vec<NodeId> = c
		.chain()
		.model()
		.list_nodes()
		.iter()
		.map(|n| n.id.clone())
		.collect();
	for a in &ids {
		for b in ids.iter().filter(|b| *b != a) {
			c.toggle_active_node(a).unwrap();
			let now = c.toggle_active_node(b).unwrap().cloned();
			assert_eq!(now.as_ref(), Some(b));
			// reset for the next pair
			c.toggle_active_node(b).unwrap();
		}
	}
}

#[test]
fn toggling_twice_collapses() {
	let mut c = controller(StrategyRegistry::standard());
	let id = NodeId::from("4");
	assert_eq!(c.toggle_active_node(&id).unwrap(), Some(&id));
	assert_eq!(c.toggle_active_node(&id).unwrap(), None);
	assert_eq!(c.active_node(), None);
}

#[test]
fn reference_chain_is_linear() {
	let chain = StyledChain::reference().unwrap();
	let model = chain.model();
	let edges = model.list_edges();
	assert_eq!(edges.len(), 5);
	for (i, edge) in edges.iter().enumerate() {
		assert_eq!(edge.source, NodeId::from(i.to_string()));
		assert_eq!(edge.target, NodeId::from((i + 1).to_string()));
		assert!(model.node(&edge.source).is_some());
		assert!(model.node(&edge.target).is_some());
	}
}

#[test]
fn taxonomy_lookups() {
	let taxonomy = TypeTaxonomy::standard();
	for key in ["kpi", "operational", "qualitative"] {
		assert!(!taxonomy.category_style(key).unwrap().accent.is_empty());
	}
	assert!(matches!(
		taxonomy.category_style("unknown"),
		Err(DashboardError::Lookup(_))
	));
}

#[test]
fn only_the_last_switch_settles() {
	let mut c = controller(StrategyRegistry::standard());
	let a = c.select_layout("waterfall").unwrap();
	let b = c.select_layout("treemap").unwrap();

	// A's timer fires late: nothing observable happens
	let before = c.selection().clone();
	assert!(!c.complete_transition(a));
	assert_eq!(c.selection(), &before);
	assert_eq!(c.selection().transition, TransitionPhase::Entering);

	assert!(c.complete_transition(b));
	assert_eq!(c.selection().transition, TransitionPhase::Settled);
	assert_eq!(c.current_layout().id, "treemap");
}

#[test]
fn every_layout_shows_exactly_the_active_detail() {
	let chain = StyledChain::reference().unwrap();
	let raw = NodeId::from("2");
	assert_eq!(chain.model().node(&raw).unwrap().label, "Coût matières premières");

	for registry in rosters() {
		for descriptor in registry.iter() {
			let scene = descriptor.strategy.arrange(&chain, Some(&raw));
			assert_eq!(
				scene.visible_details(),
				vec!["Augmentation prix d'achat MP"],
				"layout `{}`",
				descriptor.id
			);
			assert_eq!(scene.active().map(|c| &c.id), Some(&raw));

			let collapsed = descriptor.strategy.arrange(&chain, None);
			assert!(collapsed.visible_details().is_empty(), "layout `{}`", descriptor.id);
		}
	}
}

#[test]
fn every_layout_draws_every_node_in_its_category_colour() {
	let chain = StyledChain::reference().unwrap();
	for registry in rosters() {
		for descriptor in registry.iter() {
			let scene = descriptor.strategy.arrange(&chain, None);
			assert_eq!(scene.cards.len(), 6, "layout `{}`", descriptor.id);
			for (card, entry) in scene.cards.iter().zip(chain.entries()) {
				assert_eq!(card.id, entry.node.id);
				assert_eq!(card.value, entry.node.value);
				assert_eq!(card.style.accent, entry.style.accent);
			}
		}
	}
}

#[test]
fn clicks_on_unknown_nodes_leave_state_alone() {
	let mut c = controller(StrategyRegistry::extended());
	c.toggle_active_node(&"0".into()).unwrap();
	assert!(c.toggle_active_node(&"ghost".into()).is_err());
	assert_eq!(c.active_node(), Some(&NodeId::from("0")));
}

/// Diamond: `a` caused by `b` and `c`, both caused by `d`.
fn diamond() -> StyledChain {
	let node = |id: &str, category| CausalNode::new(id, id, "1", None, category, id);
	StyledChain::standard(
		vec![
			node("a", Category::Kpi),
			node("b", Category::Operational),
			node("c", Category::Kpi),
			node("d", Category::Qualitative),
		],
		vec![
			CausalLink::new("a", "c"),
			CausalLink::new("a", "b"),
			CausalLink::new("c", "d"),
			CausalLink::new("b", "d"),
		],
	)
	.unwrap()
}

#[test]
fn every_layout_connects_exactly_the_linked_nodes() {
	let chain = diamond();
	let mut links: Vec<(String, String)> = chain
		.model()
		.list_edges()
		.iter()
		.map(|l| (l.source.to_string(), l.target.to_string()))
		.collect();
	links.sort();

	for registry in rosters() {
		for descriptor in registry.iter() {
			let scene = descriptor.strategy.arrange(&chain, None);
			let mut drawn: Vec<(String, String)> = scene
				.connectors
				.iter()
				.map(|c| (c.from.to_string(), c.to.to_string()))
				.collect();
			drawn.sort();

			if descriptor.id == "treemap" {
				// nesting stands in for arrows: every cause sits inside one of its effects
				assert!(drawn.is_empty());
				for card in &scene.cards {
					let effects: Vec<_> = links
						.iter()
						.filter(|(_, t)| *t == card.id.as_str())
						.collect();
					if effects.is_empty() {
						continue;
					}
					let inner = card.rect;
					assert!(
						effects.iter().any(|(s, _)| {
							let outer = scene.card(&s.as_str().into()).unwrap().rect;
							outer.inset(-1e-6).contains(&inner)
						}),
						"{} is not nested in any of its effects",
						card.id
					);
				}
			} else {
				assert_eq!(drawn, links, "{}", descriptor.id);
			}
		}
	}
}
