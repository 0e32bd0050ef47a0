use std::sync::Arc;

use leptos::prelude::*;

use crate::components::scene::{CardShape, NodeCard, Scene};
use crate::components::scene_view::{SceneOptions, scene_view_with};
use crate::components::strategy::{LayoutStrategy, StrategyContext};
use crate::layout::{Rect, Size};
use crate::model::{NodeId, StyledChain};

/// Relative weight of the first levels; deeper levels keep shrinking by [`DEEPER_DECAY`].
const TILE_WEIGHTS: [f64; 6] = [600.0, 400.0, 300.0, 200.0, 150.0, 100.0];
const DEEPER_DECAY: f64 = 0.7;

/// Rough glyph width used to fit labels into a tile.
const GLYPH_WIDTH: f64 = 8.0;

/// Nested tiles: each cause is drawn inside the tile of its effect.
#[derive(Clone, Debug)]
pub struct TreemapStrategy {
	pub size: Size,
	pub padding: f64,
	/// Tiles smaller than this are not drawn, nor is anything nested in them.
	pub min_tile: Size,
}

impl Default for TreemapStrategy {
	fn default() -> Self {
		Self {
			size: Size::new(900.0, 520.0),
			padding: 6.0,
			min_tile: Size::new(40.0, 30.0),
		}
	}
}

/// Weight of the tile at `level` (zero-based).
fn weight(level: usize) -> f64 {
	match TILE_WEIGHTS.get(level) {
		Some(w) => *w,
		None => {
			let last = TILE_WEIGHTS.len() - 1;
			TILE_WEIGHTS[last] * DEEPER_DECAY.powi((level - last) as i32)
		}
	}
}

impl TreemapStrategy {
	/// Split the inside of `parent` between the parent's own strip and its child.
	/// Even levels cut vertically with the child on the right, odd levels cut
	/// horizontally with the child at the bottom.
	fn split(&self, parent: &Rect, level: usize) -> (Rect, Rect) {
		let inner = parent.inset(self.padding);
		let share = weight(level + 1) / weight(level);
		if level % 2 == 0 {
			let w = inner.size.width * share;
			let strip = Rect::new(
				inner.origin.x,
				inner.origin.y,
				inner.size.width - w,
				inner.size.height,
			);
			let child = Rect::new(strip.right(), inner.origin.y, w, inner.size.height);
			(strip, child)
		} else {
			let h = inner.size.height * share;
			let strip = Rect::new(
				inner.origin.x,
				inner.origin.y,
				inner.size.width,
				inner.size.height - h,
			);
			let child = Rect::new(inner.origin.x, strip.bottom(), inner.size.width, h);
			(strip, child)
		}
	}

	fn fits(&self, rect: &Rect) -> bool {
		rect.size.width >= self.min_tile.width && rect.size.height >= self.min_tile.height
	}

	/// Cut `area` into `count` equal slots, stacked across the cut made at `level`.
	fn slots(area: Rect, count: usize, level: usize) -> impl Iterator<Item = Rect> {
		let n = count.max(1) as f64;
		(0..count).map(move |i| {
			let i = i as f64;
			if level % 2 == 0 {
				let h = area.size.height / n;
				Rect::new(area.origin.x, area.origin.y + i * h, area.size.width, h)
			} else {
				let w = area.size.width / n;
				Rect::new(area.origin.x + i * w, area.origin.y, w, area.size.height)
			}
		})
	}

	fn place(
		&self,
		chain: &StyledChain,
		tree: &Nesting,
		at: (usize, Rect, usize),
		active: Option<&NodeId>,
		cards: &mut Vec<NodeCard>,
	) {
		let (index, tile, level) = at;
		let Some(entry) = chain.entry(index) else {
			return;
		};
		if !self.fits(&tile) {
			return;
		}
		let causes = &tree.children[index];
		let (strip, inside) = if causes.is_empty() {
			(tile.inset(self.padding), None)
		} else {
			let (strip, inside) = self.split(&tile, level);
			(strip, Some(inside))
		};
		let max_label = (strip.size.width / GLYPH_WIDTH).floor() as usize;
		cards.push(NodeCard::from_entry(&entry, tile, CardShape::Tile, active, Some(max_label)));

		if let Some(inside) = inside {
			for (&cause, slot) in causes.iter().zip(Self::slots(inside, causes.len(), level)) {
				self.place(chain, tree, (cause, slot, level + 1), active, cards);
			}
		}
	}
}

/// Each node nested under the first effect that links to it.
struct Nesting {
	children: Vec<Vec<usize>>,
	roots: Vec<usize>,
}

impl Nesting {
	fn new(chain: &StyledChain) -> Self {
		let mut nested = vec![false; chain.len()];
		let mut children = vec![Vec::new(); chain.len()];
		for (effect, cause) in chain.link_indices() {
			if !nested[cause] {
				nested[cause] = true;
				children[effect].push(cause);
			}
		}
		let roots = (0..chain.len()).filter(|&i| !nested[i]).collect();
		Self { children, roots }
	}
}

impl LayoutStrategy for TreemapStrategy {
	fn arrange(&self, chain: &StyledChain, active: Option<&NodeId>) -> Scene {
		let tree = Nesting::new(chain);
		let mut cards = Vec::with_capacity(chain.len());
		// Separate effects share the canvas side by side.
		let canvas = Rect::at(Default::default(), self.size);
		for (&root, tile) in tree.roots.iter().zip(Self::slots(canvas, tree.roots.len(), 1)) {
			self.place(chain, &tree, (root, tile, 0), active, &mut cards);
		}

		Scene {
			size: self.size,
			cards,
			..Scene::default()
		}
	}

	fn render(self: Arc<Self>, ctx: StrategyContext) -> AnyView {
		scene_view_with(self, ctx, "treemap", SceneOptions::with_tooltip())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{CausalNode, Category, fixtures};

	#[test]
	fn weights_decay_past_the_table() {
		assert_eq!(weight(0), 600.0);
		assert_eq!(weight(5), 100.0);
		assert!((weight(7) - 49.0).abs() < 1e-9);
	}

	#[test]
	fn every_cause_sits_inside_its_effect() {
		let chain = StyledChain::reference().unwrap();
		let scene = TreemapStrategy::default().arrange(&chain, None);
		assert_eq!(scene.cards.len(), 6);
		for pair in scene.cards.windows(2) {
			let (outer, inner) = (pair[0].rect, pair[1].rect);
			assert!(outer.inset(-1e-6).contains(&inner));
			assert!(inner.size.width < outer.size.width);
		}
	}

	#[test]
	fn cuts_alternate_direction() {
		let chain = StyledChain::reference().unwrap();
		let scene = TreemapStrategy::default().arrange(&chain, None);
		let (root, first, second) = (&scene.cards[0], &scene.cards[1], &scene.cards[2]);
		// child of the root hugs its right edge, its own child the bottom edge
		assert!((first.rect.right() - (root.rect.right() - 6.0)).abs() < 1e-9);
		assert!((second.rect.bottom() - (first.rect.bottom() - 6.0)).abs() < 1e-9);
		assert_eq!(second.rect.size.width, first.rect.size.width - 12.0);
	}

	#[test]
	fn labels_fit_the_free_strip() {
		let chain = StyledChain::reference().unwrap();
		let strategy = TreemapStrategy {
			size: Size::new(300.0, 200.0),
			..TreemapStrategy::default()
		};
		let scene = strategy.arrange(&chain, None);
		// root strip is a third of 288 px wide: 12 glyphs
		assert_eq!(scene.cards[0].label, "Marge nette");
		// third tile keeps a strip of about 56 px
		let label = &scene.cards[2].label;
		assert!(label.starts_with("Coût m"));
		assert!(label.ends_with('…'));
		assert!(label.chars().count() <= 8);
	}

	#[test]
	fn tiny_tiles_are_dropped() {
		let chain = StyledChain::reference().unwrap();
		let strategy = TreemapStrategy {
			size: Size::new(160.0, 120.0),
			..TreemapStrategy::default()
		};
		let scene = strategy.arrange(&chain, None);
		assert!(scene.cards.len() < 6);
		assert!(
			scene
				.cards
				.iter()
				.all(|c| c.rect.size.width >= 40.0 && c.rect.size.height >= 30.0)
		);
	}

	#[test]
	fn tiles_nest_along_links_not_display_order() {
		let chain = fixtures::branching();
		let scene = TreemapStrategy::default().arrange(&chain, None);
		let order: Vec<_> = scene.cards.iter().map(|c| c.id.as_str()).collect();
		assert_eq!(order, ["a", "c", "d", "b"]);

		let rect = |id: &str| scene.card(&id.into()).unwrap().rect.inset(-1e-6);
		assert!(rect("a").contains(&rect("b")));
		assert!(rect("a").contains(&rect("c")));
		assert!(rect("c").contains(&rect("d")));
		// siblings share their effect's free area without overlapping
		let (b, c) = (rect("b"), rect("c"));
		assert!(b.origin.y >= c.bottom() - 1e-3 || c.origin.y >= b.bottom() - 1e-3);
		assert!(!rect("b").contains(&rect("d")));
	}

	#[test]
	fn unrelated_effects_sit_side_by_side() {
		let node = |id: &str| CausalNode::new(id, id, "1", None, Category::Kpi, "");
		let chain = StyledChain::standard(vec![node("x"), node("y")], vec![]).unwrap();
		let scene = TreemapStrategy::default().arrange(&chain, None);
		assert_eq!(scene.cards.len(), 2);
		assert_eq!(scene.cards[0].rect.size.width, 450.0);
		assert_eq!(scene.cards[1].rect.origin.x, 450.0);
	}
}
