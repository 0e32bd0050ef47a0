use std::fmt;
use std::sync::Arc;

use leptos::prelude::*;

use super::scene::Scene;
use crate::model::{NodeId, StyledChain};

/// What a strategy needs to render itself in the dashboard.
///
/// The strategy reads `active` and reports clicks through `on_node_click`; it
/// never mutates selection itself.
#[derive(Clone)]
pub struct StrategyContext {
	pub chain: StyledChain,
	pub active: Signal<Option<NodeId>>,
	pub on_node_click: Callback<NodeId>,
}

/// An interchangeable way of drawing the causal chain.
pub trait LayoutStrategy: Send + Sync {
	/// Pure arrangement of the chain with `active` expanded.
	fn arrange(&self, chain: &StyledChain, active: Option<&NodeId>) -> Scene;

	/// Mount the strategy. Most strategies delegate to [`super::SceneView`].
	fn render(self: Arc<Self>, ctx: StrategyContext) -> AnyView;
}

/// How node positions are obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutFamily {
	/// Closed-form function of the display index.
	Intrinsic,
	/// Delegated to a graph layout pass.
	Solver,
}

/// Drawing surface a strategy mounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderingContext {
	/// SVG connectors under absolutely positioned HTML cards.
	Svg,
	/// Animated 2D canvas.
	Canvas,
}

/// Ratings shown in the comparison table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Comparison {
	/// Out of five.
	pub interactivity: u8,
	/// Out of five.
	pub impact: u8,
	pub complexity: &'static str,
}

impl Comparison {
	/// `n` filled stars out of five.
	pub fn stars(n: u8) -> String {
		let n = n.min(5) as usize;
		format!("{}{}", "★".repeat(n), "☆".repeat(5 - n))
	}
}

/// Registry entry: metadata plus the strategy handle.
#[derive(Clone)]
pub struct StrategyDescriptor {
	pub id: &'static str,
	pub name: &'static str,
	pub tag: &'static str,
	pub tag_color: &'static str,
	pub description: &'static str,
	/// Rendering technique, shown in the info bar.
	pub package: &'static str,
	pub family: LayoutFamily,
	pub context: RenderingContext,
	pub comparison: Comparison,
	pub strategy: Arc<dyn LayoutStrategy>,
}

impl fmt::Debug for StrategyDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StrategyDescriptor")
			.field("id", &self.id)
			.field("family", &self.family)
			.field("context", &self.context)
			.finish_non_exhaustive()
	}
}

impl StrategyDescriptor {
	/// Mount this strategy.
	pub fn render(&self, ctx: StrategyContext) -> AnyView {
		self.strategy.clone().render(ctx)
	}
}
