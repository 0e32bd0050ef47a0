//! Selection state and the dashboard controller that owns it.
//!
//! The controller is plain data so it can live inside a Leptos signal and be
//! driven from tests without a browser. The entrance animation is modelled as
//! a ticket: every layout switch issues a new one, and only the latest ticket
//! may settle the transition.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::components::{StrategyDescriptor, StrategyRegistry};
use crate::model::{DashboardError, DashboardResult, NodeId, StyledChain};

/// Entrance animation state of the visualisation area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPhase {
	/// Freshly switched, drawn offset and transparent.
	Entering,
	/// Resting position.
	#[default]
	Settled,
}

impl TransitionPhase {
	pub fn is_settled(self) -> bool {
		self == TransitionPhase::Settled
	}
}

/// Proof of a scheduled transition. Only the most recent one is honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitionTicket(u64);

/// Timing of the layout switch animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionConfig {
	/// Delay between the switch and the settle, long enough for a CSS transition to start.
	pub delay: Duration,
}

impl Default for TransitionConfig {
	fn default() -> Self {
		Self {
			delay: Duration::from_millis(60),
		}
	}
}

/// UI flags owned by the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionState {
	pub active_node: Option<NodeId>,
	pub selected_layout: String,
	pub transition: TransitionPhase,
	generation: u64,
}

/// Owns selection state and mediates every mutation of it.
#[derive(Clone)]
pub struct DashboardController {
	registry: Arc<StrategyRegistry>,
	chain: StyledChain,
	selection: SelectionState,
}

impl DashboardController {
	/// Start on the registry's first (recommended) layout with nothing active.
	pub fn new(registry: Arc<StrategyRegistry>, chain: StyledChain) -> Self {
		let selected_layout = registry.first().id.to_string();
		Self {
			registry,
			chain,
			selection: SelectionState {
				active_node: None,
				selected_layout,
				transition: TransitionPhase::Settled,
				generation: 0,
			},
		}
	}

	pub fn selection(&self) -> &SelectionState {
		&self.selection
	}

	pub fn chain(&self) -> &StyledChain {
		&self.chain
	}

	pub fn registry(&self) -> &StrategyRegistry {
		&self.registry
	}

	pub fn active_node(&self) -> Option<&NodeId> {
		self.selection.active_node.as_ref()
	}

	/// Descriptor of the selected layout.
	pub fn current_layout(&self) -> &StrategyDescriptor {
		// selected_layout is only ever assigned a registered id
		self.registry
			.get(&self.selection.selected_layout)
			.unwrap_or_else(|| self.registry.first())
	}

	/// Switch layout: clears the active node and restarts the entrance animation.
	///
	/// Unknown ids are rejected and leave the state untouched.
	pub fn select_layout(&mut self, layout_id: &str) -> DashboardResult<TransitionTicket> {
		if !self.registry.contains(layout_id) {
			warn!("rejecting unknown layout `{layout_id}`");
			return Err(DashboardError::UnknownLayout(layout_id.into()));
		}
		debug!("switching layout to `{layout_id}`");
		self.selection.selected_layout = layout_id.into();
		self.selection.active_node = None;
		self.selection.transition = TransitionPhase::Entering;
		self.selection.generation += 1;
		Ok(TransitionTicket(self.selection.generation))
	}

	/// Settle the transition if `ticket` is still the latest one.
	pub fn complete_transition(&mut self, ticket: TransitionTicket) -> bool {
		if ticket.0 != self.selection.generation {
			debug!("ignoring stale transition ticket {}", ticket.0);
			return false;
		}
		self.selection.transition = TransitionPhase::Settled;
		true
	}

	/// Expand `node_id`, or collapse it when it is already the active node.
	pub fn toggle_active_node(&mut self, node_id: &NodeId) -> DashboardResult<Option<&NodeId>> {
		if !self.chain.model().contains(node_id) {
			return Err(DashboardError::UnknownNode(node_id.clone()));
		}
		if self.selection.active_node.as_ref() == Some(node_id) {
			debug!("collapsing node `{node_id}`");
			self.selection.active_node = None;
		} else {
			debug!("expanding node `{node_id}`");
			self.selection.active_node = Some(node_id.clone());
		}
		Ok(self.selection.active_node.as_ref())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn controller() -> DashboardController {
		DashboardController::new(
			Arc::new(StrategyRegistry::standard()),
			StyledChain::reference().unwrap(),
		)
	}

	#[test]
	fn starts_on_the_recommended_layout() {
		let c = controller();
		assert_eq!(c.current_layout().id, "flowchart");
		assert_eq!(c.active_node(), None);
		assert!(c.selection().transition.is_settled());
	}

	#[test]
	fn unknown_layout_keeps_prior_state() {
		let mut c = controller();
		c.toggle_active_node(&"1".into()).unwrap();
		let before = c.selection().clone();
		assert_eq!(
			c.select_layout("pie-chart"),
			Err(DashboardError::UnknownLayout("pie-chart".into()))
		);
		assert_eq!(c.selection(), &before);
	}

	#[test]
	fn switching_clears_the_active_node() {
		let mut c = controller();
		c.toggle_active_node(&"2".into()).unwrap();
		c.select_layout("waterfall").unwrap();
		assert_eq!(c.active_node(), None);
		assert_eq!(c.selection().transition, TransitionPhase::Entering);
		assert_eq!(c.current_layout().id, "waterfall");
	}

	#[test]
	fn unknown_node_is_rejected() {
		let mut c = controller();
		assert_eq!(
			c.toggle_active_node(&"42".into()),
			Err(DashboardError::UnknownNode("42".into()))
		);
		assert_eq!(c.active_node(), None);
	}

	#[test]
	fn stale_ticket_has_no_effect() {
		let mut c = controller();
		let first = c.select_layout("waterfall").unwrap();
		let second = c.select_layout("sankey").unwrap();
		assert!(!c.complete_transition(first));
		assert_eq!(c.selection().transition, TransitionPhase::Entering);
		assert!(c.complete_transition(second));
		assert!(c.selection().transition.is_settled());
	}
}
