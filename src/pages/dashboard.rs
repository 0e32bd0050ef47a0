//! The dashboard page: layout tabs, legend, the active visualisation and the comparison table.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::components::A;
use log::{debug, warn};

use crate::components::{Comparison, StrategyContext, StrategyRegistry, ordinal};
use crate::controller::{DashboardController, TransitionConfig, TransitionTicket};
use crate::model::{NodeId, StyledChain};

/// Full dashboard over the reference chain, drawing with the strategies in `registry`.
#[component]
pub fn Dashboard(
	registry: Arc<StrategyRegistry>,
	#[prop(optional)] transition: TransitionConfig,
) -> impl IntoView {
	let loaded = StyledChain::reference();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<div class="load-error">
					<h1>"Uh oh! Something went wrong!"</h1>

					<p>"Errors: "</p>
					<ul>
						{move || {
							errors
								.get()
								.into_iter()
								.map(|(_, e)| view! { <li>{e.to_string()}</li> })
								.collect_view()
						}}
					</ul>
				</div>
			}
		}>
			{loaded
				.map(|chain| {
					view! { <DashboardBody registry=registry chain=chain transition=transition /> }
				})}
		</ErrorBoundary>
	}
}

#[component]
fn DashboardBody(
	registry: Arc<StrategyRegistry>,
	chain: StyledChain,
	transition: TransitionConfig,
) -> impl IntoView {
	let controller = RwSignal::new(DashboardController::new(registry.clone(), chain.clone()));
	let pending: StoredValue<Option<TimeoutHandle>> = StoredValue::new(None);

	// Last scheduler wins: the previous timer is cleared, and a callback that
	// already fired is disarmed by its stale ticket.
	let settle_later = move |ticket: TransitionTicket| {
		if let Some(handle) = pending.get_value() {
			handle.clear();
		}
		let settle = move || {
			controller.try_update(|c| c.complete_transition(ticket));
		};
		match set_timeout_with_handle(settle, transition.delay) {
			Ok(handle) => pending.set_value(Some(handle)),
			Err(err) => {
				warn!("could not schedule the transition, settling now: {err:?}");
				controller.update(|c| {
					c.complete_transition(ticket);
				});
			}
		}
	};
	on_cleanup(move || {
		if let Some(handle) = pending.try_get_value().flatten() {
			handle.clear();
		}
	});

	let active: Signal<Option<NodeId>> =
		Memo::new(move |_| controller.with(|c| c.active_node().cloned())).into();
	let on_node_click = Callback::new(move |id: NodeId| {
		controller.update(|c| {
			if let Err(err) = c.toggle_active_node(&id) {
				warn!("ignoring click: {err}");
			}
		});
	});

	let tabs = registry
		.iter()
		.enumerate()
		.map(|(i, descriptor)| {
			let (id, color) = (descriptor.id, descriptor.tag_color);
			let style = move || {
				if controller.with(|c| c.selection().selected_layout == id) {
					format!("border: 2px solid {color}; background: {color}15; color: #F1F5F9;")
				} else {
					"border: 1px solid #334155; background: #1E293B; color: #94A3B8;".to_string()
				}
			};
			let on_click = move |_| {
				if let Some(Ok(ticket)) = controller.try_update(|c| c.select_layout(id)) {
					settle_later(ticket);
				}
			};
			view! {
				<button class="viz-tab" style=style on:click=on_click>
					{format!("{} {}", ordinal(i), descriptor.name)}
				</button>
			}
		})
		.collect_view();

	let current = move || {
		controller.with(|c| {
			let d = c.current_layout();
			(d.tag, d.tag_color, d.description, d.package)
		})
	};

	let legend = chain
		.taxonomy()
		.legend()
		.map(|(_, style)| {
			view! {
				<div class="legend-item">
					<span class="legend-dot" style=format!("background: {};", style.accent)></span>
					<span class="legend-label">{style.label.clone()}</span>
				</div>
			}
		})
		.collect_view();

	let stage_style = move || {
		if controller.with(|c| c.selection().transition.is_settled()) {
			"opacity: 1; transform: translateY(0);"
		} else {
			"opacity: 0; transform: translateY(12px);"
		}
	};

	let layout_id = Memo::new(move |_| controller.with(|c| c.selection().selected_layout.clone()));
	let stage_registry = registry.clone();
	let stage = move || {
		let id = layout_id.get();
		let descriptor = stage_registry.get(&id)?.clone();
		debug!("mounting layout `{id}`");
		Some(descriptor.render(StrategyContext {
			chain: chain.clone(),
			active,
			on_node_click,
		}))
	};

	let rows = registry
		.iter()
		.enumerate()
		.map(|(i, d)| {
			let rating = d.comparison;
			let class = if i == 0 { "recommended" } else { "" };
			view! {
				<tr class=class>
					<td class="cmp-name">
						{(i == 0).then(|| view! { <span class="cmp-star">"★"</span> })}
						{d.name}
					</td>
					<td>
						<code>{d.package}</code>
					</td>
					<td class="cmp-interactivity">{Comparison::stars(rating.interactivity)}</td>
					<td class="cmp-impact">{Comparison::stars(rating.impact)}</td>
					<td class="cmp-complexity">{rating.complexity}</td>
				</tr>
			}
		})
		.collect_view();

	let count = registry.len();

	view! {
		<div class="dashboard">
			<header class="dash-header">
				<div class="dash-title">
					<h1>"Root Cause Analysis"</h1>
					<span class="demo-badge">"INTERACTIVE DEMO"</span>
				</div>
				<nav class="roster-links">
					<A href="/">"Vues classiques"</A>
					<A href="/extended">"Vues diagnostiques"</A>
				</nav>
				<p class="subtitle">
					{format!(
						"{count} visualisations de la chaîne causale. Cliquez sur chaque nœud pour explorer le détail. Comparez les approches.",
					)}
				</p>
			</header>

			<nav class="viz-tabs">{tabs}</nav>

			<div class="info-bar">
				<div class="info-main">
					<span class="info-tag" style=move || format!("color: {};", current().1)>
						{move || current().0}
					</span>
					<span class="info-sep"></span>
					<span class="info-desc">{move || current().2}</span>
				</div>
				<div class="info-package">
					<span class="info-package-label">"Package"</span>
					<code>{move || current().3}</code>
				</div>
			</div>

			<div class="legend">{legend}</div>

			<section class="viz-stage" style=stage_style>
				{stage}
			</section>

			<section class="comparison">
				<h2>"Comparatif des approches"</h2>
				<table>
					<thead>
						<tr>
							<th>"Visualisation"</th>
							<th>"Package"</th>
							<th>"Interactivité"</th>
							<th>"Impact comex"</th>
							<th>"Complexité"</th>
						</tr>
					</thead>
					<tbody>{rows}</tbody>
				</table>
			</section>

			<footer class="dash-footer">
				{format!("RCA Dashboard Demo · {count} visualisations · Données mockées")}
			</footer>
		</div>
	}
}
