//! Generic DOM rendering of a [`Scene`]: an SVG connector layer under
//! absolutely positioned node cards.

use std::sync::Arc;

use leptos::prelude::*;
use web_sys::{MouseEvent, WheelEvent};

use super::scene::{CardShape, NodeCard, Scene};
use super::strategy::{LayoutStrategy, StrategyContext};
use super::viewport::{PanZoom, minimap_markup};
use crate::layout::Size;
use crate::model::NodeId;

const MINIMAP: Size = Size::new(180.0, 120.0);

/// Optional chrome around a scene.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneOptions {
	/// Show the scene in a frame of this size with drag to pan, wheel zoom,
	/// zoom and fit buttons, a minimap and a dotted grid.
	pub viewport: Option<Size>,
	/// Hovering a card shows its full label, level and value.
	pub tooltip: bool,
}

impl SceneOptions {
	pub fn navigable(frame: Size) -> Self {
		Self {
			viewport: Some(frame),
			..Self::default()
		}
	}

	pub fn with_tooltip() -> Self {
		Self {
			tooltip: true,
			..Self::default()
		}
	}
}

/// Mount `strategy` as a scene that re-arranges whenever the active node changes.
pub fn scene_view<S>(strategy: Arc<S>, ctx: StrategyContext, scope: &'static str) -> AnyView
where
	S: LayoutStrategy + 'static,
{
	scene_view_with(strategy, ctx, scope, SceneOptions::default())
}

/// [`scene_view`] with extra chrome.
pub fn scene_view_with<S>(
	strategy: Arc<S>,
	ctx: StrategyContext,
	scope: &'static str,
	options: SceneOptions,
) -> AnyView
where
	S: LayoutStrategy + 'static,
{
	let StrategyContext {
		chain,
		active,
		on_node_click,
	} = ctx;
	let scene = Memo::new(move |_| active.with(|a| strategy.arrange(&chain, a.as_ref())));
	view! { <SceneView scene=scene on_node_click=on_node_click scope=scope options=options /> }
		.into_any()
}

/// Draw a scene and forward card clicks.
#[component]
pub fn SceneView(
	#[prop(into)] scene: Signal<Scene>,
	on_node_click: Callback<NodeId>,
	#[prop(default = "scene")] scope: &'static str,
	#[prop(optional)] options: SceneOptions,
) -> impl IntoView {
	let pan_zoom = RwSignal::new(PanZoom::new(options.viewport.unwrap_or_default()));
	let hovered = RwSignal::new(None::<NodeId>);
	let hover = options.tooltip.then_some(hovered);
	let viewport_ref = NodeRef::<leptos::html::Div>::new();

	let content_size = Memo::new(move |_| scene.with(|s| s.size));
	if options.viewport.is_some() {
		Effect::new(move |_| {
			let size = content_size.get();
			pan_zoom.update(|p| p.fit(size));
		});
	}

	let frame = move || {
		let size = content_size.get();
		let mut css = format!(
			"position: relative; width: {:.0}px; height: {:.0}px;",
			size.width, size.height
		);
		if options.viewport.is_some() {
			css.push(' ');
			css.push_str(&pan_zoom.with(|p| p.transform.css()));
		} else {
			css.push_str(" margin: 0 auto;");
		}
		css
	};
	let on_card_click = Callback::new(move |id: NodeId| {
		if !pan_zoom.with_untracked(PanZoom::swallows_click) {
			on_node_click.run(id);
		}
	});
	let links = move || scene.with(|s| svg_markup(s, scope));
	let cards = move || {
		scene.with(|s| {
			s.cards
				.iter()
				.cloned()
				.map(|card| {
					view! { <NodeCardView card=card on_click=on_card_click hovered=hover /> }
				})
				.collect_view()
		})
	};
	let tooltip = move || {
		let id = hovered.get()?;
		let card = scene.with(|s| s.card(&id).cloned())?;
		Some(view! { <Tooltip card=card /> })
	};
	let panel = move || {
		scene.with(|s| {
			s.active()
				.filter(|c| !c.shape.inline_detail())
				.cloned()
				.map(|card| view! { <DetailPanel card=card /> })
		})
	};

	let stage = view! {
		<div class="scene" style=frame on:mouseleave=move |_| hovered.set(None)>
			<div class="scene-links" inner_html=links></div>
			{cards}
			{tooltip}
		</div>
	};

	let Some(frame_size) = options.viewport else {
		return view! {
			<div class="scene-viewport">
				{stage}
				{panel}
			</div>
		}
		.into_any();
	};

	// Pointer position relative to the frame.
	let local = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let rect = viewport_ref.get()?.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = local(&ev) {
			pan_zoom.update(|p| p.press(x, y));
		}
	};
	let on_mousemove = move |ev: MouseEvent| {
		if !pan_zoom.with_untracked(PanZoom::is_panning) {
			return;
		}
		if let Some((x, y)) = local(&ev) {
			pan_zoom.update(|p| p.pointer_move(x, y));
		}
	};
	let on_release = move |_: MouseEvent| pan_zoom.update(PanZoom::release);
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let mouse: &MouseEvent = &ev;
		if let Some((x, y)) = local(mouse) {
			pan_zoom.update(|p| p.wheel(x, y, ev.delta_y() < 0.0));
		}
	};
	let navigator_style = move || {
		format!(
			"width: {:.0}px; height: {:.0}px; {}",
			frame_size.width,
			frame_size.height,
			pan_zoom.with(PanZoom::grid_style)
		)
	};
	let minimap = move || scene.with(|s| pan_zoom.with(|p| minimap_markup(s, p, MINIMAP)));

	view! {
		<div class="scene-viewport">
			<div
				node_ref=viewport_ref
				class="scene-navigator"
				style=navigator_style
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_release
				on:mouseleave=on_release
				on:wheel=on_wheel
			>
				{stage}
				<div class="minimap" inner_html=minimap></div>
				<div class="viewport-controls" on:mousedown=|ev: MouseEvent| ev.stop_propagation()>
					<button title="Zoom avant" on:click=move |_| pan_zoom.update(|p| p.step(true))>
						"+"
					</button>
					<button
						title="Zoom arrière"
						on:click=move |_| pan_zoom.update(|p| p.step(false))
					>
						"−"
					</button>
					<button
						title="Ajuster à la vue"
						on:click=move |_| pan_zoom.update(|p| p.fit(content_size.get_untracked()))
					>
						"⤢"
					</button>
				</div>
			</div>
			{panel}
		</div>
	}
	.into_any()
}

/// Full `<svg>` element holding the connector layer.
pub fn svg_markup(scene: &Scene, scope: &str) -> String {
	format!(
		r#"<svg width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" xmlns="http://www.w3.org/2000/svg">{}</svg>"#,
		scene.connectors_svg(scope),
		w = scene.size.width,
		h = scene.size.height,
	)
}

/// Inline style of a card: position, category colours, active emphasis.
pub fn card_style(card: &NodeCard) -> String {
	let r = &card.rect;
	let s = &card.style;
	let mut css = format!(
		"left: {:.1}px; top: {:.1}px; width: {:.1}px; min-height: {:.1}px;",
		r.origin.x, r.origin.y, r.size.width, r.size.height
	);
	match card.shape {
		CardShape::Column => {
			css.push_str(&format!(
				" height: {:.1}px; background: {}; border: 2px solid {};",
				r.size.height,
				s.accent,
				if card.active { &s.text } else { &s.accent }
			));
		}
		CardShape::Dot => {
			css.push_str(&format!(
				" height: {:.1}px; background: {}; box-shadow: 0 0 0 {}px {};",
				r.size.height,
				s.accent,
				if card.active { 4 } else { 0 },
				s.accent_alpha("44")
			));
		}
		CardShape::Bar => {
			css.push_str(&format!(
				" background: linear-gradient(90deg, {}, {}); border: 2px solid {};",
				s.accent_alpha(if card.active { "FF" } else { "DD" }),
				s.accent_alpha("88"),
				if card.active { &s.text } else { &s.accent }
			));
		}
		CardShape::Tile => {
			css.push_str(&format!(
				" height: {:.1}px; background: {}; border: {}px solid {};",
				r.size.height,
				s.background,
				if card.active { 3.0 } else { 1.5 },
				if card.active { s.accent.clone() } else { s.accent_alpha("B3") }
			));
		}
		CardShape::Card | CardShape::Row => {
			let (border, background, shadow) = if card.active {
				(
					s.accent.clone(),
					s.background.clone(),
					format!("0 0 0 3px {}, 0 8px 24px rgba(0,0,0,0.12)", s.accent_alpha("33")),
				)
			} else {
				(
					s.border.clone(),
					"#FFFFFF".to_string(),
					"0 2px 8px rgba(0,0,0,0.06)".to_string(),
				)
			};
			css.push_str(&format!(
				" border: 2px solid {border}; background: {background}; box-shadow: {shadow};"
			));
			if card.active {
				css.push_str(" transform: scale(1.03);");
			}
		}
	}
	// nested tiles must keep their paint order
	if card.active && card.shape != CardShape::Tile {
		css.push_str(" z-index: 10;");
	}
	css
}

fn shape_class(shape: CardShape) -> &'static str {
	match shape {
		CardShape::Card => "node-card shape-card",
		CardShape::Row => "node-card shape-row",
		CardShape::Column => "node-card shape-column",
		CardShape::Bar => "node-card shape-bar",
		CardShape::Tile => "node-card shape-tile",
		CardShape::Dot => "node-card shape-dot",
	}
}

#[component]
fn NodeCardView(
	card: NodeCard,
	on_click: Callback<NodeId>,
	#[prop(default = None)] hovered: Option<RwSignal<Option<NodeId>>>,
) -> impl IntoView {
	let style = card_style(&card);
	let class = shape_class(card.shape);
	let id = card.id.clone();
	let hover_id = card.id.clone();
	let on_hover = move |ev: MouseEvent| {
		if let Some(hovered) = hovered {
			// nested tiles: the innermost one wins
			ev.stop_propagation();
			hovered.set(Some(hover_id.clone()));
		}
	};
	let accent = format!("color: {};", card.style.accent);
	let detail_border = format!("border-top: 1px solid {};", card.style.accent_alpha("44"));
	let detail = card
		.detail
		.clone()
		.filter(|_| card.shape.inline_detail())
		.map(|d| view! { <div class="card-detail" style=detail_border>{d}</div> });

	let body = match card.shape {
		CardShape::Card => view! {
			<div class="card-kicker" style=accent.clone()>
				{format!("{} · Niveau {}", card.category_label, card.level)}
			</div>
			<div class="card-label">{card.label.clone()}</div>
			<div class="card-value" style=accent>{card.value.clone()}</div>
			{detail}
		}
		.into_any(),
		CardShape::Row => view! {
			<div
				class="row-badge"
				style=format!(
					"background: linear-gradient(135deg, {}, {});",
					card.style.accent,
					card.style.accent_alpha("BB"),
				)
			>
				{card.level}
			</div>
			<div class="row-body">
				<div class="card-kicker" style=accent.clone()>{card.category_label.clone()}</div>
				<div class="card-label">{card.label.clone()}</div>
				{detail}
			</div>
			<div class="card-value" style=accent>{card.value.clone()}</div>
		}
		.into_any(),
		CardShape::Bar => view! {
			<div class="bar-text">
				<span class="card-label">{card.label.clone()}</span>
				<span class="card-value">{card.value.clone()}</span>
			</div>
			{detail}
		}
		.into_any(),
		CardShape::Tile => {
			let size = card.rect.size;
			let value = (size.height > 55.0).then(|| {
				view! { <div class="card-value" style=accent.clone()>{card.value.clone()}</div> }
			});
			let text = (size.width > 60.0 && size.height > 40.0).then(|| {
				view! {
					<div class="card-kicker" style=accent.clone()>
						{format!("N{} · {}", card.level, card.category_label)}
					</div>
					<div class="card-label">{card.label.clone()}</div>
					{value}
				}
			});
			view! { {text} }.into_any()
		}
		CardShape::Column | CardShape::Dot => view! {
			<span class="outside-label">{format!("{} ({})", card.label, card.value)}</span>
		}
		.into_any(),
	};

	view! {
		<div
			class=class
			style=style
			on:click=move |_| on_click.run(id.clone())
			on:mouseover=on_hover
		>
			{body}
		</div>
	}
}

/// Hover card with the full label, level and value.
#[component]
fn Tooltip(card: NodeCard) -> impl IntoView {
	let r = card.rect;
	let accent = format!("color: {};", card.style.accent);
	view! {
		<div
			class="scene-tooltip"
			style=format!(
				"left: {:.1}px; top: {:.1}px; border: 2px solid {};",
				r.origin.x + 12.0,
				r.origin.y + 12.0,
				card.style.accent,
			)
		>
			<div class="card-kicker" style=accent.clone()>
				{format!("Niveau {} · {}", card.level, card.category_label)}
			</div>
			<div class="tooltip-title">{card.title}</div>
			<div class="card-value" style=accent>{card.value}</div>
		</div>
	}
}

/// Floating panel for shapes too small to hold their detail text.
#[component]
pub fn DetailPanel(card: NodeCard) -> impl IntoView {
	view! {
		<div class="detail-panel" style=format!("border: 2px solid {};", card.style.accent)>
			<div class="detail-title">{card.label}</div>
			<div class="detail-text">{card.detail}</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::Rect;
	use crate::model::StyledChain;

	fn card(shape: CardShape, active: bool) -> NodeCard {
		let chain = StyledChain::reference().unwrap();
		let entry = chain.entry(4).unwrap();
		let active_id: NodeId = "4".into();
		NodeCard::from_entry(
			&entry,
			Rect::new(10.0, 20.0, 180.0, 100.0),
			shape,
			active.then_some(&active_id),
			None,
		)
	}

	#[test]
	fn active_card_uses_accent_and_rises() {
		let css = card_style(&card(CardShape::Card, true));
		assert!(css.contains("border: 2px solid #F59E0B"));
		assert!(css.contains("background: #FEF3C7"));
		assert!(css.contains("z-index: 10"));
	}

	#[test]
	fn collapsed_card_is_white() {
		let css = card_style(&card(CardShape::Card, false));
		assert!(css.contains("background: #FFFFFF"));
		assert!(!css.contains("z-index"));
	}

	#[test]
	fn active_tile_keeps_paint_order() {
		let css = card_style(&card(CardShape::Tile, true));
		assert!(!css.contains("z-index"));
		assert!(css.contains("3px solid #F59E0B"));
	}

	#[test]
	fn svg_markup_sizes_the_layer() {
		let scene = Scene {
			size: crate::layout::Size::new(300.0, 200.0),
			..Scene::default()
		};
		assert!(svg_markup(&scene, "x").starts_with(r#"<svg width="300" height="200""#));
	}
}
