//! Browser checks, run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use leptos::prelude::*;
use rca_dashboard::components::views::{FlowchartStrategy, SankeyStrategy, WaterfallStrategy};
use rca_dashboard::components::{LayoutStrategy, SceneOptions, SceneView};
use rca_dashboard::layout::Size;
use rca_dashboard::model::StyledChain;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn body_html() -> String {
	document().body().map(|b| b.inner_html()).unwrap_or_default()
}

#[wasm_bindgen_test]
fn active_card_renders_its_detail_inline() {
	let chain = StyledChain::reference().unwrap();
	let scene = WaterfallStrategy::default().arrange(&chain, Some(&"2".into()));
	let _handle = leptos::mount::mount_to_body(move || {
		view! { <SceneView scene=Signal::stored(scene) on_node_click=Callback::new(|_| {}) /> }
	});
	let html = body_html();
	assert!(html.contains("Augmentation prix d'achat MP"));
	assert!(!html.contains("Réduction capacité fournisseur principal"));
	assert!(html.contains("<svg"));
}

#[wasm_bindgen_test]
fn column_detail_goes_to_the_panel() {
	let chain = StyledChain::reference().unwrap();
	let scene = SankeyStrategy::default().arrange(&chain, Some(&"5".into()));
	let _handle = leptos::mount::mount_to_body(move || {
		view! { <SceneView scene=Signal::stored(scene) on_node_click=Callback::new(|_| {}) /> }
	});
	assert!(body_html().contains("detail-panel"));
}

#[wasm_bindgen_test]
fn navigable_scenes_get_a_minimap_and_controls() {
	let chain = StyledChain::reference().unwrap();
	let scene = FlowchartStrategy::vertical().arrange(&chain, None);
	let options = SceneOptions::navigable(Size::new(640.0, 400.0));
	let _handle = leptos::mount::mount_to_body(move || {
		view! {
			<SceneView
				scene=Signal::stored(scene)
				on_node_click=Callback::new(|_| {})
				options=options
			/>
		}
	});
	let html = body_html();
	assert!(html.contains("scene-navigator"));
	assert!(html.contains("minimap-view"));
	assert!(html.contains("viewport-controls"));
}
