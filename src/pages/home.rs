use std::sync::Arc;

use leptos::prelude::*;

use crate::components::StrategyRegistry;
use crate::pages::dashboard::Dashboard;

/// Default Home Page: the six classic layouts.
#[component]
pub fn Home() -> impl IntoView {
	view! { <Dashboard registry=Arc::new(StrategyRegistry::standard()) /> }
}

/// Alternative roster: diagnostic diagrams and the force network.
#[component]
pub fn Extended() -> impl IntoView {
	view! { <Dashboard registry=Arc::new(StrategyRegistry::extended()) /> }
}
