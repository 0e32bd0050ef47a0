use leptos::prelude::*;
use leptos_router::components::A;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Page introuvable"</h1>
			<p>
				<A href="/">"Retour au tableau de bord"</A>
			</p>
		</div>
	}
}
