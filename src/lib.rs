//! Root cause analysis dashboard: one causal chain, many interchangeable layouts.
//!
//! Leptos client-side app wiring and routes live here; the model, the layout
//! arithmetic and the controller are plain Rust and usable without a browser.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod components;
pub mod controller;
pub mod layout;
pub mod model;
mod pages;

// Top-Level pages
use crate::pages::home::{Extended, Home};
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders both dashboard rosters and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="fr" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Root Cause Analysis" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/extended") view=Extended />
			</Routes>
		</Router>
	}
}
