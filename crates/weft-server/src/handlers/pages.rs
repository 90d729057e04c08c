use std::sync::Arc;

use axum::extract::State;
use axum::http::Uri;
use axum::response::Html;

use weft_markup::{Attrs, Element, Render};

use crate::state::AppState;

/// Catch-all page handler.
///
/// Every path that is not a static asset or a live reload endpoint is
/// answered with the rendered page tree for that path.
pub async fn get_page(State(state): State<Arc<AppState>>, uri: Uri) -> Html<String> {
    let path = uri.path();
    if state.verbose {
        tracing::debug!(path, "Rendering page");
    }
    Html(build_page(path, state.live_reload_enabled()).render())
}

/// Build the page tree for a request path.
fn build_page(path: &str, live_reload: bool) -> Element {
    let mut children = vec![
        Element::header(vec![
            Element::h1("Welcome to Weft").with_attrs(Attrs::new().class("site-title")),
            Element::p("A tiny server-rendered page, built from an element tree."),
        ]),
        Element::main(vec![Element::section(vec![Element::article(vec![
            Element::p(format!("Requested path: {path}")),
        ])])]),
        Element::footer(vec![Element::p("Served by weft")]),
    ];

    if live_reload {
        children.push(Element::script_src("/__weft/reload.js"));
    }

    Element::div(children).with_attrs(Attrs::new().class("page"))
}
