//! Composable HTML element tree.
//!
//! Pages are built as trees of [`Element`] values and serialized to HTML
//! with [`render`]. Rendering is synchronous, deterministic and total:
//! any combination of field values produces output, the same value always
//! produces the same string, and no I/O or shared state is involved.
//!
//! Attribute and text values are emitted verbatim; no HTML escaping is
//! performed. Callers are expected to control the values they render.
//!
//! # Example
//!
//! ```
//! use weft_markup::{Attrs, Element, render};
//!
//! let page = Element::div(vec![
//!     Element::h1("Hello"),
//!     Element::p("World"),
//! ])
//! .with_attrs(Attrs::new().class("greeting"));
//!
//! assert_eq!(
//!     render(&page),
//!     r#"<div class="greeting"><h1>Hello</h1><p>World</p></div>"#
//! );
//! ```

mod attrs;
mod element;

pub use attrs::Attrs;
pub use element::{ContainerKind, Element, HeadingLevel, Render, SelectOption, render};
