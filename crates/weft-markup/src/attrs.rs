//! Shared presentation attributes.

use std::fmt::Write;

use indexmap::IndexMap;

/// Presentation attributes shared by every element.
///
/// Serialization order is fixed: `id`, `class`, `style`, then custom
/// attributes and event handlers in insertion order. Absent fields
/// contribute no output at all (an element without an id never renders
/// `id=""`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attrs {
    /// `id` attribute.
    pub id: Option<String>,
    /// `class` attribute (a single class token or a space-joined list).
    pub class: Option<String>,
    /// Inline `style` attribute.
    pub style: Option<String>,
    /// Custom attributes, keyed by attribute name. Keys are unique and
    /// keep insertion order for reproducible output.
    pub custom: IndexMap<String, String>,
    /// Event handlers (`onclick`, `oninput`, ...) mapped to handler
    /// expressions. Same ordering guarantees as `custom`.
    pub events: IndexMap<String, String>,
}

impl Attrs {
    /// Create an empty attribute bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the `class` attribute.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set the inline `style` attribute.
    #[must_use]
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Add a custom attribute. Re-adding a name replaces its value.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(name.into(), value.into());
        self
    }

    /// Add an event handler. Re-adding an event replaces its handler.
    #[must_use]
    pub fn on(mut self, event: impl Into<String>, handler: impl Into<String>) -> Self {
        self.events.insert(event.into(), handler.into());
        self
    }

    /// Serialize into `out` as ` name="value"` fragments.
    ///
    /// Pure and infallible; values pass through verbatim (no escaping).
    pub(crate) fn render_into(&self, out: &mut String) {
        if let Some(id) = &self.id {
            write_fragment(out, "id", id);
        }
        if let Some(class) = &self.class {
            write_fragment(out, "class", class);
        }
        if let Some(style) = &self.style {
            write_fragment(out, "style", style);
        }
        for (name, value) in &self.custom {
            write_fragment(out, name, value);
        }
        for (event, handler) in &self.events {
            write_fragment(out, event, handler);
        }
    }
}

/// Write a single ` name="value"` fragment.
fn write_fragment(out: &mut String, name: &str, value: &str) {
    // Writing to a String cannot fail.
    let _ = write!(out, r#" {name}="{value}""#);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rendered(attrs: &Attrs) -> String {
        let mut out = String::new();
        attrs.render_into(&mut out);
        out
    }

    #[test]
    fn test_empty_attrs_render_nothing() {
        assert_eq!(rendered(&Attrs::new()), "");
    }

    #[test]
    fn test_absent_id_emits_no_fragment() {
        let attrs = Attrs::new().class("x");
        let out = rendered(&attrs);
        assert!(!out.contains("id="));
        assert_eq!(out, r#" class="x""#);
    }

    #[test]
    fn test_field_order_is_fixed() {
        let attrs = Attrs::new()
            .on("onclick", "go()")
            .attr("data-k", "v")
            .style("color: red")
            .class("box")
            .id("main");

        assert_eq!(
            rendered(&attrs),
            r#" id="main" class="box" style="color: red" data-k="v" onclick="go()""#
        );
    }

    #[test]
    fn test_custom_attrs_keep_insertion_order() {
        let attrs = Attrs::new()
            .attr("data-b", "2")
            .attr("data-a", "1")
            .attr("data-c", "3");

        assert_eq!(rendered(&attrs), r#" data-b="2" data-a="1" data-c="3""#);
    }

    #[test]
    fn test_duplicate_custom_attr_replaces_value_in_place() {
        let attrs = Attrs::new()
            .attr("data-a", "1")
            .attr("data-b", "2")
            .attr("data-a", "3");

        assert_eq!(rendered(&attrs), r#" data-a="3" data-b="2""#);
    }

    #[test]
    fn test_values_pass_through_verbatim() {
        // Escaping is the caller's responsibility.
        let attrs = Attrs::new().attr("data-raw", r#"a"b<c"#);
        assert_eq!(rendered(&attrs), r#" data-raw="a"b<c""#);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let attrs = Attrs::new().id("a").on("onclick", "f()").attr("k", "v");
        assert_eq!(rendered(&attrs), rendered(&attrs));
    }
}
