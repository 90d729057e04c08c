//! Element tree and HTML serialization.

use std::fmt::Write;

use crate::Attrs;

/// The ability of a tree node to serialize itself to markup.
pub trait Render {
    /// Append this node's markup to `out`.
    fn render_into(&self, out: &mut String);

    /// Render this node to a fresh string.
    fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }
}

/// Render a node to an HTML string.
///
/// Total and deterministic: the same value always serializes to the same
/// string, with no I/O and no dependence on external state.
pub fn render<T: Render + ?Sized>(node: &T) -> String {
    node.render()
}

/// Tag kind for plain container elements.
///
/// Containers all render identically (opening tag, attributes, children
/// in order, closing tag); only the tag name differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Div,
    Header,
    Footer,
    Main,
    Section,
    Article,
    Nav,
    Blockquote,
}

impl ContainerKind {
    /// The HTML tag name.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Header => "header",
            Self::Footer => "footer",
            Self::Main => "main",
            Self::Section => "section",
            Self::Article => "article",
            Self::Nav => "nav",
            Self::Blockquote => "blockquote",
        }
    }
}

/// Heading level, h1 through h6.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// The HTML tag name.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
        }
    }
}

/// An option inside a [`Element::Select`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectOption {
    pub attrs: Attrs,
    pub value: String,
    pub text: String,
    pub selected: bool,
}

/// A node in the page tree.
///
/// Each variant owns its children exclusively; trees are acyclic by
/// construction. A variant's serialization depends only on its own
/// fields, never on siblings or ancestors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Element {
    /// Plain container: `<div>`, `<header>`, `<section>`, ...
    Container {
        kind: ContainerKind,
        attrs: Attrs,
        children: Vec<Element>,
    },
    /// Heading, `<h1>` through `<h6>`.
    Heading {
        level: HeadingLevel,
        attrs: Attrs,
        text: String,
    },
    Paragraph {
        attrs: Attrs,
        text: String,
    },
    Anchor {
        attrs: Attrs,
        href: String,
        text: String,
    },
    /// Button with an optional click-handler expression. A non-empty
    /// handler is injected as `onclick` at render time.
    Button {
        attrs: Attrs,
        text: String,
        on_click: Option<String>,
    },
    Form {
        attrs: Attrs,
        method: String,
        action: String,
        children: Vec<Element>,
    },
    Input {
        attrs: Attrs,
        input_type: String,
        name: String,
        value: String,
        placeholder: String,
        checked: bool,
        disabled: bool,
    },
    Textarea {
        attrs: Attrs,
        name: String,
        rows: u32,
        cols: u32,
        text: String,
    },
    Select {
        attrs: Attrs,
        name: String,
        options: Vec<SelectOption>,
    },
    Image {
        attrs: Attrs,
        src: String,
        alt: String,
    },
    Audio {
        attrs: Attrs,
        src: Option<String>,
        controls: bool,
    },
    Video {
        attrs: Attrs,
        src: Option<String>,
        controls: bool,
    },
    Canvas {
        attrs: Attrs,
        width: u32,
        height: u32,
        text: String,
    },
    Iframe {
        attrs: Attrs,
        src: String,
        width: u32,
        height: u32,
    },
    /// External (`src`) or inline (`code`) script.
    Script {
        attrs: Attrs,
        src: Option<String>,
        code: String,
    },
    Style {
        attrs: Attrs,
        code: String,
    },
}

impl Element {
    /// Container constructor with default attributes.
    #[must_use]
    pub fn container(kind: ContainerKind, children: Vec<Element>) -> Self {
        Self::Container {
            kind,
            attrs: Attrs::new(),
            children,
        }
    }

    #[must_use]
    pub fn div(children: Vec<Element>) -> Self {
        Self::container(ContainerKind::Div, children)
    }

    #[must_use]
    pub fn header(children: Vec<Element>) -> Self {
        Self::container(ContainerKind::Header, children)
    }

    #[must_use]
    pub fn footer(children: Vec<Element>) -> Self {
        Self::container(ContainerKind::Footer, children)
    }

    #[must_use]
    pub fn main(children: Vec<Element>) -> Self {
        Self::container(ContainerKind::Main, children)
    }

    #[must_use]
    pub fn section(children: Vec<Element>) -> Self {
        Self::container(ContainerKind::Section, children)
    }

    #[must_use]
    pub fn article(children: Vec<Element>) -> Self {
        Self::container(ContainerKind::Article, children)
    }

    #[must_use]
    pub fn nav(children: Vec<Element>) -> Self {
        Self::container(ContainerKind::Nav, children)
    }

    /// Heading constructor with default attributes.
    #[must_use]
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            attrs: Attrs::new(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn h1(text: impl Into<String>) -> Self {
        Self::heading(HeadingLevel::H1, text)
    }

    #[must_use]
    pub fn h2(text: impl Into<String>) -> Self {
        Self::heading(HeadingLevel::H2, text)
    }

    #[must_use]
    pub fn h3(text: impl Into<String>) -> Self {
        Self::heading(HeadingLevel::H3, text)
    }

    #[must_use]
    pub fn p(text: impl Into<String>) -> Self {
        Self::Paragraph {
            attrs: Attrs::new(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn a(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Anchor {
            attrs: Attrs::new(),
            href: href.into(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn button(text: impl Into<String>, on_click: Option<String>) -> Self {
        Self::Button {
            attrs: Attrs::new(),
            text: text.into(),
            on_click,
        }
    }

    /// External script element.
    #[must_use]
    pub fn script_src(src: impl Into<String>) -> Self {
        Self::Script {
            attrs: Attrs::new(),
            src: Some(src.into()),
            code: String::new(),
        }
    }

    /// Replace this element's presentation attributes.
    #[must_use]
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        *self.attrs_mut() = attrs;
        self
    }

    /// Mutable access to this element's presentation attributes.
    pub fn attrs_mut(&mut self) -> &mut Attrs {
        match self {
            Self::Container { attrs, .. }
            | Self::Heading { attrs, .. }
            | Self::Paragraph { attrs, .. }
            | Self::Anchor { attrs, .. }
            | Self::Button { attrs, .. }
            | Self::Form { attrs, .. }
            | Self::Input { attrs, .. }
            | Self::Textarea { attrs, .. }
            | Self::Select { attrs, .. }
            | Self::Image { attrs, .. }
            | Self::Audio { attrs, .. }
            | Self::Video { attrs, .. }
            | Self::Canvas { attrs, .. }
            | Self::Iframe { attrs, .. }
            | Self::Script { attrs, .. }
            | Self::Style { attrs, .. } => attrs,
        }
    }
}

impl Render for Element {
    #[allow(clippy::too_many_lines)]
    fn render_into(&self, out: &mut String) {
        match self {
            Self::Container {
                kind,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(kind.tag());
                attrs.render_into(out);
                out.push('>');
                for child in children {
                    child.render_into(out);
                }
                let _ = write!(out, "</{}>", kind.tag());
            }
            Self::Heading { level, attrs, text } => {
                out.push('<');
                out.push_str(level.tag());
                attrs.render_into(out);
                let _ = write!(out, ">{text}</{}>", level.tag());
            }
            Self::Paragraph { attrs, text } => {
                out.push_str("<p");
                attrs.render_into(out);
                let _ = write!(out, ">{text}</p>");
            }
            Self::Anchor { attrs, href, text } => {
                let _ = write!(out, r#"<a href="{href}""#);
                attrs.render_into(out);
                let _ = write!(out, ">{text}</a>");
            }
            Self::Button {
                attrs,
                text,
                on_click,
            } => {
                out.push_str("<button");
                // A non-empty handler is injected into a per-render copy
                // of the event map; the element itself is never mutated.
                match on_click.as_deref() {
                    Some(handler) if !handler.is_empty() => {
                        let mut effective = attrs.clone();
                        effective.events.insert("onclick".to_owned(), handler.to_owned());
                        effective.render_into(out);
                    }
                    _ => attrs.render_into(out),
                }
                let _ = write!(out, ">{text}</button>");
            }
            Self::Form {
                attrs,
                method,
                action,
                children,
            } => {
                let _ = write!(out, r#"<form method="{method}" action="{action}""#);
                attrs.render_into(out);
                out.push('>');
                for child in children {
                    child.render_into(out);
                }
                out.push_str("</form>");
            }
            Self::Input {
                attrs,
                input_type,
                name,
                value,
                placeholder,
                checked,
                disabled,
            } => {
                let _ = write!(
                    out,
                    r#"<input type="{input_type}" name="{name}" value="{value}" placeholder="{placeholder}""#
                );
                attrs.render_into(out);
                if *checked {
                    out.push_str(" checked");
                }
                if *disabled {
                    out.push_str(" disabled");
                }
                out.push('>');
            }
            Self::Textarea {
                attrs,
                name,
                rows,
                cols,
                text,
            } => {
                let _ = write!(out, r#"<textarea name="{name}" rows="{rows}" cols="{cols}""#);
                attrs.render_into(out);
                let _ = write!(out, ">{text}</textarea>");
            }
            Self::Select {
                attrs,
                name,
                options,
            } => {
                let _ = write!(out, r#"<select name="{name}""#);
                attrs.render_into(out);
                out.push('>');
                for option in options {
                    option.render_into(out);
                }
                out.push_str("</select>");
            }
            Self::Image { attrs, src, alt } => {
                let _ = write!(out, r#"<img src="{src}" alt="{alt}""#);
                attrs.render_into(out);
                out.push('>');
            }
            Self::Audio {
                attrs,
                src,
                controls,
            } => {
                render_media(out, "audio", attrs, src.as_deref(), *controls);
            }
            Self::Video {
                attrs,
                src,
                controls,
            } => {
                render_media(out, "video", attrs, src.as_deref(), *controls);
            }
            Self::Canvas {
                attrs,
                width,
                height,
                text,
            } => {
                let _ = write!(out, r#"<canvas width="{width}" height="{height}""#);
                attrs.render_into(out);
                let _ = write!(out, ">{text}</canvas>");
            }
            Self::Iframe {
                attrs,
                src,
                width,
                height,
            } => {
                let _ = write!(
                    out,
                    r#"<iframe src="{src}" width="{width}" height="{height}""#
                );
                attrs.render_into(out);
                out.push_str("></iframe>");
            }
            Self::Script { attrs, src, code } => match src.as_deref() {
                Some(src) if !src.is_empty() => {
                    let _ = write!(out, r#"<script src="{src}""#);
                    attrs.render_into(out);
                    out.push_str("></script>");
                }
                _ => {
                    out.push_str("<script");
                    attrs.render_into(out);
                    let _ = write!(out, ">{code}</script>");
                }
            },
            Self::Style { attrs, code } => {
                out.push_str("<style");
                attrs.render_into(out);
                let _ = write!(out, ">{code}</style>");
            }
        }
    }
}

/// Shared template for `<audio>`/`<video>`: controls flag, attributes,
/// optional src, then the tag name as fallback text.
fn render_media(out: &mut String, tag: &str, attrs: &Attrs, src: Option<&str>, controls: bool) {
    let _ = write!(out, "<{tag}");
    if controls {
        out.push_str(" controls");
    }
    attrs.render_into(out);
    if let Some(src) = src
        && !src.is_empty()
    {
        let _ = write!(out, r#" src="{src}""#);
    }
    let _ = write!(out, ">{tag}</{tag}>");
}

impl Render for SelectOption {
    fn render_into(&self, out: &mut String) {
        let _ = write!(out, r#"<option value="{}""#, self.value);
        if self.selected {
            out.push_str(" selected");
        }
        self.attrs.render_into(out);
        let _ = write!(out, ">{}</option>", self.text);
    }
}
