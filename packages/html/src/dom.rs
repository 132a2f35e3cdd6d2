//! Lightweight DOM element tree and HTML string renderer

/// A DOM subtree node
#[derive(Debug, Clone, PartialEq)]
pub enum DomNode {
    Element(DomElement),
    Text(String),
}

/// One DOM element; attributes keep insertion order so rendered output is
/// deterministic
#[derive(Debug, Clone, PartialEq)]
pub struct DomElement {
    pub tag: String,
    attributes: Vec<(String, String)>,
    pub children: Vec<DomNode>,
}

impl DomElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(DomNode::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: DomElement) -> Self {
        self.children.push(DomNode::Element(child));
        self
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value.into(),
            None => self.attributes.push((name, value.into())),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Concatenated text of the subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &DomElement, out: &mut String) {
    for child in &element.children {
        match child {
            DomNode::Text(text) => out.push_str(text),
            DomNode::Element(inner) => collect_text(inner, out),
        }
    }
}

/// Options for HTML rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Pretty print with one element per line
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
        }
    }
}

// Tags rendered without a closing pair
const VOID_TAGS: &[&str] = &["img", "br", "hr", "input", "source"];

struct Context {
    options: RenderOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: RenderOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn open_line(&mut self) {
        if self.options.pretty {
            let indent = self.options.indent.clone();
            for _ in 0..self.depth {
                self.add(&indent);
            }
        }
    }

    fn end_line(&mut self) {
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Render a DOM subtree to an HTML string
pub fn render_html(element: &DomElement, options: RenderOptions) -> String {
    let mut ctx = Context::new(options);
    render_element(element, &mut ctx);
    ctx.get_output()
}

fn render_element(element: &DomElement, ctx: &mut Context) {
    ctx.open_line();
    ctx.add("<");
    ctx.add(&element.tag);
    for (name, value) in &element.attributes {
        ctx.add(" ");
        ctx.add(name);
        ctx.add("=\"");
        ctx.add(&escape_attribute(value));
        ctx.add("\"");
    }

    if VOID_TAGS.contains(&element.tag.as_str()) {
        ctx.add(" />");
        ctx.end_line();
        return;
    }
    ctx.add(">");

    let only_text = element
        .children
        .iter()
        .all(|child| matches!(child, DomNode::Text(_)));

    if only_text {
        for child in &element.children {
            if let DomNode::Text(text) = child {
                ctx.add(&escape_text(text));
            }
        }
    } else {
        ctx.end_line();
        ctx.depth += 1;
        for child in &element.children {
            match child {
                DomNode::Element(inner) => render_element(inner, ctx),
                DomNode::Text(text) => {
                    ctx.open_line();
                    ctx.add(&escape_text(text));
                    ctx.end_line();
                }
            }
        }
        ctx.depth -= 1;
        ctx.open_line();
    }

    ctx.add("</");
    ctx.add(&element.tag);
    ctx.add(">");
    ctx.end_line();
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_element_with_attributes() {
        let el = DomElement::new("div")
            .with_attr("data-file-id", "abc-123")
            .with_attr("data-width", "640");

        assert_eq!(
            render_html(&el, RenderOptions::default()),
            r#"<div data-file-id="abc-123" data-width="640"></div>"#
        );
    }

    #[test]
    fn test_render_escapes_attribute_json() {
        let el = DomElement::new("div").with_attr("data-payload", r#"{"a":"<b>"}"#);
        assert_eq!(
            render_html(&el, RenderOptions::default()),
            r#"<div data-payload="{&quot;a&quot;:&quot;&lt;b&gt;&quot;}"></div>"#
        );
    }

    #[test]
    fn test_render_void_tag() {
        let el = DomElement::new("img").with_attr("src", "a.png");
        assert_eq!(
            render_html(&el, RenderOptions::default()),
            r#"<img src="a.png" />"#
        );
    }

    #[test]
    fn test_text_content_and_escaping() {
        let el = DomElement::new("a")
            .with_attr("href", "f.pdf")
            .with_text("1 < 2");

        assert_eq!(el.text_content(), "1 < 2");
        assert_eq!(
            render_html(&el, RenderOptions::default()),
            r#"<a href="f.pdf">1 &lt; 2</a>"#
        );
    }

    #[test]
    fn test_set_attr_overwrites() {
        let mut el = DomElement::new("div");
        el.set_attr("data-x", "1");
        el.set_attr("data-x", "2");
        assert_eq!(el.attr("data-x"), Some("2"));
        assert_eq!(el.attributes().len(), 1);
    }
}
