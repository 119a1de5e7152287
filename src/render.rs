//! # ADF to HTML
//!
//! A recursive transducer from an ADF tree into an HTML fragment. Rendering
//! is total: unknown node types are rendered as their children without a
//! wrapping tag and unknown marks leave the text unchanged. Literal text is
//! not escaped, the upstream content is assumed to be trusted.

use crate::model::{Mark, MarkType, Node, NodeType};

/// Heading level used when `attrs.level` is missing
pub const DEFAULT_HEADING_LEVEL: &str = "3";

/// Render an optional node to HTML (`None` renders as the empty string)
pub fn render(node: Option<&Node>) -> String {
    node.map(Node::to_html).unwrap_or_default()
}

impl Node {
    /// Render this node and all its descendants to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        // The root wrapper contributes no markup of its own
        if self.is_root() {
            write_children(self.children(), out);
            return;
        }

        let kind = match &self.kind {
            Some(kind) => kind,
            None => return write_children(self.children(), out),
        };

        match kind {
            NodeType::Paragraph => self.write_wrapped("p", out),
            NodeType::Heading => {
                let level = self.attrs.scalar("level");
                let level = level.as_deref().unwrap_or(DEFAULT_HEADING_LEVEL);
                self.write_wrapped(&format!("h{}", level), out)
            }
            NodeType::Text => {
                let text = self.text.as_deref().unwrap_or_default();
                out.push_str(&apply_marks(text, &self.marks));
            }
            NodeType::BulletList => self.write_wrapped("ul", out),
            NodeType::OrderedList => self.write_wrapped("ol", out),
            NodeType::ListItem => self.write_wrapped("li", out),
            NodeType::CodeBlock => {
                out.push_str("<pre><code>");
                // Only direct text children, marks are ignored
                for child in self.children() {
                    if child.is_type(&NodeType::Text) {
                        out.push_str(child.text.as_deref().unwrap_or_default());
                    }
                }
                out.push_str("</code></pre>");
            }
            NodeType::Blockquote => self.write_wrapped("blockquote", out),
            NodeType::Rule => out.push_str("<hr/>"),
            NodeType::HardBreak => out.push_str("<br/>"),
            NodeType::Doc | NodeType::Other(_) => write_children(self.children(), out),
        }
    }

    fn write_wrapped(&self, tag: &str, out: &mut String) {
        out.push('<');
        out.push_str(tag);
        out.push('>');
        write_children(self.children(), out);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn write_children(children: &[Node], out: &mut String) {
    for child in children {
        child.write_html(out);
    }
}

/// Apply the marks in order, each one wrapping the result of the previous
pub fn apply_marks(text: &str, marks: &[Mark]) -> String {
    marks
        .iter()
        .fold(text.to_owned(), |inner, mark| mark.wrap(inner))
}

impl Mark {
    /// Wrap already rendered inline HTML in the markup for this mark
    pub fn wrap(&self, inner: String) -> String {
        match &self.kind {
            MarkType::Strong => format!("<strong>{}</strong>", inner),
            MarkType::Em => format!("<em>{}</em>", inner),
            MarkType::Code => format!("<code>{}</code>", inner),
            MarkType::Strike => format!("<s>{}</s>", inner),
            MarkType::Underline => format!("<u>{}</u>", inner),
            MarkType::Link => {
                let href = self.attrs.scalar("href");
                let href = href.as_deref().unwrap_or("#");
                format!(r#"<a href="{}" target="_blank">{}</a>"#, href, inner)
            }
            MarkType::TextColor => {
                let color = self.attrs.scalar("color");
                let color = color.as_deref().unwrap_or("inherit");
                format!(r#"<span style="color: {}">{}</span>"#, color, inner)
            }
            MarkType::Other(_) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_marks, render};
    use crate::model::{Attrs, Mark, MarkType, Node, NodeType};
    use serde_json::{json, Value};

    fn html(value: Value) -> String {
        let node: Node = serde_json::from_value(value).unwrap();
        node.to_html()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(None), "");
        assert_eq!(html(json!({})), "");
    }

    #[test]
    fn test_paragraph_with_marks() {
        let out = html(json!({
            "type": "paragraph",
            "content": [
                { "type": "text", "text": "Hello", "marks": [{ "type": "strong" }] },
                { "type": "text", "text": " world" }
            ]
        }));
        assert_eq!(out, "<p><strong>Hello</strong> world</p>");
    }

    #[test]
    fn test_mark_order() {
        let marks = vec![Mark::from(MarkType::Strong), Mark::from(MarkType::Em)];
        assert_eq!(apply_marks("x", &marks), "<em><strong>x</strong></em>");

        let out = html(json!({
            "type": "text",
            "text": "docs",
            "marks": [
                { "type": "strong" },
                { "type": "link", "attrs": { "href": "https://example.com" } }
            ]
        }));
        assert_eq!(
            out,
            r#"<a href="https://example.com" target="_blank"><strong>docs</strong></a>"#
        );
    }

    #[test]
    fn test_all_marks() {
        let out = html(json!({
            "type": "text",
            "text": "t",
            "marks": [
                { "type": "code" },
                { "type": "strike" },
                { "type": "underline" },
                { "type": "textColor", "attrs": { "color": "#ff5630" } }
            ]
        }));
        assert_eq!(
            out,
            r#"<span style="color: #ff5630"><u><s><code>t</code></s></u></span>"#
        );
    }

    #[test]
    fn test_mark_defaults() {
        let out = html(json!({
            "type": "text",
            "text": "a",
            "marks": [{ "type": "link" }, { "type": "textColor" }]
        }));
        assert_eq!(
            out,
            r##"<span style="color: inherit"><a href="#" target="_blank">a</a></span>"##
        );
    }

    #[test]
    fn test_unknown_mark_is_noop() {
        let out = html(json!({
            "type": "text",
            "text": "x",
            "marks": [{ "type": "subsup", "attrs": { "type": "sub" } }, { "type": "em" }]
        }));
        assert_eq!(out, "<em>x</em>");
    }

    #[test]
    fn test_root_unwrapping() {
        let a = json!({ "type": "paragraph", "content": [{ "type": "text", "text": "A" }] });
        let b = json!({ "type": "rule" });
        let root = html(json!({ "type": "doc", "version": 1, "content": [a.clone(), b.clone()] }));
        assert_eq!(root, html(a) + &html(b));
        assert_eq!(root, "<p>A</p><hr/>");

        // The version wins over the type
        let out = html(json!({
            "type": "paragraph",
            "version": 1,
            "content": [{ "type": "text", "text": "x" }]
        }));
        assert_eq!(out, "x");

        // A null version still marks the root
        let out = html(json!({
            "type": "paragraph",
            "version": null,
            "content": [{ "type": "text", "text": "x" }]
        }));
        assert_eq!(out, "x");
    }

    #[test]
    fn test_heading_levels() {
        let out = html(json!({ "type": "heading", "content": [{ "type": "text", "text": "t" }] }));
        assert_eq!(out, "<h3>t</h3>");

        let out = html(json!({
            "type": "heading",
            "attrs": { "level": 2 },
            "content": [{ "type": "text", "text": "t" }]
        }));
        assert_eq!(out, "<h2>t</h2>");

        let out = html(json!({
            "type": "heading",
            "attrs": { "level": "2" },
            "content": [{ "type": "text", "text": "t" }]
        }));
        assert_eq!(out, "<h2>t</h2>");

        let out = html(json!({
            "type": "heading",
            "attrs": { "level": null },
            "content": [{ "type": "text", "text": "t" }]
        }));
        assert_eq!(out, "<h3>t</h3>");
    }

    #[test]
    fn test_lists() {
        let out = html(json!({
            "type": "bulletList",
            "content": [
                { "type": "listItem", "content": [
                    { "type": "paragraph", "content": [{ "type": "text", "text": "one" }] }
                ]},
                { "type": "listItem", "content": [
                    { "type": "orderedList", "content": [
                        { "type": "listItem", "content": [{ "type": "text", "text": "nested" }] }
                    ]}
                ]}
            ]
        }));
        assert_eq!(
            out,
            "<ul><li><p>one</p></li><li><ol><li>nested</li></ol></li></ul>"
        );
    }

    #[test]
    fn test_code_block_direct_text_only() {
        let out = html(json!({
            "type": "codeBlock",
            "attrs": { "language": "rust" },
            "content": [
                { "type": "text", "text": "fn main() {", "marks": [{ "type": "strong" }] },
                { "type": "paragraph", "content": [{ "type": "text", "text": "skipped" }] },
                { "type": "hardBreak" },
                { "type": "text", "text": "}" }
            ]
        }));
        assert_eq!(out, "<pre><code>fn main() {}</code></pre>");
    }

    #[test]
    fn test_leaf_nodes_ignore_content() {
        let child = json!([{ "type": "text", "text": "ignored" }]);
        assert_eq!(html(json!({ "type": "rule", "content": child.clone() })), "<hr/>");
        assert_eq!(html(json!({ "type": "hardBreak", "content": child })), "<br/>");
    }

    #[test]
    fn test_blockquote() {
        let out = html(json!({
            "type": "blockquote",
            "content": [{ "type": "paragraph", "content": [
                { "type": "text", "text": "quote" },
                { "type": "hardBreak" },
                { "type": "text", "text": "d" }
            ]}]
        }));
        assert_eq!(out, "<blockquote><p>quote<br/>d</p></blockquote>");
    }

    #[test]
    fn test_unknown_node_passthrough() {
        let x = json!({ "type": "paragraph", "content": [{ "type": "text", "text": "X" }] });
        let out = html(json!({ "type": "panel", "content": [x.clone()] }));
        assert_eq!(out, html(x));

        // Missing type, and a `doc` without version, are transparent too
        let out = html(json!({ "content": [{ "type": "text", "text": "y" }] }));
        assert_eq!(out, "y");
        let out = html(json!({ "type": "doc", "content": [{ "type": "rule" }] }));
        assert_eq!(out, "<hr/>");
    }

    #[test]
    fn test_no_escaping() {
        let node = Node::text("<b>&</b>");
        assert_eq!(node.to_html(), "<b>&</b>");
    }

    #[test]
    fn test_deep_nesting() {
        let mut node = Node::text("leaf");
        for _ in 0..200 {
            node = Node::new(NodeType::Blockquote, vec![node]);
        }
        let out = node.to_html();
        assert!(out.starts_with("<blockquote><blockquote>"));
        assert!(out.contains("leaf"));
        assert_eq!(out.matches("</blockquote>").count(), 200);
    }

    #[test]
    fn test_built_tree() {
        let doc = Node::doc(vec![
            Node::new(NodeType::Heading, vec![Node::text("Title")])
                .with_attrs(Attrs::default().with("level", 1)),
            Node::new(
                NodeType::Paragraph,
                vec![Node::text("bold").with_marks(vec![Mark::from(MarkType::Strong)])],
            ),
        ]);
        assert_eq!(
            render(Some(&doc)),
            "<h1>Title</h1><p><strong>bold</strong></p>"
        );
    }
}
