//! Markup events in document order: open tag, text, close tag.
//!
//! HTML is parsed with `scraper` (html5ever), so malformed markup is repaired
//! into a best-effort tree rather than rejected. The tree is then walked
//! depth-first and each edge becomes an event.

use ego_tree::iter::Edge;
use scraper::{Html, Node};

/// One tokenizer event. Attribute pairs keep the order the parser reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    Open {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Close {
        name: String,
    },
}

impl MarkupEvent {
    /// Shorthand for building events by hand.
    pub fn open(name: &str, attrs: &[(&str, &str)]) -> Self {
        MarkupEvent::Open {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn text(s: &str) -> Self {
        MarkupEvent::Text(s.to_string())
    }

    pub fn close(name: &str) -> Self {
        MarkupEvent::Close {
            name: name.to_string(),
        }
    }
}

/// Tokenize a full HTML document into events.
pub fn tokenize(html: &str) -> Vec<MarkupEvent> {
    let doc = Html::parse_document(html);
    let mut events = Vec::new();
    for edge in doc.tree.root().traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(el) => events.push(MarkupEvent::Open {
                    name: el.name().to_string(),
                    attrs: el
                        .attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                }),
                Node::Text(text) => events.push(MarkupEvent::Text(String::from(&**text))),
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(el) = node.value() {
                    events.push(MarkupEvent::Close {
                        name: el.name().to_string(),
                    });
                }
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_events(html: &str) -> Vec<MarkupEvent> {
        let events = tokenize(html);
        let start = events
            .iter()
            .position(|e| matches!(e, MarkupEvent::Open { name, .. } if name == "body"))
            .map(|i| i + 1)
            .unwrap_or(0);
        let end = events
            .iter()
            .rposition(|e| matches!(e, MarkupEvent::Close { name } if name == "body"))
            .unwrap_or(events.len());
        events[start..end].to_vec()
    }

    #[test]
    fn events_follow_document_order() {
        let events = body_events(r#"<div class="x"><a href="/1/">one</a></div>"#);
        assert_eq!(
            events,
            vec![
                MarkupEvent::open("div", &[("class", "x")]),
                MarkupEvent::open("a", &[("href", "/1/")]),
                MarkupEvent::text("one"),
                MarkupEvent::close("a"),
                MarkupEvent::close("div"),
            ]
        );
    }

    #[test]
    fn unclosed_tags_are_closed_best_effort() {
        let events = body_events("<div><a href=\"/2/\">two</div>");
        let opens = events
            .iter()
            .filter(|e| matches!(e, MarkupEvent::Open { .. }))
            .count();
        let closes = events
            .iter()
            .filter(|e| matches!(e, MarkupEvent::Close { .. }))
            .count();
        assert_eq!(opens, 2);
        assert_eq!(opens, closes);
        assert!(events.contains(&MarkupEvent::text("two")));
    }

    #[test]
    fn comments_are_dropped() {
        let events = body_events("<p><!-- hidden -->shown</p>");
        assert_eq!(
            events,
            vec![
                MarkupEvent::open("p", &[]),
                MarkupEvent::text("shown"),
                MarkupEvent::close("p"),
            ]
        );
    }
}
