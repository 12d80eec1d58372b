//! What If? archive parser.
//!
//! The archive page has no structured API. Each article sits in a container
//! (by default `<div class="archive-entry">`) holding two anchors: the first
//! links to the article and carries its number in the href, the second wraps
//! the visible title. The parser is a single pass over [MarkupEvent]s with no
//! lookahead; an entry whose number cannot be read is dropped, not reported.

use crate::api::Endpoints;
use crate::markup::{tokenize, MarkupEvent};
use crate::model::{WhatIf, WhatIfArchive};

const ANCHOR: &str = "a";

/// Position inside the current container, by anchors opened so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    BeforeFirstAnchor,
    AfterFirstAnchor,
    /// Second anchor open: text here is the title.
    InTitleAnchor,
    /// A third or later anchor opened before the title anchor closed.
    PastTitle,
}

impl Stage {
    fn next(self) -> Stage {
        match self {
            Stage::BeforeFirstAnchor => Stage::AfterFirstAnchor,
            Stage::AfterFirstAnchor => Stage::InTitleAnchor,
            Stage::InTitleAnchor | Stage::PastTitle => Stage::PastTitle,
        }
    }
}

/// Entry under construction. `number` stays `None` until an anchor href parses.
#[derive(Debug, Default)]
struct PendingEntry {
    number: Option<u32>,
    title: String,
    link: String,
}

#[derive(Debug)]
enum State {
    Outside,
    InEntry { entry: PendingEntry, stage: Stage },
}

/// Stateful consumer of markup events that rebuilds the archive mapping.
#[derive(Debug)]
pub struct ArchiveParser<'a> {
    endpoints: &'a Endpoints,
    state: State,
    results: WhatIfArchive,
}

impl<'a> ArchiveParser<'a> {
    pub fn new(endpoints: &'a Endpoints) -> Self {
        Self {
            endpoints,
            state: State::Outside,
            results: WhatIfArchive::new(),
        }
    }

    pub fn feed(&mut self, event: &MarkupEvent) {
        match event {
            MarkupEvent::Open { name, attrs } => self.open_tag(name, attrs),
            MarkupEvent::Text(text) => self.text(text),
            MarkupEvent::Close { name } => self.close_tag(name),
        }
    }

    pub fn feed_all<'e>(&mut self, events: impl IntoIterator<Item = &'e MarkupEvent>) {
        for event in events {
            self.feed(event);
        }
    }

    /// Entries committed so far.
    pub fn results(&self) -> &WhatIfArchive {
        &self.results
    }

    pub fn into_results(self) -> WhatIfArchive {
        self.results
    }

    fn is_container(&self, name: &str, attrs: &[(String, String)]) -> bool {
        name == self.endpoints.archive_container_tag
            && attrs.iter().any(|(k, v)| {
                *k == self.endpoints.archive_container_attr
                    && *v == self.endpoints.archive_container_value
            })
    }

    fn open_tag(&mut self, name: &str, attrs: &[(String, String)]) {
        // A new container replaces any entry still open; nesting is not supported.
        if self.is_container(name, attrs) {
            self.state = State::InEntry {
                entry: PendingEntry::default(),
                stage: Stage::BeforeFirstAnchor,
            };
            return;
        }
        if name != ANCHOR {
            return;
        }
        let State::InEntry { entry, stage } = &mut self.state else {
            return;
        };
        *stage = stage.next();
        if entry.number.is_none() {
            let href = attrs
                .iter()
                .find(|(k, _)| k == "href")
                .map(|(_, v)| v.as_str())
                .unwrap_or("");
            entry.number = parse_entry_number(href, &self.endpoints.whatif_href_prefix);
            entry.link = format!("{}{}", self.endpoints.whatif_scheme, href);
        }
    }

    fn text(&mut self, text: &str) {
        if let State::InEntry {
            entry,
            stage: Stage::InTitleAnchor,
        } = &mut self.state
        {
            // Fragmented text keeps only the last piece.
            entry.title = text.to_string();
        }
    }

    fn close_tag(&mut self, name: &str) {
        if name == self.endpoints.archive_container_tag {
            if let State::InEntry { entry, .. } =
                std::mem::replace(&mut self.state, State::Outside)
            {
                if let Some(number) = entry.number {
                    self.results.insert(
                        number,
                        WhatIf {
                            number,
                            title: entry.title,
                            link: entry.link,
                        },
                    );
                } else {
                    log::debug!("Dropping archive entry with unreadable link {}", entry.link);
                }
            }
        } else if name == ANCHOR {
            if let State::InEntry { stage, .. } = &mut self.state {
                if *stage == Stage::InTitleAnchor {
                    *stage = Stage::BeforeFirstAnchor;
                }
            }
        }
    }
}

/// `//what-if.xkcd.com/3/` -> 3: strip the prefix and the trailing character.
/// Negative numbers are rejected: article numbers start at 1.
fn parse_entry_number(href: &str, prefix: &str) -> Option<u32> {
    let rest = href.strip_prefix(prefix)?;
    let mut chars = rest.chars();
    chars.next_back()?;
    chars.as_str().parse().ok()
}

/// Tokenize an archive page and collect its entries. No matches gives an empty map.
pub fn parse_archive(html: &str, endpoints: &Endpoints) -> WhatIfArchive {
    let events = tokenize(html);
    let mut parser = ArchiveParser::new(endpoints);
    parser.feed_all(&events);
    parser.into_results()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_events(href: &str, title: &str) -> Vec<MarkupEvent> {
        vec![
            MarkupEvent::open("div", &[("class", "archive-entry")]),
            MarkupEvent::open("a", &[("href", href)]),
            MarkupEvent::open("img", &[("src", "thumb.png")]),
            MarkupEvent::close("img"),
            MarkupEvent::close("a"),
            MarkupEvent::open("h1", &[("class", "archive-title")]),
            MarkupEvent::open("a", &[("href", href)]),
            MarkupEvent::text(title),
            MarkupEvent::close("a"),
            MarkupEvent::close("h1"),
            MarkupEvent::close("div"),
        ]
    }

    fn run(events: &[MarkupEvent]) -> WhatIfArchive {
        let endpoints = Endpoints::default();
        let mut parser = ArchiveParser::new(&endpoints);
        parser.feed_all(events);
        parser.into_results()
    }

    #[test]
    fn single_entry_from_events() {
        let archive = run(&entry_events("//what-if.xkcd.com/3/", "Yoda"));
        assert_eq!(archive.len(), 1);
        let yoda = &archive[&3];
        assert_eq!(yoda.number, 3);
        assert_eq!(yoda.title, "Yoda");
        assert_eq!(yoda.link, "https://what-if.xkcd.com/3/");
    }

    #[test]
    fn single_entry_from_html() {
        let html = r#"<html><body>
<div class="archive-entry">
  <a href="//what-if.xkcd.com/3/"><img src="//what-if.xkcd.com/imgs/a/3/yoda.png"></a>
  <h1 class="archive-title"><a href="//what-if.xkcd.com/3/">Yoda</a></h1>
  <h2 class="archive-date">July 10, 2012</h2>
</div>
</body></html>"#;
        let archive = parse_archive(html, &Endpoints::default());
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[&3].title, "Yoda");
        assert_eq!(archive[&3].link, "https://what-if.xkcd.com/3/");
    }

    #[test]
    fn unparseable_href_contributes_nothing() {
        let mut events = entry_events("//what-if.xkcd.com/yoda/", "Yoda");
        events.extend(entry_events("//elsewhere.example/4/", "Elsewhere"));
        assert!(run(&events).is_empty());
    }

    #[test]
    fn second_anchor_is_tried_when_first_href_fails() {
        let events = vec![
            MarkupEvent::open("div", &[("class", "archive-entry")]),
            MarkupEvent::open("a", &[("href", "#top")]),
            MarkupEvent::close("a"),
            MarkupEvent::open("a", &[("href", "//what-if.xkcd.com/7/")]),
            MarkupEvent::text("Everybody Jump"),
            MarkupEvent::close("a"),
            MarkupEvent::close("div"),
        ];
        let archive = run(&events);
        assert_eq!(archive[&7].title, "Everybody Jump");
        assert_eq!(archive[&7].link, "https://what-if.xkcd.com/7/");
    }

    #[test]
    fn text_after_title_anchor_is_ignored() {
        let mut events = entry_events("//what-if.xkcd.com/5/", "Lightning");
        let close_div = events.pop();
        events.push(MarkupEvent::text("July 24, 2012"));
        events.extend(close_div);
        assert_eq!(run(&events)[&5].title, "Lightning");
    }

    #[test]
    fn fragmented_title_keeps_last_fragment() {
        let events = vec![
            MarkupEvent::open("div", &[("class", "archive-entry")]),
            MarkupEvent::open("a", &[("href", "//what-if.xkcd.com/9/")]),
            MarkupEvent::close("a"),
            MarkupEvent::open("a", &[("href", "//what-if.xkcd.com/9/")]),
            MarkupEvent::text("Soda "),
            MarkupEvent::text("Sequestration"),
            MarkupEvent::close("a"),
            MarkupEvent::close("div"),
        ];
        assert_eq!(run(&events)[&9].title, "Sequestration");
    }

    #[test]
    fn anchors_outside_entries_are_ignored() {
        let events = vec![
            MarkupEvent::open("a", &[("href", "//what-if.xkcd.com/1/")]),
            MarkupEvent::text("stray"),
            MarkupEvent::close("a"),
            MarkupEvent::open("div", &[("class", "other")]),
            MarkupEvent::open("a", &[("href", "//what-if.xkcd.com/2/")]),
            MarkupEvent::close("a"),
            MarkupEvent::close("div"),
        ];
        assert!(run(&events).is_empty());
    }

    #[test]
    fn new_container_supersedes_unclosed_entry() {
        let mut events = entry_events("//what-if.xkcd.com/1/", "Relativistic Baseball");
        events.pop();
        events.extend(entry_events("//what-if.xkcd.com/2/", "Glass Half Empty"));
        let archive = run(&events);
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[&2].title, "Glass Half Empty");
    }

    #[test]
    fn duplicate_numbers_last_write_wins() {
        let mut events = entry_events("//what-if.xkcd.com/4/", "First");
        events.extend(entry_events("//what-if.xkcd.com/4/", "Second"));
        let archive = run(&events);
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[&4].title, "Second");
    }

    #[test]
    fn n_entries_in_any_order_yield_n_records() {
        let numbers = [12, 3, 157, 1, 48];
        let mut html = String::from("<html><body>");
        for n in numbers {
            html.push_str(&format!(
                r#"<div class="archive-entry"><a href="//what-if.xkcd.com/{n}/"><img src="t.png"></a><h1><a href="//what-if.xkcd.com/{n}/">Article {n}</a></h1></div>"#
            ));
        }
        html.push_str("</body></html>");
        let archive = parse_archive(&html, &Endpoints::default());
        assert_eq!(archive.len(), numbers.len());
        for n in numbers {
            assert_eq!(archive[&n].title, format!("Article {}", n));
        }
    }

    #[test]
    fn results_available_mid_stream() {
        let endpoints = Endpoints::default();
        let mut parser = ArchiveParser::new(&endpoints);
        let events = entry_events("//what-if.xkcd.com/3/", "Yoda");
        parser.feed_all(&events[..events.len() - 1]);
        assert!(parser.results().is_empty());
        parser.feed(&events[events.len() - 1]);
        assert_eq!(parser.results().len(), 1);
    }

    #[test]
    fn entry_number_parsing() {
        let prefix = "//what-if.xkcd.com/";
        assert_eq!(parse_entry_number("//what-if.xkcd.com/3/", prefix), Some(3));
        assert_eq!(parse_entry_number("//what-if.xkcd.com/157/", prefix), Some(157));
        assert_eq!(parse_entry_number("//what-if.xkcd.com/", prefix), None);
        assert_eq!(parse_entry_number("//what-if.xkcd.com/x/", prefix), None);
        assert_eq!(parse_entry_number("", prefix), None);
        assert_eq!(parse_entry_number("//what-if.xkcd.com/-5/", prefix), None);
    }
}
