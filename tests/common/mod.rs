//! Shared document fixture for the integration tests.

#![allow(dead_code)]

use dom::{Dom, NodeId};

/// ```text
/// document
/// └── html
///     └── body
///         ├── nav#site-nav
///         │   └── ul.menu
///         │       ├── li.item
///         │       ├── li.item.active
///         │       │   └── a.link
///         │       ├── li.item
///         │       ├── li.item
///         │       └── li.item
///         └── main
///             ├── section.card
///             │   ├── h2
///             │   └── p
///             └── section.card
///                 ├── h2
///                 └── p
/// ```
pub struct Page {
    pub dom: Dom,
    pub doc: NodeId,
    pub html: NodeId,
    pub body: NodeId,
    pub nav: NodeId,
    pub menu: NodeId,
    pub items: Vec<NodeId>,
    pub link: NodeId,
    pub main: NodeId,
    pub cards: Vec<NodeId>,
    pub headings: Vec<NodeId>,
}

pub fn page() -> Page {
    let mut dom = Dom::new();
    let doc = dom.create_document();
    let html = dom.element("html", &[]);
    let body = dom.element("body", &[]);
    let nav = dom.element("nav", &[("id", "site-nav")]);
    let menu = dom.element("ul", &[("class", "menu")]);
    dom.append_child(doc, html);
    dom.append_child(html, body);
    dom.append_child(body, nav);
    dom.append_child(nav, menu);

    let items: Vec<NodeId> = (0..5)
        .map(|i| {
            let class = if i == 1 { "item active" } else { "item" };
            let li = dom.element("li", &[("class", class)]);
            dom.append_child(menu, li);
            li
        })
        .collect();
    let link = dom.element("a", &[("class", "link"), ("href", "#")]);
    dom.append_child(items[1], link);

    let main = dom.element("main", &[]);
    dom.append_child(body, main);
    let mut cards = Vec::new();
    let mut headings = Vec::new();
    for _ in 0..2 {
        let card = dom.element("section", &[("class", "card")]);
        let h2 = dom.element("h2", &[]);
        let p = dom.element("p", &[]);
        dom.append_child(main, card);
        dom.append_child(card, h2);
        dom.append_child(card, p);
        cards.push(card);
        headings.push(h2);
    }

    Page { dom, doc, html, body, nav, menu, items, link, main, cards, headings }
}

/// Route engine logs to the test harness (`RUST_LOG=relsel=trace`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
