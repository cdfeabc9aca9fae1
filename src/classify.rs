//! Decides whether a node is a usable text-input surface.

use crate::page::{Marker, NATIVE_INPUT_TAGS, Page, Selector};

/// Hidden-by-layout check: the box must have positive width and height.
/// Nodes scrolled off-screen still count as visible.
pub fn is_visible<P: Page>(page: &P, node: &P::Node) -> bool {
    let rect = page.bounding_box(node);
    rect.width > 0.0 && rect.height > 0.0
}

pub fn is_native_input<P: Page>(page: &P, node: &P::Node) -> bool {
    NATIVE_INPUT_TAGS
        .iter()
        .any(|&tag| page.matches(node, &Selector::tag(tag)))
}

pub fn is_marked_editable<P: Page>(page: &P, node: &P::Node) -> bool {
    page.matches(node, &Selector::marked(Marker::ContentEditable))
        || page.matches(node, &Selector::marked(Marker::TextboxRole))
}

/// The node that actually accepts text: `node` itself, or its first
/// editable descendant in document order.
pub fn resolve_editable_target<P: Page>(page: &P, node: &P::Node) -> Option<P::Node> {
    let accepts = |n: &P::Node| is_native_input(page, n) || is_marked_editable(page, n);

    if accepts(node) {
        return Some(node.clone());
    }
    page.descendants(node).into_iter().find(|n| accepts(n))
}

/// Every visible effective input node on the page, in document order,
/// each listed once.
pub fn visible_editable_targets<P: Page>(page: &P) -> Vec<P::Node> {
    let mut targets: Vec<P::Node> = Vec::new();

    for node in page.query_any(&Selector::editable()) {
        let Some(target) = resolve_editable_target(page, &node) else {
            continue;
        };
        if !is_visible(page, &target) || targets.contains(&target) {
            continue;
        }
        targets.push(target);
    }

    targets
}

/// Placeholder and accessible label, space separated.
pub fn placeholder_text<P: Page>(page: &P, node: &P::Node) -> String {
    format!(
        "{} {}",
        page.attribute(node, "data-placeholder").unwrap_or_default(),
        page.attribute(node, "aria-label").unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{ElementSpec, Snapshot};

    fn page() -> Snapshot {
        Snapshot::from_elements(vec![
            ElementSpec::new("div")
                .at(0.0, 40.0)
                .child(ElementSpec::new("span").at(0.0, 10.0))
                .child(
                    ElementSpec::new("p")
                        .attr("contenteditable", "true")
                        .at(10.0, 30.0),
                ),
            ElementSpec::new("textarea").at(50.0, 0.0),
            ElementSpec::new("input").at(80.0, 20.0),
            ElementSpec::new("div").attr("role", "textbox").at(120.0, 20.0),
        ])
    }

    #[test]
    fn visibility_needs_width_and_height() {
        let page = page();
        let nodes = page.query_any(&Selector::editable());
        let textarea = &nodes[1];
        let input = &nodes[2];

        assert!(!is_visible(&page, textarea));
        assert!(is_visible(&page, input));
    }

    #[test]
    fn resolves_descendant_target() {
        let page = page();
        let wrapper = page.query_all(&Selector::tag("div"))[0].clone();
        let target = resolve_editable_target(&page, &wrapper).unwrap();

        assert_eq!(page.attribute(&target, "contenteditable").as_deref(), Some("true"));
    }

    #[test]
    fn no_target_without_editable_descendant() {
        let page = page();
        let span = page.query_all(&Selector::tag("span"))[0].clone();
        assert_eq!(resolve_editable_target(&page, &span), None);
    }

    #[test]
    fn classification_is_idempotent() {
        let page = page();
        for node in page.query_any(&Selector::editable()) {
            assert_eq!(is_visible(&page, &node), is_visible(&page, &node));
            assert_eq!(
                resolve_editable_target(&page, &node),
                resolve_editable_target(&page, &node)
            );
        }
    }

    #[test]
    fn visible_targets_skip_hidden_and_duplicates() {
        let page = page();
        let targets = visible_editable_targets(&page);
        let tags: Vec<String> = targets.iter().map(|n| page.tag_name(n)).collect();

        assert_eq!(tags, vec!["p", "input", "div"]);
    }

    #[test]
    fn placeholder_text_joins_attributes() {
        let page = Snapshot::from_elements(vec![
            ElementSpec::new("div")
                .attr("data-placeholder", "Title")
                .attr("aria-label", "Story title"),
        ]);
        let node = page.query_all(&Selector::tag("div"))[0].clone();
        assert_eq!(placeholder_text(&page, &node), "Title Story title");
    }
}
