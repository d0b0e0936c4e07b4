//! Structural mutation
//!
//! Splices content elements into the tree relative to every target. Each
//! target but the last receives deep clones; the last one receives the
//! original nodes, so a single target always gets the originals moved.

use domq_dom::{DomTree, NodeId};

use crate::{Collection, Dom, Input};

/// Where content goes relative to a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Before the target's first child
    Prepend,
    /// After the target's last child
    Append,
    /// Before the target, in its parent
    Before,
    /// After the target, in its parent
    After,
}

impl Position {
    /// Parent and reference node for an insertion at this position, or `None`
    /// when the target cannot anchor one.
    fn anchor(self, tree: &DomTree, target: NodeId) -> Option<(NodeId, Option<NodeId>)> {
        match self {
            Self::Append | Self::Prepend => {
                let node = tree.get(target)?;
                if !(node.is_element() || node.is_document()) {
                    return None;
                }
                let reference = match self {
                    Self::Prepend => tree.first_child(target),
                    _ => None,
                };
                Some((target, reference))
            }
            Self::Before => tree.parent(target).map(|parent| (parent, Some(target))),
            Self::After => tree.parent(target).map(|parent| (parent, tree.next_sibling(target))),
        }
    }
}

/// What a target receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The original content nodes
    Move,
    /// Deep clones of the content nodes
    Clone,
}

/// Placement for each of `target_len` targets: clones for all but the last
pub fn placements(content_len: usize, target_len: usize) -> Vec<Placement> {
    if content_len == 0 || target_len == 0 {
        return Vec::new();
    }
    let mut plan = vec![Placement::Clone; target_len - 1];
    plan.push(Placement::Move);
    plan
}

/// Outcome of a splice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpliceReport {
    /// Targets that could anchor the insertion
    pub targets: usize,
    /// Nodes inserted, clones included
    pub inserted: usize,
    /// Clones created
    pub cloned: usize,
    /// Targets passed over for lacking a parent or not holding children
    pub skipped: usize,
}

impl SpliceReport {
    /// Nothing was inserted
    pub fn is_noop(&self) -> bool {
        self.inserted == 0
    }
}

fn splice_nodes(dom: &Dom, position: Position, content: &[NodeId], targets: &[NodeId]) -> SpliceReport {
    let mut report = SpliceReport::default();
    let mut doc = dom.document_mut();
    let tree = &mut doc.tree;

    let content: Vec<NodeId> = content.iter().copied().filter(|&n| tree.is_element(n)).collect();
    if content.is_empty() {
        tracing::trace!(?position, "No content elements; nothing to splice");
        return report;
    }

    let usable: Vec<NodeId> = targets
        .iter()
        .copied()
        .filter(|&target| {
            let ok = position.anchor(tree, target).is_some();
            if !ok {
                tracing::debug!(?position, %target, "Skipping target that cannot anchor content");
                report.skipped += 1;
            }
            ok
        })
        .collect();
    report.targets = usable.len();

    for (target, placement) in usable.into_iter().zip(placements(content.len(), report.targets)) {
        let Some((parent, mut reference)) = position.anchor(tree, target) else {
            tracing::debug!(?position, %target, "Target lost its anchor during the splice");
            report.skipped += 1;
            continue;
        };
        if placement == Placement::Move {
            reference = skip_content(tree, reference, &content);
        }

        for &element in &content {
            let node = match placement {
                Placement::Move => element,
                Placement::Clone => match tree.clone_node(element, true) {
                    Ok(clone) => {
                        report.cloned += 1;
                        clone
                    }
                    Err(err) => {
                        tracing::debug!(%element, %err, "Could not clone content");
                        continue;
                    }
                },
            };
            match tree.insert_before(parent, node, reference) {
                Ok(_) => report.inserted += 1,
                Err(err) => tracing::debug!(%parent, %node, %err, "Insertion rejected"),
            }
        }
    }

    tracing::trace!(?position, ?report, "Spliced content");
    report
}

/// A moved node cannot be its own reference; step past content nodes
fn skip_content(tree: &DomTree, mut reference: Option<NodeId>, content: &[NodeId]) -> Option<NodeId> {
    while let Some(r) = reference {
        if !content.contains(&r) {
            break;
        }
        reference = tree.next_sibling(r);
    }
    reference
}

impl Collection {
    /// Insert `content` at `position` relative to every member
    pub fn splice(&self, position: Position, content: impl Into<Input>) -> SpliceReport {
        let content = self.dom().select(content);
        splice_nodes(self.dom(), position, content.as_slice(), self.as_slice())
    }

    /// Insert the members at `position` relative to every node `targets` selects
    pub fn splice_into(&self, position: Position, targets: impl Into<Input>) -> SpliceReport {
        let targets = self.dom().select(targets);
        splice_nodes(self.dom(), position, self.as_slice(), targets.as_slice())
    }

    /// Insert content as the last children of every member
    pub fn append(&self, content: impl Into<Input>) -> &Self {
        self.splice(Position::Append, content);
        self
    }

    /// Insert content as the first children of every member
    pub fn prepend(&self, content: impl Into<Input>) -> &Self {
        self.splice(Position::Prepend, content);
        self
    }

    /// Insert content before every member
    pub fn before(&self, content: impl Into<Input>) -> &Self {
        self.splice(Position::Before, content);
        self
    }

    /// Insert content after every member
    pub fn after(&self, content: impl Into<Input>) -> &Self {
        self.splice(Position::After, content);
        self
    }

    pub fn append_to(&self, targets: impl Into<Input>) -> &Self {
        self.splice_into(Position::Append, targets);
        self
    }

    pub fn prepend_to(&self, targets: impl Into<Input>) -> &Self {
        self.splice_into(Position::Prepend, targets);
        self
    }

    pub fn insert_before(&self, targets: impl Into<Input>) -> &Self {
        self.splice_into(Position::Before, targets);
        self
    }

    pub fn insert_after(&self, targets: impl Into<Input>) -> &Self {
        self.splice_into(Position::After, targets);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomConfig;

    fn page(body: &str) -> Dom {
        Dom::parse(&format!("<html><body>{}</body></html>", body), DomConfig::default()).unwrap()
    }

    fn tags(dom: &Dom, parent: NodeId) -> Vec<String> {
        let doc = dom.document();
        doc.tree
            .element_children(parent)
            .filter_map(|c| doc.tree.tag_name(c).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_placements() {
        assert_eq!(placements(2, 1), vec![Placement::Move]);
        assert_eq!(placements(1, 3), vec![Placement::Clone, Placement::Clone, Placement::Move]);
        assert!(placements(0, 3).is_empty());
        assert!(placements(3, 0).is_empty());
    }

    #[test]
    fn test_single_target_moves_originals() {
        let dom = page("<div id=\"t\"></div>");
        let content = dom.select("<span></span>");
        let span = content.get(0).unwrap();

        let report = dom.select("#t").splice(Position::Append, &content);
        assert_eq!(report, SpliceReport { targets: 1, inserted: 1, cloned: 0, skipped: 0 });
        let t = dom.select("#t").get(0).unwrap();
        assert_eq!(dom.document().tree.first_child(t), Some(span));
    }

    #[test]
    fn test_multiple_targets_receive_distinct_nodes() {
        let dom = page("<div class=\"t\"></div><div class=\"t\"></div><div class=\"t\"></div>");
        let content = dom.select("<b>x</b>");
        let original = content.get(0).unwrap();
        let targets = dom.select(".t");

        let report = targets.splice(Position::Append, &content);
        assert_eq!(report.inserted, 3);
        assert_eq!(report.cloned, 2);

        let doc = dom.document();
        let received: Vec<NodeId> = targets.iter().filter_map(|t| doc.tree.first_child(t)).collect();
        assert_eq!(received.len(), 3);
        assert_eq!(received[2], original);
        assert_ne!(received[0], received[1]);
        assert_eq!(doc.tree.text_content(received[0]), "x");
    }

    #[test]
    fn test_prepend_keeps_content_order() {
        let dom = page("<ul><li>c</li></ul>");
        dom.select("ul").prepend("<li>a</li><li>b</li>");
        let ul = dom.select("ul").get(0).unwrap();
        assert_eq!(dom.document().tree.text_content(ul), "abc");
    }

    #[test]
    fn test_before_after_skip_detached_targets() {
        let dom = page("<p></p>");
        let detached = dom.select("<div></div>");
        let targets = dom.select("p").to_vec().into_iter().chain(detached.iter()).collect::<Vec<_>>();
        let targets = dom.select(targets);

        let report = targets.splice(Position::After, "<hr>");
        assert_eq!(report.skipped, 1);
        assert_eq!(report.inserted, 1);
        let body = dom.document().body().unwrap();
        assert_eq!(tags(&dom, body), vec!["p", "hr"]);

        targets.before("<br>");
        assert_eq!(tags(&dom, body), vec!["br", "p", "hr"]);
    }

    #[test]
    fn test_empty_content_is_noop() {
        let dom = page("<p></p>");
        let report = dom.select("p").splice(Position::Append, "");
        assert!(report.is_noop());
        assert_eq!(report.targets, 0);
        assert!(dom.select("p").splice(Position::Append, "text only").is_noop());
    }

    #[test]
    fn test_reverse_forms() {
        let dom = page("<div id=\"a\"><i></i></div>");
        let a = dom.select("#a").get(0).unwrap();

        dom.select("<b></b>").append_to("#a");
        dom.select("<u></u>").prepend_to("#a");
        assert_eq!(tags(&dom, a), vec!["u", "i", "b"]);

        dom.select("<em></em>").insert_before("i");
        dom.select("<s></s>").insert_after("i");
        assert_eq!(tags(&dom, a), vec!["u", "em", "i", "s", "b"]);
    }

    #[test]
    fn test_moving_next_to_itself() {
        let dom = page("<p id=\"x\"></p><p id=\"y\"></p>");
        dom.select("#x").after("#y");
        let body = dom.document().body().unwrap();
        assert_eq!(dom.document().tree.element_children(body).count(), 2);
        let order: Vec<Option<String>> = {
            let doc = dom.document();
            doc.tree
                .element_children(body)
                .map(|c| doc.tree.element(c).and_then(|e| e.id()).map(str::to_string))
                .collect()
        };
        assert_eq!(order, vec![Some("x".to_string()), Some("y".to_string())]);
    }
}
