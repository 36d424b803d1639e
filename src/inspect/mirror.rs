//! Object-tree mirror.
//!
//! A disposable snapshot of a live hierarchy. Nodes link back to live
//! objects by [`ObjectHandle`] only, so a mirror never keeps anything alive
//! and simply goes stale once the hierarchy changes.

use std::fmt::Write;

use owo_colors::OwoColorize;

use crate::view::{ObjectHandle, ObjectTable};

/// Identity of a node within one snapshot, assigned in pre-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MirrorId(pub u32);

#[derive(Debug, Clone)]
pub struct MirrorNode {
    pub id: MirrorId,
    /// Runtime type name of the live object.
    pub label: String,
    pub object: ObjectHandle,
    /// Whether the live object is positionable.
    pub visual: bool,
    pub children: Vec<MirrorNode>,
}

/// Mirror the hierarchy rooted at `table`'s root.
pub fn snapshot(table: &ObjectTable) -> MirrorNode {
    let mut next = 0;
    mirror_node(table, table.root(), &mut next)
}

fn mirror_node(table: &ObjectTable, handle: ObjectHandle, next: &mut u32) -> MirrorNode {
    let id = MirrorId(*next);
    *next += 1;

    let label = table
        .get(handle)
        .map_or_else(String::new, |o| o.type_name().to_string());
    let children = table
        .children(handle)
        .iter()
        .map(|&child| mirror_node(table, child, next))
        .collect();

    MirrorNode {
        id,
        label,
        object: handle,
        visual: table.positionable(handle).is_some(),
        children,
    }
}

/// Depth-first search for `target` under `root`.
pub fn find(root: &MirrorNode, target: MirrorId) -> Option<&MirrorNode> {
    if root.id == target {
        return Some(root);
    }
    root.children.iter().find_map(|child| find(child, target))
}

/// Number of nodes in the mirror.
pub fn count(root: &MirrorNode) -> usize {
    1 + root.children.iter().map(count).sum::<usize>()
}

/// Indented tree listing; non-visual nodes are dimmed.
pub fn render_tree(root: &MirrorNode) -> String {
    let mut out = String::new();
    render_node(root, 0, &mut out);
    out
}

fn render_node(node: &MirrorNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let id = format!("{:>3}", node.id.0);
    if node.visual {
        let _ = writeln!(out, "{indent}{} {}", id.dimmed(), node.label);
    } else {
        let _ = writeln!(out, "{indent}{} {}", id.dimmed(), node.label.dimmed());
    }
    for child in &node.children {
        render_node(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rect;
    use crate::view::widgets::{Frame, Layout, Timer, Widget, WidgetKind};

    fn hierarchy() -> ObjectTable {
        let mut table = ObjectTable::new(Box::new(Frame::new("MainWindow", Rect::default())));
        let root = table.root();
        let layout = table.insert(root, Box::new(Layout::vertical())).unwrap();
        table.insert(layout, Box::new(Widget::label("a"))).unwrap();
        table
            .insert(layout, Box::new(Widget::new(WidgetKind::Button)))
            .unwrap();
        table.insert(root, Box::new(Timer { interval_ms: 100 })).unwrap();
        table
    }

    fn labels(node: &MirrorNode, out: &mut Vec<String>) {
        out.push(node.label.clone());
        for child in &node.children {
            labels(child, out);
        }
    }

    #[test]
    fn test_snapshot_matches_live_hierarchy() {
        let table = hierarchy();
        let mirror = snapshot(&table);

        assert_eq!(count(&mirror), table.len());

        let mut mirrored = Vec::new();
        labels(&mirror, &mut mirrored);
        let live: Vec<String> = table
            .walk()
            .map(|h| table.get(h).unwrap().type_name().to_string())
            .collect();
        assert_eq!(mirrored, live);
        assert_eq!(
            mirrored,
            ["MainWindow", "VBoxLayout", "Label", "Button", "Timer"]
        );

        let handles: Vec<ObjectHandle> = table.walk().collect();
        assert_eq!(mirror.object, handles[0]);
        assert_eq!(mirror.children[0].children[1].object, handles[3]);
    }

    #[test]
    fn test_visual_hint() {
        let mirror = snapshot(&hierarchy());
        assert!(mirror.visual);
        assert!(!mirror.children[0].visual);
        assert!(mirror.children[0].children[0].visual);
        assert!(!mirror.children[1].visual);
    }

    #[test]
    fn test_find_by_identity() {
        let mirror = snapshot(&hierarchy());
        assert_eq!(find(&mirror, MirrorId(3)).unwrap().label, "Button");
        assert_eq!(find(&mirror, MirrorId(0)).unwrap().label, "MainWindow");
        assert!(find(&mirror, MirrorId(5)).is_none());
    }

    #[test]
    fn test_mirror_goes_stale() {
        let mut table = hierarchy();
        let mirror = snapshot(&table);
        let layout = mirror.children[0].object;

        table.remove(layout);
        assert_eq!(count(&mirror), 5);
        assert!(!table.contains(layout));
        assert!(!table.contains(mirror.children[0].children[0].object));
    }

    #[test]
    fn test_render_tree_indents() {
        let text = render_tree(&snapshot(&hierarchy()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("MainWindow"));
        assert!(lines[2].starts_with("    "));
        assert!(lines[2].contains("Label"));
    }
}
