use std::cmp::Ordering;

use crate::ir::RenderItem;

use super::Rect;

/// Node of the tree handed to the tiling pass.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub name: String,
    pub value: f64,
    pub color: Option<String>,
    pub children: Vec<HierarchyNode>,
    pub rect: Rect,
}

impl HierarchyNode {
    fn leaf(item: &RenderItem) -> Self {
        let value = if item.size > 0.0 { item.size } else { 0.0 };
        Self {
            name: item.name.clone(),
            value,
            color: item.color.clone(),
            children: Vec::new(),
            rect: Rect::default(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Leaves in pre-order.
    pub fn leaves(&self) -> Vec<&HierarchyNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                out.push(node);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }
}

/// Builds a single-root tree whose children are the selected items.
///
/// The root value is the sum of the (non-negative) leaf values and children
/// are ordered by value descending, keeping input order on ties.
pub fn build_hierarchy(items: &[RenderItem]) -> HierarchyNode {
    let mut children: Vec<HierarchyNode> = items.iter().map(HierarchyNode::leaf).collect();
    children.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    let value = children.iter().map(|child| child.value).sum();
    HierarchyNode {
        name: String::new(),
        value,
        color: None,
        children,
        rect: Rect::default(),
    }
}
