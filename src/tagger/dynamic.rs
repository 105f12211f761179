use crate::tagger::tree_model::MarkupNode;

/// Index of an element in pre-order (document order) across one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementIndex(pub usize);

/// Dynamic-content flag for every element of a file, keyed by pre-order index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicFlags {
    flags: Vec<bool>,
}

impl DynamicFlags {
    pub fn get(&self, index: ElementIndex) -> Option<bool> {
        self.flags.get(index.0).copied()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementIndex, bool)> + '_ {
        self.flags.iter().enumerate().map(|(i, f)| (ElementIndex(i), *f))
    }
}

/// Compute the dynamic flag of every element in one bottom-up pass.
///
/// An element is dynamic when a direct child is a non-trivial expression, a
/// dynamic element, or a fragment whose children satisfy the same rule.
/// Indices are assigned on entry (pre-order) so a second walk over the same
/// tree can line up with the table; flags are filled on exit (post-order).
pub fn compute_dynamic_flags(nodes: &[MarkupNode]) -> DynamicFlags {
    let mut flags = Vec::new();
    for node in nodes {
        contribution(node, &mut flags);
    }
    DynamicFlags { flags }
}

/// What a node contributes to its parent's flag. Every child is visited, even
/// after one has already made the parent dynamic, so the numbering stays whole.
fn contribution(node: &MarkupNode, flags: &mut Vec<bool>) -> bool {
    match node {
        MarkupNode::Element(el) => {
            let index = flags.len();
            flags.push(false);
            let dynamic = any_dynamic(&el.children, flags);
            flags[index] = dynamic;
            dynamic
        }
        MarkupNode::Fragment(fragment) => any_dynamic(&fragment.children, flags),
        MarkupNode::Expression { expression } => !expression.is_trivial(),
        MarkupNode::Text { .. } => false,
    }
}

fn any_dynamic(children: &[MarkupNode], flags: &mut Vec<bool>) -> bool {
    children
        .iter()
        .fold(false, |acc, child| contribution(child, flags) | acc)
}
