//! Ancestor path of the node being rendered

use std::fmt;

use crate::ast::NodeKind;

/// One step per ancestor, linked from the current node up to the root.
///
/// Trails live on the call stack: a child trail borrows its parent, so
/// building one costs nothing and nothing is shared between conversions.
#[derive(Clone, Copy, Debug)]
pub struct Trail<'a> {
    kind: NodeKind,
    index: usize,
    parent: Option<&'a Trail<'a>>,
}

impl Trail<'static> {
    /// Trail of a top-level node
    pub fn root(kind: NodeKind) -> Self {
        Trail {
            kind,
            index: 0,
            parent: None,
        }
    }
}

impl<'a> Trail<'a> {
    /// Trail of the `index`-th child of this node
    pub fn child(&'a self, kind: NodeKind, index: usize) -> Trail<'a> {
        Trail {
            kind,
            index,
            parent: Some(self),
        }
    }

    /// Number of steps including this one
    pub fn depth(&self) -> usize {
        1 + self.parent.map_or(0, Trail::depth)
    }

    /// Steps from the root down to this node
    pub fn steps(&self) -> Vec<(NodeKind, usize)> {
        let mut steps = Vec::with_capacity(self.depth());
        let mut current = Some(self);
        while let Some(step) = current {
            steps.push((step.kind, step.index));
            current = step.parent;
        }
        steps.reverse();
        steps
    }
}

impl fmt::Display for Trail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (kind, index)) in self.steps().into_iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{}[{}]", kind, index)?;
        }
        Ok(())
    }
}
