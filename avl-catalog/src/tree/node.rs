use crate::common::Entry;
use crate::tree::Side;

/// Owning child slot. `None` is an absent subtree.
pub(crate) type Link = Option<Box<Node>>;

/// A single tree node: the indexed entry, its cached height and two
/// exclusively owned subtrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) entry: Entry,
    pub(crate) height: u32,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    pub(crate) fn new(entry: Entry) -> Box<Node> {
        Box::new(Node {
            entry,
            height: 1,
            left: None,
            right: None,
        })
    }

    #[inline]
    pub(crate) fn key(&self) -> &str {
        self.entry.key()
    }

    /// Re-derives this node's height from its children.
    #[inline]
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// Height of the left subtree minus height of the right subtree.
    #[inline]
    pub(crate) fn balance(&self) -> i32 {
        // heights are bounded by ~1.44 log2(n), far below i32::MAX
        height(&self.left) as i32 - height(&self.right) as i32
    }

    pub(crate) fn child(&self, side: Side) -> Option<&Node> {
        match side {
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        }
    }
}

/// Height of a slot, 0 when absent.
#[inline]
pub(crate) fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Balance factor of a slot, 0 when absent.
#[inline]
pub(crate) fn balance(link: &Link) -> i32 {
    link.as_ref().map_or(0, |node| node.balance())
}
