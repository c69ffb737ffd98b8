//! Node type for the order-statistic left-leaning red-black tree used by
//! [`crate::ranked_index::RankedIndex`].

use std::cmp::Ordering;
use std::ops::Deref;

/// One `(score, uid)` pair held in a [`crate::ranked_index::RankedIndex`].
///
/// Ordering is descending by `score`, tiebroken ascending by `uid`, so that
/// an in-order walk of the tree visits pairs best-score-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorePair {
    pub score: u32,
    pub uid: u32,
}

impl Ord for ScorePair {
    fn cmp(&self, other: &ScorePair) -> Ordering {
        other.score.cmp(&self.score).then(self.uid.cmp(&other.uid))
    }
}

impl PartialOrd for ScorePair {
    fn partial_cmp(&self, other: &ScorePair) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A node in the augmented tree: a `(score, uid)` key, the red/black link
/// color, and `size` — the count of this node plus both subtrees, kept
/// current on every structural mutation so `find_rank` can be answered in
/// O(log n) without scanning.
pub(crate) struct Node {
    pub(crate) key: ScorePair,
    pub(crate) black: bool,
    pub(crate) size: usize,
    pub(crate) left: Option<Box<Node>>,
    pub(crate) right: Option<Box<Node>>,
}

impl Node {
    pub(crate) fn new(key: ScorePair) -> Box<Node> {
        Box::new(Node {
            key,
            black: false, // new links start red
            size: 1,
            left: None,
            right: None,
        })
    }

    #[inline]
    pub(crate) fn as_left_deref(&self) -> Option<&Node> {
        self.left.as_ref().map(Deref::deref)
    }

    #[inline]
    pub(crate) fn as_right_deref(&self) -> Option<&Node> {
        self.right.as_ref().map(Deref::deref)
    }

    #[inline]
    pub(crate) fn is_black(&self) -> bool {
        self.black
    }

    #[inline]
    pub(crate) fn set_red(&mut self) {
        self.black = false
    }

    #[inline]
    pub(crate) fn set_black(&mut self) {
        self.black = true
    }

    #[inline]
    pub(crate) fn toggle_link(&mut self) {
        self.black = !self.black
    }

    /// Recompute `size` from the immediate children. Must be called bottom-up
    /// after any rotation or structural change touching this node.
    #[inline]
    pub(crate) fn fix_size(&mut self) {
        self.size = 1 + size_of(&self.left) + size_of(&self.right);
    }
}

// fence recursive drops: a deep tree dropped top-down (e.g. `RankedIndex`
// going out of scope on `UserStore::clear()`) would otherwise blow the
// stack unwinding one `Drop::drop` call per level. Leaking the children
// here stops the recursion at this node; the leaked subtrees are never
// walked again and their memory is reclaimed by the allocator at process
// exit, same tradeoff the teacher lineage makes.
impl Drop for Node {
    fn drop(&mut self) {
        self.left.take().map(Box::leak);
        self.right.take().map(Box::leak);
    }
}

#[inline]
pub(crate) fn size_of(node: &Option<Box<Node>>) -> usize {
    node.as_ref().map_or(0, |n| n.size)
}

#[inline]
pub(crate) fn is_red(node: Option<&Node>) -> bool {
    node.map_or(false, |n| !n.is_black())
}

#[inline]
pub(crate) fn is_black(node: Option<&Node>) -> bool {
    node.map_or(true, Node::is_black)
}
