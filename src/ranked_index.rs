//! `RankedIndex` — a multiset of `(score, uid)` pairs, kept in a left-leaning
//! red-black tree augmented with per-node subtree sizes, answering
//! `find_rank` in O(log n).
//!
//! The balancing machinery (rotations, color flips, the 2-3 tree walk) is
//! the textbook LLRB algorithm; the only addition over a plain LLRB set is
//! that every structural mutation keeps `Node::size` current so rank queries
//! never have to walk more than the tree's height.

use crate::error::{Error, Result};
use crate::llrb_node::{is_black, is_red, size_of, Node, ScorePair};

/// An order-statistic index over one score attribute.
#[derive(Default)]
pub struct RankedIndex {
    root: Option<Box<Node>>,
}

impl RankedIndex {
    pub fn new() -> RankedIndex {
        RankedIndex { root: None }
    }

    pub fn size(&self) -> usize {
        size_of(&self.root)
    }

    /// Insert `(score, uid)`. Fails with [`Error::DuplicatePair`] if already present.
    pub fn insert(&mut self, score: u32, uid: u32) -> Result<()> {
        let key = ScorePair { score, uid };
        if contains(self.root.as_deref(), key) {
            return Err(Error::DuplicatePair(score, uid));
        }
        let mut root = upsert(self.root.take(), key);
        root.set_black();
        self.root = Some(root);
        Ok(())
    }

    /// Remove `(score, uid)`. Fails with [`Error::NotFound`] if absent.
    pub fn erase(&mut self, score: u32, uid: u32) -> Result<()> {
        let key = ScorePair { score, uid };
        if !contains(self.root.as_deref(), key) {
            return Err(Error::NotFound(score, uid));
        }
        let root = do_delete(self.root.take(), key);
        self.root = root.map(|mut n| {
            n.set_black();
            n
        });
        Ok(())
    }

    /// Equivalent to `erase(old_score, uid)` followed by `insert(new_score, uid)`,
    /// with no state observable in between.
    pub fn update(&mut self, old_score: u32, new_score: u32, uid: u32) -> Result<()> {
        if old_score == new_score {
            return Ok(());
        }
        self.erase(old_score, uid)?;
        self.insert(new_score, uid)
    }

    /// 1-based rank of `score` under descending order: the count of pairs
    /// with a strictly greater score, plus one. Ties all resolve to the same
    /// rank. O(log n).
    pub fn find_rank(&self, score: u32) -> usize {
        count_greater(self.root.as_deref(), score) + 1
    }
}

fn contains(mut node: Option<&Node>, key: ScorePair) -> bool {
    while let Some(n) = node {
        node = match key.cmp(&n.key) {
            std::cmp::Ordering::Less => n.as_left_deref(),
            std::cmp::Ordering::Greater => n.as_right_deref(),
            std::cmp::Ordering::Equal => return true,
        };
    }
    false
}

/// Count of nodes whose `score` is strictly greater than `target`.
///
/// See the module-level note in `SPEC_FULL.md` §4.1: this formulation, not a
/// "stop at the first node with matching score" walk, is what makes
/// `find_rank` independent of tree shape when scores repeat.
fn count_greater(node: Option<&Node>, target: u32) -> usize {
    match node {
        None => 0,
        Some(n) if n.key.score > target => {
            size_of(&n.left) + 1 + count_greater(n.as_right_deref(), target)
        }
        Some(n) => count_greater(n.as_left_deref(), target),
    }
}

fn upsert(node: Option<Box<Node>>, key: ScorePair) -> Box<Node> {
    let mut node = match node {
        None => return Node::new(key),
        Some(node) => node,
    };
    match key.cmp(&node.key) {
        std::cmp::Ordering::Less => {
            node.left = Some(upsert(node.left.take(), key));
        }
        std::cmp::Ordering::Greater => {
            node.right = Some(upsert(node.right.take(), key));
        }
        std::cmp::Ordering::Equal => unreachable!("caller already checked for duplicates"),
    }
    walkuprot_23(node)
}

fn do_delete(node: Option<Box<Node>>, key: ScorePair) -> Option<Box<Node>> {
    let mut node = node?;

    if key < node.key {
        if node.left.is_none() {
            // key not in this subtree; nothing to do below this node.
            return Some(node);
        }
        if !is_red(node.as_left_deref()) && !is_red(node.left.as_ref().unwrap().as_left_deref()) {
            node = move_red_left(node);
        }
        node.left = do_delete(node.left.take(), key);
        Some(fixup(node))
    } else {
        if is_red(node.as_left_deref()) {
            node = rotate_right(node);
        }
        if key == node.key && node.right.is_none() {
            return None;
        }
        let right_red = node.right.is_some() && !is_red(node.as_right_deref());
        if right_red && !is_red(node.right.as_ref().unwrap().as_left_deref()) {
            node = move_red_right(node);
        }
        if key == node.key {
            let (right, min) = delete_min(node.right.take());
            let mut min = min.expect("right subtree is non-empty, delete_min must yield a node");
            min.left = node.left.take();
            min.right = right;
            min.black = node.black;
            Some(fixup(min))
        } else {
            node.right = do_delete(node.right.take(), key);
            Some(fixup(node))
        }
    }
}

fn delete_min(node: Option<Box<Node>>) -> (Option<Box<Node>>, Option<Box<Node>>) {
    let mut node = match node {
        None => return (None, None),
        Some(node) if node.left.is_none() => return (None, Some(node)),
        Some(node) => node,
    };
    if !is_red(node.as_left_deref())
        && !is_red(node.left.as_ref().unwrap().as_left_deref())
    {
        node = move_red_left(node);
    }
    let (left, min) = delete_min(node.left.take());
    node.left = left;
    (Some(fixup(node)), min)
}

fn walkuprot_23(mut node: Box<Node>) -> Box<Node> {
    if is_red(node.as_right_deref()) && !is_red(node.as_left_deref()) {
        node = rotate_left(node);
    }
    let left_is_red_red = {
        let left = node.as_left_deref();
        is_red(left) && is_red(left.unwrap().as_left_deref())
    };
    if left_is_red_red {
        node = rotate_right(node);
    }
    if is_red(node.as_left_deref()) && is_red(node.as_right_deref()) {
        flip(&mut node);
    }
    node.fix_size();
    node
}

fn fixup(mut node: Box<Node>) -> Box<Node> {
    if is_red(node.as_right_deref()) {
        node = rotate_left(node);
    }
    let left_is_red_red = {
        let left = node.as_left_deref();
        is_red(left) && is_red(left.unwrap().as_left_deref())
    };
    if left_is_red_red {
        node = rotate_right(node);
    }
    if is_red(node.as_left_deref()) && is_red(node.as_right_deref()) {
        flip(&mut node);
    }
    node.fix_size();
    node
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    debug_assert!(is_red(node.as_right_deref()));
    let mut x = node.right.take().unwrap();
    node.right = x.left.take();
    x.black = node.black;
    node.set_red();
    node.fix_size();
    x.left = Some(node);
    x.fix_size();
    x
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    debug_assert!(is_red(node.as_left_deref()));
    let mut x = node.left.take().unwrap();
    node.left = x.right.take();
    x.black = node.black;
    node.set_red();
    node.fix_size();
    x.right = Some(node);
    x.fix_size();
    x
}

fn flip(node: &mut Node) {
    node.left.as_mut().unwrap().toggle_link();
    node.right.as_mut().unwrap().toggle_link();
    node.toggle_link();
}

fn move_red_left(mut node: Box<Node>) -> Box<Node> {
    flip(&mut node);
    if is_red(node.right.as_ref().unwrap().as_left_deref()) {
        node.right = Some(rotate_right(node.right.take().unwrap()));
        node = rotate_left(node);
        flip(&mut node);
    }
    node
}

fn move_red_right(mut node: Box<Node>) -> Box<Node> {
    flip(&mut node);
    if is_red(node.left.as_ref().unwrap().as_left_deref()) {
        node = rotate_right(node);
        flip(&mut node);
    }
    node
}

/// Why [`validate`] rejected a tree. Distinct from [`crate::error::Error`]:
/// these describe a broken structural invariant, not a request-level failure.
#[derive(Debug, PartialEq, Eq)]
pub enum Invariant {
    ConsecutiveReds,
    UnbalancedBlacks,
    SortError,
    SizeMismatch,
}

/// Walk the whole tree and confirm the BST, color and size invariants.
/// Exercised only from tests, but kept as a real (not `#[cfg(test)]`) function
/// so tooling that embeds this crate can sanity-check a store under fuzzing.
pub fn validate(index: &RankedIndex) -> std::result::Result<(), Invariant> {
    validate_node(index.root.as_deref(), false).map(|_| ())
}

fn validate_node(node: Option<&Node>, from_red: bool) -> std::result::Result<usize, Invariant> {
    let node = match node {
        None => return Ok(0),
        Some(node) => node,
    };
    if from_red && is_red(Some(node)) {
        return Err(Invariant::ConsecutiveReds);
    }
    let expected_size = 1 + size_of(&node.left) + size_of(&node.right);
    if node.size != expected_size {
        return Err(Invariant::SizeMismatch);
    }
    if let Some(left) = node.as_left_deref() {
        if left.key >= node.key {
            return Err(Invariant::SortError);
        }
    }
    if let Some(right) = node.as_right_deref() {
        if right.key <= node.key {
            return Err(Invariant::SortError);
        }
    }
    let red = is_red(Some(node));
    let lb = validate_node(node.as_left_deref(), red)?;
    let rb = validate_node(node.as_right_deref(), red)?;
    if lb != rb {
        return Err(Invariant::UnbalancedBlacks);
    }
    Ok(lb + if is_black(Some(node)) { 1 } else { 0 })
}

#[cfg(test)]
#[path = "ranked_index_test.rs"]
mod ranked_index_test;
