//! Augmented AVL tree for interval search
//!
//! Each node stores one entry and caches its subtree height plus the maximum
//! `high` endpoint below it. Overlap searches prune every subtree whose
//! cached maximum cannot reach the query, which keeps lookups logarithmic
//! instead of scanning branches that cannot match.

use std::cmp::Ordering;
use std::fmt;

use crate::EntryId;
use crate::interval::{Endpoint, Interval, query_matches};

/// An interval tree holding `(id, interval, payload)` entries for one key.
///
/// Entries are ordered by `(low, high, id)`, so traversal order is
/// deterministic for a fixed set of entries. The tree is pure mechanism: it
/// stores whatever it is given and leaves overlap policy to its caller.
#[derive(Debug)]
pub struct IntervalTree<T, P> {
    root: Option<Box<Node<T, P>>>,
    len: usize,
}

#[derive(Debug)]
struct Node<T, P> {
    id: EntryId,
    interval: Interval<T>,
    payload: P,
    /// Maximum `high` endpoint in this subtree
    max_high: Endpoint<T>,
    /// Height of this subtree (leaf = 1)
    height: u8,
    left: Option<Box<Node<T, P>>>,
    right: Option<Box<Node<T, P>>>,
}

/// Structural defect reported by [`IntervalTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeDefect {
    /// In-order traversal is not sorted by `(low, high, id)`
    OutOfOrder,
    /// A node's cached height is stale or the balance factor exceeds one
    Unbalanced,
    /// A node's cached subtree maximum does not match its contents
    StaleMaxHigh,
    /// The cached entry count disagrees with the traversal
    LengthMismatch,
    /// Two non-empty entries overlap
    OverlappingEntries {
        /// First entry of the offending pair
        a: EntryId,
        /// Second entry of the offending pair
        b: EntryId,
    },
}

impl fmt::Display for TreeDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeDefect::OutOfOrder => write!(f, "entries out of order"),
            TreeDefect::Unbalanced => write!(f, "balance invariant violated"),
            TreeDefect::StaleMaxHigh => write!(f, "stale subtree maximum"),
            TreeDefect::LengthMismatch => write!(f, "entry count mismatch"),
            TreeDefect::OverlappingEntries { a, b } => {
                write!(f, "entries {} and {} overlap", a, b)
            }
        }
    }
}

impl std::error::Error for TreeDefect {}

fn height<T, P>(slot: &Option<Box<Node<T, P>>>) -> u8 {
    slot.as_ref().map_or(0, |n| n.height)
}

fn cmp_key<T: Ord>(
    a_interval: &Interval<T>,
    a_id: EntryId,
    b_interval: &Interval<T>,
    b_id: EntryId,
) -> Ordering {
    a_interval
        .position_cmp(b_interval)
        .then_with(|| a_id.cmp(&b_id))
}

impl<T: Ord + Clone, P> Node<T, P> {
    fn new(id: EntryId, interval: Interval<T>, payload: P) -> Box<Self> {
        let max_high = interval.high.clone();
        Box::new(Self {
            id,
            interval,
            payload,
            max_high,
            height: 1,
            left: None,
            right: None,
        })
    }

    /// Recompute cached height and subtree maximum from the children.
    fn refresh(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
        let mut max = self.interval.high.clone();
        if let Some(l) = &self.left {
            if l.max_high > max {
                max = l.max_high.clone();
            }
        }
        if let Some(r) = &self.right {
            if r.max_high > max {
                max = r.max_high.clone();
            }
        }
        self.max_high = max;
    }

    fn balance(&self) -> i16 {
        i16::from(height(&self.left)) - i16::from(height(&self.right))
    }
}

fn rotate_left<T: Ord + Clone, P>(mut n: Box<Node<T, P>>) -> Box<Node<T, P>> {
    match n.right.take() {
        None => {
            n.refresh();
            n
        }
        Some(mut r) => {
            n.right = r.left.take();
            n.refresh();
            r.left = Some(n);
            r.refresh();
            r
        }
    }
}

fn rotate_right<T: Ord + Clone, P>(mut n: Box<Node<T, P>>) -> Box<Node<T, P>> {
    match n.left.take() {
        None => {
            n.refresh();
            n
        }
        Some(mut l) => {
            n.left = l.right.take();
            n.refresh();
            l.right = Some(n);
            l.refresh();
            l
        }
    }
}

fn rebalance<T: Ord + Clone, P>(mut n: Box<Node<T, P>>) -> Box<Node<T, P>> {
    n.refresh();
    let factor = n.balance();
    if factor > 1 {
        if let Some(l) = n.left.take() {
            n.left = Some(if l.balance() < 0 { rotate_left(l) } else { l });
        }
        rotate_right(n)
    } else if factor < -1 {
        if let Some(r) = n.right.take() {
            n.right = Some(if r.balance() > 0 { rotate_right(r) } else { r });
        }
        rotate_left(n)
    } else {
        n
    }
}

fn insert_node<T: Ord + Clone, P>(
    slot: Option<Box<Node<T, P>>>,
    new: Box<Node<T, P>>,
) -> Box<Node<T, P>> {
    match slot {
        None => new,
        Some(mut cur) => {
            match cmp_key(&new.interval, new.id, &cur.interval, cur.id) {
                Ordering::Less => cur.left = Some(insert_node(cur.left.take(), new)),
                Ordering::Greater | Ordering::Equal => {
                    cur.right = Some(insert_node(cur.right.take(), new));
                }
            }
            rebalance(cur)
        }
    }
}

/// Detach the minimum node of a subtree, returning the remainder and the node.
fn detach_min<T: Ord + Clone, P>(
    mut n: Box<Node<T, P>>,
) -> (Option<Box<Node<T, P>>>, Box<Node<T, P>>) {
    match n.left.take() {
        None => {
            let rest = n.right.take();
            (rest, n)
        }
        Some(l) => {
            let (rest, min) = detach_min(l);
            n.left = rest;
            (Some(rebalance(n)), min)
        }
    }
}

fn remove_node<T: Ord + Clone, P>(
    slot: Option<Box<Node<T, P>>>,
    interval: &Interval<T>,
    id: EntryId,
) -> (Option<Box<Node<T, P>>>, Option<P>) {
    let Some(mut cur) = slot else {
        return (None, None);
    };
    match cmp_key(interval, id, &cur.interval, cur.id) {
        Ordering::Less => {
            let (rest, removed) = remove_node(cur.left.take(), interval, id);
            cur.left = rest;
            if removed.is_some() {
                (Some(rebalance(cur)), removed)
            } else {
                (Some(cur), None)
            }
        }
        Ordering::Greater => {
            let (rest, removed) = remove_node(cur.right.take(), interval, id);
            cur.right = rest;
            if removed.is_some() {
                (Some(rebalance(cur)), removed)
            } else {
                (Some(cur), None)
            }
        }
        Ordering::Equal => match (cur.left.take(), cur.right.take()) {
            (None, None) => (None, Some(cur.payload)),
            (Some(l), None) => (Some(l), Some(cur.payload)),
            (None, Some(r)) => (Some(r), Some(cur.payload)),
            (Some(l), Some(r)) => {
                let (rest, mut successor) = detach_min(r);
                successor.left = Some(l);
                successor.right = rest;
                (Some(rebalance(successor)), Some(cur.payload))
            }
        },
    }
}

fn visit_matches<'a, T: Ord, P, F>(
    slot: &'a Option<Box<Node<T, P>>>,
    query: &Interval<T>,
    f: &mut F,
) where
    F: FnMut(EntryId, &'a Interval<T>, &'a P),
{
    let Some(n) = slot else { return };
    let reachable = if query.is_empty() {
        n.max_high >= query.low
    } else {
        n.max_high > query.low
    };
    if !reachable {
        return;
    }
    visit_matches(&n.left, query, f);
    if query_matches(query, &n.interval) {
        f(n.id, &n.interval, &n.payload);
    }
    let descend_right = if query.is_empty() {
        n.interval.low <= query.low
    } else {
        n.interval.low < query.high
    };
    if descend_right {
        visit_matches(&n.right, query, f);
    }
}

fn any_match_node<T: Ord, P>(slot: &Option<Box<Node<T, P>>>, query: &Interval<T>) -> bool {
    let Some(n) = slot else { return false };
    let reachable = if query.is_empty() {
        n.max_high >= query.low
    } else {
        n.max_high > query.low
    };
    if !reachable {
        return false;
    }
    if query_matches(query, &n.interval) {
        return true;
    }
    if any_match_node(&n.left, query) {
        return true;
    }
    let descend_right = if query.is_empty() {
        n.interval.low <= query.low
    } else {
        n.interval.low < query.high
    };
    descend_right && any_match_node(&n.right, query)
}

fn contains_node<T: Ord, P>(slot: &Option<Box<Node<T, P>>>, point: &T) -> bool {
    let Some(n) = slot else { return false };
    if !n.max_high.above(point) {
        return false;
    }
    if n.interval.contains_point(point) {
        return true;
    }
    contains_node(&n.left, point)
        || (n.interval.low.at_or_below(point) && contains_node(&n.right, point))
}

fn visit_all<'a, T, P, F>(slot: &'a Option<Box<Node<T, P>>>, f: &mut F)
where
    F: FnMut(EntryId, &'a Interval<T>, &'a P),
{
    if let Some(n) = slot {
        visit_all(&n.left, f);
        f(n.id, &n.interval, &n.payload);
        visit_all(&n.right, f);
    }
}

impl<T: Ord + Clone, P> IntervalTree<T, P> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of entries in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree (0 when empty).
    pub fn height(&self) -> usize {
        usize::from(height(&self.root))
    }

    /// Insert an entry. The `(interval, id)` pair positions it; ids are
    /// expected to be unique.
    pub fn insert(&mut self, id: EntryId, interval: Interval<T>, payload: P) {
        let node = Node::new(id, interval, payload);
        self.root = Some(insert_node(self.root.take(), node));
        self.len += 1;
    }

    /// Remove the entry stored under exactly `(interval, id)`, returning its
    /// payload.
    pub fn remove(&mut self, id: EntryId, interval: &Interval<T>) -> Option<P> {
        let (root, removed) = remove_node(self.root.take(), interval, id);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Look up the payload stored under exactly `(interval, id)`.
    pub fn get(&self, id: EntryId, interval: &Interval<T>) -> Option<&P> {
        let mut cur = &self.root;
        while let Some(n) = cur {
            match cmp_key(interval, id, &n.interval, n.id) {
                Ordering::Less => cur = &n.left,
                Ordering::Greater => cur = &n.right,
                Ordering::Equal => return Some(&n.payload),
            }
        }
        None
    }

    /// Visit every entry matching the query, in ascending `(low, high, id)`
    /// order. Subtrees that cannot match are pruned, not scanned.
    pub fn for_each_match<'a, F>(&'a self, query: &Interval<T>, mut f: F)
    where
        F: FnMut(EntryId, &'a Interval<T>, &'a P),
    {
        visit_matches(&self.root, query, &mut f);
    }

    /// Whether any entry matches the query. Stops at the first hit.
    pub fn any_match(&self, query: &Interval<T>) -> bool {
        any_match_node(&self.root, query)
    }

    /// Whether any non-empty entry contains the point (`low <= p < high`).
    pub fn contains_point(&self, point: &T) -> bool {
        contains_node(&self.root, point)
    }

    /// Visit every entry in ascending `(low, high, id)` order.
    pub fn for_each<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(EntryId, &'a Interval<T>, &'a P),
    {
        visit_all(&self.root, &mut f);
    }

    /// Check the ordering, balance and augmentation invariants, plus the
    /// overlap-freedom of the stored non-empty entries.
    pub fn validate(&self) -> Result<(), TreeDefect> {
        let observed = check_structure(&self.root)?;
        if observed.count != self.len {
            return Err(TreeDefect::LengthMismatch);
        }

        let mut ordered: Vec<(&Interval<T>, EntryId)> = Vec::with_capacity(self.len);
        visit_all(&self.root, &mut |id, interval, _| ordered.push((interval, id)));
        for pair in ordered.windows(2) {
            if cmp_key(pair[0].0, pair[0].1, pair[1].0, pair[1].1) == Ordering::Greater {
                return Err(TreeDefect::OutOfOrder);
            }
        }

        // Sorted by low, so an overlap exists iff some entry starts before the
        // running maximum high of its non-empty predecessors.
        let mut frontier: Option<(&Endpoint<T>, EntryId)> = None;
        for (interval, id) in ordered {
            if interval.is_empty() {
                continue;
            }
            if let Some((max_high, holder)) = frontier {
                if *max_high > interval.low {
                    return Err(TreeDefect::OverlappingEntries { a: holder, b: id });
                }
            }
            if frontier.map_or(true, |(max_high, _)| interval.high > *max_high) {
                frontier = Some((&interval.high, id));
            }
        }
        Ok(())
    }
}

struct Observed<'a, T> {
    height: u8,
    max_high: Option<&'a Endpoint<T>>,
    count: usize,
}

fn check_structure<'a, T: Ord, P>(
    slot: &'a Option<Box<Node<T, P>>>,
) -> Result<Observed<'a, T>, TreeDefect> {
    let Some(n) = slot else {
        return Ok(Observed {
            height: 0,
            max_high: None,
            count: 0,
        });
    };
    let left = check_structure(&n.left)?;
    let right = check_structure(&n.right)?;

    let expected_height = 1 + left.height.max(right.height);
    if n.height != expected_height || left.height.abs_diff(right.height) > 1 {
        return Err(TreeDefect::Unbalanced);
    }

    let mut max_high = &n.interval.high;
    if let Some(m) = left.max_high {
        if m > max_high {
            max_high = m;
        }
    }
    if let Some(m) = right.max_high {
        if m > max_high {
            max_high = m;
        }
    }
    if *max_high != n.max_high {
        return Err(TreeDefect::StaleMaxHigh);
    }

    Ok(Observed {
        height: expected_height,
        max_high: Some(max_high),
        count: left.count + right.count + 1,
    })
}

impl<T: Ord + Clone, P> Default for IntervalTree<T, P> {
    fn default() -> Self {
        Self::new()
    }
}
