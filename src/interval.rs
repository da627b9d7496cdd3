//! Half-open intervals over an orderable domain
//!
//! This module contains the interval value types used throughout the index:
//! sentinel-bounded endpoints, the `[low, high)` interval itself, and the
//! overlap/containment predicates that define exclusion semantics.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// One end of an interval: a finite value or an infinite sentinel.
///
/// The derived ordering places `NegInf` below every finite value and `PosInf`
/// above every finite value, with finite values ordered by `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endpoint<T> {
    /// Compares below every finite value
    NegInf,
    /// A finite bound
    Finite(T),
    /// Compares above every finite value
    PosInf,
}

impl<T: Ord> Endpoint<T> {
    /// Whether this endpoint is at or below the given finite value.
    pub fn at_or_below(&self, value: &T) -> bool {
        match self {
            Endpoint::NegInf => true,
            Endpoint::Finite(x) => x <= value,
            Endpoint::PosInf => false,
        }
    }

    /// Whether this endpoint is strictly above the given finite value.
    pub fn above(&self, value: &T) -> bool {
        match self {
            Endpoint::NegInf => false,
            Endpoint::Finite(x) => x > value,
            Endpoint::PosInf => true,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Endpoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::NegInf => write!(f, "-inf"),
            Endpoint::Finite(x) => write!(f, "{}", x),
            Endpoint::PosInf => write!(f, "+inf"),
        }
    }
}

/// A half-open interval `[low, high)`.
///
/// The lower bound is inclusive, the upper bound exclusive, so adjacent
/// intervals such as `[0, 10)` and `[10, 20)` never overlap. An interval with
/// `low == high` is empty: it is always accepted by the index and conflicts
/// with nothing. An interval with `low > high` is invalid and rejected before
/// any search or mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval<T> {
    /// Inclusive lower bound
    pub low: Endpoint<T>,
    /// Exclusive upper bound
    pub high: Endpoint<T>,
}

impl<T> Interval<T> {
    /// Create a finite interval `[low, high)`.
    pub fn new(low: T, high: T) -> Self {
        Self {
            low: Endpoint::Finite(low),
            high: Endpoint::Finite(high),
        }
    }

    /// Create an interval from explicit endpoints.
    pub fn between(low: Endpoint<T>, high: Endpoint<T>) -> Self {
        Self { low, high }
    }

    /// The interval covering the whole domain, `[-inf, +inf)`.
    pub fn all() -> Self {
        Self {
            low: Endpoint::NegInf,
            high: Endpoint::PosInf,
        }
    }

    /// The empty interval `[at, at)`.
    pub fn empty_at(at: T) -> Self
    where
        T: Clone,
    {
        Self {
            low: Endpoint::Finite(at.clone()),
            high: Endpoint::Finite(at),
        }
    }
}

impl<T: Ord> Interval<T> {
    /// Whether `low <= high`. Operations reject invalid intervals up front.
    pub fn is_valid(&self) -> bool {
        self.low <= self.high
    }

    /// Whether the interval is empty (`low == high`).
    pub fn is_empty(&self) -> bool {
        self.low == self.high
    }

    /// Whether two intervals overlap under exclusion semantics.
    ///
    /// True iff both intervals are non-empty and `a.low < b.high` and
    /// `b.low < a.high`. Empty intervals overlap nothing, and intervals that
    /// merely touch (`a.high == b.low`) do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.low < other.high
            && other.low < self.high
    }

    /// Whether the interval contains a single point (`low <= point < high`).
    ///
    /// Empty intervals contain no point.
    pub fn contains_point(&self, point: &T) -> bool {
        self.low.at_or_below(point) && self.high.above(point)
    }

    /// Ordering by `(low, high)`, the traversal order of the index.
    pub fn position_cmp(&self, other: &Self) -> Ordering {
        self.low
            .cmp(&other.low)
            .then_with(|| self.high.cmp(&other.high))
    }
}

/// Whether a stored interval matches an overlap query.
///
/// For a non-empty query this is the plain overlap predicate, which never
/// matches empty stored intervals. An empty query `[x, x)` acts as a point
/// probe: it matches non-empty intervals containing `x`, plus the empty
/// interval at exactly `x`.
pub(crate) fn query_matches<T: Ord>(query: &Interval<T>, stored: &Interval<T>) -> bool {
    match (query.is_empty(), stored.is_empty()) {
        (false, false) => query.low < stored.high && stored.low < query.high,
        (false, true) => false,
        (true, false) => stored.low <= query.low && query.low < stored.high,
        (true, true) => stored.low == query.low,
    }
}

impl<T> From<Range<T>> for Interval<T> {
    fn from(range: Range<T>) -> Self {
        Self {
            low: Endpoint::Finite(range.start),
            high: Endpoint::Finite(range.end),
        }
    }
}

impl<T> From<RangeFrom<T>> for Interval<T> {
    fn from(range: RangeFrom<T>) -> Self {
        Self {
            low: Endpoint::Finite(range.start),
            high: Endpoint::PosInf,
        }
    }
}

impl<T> From<RangeTo<T>> for Interval<T> {
    fn from(range: RangeTo<T>) -> Self {
        Self {
            low: Endpoint::NegInf,
            high: Endpoint::Finite(range.end),
        }
    }
}

impl<T> From<RangeFull> for Interval<T> {
    fn from(_: RangeFull) -> Self {
        Self::all()
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.low, self.high)
    }
}
