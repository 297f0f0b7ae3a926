use std::{
    borrow::Borrow,
    collections::{BTreeMap, btree_map},
    fmt, mem,
    ops::{self, Bound},
};

use crate::interval::Interval;

/// A total map from an ordered key space to values, stored as the minimal set
/// of breakpoints at which the value changes
///
/// Every key below the first breakpoint maps to the base value.  Adjacent
/// breakpoints never share a value, and the first breakpoint never repeats the
/// base value.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompressedIntervalMap<K, V> {
    base: V,
    breakpoints: BTreeMap<K, V>,
}

impl<K, V: Default> Default for CompressedIntervalMap<K, V> {
    fn default() -> Self { Self::new(V::default()) }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CompressedIntervalMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.intervals()
            .fold(&mut f.debug_map(), |d, (k, v)| d.entry(&k, &v))
            .finish()
    }
}

/// Renders the map as `[-inf:base][k1:v1][k2:v2]...`
impl<K: fmt::Display, V: fmt::Display> fmt::Display for CompressedIntervalMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[-inf:{}]", self.base)?;

        for (key, val) in &self.breakpoints {
            write!(f, "[{key}:{val}]")?;
        }

        Ok(())
    }
}

impl<K, V> CompressedIntervalMap<K, V> {
    /// Construct a map sending every key to `base`
    #[inline]
    #[must_use]
    pub const fn new(base: V) -> Self {
        Self {
            base,
            breakpoints: BTreeMap::new(),
        }
    }

    /// The value of every key below the first breakpoint
    #[inline]
    #[must_use]
    pub fn base_value(&self) -> &V { &self.base }

    /// Number of stored breakpoints
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.breakpoints.len() }

    /// True if every key maps to the base value
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.breakpoints.is_empty() }

    /// Reset every key to the base value
    #[inline]
    pub fn clear(&mut self) { self.breakpoints.clear(); }

    #[inline]
    #[must_use]
    pub fn breakpoints(&self) -> Breakpoints<'_, K, V> { Breakpoints(self.breakpoints.iter()) }

    /// Iterate the maximal constant intervals of the map in key order
    ///
    /// The first interval is unbounded below and the last is unbounded above;
    /// together they cover the whole key space.
    #[inline]
    #[must_use]
    pub fn intervals(&self) -> Intervals<'_, K, V> { Intervals::new(self) }

    #[inline]
    #[must_use]
    pub fn into_intervals(self) -> IntoIntervals<K, V> { IntoIntervals::new(self) }

    #[inline]
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> { Values(Intervals::new(self)) }
}

#[cfg(any(test, feature = "test"))]
impl<K, V: PartialEq> CompressedIntervalMap<K, V> {
    /// Panic if the map is not in canonical form
    pub fn assert_invariants(&self) {
        let mut last = &self.base;

        for val in self.breakpoints.values() {
            assert!(val != mem::replace(&mut last, val));
        }
    }
}

impl<K: Ord, V> CompressedIntervalMap<K, V> {
    /// Get the value at `key`
    #[inline]
    pub fn lookup<Q: ?Sized + Ord>(&self, key: &Q) -> &V
    where K: Borrow<Q> {
        self.breakpoints
            .range((Bound::Unbounded, Bound::Included(key)))
            .next_back()
            .map_or(&self.base, |(_, v)| v)
    }

    /// Get the value in effect strictly below `key`
    fn lookup_before<Q: ?Sized + Ord>(&self, key: &Q) -> &V
    where K: Borrow<Q> {
        self.breakpoints
            .range((Bound::Unbounded, Bound::Excluded(key)))
            .next_back()
            .map_or(&self.base, |(_, v)| v)
    }
}

impl<K: Clone + Ord, V: Clone + PartialEq> CompressedIntervalMap<K, V> {
    pub fn from_iter_with_base<I: IntoIterator<Item = (ops::Range<K>, V)>>(
        it: I,
        base: V,
    ) -> Self {
        let mut me = Self::new(base);
        me.extend(it);
        me
    }

    fn assign_internal(&mut self, begin: K, end: K, value: V, over: &mut Vec<K>) {
        if begin >= end {
            tracing::trace!("Ignoring assignment to an empty range");
            return;
        }

        // Everything below mutates, so settle both boundary values first
        let tail = self.lookup(&end);
        let tail = (*tail != value).then(|| tail.clone());
        let insert_head = *self.lookup_before(&begin) != value;

        debug_assert!(over.is_empty());
        over.extend(
            self.breakpoints
                .range((Bound::Included(&begin), Bound::Excluded(&end)))
                .map(|(k, _)| k.clone()),
        );

        for key in over.drain(..) {
            let ok = self.breakpoints.remove(&key).is_some();
            debug_assert!(ok);
        }

        // An existing breakpoint at `end` already holds the tail value
        match tail {
            Some(tail) => {
                self.breakpoints.entry(end).or_insert(tail);
            },
            None => {
                self.breakpoints.remove(&end);
            },
        }

        if insert_head {
            let ok = self.breakpoints.insert(begin, value).is_none();
            debug_assert!(ok);
        }
    }

    /// Map every key in `begin..end` to `value`, leaving all other keys as they
    /// were
    ///
    /// Does nothing if `begin` is not less than `end`.  The base value is
    /// never modified.
    #[inline]
    pub fn assign(&mut self, begin: K, end: K, value: V) {
        self.assign_internal(begin, end, value, &mut vec![]);

        #[cfg(any(test, feature = "test"))]
        self.assert_invariants();
    }
}

impl<K: Ord + Borrow<Q>, Q: ?Sized + Ord, V> ops::Index<&Q> for CompressedIntervalMap<K, V> {
    type Output = V;

    #[inline]
    fn index(&self, key: &Q) -> &V { self.lookup(key) }
}

impl<K: Clone + Ord, V: Clone + PartialEq> Extend<(ops::Range<K>, V)>
    for CompressedIntervalMap<K, V>
{
    fn extend<T: IntoIterator<Item = (ops::Range<K>, V)>>(&mut self, it: T) {
        let mut over = vec![];

        for (ops::Range { start, end }, value) in it {
            self.assign_internal(start, end, value, &mut over);
        }

        #[cfg(any(test, feature = "test"))]
        self.assert_invariants();
    }
}

impl<K: Clone + Ord, V: Clone + Default + PartialEq> FromIterator<(ops::Range<K>, V)>
    for CompressedIntervalMap<K, V>
{
    fn from_iter<I: IntoIterator<Item = (ops::Range<K>, V)>>(it: I) -> Self {
        Self::from_iter_with_base(it, V::default())
    }
}

#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct Breakpoints<'a, K, V>(btree_map::Iter<'a, K, V>);

impl<'a, K, V> Iterator for Breakpoints<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> { self.0.next() }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K, V> DoubleEndedIterator for Breakpoints<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> { self.0.next_back() }
}

impl<K, V> ExactSizeIterator for Breakpoints<'_, K, V> {}

#[derive(Debug, Clone)]
struct IntervalsInner<'a, K, V> {
    start: Option<&'a K>,
    value: &'a V,
    iter: btree_map::Iter<'a, K, V>,
}

#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct Intervals<'a, K, V>(Option<IntervalsInner<'a, K, V>>);

impl<'a, K, V> Intervals<'a, K, V> {
    #[inline]
    fn new(map: &'a CompressedIntervalMap<K, V>) -> Self {
        Self(Some(IntervalsInner {
            start: None,
            value: &map.base,
            iter: map.breakpoints.iter(),
        }))
    }
}

impl<'a, K, V> Iterator for Intervals<'a, K, V> {
    type Item = (Interval<&'a K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let this = self.0.as_mut()?;

        Some(if let Some((end, next_val)) = this.iter.next() {
            let start = this.start.replace(end);
            let value = mem::replace(&mut this.value, next_val);
            (
                Interval {
                    start,
                    end: Some(end),
                },
                value,
            )
        } else {
            let IntervalsInner {
                start,
                value,
                iter: _,
            } = self.0.take().unwrap_or_else(|| unreachable!());
            (Interval { start, end: None }, value)
        })
    }
}

#[derive(Debug)]
struct IntoIntervalsInner<K, V> {
    start: Option<K>,
    value: V,
    iter: btree_map::IntoIter<K, V>,
}

#[derive(Debug)]
#[repr(transparent)]
pub struct IntoIntervals<K, V>(Option<IntoIntervalsInner<K, V>>);

impl<K, V> IntoIntervals<K, V> {
    #[inline]
    fn new(map: CompressedIntervalMap<K, V>) -> Self {
        Self(Some(IntoIntervalsInner {
            start: None,
            value: map.base,
            iter: map.breakpoints.into_iter(),
        }))
    }
}

impl<K: Clone, V> Iterator for IntoIntervals<K, V> {
    type Item = (Interval<K>, V);

    fn next(&mut self) -> Option<Self::Item> {
        let this = self.0.as_mut()?;

        Some(if let Some((end, next_val)) = this.iter.next() {
            let start = this.start.replace(end.clone());
            let value = mem::replace(&mut this.value, next_val);
            (
                Interval {
                    start,
                    end: Some(end),
                },
                value,
            )
        } else {
            let IntoIntervalsInner {
                start,
                value,
                iter: _,
            } = self.0.take().unwrap_or_else(|| unreachable!());
            (Interval { start, end: None }, value)
        })
    }
}

#[derive(Debug, Clone)]
pub struct Values<'a, K, V>(Intervals<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> { self.0.next().map(|(_, v)| v) }
}
