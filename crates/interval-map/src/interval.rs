use std::fmt;

/// A half-open interval `[start, end)` of a key space
///
/// A missing `start` extends the interval down to the bottom of the key space,
/// and a missing `end` extends it to the top.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval<T> {
    pub start: Option<T>,
    pub end: Option<T>,
}

impl<T: fmt::Debug> fmt::Debug for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.start, &self.end) {
            (None, None) => fmt::Debug::fmt(&(..), f),
            (None, Some(e)) => fmt::Debug::fmt(&(..e), f),
            (Some(s), None) => fmt::Debug::fmt(&(s..), f),
            (Some(s), Some(e)) => fmt::Debug::fmt(&(s..e), f),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        match self.start {
            Some(ref s) => write!(f, "{s}")?,
            None => f.write_str("-inf")?,
        }
        f.write_str(", ")?;
        match self.end {
            Some(ref e) => write!(f, "{e}")?,
            None => f.write_str("+inf")?,
        }
        f.write_str(")")
    }
}

impl<T> From<std::ops::Range<T>> for Interval<T> {
    #[inline]
    fn from(std::ops::Range { start, end }: std::ops::Range<T>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }
}

impl<T> Interval<T> {
    #[must_use]
    pub const fn full() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn bounds(self) -> (Option<T>, Option<T>) { (self.start, self.end) }
}

impl<T: Ord> Interval<T> {
    /// Returns true if `key` lies within this interval
    pub fn contains(&self, key: &T) -> bool {
        self.start.as_ref().is_none_or(|s| s <= key) && self.end.as_ref().is_none_or(|e| key < e)
    }
}

impl<T: Copy> Interval<&T> {
    #[must_use]
    pub fn copied(self) -> Interval<T> {
        let Self { start, end } = self;
        Interval {
            start: start.copied(),
            end: end.copied(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn contains_respects_half_open_bounds() {
        let i = Interval::from(3..5);
        assert!(!i.contains(&2));
        assert!(i.contains(&3));
        assert!(i.contains(&4));
        assert!(!i.contains(&5));

        let below = Interval {
            start: None,
            end: Some(0),
        };
        assert!(below.contains(&i32::MIN));
        assert!(!below.contains(&0));

        assert!(Interval::<i32>::full().contains(&i32::MAX));
    }

    #[test]
    fn formatting() {
        assert_eq!(format!("{:?}", Interval::from(1..4)), "1..4");
        assert_eq!(
            format!("{:?}", Interval {
                start: Some(2),
                end: None,
            }),
            "2.."
        );
        assert_eq!(format!("{:?}", Interval::<u8>::full()), "..");
        assert_eq!(
            Interval {
                start: None,
                end: Some(7),
            }
            .to_string(),
            "[-inf, 7)"
        );
    }
}
