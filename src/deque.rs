//! Ring-buffer deque backing the sorted-window engine.
//!
//! A fixed backing array addressed with wraparound indices. When a push
//! would overflow, capacity doubles (minimum 1) and the live elements are
//! re-linearized at physical offset 0.

use std::fmt;
use std::ops::Index;

/// Double-ended queue over a growable ring buffer.
pub struct RingDeque<T> {
    data: Vec<Option<T>>,
    start: usize,
    len: usize,
}

impl<T> Default for RingDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RingDeque<T> {
    /// Create an empty deque. No allocation happens until the first push.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            start: 0,
            len: 0,
        }
    }

    /// Create an empty deque with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut data = Vec::with_capacity(capacity);
        data.resize_with(capacity, || None);
        Self {
            data,
            start: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the backing array.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn physical(&self, i: usize) -> usize {
        (self.start + i) % self.data.len()
    }

    /// Double the backing array until `additional` more elements fit.
    fn reserve(&mut self, additional: usize) {
        let needed = self.len + additional;
        while needed > self.data.len() {
            self.grow();
        }
    }

    fn grow(&mut self) {
        let new_cap = (self.data.len() * 2).max(1);
        let mut new_data: Vec<Option<T>> = Vec::with_capacity(new_cap);
        for i in 0..self.len {
            let p = self.physical(i);
            new_data.push(self.data[p].take());
        }
        new_data.resize_with(new_cap, || None);
        self.data = new_data;
        self.start = 0;
    }

    /// Reference to the element at logical index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn get(&self, i: usize) -> &T {
        assert!(
            i < self.len,
            "RingDeque::get: index {} out of range for length {}",
            i,
            self.len
        );
        match &self.data[self.physical(i)] {
            Some(v) => v,
            None => unreachable!("RingDeque slot inside logical range is empty"),
        }
    }

    /// Overwrite the element at logical index `i`. Returns false if out of range.
    pub fn set(&mut self, i: usize, val: T) -> bool {
        if i >= self.len {
            return false;
        }
        let p = self.physical(i);
        self.data[p] = Some(val);
        true
    }

    /// Reference to the first element, if any.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        if self.len == 0 {
            None
        } else {
            Some(self.get(0))
        }
    }

    /// Reference to the last element, if any.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        if self.len == 0 {
            None
        } else {
            Some(self.get(self.len - 1))
        }
    }

    pub fn push_back(&mut self, val: T) {
        self.reserve(1);
        let p = self.physical(self.len);
        self.data[p] = Some(val);
        self.len += 1;
    }

    /// Push several values in order, reserving for the iterator's lower
    /// size bound first.
    pub fn extend_back<I: IntoIterator<Item = T>>(&mut self, vals: I) {
        let iter = vals.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower);
        for v in iter {
            self.push_back(v);
        }
    }

    pub fn push_front(&mut self, val: T) {
        self.reserve(1);
        let cap = self.data.len();
        self.start = (self.start + cap - 1) % cap;
        self.data[self.start] = Some(val);
        self.len += 1;
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let val = self.data[self.start].take();
        self.start = (self.start + 1) % self.data.len();
        self.len -= 1;
        val
    }

    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let p = self.physical(self.len - 1);
        self.len -= 1;
        self.data[p].take()
    }

    /// Remove every element, keeping the backing array.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
        self.start = 0;
    }

    /// Pop from the front while `pred` holds for the front element.
    ///
    /// Returns the number of elements removed.
    pub fn pop_front_while<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        while let Some(front) = self.front() {
            if !pred(front) {
                break;
            }
            self.pop_front();
            removed += 1;
        }
        removed
    }

    /// Iterate in logical (front to back) order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            deque: self,
            next: 0,
        }
    }
}

impl<T: Clone> RingDeque<T> {
    /// Append clones of the contents, in logical order, to `dst`.
    pub fn append_to_vec(&self, dst: &mut Vec<T>) {
        dst.reserve(self.len);
        dst.extend(self.iter().cloned());
    }
}

impl<T> Index<usize> for RingDeque<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        self.get(i)
    }
}

impl<T: fmt::Debug> fmt::Debug for RingDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Front-to-back iterator over a [`RingDeque`].
pub struct Iter<'a, T> {
    deque: &'a RingDeque<T>,
    next: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.next >= self.deque.len {
            return None;
        }
        let v = self.deque.get(self.next);
        self.next += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.deque.len - self.next;
        (rest, Some(rest))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a RingDeque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
