//! Fixed-count runs over a fallible stream.
//!
//! A run starts at every item index `k * step` that exists and holds up to
//! `size` items, so trailing runs may be short. With `step > size` the items
//! between runs are skipped.

/// Iterator adaptor producing runs of `size` items every `step` items.
pub struct Runs<I, T> {
    input: I,
    size: usize,
    step: usize,
    buf: Vec<T>,
    /// Items to discard before the next run starts (gapped runs).
    skip: usize,
    exhausted: bool,
    done: bool,
}

impl<I, T> Runs<I, T> {
    /// # Panics
    ///
    /// Panics if `size` or `step` is zero.
    pub fn new<S, E>(input: S, size: usize, step: usize) -> Self
    where
        S: IntoIterator<IntoIter = I, Item = Result<T, E>>,
    {
        assert!(size > 0 && step > 0, "Runs: size and step must be positive");
        Self {
            input: input.into_iter(),
            size,
            step,
            buf: Vec::with_capacity(size),
            skip: 0,
            exhausted: false,
            done: false,
        }
    }
}

impl<I, T, E> Iterator for Runs<I, T>
where
    I: Iterator<Item = Result<T, E>>,
    T: Clone,
{
    type Item = Result<Vec<T>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        while self.skip > 0 && !self.exhausted {
            match self.input.next() {
                Some(Ok(_)) => self.skip -= 1,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => self.exhausted = true,
            }
        }

        while self.buf.len() < self.size && !self.exhausted {
            match self.input.next() {
                Some(Ok(v)) => self.buf.push(v),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => self.exhausted = true,
            }
        }

        if self.buf.is_empty() {
            self.done = true;
            return None;
        }

        let run = self.buf.clone();
        if self.step <= self.buf.len() {
            self.buf.drain(..self.step);
        } else {
            self.skip = self.step - self.buf.len();
            self.buf.clear();
        }
        Some(Ok(run))
    }
}
