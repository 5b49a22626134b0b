//! Random selection without replacement over a fixed pool.
//!
//! Every item is handed out once per cycle in a uniformly random order. When
//! nothing is left, `draw` returns `None` and the picker stays exhausted until
//! `reset` is called. Whether to reset automatically is up to the caller.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct ExhaustiblePicker<T, R = StdRng>
{
    items: Vec<T>,
    // Indices into `items` not yet drawn this cycle. Order is irrelevant.
    remaining: Vec<usize>,
    current: Option<usize>,
    exhausted: bool,
    rng: R,
}

impl<T: PartialEq> ExhaustiblePicker<T, StdRng>
{
    pub fn new(items: impl IntoIterator<Item = T>) -> Self
    {
        Self::with_rng(items, StdRng::from_entropy())
    }

    /// Same draw order for the same seed and pool.
    pub fn seeded(items: impl IntoIterator<Item = T>, seed: u64) -> Self
    {
        Self::with_rng(items, StdRng::seed_from_u64(seed))
    }
}

impl<T: PartialEq, R: Rng> ExhaustiblePicker<T, R>
{
    /// Builds a picker over `items`, keeping the first occurrence of any
    /// repeated item so the pool stays distinct.
    pub fn with_rng(items: impl IntoIterator<Item = T>, rng: R) -> Self
    {
        let mut pool: Vec<T> = Vec::new();
        for (position, item) in items.into_iter().enumerate() {
            if pool.contains(&item) {
                tracing::warn!(position, "dropping duplicate item from picker pool");
                continue;
            }
            pool.push(item);
        }

        let remaining = (0..pool.len()).collect();
        Self {
            items: pool,
            remaining,
            current: None,
            exhausted: false,
            rng,
        }
    }
}

impl<T, R: Rng> ExhaustiblePicker<T, R>
{
    /// Removes and returns a uniformly chosen item that has not been drawn in
    /// the current cycle, or `None` once every item has been drawn.
    pub fn draw(&mut self) -> Option<&T>
    {
        if self.remaining.is_empty() {
            if !self.exhausted {
                tracing::debug!(pool = self.items.len(), "picker exhausted");
            }
            self.exhausted = true;
            return None;
        }

        let slot = self.rng.gen_range(0..self.remaining.len());
        let index = self.remaining.swap_remove(slot);
        self.current = Some(index);
        self.items.get(index)
    }
}

impl<T, R> ExhaustiblePicker<T, R>
{
    /// Starts a new cycle over the full pool. `current` is left as is.
    pub fn reset(&mut self)
    {
        tracing::debug!(
            pool = self.items.len(),
            drawn = self.drawn(),
            "picker reset"
        );
        self.remaining.clear();
        self.remaining.extend(0..self.items.len());
        self.exhausted = false;
    }

    pub fn is_exhausted(&self) -> bool
    {
        self.exhausted
    }

    /// The item returned by the last successful draw.
    pub fn current(&self) -> Option<&T>
    {
        self.current.and_then(|index| self.items.get(index))
    }

    pub fn remaining(&self) -> usize
    {
        self.remaining.len()
    }

    pub fn drawn(&self) -> usize
    {
        self.items.len() - self.remaining.len()
    }

    pub fn len(&self) -> usize
    {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T]
    {
        &self.items
    }
}
