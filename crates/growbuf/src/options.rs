/// Growth configuration shared by every owning buffer in this crate.
///
/// # Examples
///
/// ```rust
/// use growbuf::{GrowthOptions, Sequence};
///
/// let options = GrowthOptions {
///     start_capacity: 4,
///     ..Default::default()
/// };
/// let mut seq: Sequence<u32> = Sequence::with_options(options);
/// seq.push(7);
/// assert_eq!(seq.capacity(), 4);
/// ```
///
/// # Default
///
/// `start_capacity = 10`, `growth_factor = 1.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthOptions {
    /// Capacity of the first allocation made by an empty buffer.
    ///
    /// A first request larger than this is honored as-is, so a buffer
    /// always ends up with at least the capacity it was asked for.
    ///
    /// # Default
    ///
    /// `10`
    pub start_capacity: usize,

    /// Multiplier applied to the requested capacity when an allocated buffer
    /// has to grow.
    ///
    /// Factors below `1.0` (and NaN) behave like `1.0`: the buffer grows to
    /// exactly the requested capacity.
    ///
    /// # Default
    ///
    /// `1.5`
    pub growth_factor: f64,
}

impl GrowthOptions {
    /// The defaults, usable in `const` contexts.
    pub const DEFAULT: Self = Self {
        start_capacity: 10,
        growth_factor: 1.5,
    };

    /// Capacity a buffer currently holding `current` slots should grow to so
    /// that it can hold at least `min` elements.
    ///
    /// Never returns less than `current` or `min`.
    #[must_use]
    pub fn next_capacity(&self, current: usize, min: usize) -> usize {
        if current >= min {
            return current;
        }

        if current == 0 {
            return self.start_capacity.max(min);
        }

        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        // saturating float-to-int cast; NaN maps to 0
        let scaled = (min as f64 * self.growth_factor) as usize;
        min.max(scaled)
    }
}

impl Default for GrowthOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
