//! Shared, mutable market quotes.
//!
//! A [`SimpleQuote`] is a cell shared between whoever updates market data and
//! whatever reads it. Cloning the quote clones the handle, not the value, so a
//! helper set can be re-quoted in place without rebuilding its helpers.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// A shared mutable scalar quote.
///
/// ```rust
/// use parcurve_curves::quotes::SimpleQuote;
///
/// let quote = SimpleQuote::new(0.05);
/// let reader = quote.clone();
/// quote.set_value(0.051);
/// assert_eq!(reader.value(), 0.051);
/// ```
#[derive(Clone, Default)]
pub struct SimpleQuote(Arc<RwLock<f64>>);

impl SimpleQuote {
    /// Creates a quote holding `value`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        *self.0.read()
    }

    /// Replaces the value, returning the previous one.
    pub fn set_value(&self, value: f64) -> f64 {
        std::mem::replace(&mut *self.0.write(), value)
    }

    /// True when both handles point at the same cell.
    pub fn shares_cell(&self, other: &SimpleQuote) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SimpleQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SimpleQuote").field(&self.value()).finish()
    }
}

impl From<f64> for SimpleQuote {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}
