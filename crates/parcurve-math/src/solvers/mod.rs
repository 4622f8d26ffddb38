//! Root finding.
//!
//! The workhorse is [`secant`]: derivative-free, seeded with two guesses,
//! solving `f(x) = target`. Price-to-yield, spread, ratio, volatility and
//! bootstrap pillar solves all go through it. [`try_secant`] accepts an
//! objective that can itself fail (a curve lookup, a lattice build) and
//! propagates that error unchanged.

mod secant;

pub use secant::{secant, try_secant};

/// Default tolerance on both the value difference and the step size.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: u32 = 24;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// `f(x) - target` at the last evaluated iterate.
    pub residual: f64,
}
