//! Binomial tree for interest rate modeling.
//!
//! Provides a recombining binomial tree of short rates, fitted exactly to a
//! discount curve, and backward induction for cash flow streams with
//! Bermudan call rights.

/// A binomial interest rate tree.
///
/// The tree represents possible short rate paths over time, with each node
/// containing a short rate and transition probabilities to the next period.
///
/// # Structure
///
/// At time step `i`, there are `i + 1` possible states (nodes).
/// State `j` at time `i` is accessed via `rates[i][j]`; an up move from
/// `(i, j)` leads to `(i + 1, j + 1)`, a down move to `(i + 1, j)`.
///
/// ```text
///                    [0,0]
///                   /     \
///              [1,1]       [1,0]
///             /    \      /    \
///         [2,2]   [2,1]  [2,1]  [2,0]
/// ```
///
/// # Usage
///
/// ```rust
/// use parcurve_bonds::options::BinomialTree;
///
/// let mut tree = BinomialTree::new(2, 0.5);
/// for i in 0..=2 {
///     for j in 0..=i {
///         tree.set_rate(i, j, 0.04);
///     }
/// }
///
/// // Zero-coupon bond paying 100 in one year
/// let pv = tree.value_cash_flows(&[(1.0, 100.0)], 0.0);
/// assert!((pv - 100.0 * (-0.04_f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct BinomialTree {
    /// Number of time steps in the tree.
    pub steps: usize,

    /// Time step size in years.
    pub dt: f64,

    /// Short rates at each node.
    /// `rates[i][j]` = short rate at time step `i`, state `j`.
    /// Dimensions: (steps + 1) x (step + 1).
    pub rates: Vec<Vec<f64>>,

    /// Transition probabilities at each node.
    /// `probabilities[i][j]` = (prob_up, prob_down) from node (i,j).
    /// Dimensions: steps x (step + 1).
    pub probabilities: Vec<Vec<(f64, f64)>>,
}

impl BinomialTree {
    /// Creates a new binomial tree with the given parameters.
    ///
    /// # Arguments
    ///
    /// * `steps` - Number of time steps
    /// * `dt` - Time step size in years
    #[must_use]
    pub fn new(steps: usize, dt: f64) -> Self {
        let mut rates = Vec::with_capacity(steps + 1);
        let mut probabilities = Vec::with_capacity(steps);

        for i in 0..=steps {
            rates.push(vec![0.0; i + 1]);
        }

        for i in 0..steps {
            probabilities.push(vec![(0.5, 0.5); i + 1]);
        }

        Self {
            steps,
            dt,
            rates,
            probabilities,
        }
    }

    /// Returns the short rate at the given time step and state.
    ///
    /// # Panics
    ///
    /// Panics if `time_step > steps` or `state > time_step`.
    #[must_use]
    pub fn rate_at(&self, time_step: usize, state: usize) -> f64 {
        self.rates[time_step][state]
    }

    /// Sets the short rate at the given time step and state.
    ///
    /// # Panics
    ///
    /// Panics if `time_step > steps` or `state > time_step`.
    pub fn set_rate(&mut self, time_step: usize, state: usize, rate: f64) {
        self.rates[time_step][state] = rate;
    }

    /// One-period discount factor from a node, with a spread over the short rate.
    ///
    /// DF = exp(-(r + spread) * dt)
    #[must_use]
    pub fn discount_factor(&self, time_step: usize, state: usize, spread: f64) -> f64 {
        let rate = self.rates[time_step][state] + spread;
        (-rate * self.dt).exp()
    }

    /// Returns the number of states at the given time step.
    #[must_use]
    pub fn states_at(&self, time_step: usize) -> usize {
        time_step + 1
    }

    /// Returns the probability of an up move from the given node.
    #[must_use]
    pub fn prob_up(&self, time_step: usize, state: usize) -> f64 {
        if time_step >= self.steps {
            return 0.5;
        }
        self.probabilities[time_step][state].0
    }

    /// Returns the probability of a down move from the given node.
    #[must_use]
    pub fn prob_down(&self, time_step: usize, state: usize) -> f64 {
        if time_step >= self.steps {
            return 0.5;
        }
        self.probabilities[time_step][state].1
    }

    /// Returns the time in years at the given time step.
    #[must_use]
    pub fn time_at_step(&self, time_step: usize) -> f64 {
        time_step as f64 * self.dt
    }

    /// Returns the total horizon in years.
    #[must_use]
    pub fn maturity(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    /// Nearest time step to `t`, clamped to the tree.
    #[must_use]
    pub fn step_of(&self, t: f64) -> usize {
        if self.dt <= 0.0 || t <= 0.0 {
            return 0;
        }
        ((t / self.dt).round() as usize).min(self.steps)
    }

    /// Arrow-Debreu prices at every step: the value today of 1 paid at node `(i, j)`.
    #[must_use]
    pub fn state_prices(&self) -> Vec<Vec<f64>> {
        let mut prices = vec![vec![1.0]];
        for i in 0..self.steps {
            let mut next = vec![0.0; i + 2];
            for (j, q) in prices[i].iter().enumerate() {
                let df = self.discount_factor(i, j, 0.0);
                next[j + 1] += q * self.prob_up(i, j) * df;
                next[j] += q * self.prob_down(i, j) * df;
            }
            prices.push(next);
        }
        prices
    }

    /// Discounts node values at step `i + 1` back to step `i`.
    ///
    /// `next` must hold `i + 2` values.
    #[must_use]
    pub fn rollback(&self, i: usize, next: &[f64], spread: f64) -> Vec<f64> {
        (0..=i)
            .map(|j| {
                let df = self.discount_factor(i, j, spread);
                df * (self.prob_up(i, j) * next[j + 1] + self.prob_down(i, j) * next[j])
            })
            .collect()
    }

    /// Present value of `(time, amount)` cash flows.
    ///
    /// Flows are placed on their nearest step; flows at step 0 are ignored.
    #[must_use]
    pub fn value_cash_flows(&self, flows: &[(f64, f64)], spread: f64) -> f64 {
        self.value_call(flows, &[], spread).0
    }

    /// Values cash flows and a Bermudan right to buy them at a strike.
    ///
    /// `exercises` holds `(time, strike)` pairs. On exercise the holder pays the
    /// strike and receives every flow after the exercise step. Returns
    /// `(underlying, option)` present values.
    #[must_use]
    pub fn value_call(&self, flows: &[(f64, f64)], exercises: &[(f64, f64)], spread: f64) -> (f64, f64) {
        let n = self.steps;
        let mut cash = vec![0.0; n + 1];
        for &(t, amount) in flows {
            cash[self.step_of(t)] += amount;
        }
        let mut strikes: Vec<Option<f64>> = vec![None; n + 1];
        for &(t, strike) in exercises {
            let step = self.step_of(t);
            if step < n {
                strikes[step] = Some(strike);
            }
        }

        // Values at each node of the flows strictly after the step
        let mut underlying = vec![0.0; n + 1];
        let mut option = vec![0.0; n + 1];
        for i in (0..n).rev() {
            let with_cash: Vec<f64> = underlying.iter().map(|v| v + cash[i + 1]).collect();
            underlying = self.rollback(i, &with_cash, spread);
            option = self.rollback(i, &option, spread);
            if let Some(strike) = strikes[i] {
                for (o, u) in option.iter_mut().zip(&underlying) {
                    *o = o.max(u - strike);
                }
            }
        }

        (underlying[0], option[0])
    }
}
