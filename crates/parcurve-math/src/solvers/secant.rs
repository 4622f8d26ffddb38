//! Secant root finding.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Solves `f(x) = target` by the secant method.
///
/// Always takes at least one step. Stops when `|f(x1) - target|` or the step
/// `|x_next - x1|` is within `config.tolerance`, returning the stepped iterate.
///
/// # Errors
///
/// - `ConvergenceFailed` with the last iterate after `config.max_iterations`
/// - `DivisionByZero` when the secant is flat away from the target
/// - `InvalidInput` when the seeds coincide
///
/// # Example
///
/// ```rust
/// use parcurve_math::solvers::{secant, SolverConfig};
///
/// let result = secant(|x: f64| x * x, 1.0, 2.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn secant<F>(
    mut f: F,
    x0: f64,
    x1: f64,
    target: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: FnMut(f64) -> f64,
{
    try_secant(|x| Ok::<f64, MathError>(f(x)), x0, x1, target, config)
}

/// Secant method over a fallible objective.
///
/// Errors returned by `f` are propagated as-is; solver failures are converted
/// from [`MathError`].
pub fn try_secant<F, E>(
    mut f: F,
    x0: f64,
    x1: f64,
    target: f64,
    config: &SolverConfig,
) -> Result<SolverResult, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<MathError>,
{
    if x0 == x1 || !x0.is_finite() || !x1.is_finite() {
        return Err(MathError::invalid_input(format!(
            "secant seeds must be distinct and finite: {x0}, {x1}"
        ))
        .into());
    }

    let mut x_prev = x0;
    let mut x_curr = x1;
    let mut v_prev = f(x_prev)?;
    let mut iterations = 0;

    loop {
        let v_curr = f(x_curr)?;
        let residual = v_curr - target;
        let slope = (v_curr - v_prev) / (x_curr - x_prev);

        if slope == 0.0 || !slope.is_finite() {
            if residual.abs() <= config.tolerance {
                return Ok(SolverResult {
                    root: x_curr,
                    iterations,
                    residual,
                });
            }
            return Err(MathError::DivisionByZero { value: slope }.into());
        }

        let x_next = x_curr - residual / slope;
        iterations += 1;

        if residual.abs() <= config.tolerance || (x_next - x_curr).abs() <= config.tolerance {
            return Ok(SolverResult {
                root: x_next,
                iterations,
                residual,
            });
        }
        if iterations >= config.max_iterations {
            // report the last iterate together with its own residual
            let failure = match f(x_next) {
                Ok(v_next) => MathError::convergence_failed(iterations, x_next, v_next - target),
                Err(_) => MathError::convergence_failed(iterations, x_curr, residual),
            };
            return Err(failure.into());
        }

        x_prev = x_curr;
        v_prev = v_curr;
        x_curr = x_next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let result = secant(|x: f64| x * x - 2.0, 1.0, 2.0, 0.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
        assert!(result.iterations < 15);
    }

    #[test]
    fn test_target_value() {
        let result = secant(|x: f64| x.exp(), 0.0, 1.0, 5.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 5.0_f64.ln(), epsilon = 1e-10);
    }

    #[test]
    fn test_linear_converges_in_one_step() {
        let result = secant(|x: f64| 3.0 * x + 1.0, 0.0, 1.0, 7.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_iteration_cap_reports_last_iterate() {
        // Oscillates without converging within two steps
        let config = SolverConfig::default().with_max_iterations(2);
        let err = secant(|x: f64| x.atan(), 2.0, 3.0, 0.0, &config).unwrap_err();
        match err {
            MathError::ConvergenceFailed {
                iterations,
                last,
                residual,
            } => {
                assert_eq!(iterations, 2);
                assert!(last.is_finite());
                assert_relative_eq!(residual, last.atan(), epsilon = 1e-15);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_flat_function_is_division_by_zero() {
        let err = secant(|_| 1.0, 0.0, 1.0, 2.0, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::DivisionByZero { .. }));
    }

    #[test]
    fn test_identical_seeds_rejected() {
        let err = secant(|x| x, 1.0, 1.0, 0.0, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::InvalidInput { .. }));
    }

    #[derive(Debug)]
    enum Outer {
        Lookup,
        Math(MathError),
    }

    impl From<MathError> for Outer {
        fn from(e: MathError) -> Self {
            Outer::Math(e)
        }
    }

    #[test]
    fn test_objective_errors_propagate() {
        let err = try_secant(
            |x: f64| if x > 1.5 { Err(Outer::Lookup) } else { Ok(x) },
            0.0,
            2.0,
            1.0,
            &SolverConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Outer::Lookup));

        let err = try_secant(|_| Ok::<_, Outer>(0.0), 0.0, 1.0, 1.0, &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, Outer::Math(MathError::DivisionByZero { .. })));
    }

    proptest::proptest! {
        #[test]
        fn prop_exponential_target(target in 0.05f64..20.0, x0 in -1.0f64..0.5) {
            let result = secant(f64::exp, x0, x0 + 1.0, target, &SolverConfig::default()).unwrap();
            proptest::prop_assert!((result.root.exp() - target).abs() < 1e-9 * target.max(1.0));
        }
    }
}
