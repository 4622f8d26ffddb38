//! Ratio (basis) curve bootstrap.
//!
//! Solves a forward ratio `r(t) = r0 + alpha * t` per instrument segment so
//! that the LIBOR-weighted average ratio over all periods up to each
//! instrument's maturity equals its par ratio. The ratio is continuous across
//! segments; `r0` is the ratio at the end of the previous segment and `t` runs
//! from the previous instrument's maturity.
//!
//! With `f_i` the LIBOR payment and `d_i` the LIBOR discount factor of
//! period `i`, instrument `n` requires
//!
//! ```text
//! R[n] * sum(i <= n) f[i] d[i] = sum(i <= n) r[i] f[i] d[i]
//! ```
//!
//! which is linear in the one unknown `alpha[n]`. Each period's ratio then
//! discounts the index leg: `P[i] = P[i-1] / (1 + r[i] f[i])`.

use std::collections::BTreeMap;

use log::debug;

use parcurve_core::Date;

use crate::error::{CurveError, CurveResult};
use crate::helpers::{Quoted, RatioHelper};
use crate::services::CurveServices;
use crate::traits::Curve;

/// One period of the segment being solved.
struct Increment {
    time: f64,
    libor_df: f64,
    libor_payment: f64,
    end: Date,
}

/// Bootstraps index-leg discount factors against `reference`.
///
/// Instruments are sorted by term. Those with at most one basis period use
/// the single-period formula from settlement; an instrument of exactly one
/// period also anchors the ratio for the next segment. A multi-period
/// instrument with no anchor before it fills its periods flat at its quote.
///
/// # Errors
///
/// `Construction` for repeated terms, an instrument adding no new periods,
/// or a zero slope factor; `InsufficientPoints` with no instruments.
pub fn bootstrap_ratio<C: Curve + ?Sized>(
    reference: &C,
    settlement: Date,
    instruments: &[&RatioHelper],
) -> CurveResult<BTreeMap<Date, f64>> {
    let mut sorted = instruments.to_vec();
    sorted.sort_by(|a, b| a.tenor().cmp_term(&b.tenor()));

    let last = sorted.last().ok_or(CurveError::InsufficientPoints {
        required: 1,
        got: 0,
    })?;
    for pair in sorted.windows(2) {
        if pair[0].term() == pair[1].term() {
            return Err(CurveError::construction(format!(
                "ratio instruments {} and {} have the same term",
                pair[0].tenor(),
                pair[1].tenor()
            )));
        }
    }

    let schedule = last.schedule(settlement)?;
    let libor_dc = RatioHelper::LIBOR_LEG_DAY_COUNT;

    let mut pvalues = BTreeMap::from([(settlement, 1.0)]);
    let mut prev_disc_libor = 0.0;
    let mut prev_disc_muni = 0.0;
    let mut prev_ratio: Option<f64> = None;
    let mut prev_n = 0_usize;
    let mut prev_maturity = settlement;
    let mut prev_pvalue = 1.0;

    for instrument in sorted {
        let par = instrument.quote_value();
        let nterm = instrument.nterm() as usize;

        if nterm <= 1 {
            let maturity = instrument.maturity(settlement)?;
            let payment = reference.forward_payment(settlement, maturity, libor_dc, 0.0)?;
            let pvalue = 1.0 / (1.0 + par * payment);
            pvalues.insert(maturity, pvalue);

            if nterm == 1 {
                let df = reference.discount(maturity, true)?;
                prev_disc_libor = df * payment;
                prev_disc_muni = df * payment * par;
                prev_ratio = Some(par);
                prev_n = 1;
                prev_maturity = maturity;
                prev_pvalue = pvalue;
            }
            debug!("ratio {} single period: df {pvalue:.10}", instrument.tenor());
            continue;
        }

        if nterm >= schedule.len() || nterm <= prev_n {
            return Err(CurveError::construction(format!(
                "ratio instrument {} adds no periods to the schedule",
                instrument.tenor()
            )));
        }

        let Some(anchor) = prev_ratio else {
            for n in prev_n + 1..=nterm {
                let (start, end) = (schedule[n - 1], schedule[n]);
                let df = reference.discount(end, true)?;
                let payment = reference.forward_payment(start, end, libor_dc, 0.0)?;
                prev_disc_libor += df * payment;
                prev_disc_muni += df * payment * par;
                prev_pvalue /= 1.0 + payment * par;
                pvalues.insert(end, prev_pvalue);
            }
            debug!("ratio {} filled flat at {par}", instrument.tenor());
            prev_ratio = Some(par);
            prev_n = nterm;
            prev_maturity = schedule[nterm];
            continue;
        };

        let mut increments = Vec::with_capacity(nterm - prev_n);
        let mut increment_discounts = 0.0;
        let mut alpha_factor = 0.0;
        for n in prev_n + 1..=nterm {
            let (start, end) = (schedule[n - 1], schedule[n]);
            let time = RatioHelper::MUNI_LEG_DAY_COUNT.year_fraction(prev_maturity, end);
            let libor_df = reference.discount(end, true)?;
            let libor_payment = reference.forward_payment(start, end, libor_dc, 0.0)?;

            prev_disc_libor += libor_df * libor_payment;
            increment_discounts += libor_df * libor_payment;
            alpha_factor += time * libor_df * libor_payment;
            increments.push(Increment {
                time,
                libor_df,
                libor_payment,
                end,
            });
        }

        if alpha_factor.abs() <= f64::EPSILON || !alpha_factor.is_finite() {
            return Err(CurveError::construction(format!(
                "zero slope factor for ratio instrument {}",
                instrument.tenor()
            )));
        }
        let alpha =
            (par * prev_disc_libor - anchor * increment_discounts - prev_disc_muni) / alpha_factor;

        let mut ratio = anchor;
        for inc in increments {
            ratio = anchor + alpha * inc.time;
            prev_disc_muni += inc.libor_df * inc.libor_payment * ratio;
            prev_pvalue /= 1.0 + inc.libor_payment * ratio;
            pvalues.insert(inc.end, prev_pvalue);
        }
        debug!(
            "ratio {} slope {alpha:.6}, end ratio {ratio:.6}",
            instrument.tenor()
        );

        prev_ratio = Some(ratio);
        prev_n = nterm;
        prev_maturity = schedule[nterm];
    }

    Ok(pvalues)
}
