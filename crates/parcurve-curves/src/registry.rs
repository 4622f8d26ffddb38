//! Named curve storage.
//!
//! Dependents hold a [`CurveKey`] rather than a curve and look the curve up
//! on every use, so a rebuild is seen by all of them without notification.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use parcurve_core::Date;

use crate::error::{CurveError, CurveResult};
use crate::ratio_curve::RatioCurve;
use crate::term_structure::TermStructureModel;

/// Key of a curve in a [`CurveRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveKey(String);

impl CurveKey {
    /// Creates a key.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurveKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Owns term structure models and ratio curves by key.
#[derive(Debug, Default)]
pub struct CurveRegistry {
    models: HashMap<CurveKey, TermStructureModel>,
    ratios: HashMap<CurveKey, RatioCurve>,
}

impl CurveRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a model, returning any model previously under the key.
    pub fn insert_model(&mut self, key: CurveKey, model: TermStructureModel) -> Option<TermStructureModel> {
        self.models.insert(key, model)
    }

    /// Stores a ratio curve, returning any curve previously under the key.
    pub fn insert_ratio(&mut self, key: CurveKey, curve: RatioCurve) -> Option<RatioCurve> {
        self.ratios.insert(key, curve)
    }

    /// Looks up a model.
    pub fn model(&self, key: &CurveKey) -> CurveResult<&TermStructureModel> {
        self.models
            .get(key)
            .ok_or_else(|| CurveError::not_found(key.as_str()))
    }

    /// Looks up a model for modification.
    pub fn model_mut(&mut self, key: &CurveKey) -> CurveResult<&mut TermStructureModel> {
        self.models
            .get_mut(key)
            .ok_or_else(|| CurveError::not_found(key.as_str()))
    }

    /// Looks up a ratio curve.
    pub fn ratio(&self, key: &CurveKey) -> CurveResult<&RatioCurve> {
        self.ratios
            .get(key)
            .ok_or_else(|| CurveError::not_found(key.as_str()))
    }

    /// Recalibrates the model under `key`, creating it if absent.
    pub fn update_model(
        &mut self,
        key: &CurveKey,
        quotes: &BTreeMap<String, f64>,
        curve_date: Option<Date>,
    ) -> CurveResult<&TermStructureModel> {
        let model = self
            .models
            .entry(key.clone())
            .or_insert_with(|| TermStructureModel::new(key.as_str()));
        model.update(quotes, curve_date)?;
        debug!("registry: {key} now at version {}", model.version());
        Ok(model)
    }

    /// Bootstraps the ratio curve under `key` against the model under
    /// `reference`, creating the ratio curve if absent.
    pub fn update_ratio(
        &mut self,
        key: &CurveKey,
        reference: &CurveKey,
        quotes: &BTreeMap<String, f64>,
    ) -> CurveResult<&RatioCurve> {
        let model = self
            .models
            .get(reference)
            .ok_or_else(|| CurveError::not_found(reference.as_str()))?;
        let curve = self
            .ratios
            .entry(key.clone())
            .or_insert_with(|| RatioCurve::new(key.as_str()));
        curve.update(model, quotes)?;
        Ok(curve)
    }

    /// Ratio curves whose reference model has been rebuilt (or removed)
    /// since they were bootstrapped.
    pub fn stale_ratios(&self) -> Vec<&CurveKey> {
        let mut stale: Vec<&CurveKey> = self
            .ratios
            .iter()
            .filter(|(_, curve)| match curve.reference() {
                Some((label, _)) => self
                    .models
                    .get(&CurveKey::new(label))
                    .map_or(true, |model| curve.is_stale(model)),
                None => true,
            })
            .map(|(key, _)| key)
            .collect();
        stale.sort();
        stale
    }

    /// Removes a model and any ratio curve stored under the same key.
    pub fn remove(&mut self, key: &CurveKey) -> bool {
        let model = self.models.remove(key).is_some();
        let ratio = self.ratios.remove(key).is_some();
        model || ratio
    }

    /// Keys of all stored models, sorted.
    pub fn model_keys(&self) -> Vec<&CurveKey> {
        let mut keys: Vec<&CurveKey> = self.models.keys().collect();
        keys.sort();
        keys
    }
}
