//! Policy providers: the uniform interface a match is driven through.
//!
//! A provider maps a decision point to weights over the legal actions. The
//! three sources (a tabular CFR snapshot, a Deep CFR network, and a uniform
//! baseline) all implement [`PolicyProvider`], so the match loop never needs
//! to know which one sits in a seat.

use std::path::Path;

use crate::arena::game::Action;
use crate::arena::table::PolicyTable;
use crate::error::{ArenaError, ArenaResult};

/// A source of policies for one seat.
///
/// Providers are read-only once constructed and are shared across concurrent
/// matches, hence the `Send + Sync` bound.
pub trait PolicyProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Weights over `legal_actions` at the given information state.
    ///
    /// The result has the same length as `legal_actions`, is non-negative and
    /// may be unnormalized. Providers ignore whichever encoding of the
    /// information state they do not use.
    fn get_policy(
        &self,
        info_state_key: &str,
        info_state_tensor: &[f32],
        legal_actions: &[Action],
    ) -> ArenaResult<Vec<f64>>;
}

/// Scale non-negative weights so they sum to one.
///
/// Negative or non-finite weights, and weights summing to zero, are rejected.
pub fn normalize(weights: &[f64]) -> ArenaResult<Vec<f64>> {
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(ArenaError::InvalidDistribution(format!(
            "weight {} in {:?} is not a non-negative number",
            w, weights
        )));
    }
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(ArenaError::InvalidDistribution(format!(
            "weights {:?} sum to {}",
            weights, total
        )));
    }
    Ok(weights.iter().map(|&w| w / total).collect())
}

/// Provider backed by a tabular CFR snapshot.
#[derive(Debug, Clone)]
pub struct TabularPolicyProvider {
    table: PolicyTable,
}

impl TabularPolicyProvider {
    /// Wrap an already-parsed table.
    pub fn new(table: PolicyTable) -> Self {
        Self { table }
    }

    /// Load the table from a policy file.
    pub fn load<P: AsRef<Path>>(path: P) -> ArenaResult<Self> {
        Ok(Self::new(PolicyTable::load(path)?))
    }

    /// Get reference to the underlying table.
    pub fn table(&self) -> &PolicyTable {
        &self.table
    }
}

impl PolicyProvider for TabularPolicyProvider {
    fn name(&self) -> &str {
        "tabular"
    }

    fn get_policy(
        &self,
        info_state_key: &str,
        _info_state_tensor: &[f32],
        legal_actions: &[Action],
    ) -> ArenaResult<Vec<f64>> {
        let stored = self.table.get(info_state_key)?;
        if stored.len() != legal_actions.len() {
            return Err(ArenaError::PolicyMismatch {
                key: info_state_key.to_string(),
                stored: stored.len(),
                legal: legal_actions.len(),
            });
        }
        normalize(stored)
    }
}

/// Baseline provider that weights every legal action equally.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPolicyProvider;

impl UniformPolicyProvider {
    /// Create the uniform baseline.
    pub fn new() -> Self {
        Self
    }
}

impl PolicyProvider for UniformPolicyProvider {
    fn name(&self) -> &str {
        "uniform"
    }

    fn get_policy(
        &self,
        _info_state_key: &str,
        _info_state_tensor: &[f32],
        legal_actions: &[Action],
    ) -> ArenaResult<Vec<f64>> {
        let n = legal_actions.len();
        Ok(vec![1.0 / n as f64; n])
    }
}
