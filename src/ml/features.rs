//! Sparse feature vectors produced by the vectorizer.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimenError};

/// A sparse vector: a fixed dimension plus `(index, value)` pairs sorted by
/// index with no duplicates and no explicit zeros.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// An all-zero vector.
    pub fn zeros(dim: usize) -> Self {
        FeatureVector {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build from unordered entries. Values at the same index are summed and
    /// zeros are dropped.
    pub fn from_entries(dim: usize, mut entries: Vec<(usize, f64)>) -> Result<Self> {
        if let Some(&(index, _)) = entries.iter().find(|(index, _)| *index >= dim) {
            return Err(SentimenError::encoding(format!(
                "feature index {index} out of range for dimension {dim}"
            )));
        }

        entries.sort_by_key(|(index, _)| *index);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == index => last.1 += value,
                _ => merged.push((index, value)),
            }
        }
        merged.retain(|(_, value)| *value != 0.0);

        Ok(FeatureVector {
            dim,
            entries: merged,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Dot product with a dense weight row of the same dimension.
    pub fn dot(&self, weights: &[f64]) -> Result<f64> {
        self.check_dim(weights.len())?;
        Ok(self.iter().map(|(index, value)| value * weights[index]).sum())
    }

    /// Divide every value by `norm`; a zero norm leaves the vector unchanged.
    pub fn scale(&mut self, norm: f64) {
        if norm > 0.0 {
            for (_, value) in &mut self.entries {
                *value /= norm;
            }
        }
    }

    pub fn l1_norm(&self) -> f64 {
        self.iter().map(|(_, value)| value.abs()).sum()
    }

    pub fn l2_norm(&self) -> f64 {
        self.iter().map(|(_, value)| value * value).sum::<f64>().sqrt()
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for (index, value) in self.iter() {
            dense[index] = value;
        }
        dense
    }

    /// Fail unless this vector has exactly `expected` dimensions.
    pub fn check_dim(&self, expected: usize) -> Result<()> {
        if self.dim != expected {
            return Err(SentimenError::model(format!(
                "expected {expected} features, got {}",
                self.dim
            )));
        }
        Ok(())
    }
}
