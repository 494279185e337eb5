// ============================================================
// Layer 4 — Regression Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<RegressionSample>
// into backend-ready tensors.
//
// What is a Batcher?
//   A Batcher takes a list of individual samples and stacks
//   them into a single batch tensor. Mini-batch gradient descent
//   wants many rows per forward pass, not one.
//
// How batching works here:
//   Input:  Vec of N RegressionSamples, each with D features
//   Output: RegressionBatch with a [N, D] feature tensor
//           and a [N, 1] target tensor
//
//   We flatten all features into one long Vec, then reshape:
//   [r1_f1, ..., r1_fD, r2_f1, ..., rN_fD] → [N, D]
//
// Why is this easy here?
//   Because every row has the same width — the feature matrix
//   enforced that when it was built. No padding needed.
//
// The targets get an explicit trailing dimension ([N, 1] rather
// than [N]) so they line up with the model output without a
// broadcast surprise inside the loss.
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::RegressionSample;

// ─── RegressionBatch ──────────────────────────────────────────────────────────
/// A batch of rows ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
///
/// B is the Burn Backend (e.g. NdArray, Wgpu) —
/// generic so the same batcher works on any device.
#[derive(Debug, Clone)]
pub struct RegressionBatch<B: Backend> {
    /// Scaled feature rows — shape: [batch_size, n_features]
    pub features: Tensor<B, 2>,

    /// Raw targets — shape: [batch_size, 1]
    pub targets: Tensor<B, 2>,
}

// ─── RegressionBatcher ────────────────────────────────────────────────────────
/// The batcher struct — holds the target device so tensors
/// are created in the correct place.
#[derive(Clone, Debug)]
pub struct RegressionBatcher<B: Backend> {
    /// The device to create tensors on
    pub device: B::Device,
}

impl<B: Backend> RegressionBatcher<B> {
    /// Create a new batcher for the given device
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// This is what makes RegressionBatcher work with Burn's DataLoader.
// The DataLoader calls .batch(items) with each mini-batch of samples.
impl<B: Backend> Batcher<RegressionSample, RegressionBatch<B>> for RegressionBatcher<B> {
    /// Convert a Vec of RegressionSamples into a single RegressionBatch.
    ///
    /// Steps:
    ///   1. Flatten all feature rows into one Vec<f32>
    ///   2. Create a 1D tensor from the flat Vec
    ///   3. Reshape to [batch_size, n_features]
    ///   4. Do the same for targets, reshaped to [batch_size, 1]
    fn batch(&self, items: Vec<RegressionSample>) -> RegressionBatch<B> {
        let batch_size = items.len();
        // All rows have the same width (checked at matrix construction)
        let n_features = items[0].features.len();

        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let targets_flat: Vec<f32> = items.iter().map(|s| s.target).collect();

        let features = Tensor::<B, 1>::from_floats(
            features_flat.as_slice(), &self.device
        ).reshape([batch_size, n_features]);

        let targets = Tensor::<B, 1>::from_floats(
            targets_flat.as_slice(), &self.device
        ).reshape([batch_size, 1]);

        RegressionBatch { features, targets }
    }
}
