// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code, plus the
// evaluation math that consumes model outputs. No other layer
// imports from burn directly — only this one.
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - Other layers are testable without a tensor backend
//   - The model architecture is clearly separated from
//     data loading and application logic
//
// What's in this layer:
//
//   model.rs      — The MLP regressor architecture
//                   Two ReLU hidden layers with dropout and a
//                   single-unit output head
//
//   loss.rs       — Region-weighted MSE criterion
//                   Squared error scaled by which scoring band
//                   the target falls in (stars / middle / bench)
//
//   trainer.rs    — The training loop
//                   Handles forward pass, loss computation,
//                   backward pass, optimiser step, and saving
//                   the checkpoint on validation improvement
//
//   predictor.rs  — The inference engine
//                   Loads the best checkpoint and scores whole
//                   feature matrices without gradient tracking
//
//   metrics.rs    — RMSE / MAE / R², Pearson correlations and
//                   the distribution-overlap measure, on slices
//
//   importance.rs — Permutation feature importance over any
//                   PointsPredictor
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Kingma & Ba (2015) Adam
//            Breiman (2001) Random Forests

/// MLP regressor model architecture
pub mod model;

/// Region-weighted MSE loss criterion
pub mod loss;

/// Full training loop with validation and best-checkpointing
pub mod trainer;

/// Inference engine — loads the best checkpoint and predicts scores
pub mod predictor;

/// Regression metrics and the distribution-overlap measure
pub mod metrics;

/// Permutation feature importance
pub mod importance;
