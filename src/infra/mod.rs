// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles all cross-cutting concerns that don't belong in
// any specific business layer:
//
//   checkpoint.rs    — Saving and loading model weights
//                      Uses Burn's CompactRecorder to
//                      serialise model parameters to disk.
//                      Also saves/loads TrainConfig as JSON
//                      so evaluation can rebuild the model.
//
//   scaler_store.rs  — Feature scaler persistence
//                      Saves the fitted StandardScaler as JSON
//                      next to the checkpoint. Ensures inputs
//                      are standardised identically at training
//                      and evaluation time.
//
//   metrics.rs       — Training metrics logging
//                      Writes epoch-level metrics (train loss,
//                      validation loss) to a CSV file for later
//                      analysis, plus the checkpoint decision.
//
//   plot.rs          — Diagnostic chart rendering
//                      Draws the evaluation PNGs (scatter,
//                      importance bars, correlation heatmap,
//                      distribution curves) with plotters.
//
// Why is this a separate layer?
//   These concerns are used by multiple other layers but
//   don't belong to any one of them. Keeping them here:
//   - Prevents duplication across layers
//   - Makes it easy to swap implementations
//     (e.g. swap file checkpoints for S3 cloud storage)
//   - Keeps other layers focused on their core logic
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Feature scaler saving and loading
pub mod scaler_store;

/// Training metrics CSV logger
pub mod metrics;

/// Evaluation chart rendering
pub mod plot;
