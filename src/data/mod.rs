// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from archive bytes on disk to tensor batches:
//
//   archive file
//       │
//       ▼
//   ArchiveFile       → reads the file, decodes header + payload
//       │
//       ▼
//   SampleStore       → indexed, label-aware view of the samples
//       │
//       ├──► WindowExtractor → anchored window → sub-rows / archive
//       │
//       ▼
//   Splitter          → seeded train / validation partition
//       │
//       ▼
//   EegBatcher        → stacks samples into [N, C, T] tensors
//
// Only the batcher touches Burn; the rest is plain data.

/// Binary archive codec (16-byte header, f32 payload, i32 labels)
pub mod archive;

/// Reads and writes archive files
pub mod loader;

/// Owned sample store with permuted and subset views
pub mod store;

/// First-seizure window extraction
pub mod window;

/// Builds tensor batches from sample views
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
