//! Run-level coordination of wallet scans and valuations.

pub mod reconciler;

pub use reconciler::{ReconcileError, Reconciler, ScanStats, SwapFilter, SwapMode, SwapScan};
