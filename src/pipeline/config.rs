//! Pipeline loop constants.

/// Hard ceiling on pages fetched per export.
/// Bounds total upstream cost even when the feed misbehaves (e.g. always
/// reports another page) or the early-stop heuristic never fires.
pub const MAX_PAGES: usize = 100;

/// Consecutive fully-out-of-window, descending pages required before the
/// loop stops early. Two pages rather than one tolerates a single page whose
/// internal ordering is noisy.
pub const EARLY_STOP_STREAK: u32 = 2;
