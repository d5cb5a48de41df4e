//! Early-stop heuristic for descending feeds.
//!
//! The posts feed is assumed (not guaranteed) to arrive newest-first. Once
//! an entire page is older than the window's start, later pages can only be
//! older still, so pagination may stop without walking the full feed. The
//! heuristic demands two consecutive qualifying pages before firing, and a
//! page whose ordering looks wrong resets the streak.
//!
//! This is best-effort: if the upstream ordering assumption is violated the
//! pipeline may silently omit in-window posts. There is deliberately no
//! correctness fallback; the page ceiling still bounds the damage.

use crate::pipeline::config::EARLY_STOP_STREAK;
use crate::pipeline::window::DateWindow;
use crate::Post;

/// Streak state across pages. One instance per export.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarlyStop {
    streak: u32,
}

impl EarlyStop {
    /// Create a fresh streak.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect one page and report whether pagination should stop.
    ///
    /// A page qualifies when its first and last parsable timestamps are
    /// non-increasing (ordering looks descending) and the last one precedes
    /// the window start. Pages where no timestamp parses have indeterminate
    /// ordering and reset the streak.
    pub fn observe_page(&mut self, posts: &[Post], window: &DateWindow) -> bool {
        let stamps: Vec<_> = posts.iter().filter_map(Post::featured_at_utc).collect();

        match (stamps.first(), stamps.last()) {
            (Some(first), Some(last)) if first >= last && *last < window.start => {
                self.streak += 1;
            }
            _ => {
                self.streak = 0;
            }
        }

        self.streak >= EARLY_STOP_STREAK
    }

    /// Current streak length, for logging.
    pub fn streak(&self) -> u32 {
        self.streak
    }
}
