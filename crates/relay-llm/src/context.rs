//! Size-bounded conversation window with oldest-first eviction

use std::collections::VecDeque;

use serde_json::Value;

/// Coarse size estimate used by [`ContextWindow`]
pub trait EstimateSize {
    /// Estimated size, `floor(words * 1.3)` of the textual form
    fn estimate_size(&self) -> usize;
}

impl EstimateSize for str {
    fn estimate_size(&self) -> usize {
        estimate(self)
    }
}

impl EstimateSize for String {
    fn estimate_size(&self) -> usize {
        estimate(self)
    }
}

impl EstimateSize for Value {
    fn estimate_size(&self) -> usize {
        match self {
            Value::String(text) => estimate(text),
            other => estimate(&other.to_string()),
        }
    }
}

/// `floor(words * 1.3)`, computed in integer arithmetic
pub fn estimate(text: &str) -> usize {
    text.split_whitespace().count().saturating_mul(13) / 10
}

/// What happened during one [`ContextWindow::append`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Estimated size of the appended entry
    pub size: usize,
    /// The soft budget was crossed by this append
    pub over_preferred: bool,
    /// Number of oldest entries evicted to make room
    pub evicted: usize,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    size: usize,
    value: T,
}

/// Ordered message window bounded by an estimated size
///
/// `current_size` always equals the sum of the stored entry sizes. The
/// window stays within `max_size` after every append, except when a single
/// entry is larger than `max_size` on its own: that entry is kept whole and
/// the window is left holding only it.
///
/// Not synchronized; a window belongs to one request or session.
#[derive(Debug, Clone)]
pub struct ContextWindow<T = Value> {
    entries: VecDeque<Entry<T>>,
    current_size: usize,
    max_size: usize,
    preferred_size: usize,
}

impl<T: EstimateSize> ContextWindow<T> {
    /// Create an empty window
    pub const fn new(max_size: usize, preferred_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            current_size: 0,
            max_size,
            preferred_size,
        }
    }

    /// Append a message, evicting the oldest entries while over `max_size`
    pub fn append(&mut self, message: T) -> AppendOutcome {
        let size = message.estimate_size();
        let projected = self.current_size + size;

        let over_preferred = projected > self.preferred_size;
        if over_preferred {
            tracing::warn!(
                current_size = self.current_size,
                entry_size = size,
                preferred_size = self.preferred_size,
                "context window crossed its preferred size"
            );
        }

        let mut evicted = 0;
        while self.current_size + size > self.max_size {
            let Some(oldest) = self.entries.pop_front() else {
                break;
            };
            self.current_size -= oldest.size;
            evicted += 1;
        }

        if evicted > 0 {
            tracing::info!(
                evicted,
                current_size = self.current_size,
                max_size = self.max_size,
                "evicted oldest context entries"
            );
        }

        self.entries.push_back(Entry { size, value: message });
        self.current_size += size;

        AppendOutcome {
            size,
            over_preferred,
            evicted,
        }
    }
}

impl<T> ContextWindow<T> {
    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_size = 0;
    }

    /// Held entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.value)
    }

    /// Consume the window, returning its entries oldest first
    pub fn into_entries(self) -> Vec<T> {
        self.entries.into_iter().map(|entry| entry.value).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the estimated sizes of held entries
    pub const fn current_size(&self) -> usize {
        self.current_size
    }

    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    pub const fn preferred_size(&self) -> usize {
        self.preferred_size
    }
}
