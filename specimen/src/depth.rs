//! Recursion depth accounting for composite type graphs.

/// An immutable depth counter threaded through every recursive call.
///
/// The guard is copied, never shared: each composite descent produces a new
/// guard via [`descend`](RecursionGuard::descend), so sibling branches always
/// observe independent depth. Depth is monotonically non-decreasing along any
/// root-to-leaf chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursionGuard {
    depth: usize,
    limit: usize,
}

impl RecursionGuard {
    /// Create a guard at the root of a generation call
    pub fn new(limit: usize) -> Self {
        Self { depth: 0, limit }
    }

    /// Current depth (count of composite boundaries from the root)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Configured depth limit
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// A guard one composite boundary deeper
    pub fn descend(&self) -> Self {
        Self {
            depth: self.depth + 1,
            limit: self.limit,
        }
    }

    /// Whether descent past this point must stop producing nested nodes.
    ///
    /// Optional and collection carriers consult this to force absent/empty
    /// values, which terminates self-referential and mutually-referential
    /// type graphs at a deterministic chain length.
    pub fn exhausted(&self) -> bool {
        self.depth > self.limit
    }
}
