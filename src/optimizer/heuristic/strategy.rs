/// Default bound on fixed-point iterations.
pub const DEFAULT_MAX_ITERATION: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOrder {
    /// Fuse a node before walking into its operands, so an outer select sees the append chain
    /// under it before that chain is flattened.
    TopDown,
    /// Fuse the operands first and the node last, so a node is only fused once everything
    /// below it is flat.
    BottomUp,
}

/// Controls how the fuser walks a tree and when it stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuseStrategy {
    pub match_order: MatchOrder,
    /// Upper bound on the number of whole-tree passes `optimize` makes.
    pub max_iteration: usize,
}

impl FuseStrategy {
    pub fn once_topdown() -> Self {
        FuseStrategy {
            match_order: MatchOrder::TopDown,
            max_iteration: 1,
        }
    }

    pub fn once_bottomup() -> Self {
        FuseStrategy {
            match_order: MatchOrder::BottomUp,
            max_iteration: 1,
        }
    }

    pub fn fix_point_topdown(max_iteration: usize) -> Self {
        FuseStrategy {
            match_order: MatchOrder::TopDown,
            max_iteration,
        }
    }

    pub fn fix_point_bottomup(max_iteration: usize) -> Self {
        FuseStrategy {
            match_order: MatchOrder::BottomUp,
            max_iteration,
        }
    }
}

impl Default for FuseStrategy {
    fn default() -> Self {
        Self::fix_point_bottomup(DEFAULT_MAX_ITERATION)
    }
}
