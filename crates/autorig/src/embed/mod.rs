//! Discrete embedding: matching compressed joints to sphere-graph vertices.
//!
//! Purpose
//! - Assign one vertex of the proximity graph to every compressed joint so
//!   that the weighted penalty sum stays below 1, then reconstruct positions
//!   for the full skeleton along graph shortest paths.
//!
//! Why this design
//! - Best-first search over assignment prefixes ordered by penalty plus an
//!   admissible-in-practice lookahead over already-reachable joints. The
//!   frontier is a `BinaryHeap<PartialMatch>`; the concurrent mode shares
//!   that heap between scoped worker threads.
//! - Penalty terms are an enum with one evaluator each, so ablations can
//!   zero a single weight without touching the search.
//!
//! References
//! - Baran & Popović, "Automatic Rigging and Animation of 3D Characters",
//!   SIGGRAPH 2007, §3.

mod paths;
mod penalty;
mod possibilities;
mod search;
mod split;
mod types;

pub use paths::AllShortestPaths;
pub use penalty::{compute_penalty, Penalty, PenaltyCtx};
pub use possibilities::{compute_possibilities, fat_vertices, limb_vertices};
pub use search::{discrete_embed, search};
pub use split::{split_path, split_paths};
pub use types::{PartialMatch, PenaltyWeights, SearchCfg, SearchMode, SearchStats};
