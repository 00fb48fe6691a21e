pub mod artist;
pub mod flagged;
pub mod graph;
pub mod ids;
pub mod relation;

pub use artist::Artist;
pub use flagged::{Badge, FlaggedItem, Screenshot};
pub use graph::{EdgePolicy, ExplorationPhase, GraphSnapshot, MergeOutcome, ViewportHint, merge, merge_with};
pub use ids::{ArtistId, FlaggedItemId};
pub use relation::{Relation, RelationKind};
