pub mod graph;
pub mod merge;
pub mod pagination;

pub use graph::GraphStore;
pub use merge::DiffMerger;
pub use merge::MergedElements;
pub use pagination::PaginationTracker;
