pub mod cursor;
pub mod expansion;
pub mod graph;
pub mod key;
pub mod seed;

pub use cursor::Cursor;
pub use cursor::CursorState;
pub use cursor::FlowDirection;
pub use cursor::SortOrder;
pub use expansion::CursorTransition;
pub use expansion::ElementsAdded;
pub use expansion::ExpansionOutcome;
pub use expansion::PlacementHint;
pub use expansion::PreconditionViolation;
pub use graph::AccountMetadata;
pub use graph::Edge;
pub use graph::FlowBatch;
pub use graph::GraphSnapshot;
pub use graph::Node;
pub use key::EdgeKey;
pub use key::NodeKey;
pub use seed::SeedInput;
