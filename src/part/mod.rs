mod node;
mod tree;
mod ui;

pub use node::PartNode;
pub use tree::{NodeId, PartTree};
pub use ui::{PartOutline, PartSettings, COLUMN_COUNT, HEADERS, NAME_COLUMN, VISIBLE_COLUMN};
