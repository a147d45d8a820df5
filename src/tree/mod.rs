//! Directory snapshots: building trees from the filesystem and listing them

mod builder;
mod reader;

pub use builder::TreeBuilder;
pub use reader::{TreeItem, TreeReader};
