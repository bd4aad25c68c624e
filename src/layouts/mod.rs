mod tree;

pub use tree::{project, LayoutMode, TreeLayout};
