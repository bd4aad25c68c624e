mod edge;
mod node;

pub use edge::ActionEdge;
pub use node::{StateNode, Visibility};
