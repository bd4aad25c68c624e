mod decode;
mod diagram;
mod draw;
mod elements;
mod graph;
mod helpers;
mod import;
mod layouts;
mod metadata;
mod settings;
mod view;

pub use self::decode::{describe, DecodeError, StateDesc};
pub use self::diagram::{Diagram, ExitGhost, PassStats, RefreshRequest};
pub use self::elements::{ActionEdge, StateNode, Visibility};
pub use self::graph::{StateTree, TreeBuilder, GOAL_NAME};
pub use self::import::{import_tree_from_str, ImportError, DEFAULT_NODE_COLOR};
pub use self::layouts::LayoutMode;
pub use self::settings::{SettingsNavigation, SettingsStyle};
pub use self::view::StatespaceView;
