mod drawer;

pub use drawer::{diagonal, DrawContext, Drawer, ScreenTransform};
