//! Renderers: turn a LayoutResult into a scene graph.

pub mod ids;
pub mod palette;
pub mod scene;
pub mod synth;

pub use scene::{Binding, BoundKind, BoundRef, Element, ElementBody, Role, Scene, TextDescriptor};
pub use synth::{reconcile_bindings, synthesize};
