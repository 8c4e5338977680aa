//! Interactive pose editing: widget write-back and the authoring session

pub mod session;
pub mod world_edit;

pub use session::Session;
pub use world_edit::apply_world_edit;
