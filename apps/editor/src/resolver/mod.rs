//! Document resolution — deciding which content populates the editor,
//! tracking the provenance of what is loaded, and keeping the local draft
//! cache consistent with edits and explicit actions.

pub mod actions;
pub mod draft;
pub mod handlers;
pub mod naming;
pub mod persistence;
pub mod session;
pub mod startup;
pub mod templates;
