//! Arena syntax tree shared by the front end, the semantic host and lints.

pub mod format;
pub mod model;
pub mod node;

pub use model::*;
pub use node::*;
