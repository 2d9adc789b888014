//! Domain model (revisions, lifecycle states, actions, options, errors).

pub mod revision;
pub mod action;
pub mod options;
pub mod errors;

pub use self::revision::{LifecycleState, Revision, RevisionArn};
pub use self::action::Action;
pub use self::options::RetentionOptions;
pub use self::errors::TidyError;
