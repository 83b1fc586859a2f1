//! Request dispatch: the core context, the queue consumer, and the handler
//! workers.

pub(crate) mod context;
mod dispatcher;
pub(crate) mod handlers;

pub use context::{Core, Signals};
