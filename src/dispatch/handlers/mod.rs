//! Handler workers, one per request category.
//!
//! Every handler follows the same loop shape: snapshot its signal epoch,
//! try to claim work under the table lock, process one request, and only
//! wait when nothing was pending. Requests of the same kind are served
//! most-recent first, and every claimed request is consumed before the
//! handler waits again.

pub(crate) mod canceller;
pub(crate) mod changer;
pub(crate) mod starter;
pub(crate) mod suspender;
pub(crate) mod viewer;
