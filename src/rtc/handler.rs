//! Source-lifecycle observer (spec §6.4). Must tolerate being called
//! without the source's lock held, but never reentrantly within a single
//! notification pass — callers here always finish one handler's call
//! before starting the next.

pub trait EventHandler: Send + Sync {
    fn on_unpublish(&self);
    fn on_consumers_finished(&self);
}
