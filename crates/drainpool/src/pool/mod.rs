//! Worker pool and the per-worker loop.
//!
//! - [`manager`] - [`WorkerPool`](manager::WorkerPool): spawn and join.
//! - [`worker`] - [`worker_loop`](worker::worker_loop): the three-way wait.

pub mod manager;
pub mod worker;
