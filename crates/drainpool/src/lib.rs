#![doc = include_str!("../README.md")]

mod coordinator;
mod counter;
mod error;
mod feeder;
mod job;
pub mod pool;
mod queue;
mod signal;
mod sink;
mod work;

pub use crate::coordinator::*;
pub use crate::counter::*;
pub use crate::error::*;
pub use crate::feeder::*;
pub use crate::job::*;
pub use crate::pool::{
    manager::{PoolReport, WorkerPool},
    worker::{WorkerExit, WorkerStats, worker_loop},
};
pub use crate::queue::*;
pub use crate::signal::*;
pub use crate::sink::*;
pub use crate::work::*;
