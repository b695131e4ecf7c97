// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The execution engine.
//!
//! The building blocks are [`Executor`], which runs one [`Task`](crate::task::Task) at the next
//! scheduling boundary and classifies its outcome, and [`CompositeExecutor`], which chains units
//! strictly one after another under a [`ContinuationPolicy`]. The main structure in this module is
//! [`Runner`], which assembles a [`Suite`](crate::suite::Suite) into a tree of composites and
//! drives it.

mod classify;
mod composite;
mod context;
mod executor;
mod imp;
mod options;
pub(crate) mod panic_hook;

pub use composite::*;
pub use context::*;
pub use executor::*;
pub use imp::*;
pub use options::*;
