//! The unit of work.
//!
//! A [`UnitOfWork`] tracks registered entities between construction and
//! commit:
//! - **Registration** records a baseline snapshot per live instance
//! - **Classification** derives each entity's [`EntityState`] on demand
//! - **Commit** dispatches one command per changed entity, all or nothing
//! - **Rollback** restores every live entity from its baseline in place

mod engine;
mod state;
mod tables;

pub use engine::{CommitOutcome, CommitReport, UnitOfWork, UnitOfWorkId};
pub use state::EntityState;
