//! Relay core: event types, outgoing commands, the command table, and the
//! dispatcher loop that ties the listeners to the IRC session.

pub mod action;
pub mod dispatcher;
pub mod event;
pub mod handler;
pub mod state;

/// Capacity of every queue between tasks. Producers wait when a queue is full.
pub const QUEUE_CAPACITY: usize = 1000;
