//! Shared value types: the error taxonomy and small index newtypes used
//! across the term store, rule database, resolver, and planner.

pub mod err;
