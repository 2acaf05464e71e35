//! Small cross-cutting helpers that don't belong to any one module.

pub mod log;
