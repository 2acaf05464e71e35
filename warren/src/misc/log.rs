//! Log target documentation.
//!
//! This crate never installs a logger; it only calls [`log::trace!`],
//! [`log::debug!`], and [`log::warn!`] against the targets below. A host
//! that enables them (e.g. via `env_logger` with `RUST_LOG=warren::resolve=trace`)
//! gets a blow-by-blow account of the search; a host that does nothing pays
//! for none of it once logging is compiled out via the `log` crate's
//! `release_max_level_off` feature.
//!
//! | target | what it reports |
//! |---|---|
//! | `warren::term::intern` | interning-table growth, string pool insertions |
//! | `warren::ruleset` | fact assert/retract, base lock-on-copy |
//! | `warren::unify` | each unification attempt's outcome |
//! | `warren::resolve` | node push/pop, rule selection, cut-fence unwinding |
//! | `warren::resolve::builtins` | built-in predicate dispatch and outcome |
//! | `warren::plan` | task decomposition, method selection, backtrack |
