//! Shared test support: a minimal ground-fact loader for the bundled demo
//! programs under `programs/`, and nothing else — every scenario test
//! otherwise builds its own fixtures directly through `warren::builder`,
//! mirroring the teacher's own `otter_tests::general` keeping shared
//! infrastructure generic (directory iteration) while leaving formula
//! construction to each test.
//!
//! This loader is deliberately smaller than `warren_cli::parse::source`:
//! it accepts only ground facts (`name(arg1, arg2).` or bare atoms), no
//! variables, rules, or HTN declarations, which is all the bundled demo
//! programs need.

use std::fs;
use std::path::Path;

use warren::ruleset::RuleSet;
use warren::term::TermFactory;

/// Loads every ground fact in `path` into `rules`, returning how many
/// facts were added.
pub fn load_facts_file(factory: &TermFactory, rules: &mut RuleSet, path: &Path) -> std::io::Result<usize> {
    let text = fs::read_to_string(path)?;
    let mut count = 0;
    for clause in text.split('.') {
        let clause = clause.trim();
        if clause.is_empty() || clause.starts_with('%') {
            continue;
        }
        let term = parse_ground_fact(factory, clause);
        warren::builder::add_fact(rules, term).expect("demo program fact should be addable");
        count += 1;
    }
    Ok(count)
}

fn parse_ground_fact(factory: &TermFactory, text: &str) -> warren::term::Term {
    match text.find('(') {
        None => factory.create_constant(text.trim()),
        Some(open) => {
            let name = text[..open].trim();
            let inner = text[open + 1..].trim_end_matches(')').trim();
            let args: Vec<warren::term::Term> = inner
                .split(',')
                .map(|a| factory.create_constant(a.trim()))
                .collect();
            factory.create_functor(name, args)
        }
    }
}
