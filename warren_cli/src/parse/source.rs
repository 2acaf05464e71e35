//! A line-oriented, Prolog-ish surface syntax sufficient to load facts,
//! rules, operators, and methods from a file or stdin for demonstration
//! and REPL use.
//!
//! This is explicitly a CLI-local convenience, grounded in the teacher's
//! own `otter_cli::misc::load_dimacs` being a thin loader built on top of
//! the library's programmatic `add_clause`/`add_rule` API rather than a
//! general-purpose parser — `warren` itself has no text format of its
//! own (`spec.md` §1). It is not meant to parse arbitrary Prolog.
//!
//! # Accepted syntax
//!
//! One clause per `.`-terminated statement, `%` to end of line as
//! comment:
//!
//! ```text
//! human(socrates).
//! mortal(X) :- human(X).
//! operator(pick_up(X), [holding(X)], [on_table(X)]).
//! method(transport(X, Dest), [at(X, Origin)], [drive(X, Origin, Dest)], normal).
//! declare(axiom, 1).
//! ```
//!
//! Terms support atoms, variables (`X`, `_Ignored`), numbers, compounds
//! (`f(a, b)`), and lists (`[a, b, c]`, `[H|T]`). No infix operator
//! parsing: arithmetic and comparisons are written in functional notation
//! (`is(X, +(1, 2))`), matching `spec.md` §3's built-in call shapes.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use warren::plan::{HtnPlanner, MethodType};
use warren::ruleset::RuleSet;
use warren::term::{Term, TermFactory};

#[derive(Debug)]
pub struct SourceError {
    pub message: String,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SourceError {}

fn err(message: impl Into<String>) -> SourceError {
    SourceError { message: message.into() }
}

/// Loads every clause in `text` into `rules` and `planner`, interning all
/// terms through `factory`.
pub fn load_source(
    factory: &TermFactory,
    rules: &mut RuleSet,
    planner: &mut HtnPlanner,
    text: &str,
) -> Result<(), SourceError> {
    for clause_text in split_clauses(text) {
        let clause_text = clause_text.trim();
        if clause_text.is_empty() {
            continue;
        }
        load_clause(factory, rules, planner, clause_text)?;
    }
    Ok(())
}

/// Strips `%` comments and splits on top-level `.` (a `.` nested inside
/// parens/brackets does not end a clause — tracked by depth; a quoted
/// atom's contents are never treated as clause punctuation).
fn split_clauses(text: &str) -> Vec<String> {
    let mut clauses = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_quotes = false;

    for line in text.lines() {
        let line = match line.find('%') {
            Some(idx) if !in_quotes => &line[..idx],
            _ => line,
        };
        for ch in line.chars() {
            match ch {
                '\'' => in_quotes = !in_quotes,
                '(' | '[' if !in_quotes => depth += 1,
                ')' | ']' if !in_quotes => depth -= 1,
                '.' if !in_quotes && depth == 0 => {
                    clauses.push(std::mem::take(&mut current));
                    continue;
                }
                _ => {}
            }
            current.push(ch);
        }
        current.push(' ');
    }
    if !current.trim().is_empty() {
        clauses.push(current);
    }
    clauses
}

fn load_clause(
    factory: &TermFactory,
    rules: &mut RuleSet,
    planner: &mut HtnPlanner,
    clause_text: &str,
) -> Result<(), SourceError> {
    if let Some(arrow) = find_top_level(clause_text, ":-") {
        let head = parse_term(factory, &clause_text[..arrow])?;
        let tail = parse_conjunction(factory, &clause_text[arrow + 2..])?;
        warren::builder::add_rule(rules, head, tail).map_err(|e| err(e.to_string()))?;
        return Ok(());
    }

    let term = parse_term(factory, clause_text)?;
    match (term.functor(), term.arity()) {
        (Some("operator"), 3) => {
            let args = term.args();
            let add_list = args[1].list_elements().ok_or_else(|| err("operator/3's second argument must be a list"))?;
            let delete_list =
                args[2].list_elements().ok_or_else(|| err("operator/3's third argument must be a list"))?;
            planner.add_operator(args[0].clone(), add_list, delete_list, false);
        }
        (Some("method"), 4) => {
            let args = term.args();
            let condition =
                args[1].list_elements().ok_or_else(|| err("method/4's second argument must be a list"))?;
            let tasks = args[2].list_elements().ok_or_else(|| err("method/4's third argument must be a list"))?;
            let method_type = parse_method_type(&args[3])?;
            planner.add_method(args[0].clone(), condition, tasks, method_type, false);
        }
        (Some("default_method"), 4) => {
            let args = term.args();
            let condition = args[1]
                .list_elements()
                .ok_or_else(|| err("default_method/4's second argument must be a list"))?;
            let tasks =
                args[2].list_elements().ok_or_else(|| err("default_method/4's third argument must be a list"))?;
            let method_type = parse_method_type(&args[3])?;
            planner.add_method(args[0].clone(), condition, tasks, method_type, true);
        }
        _ => {
            warren::builder::add_fact(rules, term).map_err(|e| err(e.to_string()))?;
        }
    }
    Ok(())
}

fn parse_method_type(term: &Term) -> Result<MethodType, SourceError> {
    match term.functor() {
        Some("normal") => Ok(MethodType::Normal),
        Some("any_of") => Ok(MethodType::AnyOf),
        Some("all_of") => Ok(MethodType::AllOf),
        Some("else") => Ok(MethodType::Else),
        other => Err(err(format!("unknown method type `{}`", other.unwrap_or("?")))),
    }
}

/// Splits `text` on top-level `,` into a conjunction of goal terms (a
/// rule's tail, or a REPL query).
pub fn parse_conjunction(factory: &TermFactory, text: &str) -> Result<Vec<Term>, SourceError> {
    let mut goals = Vec::new();
    for part in split_top_level(text, ',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        goals.push(parse_term(factory, part)?);
    }
    Ok(goals)
}

fn find_top_level(text: &str, needle: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            _ if depth == 0 && text[i..].starts_with(needle) => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Parses exactly one term from `text` (plus surrounding whitespace),
/// interning it through `factory`.
pub fn parse_term(factory: &TermFactory, text: &str) -> Result<Term, SourceError> {
    let mut chars = text.trim().chars().peekable();
    let node = parse_node(&mut chars)?;
    skip_whitespace(&mut chars);
    if chars.peek().is_some() {
        return Err(err(format!("trailing input after term: `{text}`")));
    }
    Ok(materialize(factory, &node))
}

/// An intermediate, factory-free parse tree, so the recursive-descent
/// grammar doesn't need a `TermFactory` threaded through every call —
/// only the final materialization step does.
enum Node {
    Var(String),
    Atom(String),
    Compound(String, Vec<Node>),
    List(Vec<Node>, Option<Box<Node>>),
}

fn materialize(factory: &TermFactory, node: &Node) -> Term {
    match node {
        Node::Var(name) => factory.create_variable(name),
        Node::Atom(name) => factory.create_constant(name),
        Node::Compound(name, args) => {
            factory.create_functor(name, args.iter().map(|a| materialize(factory, a)).collect())
        }
        Node::List(elements, tail) => {
            let items: Vec<Term> = elements.iter().map(|a| materialize(factory, a)).collect();
            match tail {
                None => factory.create_list(items),
                Some(tail) => {
                    let tail_term = materialize(factory, tail);
                    items
                        .into_iter()
                        .rev()
                        .fold(tail_term, |acc, item| factory.create_functor(".", vec![item, acc]))
                }
            }
        }
    }
}

fn skip_whitespace(chars: &mut Peekable<Chars>) {
    while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
        chars.next();
    }
}

fn parse_node(chars: &mut Peekable<Chars>) -> Result<Node, SourceError> {
    skip_whitespace(chars);
    match chars.peek().copied() {
        Some('[') => parse_list(chars),
        Some('\'') => parse_quoted_atom(chars),
        Some('!') => {
            chars.next();
            Ok(Node::Atom("!".to_string()))
        }
        Some(c) if c.is_alphabetic() || c == '_' => parse_identifier_or_compound(chars),
        Some(c) if c.is_ascii_digit() || c == '-' => parse_number(chars),
        Some(c) => Err(err(format!("unexpected character `{c}` while parsing a term"))),
        None => Err(err("unexpected end of input while parsing a term")),
    }
}

fn parse_identifier_or_compound(chars: &mut Peekable<Chars>) -> Result<Node, SourceError> {
    let mut name = String::new();
    while matches!(chars.peek(), Some(c) if c.is_alphanumeric() || *c == '_') {
        name.push(chars.next().unwrap());
    }
    if name.is_empty() {
        return Err(err("expected an identifier"));
    }
    let is_variable = name.chars().next().map(|c| c == '_' || c.is_uppercase()).unwrap_or(false);

    skip_whitespace(chars);
    if chars.peek() == Some(&'(') {
        chars.next();
        let args = parse_arg_list(chars, ')')?;
        return Ok(Node::Compound(name, args));
    }

    if is_variable {
        Ok(Node::Var(name))
    } else {
        Ok(Node::Atom(name))
    }
}

fn parse_arg_list(chars: &mut Peekable<Chars>, closing: char) -> Result<Vec<Node>, SourceError> {
    let mut args = Vec::new();
    skip_whitespace(chars);
    if chars.peek() == Some(&closing) {
        chars.next();
        return Ok(args);
    }
    loop {
        args.push(parse_node(chars)?);
        skip_whitespace(chars);
        match chars.next() {
            Some(',') => continue,
            Some(c) if c == closing => break,
            Some(c) => return Err(err(format!("expected `,` or `{closing}`, found `{c}`"))),
            None => return Err(err(format!("unexpected end of input, expected `{closing}`"))),
        }
    }
    Ok(args)
}

fn parse_list(chars: &mut Peekable<Chars>) -> Result<Node, SourceError> {
    chars.next(); // consume '['
    skip_whitespace(chars);
    if chars.peek() == Some(&']') {
        chars.next();
        return Ok(Node::List(Vec::new(), None));
    }
    let mut elements = Vec::new();
    let mut tail = None;
    loop {
        elements.push(parse_node(chars)?);
        skip_whitespace(chars);
        match chars.peek().copied() {
            Some(',') => {
                chars.next();
                continue;
            }
            Some('|') => {
                chars.next();
                tail = Some(Box::new(parse_node(chars)?));
                skip_whitespace(chars);
                break;
            }
            _ => break,
        }
    }
    skip_whitespace(chars);
    match chars.next() {
        Some(']') => Ok(Node::List(elements, tail)),
        Some(c) => Err(err(format!("expected `]`, found `{c}`"))),
        None => Err(err("unexpected end of input, expected `]`")),
    }
}

fn parse_quoted_atom(chars: &mut Peekable<Chars>) -> Result<Node, SourceError> {
    chars.next(); // consume opening quote
    let mut name = String::new();
    loop {
        match chars.next() {
            Some('\'') => break,
            Some(c) => name.push(c),
            None => return Err(err("unterminated quoted atom")),
        }
    }
    Ok(Node::Atom(name))
}

fn parse_number(chars: &mut Peekable<Chars>) -> Result<Node, SourceError> {
    let mut text = String::new();
    if chars.peek() == Some(&'-') {
        text.push(chars.next().unwrap());
    }
    while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
        text.push(chars.next().unwrap());
    }
    if chars.peek() == Some(&'.') {
        let mut lookahead = chars.clone();
        lookahead.next();
        if matches!(lookahead.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(chars.next().unwrap());
            while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
                text.push(chars.next().unwrap());
            }
        }
    }
    Ok(Node::Atom(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_fact() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();
        let mut planner = HtnPlanner::new();
        load_source(&factory, &mut rules, &mut planner, "human(socrates).").unwrap();
        let expected = factory.create_functor("human", vec![factory.create_constant("socrates")]);
        assert!(rules.has_fact(&expected));
    }

    #[test]
    fn parses_a_rule_with_a_conjunctive_tail() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();
        let mut planner = HtnPlanner::new();
        load_source(&factory, &mut rules, &mut planner, "mortal(X) :- human(X), alive(X).").unwrap();
        let mut seen = Vec::new();
        rules.all_rules(|_, rule| seen.push(rule.clone()));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn parses_an_operator_declaration() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();
        let mut planner = HtnPlanner::new();
        load_source(
            &factory,
            &mut rules,
            &mut planner,
            "operator(pick_up(X), [holding(X)], [on_table(X)]).",
        )
        .unwrap();
        assert_eq!(planner.all_operators().len(), 1);
    }

    #[test]
    fn parses_a_method_declaration() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();
        let mut planner = HtnPlanner::new();
        load_source(
            &factory,
            &mut rules,
            &mut planner,
            "method(transport(X, D), [at(X, O)], [drive(X, O, D)], normal).",
        )
        .unwrap();
        assert_eq!(planner.all_methods().len(), 1);
    }

    #[test]
    fn parses_list_notation_with_a_tail() {
        let factory = TermFactory::new();
        let term = parse_term(&factory, "[a, b | T]").unwrap();
        assert_eq!(term.functor(), Some("."));
        assert_eq!(term.arity(), 2);
    }

    #[test]
    fn rejects_trailing_garbage() {
        let factory = TermFactory::new();
        assert!(parse_term(&factory, "foo(a) bar").is_err());
    }
}
