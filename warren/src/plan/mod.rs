/*!
The HTN planner: an iterative task-decomposition engine layered on the
[resolver](crate::resolve).

[`HtnPlanner`] holds a domain (declared [`Operator`]s and [`Method`]s) plus
the single [`GoalResolver`](crate::resolve::GoalResolver) it reuses for
every method condition and axiom check (`spec.md` §4.5). [`HtnPlanner::find_all_plans`]
runs a pre-planning sanity pass over the domain (`spec.md` §4.5's "Task Not
Found"/"Task Loop" checks) before handing off to [`engine::run`], the
iterative, explicit-stack search described in that module's docs.
*/

mod method;
mod node;
pub(crate) mod engine;
mod operator;

pub use method::{Method, MethodType};
pub use node::PlanState;
pub use operator::Operator;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::reports::{PlanDiagnostics, PlanSolution};
use crate::resolve::GoalResolver;
use crate::ruleset::RuleSet;
use crate::term::{Term, TermFactory};
use crate::types::err::{ErrorKind, PlanFailure};

/// The HTN planner. Holds the declared domain (operators and methods) and
/// the resolver it delegates every condition check to; stateless beyond
/// that and the abort flag, so one planner can serve repeated plan
/// searches against any number of rulesets.
pub struct HtnPlanner {
    operators: Vec<Operator>,
    methods: Vec<Method>,
    resolver: GoalResolver,
    abort: Arc<AtomicBool>,
    next_document_order: u64,
}

impl Default for HtnPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl HtnPlanner {
    pub fn new() -> Self {
        Self {
            operators: Vec::new(),
            methods: Vec::new(),
            resolver: GoalResolver::new(),
            abort: Arc::new(AtomicBool::new(false)),
            next_document_order: 0,
        }
    }

    pub fn with_resolver(resolver: GoalResolver) -> Self {
        Self {
            operators: Vec::new(),
            methods: Vec::new(),
            resolver,
            abort: Arc::new(AtomicBool::new(false)),
            next_document_order: 0,
        }
    }

    pub fn add_operator(&mut self, head: Term, add_list: Vec<Term>, delete_list: Vec<Term>, hidden: bool) {
        log::debug!(target: "warren::plan", "declared operator `{head}`");
        self.operators.push(Operator { head, add_list, delete_list, hidden });
    }

    pub fn add_method(
        &mut self,
        head: Term,
        condition: Vec<Term>,
        tasks: Vec<Term>,
        method_type: MethodType,
        is_default: bool,
    ) {
        let document_order = self.next_document_order;
        self.next_document_order += 1;
        log::debug!(target: "warren::plan", "declared method `{head}` ({method_type:?})");
        self.methods.push(Method { head, condition, tasks, method_type, is_default, document_order });
    }

    pub fn all_operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn all_methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn goal_resolver(&self) -> &GoalResolver {
        &self.resolver
    }

    pub(crate) fn abort_handle(&self) -> &Arc<AtomicBool> {
        &self.abort
    }

    /// Requests graceful termination of any plan search currently in
    /// flight on another thread; polled once per outer-loop iteration
    /// (`spec.md` §5). Does not reset automatically — a fresh search
    /// against this planner will also observe a set flag unless the host
    /// calls [`HtnPlanner::reset_abort`] first.
    pub fn abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    pub fn reset_abort(&self) {
        self.abort.store(false, Ordering::Relaxed);
    }

    /// Runs the pre-planning sanity pass described in `spec.md` §4.5: every
    /// task name/arity referenced anywhere in a method's task list must
    /// resolve to a declared operator, a declared method, or a
    /// `declare(name, arity)` fact in `initial_state`; and the method
    /// call graph (method head -> task names its task list references)
    /// must be acyclic.
    fn check_domain_sanity(&self, factory: &TermFactory, initial_state: &RuleSet) -> Result<(), PlanFailure> {
        let known: HashSet<(String, usize)> = self
            .operators
            .iter()
            .map(Operator::head_signature)
            .chain(self.methods.iter().map(Method::head_signature))
            .map(|(name, arity)| (name.to_string(), arity))
            .collect();

        for method in &self.methods {
            for task in &method.tasks {
                self.check_task_reference(factory, initial_state, task, &known)?;
            }
        }

        self.check_for_cycles()?;
        Ok(())
    }

    fn check_task_reference(
        &self,
        factory: &TermFactory,
        initial_state: &RuleSet,
        task: &Term,
        known: &HashSet<(String, usize)>,
    ) -> Result<(), PlanFailure> {
        // `try(...)`'s inner tasks are not a task reference themselves; the
        // sanity pass does not descend into them since their content is
        // only known once the wrapped list is a concrete term at search
        // time (it may be built from variables bound elsewhere).
        if task.functor() == Some("try") && task.arity() == 1 {
            return Ok(());
        }
        let Some(name) = task.functor() else { return Ok(()) };
        let arity = task.arity();
        if known.contains(&(name.to_string(), arity)) {
            return Ok(());
        }
        let declare = factory.create_functor(
            "declare",
            vec![factory.create_constant(name), factory.create_constant(&arity.to_string())],
        );
        if initial_state.has_fact(&declare) {
            return Ok(());
        }
        Err(PlanFailure::TaskNotFound { name: name.to_string(), arity })
    }

    /// Depth-first search for a cycle in the method call graph (method
    /// head -> every task name/arity appearing in its task list, skipping
    /// `try(...)`). Operators are leaves, so a cycle can only arise
    /// through method-to-method references.
    fn check_for_cycles(&self) -> Result<(), PlanFailure> {
        let mut graph: HashMap<(String, usize), Vec<(String, usize)>> = HashMap::new();
        for method in &self.methods {
            let (name, arity) = method.head_signature();
            let entry = graph.entry((name.to_string(), arity)).or_default();
            for task in &method.tasks {
                if task.functor() == Some("try") && task.arity() == 1 {
                    continue;
                }
                if let Some(task_name) = task.functor() {
                    entry.push((task_name.to_string(), task.arity()));
                }
            }
        }

        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            InProgress,
            Done,
        }
        let mut marks: HashMap<(String, usize), Mark> = HashMap::new();
        let mut path: Vec<(String, usize)> = Vec::new();

        fn visit(
            node: &(String, usize),
            graph: &HashMap<(String, usize), Vec<(String, usize)>>,
            marks: &mut HashMap<(String, usize), Mark>,
            path: &mut Vec<(String, usize)>,
        ) -> Result<(), PlanFailure> {
            match marks.get(node) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InProgress) => {
                    let start = path.iter().position(|n| n == node).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|(n, a)| format!("{n}/{a}")).collect();
                    cycle.push(format!("{}/{}", node.0, node.1));
                    cycle.push("LOOP".to_string());
                    return Err(PlanFailure::TaskLoop { cycle });
                }
                None => {}
            }
            marks.insert(node.clone(), Mark::InProgress);
            path.push(node.clone());
            if let Some(children) = graph.get(node) {
                for child in children {
                    if graph.contains_key(child) {
                        visit(child, graph, marks, path)?;
                    }
                }
            }
            path.pop();
            marks.insert(node.clone(), Mark::Done);
            Ok(())
        }

        for node in graph.keys().cloned().collect::<Vec<_>>() {
            visit(&node, &graph, &mut marks, &mut path)?;
        }
        Ok(())
    }

    /// Runs the domain sanity pass, then searches for every plan that
    /// decomposes `initial_goals` against `initial_state`, in DFS
    /// discovery order (`spec.md` §4.5).
    pub fn find_all_plans(
        &self,
        factory: &TermFactory,
        initial_state: &RuleSet,
        initial_goals: Vec<Term>,
        config: &Config,
    ) -> Result<(Vec<PlanSolution>, PlanDiagnostics), ErrorKind> {
        if let Err(failure) = self.check_domain_sanity(factory, initial_state) {
            return Err(ErrorKind::PlanFailure(failure));
        }
        let (solutions, mut diagnostics) = engine::run(self, factory, initial_state, initial_goals, config, true)?;
        if solutions.is_empty() && config.fail_fast_as_exception {
            let deepest_task = diagnostics.deepest_failure.as_ref().and_then(|f| f.deepest_goal.clone());
            return Err(ErrorKind::PlanFailure(PlanFailure::NoPlanFound { deepest_task }));
        }
        diagnostics.out_of_memory = diagnostics.out_of_memory || factory.out_of_memory();
        Ok((solutions, diagnostics))
    }

    /// As [`HtnPlanner::find_all_plans`], but stops at the first solution.
    pub fn find_plan(
        &self,
        factory: &TermFactory,
        initial_state: &RuleSet,
        initial_goals: Vec<Term>,
        config: &Config,
    ) -> Result<(Option<PlanSolution>, PlanDiagnostics), ErrorKind> {
        if let Err(failure) = self.check_domain_sanity(factory, initial_state) {
            return Err(ErrorKind::PlanFailure(failure));
        }
        let (mut solutions, mut diagnostics) =
            engine::run(self, factory, initial_state, initial_goals, config, false)?;
        diagnostics.out_of_memory = diagnostics.out_of_memory || factory.out_of_memory();
        let solution = solutions.pop();
        if solution.is_none() && config.fail_fast_as_exception {
            let deepest_task = diagnostics.deepest_failure.as_ref().and_then(|f| f.deepest_goal.clone());
            return Err(ErrorKind::PlanFailure(PlanFailure::NoPlanFound { deepest_task }));
        }
        Ok((solution, diagnostics))
    }

    /// Iterator-style: advances a caller-held [`PlanState`] by exactly one
    /// solution, preserving search progress between calls. No domain
    /// sanity pass is run here — the host is expected to have called
    /// [`HtnPlanner::find_all_plans`] or [`HtnPlanner::find_plan`] at least
    /// once, or to accept the risk of skipping the check.
    pub fn find_next_plan(&self, factory: &TermFactory, state: &mut PlanState) -> Result<Option<PlanSolution>, ErrorKind> {
        engine::step(self, factory, state)
    }
}
