//! Stack growth for deep recursion over expression trees.
//!
//! Parsing, interpolation and evaluation all recurse on tree depth. Each
//! recursive step is wrapped in [`ensure_sufficient_stack`], which grows the
//! stack on native targets and is a plain call on WASM.
//!
//! Growth is a backstop only: the evaluator's configured depth limit is what
//! turns runaway recursion into an error.

/// Grow when less than this remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (2MB).
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if it is close to exhausted.
///
/// ```text
/// fn eval_expr(&mut self, expr: &Expr, env: &Env) -> EvalResult {
///     ensure_sufficient_stack(|| self.eval_node(expr, env))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
