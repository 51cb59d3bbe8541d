//! Evaluation context for tracking state during recursive evaluation.

use std::collections::HashMap;

use crate::interpreter::EvalError;
use crate::types::Value;

/// Default bound on nested entry references.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Evaluation context carrying state through recursive evaluation.
///
/// The context tracks:
/// - Arguments available during evaluation
/// - Call stack of entry ids for cycle detection
/// - Recursion depth for limiting deep reference chains
///
/// A context is scoped to one top-level resolution; entries themselves are
/// never marked.
#[derive(Debug)]
pub struct EvalContext<'a> {
    /// Arguments available during evaluation.
    args: &'a HashMap<String, Value>,
    /// Entry ids currently being formatted, outermost first.
    call_stack: Vec<String>,
    /// Current recursion depth.
    depth: usize,
    /// Maximum allowed depth.
    max_depth: usize,
}

impl<'a> EvalContext<'a> {
    /// Create new context with arguments.
    pub fn new(args: &'a HashMap<String, Value>) -> Self {
        Self::with_max_depth(args, DEFAULT_MAX_DEPTH)
    }

    /// Create context with custom max depth.
    pub fn with_max_depth(args: &'a HashMap<String, Value>, max_depth: usize) -> Self {
        Self {
            args,
            call_stack: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Get an argument value.
    pub fn get_arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Check if an entry is being formatted further up the stack.
    pub fn is_in_call_stack(&self, id: &str) -> bool {
        self.call_stack.iter().any(|n| n == id)
    }

    /// Push an entry id onto the stack.
    ///
    /// Returns error if:
    /// - Maximum depth exceeded
    /// - Cycle detected (id already in call stack)
    pub fn push_call(&mut self, id: &str) -> Result<(), EvalError> {
        if self.depth >= self.max_depth {
            return Err(EvalError::MaxDepthExceeded);
        }
        if self.is_in_call_stack(id) {
            let mut chain = self.call_stack.clone();
            chain.push(id.to_string());
            return Err(EvalError::CyclicReference { chain });
        }
        self.call_stack.push(id.to_string());
        self.depth += 1;
        Ok(())
    }

    /// Pop an entry id from the stack.
    pub fn pop_call(&mut self) {
        self.call_stack.pop();
        self.depth = self.depth.saturating_sub(1);
    }

    /// Get current recursion depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Get the call stack for error reporting.
    pub fn call_stack(&self) -> &[String] {
        &self.call_stack
    }
}
