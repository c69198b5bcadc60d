use derive_new::new;
use log::{debug, trace};

use super::registry::{default_registry, RuleRegistry};
use super::strategy::{FuseStrategy, MatchOrder};
use crate::expr::{ExprNode, ExprRef, Operand};
use crate::optimizer::core::Rule;
use crate::schema::SchemaCache;

/// Dispatches fusion rules over expression nodes.
///
/// The fuser holds no state of its own: the registry and the schema oracle are only read, so
/// independent trees can be fused from several threads at once.
#[derive(new)]
pub struct Fuser<'a> {
    registry: &'a RuleRegistry,
    schema: &'a dyn SchemaCache,
    #[new(default)]
    strategy: FuseStrategy,
}

impl<'a> Fuser<'a> {
    pub fn with_strategy(mut self, strategy: FuseStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> &FuseStrategy {
        &self.strategy
    }

    /// Apply the first applicable rule registered for the node's operator, or return the node
    /// unchanged when none applies.
    pub fn fuse(&self, expr: ExprRef) -> ExprRef {
        for rule in self.registry.rules_for(expr.op()) {
            if !rule.is_applicable(&expr, self.schema) {
                trace!("Skip {:?} at {} {}", rule, expr.op(), expr.id());
                continue;
            }
            let fused = rule.apply(expr.clone(), self.schema);
            if !ExprNode::is_same(&fused, &expr) {
                debug!(
                    "Apply {:?} at {} {}: {} -> {}",
                    rule,
                    expr.op(),
                    expr.id(),
                    expr,
                    fused
                );
            }
            return fused;
        }
        expr
    }

    /// Fuse the same node repeatedly until no rule changes it any more.
    ///
    /// Not bounded by the strategy: every rewrite removes at least one node from the tree, so
    /// the loop ends after at most as many rewrites as the tree has nodes.
    pub fn fuse_to_fixed_point(&self, expr: ExprRef) -> ExprRef {
        let mut current = expr;
        let mut rewrites = 0;
        loop {
            let next = self.fuse(current.clone());
            if ExprNode::is_same(&next, &current) {
                trace!(
                    "Fixed point reached at {} after {} rewrites",
                    current.id(),
                    rewrites
                );
                return current;
            }
            rewrites += 1;
            current = next;
        }
    }

    /// Fuse every node of the tree to its fixed point, pass after pass, until a pass leaves the
    /// root unchanged or the strategy's pass bound is hit. Subtrees no rule touched keep their
    /// identity.
    pub fn optimize(&self, root: ExprRef) -> ExprRef {
        let mut current = root;
        for iteration in 1..=self.strategy.max_iteration {
            let next = self.optimize_pass(current.clone());
            if ExprNode::is_same(&next, &current) {
                debug!(
                    "Fixed point reached for {:?} optimize, after {} passes",
                    self.strategy.match_order, iteration
                );
                return current;
            }
            debug!("After pass {}: {} {}", iteration, next.op(), next.id());
            current = next;
        }
        debug!(
            "Max iteration {} reached for {:?} optimize",
            self.strategy.max_iteration, self.strategy.match_order
        );
        current
    }

    /// One pass over the tree. Nodes waiting for their operands live on a heap stack, so
    /// the depth of the tree is not limited by the thread's stack.
    fn optimize_pass(&self, root: ExprRef) -> ExprRef {
        let mut stack = vec![self.enter(root)];
        loop {
            if let Some(child) = stack.last_mut().and_then(PassFrame::next_expr_child) {
                stack.push(self.enter(child));
                continue;
            }
            let expr = match stack.pop() {
                Some(frame) => self.leave(frame),
                None => unreachable!("optimize pass left the root twice"),
            };
            match stack.last_mut() {
                Some(parent) => parent.accept(expr),
                None => return expr,
            }
        }
    }

    fn enter(&self, expr: ExprRef) -> PassFrame {
        let expr = match self.strategy.match_order {
            MatchOrder::TopDown => self.fuse_to_fixed_point(expr),
            MatchOrder::BottomUp => expr,
        };
        PassFrame::new(expr)
    }

    /// Rebuild the node over its new operands, keeping its schema identity, then fuse it if
    /// operands go first.
    fn leave(&self, frame: PassFrame) -> ExprRef {
        let expr = if frame.changed {
            frame.expr.with_children(frame.children)
        } else {
            frame.expr
        };
        match self.strategy.match_order {
            MatchOrder::TopDown => expr,
            MatchOrder::BottomUp => self.fuse_to_fixed_point(expr),
        }
    }
}

/// A node whose operands are being optimized.
struct PassFrame {
    expr: ExprRef,
    /// Optimized operands so far, a prefix of `expr.children()`.
    children: Vec<Operand>,
    changed: bool,
}

impl PassFrame {
    fn new(expr: ExprRef) -> Self {
        let children = Vec::with_capacity(expr.arity());
        PassFrame {
            expr,
            children,
            changed: false,
        }
    }

    /// Copy literal operands through and return the next expression operand to optimize.
    fn next_expr_child(&mut self) -> Option<ExprRef> {
        while let Some(child) = self.expr.children().get(self.children.len()) {
            match child {
                Operand::Expr(e) => return Some(e.clone()),
                Operand::Literal(_) => self.children.push(child.clone()),
            }
        }
        None
    }

    fn accept(&mut self, child: ExprRef) {
        let child = Operand::Expr(child);
        self.changed |= !child.is_same(&self.expr.children()[self.children.len()]);
        self.children.push(child);
    }
}

/// Fuse a single node against the default registry.
pub fn fuse(expr: ExprRef, schema: &dyn SchemaCache) -> ExprRef {
    Fuser::new(default_registry(), schema).fuse(expr)
}

/// Optimize a whole tree against the default registry with the default strategy.
pub fn optimize(root: ExprRef, schema: &dyn SchemaCache) -> ExprRef {
    Fuser::new(default_registry(), schema).optimize(root)
}
