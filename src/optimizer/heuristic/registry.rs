use lazy_static::lazy_static;

use crate::expr::Operator;
use crate::optimizer::core::Rule;
use crate::optimizer::rules::{FoldFusion, RuleImpl, SkipFusion};

lazy_static! {
    static ref DEFAULT_REGISTRY: RuleRegistry = RuleRegistry::with_default_rules();
}

/// The registry every caller shares unless it builds its own. Built on first use and never
/// modified afterwards.
pub fn default_registry() -> &'static RuleRegistry {
    &DEFAULT_REGISTRY
}

/// Ordered collection of fusion rules. Rules are tried in registration order.
#[derive(Clone, Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<RuleImpl>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// FoldFusion over `append`/`cbind`, then SkipFusion over `cols_py`.
    pub fn with_default_rules() -> Self {
        let mut registry = Self::new();
        registry
            .register_rule(FoldFusion::create())
            .register_rule(SkipFusion::create());
        registry
    }

    pub fn register_rule(&mut self, rule: RuleImpl) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Rules supporting `op`, in registration order.
    pub fn rules_for<'a>(&'a self, op: &'a Operator) -> impl Iterator<Item = &'a RuleImpl> + 'a {
        self.rules.iter().filter(move |rule| rule.supports(op))
    }

    pub fn rules(&self) -> &[RuleImpl] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
