//! Rule registry gating a builder before anything is assembled or sent.

use crate::error::{PaymentError, Result};
use tracing::debug;

/// Which error a failed rule surfaces as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Malformed input such as a missing or non-positive amount.
    Validation,
    /// Structurally wrong request, such as a non-positive transaction id.
    InvalidRequest,
}

pub struct ValidationRule<B> {
    pub name: &'static str,
    pub message: &'static str,
    pub kind: RuleKind,
    predicate: fn(&B) -> bool,
}

impl<B> ValidationRule<B> {
    fn error(&self) -> PaymentError {
        match self.kind {
            RuleKind::Validation => PaymentError::ValidationError(self.message.to_string()),
            RuleKind::InvalidRequest => PaymentError::InvalidRequestError(self.message.to_string()),
        }
    }
}

/// Rules in registration order. The first rule whose predicate returns
/// `false` decides the error; later rules are not evaluated.
pub struct ValidationSet<B> {
    rules: Vec<ValidationRule<B>>,
}

impl<B> Default for ValidationSet<B> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<B> ValidationSet<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &'static str, message: &'static str, predicate: fn(&B) -> bool) {
        self.push(name, message, RuleKind::Validation, predicate);
    }

    /// Registers a rule that fails with `InvalidRequestError`.
    pub fn add_request_check(
        &mut self,
        name: &'static str,
        message: &'static str,
        predicate: fn(&B) -> bool,
    ) {
        self.push(name, message, RuleKind::InvalidRequest, predicate);
    }

    fn push(
        &mut self,
        name: &'static str,
        message: &'static str,
        kind: RuleKind,
        predicate: fn(&B) -> bool,
    ) {
        self.rules.push(ValidationRule {
            name,
            message,
            kind,
            predicate,
        });
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn check(&self, subject: &B) -> Result<()> {
        match self.rules.iter().find(|rule| !(rule.predicate)(subject)) {
            Some(rule) => {
                debug!(rule = rule.name, "validation failed");
                Err(rule.error())
            }
            None => Ok(()),
        }
    }
}

/// Implemented by every builder. `setup_validations` registers the rules;
/// `validate` evaluates a fresh set against the current field values.
pub trait Validated: Sized {
    fn setup_validations(rules: &mut ValidationSet<Self>);

    fn validate(&self) -> Result<()> {
        let mut rules = ValidationSet::new();
        Self::setup_validations(&mut rules);
        rules.check(self)
    }
}
