//! The status engine: configuration, validators and whole-form recomputation.

use std::rc::Rc;

use form_status_types::{AsNodeStore, ChangeSet, NodePath, NodeStore, ReadSession, StatusFlags};
use tracing::debug;

use crate::config::StatusConfig;
use crate::editor::StatusEditorProvider;
use crate::summarizer::{FormStatus, Summarizer};
use crate::validator::{AnswerValidator, ValidatorRegistry};
use crate::validators::{AnswerCountValidator, ValueRangeValidator};
use crate::ConditionError;

/// The status engine: configuration plus the registered answer validators.
///
/// Cheap to clone; clones share the validator registry.
///
/// ```rust
/// use form_status::StatusEngine;
///
/// let engine = StatusEngine::new();
/// assert_eq!(engine.validators().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct StatusEngine {
    config: StatusConfig,
    validators: Rc<ValidatorRegistry>,
}

impl Default for StatusEngine {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl StatusEngine {
    /// An engine with the default configuration and the built-in validators.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> StatusEngineBuilder {
        StatusEngineBuilder::new()
    }

    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    /// Compute the status of every node in a Form without writing anything.
    pub fn evaluate_form(
        &self,
        form_store: &dyn NodeStore,
        before: Option<&dyn NodeStore>,
        session: &dyn ReadSession,
        form: &NodePath,
    ) -> Result<FormStatus, ConditionError> {
        let summarizer = Summarizer::new(
            form_store,
            session,
            &self.validators,
            self.config.matching,
            form,
        );
        match before {
            Some(before) => summarizer.with_before(before).run(),
            None => summarizer.run(),
        }
    }

    /// Recompute a Form and write the changed flags into `builder`.
    ///
    /// Nothing is written if the pass fails.
    pub fn recompute_form(
        &self,
        builder: &mut dyn ChangeSet,
        before: Option<&dyn NodeStore>,
        session: &dyn ReadSession,
        form: &NodePath,
    ) -> Result<StatusFlags, ConditionError> {
        let status = self.evaluate_form(builder.as_node_store(), before, session, form)?;
        let written = status.write(builder)?;
        debug!(%form, written, flags = %status.form_flags(), "Form status recomputed");
        Ok(status.form_flags())
    }

    /// A commit hook running this engine.
    pub fn editor_provider(&self) -> StatusEditorProvider {
        StatusEditorProvider::new(self.clone())
    }
}

/// Builder for `StatusEngine`.
pub struct StatusEngineBuilder {
    config: StatusConfig,
    builtins: bool,
    validators: Vec<Box<dyn AnswerValidator>>,
}

impl StatusEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: StatusConfig::default(),
            builtins: true,
            validators: Vec::new(),
        }
    }

    pub fn config(mut self, config: StatusConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an additional validator.
    pub fn validator(mut self, validator: impl AnswerValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Leave out the answer count and value range validators.
    pub fn without_builtin_validators(mut self) -> Self {
        self.builtins = false;
        self
    }

    pub fn build(self) -> StatusEngine {
        let mut registry = ValidatorRegistry::new();
        if self.builtins {
            registry.register(Box::new(AnswerCountValidator));
            if self.config.value_ranges {
                registry.register(Box::new(ValueRangeValidator));
            }
        }
        for validator in self.validators {
            registry.register(validator);
        }
        StatusEngine {
            config: self.config,
            validators: Rc::new(registry),
        }
    }
}

impl Default for StatusEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
