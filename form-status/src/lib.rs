//! # form-status
//!
//! Completion and validity status for hierarchical survey forms.
//!
//! Forms mirror a questionnaire: a Form holds AnswerSections and Answers, each
//! referring to the Section or Question it fills in. Whenever a commit touches
//! a Form, the engine recomputes the `statusFlags` of every node in it:
//!
//! - Answers are checked by the registered `AnswerValidator`s (answer count,
//!   value range, plus any of your own), highest priority first.
//! - AnswerSections and the Form aggregate the flags of their children,
//!   leaving out sections whose condition doesn't hold.
//! - `DRAFT` is set whenever `INCOMPLETE` or `INVALID` is.
//!
//! ## Usage
//!
//! ```rust
//! use form_status::memory::MemoryRepository;
//! use form_status::{CommitInfo, NodePath, StatusEngine, FORM_TYPE};
//!
//! let mut repository = MemoryRepository::new();
//! repository.register(StatusEngine::new().editor_provider());
//!
//! repository
//!     .commit(&CommitInfo::new("session-1"), |tree| {
//!         tree.add_node(&NodePath::root(), "form", FORM_TYPE)?;
//!         Ok(())
//!     })
//!     .unwrap();
//! ```
//!
//! ## Conditions
//!
//! A Section may carry a `cards:Conditional` (one comparison) or a
//! `cards:ConditionalGroup` (all or any of its children). Operands are either
//! literal values or references to the answer of another question, by name.
//! Supported operators: `=`, `<>`, `<`, `<=`, `>`, `>=`, `is empty`,
//! `is not empty`, `includes`, `includes any`, `excludes`, `excludes any`.
//!
//! ## Hosts
//!
//! The engine talks to its store through the `NodeStore`, `ChangeSet` and
//! `ReadSession` traits and plugs into commits through `EditorProvider`. The
//! `memory` module has an in-memory implementation of all of them.

// Re-export all types from form-status-types
pub use form_status_types::*;

mod error;
pub use error::{ConditionError, ConfigError};

mod config;
pub use config::{OperandMatching, StatusConfig};

mod value;
pub use value::{ComparableValue, OperandType, parse_date};

mod operator;
pub use operator::{Operator, UnknownOperator};

mod operand;
pub use operand::{Operand, OperandDefinition, OperandSource, ReferenceResolver, sanitize_name};

mod condition;
pub use condition::{Comparison, Condition};

mod metadata;
pub use metadata::{FormIndex, FormResolver, QuestionnaireLookup};

mod validator;
pub use validator::{AnswerBounds, AnswerNode, AnswerValidator, QuestionNode, ValidatorRegistry};

pub mod validators;

mod summarizer;
pub use summarizer::{FormStatus, Summarizer};

mod engine;
pub use engine::{StatusEngine, StatusEngineBuilder};

mod editor;
pub use editor::{Position, StatusEditor, StatusEditorProvider};

pub mod memory;
