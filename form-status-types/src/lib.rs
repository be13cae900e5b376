//! Core types for the form-status crate.
//!
//! This crate provides the data model and the interfaces the engine consumes
//! from its host:
//! - `NodePath`, `Property` and `PropertyValue` - Addressing and typed node properties
//! - `NodeKind` - What a node in the questionnaire or form tree represents
//! - `StatusFlag`, `StatusFlags` and `StatusFlagMap` - The derived flags written onto forms
//! - `NodeStore`, `ChangeSet` and `ReadSession` - Tree access
//! - `Editor` and `EditorProvider` - The commit hook protocol

mod node_path;
pub use node_path::NodePath;

mod property_value;
pub use property_value::{Property, PropertyValue};

mod node_kind;
pub use node_kind::{
    ANSWER_SECTION_TYPE, ANSWER_TYPE, CONDITIONAL_GROUP_TYPE, CONDITIONAL_TYPE,
    CONDITIONAL_VALUE_TYPE, FORM_TYPE, NodeKind, QUESTION_TYPE, QUESTIONNAIRE_TYPE, SECTION_TYPE,
};

mod status_flags;
pub use status_flags::{STATUS_FLAGS, StatusFlag, StatusFlagMap, StatusFlags, UnknownStatusFlag};

mod store;
pub use store::{AsNodeStore, ChangeSet, IDENTIFIER, NodeStore, PRIMARY_TYPE, ReadSession};

mod commit;
pub use commit::{CommitContext, CommitInfo, Editor, EditorProvider};

mod error;
pub use error::{CommitError, TreeError};

/// Names of the properties the engine reads.
pub mod props {
    /// On an Answer: reference to its Question.
    pub const QUESTION: &str = "question";
    /// On an AnswerSection: reference to its Section.
    pub const SECTION: &str = "section";
    /// On an Answer or a ConditionalValue: the stored value(s).
    pub const VALUE: &str = "value";
    pub const MIN_ANSWERS: &str = "minAnswers";
    pub const MAX_ANSWERS: &str = "maxAnswers";
    pub const MIN_VALUE: &str = "minValue";
    pub const MAX_VALUE: &str = "maxValue";
    /// On a Question or a Conditional: the declared value type.
    pub const DATA_TYPE: &str = "dataType";
    pub const COMPARATOR: &str = "comparator";
    pub const IS_REFERENCE: &str = "isReference";
    pub const REQUIRE_ALL: &str = "requireAll";
    /// Child names of a Conditional's operands.
    pub const OPERAND_A: &str = "operandA";
    pub const OPERAND_B: &str = "operandB";
}
