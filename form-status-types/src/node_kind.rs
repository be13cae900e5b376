/// The primary type of every questionnaire node.
pub const QUESTIONNAIRE_TYPE: &str = "cards:Questionnaire";
pub const SECTION_TYPE: &str = "cards:Section";
pub const QUESTION_TYPE: &str = "cards:Question";
pub const CONDITIONAL_TYPE: &str = "cards:Conditional";
pub const CONDITIONAL_GROUP_TYPE: &str = "cards:ConditionalGroup";
pub const CONDITIONAL_VALUE_TYPE: &str = "cards:ConditionalValue";
pub const FORM_TYPE: &str = "cards:Form";
pub const ANSWER_SECTION_TYPE: &str = "cards:AnswerSection";
pub const ANSWER_TYPE: &str = "cards:Answer";

/// What a node in the content tree represents.
///
/// The questionnaire side (`Questionnaire`, `Section`, `Question` and the
/// condition nodes) is read-only during evaluation; the form side (`Form`,
/// `AnswerSection`, `Answer`) is what the engine writes status flags onto.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Questionnaire,
    Section,
    Question,

    /// A single comparison deciding whether a section applies.
    Conditional,

    /// An AND/OR combination of conditionals.
    ConditionalGroup,

    /// One operand of a conditional.
    ConditionalValue,

    Form,
    AnswerSection,

    /// Any answer type (`cards:Answer`, `cards:TextAnswer`, `cards:LongAnswer`, ...).
    Answer,

    /// Anything else, keeping the original primary type.
    Other(String),
}

impl NodeKind {
    /// Classify a node by its primary type.
    pub fn from_primary_type(primary_type: &str) -> Self {
        match primary_type {
            QUESTIONNAIRE_TYPE => Self::Questionnaire,
            SECTION_TYPE => Self::Section,
            QUESTION_TYPE => Self::Question,
            CONDITIONAL_TYPE => Self::Conditional,
            CONDITIONAL_GROUP_TYPE => Self::ConditionalGroup,
            CONDITIONAL_VALUE_TYPE => Self::ConditionalValue,
            FORM_TYPE => Self::Form,
            ANSWER_SECTION_TYPE => Self::AnswerSection,
            other if other.starts_with("cards:") && other.ends_with("Answer") => Self::Answer,
            other => Self::Other(other.to_string()),
        }
    }

    /// Check if this is a form-side node that carries status flags.
    pub fn carries_status(&self) -> bool {
        matches!(self, Self::Form | Self::AnswerSection | Self::Answer)
    }

    /// Check if this node is a condition expression (leaf or group).
    pub fn is_condition(&self) -> bool {
        matches!(self, Self::Conditional | Self::ConditionalGroup)
    }
}
