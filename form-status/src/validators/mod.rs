//! Built-in answer validators.

mod answer_count;
pub use answer_count::AnswerCountValidator;

mod value_range;
pub use value_range::ValueRangeValidator;
