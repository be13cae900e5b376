//! Helpers for building questionnaires and forms in a `MemoryTree`.

use anyhow::{Result, anyhow};
use form_status::memory::MemoryTree;
use form_status::{
    ANSWER_SECTION_TYPE, CONDITIONAL_GROUP_TYPE, CONDITIONAL_TYPE, CONDITIONAL_VALUE_TYPE,
    FORM_TYPE, NodePath, NodeStore, Property, PropertyValue, QUESTION_TYPE, QUESTIONNAIRE_TYPE,
    SECTION_TYPE, props,
};

pub const QUESTIONNAIRES: &str = "/Questionnaires";
pub const FORMS: &str = "/Forms";

/// The questionnaire a form fills in.
pub const QUESTIONNAIRE_PROPERTY: &str = "questionnaire";

/// A tree with empty `/Questionnaires` and `/Forms` folders.
pub fn content_tree() -> Result<MemoryTree> {
    let mut tree = MemoryTree::new();
    tree.add_node(&NodePath::root(), "Questionnaires", "sling:Folder")?;
    tree.add_node(&NodePath::root(), "Forms", "sling:Folder")?;
    Ok(tree)
}

/// One side of a conditional.
#[derive(Debug, Clone)]
pub enum Side {
    /// The answer to the question with this name.
    Answer(&'static str),
    Values(Vec<PropertyValue>),
}

impl Side {
    pub fn text(value: &str) -> Self {
        Self::Values(vec![value.into()])
    }

    pub fn texts(values: &[&str]) -> Self {
        Self::Values(values.iter().map(|&v| v.into()).collect())
    }

    pub fn long(value: i64) -> Self {
        Self::Values(vec![value.into()])
    }
}

pub fn identifier(tree: &MemoryTree, path: &NodePath) -> Result<String> {
    tree.identifier(path)?
        .ok_or_else(|| anyhow!("{path} has no identifier"))
}

pub fn questionnaire(tree: &mut MemoryTree, name: &str) -> Result<NodePath> {
    Ok(tree.add_node(&NodePath::new(QUESTIONNAIRES), name, QUESTIONNAIRE_TYPE)?)
}

pub fn section(tree: &mut MemoryTree, parent: &NodePath, name: &str) -> Result<NodePath> {
    Ok(tree.add_node(parent, name, SECTION_TYPE)?)
}

/// A question taking between `min` and `max` values (0 for no bound).
pub fn question(tree: &mut MemoryTree, parent: &NodePath, name: &str, min: i64, max: i64) -> Result<NodePath> {
    let path = tree.add_node(parent, name, QUESTION_TYPE)?;
    tree.set(&path, props::MIN_ANSWERS, PropertyValue::Long(min))?;
    tree.set(&path, props::MAX_ANSWERS, PropertyValue::Long(max))?;
    tree.set(&path, props::DATA_TYPE, PropertyValue::from("text"))?;
    Ok(path)
}

/// A question with a declared data type and, optionally, a value range.
pub fn typed_question(
    tree: &mut MemoryTree,
    parent: &NodePath,
    name: &str,
    data_type: &str,
    range: Option<(i64, i64)>,
) -> Result<NodePath> {
    let path = question(tree, parent, name, 1, 1)?;
    tree.set(&path, props::DATA_TYPE, PropertyValue::from(data_type))?;
    if let Some((min, max)) = range {
        tree.set(&path, props::MIN_VALUE, PropertyValue::Long(min))?;
        tree.set(&path, props::MAX_VALUE, PropertyValue::Long(max))?;
    }
    Ok(path)
}

/// A single comparison `left <comparator> right`.
pub fn conditional(
    tree: &mut MemoryTree,
    parent: &NodePath,
    name: &str,
    left: Side,
    comparator: &str,
    right: Side,
    data_type: &str,
) -> Result<NodePath> {
    let path = tree.add_node(parent, name, CONDITIONAL_TYPE)?;
    tree.set(&path, props::COMPARATOR, PropertyValue::from(comparator))?;
    tree.set(&path, props::DATA_TYPE, PropertyValue::from(data_type))?;
    operand(tree, &path, props::OPERAND_A, left)?;
    operand(tree, &path, props::OPERAND_B, right)?;
    Ok(path)
}

fn operand(tree: &mut MemoryTree, conditional: &NodePath, name: &str, side: Side) -> Result<()> {
    let path = tree.add_node(conditional, name, CONDITIONAL_VALUE_TYPE)?;
    let (value, is_reference) = match side {
        Side::Answer(question) => (Property::strings([question]), true),
        Side::Values(values) => (Property::Multiple(values), false),
    };
    tree.set(&path, props::VALUE, value)?;
    tree.set(&path, props::IS_REFERENCE, PropertyValue::Boolean(is_reference))?;
    Ok(())
}

pub fn conditional_group(tree: &mut MemoryTree, parent: &NodePath, name: &str, require_all: bool) -> Result<NodePath> {
    let path = tree.add_node(parent, name, CONDITIONAL_GROUP_TYPE)?;
    tree.set(&path, props::REQUIRE_ALL, PropertyValue::Boolean(require_all))?;
    Ok(path)
}

/// A new, empty form for a questionnaire, under `/Forms`.
pub fn form(tree: &mut MemoryTree, name: &str, questionnaire: &NodePath) -> Result<NodePath> {
    let id = identifier(tree, questionnaire)?;
    let path = tree.add_node(&NodePath::new(FORMS), name, FORM_TYPE)?;
    tree.set(&path, QUESTIONNAIRE_PROPERTY, Property::reference(id))?;
    Ok(path)
}

pub fn answer_section(tree: &mut MemoryTree, parent: &NodePath, name: &str, section: &NodePath) -> Result<NodePath> {
    let id = identifier(tree, section)?;
    let path = tree.add_node(parent, name, ANSWER_SECTION_TYPE)?;
    tree.set(&path, props::SECTION, Property::reference(id))?;
    Ok(path)
}

/// An answer to `question`. An empty `values` leaves the answer without a value.
pub fn answer(
    tree: &mut MemoryTree,
    parent: &NodePath,
    name: &str,
    question: &NodePath,
    answer_type: &str,
    mut values: Vec<PropertyValue>,
) -> Result<NodePath> {
    let id = identifier(tree, question)?;
    let path = tree.add_node(parent, name, answer_type)?;
    tree.set(&path, props::QUESTION, Property::reference(id))?;
    match values.len() {
        0 => {}
        1 => tree.set(&path, props::VALUE, values.remove(0))?,
        _ => tree.set(&path, props::VALUE, values)?,
    }
    Ok(path)
}

/// Parse a `yyyy-MM-dd` date into a stored date value.
pub fn date(text: &str) -> Result<PropertyValue> {
    form_status::parse_date(text)
        .map(PropertyValue::Date)
        .ok_or_else(|| anyhow!("Not a date: {text}"))
}
