//! Cardiac rehab intake: typed questions, multi-valued answers, nested and
//! grouped conditions.

use anyhow::Result;
use form_status::memory::MemoryTree;
use form_status::{NodePath, PropertyValue};

use crate::fixture::{self, Side};

/// The cardiac rehab intake questionnaire.
///
/// - `age` (long, 18..=120)
/// - `symptoms` (any number of values)
/// - `last_event` (date)
/// - `senior_screening`, when `age >= 65`: `falls`
/// - `angina_followup`, when `symptoms` includes `chest pain` or includes any of
///   `shortness of breath`, `palpitations`: `angina_class`, and
///   - `recent_event`, when `last_event >= 2026-01-01`: `event_details`
#[derive(Debug, Clone)]
pub struct CardiacRehab {
    pub questionnaire: NodePath,
    pub age: NodePath,
    pub symptoms: NodePath,
    pub last_event: NodePath,
    pub senior_screening: NodePath,
    pub falls: NodePath,
    pub angina_followup: NodePath,
    pub angina_class: NodePath,
    pub recent_event: NodePath,
    pub event_details: NodePath,
}

impl CardiacRehab {
    pub fn create(tree: &mut MemoryTree) -> Result<Self> {
        let questionnaire = fixture::questionnaire(tree, "CardiacRehab")?;
        let age = fixture::typed_question(tree, &questionnaire, "age", "long", Some((18, 120)))?;
        let symptoms = fixture::question(tree, &questionnaire, "symptoms", 0, 0)?;
        let last_event = fixture::typed_question(tree, &questionnaire, "last_event", "date", None)?;

        let senior_screening = fixture::section(tree, &questionnaire, "senior_screening")?;
        fixture::conditional(
            tree,
            &senior_screening,
            "condition",
            Side::Answer("age"),
            ">=",
            Side::long(65),
            "long",
        )?;
        let falls = fixture::question(tree, &senior_screening, "falls", 1, 1)?;

        let angina_followup = fixture::section(tree, &questionnaire, "angina_followup")?;
        let any_symptom = fixture::conditional_group(tree, &angina_followup, "condition", false)?;
        fixture::conditional(
            tree,
            &any_symptom,
            "chest_pain",
            Side::Answer("symptoms"),
            "includes",
            Side::text("chest pain"),
            "text",
        )?;
        fixture::conditional(
            tree,
            &any_symptom,
            "breathing",
            Side::Answer("symptoms"),
            "includes any",
            Side::texts(&["shortness of breath", "palpitations"]),
            "text",
        )?;
        let angina_class = fixture::question(tree, &angina_followup, "angina_class", 1, 1)?;

        let recent_event = fixture::section(tree, &angina_followup, "recent_event")?;
        fixture::conditional(
            tree,
            &recent_event,
            "condition",
            Side::Answer("last_event"),
            ">=",
            Side::text("2026-01-01"),
            "date",
        )?;
        let event_details = fixture::question(tree, &recent_event, "event_details", 1, 1)?;

        Ok(Self {
            questionnaire,
            age,
            symptoms,
            last_event,
            senior_screening,
            falls,
            angina_followup,
            angina_class,
            recent_event,
            event_details,
        })
    }

    /// Fill in an intake form. Every question gets an answer node; `None` or an
    /// empty list leaves it without a value.
    pub fn fill(&self, tree: &mut MemoryTree, name: &str, intake: &Intake) -> Result<CardiacRehabForm> {
        let form = fixture::form(tree, name, &self.questionnaire)?;
        let long = |v: Option<i64>| v.into_iter().map(PropertyValue::Long).collect::<Vec<_>>();
        let text = |v: Option<&str>| v.into_iter().map(PropertyValue::from).collect::<Vec<_>>();

        fixture::answer(tree, &form, "age", &self.age, "cards:LongAnswer", long(intake.age))?;
        let symptoms = intake.symptoms.iter().map(|&s| PropertyValue::from(s)).collect();
        fixture::answer(tree, &form, "symptoms", &self.symptoms, "cards:TextAnswer", symptoms)?;
        let last_event = match intake.last_event {
            Some(day) => vec![fixture::date(day)?],
            None => Vec::new(),
        };
        fixture::answer(tree, &form, "last_event", &self.last_event, "cards:DateAnswer", last_event)?;

        let senior_screening = fixture::answer_section(tree, &form, "senior_screening", &self.senior_screening)?;
        fixture::answer(tree, &senior_screening, "falls", &self.falls, "cards:TextAnswer", text(intake.falls))?;

        let angina_followup = fixture::answer_section(tree, &form, "angina_followup", &self.angina_followup)?;
        fixture::answer(
            tree,
            &angina_followup,
            "angina_class",
            &self.angina_class,
            "cards:TextAnswer",
            text(intake.angina_class),
        )?;
        let recent_event = fixture::answer_section(tree, &angina_followup, "recent_event", &self.recent_event)?;
        fixture::answer(
            tree,
            &recent_event,
            "event_details",
            &self.event_details,
            "cards:TextAnswer",
            text(intake.event_details),
        )?;

        Ok(CardiacRehabForm {
            form,
            senior_screening,
            angina_followup,
            recent_event,
        })
    }
}

/// Answers for a cardiac rehab intake form.
#[derive(Debug, Clone, Default)]
pub struct Intake {
    pub age: Option<i64>,
    pub symptoms: Vec<&'static str>,
    pub last_event: Option<&'static str>,
    pub falls: Option<&'static str>,
    pub angina_class: Option<&'static str>,
    pub event_details: Option<&'static str>,
}

/// Paths of a filled-in cardiac rehab form.
#[derive(Debug, Clone)]
pub struct CardiacRehabForm {
    pub form: NodePath,
    pub senior_screening: NodePath,
    pub angina_followup: NodePath,
    pub recent_event: NodePath,
}

impl CardiacRehabForm {
    pub fn answer(&self, path: &str) -> NodePath {
        NodePath::new(format!("{}/{path}", self.form))
    }
}
