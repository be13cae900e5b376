//! Prenatal screening: the pregnancy section only applies to female patients.

use anyhow::Result;
use form_status::memory::MemoryTree;
use form_status::{NodePath, PropertyValue};

use crate::fixture::{self, Side};

/// The prenatal screening questionnaire.
#[derive(Debug, Clone)]
pub struct Prenatal {
    pub questionnaire: NodePath,
    /// `gender`, exactly one answer.
    pub gender: NodePath,
    /// Applies when `gender = "F"`.
    pub pregnancy: NodePath,
    /// `pregnant`, exactly one answer, inside `pregnancy`.
    pub pregnant: NodePath,
}

impl Prenatal {
    pub fn create(tree: &mut MemoryTree) -> Result<Self> {
        let questionnaire = fixture::questionnaire(tree, "Prenatal")?;
        let gender = fixture::question(tree, &questionnaire, "gender", 1, 1)?;
        let pregnancy = fixture::section(tree, &questionnaire, "pregnancy")?;
        fixture::conditional(
            tree,
            &pregnancy,
            "condition",
            Side::Answer("gender"),
            "=",
            Side::text("F"),
            "text",
        )?;
        let pregnant = fixture::question(tree, &pregnancy, "pregnant", 1, 1)?;
        Ok(Self {
            questionnaire,
            gender,
            pregnancy,
            pregnant,
        })
    }

    /// A filled-in form. `None` leaves the answer without a value.
    pub fn fill(
        &self,
        tree: &mut MemoryTree,
        name: &str,
        gender: Option<&str>,
        pregnant: Option<&str>,
    ) -> Result<PrenatalForm> {
        let form = fixture::form(tree, name, &self.questionnaire)?;
        let gender = fixture::answer(tree, &form, "gender", &self.gender, "cards:TextAnswer", values(gender))?;
        let pregnancy = fixture::answer_section(tree, &form, "pregnancy", &self.pregnancy)?;
        let pregnant = fixture::answer(
            tree,
            &pregnancy,
            "pregnant",
            &self.pregnant,
            "cards:TextAnswer",
            values(pregnant),
        )?;
        Ok(PrenatalForm {
            form,
            gender,
            pregnancy,
            pregnant,
        })
    }
}

fn values(value: Option<&str>) -> Vec<PropertyValue> {
    value.into_iter().map(PropertyValue::from).collect()
}

/// Paths of a filled-in prenatal form.
#[derive(Debug, Clone)]
pub struct PrenatalForm {
    pub form: NodePath,
    pub gender: NodePath,
    pub pregnancy: NodePath,
    pub pregnant: NodePath,
}
