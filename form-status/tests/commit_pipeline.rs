//! Status recomputation driven through repository commits.

mod common;

use common::{commit, flags, repository};
use example_forms::fixture::{self, Side};
use example_forms::{Prenatal, medication_review};
use form_status::{
    AnswerNode, AnswerValidator, ChangeSet, NodePath, NodeStore, PropertyValue, QuestionNode, STATUS_FLAGS,
    StatusConfig, StatusEngine, StatusFlag, StatusFlagMap, props,
};
use pretty_assertions::assert_eq;

#[test]
fn test_empty_form_is_incomplete() {
    let (mut repository, prenatal) = repository(StatusEngine::new(), Prenatal::create);
    let form = commit(&mut repository, |tree| fixture::form(tree, "f1", &prenatal.questionnaire));

    assert_eq!(repository.head().status_flags(&form), flags(&["DRAFT", "INCOMPLETE"]));
}

#[test]
fn test_new_empty_answer_is_only_incomplete() {
    let (mut repository, prenatal) = repository(StatusEngine::new(), Prenatal::create);
    let form = commit(&mut repository, |tree| prenatal.fill(tree, "f1", Some("F"), None));

    let head = repository.head();
    assert_eq!(head.status_flags(&form.gender), flags(&[]));
    assert_eq!(head.status_flags(&form.pregnant), flags(&["INCOMPLETE"]));
    assert_eq!(head.status_flags(&form.pregnancy), flags(&["DRAFT", "INCOMPLETE"]));
    assert_eq!(head.status_flags(&form.form), flags(&["DRAFT", "INCOMPLETE"]));
}

#[test]
fn test_empty_answer_becomes_invalid_once_saved() {
    let (mut repository, prenatal) = repository(StatusEngine::new(), Prenatal::create);
    let form = commit(&mut repository, |tree| prenatal.fill(tree, "f1", Some("F"), None));

    // Any later touch of the form re-validates the answer, which is no longer new.
    commit(&mut repository, |tree| Ok(tree.set(&form.form, "lastModifiedBy", PropertyValue::from("nurse"))?));

    let head = repository.head();
    assert_eq!(head.status_flags(&form.pregnant), flags(&["INCOMPLETE", "INVALID"]));
    assert_eq!(head.status_flags(&form.form), flags(&["DRAFT", "INCOMPLETE", "INVALID"]));
}

#[test]
fn test_complete_form_has_no_flags() {
    let (mut repository, prenatal) = repository(StatusEngine::new(), Prenatal::create);
    let form = commit(&mut repository, |tree| prenatal.fill(tree, "f1", Some("F"), Some("no")));

    let head = repository.head();
    for path in [&form.form, &form.gender, &form.pregnancy, &form.pregnant] {
        assert_eq!(head.status_flags(path), flags(&[]), "{path}");
    }
}

#[test]
fn test_inapplicable_section_does_not_count() {
    let (mut repository, prenatal) = repository(StatusEngine::new(), Prenatal::create);
    let form = commit(&mut repository, |tree| prenatal.fill(tree, "f1", Some("M"), None));

    let head = repository.head();
    // The section still gets its own flags, they just don't reach the form.
    assert_eq!(head.status_flags(&form.pregnancy), flags(&["DRAFT", "INCOMPLETE"]));
    assert_eq!(head.status_flags(&form.form), flags(&[]));
}

#[test]
fn test_changing_a_referenced_answer_reevaluates_sections() {
    let (mut repository, prenatal) = repository(StatusEngine::new(), Prenatal::create);
    let form = commit(&mut repository, |tree| prenatal.fill(tree, "f1", Some("M"), None));
    assert_eq!(repository.head().status_flags(&form.form), flags(&[]));

    commit(&mut repository, |tree| Ok(tree.set(&form.gender, props::VALUE, PropertyValue::from("F"))?));

    assert_eq!(
        repository.head().status_flags(&form.form),
        flags(&["DRAFT", "INCOMPLETE", "INVALID"])
    );
}

#[test]
fn test_untouched_forms_are_left_alone() {
    let (mut repository, (prenatal, untouched)) = repository(StatusEngine::new(), |tree| {
        let prenatal = Prenatal::create(tree)?;
        let untouched = fixture::form(tree, "f1", &prenatal.questionnaire)?;
        Ok((prenatal, untouched))
    });
    let form = commit(&mut repository, |tree| fixture::form(tree, "f2", &prenatal.questionnaire));

    let head = repository.head();
    assert_eq!(head.property(&untouched, STATUS_FLAGS).unwrap(), None);
    assert_eq!(head.status_flags(&form), flags(&["DRAFT", "INCOMPLETE"]));
}

#[test]
fn test_deleting_an_answer_recomputes_the_form() {
    let (mut repository, prenatal) = repository(StatusEngine::new(), Prenatal::create);
    let form = commit(&mut repository, |tree| prenatal.fill(tree, "f1", Some("F"), Some("yes")));
    assert_eq!(repository.head().status_flags(&form.form), flags(&[]));

    commit(&mut repository, |tree| Ok(tree.remove_node(&form.pregnancy)?));

    // Only the gender answer is left, and it is valid.
    assert_eq!(repository.head().status_flags(&form.form), flags(&[]));

    commit(&mut repository, |tree| Ok(tree.remove_node(&form.gender)?));
    assert_eq!(repository.head().status_flags(&form.form), flags(&["DRAFT", "INCOMPLETE"]));
}

#[test]
fn test_unknown_operator_keeps_stale_flags() {
    let (mut repository, form) = repository(StatusEngine::new(), |tree| {
        let questionnaire = fixture::questionnaire(tree, "Broken")?;
        let mood = fixture::question(tree, &questionnaire, "mood", 1, 1)?;
        let section = fixture::section(tree, &questionnaire, "followup")?;
        fixture::conditional(tree, &section, "condition", Side::Answer("mood"), "resembles", Side::text("sad"), "text")?;

        let form = fixture::form(tree, "f1", &questionnaire)?;
        fixture::answer_section(tree, &form, "followup", &section)?;
        tree.set(&form, STATUS_FLAGS, flags(&["INCOMPLETE"]).to_property())?;
        Ok((form, mood))
    });
    let (form, mood) = form;

    // The commit itself goes through.
    commit(&mut repository, |tree| {
        fixture::answer(tree, &form, "mood", &mood, "cards:TextAnswer", vec!["sad".into()])
    });

    let head = repository.head();
    assert_eq!(repository.revision(), 1);
    assert!(head.exists(&form.child("mood")));
    assert_eq!(head.status_flags(&form), flags(&["INCOMPLETE"]));
    assert_eq!(head.property(&form.child("mood"), STATUS_FLAGS).unwrap(), None);
}

#[test]
fn test_disabled_engine_writes_nothing() {
    let engine = StatusEngine::builder()
        .config(StatusConfig::from_json(r#"{ "enabled": false }"#).unwrap())
        .build();
    let (mut repository, prenatal) = repository(engine, Prenatal::create);
    let form = commit(&mut repository, |tree| prenatal.fill(tree, "f1", Some("F"), None));

    let head = repository.head();
    for path in [&form.form, &form.gender, &form.pregnancy, &form.pregnant] {
        assert_eq!(head.property(path, STATUS_FLAGS).unwrap(), None, "{path}");
    }
}

#[test]
fn test_out_of_range_dose_is_invalid() {
    let (mut repository, _) = repository(StatusEngine::new(), medication_review::load_questionnaire);
    let form = commit(&mut repository, |tree| {
        medication_review::load_form(tree, "review-1", medication_review::OVERDOSE_FORM)
    });

    let head = repository.head();
    let medications = form.child("medications");
    assert_eq!(head.status_flags(&medications.child("dose_mg")), flags(&["INVALID"]));
    assert_eq!(head.status_flags(&medications.child("drug_name")), flags(&[]));
    assert_eq!(head.status_flags(&medications), flags(&["DRAFT", "INVALID"]));
    assert_eq!(head.status_flags(&form), flags(&["DRAFT", "INVALID"]));
}

#[test]
fn test_value_ranges_can_be_turned_off() {
    let engine = StatusEngine::builder()
        .config(StatusConfig::from_json(r#"{ "value_ranges": false }"#).unwrap())
        .build();
    let (mut repository, _) = repository(engine, medication_review::load_questionnaire);
    let form = commit(&mut repository, |tree| {
        medication_review::load_form(tree, "review-1", medication_review::OVERDOSE_FORM)
    });

    assert_eq!(repository.head().status_flags(&form), flags(&[]));
}

#[test]
fn test_skipped_medication_section_is_ignored() {
    let (mut repository, _) = repository(StatusEngine::new(), medication_review::load_questionnaire);
    let form = commit(&mut repository, |tree| {
        medication_review::load_form(tree, "review-2", medication_review::NO_MEDICATION_FORM)
    });

    let head = repository.head();
    assert_eq!(
        head.status_flags(&form.child("medications")),
        flags(&["DRAFT", "INCOMPLETE"])
    );
    assert_eq!(head.status_flags(&form), flags(&[]));
}

/// Marks answers saying "unsure" as invalid and for review.
struct FlagUnsure;

impl AnswerValidator for FlagUnsure {
    fn priority(&self) -> i32 {
        10
    }

    fn validate(&self, answer: &AnswerNode<'_>, _: &QuestionNode<'_>, _: bool, flags: &mut StatusFlagMap) {
        let values = answer.values().unwrap_or_default();
        if values.iter().any(|v| v.as_str() == Some("unsure")) {
            flags.raise(StatusFlag::Invalid);
            flags.set_name("NEEDS_REVIEW", true);
        }
    }
}

#[test]
fn test_custom_validator_runs_after_builtins() {
    let engine = StatusEngine::builder().validator(FlagUnsure).build();
    let (mut repository, prenatal) = repository(engine, Prenatal::create);
    let form = commit(&mut repository, |tree| prenatal.fill(tree, "f1", Some("unsure"), None));

    let head = repository.head();
    assert_eq!(head.status_flags(&form.gender), flags(&["INVALID", "NEEDS_REVIEW"]));
    // Only INVALID and INCOMPLETE travel upwards.
    assert_eq!(head.status_flags(&form.form), flags(&["DRAFT", "INVALID"]));

    // Once answered properly the extra flag is dropped again.
    commit(&mut repository, |tree| Ok(tree.set(&form.gender, props::VALUE, PropertyValue::from("M"))?));
    assert_eq!(repository.head().status_flags(&form.gender), flags(&[]));
    assert_eq!(repository.head().status_flags(&form.form), flags(&[]));
}

#[test]
fn test_stored_flags_are_only_rewritten_when_they_change() {
    let (mut repository, prenatal) = repository(StatusEngine::new(), Prenatal::create);
    let form = commit(&mut repository, |tree| prenatal.fill(tree, "f1", Some("M"), Some("no")));
    let settled = repository.head().clone();

    commit(&mut repository, |tree| Ok(tree.set(&form.form, "lastModifiedBy", PropertyValue::from("nurse"))?));

    let head = repository.head();
    for path in [&form.gender, &form.pregnancy, &form.pregnant] {
        assert!(head.subtree_eq(&settled, path), "{path}");
    }
    assert_eq!(head.status_flags(&form.form), flags(&[]));
}

#[test]
fn test_flags_written_by_hand_are_corrected() {
    let (mut repository, prenatal) = repository(StatusEngine::new(), Prenatal::create);
    let form = commit(&mut repository, |tree| prenatal.fill(tree, "f1", Some("F"), Some("no")));

    commit(&mut repository, |tree| {
        Ok(tree.set_property(&form.form, STATUS_FLAGS, flags(&["INVALID"]).to_property())?)
    });

    let head = repository.head();
    assert_eq!(head.status_flags(&form.form), flags(&[]));
    assert_eq!(head.string_property(&NodePath::new("/Forms/f1/gender"), props::VALUE).unwrap().as_deref(), Some("F"));
}

#[test]
fn test_flags_on_other_nodes_do_not_count() {
    let (mut repository, prenatal) = repository(StatusEngine::new(), Prenatal::create);
    let form = commit(&mut repository, |tree| {
        let form = prenatal.fill(tree, "f1", Some("F"), Some("no"))?;
        let notes = tree.add_node(&form.form, "notes", "nt:unstructured")?;
        tree.set(&notes, STATUS_FLAGS, flags(&["INVALID"]).to_property())?;
        Ok(form)
    });

    let head = repository.head();
    assert_eq!(head.status_flags(&form.form), flags(&[]));
    assert_eq!(head.status_flags(&form.form.child("notes")), flags(&["INVALID"]));
}
