//! Recomputing an unchanged form changes nothing.

mod common;

use common::{info, init_tracing};
use example_forms::{CardiacRehab, Intake, content_tree};
use form_status::memory::MemoryRepository;
use form_status::{NodeKind, NodeStore, StatusEngine, StatusFlag, StatusFlags, TreeError};
use proptest::prelude::*;
use proptest::sample::{select, subsequence};

fn intake() -> impl Strategy<Value = Intake> {
    let answer = || proptest::option::of(select(vec!["yes", "no", "II"]));
    (
        proptest::option::of(0i64..200),
        subsequence(vec!["chest pain", "fatigue", "palpitations", "shortness of breath"], 0..=4),
        proptest::option::of(select(vec!["2025-06-01", "2026-01-01", "2026-03-01"])),
        answer(),
        answer(),
        answer(),
    )
        .prop_map(|(age, symptoms, last_event, falls, angina_class, event_details)| Intake {
            age,
            symptoms,
            last_event,
            falls,
            angina_class,
            event_details,
        })
}

/// Form and AnswerSection nodes carry DRAFT iff they are INVALID or
/// INCOMPLETE. Answers never carry it.
fn draft_is_consistent(kind: &NodeKind, flags: &StatusFlags) -> bool {
    let draft = flags.contains(StatusFlag::Draft);
    match kind {
        NodeKind::Answer => !draft,
        NodeKind::Form | NodeKind::AnswerSection => {
            draft == (flags.contains(StatusFlag::Invalid) || flags.contains(StatusFlag::Incomplete))
        }
        _ => false,
    }
}

proptest! {
    #[test]
    fn prop_second_pass_is_identical(intake in intake()) {
        init_tracing();
        let mut tree = content_tree().unwrap();
        let rehab = CardiacRehab::create(&mut tree).unwrap();
        let form = rehab.fill(&mut tree, "f1", &intake).unwrap();
        let engine = StatusEngine::new();

        let first = engine.evaluate_form(&tree, None, &tree, &form.form).unwrap();
        first.write(&mut tree).unwrap();
        let second = engine.evaluate_form(&tree, None, &tree, &form.form).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(second.write(&mut tree).unwrap(), 0);
    }

    #[test]
    fn prop_draft_marks_problem_containers(intake in intake()) {
        let mut tree = content_tree().unwrap();
        let rehab = CardiacRehab::create(&mut tree).unwrap();
        let form = rehab.fill(&mut tree, "f1", &intake).unwrap();

        let status = StatusEngine::new().evaluate_form(&tree, None, &tree, &form.form).unwrap();
        for (path, flags) in &status.flags {
            let kind = tree.kind(path).unwrap();
            prop_assert!(kind.carries_status(), "{} is a {:?}", path, kind);
            prop_assert!(draft_is_consistent(&kind, flags), "{} ({:?}) has {}", path, kind, flags);
        }
    }

    #[test]
    fn prop_commit_matches_direct_evaluation(intake in intake()) {
        let mut tree = content_tree().unwrap();
        let rehab = CardiacRehab::create(&mut tree).unwrap();
        let mut repository = MemoryRepository::with_tree(tree);
        repository.register(StatusEngine::new().editor_provider());

        let mut form = None;
        repository
            .commit(&info(), |tree| {
                form = Some(rehab.fill(tree, "f1", &intake).map_err(TreeError::backend)?);
                Ok(())
            })
            .unwrap();
        let form = form.unwrap();

        // Without a before-tree no answer counts as new. That only ever adds
        // INVALID, so INCOMPLETE must agree everywhere.
        let head = repository.head();
        let status = StatusEngine::new().evaluate_form(head, None, head, &form.form).unwrap();
        for (path, flags) in &status.flags {
            prop_assert_eq!(
                head.status_flags(path).contains(StatusFlag::Incomplete),
                flags.contains(StatusFlag::Incomplete),
                "{}", path
            );
        }
    }
}
