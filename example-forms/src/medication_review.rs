//! Medication review, loaded from JSON content the way a repository export
//! would look.

use anyhow::Result;
use form_status::NodePath;
use form_status::memory::MemoryTree;

use crate::fixture::{FORMS, QUESTIONNAIRES};

/// `taking_medication` (one answer); `medications`, when it is `yes`, with
/// `drug_name` and `dose_mg` (a double between 0 and 1000).
pub const QUESTIONNAIRE: &str = r#"{
    "jcr:primaryType": "cards:Questionnaire",
    "jcr:uuid": "mr-questionnaire",
    "taking_medication": {
        "jcr:primaryType": "cards:Question",
        "jcr:uuid": "mr-taking-medication",
        "dataType": "text",
        "minAnswers": 1,
        "maxAnswers": 1
    },
    "medications": {
        "jcr:primaryType": "cards:Section",
        "jcr:uuid": "mr-medications",
        "condition": {
            "jcr:primaryType": "cards:Conditional",
            "comparator": "=",
            "dataType": "text",
            "operandA": {
                "jcr:primaryType": "cards:ConditionalValue",
                "value": ["taking_medication"],
                "isReference": true
            },
            "operandB": {
                "jcr:primaryType": "cards:ConditionalValue",
                "value": ["yes"],
                "isReference": false
            }
        },
        "drug_name": {
            "jcr:primaryType": "cards:Question",
            "jcr:uuid": "mr-drug-name",
            "dataType": "text",
            "minAnswers": 1,
            "maxAnswers": 1
        },
        "dose_mg": {
            "jcr:primaryType": "cards:Question",
            "jcr:uuid": "mr-dose",
            "dataType": "double",
            "minAnswers": 1,
            "maxAnswers": 1,
            "minValue": 0,
            "maxValue": 1000
        }
    }
}"#;

/// A review stating medication is taken, with a dose far out of range.
pub const OVERDOSE_FORM: &str = r#"{
    "jcr:primaryType": "cards:Form",
    "jcr:uuid": "mr-form-1",
    "questionnaire": "mr-questionnaire",
    "taking_medication": {
        "jcr:primaryType": "cards:TextAnswer",
        "question": "mr-taking-medication",
        "value": "yes"
    },
    "medications": {
        "jcr:primaryType": "cards:AnswerSection",
        "section": "mr-medications",
        "drug_name": {
            "jcr:primaryType": "cards:TextAnswer",
            "question": "mr-drug-name",
            "value": "warfarin"
        },
        "dose_mg": {
            "jcr:primaryType": "cards:DoubleAnswer",
            "question": "mr-dose",
            "value": 5000
        }
    }
}"#;

/// A review stating no medication is taken; the medications section is left blank.
pub const NO_MEDICATION_FORM: &str = r#"{
    "jcr:primaryType": "cards:Form",
    "jcr:uuid": "mr-form-2",
    "questionnaire": "mr-questionnaire",
    "taking_medication": {
        "jcr:primaryType": "cards:TextAnswer",
        "question": "mr-taking-medication",
        "value": "no"
    },
    "medications": {
        "jcr:primaryType": "cards:AnswerSection",
        "section": "mr-medications",
        "drug_name": {
            "jcr:primaryType": "cards:TextAnswer",
            "question": "mr-drug-name"
        },
        "dose_mg": {
            "jcr:primaryType": "cards:DoubleAnswer",
            "question": "mr-dose"
        }
    }
}"#;

/// Load the questionnaire into a content tree.
pub fn load_questionnaire(tree: &mut MemoryTree) -> Result<NodePath> {
    Ok(tree.load_json(&NodePath::new(QUESTIONNAIRES), "MedicationReview", QUESTIONNAIRE)?)
}

/// Load one of the form documents under `/Forms`.
pub fn load_form(tree: &mut MemoryTree, name: &str, json: &str) -> Result<NodePath> {
    Ok(tree.load_json(&NodePath::new(FORMS), name, json)?)
}
