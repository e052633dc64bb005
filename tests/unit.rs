//! Unit tests for the rule table, attribute patches and request validation.
mod common;
use weft::error::{ConnectionRejected, RequestError};
use weft::inference::{MAX_IMAGES, MAX_SYSTEM_PROMPT_LEN, MAX_USER_MESSAGE_LEN, is_known_model};
use weft::prelude::*;

#[test]
fn rule_table_allows_the_listed_pairs() {
    assert!(validate(NodeKind::Text, "text", NodeKind::Llm, "system_prompt").is_ok());
    assert!(validate(NodeKind::Text, "text", NodeKind::Llm, "user_message").is_ok());
    assert!(validate(NodeKind::Image, "image", NodeKind::Llm, "images").is_ok());
    assert!(validate(NodeKind::Llm, "output", NodeKind::Text, "text").is_ok());
    assert!(validate(NodeKind::Llm, "output", NodeKind::Llm, "user_message").is_ok());
}

#[test]
fn rule_table_rejects_unlisted_targets_of_listed_sources() {
    assert!(validate(NodeKind::Text, "text", NodeKind::Image, "image").is_err());
    assert!(validate(NodeKind::Image, "image", NodeKind::Llm, "system_prompt").is_err());
    assert!(validate(NodeKind::Llm, "output", NodeKind::Image, "image").is_err());
}

#[test]
fn unlisted_source_pairs_fall_through_open() {
    // no rule row exists for these source pairs, so they pass
    assert!(validate(NodeKind::Llm, "trace", NodeKind::Text, "text").is_ok());
    assert!(validate(NodeKind::Text, "annotation", NodeKind::Image, "image").is_ok());
}

#[test]
fn rejection_carries_the_allowed_targets() {
    let rejection: ConnectionRejected =
        validate(NodeKind::Llm, "output", NodeKind::Image, "image").unwrap_err();
    assert_eq!(rejection.source_kind, NodeKind::Llm);
    assert!(rejection.reason.contains("text:text"));
    assert!(rejection.reason.contains("llm:user_message"));
    assert!(rejection.to_string().contains("not allowed"));
}

#[test]
fn node_kind_displays_lowercase() {
    assert_eq!(NodeKind::Text.to_string(), "text");
    assert_eq!(NodeKind::Image.to_string(), "image");
    assert_eq!(NodeKind::Llm.to_string(), "llm");
}

#[test]
fn patch_merge_sets_clears_and_keeps_fields() {
    let data = NodeData::Llm(LlmData {
        model: "gemini-2.5-pro".to_string(),
        system_prompt: "stay brief".to_string(),
        is_running: true,
        response: Some("old".to_string()),
        error: None,
    });

    let merged = data
        .merged(&NodePatch::Llm(LlmPatch {
            is_running: Some(false),
            response: Some(None),
            error: Some(Some("quota exceeded".to_string())),
            ..Default::default()
        }))
        .unwrap();

    let NodeData::Llm(llm) = merged else {
        panic!("merge changed the node kind")
    };
    assert_eq!(llm.model, "gemini-2.5-pro");
    assert_eq!(llm.system_prompt, "stay brief");
    assert!(!llm.is_running);
    assert_eq!(llm.response, None);
    assert_eq!(llm.error.as_deref(), Some("quota exceeded"));
}

#[test]
fn patch_merge_refuses_mismatched_kinds() {
    let data = NodeData::defaults(NodeKind::Text);
    assert!(data.merged(&NodePatch::image("data:image/png;base64,AA==")).is_none());
}

#[test]
fn replace_patch_round_trips_node_data() {
    let data = NodeData::Llm(LlmData {
        model: "gemini-2.0-flash".to_string(),
        system_prompt: "stay in character".to_string(),
        is_running: false,
        response: Some("out".to_string()),
        error: Some("stale".to_string()),
    });
    assert_eq!(data.merged(&NodePatch::replace(&data)), Some(data.clone()));
}

#[test]
fn request_validation_enforces_the_documented_limits() {
    let base = InferenceRequest {
        model: DEFAULT_MODEL.to_string(),
        system_prompt: None,
        user_message: "hello".to_string(),
        images: Vec::new(),
    };
    assert!(base.validate().is_ok());

    let mut request = base.clone();
    request.model = "gpt-oss".to_string();
    assert_eq!(
        request.validate(),
        Err(RequestError::UnknownModel("gpt-oss".to_string()))
    );

    let mut request = base.clone();
    request.user_message = String::new();
    assert_eq!(request.validate(), Err(RequestError::EmptyUserMessage));

    let mut request = base.clone();
    request.user_message = "x".repeat(MAX_USER_MESSAGE_LEN + 1);
    assert!(matches!(
        request.validate(),
        Err(RequestError::UserMessageTooLong { .. })
    ));

    let mut request = base.clone();
    request.system_prompt = Some("y".repeat(MAX_SYSTEM_PROMPT_LEN + 1));
    assert!(matches!(
        request.validate(),
        Err(RequestError::SystemPromptTooLong { .. })
    ));

    let mut request = base.clone();
    request.images = vec!["data:image/png;base64,AA==".to_string(); MAX_IMAGES + 1];
    assert!(matches!(
        request.validate(),
        Err(RequestError::TooManyImages { .. })
    ));

    let mut request = base;
    request.images = vec!["https://example.com/cat.png".to_string()];
    assert_eq!(
        request.validate(),
        Err(RequestError::InvalidImageData { index: 0 })
    );
}

#[test]
fn model_catalog_contains_the_default() {
    assert!(is_known_model(DEFAULT_MODEL));
    assert!(MODELS.iter().any(|model| model.id == DEFAULT_MODEL));
    assert!(!is_known_model("definitely-not-a-model"));
}

#[test]
fn error_display_names_the_offending_ids() {
    let err = RequestError::NodeNotFound("node_42".to_string());
    assert!(err.to_string().contains("node_42"));

    let err = RequestError::NotAnLlmNode("node_7".to_string());
    assert!(err.to_string().contains("node_7"));
}
