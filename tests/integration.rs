//! Integration tests for weft
//!
//! End-to-end scenarios across the store, the rule table, the codec and the
//! inference envelope.
mod common;
use common::*;
use weft::error::RequestError;
use weft::prelude::*;

#[test]
fn build_undo_redo_scenario() {
    let mut store = WorkflowStore::new();

    // add Text node A, add LLM node B, connect A.text -> B.user_message
    let a = store.add_node(NodeKind::Text, Position::new(0.0, 0.0));
    let b = store.add_node(NodeKind::Llm, Position::new(320.0, 0.0));
    connect_ok(&mut store, &a, handle::TEXT, &b, handle::USER_MESSAGE);
    let connected = state(&store);

    // three undos return the graph to empty
    assert!(store.undo());
    assert!(store.undo());
    assert!(store.undo());
    assert!(store.nodes().is_empty());
    assert!(store.edges().is_empty());
    assert_eq!(store.selected(), None);
    assert!(!store.undo());

    // three redos restore the fully connected state
    assert!(store.redo());
    assert!(store.redo());
    assert!(store.redo());
    assert_eq!(state(&store), connected);
    assert!(!store.redo());
}

#[test]
fn assemble_request_reads_the_connected_inputs() {
    let mut store = WorkflowStore::new();
    let prompt = text_node(&mut store, "You are a curator.");
    let message = text_node(&mut store, "Describe the collection.");
    let first_image = image_node(&mut store, "data:image/png;base64,AA==");
    let second_image = image_node(&mut store, "data:image/jpeg;base64,BB==");
    let llm = llm_node(&mut store);

    connect_ok(&mut store, &prompt, handle::TEXT, &llm, handle::SYSTEM_PROMPT);
    connect_ok(&mut store, &message, handle::TEXT, &llm, handle::USER_MESSAGE);
    connect_ok(&mut store, &first_image, handle::IMAGE, &llm, handle::IMAGES);
    connect_ok(&mut store, &second_image, handle::IMAGE, &llm, handle::IMAGES);

    let request = assemble_request(&store, &llm).unwrap();
    assert_eq!(request.model, DEFAULT_MODEL);
    assert_eq!(request.system_prompt.as_deref(), Some("You are a curator."));
    assert_eq!(request.user_message, "Describe the collection.");
    assert_eq!(
        request.images,
        vec![
            "data:image/png;base64,AA==".to_string(),
            "data:image/jpeg;base64,BB==".to_string(),
        ]
    );
    assert!(request.validate().is_ok());
}

#[test]
fn assemble_request_falls_back_to_the_nodes_own_system_prompt() {
    let mut store = WorkflowStore::new();
    let message = text_node(&mut store, "hello");
    let llm = llm_node(&mut store);
    store.update_node(
        &llm,
        NodePatch::Llm(LlmPatch {
            system_prompt: Some("be brief".to_string()),
            ..Default::default()
        }),
    );
    connect_ok(&mut store, &message, handle::TEXT, &llm, handle::USER_MESSAGE);

    let request = assemble_request(&store, &llm).unwrap();
    assert_eq!(request.system_prompt.as_deref(), Some("be brief"));
    assert!(request.images.is_empty());
}

#[test]
fn assemble_request_requires_a_user_message_input() {
    let mut store = WorkflowStore::new();
    let llm = llm_node(&mut store);
    assert_eq!(
        assemble_request(&store, &llm),
        Err(RequestError::MissingUserMessage)
    );

    assert_eq!(
        assemble_request(&store, "ghost"),
        Err(RequestError::NodeNotFound("ghost".to_string()))
    );

    let text = text_node(&mut store, "not an llm");
    assert_eq!(
        assemble_request(&store, &text),
        Err(RequestError::NotAnLlmNode(text.clone()))
    );
}

#[test]
fn chained_llms_feed_responses_downstream() {
    let mut store = WorkflowStore::new();
    let message = text_node(&mut store, "step one");
    let upstream = llm_node(&mut store);
    let downstream = llm_node(&mut store);
    connect_ok(&mut store, &message, handle::TEXT, &upstream, handle::USER_MESSAGE);
    connect_ok(&mut store, &upstream, handle::OUTPUT, &downstream, handle::USER_MESSAGE);

    complete_run(&mut store, &upstream, InferenceResponse::text("step two"));

    let request = assemble_request(&store, &downstream).unwrap();
    assert_eq!(request.user_message, "step two");
}

#[test]
fn run_lifecycle_patches_the_originating_node() {
    let mut store = WorkflowStore::new();
    let message = text_node(&mut store, "go");
    let llm = llm_node(&mut store);
    connect_ok(&mut store, &message, handle::TEXT, &llm, handle::USER_MESSAGE);

    begin_run(&mut store, &llm);
    let NodeData::Llm(running) = &store.node(&llm).unwrap().data else {
        panic!("wrong kind");
    };
    assert!(running.is_running);
    assert_eq!(running.response, None);
    assert_eq!(running.error, None);

    // a failure stores the error verbatim and clears the running flag
    complete_run(
        &mut store,
        &llm,
        InferenceResponse::error("API quota exceeded. Please try again later."),
    );
    let NodeData::Llm(failed) = &store.node(&llm).unwrap().data else {
        panic!("wrong kind");
    };
    assert!(!failed.is_running);
    assert_eq!(failed.response, None);
    assert_eq!(
        failed.error.as_deref(),
        Some("API quota exceeded. Please try again later.")
    );

    // a later success replaces the outcome
    begin_run(&mut store, &llm);
    complete_run(&mut store, &llm, InferenceResponse::text("done"));
    let NodeData::Llm(succeeded) = &store.node(&llm).unwrap().data else {
        panic!("wrong kind");
    };
    assert!(!succeeded.is_running);
    assert_eq!(succeeded.response.as_deref(), Some("done"));
    assert_eq!(succeeded.error, None);
}

#[test]
fn export_import_then_continue_editing() {
    let mut store = WorkflowStore::new();
    let text = text_node(&mut store, "seed");
    let llm = llm_node(&mut store);
    connect_ok(&mut store, &text, handle::TEXT, &llm, handle::USER_MESSAGE);

    let json = export_document(&store).unwrap();
    let mut restored = WorkflowStore::new();
    import_document(&mut restored, &json).unwrap();

    // the imported graph is fully operational: ids survived, so edits and
    // traversals keep working
    let request = assemble_request(&restored, &llm).unwrap();
    assert_eq!(request.user_message, "seed");

    restored.delete_node(&text);
    assert!(restored.edges().is_empty());
    assert!(restored.undo());
    assert_eq!(restored.edges().len(), 1);
}
