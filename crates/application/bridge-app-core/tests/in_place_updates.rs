mod common;

use bridge_app_core::{NavigateOptions, NavigationError, NavigationOutcome};
use bridge_core::{FrameId, Message, MessageLevel, ProtocolRequest, ProtocolResponse};
use common::{bootstrapped, fresh, render, render_with};
use serde_json::json;

#[tokio::test]
async fn replace_path_updates_current_frame_without_new_entry() {
    let mut h = bootstrapped();

    assert!(h.controller.replace_path(FrameId(0), "/?page=2"));
    assert!(h.controller.replace_path(FrameId(0), "/?page=3"));

    let frame = h.controller.current_frame().unwrap();
    assert_eq!(frame.id, FrameId(0));
    assert_eq!(frame.path, "/?page=3");
    assert_eq!(h.history.len(), 1);
    assert_eq!(h.history.current().path, "/?page=3");
    h.server.assert_idle();
}

#[tokio::test]
async fn replace_path_for_stale_frame_is_ignored() {
    let mut h = bootstrapped();

    let ticket = h.controller.navigate("/next", NavigateOptions::default());
    h.server.next().await.respond(render("Next"));
    h.controller.settle(ticket).await.unwrap().unwrap();

    assert!(!h.controller.replace_path(FrameId(0), "/elsewhere"));
    assert_eq!(h.controller.current_frame().unwrap().path, "/next");
    assert_eq!(h.history.current().path, "/next");
}

#[tokio::test]
async fn refresh_updates_props_in_place_and_appends_messages() {
    let mut h = bootstrapped();
    h.controller
        .push_message(Message::text(MessageLevel::Info, "Already here"));

    let ticket = h.controller.refresh_props();
    assert!(h.controller.page_loading());
    let call = h.server.next().await;
    assert_eq!(call.request, ProtocolRequest::get("/"));
    call.respond(render_with(
        "Dashboard",
        json!({"unread": 3}),
        vec![Message::text(MessageLevel::Success, "Refreshed")],
    ));

    let outcome = h.controller.settle(ticket).await.unwrap();
    assert_eq!(
        outcome,
        Ok(NavigationOutcome::Updated {
            frame_id: FrameId(0)
        })
    );

    let frame = h.controller.current_frame().unwrap();
    assert_eq!(frame.id, FrameId(0));
    assert_eq!(frame.view, "Dashboard");
    assert_eq!(frame.props["unread"], 3);
    assert!(!h.controller.page_loading());
    assert_eq!(h.controller.messages().len(), 2);
    assert_eq!(h.history.len(), 1);
}

#[tokio::test]
async fn refresh_uses_the_replaced_path() {
    let mut h = bootstrapped();
    h.controller.replace_path(FrameId(0), "/?q=rust");

    let ticket = h.controller.refresh_props();
    let call = h.server.next().await;
    assert_eq!(call.request.path, "/?q=rust");
    call.respond(render("Home"));
    h.controller.settle(ticket).await.unwrap().unwrap();
}

#[tokio::test]
async fn refresh_for_replaced_frame_is_discarded() {
    let mut h = bootstrapped();

    let refresh = h.controller.refresh_props();
    let navigation = h.controller.navigate("/next", NavigateOptions::default());
    let (refresh_call, nav_call) = h.server.next_pair().await;
    assert_eq!(refresh_call.request.path, "/");
    assert_eq!(nav_call.request.path, "/next");

    nav_call.respond(render("Next"));
    h.controller.settle(navigation).await.unwrap().unwrap();

    refresh_call.respond(render_with("Home", json!({"stale": true}), vec![]));
    let outcome = h.controller.settle(refresh).await.unwrap();
    assert_eq!(outcome, Ok(NavigationOutcome::Superseded));

    let frame = h.controller.current_frame().unwrap();
    assert_eq!(frame.id, FrameId(1));
    assert_eq!(frame.view, "Next");
    assert!(frame.props.get("stale").is_none());
    assert!(!h.controller.page_loading());
}

#[tokio::test]
async fn refresh_failure_keeps_frame_and_appends_error() {
    let mut h = bootstrapped();
    h.controller
        .push_message(Message::text(MessageLevel::Info, "Hello"));

    let ticket = h.controller.refresh_props();
    h.server.next().await.respond(ProtocolResponse::ServerError);
    h.controller.settle(ticket).await.unwrap().unwrap();

    assert_eq!(h.controller.current_frame().unwrap().view, "Home");
    let messages = h.controller.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1], Message::error(bridge_config::SERVER_ERROR_TEXT));
}

#[tokio::test]
async fn refresh_redirect_becomes_a_navigation() {
    let mut h = bootstrapped();

    let ticket = h.controller.refresh_props();
    h.server
        .next()
        .await
        .respond(ProtocolResponse::Redirect {
            path: "/login".into(),
        });
    h.controller.next_event().await;

    let follow_up = h.server.next().await;
    assert_eq!(follow_up.request, ProtocolRequest::get("/login"));
    follow_up.respond(render("Login"));

    let outcome = h.controller.settle(ticket).await.unwrap();
    assert_eq!(
        outcome,
        Ok(NavigationOutcome::Committed {
            frame_id: FrameId(1)
        })
    );
    assert_eq!(h.history.current().path, "/login");
}

#[tokio::test]
async fn refresh_redirect_yields_to_a_newer_navigation() {
    let mut h = bootstrapped();

    let refresh = h.controller.refresh_props();
    let navigation = h.controller.navigate("/newer", NavigateOptions::default());
    let (refresh_call, nav_call) = h.server.next_pair().await;
    assert_eq!(refresh_call.request.path, "/");
    assert_eq!(nav_call.request.path, "/newer");

    refresh_call.respond(ProtocolResponse::Redirect {
        path: "/login".into(),
    });
    let outcome = h.controller.settle(refresh).await.unwrap();
    assert_eq!(outcome, Ok(NavigationOutcome::Superseded));
    h.server.assert_idle();

    nav_call.respond(render("Newer"));
    let outcome = h.controller.settle(navigation).await.unwrap();
    assert_eq!(
        outcome,
        Ok(NavigationOutcome::Committed {
            frame_id: FrameId(1)
        })
    );
    assert_eq!(h.controller.current_frame().unwrap().path, "/newer");
    assert_eq!(h.history.current().path, "/newer");
    assert!(!h.controller.page_loading());
}

#[tokio::test]
async fn refresh_before_first_frame_is_an_error() {
    let mut h = fresh();
    assert!(h.controller.is_loading());

    let ticket = h.controller.refresh_props();
    let outcome = h.controller.settle(ticket).await;
    assert_eq!(outcome, Some(Err(NavigationError::NoCurrentFrame)));
    h.server.assert_idle();
}
