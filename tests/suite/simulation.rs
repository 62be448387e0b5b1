//! End-to-end stage machine tests through the application layer

use std::time::Duration;

use venosim_engine::{App, DETACH_DELAY, Simulation, Stage, TransitionError, VenosimConfig};

use crate::common;

fn offline_app() -> App {
    App::new(&VenosimConfig::default())
}

/// Drain events until the in-flight request resolves (or give up).
async fn settle(app: &mut App) {
    for _ in 0..250 {
        app.process_events();
        if !app.is_loading() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("explanation request never resolved");
}

#[tokio::test]
async fn full_demo_walkthrough() {
    let mut app = offline_app();
    assert_eq!(app.stage(), Stage::Normal);

    app.select_stage(Stage::Varicose).unwrap();
    app.select_stage(Stage::ThrombusFormed).unwrap();
    app.detach().unwrap();
    assert_eq!(app.stage(), Stage::Detaching);
    assert!(app.controls_locked());

    app.tick(DETACH_DELAY);
    assert_eq!(app.stage(), Stage::PostEmbolism);
    assert!(!app.controls_locked());

    // Restart the demo from the terminal stage.
    app.select_stage(Stage::Normal).unwrap();
    assert_eq!(app.stage(), Stage::Normal);
}

#[tokio::test]
async fn detach_timer_fires_exactly_once() {
    let mut app = offline_app();
    app.select_stage(Stage::ThrombusFormed).unwrap();
    app.detach().unwrap();

    // Just short of the deadline: still detaching.
    app.tick(DETACH_DELAY - Duration::from_millis(1));
    assert_eq!(app.stage(), Stage::Detaching);

    app.tick(Duration::from_millis(1));
    assert_eq!(app.stage(), Stage::PostEmbolism);

    // Further time never re-fires the transition.
    app.tick(DETACH_DELAY);
    assert_eq!(app.stage(), Stage::PostEmbolism);
}

#[tokio::test]
async fn selections_are_rejected_while_detaching() {
    let mut app = offline_app();
    app.select_stage(Stage::ThrombusFormed).unwrap();
    app.detach().unwrap();

    for target in [Stage::Normal, Stage::Varicose, Stage::ThrombusFormed] {
        assert_eq!(
            app.select_stage(target),
            Err(TransitionError::DetachInProgress)
        );
    }
    assert_eq!(app.detach(), Err(TransitionError::DetachInProgress));
    assert_eq!(app.stage(), Stage::Detaching);
}

#[tokio::test]
async fn detach_requires_a_formed_thrombus() {
    let mut app = offline_app();

    assert!(matches!(
        app.detach(),
        Err(TransitionError::DetachRequiresThrombus { .. })
    ));

    app.select_stage(Stage::Varicose).unwrap();
    assert!(app.detach().is_err());
    assert_eq!(app.stage(), Stage::Varicose);
}

#[test]
fn terminal_stages_are_not_user_selectable() {
    let mut simulation = Simulation::new();
    assert_eq!(
        simulation.select(Stage::Detaching),
        Err(TransitionError::NotUserSelectable(Stage::Detaching))
    );
    assert_eq!(
        simulation.select(Stage::PostEmbolism),
        Err(TransitionError::NotUserSelectable(Stage::PostEmbolism))
    );
    assert_eq!(simulation.stage(), Stage::Normal);
}

#[test]
fn reselecting_the_current_stage_is_allowed() {
    let mut simulation = Simulation::new();
    simulation.select(Stage::Varicose).unwrap();
    assert_eq!(simulation.select(Stage::Varicose), Ok(Stage::Varicose));
}

#[tokio::test]
async fn explanations_flow_from_the_backend_into_the_app() {
    let server = common::start_gemini_mock().await;
    common::mount_explanation(
        &server,
        "Healthy Veins",
        "One-way valves keep blood moving toward the heart.",
        "info",
    )
    .await;

    let config = VenosimConfig {
        api_key: Some("test-key".to_string()),
        api_base_url: Some(server.uri()),
        ..VenosimConfig::default()
    };
    let mut app = App::new(&config);
    assert!(app.is_online());
    assert!(app.is_loading());

    settle(&mut app).await;
    assert_eq!(app.explanation().unwrap().title, "Healthy Veins");

    // A stage change issues a fresh request against the same backend.
    app.select_stage(Stage::Varicose).unwrap();
    assert!(app.is_loading());
    settle(&mut app).await;
    assert!(app.explanation().is_some());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn backend_failure_still_settles_the_app() {
    let server = common::start_gemini_mock().await;
    common::mount_error(&server, 500).await;

    let config = VenosimConfig {
        api_key: Some("test-key".to_string()),
        api_base_url: Some(server.uri()),
        ..VenosimConfig::default()
    };
    let mut app = App::new(&config);

    settle(&mut app).await;
    let explanation = app.explanation().unwrap();
    assert!(explanation.title.contains("unavailable"));
}

#[tokio::test]
async fn clot_travel_progress_tracks_the_detach_window() {
    let mut app = offline_app();
    assert_eq!(app.clot_travel_progress(), 0.0);

    app.select_stage(Stage::ThrombusFormed).unwrap();
    assert_eq!(app.clot_travel_progress(), 0.0);

    app.detach().unwrap();
    app.tick(Duration::from_secs(3));
    let mid = app.clot_travel_progress();
    assert!(mid > 0.0 && mid < 1.0, "mid-travel progress: {mid}");

    app.tick(DETACH_DELAY);
    assert_eq!(app.stage(), Stage::PostEmbolism);
    assert_eq!(app.clot_travel_progress(), 1.0);
}
