// Console command tests: toggles routed to room pages by id

mod common;

use common::{Reply, StubTransport, find};
use energy_dashboard::actions::{ActionDispatcher, DispatchOutcome};
use energy_dashboard::console::{Command, CommandError, Console};
use energy_dashboard::dom::{self, SharedDocument};
use energy_dashboard::error::ApiError;
use energy_dashboard::models::ApplianceState;
use energy_dashboard::notify::{NotificationTiming, Notifier};
use energy_dashboard::render::{PageView, RoomDetailView};
use energy_dashboard::transport::Endpoint;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

fn room(
    stub: &Arc<StubTransport>,
    room_id: &str,
    appliances: &[&str],
) -> (SharedDocument, ActionDispatcher) {
    let view = RoomDetailView::new(room_id, appliances.iter().map(|a| a.to_string()).collect());
    let document = dom::shared(view.skeleton());
    let notifier = Notifier::new(document.clone(), NotificationTiming::default());
    let dispatcher = ActionDispatcher::new(stub.clone(), document.clone(), notifier);
    (document, dispatcher)
}

fn console(stub: &Arc<StubTransport>) -> (Console, SharedDocument, SharedDocument) {
    let mut console = Console::new();
    let (kitchen, dispatcher) = room(stub, "kitchen", &["fridge", "oven"]);
    console.add_room("kitchen", kitchen.clone(), dispatcher);
    let (lounge, dispatcher) = room(stub, "lounge", &["tv"]);
    console.add_room("lounge", lounge.clone(), dispatcher);
    (console, kitchen, lounge)
}

fn toggle(room_id: &str, appliance_id: &str) -> Command {
    Command::Toggle {
        room_id: room_id.into(),
        appliance_id: appliance_id.into(),
    }
}

fn state_of(document: &SharedDocument, appliance_id: &str) -> Option<String> {
    let doc = dom::lock(document);
    let node = find(&doc, &format!("[data-id=\"{appliance_id}\"]"));
    doc.attr(node, "data-state").map(str::to_string)
}

#[tokio::test]
async fn toggle_command_acts_on_the_named_room_only() {
    let stub = Arc::new(
        StubTransport::new().respond(&Endpoint::ToggleAppliance, Reply::ok(json!({ "success": true }))),
    );
    let (console, kitchen, lounge) = console(&stub);
    let lounge_before = dom::lock(&lounge).to_html();

    let outcome = console.execute(&toggle("kitchen", "oven")).await;
    assert_eq!(
        outcome,
        Ok(DispatchOutcome::Toggled {
            appliance_id: "oven".into(),
            state: ApplianceState::On
        })
    );
    assert_eq!(state_of(&kitchen, "oven").as_deref(), Some("on"));
    assert_eq!(
        stub.posts(),
        vec![(
            "toggle-appliance".to_string(),
            json!({ "appliance_id": "oven", "state": "on" })
        )]
    );
    assert_eq!(dom::lock(&lounge).to_html(), lounge_before);
}

#[tokio::test]
async fn unknown_room_or_appliance_posts_nothing() {
    let stub = Arc::new(StubTransport::new());
    let (console, _, _) = console(&stub);

    assert_eq!(
        console.execute(&toggle("attic", "fan")).await,
        Err(CommandError::UnknownRoom("attic".into()))
    );
    assert_eq!(
        console.execute(&toggle("lounge", "fridge")).await,
        Err(CommandError::UnknownAppliance {
            room_id: "lounge".into(),
            appliance_id: "fridge".into()
        })
    );
    assert!(stub.posts().is_empty());
}

#[tokio::test]
async fn server_failure_is_reported_as_outcome() {
    let stub = Arc::new(StubTransport::new().respond(
        &Endpoint::ToggleAppliance,
        Reply::err(ApiError::Status(503)),
    ));
    let (console, kitchen, _) = console(&stub);
    let before = state_of(&kitchen, "fridge");

    let outcome = console.execute(&toggle("kitchen", "fridge")).await;
    assert_eq!(outcome, Ok(DispatchOutcome::Failed(ApiError::Status(503))));
    assert_eq!(state_of(&kitchen, "fridge"), before);
}

#[tokio::test]
async fn run_executes_lines_until_input_closes() {
    let stub = Arc::new(
        StubTransport::new().respond(&Endpoint::ToggleAppliance, Reply::ok(json!({}))),
    );
    let (console, kitchen, lounge) = console(&stub);
    let (tx, rx) = mpsc::channel(8);

    for line in [
        "toggle kitchen fridge",
        "",
        "reboot",
        "toggle lounge",
        "toggle attic fan",
        "toggle lounge tv",
        "toggle kitchen fridge",
    ] {
        tx.send(line.to_string()).await.unwrap();
    }
    drop(tx);
    console.run(rx).await;

    assert_eq!(stub.posts().len(), 3);
    assert_eq!(state_of(&kitchen, "fridge").as_deref(), Some("off"));
    assert_eq!(state_of(&lounge, "tv").as_deref(), Some("on"));
}
