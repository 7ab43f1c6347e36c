use std::sync::Arc;
use std::time::Duration;

use pizza_admin::client::{HttpPizzaClient, PizzaClient};
use pizza_admin::models::PizzaEntity;
use pizza_admin::services::StandardPriceCalculator;
use pizza_admin::ui::{
    ActionOutcome, ActionState, DialogResult, Operation, PageEvent, PizzasPage,
};
use rust_decimal_macros::dec;
use tokio::sync::mpsc;

mod common;
use common::*;

fn page_for(
    client: HttpPizzaClient,
    notifier: Arc<RecordingNotifier>,
    dialogs: Arc<ScriptedDialogs>,
) -> PizzasPage {
    PizzasPage::new(
        Arc::new(client),
        Arc::new(StandardPriceCalculator::default()),
        notifier,
        dialogs,
    )
}

#[tokio::test]
async fn test_add_flow_against_live_service() {
    let test_env = TestEnvironment::new().await;
    let notifier = Arc::new(RecordingNotifier::default());
    let dialogs = Arc::new(ScriptedDialogs::answering(vec![DialogResult::submitted(
        PizzaEntity::new("Funghi").with_topping("Mushrooms", dec!(1.20)),
    )]));

    let mut page = page_for(
        test_env.pizza_client.clone(),
        notifier.clone(),
        dialogs.clone(),
    );
    page.initialize().await.unwrap();
    assert!(page.pizzas().is_empty());

    let outcome = page.on_add_new_pizza_click().await;

    assert_eq!(outcome, ActionOutcome::Succeeded);
    assert_eq!(page.state(), ActionState::Idle);
    assert_eq!(page.pizzas().len(), 1);
    assert_eq!(page.rows()[0].price, "11.20");
    assert_eq!(
        notifier.toasts(),
        vec![
            Toast::Progress("add_pizza".to_string(), Operation::Add),
            Toast::Closed("add_pizza".to_string()),
            Toast::Success("Funghi".to_string(), Operation::Add),
        ]
    );

    let panels = dialogs.panels.lock().unwrap();
    assert_eq!(panels[0].title, "Add a pizza");
    assert_eq!(panels[0].content.name, "New Pizza");
}

#[tokio::test]
async fn test_add_with_service_down_keeps_snapshot() {
    let test_env = TestEnvironment::new().await;
    test_env.seed_test_data().await;

    let notifier = Arc::new(RecordingNotifier::default());
    let dialogs = Arc::new(ScriptedDialogs::answering(vec![DialogResult::submitted(
        PizzaEntity::new("Funghi"),
    )]));

    // Load through the live service, then act through a dead endpoint
    let mut page = page_for(
        test_env.pizza_client.clone(),
        notifier.clone(),
        dialogs.clone(),
    );
    page.initialize().await.unwrap();
    let before = page.pizzas().to_vec();

    let dead = HttpPizzaClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let mut offline = page_for(dead, notifier.clone(), dialogs);
    offline.dispatch(PageEvent::Initialize).await;
    let outcome = offline.on_add_new_pizza_click().await;

    assert!(matches!(outcome, ActionOutcome::Failed(_)));
    assert!(offline.pizzas().is_empty());
    assert_eq!(page.pizzas(), before.as_slice());

    let toasts = notifier.toasts();
    assert!(matches!(
        toasts.last(),
        Some(Toast::Failure(name, Operation::Add, _)) if name == "Funghi"
    ));
}

#[tokio::test]
async fn test_edit_then_delete_through_event_loop() {
    let test_env = TestEnvironment::new().await;
    let created = test_env
        .pizza_client
        .add_pizza(&PizzaEntity::new("Quattro Stagioni"))
        .await
        .unwrap();

    let mut renamed = created.clone();
    renamed.name = "Quattro Formaggi".to_string();

    let notifier = Arc::new(RecordingNotifier::default());
    let dialogs = Arc::new(ScriptedDialogs::answering(vec![
        DialogResult::submitted(renamed.clone()),
        DialogResult::confirmed(),
    ]));
    let mut page = page_for(
        test_env.pizza_client.clone(),
        notifier.clone(),
        dialogs.clone(),
    );

    let (tx, rx) = mpsc::channel(4);
    tx.send(PageEvent::Initialize).await.unwrap();
    tx.send(PageEvent::EditClicked(created.clone())).await.unwrap();
    tx.send(PageEvent::DeleteClicked(renamed.clone())).await.unwrap();
    drop(tx);

    page.run(rx).await;

    assert!(page.pizzas().is_empty());
    assert_eq!(page.last_outcome(), Some(&ActionOutcome::Succeeded));
    assert_eq!(
        dialogs.confirmations.lock().unwrap()[0],
        (
            "Delete Pizza".to_string(),
            "Are you sure you want to delete Quattro Formaggi?".to_string()
        )
    );

    let successes: Vec<_> = notifier
        .toasts()
        .into_iter()
        .filter(|t| matches!(t, Toast::Success(..)))
        .collect();
    assert_eq!(
        successes,
        vec![
            Toast::Success("Quattro Formaggi".to_string(), Operation::Update),
            Toast::Success("Quattro Formaggi".to_string(), Operation::Delete),
        ]
    );
}

#[tokio::test]
async fn test_edit_cancel_reloads_without_update() {
    let test_env = TestEnvironment::new().await;
    let created = test_env
        .pizza_client
        .add_pizza(&PizzaEntity::new("Napoli"))
        .await
        .unwrap();

    let notifier = Arc::new(RecordingNotifier::default());
    let dialogs = Arc::new(ScriptedDialogs::answering(vec![DialogResult::cancelled()]));
    let mut page = page_for(
        test_env.pizza_client.clone(),
        notifier.clone(),
        dialogs,
    );

    // Snapshot is empty until the cancel-triggered reload
    let outcome = page.on_edit_pizza_click(created.clone()).await;

    assert_eq!(outcome, ActionOutcome::Cancelled);
    assert_eq!(page.pizzas(), &[created]);
    assert!(notifier.toasts().is_empty());

    let update_count = test_env
        .metrics
        .pizza_operations_total
        .with_label_values(&["update", "success"])
        .get();
    assert_eq!(update_count, 0.0);
}

#[tokio::test]
async fn test_edit_of_deleted_pizza_reports_failure() {
    let test_env = TestEnvironment::new().await;
    let created = test_env
        .pizza_client
        .add_pizza(&PizzaEntity::new("Romana"))
        .await
        .unwrap();
    test_env
        .pizza_client
        .delete_pizza(created.id.unwrap())
        .await
        .unwrap();

    let notifier = Arc::new(RecordingNotifier::default());
    let dialogs = Arc::new(ScriptedDialogs::answering(vec![DialogResult::confirmed()]));
    let mut page = page_for(
        test_env.pizza_client.clone(),
        notifier.clone(),
        dialogs,
    );

    let outcome = page.on_edit_pizza_click(created).await;

    match outcome {
        ActionOutcome::Failed(message) => assert!(message.contains("no longer exists")),
        other => panic!("Expected failure, got {:?}", other),
    }
    assert!(page.pizzas().is_empty());
}
