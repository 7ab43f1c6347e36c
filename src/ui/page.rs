use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dialogs::{delete_confirm_message, DialogPresenter, PanelOptions, DELETE_CONFIRM_TITLE};
use super::notifications::{Notifier, Operation, PIZZA_KIND};
use super::state::{ActionOutcome, ActionState};
use crate::client::{PizzaClient, TransportResult};
use crate::models::{PizzaEntity, PizzaSize};
use crate::services::{format_price, PriceCalculator};

/// UI events, processed one at a time
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Initialize,
    AddClicked,
    EditClicked(PizzaEntity),
    DeleteClicked(PizzaEntity),
}

/// One line of the catalog grid
#[derive(Debug, Clone, PartialEq)]
pub struct PizzaRow {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub size: PizzaSize,
    pub toppings: String,
    pub price: String,
}

/// Catalog page controller: holds the last loaded snapshot and drives the
/// add, edit and delete flows against a remote catalog
pub struct PizzasPage {
    client: Arc<dyn PizzaClient>,
    price_calculator: Arc<dyn PriceCalculator>,
    notifier: Arc<dyn Notifier>,
    dialogs: Arc<dyn DialogPresenter>,
    pizzas: Vec<PizzaEntity>,
    state: ActionState,
    last_outcome: Option<ActionOutcome>,
}

impl PizzasPage {
    pub fn new(
        client: Arc<dyn PizzaClient>,
        price_calculator: Arc<dyn PriceCalculator>,
        notifier: Arc<dyn Notifier>,
        dialogs: Arc<dyn DialogPresenter>,
    ) -> Self {
        Self {
            client,
            price_calculator,
            notifier,
            dialogs,
            pizzas: Vec::new(),
            state: ActionState::Idle,
            last_outcome: None,
        }
    }

    pub fn pizzas(&self) -> &[PizzaEntity] {
        &self.pizzas
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn last_outcome(&self) -> Option<&ActionOutcome> {
        self.last_outcome.as_ref()
    }

    pub async fn initialize(&mut self) -> TransportResult<()> {
        self.load_pizzas().await
    }

    /// Replace the snapshot; on failure the previous snapshot is kept
    #[instrument(skip(self))]
    pub async fn load_pizzas(&mut self) -> TransportResult<()> {
        let pizzas = self.client.get_all_pizzas().await?;
        info!("Loaded {} pizzas", pizzas.len());
        self.pizzas = pizzas;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn on_add_new_pizza_click(&mut self) -> ActionOutcome {
        let result = self.dialogs.show_panel(PanelOptions::add()).await;
        let Some(pizza) = result.into_submitted() else {
            return self.settle(ActionOutcome::Cancelled);
        };

        self.start(Operation::Add, &pizza.name);
        let result = self.client.add_pizza(&pizza).await.map(|_| 1);
        self.complete(Operation::Add, &pizza.name, result).await
    }

    #[instrument(skip(self, pizza), fields(id = ?pizza.id))]
    pub async fn on_edit_pizza_click(&mut self, pizza: PizzaEntity) -> ActionOutcome {
        let result = self.dialogs.show_panel(PanelOptions::edit(pizza)).await;
        let Some(edited) = result.into_submitted() else {
            // The panel may have mutated the shown row
            self.reload().await;
            return self.settle(ActionOutcome::Cancelled);
        };

        self.start(Operation::Update, &edited.name);
        let result = self.client.update_pizza(&edited).await;
        self.complete(Operation::Update, &edited.name, result).await
    }

    #[instrument(skip(self, pizza), fields(id = ?pizza.id))]
    pub async fn on_delete_pizza_click(&mut self, pizza: PizzaEntity) -> ActionOutcome {
        let confirmation = self
            .dialogs
            .confirm(DELETE_CONFIRM_TITLE, &delete_confirm_message(&pizza.name))
            .await;
        if confirmation.cancelled {
            return self.settle(ActionOutcome::Cancelled);
        }

        self.start(Operation::Delete, &pizza.name);
        let result = match pizza.id {
            Some(id) => self.client.delete_pizza(id).await,
            None => Ok(0),
        };
        self.complete(Operation::Delete, &pizza.name, result).await
    }

    pub fn display_price(&self, pizza: &PizzaEntity) -> String {
        format_price(self.price_calculator.calculate_price(pizza))
    }

    pub fn rows(&self) -> Vec<PizzaRow> {
        self.pizzas
            .iter()
            .map(|pizza| PizzaRow {
                id: pizza.id,
                name: pizza.name.clone(),
                description: pizza.description.clone().unwrap_or_default(),
                size: pizza.size,
                toppings: pizza
                    .toppings
                    .iter()
                    .map(|t| t.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                price: self.display_price(pizza),
            })
            .collect()
    }

    pub async fn dispatch(&mut self, event: PageEvent) {
        match event {
            PageEvent::Initialize => {
                if let Err(err) = self.initialize().await {
                    crate::warn_with_trace!("Initial load failed: {}", err);
                }
            }
            PageEvent::AddClicked => {
                self.on_add_new_pizza_click().await;
            }
            PageEvent::EditClicked(pizza) => {
                self.on_edit_pizza_click(pizza).await;
            }
            PageEvent::DeleteClicked(pizza) => {
                self.on_delete_pizza_click(pizza).await;
            }
        }
    }

    /// Process events until every sender is dropped
    pub async fn run(&mut self, mut events: mpsc::Receiver<PageEvent>) {
        while let Some(event) = events.recv().await {
            self.dispatch(event).await;
        }
        info!("Page event channel closed");
    }

    fn start(&mut self, operation: Operation, name: &str) {
        self.state.begin(operation);
        self.notifier
            .show_progress(operation.progress_key(), PIZZA_KIND, name, operation);
    }

    /// Close the progress toast, report the result and reload when the
    /// store may have changed. A transport failure leaves the snapshot alone.
    async fn complete(
        &mut self,
        operation: Operation,
        name: &str,
        result: TransportResult<u64>,
    ) -> ActionOutcome {
        self.notifier.close_progress(operation.progress_key());

        let outcome = match result {
            Err(err) => {
                let message = err.to_string();
                self.notifier
                    .show_failure(PIZZA_KIND, name, operation, &message);
                ActionOutcome::Failed(message)
            }
            Ok(0) => {
                let message = format!("{} {} no longer exists", PIZZA_KIND, name);
                self.notifier
                    .show_failure(PIZZA_KIND, name, operation, &message);
                self.reload().await;
                ActionOutcome::Failed(message)
            }
            Ok(_) => {
                self.notifier.show_success(PIZZA_KIND, name, operation);
                self.reload().await;
                ActionOutcome::Succeeded
            }
        };

        self.state.finish(&outcome);
        self.settle(outcome)
    }

    fn settle(&mut self, outcome: ActionOutcome) -> ActionOutcome {
        self.state.reset();
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    async fn reload(&mut self) {
        if let Err(err) = self.load_pizzas().await {
            crate::warn_with_trace!("Reload failed, keeping previous snapshot: {}", err);
        }
    }
}
