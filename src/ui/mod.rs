// Catalog page controller and the dialog/toast seams it renders through

pub mod dialogs;
pub mod notifications;
pub mod page;
pub mod state;

pub use dialogs::{DialogPresenter, DialogResult, PanelAlignment, PanelOptions};
pub use notifications::{Notifier, Operation, TracingNotifier};
pub use page::{PageEvent, PizzaRow, PizzasPage};
pub use state::{ActionOutcome, ActionState};
