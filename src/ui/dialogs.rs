use async_trait::async_trait;

use crate::models::PizzaEntity;

pub const ADD_PANEL_TITLE: &str = "Add a pizza";
pub const ADD_PRIMARY_ACTION: &str = "Add";
pub const EDIT_PANEL_TITLE: &str = "Edit pizza";
pub const EDIT_PRIMARY_ACTION: &str = "Save changes";
pub const DELETE_CONFIRM_TITLE: &str = "Delete Pizza";
pub const PANEL_WIDTH: &str = "500px";

pub fn delete_confirm_message(name: &str) -> String {
    format!("Are you sure you want to delete {}?", name)
}

/// What a dialog handed back; produced per invocation, never stored
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DialogResult {
    pub cancelled: bool,
    pub data: Option<PizzaEntity>,
}

impl DialogResult {
    pub fn cancelled() -> Self {
        Self {
            cancelled: true,
            data: None,
        }
    }

    pub fn confirmed() -> Self {
        Self {
            cancelled: false,
            data: None,
        }
    }

    pub fn submitted(pizza: PizzaEntity) -> Self {
        Self {
            cancelled: false,
            data: Some(pizza),
        }
    }

    /// The entity the user submitted, if the dialog was not cancelled
    pub fn into_submitted(self) -> Option<PizzaEntity> {
        if self.cancelled {
            None
        } else {
            self.data
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelAlignment {
    Left,
    #[default]
    Right,
}

/// Parameters of the upsert side panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelOptions {
    pub title: String,
    pub primary_action: String,
    pub content: PizzaEntity,
    pub alignment: PanelAlignment,
    pub width: String,
    pub prevent_dismiss_on_overlay_click: bool,
}

impl PanelOptions {
    pub fn upsert(title: &str, primary_action: &str, content: PizzaEntity) -> Self {
        Self {
            title: title.to_string(),
            primary_action: primary_action.to_string(),
            content,
            alignment: PanelAlignment::Right,
            width: PANEL_WIDTH.to_string(),
            prevent_dismiss_on_overlay_click: true,
        }
    }

    pub fn add() -> Self {
        Self::upsert(ADD_PANEL_TITLE, ADD_PRIMARY_ACTION, PizzaEntity::placeholder())
    }

    pub fn edit(pizza: PizzaEntity) -> Self {
        Self::upsert(EDIT_PANEL_TITLE, EDIT_PRIMARY_ACTION, pizza)
    }
}

/// Modal surfaces the page needs; rendering is up to the implementor
#[async_trait]
pub trait DialogPresenter: Send + Sync {
    async fn show_panel(&self, options: PanelOptions) -> DialogResult;

    async fn confirm(&self, title: &str, message: &str) -> DialogResult;
}
