use std::fmt;
use tracing::{info, warn};

/// Entity kind shown in catalog toasts
pub const PIZZA_KIND: &str = "Pizza";

pub const ADD_PROGRESS_KEY: &str = "add_pizza";
pub const EDIT_PROGRESS_KEY: &str = "edit_pizza";
pub const DELETE_PROGRESS_KEY: &str = "delete_pizza";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Update,
    Delete,
}

impl Operation {
    pub fn progress_key(self) -> &'static str {
        match self {
            Operation::Add => ADD_PROGRESS_KEY,
            Operation::Update => EDIT_PROGRESS_KEY,
            Operation::Delete => DELETE_PROGRESS_KEY,
        }
    }

    fn in_progress(self) -> &'static str {
        match self {
            Operation::Add => "Adding",
            Operation::Update => "Updating",
            Operation::Delete => "Deleting",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Operation::Add => "added",
            Operation::Update => "updated",
            Operation::Delete => "deleted",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "add"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

pub fn progress_message(kind: &str, name: &str, operation: Operation) -> String {
    format!("{} {} {}...", operation.in_progress(), kind, name)
}

pub fn success_message(kind: &str, name: &str, operation: Operation) -> String {
    format!("{} {} {}", kind, name, operation.past_tense())
}

pub fn failure_message(kind: &str, name: &str, operation: Operation, message: &str) -> String {
    format!("Failed to {} {} {}: {}", operation, kind, name, message)
}

/// Toast surface; a progress toast stays open until closed by key
pub trait Notifier: Send + Sync {
    fn show_progress(&self, key: &str, kind: &str, name: &str, operation: Operation);

    fn close_progress(&self, key: &str);

    fn show_success(&self, kind: &str, name: &str, operation: Operation);

    fn show_failure(&self, kind: &str, name: &str, operation: Operation, message: &str);
}

/// Emits toasts as log events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_progress(&self, key: &str, kind: &str, name: &str, operation: Operation) {
        info!(toast = key, "{}", progress_message(kind, name, operation));
    }

    fn close_progress(&self, key: &str) {
        info!(toast = key, "Progress closed");
    }

    fn show_success(&self, kind: &str, name: &str, operation: Operation) {
        info!("{}", success_message(kind, name, operation));
    }

    fn show_failure(&self, kind: &str, name: &str, operation: Operation, message: &str) {
        warn!("{}", failure_message(kind, name, operation, message));
    }
}
