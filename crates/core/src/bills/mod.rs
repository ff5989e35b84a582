//! Bills module - domain vocabulary shared with the UI-feedback coordinator.

mod bills_model;

pub use bills_model::{BillKind, BillStatus};
