pub mod aggregate;
pub mod cli;
pub mod collect;
pub mod config;
pub mod extract;
pub mod fingerprint;
pub mod in_house;
pub mod matcher;
pub mod model;
pub mod report;
pub mod resolver;
pub mod selector;
pub mod service;

mod api;

pub use api::{Inventory, InventoryBuilder};
