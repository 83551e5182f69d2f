//! One module per tool. Each workflow is an ordered list of steps, each
//! declared [`pipeline::Required`] or [`pipeline::BestEffort`].

pub mod allowance_setup;
pub mod balance;
pub mod bridge_monitor;
pub mod cancel;
pub mod credentials;
pub mod funding;
pub mod list_orders;
pub mod order_placement;
pub mod pipeline;
