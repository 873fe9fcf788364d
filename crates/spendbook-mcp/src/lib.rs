//! MCP tool surface for Spendbook.
//!
//! A thin adapter over the store: the rmcp runtime handles transport and
//! dispatch; each tool maps onto one store operation and returns JSON
//! text content in the `{"status": ...}` shapes the host expects. Store
//! failures become error results, never protocol errors.

mod categories;
mod requests;
mod server;

pub use categories::{CategoryCatalog, CATEGORIES_URI};
pub use server::SpendbookServer;
