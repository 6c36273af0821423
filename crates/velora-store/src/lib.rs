//! # velora-store: Storefront Services
//!
//! The orchestration layer between the presentation surface (HTTP, out of
//! scope) and the pure core + database layers.
//!
//! ## Module Organization
//! ```text
//! velora_store/
//! ├── lib.rs       ◄─── You are here (exports)
//! ├── session.rs   ◄─── Per-session cart registry
//! ├── cart.rs      ◄─── CartService: add/list/update/remove
//! ├── checkout.rs  ◄─── CheckoutEngine: cart checkout + buy-now
//! ├── catalog.rs   ◄─── CatalogService: browse + admin mutations
//! ├── config.rs    ◄─── StoreConfig and policies
//! └── error.rs     ◄─── StoreError for the service boundary
//! ```
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Presentation layer (HTTP)                                              │
//! │       │ session id + primitive inputs                                   │
//! │       ▼                                                                 │
//! │  CartService ──────► SessionCarts (Mutex<HashMap<session, Cart>>)      │
//! │       │                      ▲                                          │
//! │       ▼                      │ removes checked-out lines                │
//! │  CheckoutEngine ─────────────┘                                          │
//! │       │ pre-flight reads, then one transaction:                         │
//! │       │   insert orders + guarded stock decrements                      │
//! │       ▼                                                                 │
//! │  velora-db (SQLite)                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod session;

pub use cart::{CartLineView, CartService, CartView};
pub use catalog::{CatalogFilters, CatalogService, NewProduct};
pub use checkout::{CheckoutEngine, CheckoutReceipt};
pub use config::{AddStockPolicy, StoreConfig};
pub use error::{ErrorCode, StoreError, StoreResult};
pub use session::SessionCarts;
