//! Page persistence services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! [`store::PageStore`] is the contract. [`postgres::PgStore`] backs it with
//! sqlx, [`memory::MemoryStore`] with a locked in-process map.

pub mod memory;
pub mod postgres;
pub mod store;
