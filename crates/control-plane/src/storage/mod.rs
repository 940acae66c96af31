// Storage layer for the Agentry control-plane
// Decision: In-memory only; state lives for the process lifetime
//
// The store is created once in main and injected into every service.

pub mod memory;

pub use memory::{AgentListing, InMemoryStore, SessionTurn};
