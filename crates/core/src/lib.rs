// Agentry core
//
// Domain types and seams shared by the control plane and its tests.
//
// Key design decisions:
// - Entities (Agent, ChatSession, Message) are plain data; the store owns them
// - Id generation and inference are traits so both can be injected
// - Validation collects every violation before any state changes
// - Wire types derive ToSchema behind the "openapi" feature

// Telemetry (tracing subscriber setup, gen-ai span conventions)
pub mod telemetry;

// Domain entity types
pub mod agent;
pub mod llm_models;
pub mod session;

pub mod error;
pub mod ids;
pub mod inference;
pub mod validation;

// Simulated inference backend
pub mod simulator;

// Re-exports for convenience
pub use agent::{Agent, AgentSettings, AgentStatus, AgentSummary, NewAgent};
pub use error::{Error, Result};
pub use ids::{IdGenerator, IdKind, SequentialIds, TimeOrderedIds};
pub use inference::{InferenceContext, InferenceGateway, InferenceOutput};
pub use llm_models::{catalog, LlmProviderType, ModelDescriptor, ModelId};
pub use session::{ChatSession, Message, MessageRole, SessionStatus, HISTORY_WINDOW};
pub use simulator::{ResponseConfig, SimulatedInference, SimulatedInferenceConfig};
pub use validation::{FieldError, ValidationErrors, Validator};
