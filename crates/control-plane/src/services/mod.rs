// Services layer for business logic
// Services own validation and orchestration, calling the store and the inference gateway directly

pub mod agent;
pub mod message;
pub mod session;
pub mod system;

pub use agent::{AgentService, PromptOutcome};
pub use message::{ChatTurn, MessageService};
pub use session::{SessionService, StartedSession};
pub use system::{MemoryUsage, SystemService, SystemStatus};
