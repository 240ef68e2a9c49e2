//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod channel;
pub mod clock;
pub mod directory;
pub mod execution_log;
pub mod storage;

pub use channel::{ChannelSender, SendError};
pub use clock::{Clock, SystemClock};
pub use directory::Directory;
pub use execution_log::ExecutionLog;
pub use storage::{RuleRepository, TemplateRepository};
