//! Verified desktop tools for Hyprland: act, then confirm on screen.

pub mod audit_log;
pub mod backend;
pub mod dispatcher;
pub mod error;
pub mod execution_context;
pub mod os_capabilities;
pub mod registry;
pub mod sources;
pub mod tools;
pub mod traits;

pub use audit_log::JsonlAuditLogger;
pub use backend::{ActionBackend, HyprlandBackend};
pub use dispatcher::ToolDispatcherImpl;
pub use error::ToolError;
pub use execution_context::ExecutionContext;
pub use registry::ToolRegistryImpl;
pub use sources::{HyprlandWindows, ScreenVision};
pub use tools::{Tool, ToolPolicies, ToolResult, VerifiedToolContext};
pub use traits::{AuditLogger, NoopAuditLogger, ToolEvent};
