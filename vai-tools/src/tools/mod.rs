pub mod base;
pub mod verified;

pub use base::{Tool, ToolResult};
pub use verified::{
    ToolPolicies, VerifiedCloseAppTool, VerifiedOpenAppTool, VerifiedOpenFileTool,
    VerifiedOpenFolderTool, VerifiedToolContext, VerifyTool,
};
