//! Wiring for the `vai` command line: config, evidence sources, tools.

pub mod config;

use anyhow::{bail, Context, Result};
use config::Config;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use vai_providers::OpenAICompatibleProvider;
use vai_tools::{
    ActionBackend, AuditLogger, HyprlandBackend, HyprlandWindows, JsonlAuditLogger, NoopAuditLogger,
    ScreenVision, ToolDispatcherImpl, ToolRegistryImpl, VerifiedToolContext,
};
use vai_verifier::{ActionVerifier, Intent, TargetKind, VisionService, WindowSource};

/// Used for the tool timeout when verification itself is unbounded.
const UNBOUNDED_TOOL_TIMEOUT: Duration = Duration::from_secs(600);
const TOOL_TIMEOUT_SLACK: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    OpenApp(String),
    CloseApp(String),
    OpenFile(String),
    OpenFolder(String),
    Verify {
        kind: TargetKind,
        intent: Intent,
        name: String,
    },
    Windows,
    Tools,
    Help,
}

impl Command {
    /// Parse CLI arguments (without the program name). Trailing words are joined
    /// so `vai open-app vs code` works unquoted.
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some((first, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };
        let target = |what: &str| -> Result<String> {
            let joined = rest.join(" ");
            if joined.trim().is_empty() {
                bail!("Missing {what}");
            }
            Ok(joined.trim().to_string())
        };

        match first.as_str() {
            "open-app" => Ok(Command::OpenApp(target("app name")?)),
            "close-app" => Ok(Command::CloseApp(target("window name")?)),
            "open-file" => Ok(Command::OpenFile(target("file path")?)),
            "open-folder" => Ok(Command::OpenFolder(target("folder path")?)),
            "verify" => {
                let [kind, intent, name @ ..] = rest else {
                    bail!("Usage: vai verify <app|file|folder> <opened|closed> <name>");
                };
                let kind = TargetKind::parse(kind).with_context(|| format!("Unknown kind '{kind}'"))?;
                let intent =
                    Intent::parse(intent).with_context(|| format!("Unknown intent '{intent}'"))?;
                let name = name.join(" ");
                if name.trim().is_empty() {
                    bail!("Missing name");
                }
                Ok(Command::Verify {
                    kind,
                    intent,
                    name: name.trim().to_string(),
                })
            }
            "windows" => Ok(Command::Windows),
            "tools" => Ok(Command::Tools),
            "help" | "--help" | "-h" => Ok(Command::Help),
            other => bail!("Unknown command '{other}'"),
        }
    }

    /// The tool and input this command dispatches, if it is a tool call.
    pub fn tool_call(&self) -> Option<(&'static str, Value)> {
        match self {
            Command::OpenApp(app) => Some(("desktop.verified_open_app", json!({ "app": app }))),
            Command::CloseApp(window) => {
                Some(("desktop.verified_close_app", json!({ "window": window })))
            }
            Command::OpenFile(path) => Some(("desktop.verified_open_file", json!({ "path": path }))),
            Command::OpenFolder(path) => {
                Some(("desktop.verified_open_folder", json!({ "path": path })))
            }
            Command::Verify { kind, intent, name } => Some((
                "desktop.verify",
                json!({ "kind": kind.to_string(), "intent": intent.to_string(), "name": name }),
            )),
            Command::Windows | Command::Tools | Command::Help => None,
        }
    }
}

pub const USAGE: &str = "\
Usage: vai <command>

  open-app <name>                             launch an app and confirm it is visible
  close-app <name>                            close an app and confirm it is gone
  open-file <path>                            open a file and confirm it is showing
  open-folder <path>                          open a folder and confirm it is showing
  verify <app|file|folder> <opened|closed> <name>
  windows                                     list windows
  tools                                       list verified tools";

pub fn build_tool_context(
    config: &Config,
    windows: Arc<dyn WindowSource>,
    vision: Arc<dyn VisionService>,
    backend: Arc<dyn ActionBackend>,
) -> VerifiedToolContext {
    let verifier = ActionVerifier::new(windows, vision, config.verifier_settings());
    VerifiedToolContext::new(Arc::new(verifier), backend).with_policies(config.tool_policies())
}

/// Upper bound for one tool call: every attempt's waits plus a full verification.
pub fn tool_timeout(config: &Config) -> Duration {
    let Some(verify) = config.verifier_settings().timeout else {
        return UNBOUNDED_TOOL_TIMEOUT;
    };
    let policies = config.tool_policies();
    [policies.open_app, policies.close_app, policies.open_path]
        .iter()
        .map(|p| (p.settle_delay + p.backoff + verify) * p.total_attempts())
        .max()
        .unwrap_or(verify)
        + TOOL_TIMEOUT_SLACK
}

pub fn build_dispatcher(
    config: &Config,
    ctx: VerifiedToolContext,
    audit: Arc<dyn AuditLogger>,
) -> ToolDispatcherImpl {
    let registry = ToolRegistryImpl::with_verified_tools(ctx);
    let timeout_ms = u64::try_from(tool_timeout(config).as_millis()).unwrap_or(u64::MAX);
    ToolDispatcherImpl::new(Arc::new(registry), audit, timeout_ms)
}

/// Dispatcher backed by Hyprland, the screenshot tools and the configured vision model.
pub fn desktop_dispatcher(config: &Config) -> Result<ToolDispatcherImpl> {
    config.validate().context("Invalid configuration")?;
    let provider = OpenAICompatibleProvider::with_timeout(
        config.vision.base_url.clone(),
        config.api_key(),
        config.vision.model.clone(),
        Duration::from_secs(config.vision.timeout_secs),
    );
    let backend = HyprlandBackend::new(config.apps.clone().into_iter().collect());
    let ctx = build_tool_context(
        config,
        Arc::new(HyprlandWindows),
        Arc::new(ScreenVision::new(Arc::new(provider))),
        Arc::new(backend),
    );

    let audit: Arc<dyn AuditLogger> = match JsonlAuditLogger::new(&config.audit_log) {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            tracing::warn!(path = %config.audit_log.display(), "Tool events will not be recorded: {}", e);
            Arc::new(NoopAuditLogger)
        }
    };

    Ok(build_dispatcher(config, ctx, audit))
}
