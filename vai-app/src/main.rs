use std::process::ExitCode;
use std::str::FromStr;
use vai_app::config::Config;
use vai_app::{desktop_dispatcher, Command, USAGE};
use vai_tools::os_capabilities::desktop;
use vai_tools::Tool;

const SESSION_KEY: &str = "cli";

fn init_logging(config: &Config) {
    let level = std::env::var("VAI_LOG").unwrap_or_else(|_| config.log_level.clone());
    let level = tracing::Level::from_str(level.trim()).unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the requested outcome was confirmed.
async fn run(args: &[String]) -> anyhow::Result<bool> {
    let command = match Command::parse(args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("❌ {e}");
            eprintln!("{USAGE}");
            return Ok(false);
        }
    };

    let config = Config::load()?;
    init_logging(&config);

    match command {
        Command::Help => {
            println!("{USAGE}");
            Ok(true)
        }
        Command::Windows => {
            for window in desktop::list_windows().await? {
                let marker = if window.minimized { " (minimized)" } else { "" };
                println!("{}{}", window.title, marker);
            }
            Ok(true)
        }
        Command::Tools => {
            let dispatcher = desktop_dispatcher(&config)?;
            let registry = dispatcher.registry();
            for name in registry.list() {
                if let Some(tool) = registry.get(&name) {
                    println!("{:<30} {}", name, tool.description());
                }
            }
            Ok(true)
        }
        other => {
            let Some((tool, input)) = other.tool_call() else {
                return Ok(false);
            };
            let dispatcher = desktop_dispatcher(&config)?;
            match dispatcher
                .dispatch(SESSION_KEY.to_string(), tool.to_string(), input)
                .await
            {
                Ok(result) => {
                    println!("{}", result.message());
                    Ok(result.success)
                }
                Err(e) => {
                    println!("❌ {e}");
                    Ok(false)
                }
            }
        }
    }
}
