mod ai;
mod app;
mod config;
mod constants;
mod credentials;
mod input;
mod ui;

use anyhow::{Context, Result};
use std::env;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::ai::{CompletionClient, DraftResult, FormData, run_draft};
use crate::app::App;
use crate::config::Config;
use crate::credentials::CredentialStore;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,draftsmith=debug"));

    // The TUI owns the terminal, so logs go to a file in the config directory
    let log_file = Config::config_dir()
        .ok()
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir))
        .map(|dir| dir.join("draftsmith.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"draftsmith - Turn bullet points into a professional email

Usage: draftsmith [command]

Commands:
    (none)          Start the drafting assistant
    draft [FILE]    Draft once from FILE (or stdin) and print the email
    setup           Store the API key and choose a model
    help            Show this help message

Environment:
    DRAFTSMITH_API_KEY, DEEPSEEK_API_KEY    API key (checked in that order)
    DRAFTSMITH_COLOR_SCHEME                 light|dark, overrides system detection
    RUST_LOG                                Log filter (default: info,draftsmith=debug)

Configuration file: ~/.config/draftsmith/config.toml
"#
    );
}

/// Resolve the API key and log where it came from (never the key itself)
fn resolve_api_key(config: &Config) -> Option<String> {
    match CredentialStore::new().resolve(&config.ai) {
        Some((key, source)) => {
            tracing::info!("Using API key from {}", source);
            Some(key)
        }
        None => {
            tracing::warn!("No API key found");
            None
        }
    }
}

async fn run_setup() -> Result<()> {
    use std::io;

    println!("Draftsmith Setup");
    println!("================\n");

    let mut config = Config::load()?;

    print!("API key: ");
    io::stdout().flush()?;
    let api_key = read_secret()?;
    println!();
    if api_key.is_empty() {
        anyhow::bail!("No API key entered");
    }

    print!("Model [{}]: ", config.ai.model);
    io::stdout().flush()?;
    let mut model = String::new();
    io::stdin().read_line(&mut model)?;
    let model = model.trim();
    if !model.is_empty() {
        config.ai.model = model.to_string();
    }

    let source = CredentialStore::new().set_api_key(&api_key)?;
    println!("API key stored in {}.", source);

    // Keys live in the credential store, not the config file
    config.ai.api_key = None;
    config.ensure_dirs()?;
    config.save()?;
    println!("Configuration saved to {}", Config::config_path()?.display());

    println!("\nSetup complete! Run 'draftsmith' to start.");
    Ok(())
}

/// Draft once from a file or stdin. The email goes to stdout; failures go
/// to stderr with a non-zero exit status.
async fn run_draft_once(path: Option<&str>) -> Result<ExitCode> {
    use std::io::Read;

    let bullet_points = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path))?,
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            input
        }
    };

    let config = Config::load()?;
    let api_key = resolve_api_key(&config);
    let client = CompletionClient::from_config(&config.ai, api_key)?;

    let result = run_draft(&client, &FormData::with_bullet_points(bullet_points)).await;
    let drafted = report_draft(result, &mut std::io::stdout(), &mut std::io::stderr())?;
    Ok(if drafted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Write a one-shot outcome: the email to `out`, failures to `err`.
/// Returns whether an email was drafted.
fn report_draft(result: DraftResult, out: &mut impl Write, err: &mut impl Write) -> Result<bool> {
    match result {
        DraftResult::Success { email } => {
            writeln!(out, "{}", email)?;
            Ok(true)
        }
        DraftResult::ValidationError { field_errors } => {
            writeln!(err, "{}", ai::draft::MSG_VALIDATION)?;
            for message in field_errors.values().flatten() {
                writeln!(err, "  {}", message)?;
            }
            Ok(false)
        }
        DraftResult::ServiceError { message } => {
            writeln!(err, "{}", message)?;
            Ok(false)
        }
    }
}

fn read_secret() -> Result<String> {
    use std::io;

    let _guard = DisableEcho::new()?;

    let mut secret = String::new();
    io::stdin().read_line(&mut secret)?;
    Ok(secret.trim().to_string())
}

struct DisableEcho {
    #[cfg(unix)]
    original: libc::termios,
}

impl DisableEcho {
    #[cfg(unix)]
    fn new() -> Result<Self> {
        use std::mem::MaybeUninit;
        use std::os::unix::io::AsRawFd;

        let fd = std::io::stdin().as_raw_fd();
        let mut termios = MaybeUninit::<libc::termios>::uninit();

        unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                anyhow::bail!("Failed to get terminal attributes");
            }
            let original = termios.assume_init();
            let mut new = original;
            new.c_lflag &= !libc::ECHO;
            if libc::tcsetattr(fd, libc::TCSANOW, &new) != 0 {
                anyhow::bail!("Failed to set terminal attributes");
            }
            Ok(Self { original })
        }
    }

    #[cfg(not(unix))]
    fn new() -> Result<Self> {
        Ok(Self {})
    }
}

#[cfg(unix)]
impl Drop for DisableEcho {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        let fd = std::io::stdin().as_raw_fd();
        unsafe {
            libc::tcsetattr(fd, libc::TCSANOW, &self.original);
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(ExitCode::SUCCESS)
        }
        Some("setup") => run_setup().await.map(|()| ExitCode::SUCCESS),
        Some("draft") => {
            setup_logging();
            run_draft_once(args.get(2).map(|s| s.as_str())).await
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Ok(ExitCode::FAILURE)
        }
        None => {
            setup_logging();

            let config = Config::load()?;
            config.ensure_dirs()?;

            crate::ui::theme::init_theme(config.ui.theme);

            let api_key = resolve_api_key(&config);
            if api_key.is_none() {
                eprintln!("No API key found; drafts will fail until one is configured.");
                eprintln!("Run 'draftsmith setup' or set DRAFTSMITH_API_KEY.");
            }

            let mut app = App::new(config, api_key)?;
            app.run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::draft::{BULLET_POINTS_FIELD, MSG_BULLET_POINTS_REQUIRED, MSG_VALIDATION};
    use std::collections::BTreeMap;

    fn report(result: DraftResult) -> (bool, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let drafted = report_draft(result, &mut out, &mut err).unwrap();
        (
            drafted,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_report_success_goes_to_stdout() {
        let (drafted, out, err) = report(DraftResult::Success {
            email: "Dear team,".to_string(),
        });
        assert!(drafted);
        assert_eq!(out, "Dear team,\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_report_failures_go_to_stderr() {
        let (drafted, out, err) = report(DraftResult::ValidationError {
            field_errors: BTreeMap::from([(
                BULLET_POINTS_FIELD.to_string(),
                vec![MSG_BULLET_POINTS_REQUIRED.to_string()],
            )]),
        });
        assert!(!drafted);
        assert!(out.is_empty());
        assert_eq!(err, format!("{}\n  {}\n", MSG_VALIDATION, MSG_BULLET_POINTS_REQUIRED));

        let (drafted, out, err) = report(DraftResult::ServiceError {
            message: "Failed to draft email: API error: overloaded".to_string(),
        });
        assert!(!drafted);
        assert!(out.is_empty());
        assert_eq!(err, "Failed to draft email: API error: overloaded\n");
    }
}
