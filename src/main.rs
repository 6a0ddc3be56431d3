use clap::Parser;
use filevault::cli::{exit_code, Cli, Commands};

/// Log filter variable, e.g. `FILEVAULT_LOG=filevault=debug`.
const LOG_ENV: &str = "FILEVAULT_LOG";

fn init_logging() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::InitUser => filevault::cli::commands::init_user::execute(),
        Commands::Encrypt { ref path, rm } => {
            filevault::cli::commands::encrypt::execute(path.as_deref(), rm)
        }
        Commands::Decrypt {
            ref path,
            ref suffix,
            rm,
        } => filevault::cli::commands::decrypt::execute(path.as_deref(), suffix.as_deref(), rm),
    };

    if let Err(e) = result {
        filevault::cli::output::error(&e.to_string());
        std::process::exit(exit_code(&cli.command, &e));
    }
}
