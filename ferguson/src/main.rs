use clap::Parser;
use ferguson::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let mut cmd: Cli = Cli::parse();
    let status = cmd.run_program()?;
    if status != 0 {
        std::process::exit(status);
    }
    Ok(())
}
