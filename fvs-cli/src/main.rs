mod actions;
mod cli;
mod completions;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli::dispatch::run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
