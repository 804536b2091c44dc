use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = gmail_probe::cli::Cli::parse();
    gmail_probe::logging::init(cli.verbose);

    if let Err(err) = gmail_probe::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
