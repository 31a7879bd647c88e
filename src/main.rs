use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = rotor::cli::Cli::parse();
    if let Err(e) = rotor::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
