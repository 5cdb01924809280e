use clap::Parser;
use govctl::CliOpts;

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> anyhow::Result<()> {
    if let Err(e) = govctl::run(CliOpts::parse()).await {
        println!("error: ");

        for err in e.chain() {
            println!("{err}");
        }

        std::process::exit(1);
    }

    Ok(())
}
