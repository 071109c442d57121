use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = vitae_rank::Args::parse();

	vitae_rank::run(args).await
}
