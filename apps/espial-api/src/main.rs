use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = espial_api::Args::parse();
	espial_api::run(args).await
}
