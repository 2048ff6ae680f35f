use std::error::Error;

use clap::Parser;
use nestbox::{open_backend, BackendKind, StorageBackend, StorageConfig, Window};
use tracing::{info, Level};
use tracing_subscriber::fmt;

#[derive(Parser, Debug)]
struct Args {
	/// Storage backend to drive.
	#[arg(value_enum, default_value = "ram")]
	backend: BackendKind,
	/// Log level
	#[arg(long, default_value = "info")]
	log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	let args = Args::parse();

	let subscriber = fmt::Subscriber::builder().with_max_level(args.log_level).finish();
	tracing::subscriber::set_global_default(subscriber)?;

	// Resolve the configuration once; the backend instance lives for the
	// whole process and is injected wherever it is consumed.
	let mut config = StorageConfig::from_env()?;
	config.backend = args.backend;

	let backend = open_backend(&config).await?;
	info!("Opened {} backend", config.backend.name());

	// Mint a few containers and fill one of them.
	let container_ids = backend.mint_containers(3).await?;
	println!("Minted: {:?}", container_ids);

	let first = &container_ids[0];
	backend.add_members(first, &["m1".to_string(), "m2".to_string()]).await?;

	let page = backend
		.list_members(first, Window::with_max(0, 10, config.max_page_limit))
		.await?;
	println!(
		"Container {} holds {} member(s): {:?}",
		first, page.total, page.items
	);

	// Windowed listing over all containers.
	let page = backend
		.list_containers(Window::with_max(0, 2, config.max_page_limit))
		.await?;
	println!(
		"Containers (offset {}, limit {}, total {}): {:?}",
		page.offset, page.limit, page.total, page.items
	);
	println!("Next offset: {:?}", page.next_offset());

	// Deletion is idempotent; removing everything twice is fine.
	backend.remove_containers(&container_ids).await?;
	backend.remove_containers(&container_ids).await?;

	Ok(())
}
