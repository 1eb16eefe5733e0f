use std::sync::Arc;

use espial_engine::EngineClient;
use espial_metadata::MetadataClient;
use espial_service::EspialService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<EspialService>,
}
impl AppState {
	pub fn new(config: espial_config::Config) -> color_eyre::Result<Self> {
		let engine = EngineClient::new(&config.engine)?;
		let metadata = MetadataClient::new(&config.metadata)?;
		let service = EspialService::new(config, engine, metadata);

		Ok(Self { service: Arc::new(service) })
	}
}
