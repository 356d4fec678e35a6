//! Builds the application from adapters chosen by config.

use std::sync::Arc;

use pv_app::{App, AppDeps};
use pv_core::config::AppConfig;
use pv_core::photo::UploadPolicy;
use pv_infra::{FileExportSink, FileKeyValueStore, FsPhotoReader, GeminiPoemGenerator, SystemClock};
use tracing::debug;

pub fn build_app(config: &AppConfig) -> App {
    let storage_dir = config.data_dir.join("storage");
    debug!(
        storage_dir = %storage_dir.display(),
        export_dir = %config.export_dir.display(),
        model = %config.gateway.model,
        "Wiring application"
    );

    App::new(AppDeps {
        store: Some(Arc::new(FileKeyValueStore::new(storage_dir))),
        photo_reader: Arc::new(FsPhotoReader::new()),
        poem_generator: Arc::new(GeminiPoemGenerator::from_config(&config.gateway)),
        export_sink: Arc::new(FileExportSink::new(config.export_dir.clone())),
        clock: Arc::new(SystemClock),
        upload_policy: UploadPolicy::new(config.max_upload_bytes),
    })
}
