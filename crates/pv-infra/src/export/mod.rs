mod file_export_sink;

pub use file_export_sink::FileExportSink;
