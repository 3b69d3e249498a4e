// Adapters - External system implementations

pub mod exec_libav;
pub mod file_config;
pub mod fs_local;
pub mod probe_libav;
pub mod tracing_log;

// Re-export adapters
pub use exec_libav::ExecLibavAdapter;
pub use file_config::{ConfigFormat, FileConfigAdapter};
pub use fs_local::FsLocalAdapter;
pub use probe_libav::ProbeLibavAdapter;
pub use tracing_log::TracingLogAdapter;
