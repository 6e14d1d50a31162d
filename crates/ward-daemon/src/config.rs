use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub listen: String,
    pub db_path: PathBuf,
    pub in_memory: bool,

    /// Detections at or below this confidence do not open incidents.
    pub confidence_threshold: f64,
}
