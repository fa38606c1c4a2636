//! Process runtime figures reported by `/api/info`.

/// Bytes per megabyte used for reporting.
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Path of the per-process status file on Linux.
const PROC_STATUS_PATH: &str = "/proc/self/status";

/// Memory usage of the running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryUsage {
    /// Resident set size in bytes.
    pub used_bytes: u64,
    /// Virtual memory size in bytes.
    pub total_bytes: u64,
}

impl MemoryUsage {
    /// Sample the current process. Returns zeros where the figures are unavailable.
    pub fn current() -> Self {
        std::fs::read_to_string(PROC_STATUS_PATH)
            .ok()
            .and_then(|status| Self::parse_proc_status(&status))
            .unwrap_or_default()
    }

    /// Parse the `VmRSS` and `VmSize` lines of a `/proc/<pid>/status` file.
    ///
    /// `total_bytes` is never below `used_bytes`.
    pub fn parse_proc_status(status: &str) -> Option<Self> {
        let mut rss_kb = None;
        let mut size_kb = None;

        for line in status.lines() {
            if let Some(rest) = line.strip_prefix("VmRSS:") {
                rss_kb = parse_kb(rest);
            } else if let Some(rest) = line.strip_prefix("VmSize:") {
                size_kb = parse_kb(rest);
            }
        }

        let used_bytes = rss_kb? * 1024;
        let total_bytes = size_kb? * 1024;

        Some(Self {
            used_bytes,
            total_bytes: total_bytes.max(used_bytes),
        })
    }

    /// Resident size formatted as `<n>MB`.
    pub fn used_display(&self) -> String {
        megabytes(self.used_bytes)
    }

    /// Virtual size formatted as `<n>MB`.
    pub fn total_display(&self) -> String {
        megabytes(self.total_bytes)
    }
}

fn parse_kb(value: &str) -> Option<u64> {
    let mut parts = value.split_whitespace();
    let amount = parts.next()?.parse().ok()?;
    match parts.next() {
        Some("kB") | None => Some(amount),
        Some(_) => None,
    }
}

/// Format a byte count as whole megabytes, rounding half up.
pub fn megabytes(bytes: u64) -> String {
    format!("{}MB", (bytes as f64 / BYTES_PER_MB).round() as u64)
}

/// Identification of the runtime this binary was built for.
pub fn runtime_version() -> String {
    format!("rustc {}", env!("CARGO_PKG_RUST_VERSION"))
}

/// Operating system name of the running binary.
pub fn platform() -> &'static str {
    std::env::consts::OS
}
