//! Best-effort peak-memory reporting.

/// Peak resident memory of this process in KiB, read from
/// `/proc/self/status`. `None` where procfs is unavailable.
#[must_use]
pub fn peak_memory_in_kb() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmPeak:") {
            let kb = rest.trim().trim_end_matches(" kB").trim();
            return kb.parse().ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_os = "linux")]
    fn reports_positive_peak_on_linux() {
        let peak = peak_memory_in_kb().expect("procfs available on linux");
        assert!(peak > 0);
    }
}
