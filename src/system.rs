//! Host statistics for the system endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub hostname: String,
    /// First non-loopback IPv4 address, `127.0.0.1` when there is none.
    pub ip_address: Ipv4Addr,
    pub platform: &'static str,
    pub arch: &'static str,
    pub cpu: CpuInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskInfo>,
    /// Seconds since the host booted, where known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_uptime: Option<u64>,
    /// Seconds since this server started.
    pub server_uptime: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    pub cores: usize,
    pub physical_cores: usize,
    pub model: String,
    /// Busy share of CPU time since boot, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<u32>,
    /// 1, 5 and 15 minute load averages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_average: Option<[f64; 3]>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub total: u64,
    pub free: u64,
    pub used: u64,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskInfo {
    pub total: u64,
    pub free: u64,
    pub used: u64,
    pub usage_percent: f64,
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64 * 1000.0).round() / 10.0
    }
}

/// Collect host statistics. Disk usage is reported for the filesystem
/// holding `data_dir`.
pub fn collect(data_dir: &Path, server_uptime: Duration) -> SystemInfo {
    let (load_average, memory, system_uptime) = kernel_stats();

    SystemInfo {
        hostname: hostname(),
        ip_address: ip_address(),
        platform: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        cpu: CpuInfo {
            cores: num_cpus::get(),
            physical_cores: num_cpus::get_physical(),
            model: cpu_model().unwrap_or_else(|| "Unknown".to_string()),
            usage: cpu_usage(),
            load_average,
        },
        memory,
        disk: disk_usage(data_dir),
        system_uptime,
        server_uptime: server_uptime.as_secs(),
        timestamp: Utc::now(),
    }
}

#[cfg(unix)]
fn hostname() -> String {
    nix::unistd::gethostname()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|e| {
            tracing::debug!("gethostname failed: {}", e);
            "unknown".to_string()
        })
}

#[cfg(not(unix))]
fn hostname() -> String {
    std::env::var("COMPUTERNAME").unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(unix)]
fn ip_address() -> Ipv4Addr {
    use nix::net::if_::InterfaceFlags;

    let addrs = match nix::ifaddrs::getifaddrs() {
        Ok(addrs) => addrs,
        Err(e) => {
            tracing::debug!("getifaddrs failed: {}", e);
            return Ipv4Addr::LOCALHOST;
        }
    };
    addrs
        .filter(|iface| !iface.flags.contains(InterfaceFlags::IFF_LOOPBACK))
        .filter_map(|iface| {
            let addr = iface.address?;
            let sin = addr.as_sockaddr_in()?;
            Some(Ipv4Addr::from(sin.ip()))
        })
        .find(|ip| !ip.is_loopback())
        .unwrap_or(Ipv4Addr::LOCALHOST)
}

#[cfg(not(unix))]
fn ip_address() -> Ipv4Addr {
    Ipv4Addr::LOCALHOST
}

/// Busy percentage from the aggregate `cpu` line of `/proc/stat`.
fn parse_cpu_usage(stat: &str) -> Option<u32> {
    let line = stat.lines().find(|l| l.starts_with("cpu "))?;
    let times: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .filter_map(|v| v.parse().ok())
        .collect();
    let idle = *times.get(3)?;
    let total: u64 = times.iter().sum();
    if total == 0 {
        return None;
    }
    Some(((total - idle) as f64 / total as f64 * 100.0).round() as u32)
}

/// Model name of the first processor listed in `/proc/cpuinfo`.
fn parse_cpu_model(cpuinfo: &str) -> Option<String> {
    cpuinfo.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        let value = value.trim();
        (key.trim() == "model name" && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(target_os = "linux")]
fn cpu_usage() -> Option<u32> {
    std::fs::read_to_string("/proc/stat")
        .map_err(|e| tracing::debug!("reading /proc/stat failed: {}", e))
        .ok()
        .and_then(|stat| parse_cpu_usage(&stat))
}

#[cfg(target_os = "linux")]
fn cpu_model() -> Option<String> {
    std::fs::read_to_string("/proc/cpuinfo")
        .ok()
        .and_then(|info| parse_cpu_model(&info))
}

#[cfg(not(target_os = "linux"))]
fn cpu_usage() -> Option<u32> {
    None
}

#[cfg(not(target_os = "linux"))]
fn cpu_model() -> Option<String> {
    None
}

#[cfg(target_os = "linux")]
fn kernel_stats() -> (Option<[f64; 3]>, Option<MemoryInfo>, Option<u64>) {
    match nix::sys::sysinfo::sysinfo() {
        Ok(info) => {
            let (one, five, fifteen) = info.load_average();
            let total = info.ram_total();
            let free = info.ram_unused();
            let used = total.saturating_sub(free);
            (
                Some([one, five, fifteen]),
                Some(MemoryInfo {
                    total,
                    free,
                    used,
                    usage_percent: percent(used, total),
                }),
                Some(info.uptime().as_secs()),
            )
        }
        Err(e) => {
            tracing::debug!("sysinfo failed: {}", e);
            (None, None, None)
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn kernel_stats() -> (Option<[f64; 3]>, Option<MemoryInfo>, Option<u64>) {
    (None, None, None)
}

#[cfg(unix)]
fn disk_usage(path: &Path) -> Option<DiskInfo> {
    let stat = nix::sys::statvfs::statvfs(path)
        .map_err(|e| tracing::debug!("statvfs {:?} failed: {}", path, e))
        .ok()?;
    let block_size = stat.fragment_size() as u64;
    let total = stat.blocks() as u64 * block_size;
    let free = stat.blocks_available() as u64 * block_size;
    let used = total.saturating_sub(free);
    Some(DiskInfo {
        total,
        free,
        used,
        usage_percent: percent(used, total),
    })
}

#[cfg(not(unix))]
fn disk_usage(_path: &Path) -> Option<DiskInfo> {
    None
}
