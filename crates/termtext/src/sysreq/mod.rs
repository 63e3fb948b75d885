//! System requirement checks for the launcher's requirements table.
//!
//! Nothing is probed here: callers supply a [`SystemProfile`] (from their
//! own probing, or a JSON file in the CLI) and get back comparable rows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum CPU clock, in MHz.
pub const MIN_CPU_SPEED_MHZ: u64 = 1500;
/// Minimum installed memory.
pub const MIN_MEMORY_BYTES: u64 = 3 * GIB;
/// Minimum free space in the working directory.
pub const MIN_FREE_DISK_BYTES: u64 = 5 * GIB;
/// Baseline vector extension every release is built for.
pub const MIN_VECTOR_ISA: VectorIsa = VectorIsa::Sse2;

const GIB: u64 = 1024 * 1024 * 1024;

/// Shown instead of the free disk space until a working directory is chosen.
pub const UNKNOWN_DISK_SPACE: &str = "<Set Working Directory>";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    X86,
    X86_64,
    Arm,
    Aarch64,
}

impl Architecture {
    pub fn current() -> Option<Self> {
        match std::env::consts::ARCH {
            "x86" => Some(Self::X86),
            "x86_64" => Some(Self::X86_64),
            "arm" => Some(Self::Arm),
            "aarch64" => Some(Self::Aarch64),
            _ => None,
        }
    }
}

/// Release platform, spelled the way release paths spell it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Win32,
    Macos,
    Linux,
}

impl Platform {
    /// Platform of the compile target.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Win32
        } else if cfg!(target_os = "macos") {
            Self::Macos
        } else {
            Self::Linux
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Win32 => "win32",
            Self::Macos => "macos",
            Self::Linux => "linux",
        }
    }

    /// Oldest supported OS release as `(major, minor)`, if there is one.
    fn min_os_version(self) -> Option<(u32, u32)> {
        match self {
            // Windows 7 SP1 reports 6.1.
            Self::Win32 => Some((6, 1)),
            Self::Macos => Some((10, 9)),
            Self::Linux => None,
        }
    }

    fn min_os_label(self) -> &'static str {
        match self {
            Self::Win32 => "Windows 7 SP1",
            Self::Macos => "macOS 10.9",
            Self::Linux => "Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SIMD instruction set level, ordered from oldest to newest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorIsa {
    X87,
    Sse,
    Sse2,
    Sse3,
    Sse41,
    Avx,
    Avx2,
    Avx512,
}

impl fmt::Display for VectorIsa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X87 => "x87",
            Self::Sse => "SSE",
            Self::Sse2 => "SSE2",
            Self::Sse3 => "SSE3",
            Self::Sse41 => "SSE4.1",
            Self::Avx => "AVX",
            Self::Avx2 => "AVX2",
            Self::Avx512 => "AVX-512",
        })
    }
}

/// `major.minor` version of the bundled modelling tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolVersion {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Accepted tool versions.
///
/// Major and minor are bounded independently: `2.95` fails a `2.90-2.91`
/// window even though it sorts between two accepted majors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolVersionWindow {
    pub min_major: u32,
    pub max_major: u32,
    pub min_minor: u32,
    pub max_minor: u32,
}

impl Default for ToolVersionWindow {
    fn default() -> Self {
        Self {
            min_major: 2,
            max_major: 2,
            min_minor: 90,
            max_minor: 91,
        }
    }
}

impl ToolVersionWindow {
    pub fn is_ok(&self, version: ToolVersion) -> bool {
        (self.min_major..=self.max_major).contains(&version.major)
            && (self.min_minor..=self.max_minor).contains(&version.minor)
    }

    /// Whether both bounds are in order.
    pub fn is_valid(&self) -> bool {
        self.min_major <= self.max_major && self.min_minor <= self.max_minor
    }
}

impl fmt::Display for ToolVersionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} - {}.{}",
            self.min_major, self.min_minor, self.max_major, self.max_minor
        )
    }
}

/// Facts about the machine the launcher runs on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemProfile {
    pub cpu_speed_mhz: u64,
    pub memory_bytes: u64,
    /// Unknown until a working directory is set.
    #[serde(default)]
    pub free_disk_bytes: Option<u64>,
    /// Dotted OS release, e.g. `10.15.7` or `6.1.7601`.
    pub os_version: String,
    pub architecture: Architecture,
    pub platform: Platform,
    pub vector_isa: VectorIsa,
    #[serde(default)]
    pub tool_version: Option<ToolVersion>,
}

/// Build a release was compiled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseTarget {
    pub architecture: Architecture,
    pub platform: Platform,
    pub vector_isa: VectorIsa,
}

/// Whether a release built for `target` can run on `profile`.
pub fn will_run(profile: &SystemProfile, target: &ReleaseTarget) -> bool {
    profile.architecture == target.architecture
        && profile.platform == target.platform
        && profile.vector_isa >= target.vector_isa
}

/// One line of the requirements table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementRow {
    pub name: String,
    pub required: String,
    pub actual: String,
    pub satisfied: bool,
}

impl RequirementRow {
    fn new(name: &str, required: String, actual: String, satisfied: bool) -> Self {
        Self {
            name: name.to_string(),
            required,
            actual,
            satisfied,
        }
    }
}

/// Rows for CPU, memory, disk, OS, vector ISA and tool version, in that order.
pub fn requirements_table(
    profile: &SystemProfile,
    window: &ToolVersionWindow,
) -> Vec<RequirementRow> {
    let disk = match profile.free_disk_bytes {
        Some(bytes) => RequirementRow::new(
            "Disk Space",
            format_bytes(MIN_FREE_DISK_BYTES),
            format_bytes(bytes),
            bytes >= MIN_FREE_DISK_BYTES,
        ),
        None => RequirementRow::new(
            "Disk Space",
            format_bytes(MIN_FREE_DISK_BYTES),
            UNKNOWN_DISK_SPACE.to_string(),
            false,
        ),
    };
    let tool = match profile.tool_version {
        Some(version) => RequirementRow::new(
            "Tool Version",
            window.to_string(),
            version.to_string(),
            window.is_ok(version),
        ),
        None => RequirementRow::new(
            "Tool Version",
            window.to_string(),
            "not found".to_string(),
            false,
        ),
    };
    vec![
        RequirementRow::new(
            "CPU Speed",
            format_mhz(MIN_CPU_SPEED_MHZ),
            format_mhz(profile.cpu_speed_mhz),
            profile.cpu_speed_mhz >= MIN_CPU_SPEED_MHZ,
        ),
        RequirementRow::new(
            "Memory",
            format_bytes(MIN_MEMORY_BYTES),
            format_bytes(profile.memory_bytes),
            profile.memory_bytes >= MIN_MEMORY_BYTES,
        ),
        disk,
        RequirementRow::new(
            "OS",
            profile.platform.min_os_label().to_string(),
            format!("{} {}", profile.platform, profile.os_version),
            os_supported(profile),
        ),
        RequirementRow::new(
            "Vector ISA",
            MIN_VECTOR_ISA.to_string(),
            profile.vector_isa.to_string(),
            profile.vector_isa >= MIN_VECTOR_ISA,
        ),
        tool,
    ]
}

fn os_supported(profile: &SystemProfile) -> bool {
    let Some(min) = profile.platform.min_os_version() else {
        return true;
    };
    parse_major_minor(&profile.os_version).is_some_and(|version| version >= min)
}

fn parse_major_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().map_or(Some(0), |part| part.parse().ok())?;
    Some((major, minor))
}

fn format_mhz(mhz: u64) -> String {
    format!("{}.{} GHz", mhz / 1000, (mhz % 1000) / 100)
}

fn format_bytes(bytes: u64) -> String {
    let tenths = bytes / (GIB / 10);
    format!("{}.{} GiB", tenths / 10, tenths % 10)
}
