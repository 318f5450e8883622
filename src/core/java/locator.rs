use std::path::{Path, PathBuf};

use tracing::warn;

/// Leading entry of every candidate list; selecting it delegates the choice
/// back to [`select_java`].
pub const AUTO_SENTINEL: &str = "Auto";

/// Discover Java executables worth offering to the user.
///
/// Checks `JAVA_HOME` first, then scans a fixed list of well-known install
/// roots one level deep for `<vendor dir>/bin/java`. Candidates are paths
/// only; nothing is executed or version-probed here — the directory name is
/// the version hint. The list is de-duplicated, order-preserving, and always
/// headed by the [`AUTO_SENTINEL`].
pub fn discover_candidates() -> Vec<String> {
    let mut candidates = vec![AUTO_SENTINEL.to_string()];

    if let Ok(home) = std::env::var("JAVA_HOME") {
        let bin = Path::new(&home).join("bin").join(java_exe());
        if bin.is_file() {
            push_unique(&mut candidates, &bin);
        }
    }

    for root in well_known_roots() {
        let entries = match std::fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.filter_map(Result::ok) {
            let vendor_dir = entry.path();
            if !vendor_dir.is_dir() {
                continue;
            }

            for bin in conventional_binaries(&vendor_dir) {
                if bin.is_file() {
                    push_unique(&mut candidates, &bin);
                }
            }
        }
    }

    candidates
}

/// Pick a Java executable for a game version.
///
/// A non-`Auto` override is returned unchanged, no validation. Otherwise the
/// candidates are scanned in order for the first path containing a marker of
/// the required major; `None` means the caller should fall back to the system
/// default `java`.
pub fn select_java(game_version: &str, override_path: &str) -> Option<String> {
    if override_path != AUTO_SENTINEL {
        return Some(override_path.to_string());
    }

    let required = required_java_major(game_version);
    let markers = version_markers(required);

    discover_candidates()
        .into_iter()
        .skip(1) // sentinel
        .find(|candidate| markers.iter().any(|marker| candidate.contains(marker)))
}

/// Java major required by a Minecraft version string.
///
/// Splits on `.` and parses the leading digits of up to three components.
/// Unparseable input falls back to the legacy runtime with a warning, never
/// an error.
pub fn required_java_major(game_version: &str) -> u32 {
    let mut parts = game_version.splitn(3, '.');
    let major = parts.next().and_then(leading_number);
    let minor = parts.next().and_then(leading_number);
    let patch = parts.next().and_then(leading_number).unwrap_or(0);

    if major.is_none() {
        warn!("Unparseable game version {:?}, assuming Java 8", game_version);
        return 8;
    }

    match minor {
        Some(minor) if minor >= 21 => 21,
        Some(20) => {
            if patch >= 5 {
                21
            } else {
                17
            }
        }
        Some(minor) if (17..=19).contains(&minor) => 17,
        _ => 8,
    }
}

/// Path substrings accepted as evidence of a given Java major.
///
/// Java 8 installs carry either the `1.8` scheme (`jdk1.8.0_392`) or a
/// `-8` separator (`temurin-8.jre`); both are accepted.
fn version_markers(major: u32) -> &'static [&'static str] {
    match major {
        21 => &["21"],
        17 => &["17"],
        _ => &["1.8", "-8"],
    }
}

fn leading_number(component: &str) -> Option<u32> {
    let digits: String = component.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn java_exe() -> &'static str {
    if cfg!(windows) {
        "java.exe"
    } else {
        "java"
    }
}

fn well_known_roots() -> Vec<PathBuf> {
    if cfg!(windows) {
        vec![
            PathBuf::from("C:\\Program Files\\Java"),
            PathBuf::from("C:\\Program Files\\Eclipse Adoptium"),
            PathBuf::from("C:\\Program Files (x86)\\Java"),
        ]
    } else if cfg!(target_os = "macos") {
        vec![PathBuf::from("/Library/Java/JavaVirtualMachines")]
    } else {
        vec![PathBuf::from("/usr/lib/jvm")]
    }
}

fn conventional_binaries(vendor_dir: &Path) -> Vec<PathBuf> {
    let mut binaries = vec![vendor_dir.join("bin").join(java_exe())];
    if cfg!(target_os = "macos") {
        binaries.push(
            vendor_dir
                .join("Contents")
                .join("Home")
                .join("bin")
                .join(java_exe()),
        );
    }
    binaries
}

fn push_unique(candidates: &mut Vec<String>, bin: &Path) {
    let display = bin.to_string_lossy().to_string();
    if !candidates.contains(&display) {
        candidates.push(display);
    }
}
