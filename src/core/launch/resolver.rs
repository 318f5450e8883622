use crate::core::instance::{InstanceConfig, LoaderKind};
use crate::core::toolchain::InstalledVersion;

/// Pick the installed version id to launch.
///
/// The saved manifest version wins when it is actually installed. When it is
/// missing (manual deletion, fallback manifest), the loader recorded in the
/// manifest drives a substring heuristic over the installed ids, in listing
/// order; the last resort is the first installed id. `None` only when
/// nothing is installed at all.
pub fn resolve_version_id(
    config: &InstanceConfig,
    installed: &[InstalledVersion],
) -> Option<String> {
    if installed.iter().any(|version| version.id == config.version) {
        return Some(config.version.clone());
    }

    let find_containing = |marker: &str| {
        installed
            .iter()
            .find(|version| version.id.to_lowercase().contains(marker))
            .map(|version| version.id.clone())
    };

    let by_loader = match config.loader {
        LoaderKind::Fabric => find_containing("fabric"),
        LoaderKind::Forge => find_containing("forge"),
        LoaderKind::Modpack => find_containing("fabric").or_else(|| find_containing("forge")),
        LoaderKind::Vanilla => None,
    };

    by_loader.or_else(|| installed.first().map(|version| version.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(ids: &[&str]) -> Vec<InstalledVersion> {
        ids.iter()
            .map(|id| InstalledVersion {
                id: id.to_string(),
                release_time: None,
            })
            .collect()
    }

    fn config(version: &str, loader: LoaderKind) -> InstanceConfig {
        InstanceConfig::new("test", version, loader)
    }

    #[test]
    fn saved_version_wins_when_installed() {
        let installed = versions(&["1.20.1", "fabric-loader-0.16.10-1.20.1"]);
        let resolved = resolve_version_id(&config("1.20.1", LoaderKind::Fabric), &installed);
        assert_eq!(resolved.as_deref(), Some("1.20.1"));
    }

    #[test]
    fn missing_saved_version_falls_back_to_loader_heuristic() {
        let installed = versions(&["1.20.1", "fabric-loader-0.16.10-1.20.1"]);
        let resolved = resolve_version_id(&config("gone", LoaderKind::Fabric), &installed);
        assert_eq!(resolved.as_deref(), Some("fabric-loader-0.16.10-1.20.1"));
    }

    #[test]
    fn modpack_accepts_either_loader_id() {
        let installed = versions(&["1.20.1", "1.20.1-forge-47.2.0"]);
        let resolved = resolve_version_id(&config("Unknown", LoaderKind::Modpack), &installed);
        assert_eq!(resolved.as_deref(), Some("1.20.1-forge-47.2.0"));
    }

    #[test]
    fn vanilla_falls_back_to_first_installed() {
        let installed = versions(&["1.19.4", "1.20.1"]);
        let resolved = resolve_version_id(&config("Unknown", LoaderKind::Vanilla), &installed);
        assert_eq!(resolved.as_deref(), Some("1.19.4"));
    }

    #[test]
    fn nothing_installed_resolves_to_none() {
        let resolved = resolve_version_id(&config("1.20.1", LoaderKind::Vanilla), &[]);
        assert!(resolved.is_none());
    }
}
