use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::core::instance::LoaderKind;

const MODRINTH_API_BASE: &str = "https://api.modrinth.com/v2";
const SEARCH_PAGE_SIZE: u32 = 20;

/// Project category queried against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Mod,
    Modpack,
}

impl ProjectKind {
    fn facet_value(self) -> &'static str {
        match self {
            ProjectKind::Mod => "mod",
            ProjectKind::Modpack => "modpack",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileHashes {
    pub sha1: Option<String>,
}

/// One downloadable file of a project version.
#[derive(Debug, Clone, Deserialize)]
pub struct ModFile {
    pub filename: String,
    pub url: String,
    #[serde(default)]
    pub hashes: FileHashes,
}

/// One published version of a project, newest first in registry order.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectVersion {
    pub name: String,
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub files: Vec<ModFile>,
}

/// Thin facade over the Modrinth v2 HTTP API.
///
/// Network failures degrade to empty results or `None` — the caller cannot
/// distinguish "registry down" from "nothing found", which is the intended
/// contract for a search box.
pub struct ModrinthClient {
    client: Client,
    base_url: String,
}

impl ModrinthClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: MODRINTH_API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Search projects, in the registry's own relevance order.
    ///
    /// An empty query returns an empty list without touching the network.
    /// Version/loader facets only apply to mod searches.
    pub async fn search(
        &self,
        query: &str,
        kind: ProjectKind,
        game_version: Option<&str>,
        loader: Option<&LoaderKind>,
    ) -> Vec<SearchHit> {
        if query.is_empty() {
            return Vec::new();
        }

        let facets = search_facets(kind, game_version, loader);
        let url = format!("{}/search", self.base_url);
        let limit = SEARCH_PAGE_SIZE.to_string();

        let request = self.client.get(&url).query(&[
            ("query", query),
            ("limit", limit.as_str()),
            ("index", "relevance"),
            ("facets", facets.as_str()),
        ]);

        match request.send().await {
            Ok(response) => match response.json::<SearchResponse>().await {
                Ok(body) => body.hits,
                Err(e) => {
                    warn!("Search response parse failed: {}", e);
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("Search request failed: {}", e);
                Vec::new()
            }
        }
    }

    /// First file of the first compatible version, in the registry's own
    /// ordering — no independent ranking.
    pub async fn latest_compatible_file(
        &self,
        project_id: &str,
        loaders: &[String],
        game_versions: Option<&[String]>,
    ) -> Option<ModFile> {
        let url = format!("{}/project/{}/version", self.base_url, project_id);

        let mut params = vec![("loaders", json_list(loaders))];
        if let Some(versions) = game_versions {
            params.push(("game_versions", json_list(versions)));
        }

        let versions = match self.client.get(&url).query(&params).send().await {
            Ok(response) => match response.json::<Vec<ProjectVersion>>().await {
                Ok(versions) => versions,
                Err(e) => {
                    warn!("Version listing parse failed for {}: {}", project_id, e);
                    return None;
                }
            },
            Err(e) => {
                warn!("Version listing request failed for {}: {}", project_id, e);
                return None;
            }
        };

        versions
            .into_iter()
            .next()
            .and_then(|version| version.files.into_iter().next())
    }

    /// All published versions of a project, for explicit selection by the
    /// caller. Empty on any failure.
    pub async fn project_versions(&self, project_id: &str) -> Vec<ProjectVersion> {
        let url = format!("{}/project/{}/version", self.base_url, project_id);

        match self.client.get(&url).send().await {
            Ok(response) => match response.json::<Vec<ProjectVersion>>().await {
                Ok(versions) => versions,
                Err(e) => {
                    warn!("Version listing parse failed for {}: {}", project_id, e);
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("Version listing request failed for {}: {}", project_id, e);
                Vec::new()
            }
        }
    }
}

/// Registry loader category for an instance loader. Vanilla instances query
/// as Fabric so mod search still returns something useful; Modpack has no
/// category facet.
pub fn loader_facet(loader: &LoaderKind) -> Option<&'static str> {
    match loader {
        LoaderKind::Vanilla | LoaderKind::Fabric => Some("fabric"),
        LoaderKind::Forge => Some("forge"),
        LoaderKind::Modpack => None,
    }
}

fn search_facets(
    kind: ProjectKind,
    game_version: Option<&str>,
    loader: Option<&LoaderKind>,
) -> String {
    let mut facets = vec![vec![format!("project_type:{}", kind.facet_value())]];

    if kind == ProjectKind::Mod {
        if let Some(version) = game_version {
            facets.push(vec![format!("versions:{}", version)]);
        }
        if let Some(category) = loader.and_then(loader_facet) {
            facets.push(vec![format!("categories:{}", category)]);
        }
    }

    serde_json::to_string(&facets).unwrap_or_else(|_| "[]".to_string())
}

fn json_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}
