use project_map_shared::models::{CountryCoords, ProjectRecord, ProjectRecords, SiteConfig};
use serde::{Deserialize, Serialize};

/// Attempts per request before giving up.
const MAX_ATTEMPTS: u32 = 3;
/// Delay before the first retry, doubled on each further attempt.
const RETRY_BASE_MS: u32 = 500;

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

fn api_url() -> Result<String, String> {
    // Same origin in production
    let window = web_sys::window().ok_or("No window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| "Failed to read page origin".to_string())?;
    Ok(format!("{}/graphql", origin))
}

async fn query_once<T: for<'de> Deserialize<'de>>(
    req: &GraphQLRequest,
) -> Result<T, String> {
    let resp = reqwest::Client::new()
        .post(api_url()?)
        .json(req)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let gql_resp: GraphQLResponse<T> = resp.json().await.map_err(|e| e.to_string())?;
    into_data(gql_resp)
}

/// First GraphQL error wins, otherwise the data payload.
fn into_data<T>(resp: GraphQLResponse<T>) -> Result<T, String> {
    if let Some(errors) = resp.errors {
        if let Some(first) = errors.into_iter().next() {
            return Err(first.message);
        }
    }
    resp.data.ok_or_else(|| "No data returned".to_string())
}

async fn query<T: for<'de> Deserialize<'de>>(
    query_str: &str,
    variables: Option<serde_json::Value>,
) -> Result<T, String> {
    let req = GraphQLRequest {
        query: query_str.to_string(),
        variables,
    };

    let mut attempt = 1;
    loop {
        match query_once(&req).await {
            Ok(data) => return Ok(data),
            Err(e) if attempt < MAX_ATTEMPTS => {
                let delay = retry_delay_ms(attempt);
                dioxus::logger::tracing::warn!(attempt, delay, error = %e, "GraphQL request failed, retrying");
                gloo_timers::future::TimeoutFuture::new(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn retry_delay_ms(attempt: u32) -> u32 {
    RETRY_BASE_MS.saturating_mul(1 << (attempt.saturating_sub(1)).min(8))
}

// Types mirroring the GraphQL schema

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub key: String,
    pub country_name: String,
    pub project_count: u32,
    pub latitude: f64,
    pub longitude: f64,
}

/// Rebuild the keyed record map the map widget is built from.
pub fn into_records(projects: Vec<ProjectData>) -> ProjectRecords {
    projects
        .into_iter()
        .map(|p| {
            (
                p.key,
                ProjectRecord {
                    country_coords: CountryCoords {
                        latitude: p.latitude,
                        longitude: p.longitude,
                    },
                    project_count: p.project_count,
                    country_name: p.country_name,
                },
            )
        })
        .collect()
}

// API functions

#[derive(Deserialize)]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectData>,
}

pub async fn fetch_projects() -> Result<ProjectRecords, String> {
    let resp: ProjectsResponse = query(
        r#"query { projects { key countryName projectCount latitude longitude } }"#,
        None,
    )
    .await?;
    Ok(into_records(resp.projects))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigResponse {
    pub site_config: SiteConfig,
}

pub async fn fetch_site_config() -> Result<SiteConfig, String> {
    let resp: SiteConfigResponse = query(
        r#"query { siteConfig { baseUrl tileUrl tileAttribution } }"#,
        None,
    )
    .await?;
    Ok(resp.site_config)
}
