use std::sync::Arc;

use async_graphql::{Context, Object, SimpleObject};
use project_map_shared::models::{ProjectRecord, SiteConfig};

use crate::assets::Assets;

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlProject {
    pub key: String,
    pub country_name: String,
    pub project_count: u32,
    pub latitude: f64,
    pub longitude: f64,
}

impl GqlProject {
    fn from_record(key: &str, p: &ProjectRecord) -> Self {
        GqlProject {
            key: key.to_string(),
            country_name: p.country_name.clone(),
            project_count: p.project_count,
            latitude: p.country_coords.latitude,
            longitude: p.country_coords.longitude,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlSiteConfig {
    pub base_url: String,
    pub tile_url: String,
    pub tile_attribution: String,
}

impl From<&SiteConfig> for GqlSiteConfig {
    fn from(s: &SiteConfig) -> Self {
        GqlSiteConfig {
            base_url: s.base_url.clone(),
            tile_url: s.tile_url.clone(),
            tile_attribution: s.tile_attribution.clone(),
        }
    }
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Project records sorted by key.
    async fn projects(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlProject>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .projects
            .iter()
            .map(|(key, p)| GqlProject::from_record(key, p))
            .collect())
    }

    async fn project(&self, ctx: &Context<'_>, key: String) -> async_graphql::Result<Option<GqlProject>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .find_project(&key)
            .map(|p| GqlProject::from_record(&key, p)))
    }

    async fn total_projects(&self, ctx: &Context<'_>) -> async_graphql::Result<u64> {
        Ok(ctx.data::<Arc<Assets>>()?.total_projects())
    }

    async fn site_config(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlSiteConfig> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(GqlSiteConfig::from(&assets.site))
    }

    /// The style table as map-style JSON.
    async fn map_styles(&self, ctx: &Context<'_>) -> async_graphql::Result<String> {
        let assets = ctx.data::<Arc<Assets>>()?;
        assets.styles_json().map_err(async_graphql::Error::new)
    }
}

pub type Schema =
    async_graphql::Schema<QueryRoot, async_graphql::EmptyMutation, async_graphql::EmptySubscription>;

pub fn build_schema(assets: Arc<Assets>) -> Schema {
    async_graphql::Schema::build(
        QueryRoot,
        async_graphql::EmptyMutation,
        async_graphql::EmptySubscription,
    )
    .data(assets)
    .finish()
}
