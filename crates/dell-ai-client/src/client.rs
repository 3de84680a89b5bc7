use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use dell_ai_common::{
    App, ContainerEngine, DeployConfig, HubError, Model, Platform, Result, UserConfigEntry,
};

use crate::config::ClientConfig;
use crate::credentials::{CredentialProvider, TokenFile};
use crate::resolver;
use crate::transport::Transport;

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<String>,
}

#[derive(Deserialize)]
struct PlatformList {
    #[serde(default)]
    platforms: Vec<String>,
}

#[derive(Deserialize)]
struct AppList {
    #[serde(default)]
    apps: Vec<String>,
}

/// Public entry point: one Hub call per method, results as typed records.
pub struct HubClient {
    transport: Transport,
    identity_url: String,
}

impl HubClient {
    pub fn new(config: ClientConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(&config, credentials)?,
            identity_url: config.identity_url,
        })
    }

    /// Environment-driven configuration and the shared token file.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env(), Arc::new(TokenFile::from_env()?))
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        self.transport.credentials()
    }

    // ── auth ────────────────────────────────────────────────────────

    pub fn login(&self, token: &str) -> Result<()> {
        self.credentials().save_token(token)
    }

    pub fn logout(&self) -> Result<()> {
        self.credentials().clear()
    }

    /// Profile of the token owner, as returned by the identity provider.
    pub async fn get_user_info(&self) -> Result<Value> {
        self.transport.get_absolute(&self.identity_url).await
    }

    /// True when a token is stored and the identity provider accepts it.
    pub async fn is_authenticated(&self) -> Result<bool> {
        if self.credentials().token()?.is_none() {
            return Ok(false);
        }
        match self.get_user_info().await {
            Ok(_) => Ok(true),
            Err(HubError::Authentication(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ── catalog ─────────────────────────────────────────────────────

    pub async fn list_models(&self) -> Result<Vec<String>> {
        let list: ModelList = self.transport.get("/models").await?;
        Ok(list.models)
    }

    pub async fn get_model(&self, model_id: &str) -> Result<Model> {
        self.transport.get(&format!("/models/{model_id}")).await
    }

    pub async fn list_platforms(&self) -> Result<Vec<String>> {
        let list: PlatformList = self.transport.get("/platforms").await?;
        Ok(list.platforms)
    }

    pub async fn get_platform(&self, sku_id: &str) -> Result<Platform> {
        self.transport.get(&format!("/platforms/{sku_id}")).await
    }

    pub async fn list_apps(&self) -> Result<Vec<String>> {
        let list: AppList = self.transport.get("/apps").await?;
        Ok(list.apps)
    }

    pub async fn get_app(&self, app_id: &str) -> Result<App> {
        self.transport.get(&format!("/apps/{app_id}")).await
    }

    /// Configurations the model declares for `sku_id`.
    pub async fn check_compatibility(
        &self,
        model_id: &str,
        sku_id: &str,
    ) -> Result<Vec<DeployConfig>> {
        let model = self.get_model(model_id).await?;
        Ok(resolver::platform_configs(&model, sku_id)?.to_vec())
    }

    // ── snippets ────────────────────────────────────────────────────

    /// Render a docker command or kubernetes manifest for `model_id` on `sku_id`.
    ///
    /// `engine` and the counts are checked before the model is fetched.
    pub async fn get_deployment_snippet(
        &self,
        model_id: &str,
        sku_id: &str,
        engine: &str,
        num_gpus: u32,
        num_replicas: u32,
    ) -> Result<String> {
        let engine: ContainerEngine = engine.parse()?;
        if num_gpus == 0 {
            return Err(HubError::Validation(
                "number of GPUs must be a positive integer".to_string(),
            ));
        }
        if num_replicas == 0 {
            return Err(HubError::Validation(
                "number of replicas must be a positive integer".to_string(),
            ));
        }

        let model = self.get_model(model_id).await?;
        let config = resolver::resolve_config(&model, sku_id, num_gpus)?;
        tracing::debug!(
            model_id,
            sku_id,
            %engine,
            num_gpus,
            num_replicas,
            "rendering model snippet"
        );
        resolver::render_model_snippet(model.id(), sku_id, config, engine, num_replicas)
    }

    /// Render a `helm install` command for `app_id` with the given overrides.
    pub async fn get_app_snippet(
        &self,
        app_id: &str,
        user_config: &[UserConfigEntry],
    ) -> Result<String> {
        let app = self.get_app(app_id).await?;
        resolver::render_app_snippet(&app.id, &app.components, user_config)
    }
}
