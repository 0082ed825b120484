use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use configs::{DatabaseConfig, TlsMode};
use futures::TryStreamExt;
use models::{Recipe, RecipePatch};
use mongodb::{
    options::{
        ClientOptions, FindOneAndUpdateOptions, ReturnDocument, ServerApi, ServerApiVersion, Tls,
        TlsOptions,
    },
    Client, Collection,
};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::recipe::repository::RecipeRepository;

/// MongoDB-backed recipe store.
///
/// Built explicitly from [`DatabaseConfig`] and shared behind an `Arc`. The
/// client is created and pinged lazily on first use; a failed attempt leaves
/// the cell empty so the next caller tries again. Call [`MongoStore::shutdown`]
/// once the HTTP server has drained.
pub struct MongoStore {
    cfg: DatabaseConfig,
    client: OnceCell<Client>,
}

impl MongoStore {
    pub fn new(cfg: DatabaseConfig) -> Self {
        Self { cfg, client: OnceCell::new() }
    }

    pub fn is_connected(&self) -> bool {
        self.client.initialized()
    }

    /// Establish (or reuse) the connection.
    pub async fn connect(&self) -> Result<&Client, ServiceError> {
        self.client
            .get_or_try_init(|| async {
                let opts = client_options(&self.cfg).await?;
                let client = Client::with_options(opts)
                    .map_err(|e| ServiceError::Unavailable(e.to_string()))?;
                ping(&client)
                    .await
                    .map_err(|e| ServiceError::Unavailable(e.to_string()))?;
                info!(
                    database = %self.cfg.database,
                    collection = %self.cfg.collection,
                    event = "mongodb_connected",
                    "connected to MongoDB"
                );
                Ok::<_, ServiceError>(client)
            })
            .await
    }

    async fn collection(&self) -> Result<Collection<Recipe>, ServiceError> {
        let client = self.connect().await?;
        Ok(client
            .database(&self.cfg.database)
            .collection::<Recipe>(&self.cfg.collection))
    }

    /// Close pooled connections. No-op when never connected.
    pub async fn shutdown(&self) {
        if let Some(client) = self.client.get() {
            client.clone().shutdown().await;
            info!(event = "mongodb_shutdown", "MongoDB client shut down");
        }
    }
}

async fn ping(client: &Client) -> Result<(), mongodb::error::Error> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 }, None)
        .await?;
    Ok(())
}

/// Parse the URI and layer the configured pool, timeout and TLS settings on top.
pub async fn client_options(cfg: &DatabaseConfig) -> Result<ClientOptions, ServiceError> {
    let mut opts = ClientOptions::parse(cfg.uri.trim())
        .await
        .map_err(|e| ServiceError::Unavailable(format!("invalid connection string: {e}")))?;
    apply_config(&mut opts, cfg);
    Ok(opts)
}

pub fn apply_config(opts: &mut ClientOptions, cfg: &DatabaseConfig) {
    opts.app_name = Some(cfg.app_name.clone());
    opts.max_pool_size = Some(cfg.max_pool_size);
    opts.min_pool_size = Some(cfg.min_pool_size);
    opts.connect_timeout = Some(cfg.connect_timeout());
    opts.server_selection_timeout = Some(cfg.server_selection_timeout());
    opts.server_api = Some(
        ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build(),
    );
    match cfg.tls {
        TlsMode::Default => {}
        TlsMode::Enabled => opts.tls = Some(Tls::Enabled(TlsOptions::builder().build())),
        TlsMode::Disabled => opts.tls = Some(Tls::Disabled),
        TlsMode::Insecure => {
            warn!("MongoDB TLS certificate validation disabled");
            opts.tls = Some(Tls::Enabled(
                TlsOptions::builder()
                    .allow_invalid_certificates(true)
                    .build(),
            ));
        }
    }
}

fn by_id(id: ObjectId) -> bson::Document {
    doc! { "_id": id }
}

fn return_after() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build()
}

#[async_trait]
impl RecipeRepository for MongoStore {
    async fn ping(&self) -> Result<(), ServiceError> {
        let client = self.connect().await?;
        ping(client).await?;
        Ok(())
    }

    async fn insert(&self, recipe: Recipe) -> Result<Recipe, ServiceError> {
        self.collection().await?.insert_one(&recipe, None).await?;
        Ok(recipe)
    }

    async fn list(&self) -> Result<Vec<Recipe>, ServiceError> {
        let cursor = self.collection().await?.find(None, None).await?;
        Ok(cursor.try_collect::<Vec<_>>().await?)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Recipe>, ServiceError> {
        Ok(self.collection().await?.find_one(by_id(id), None).await?)
    }

    async fn increment_likes(&self, id: ObjectId) -> Result<Option<Recipe>, ServiceError> {
        Ok(self
            .collection()
            .await?
            .find_one_and_update(by_id(id), doc! { "$inc": { "likeCount": 1 } }, return_after())
            .await?)
    }

    async fn update(&self, id: ObjectId, patch: &RecipePatch) -> Result<Option<Recipe>, ServiceError> {
        let set = patch
            .to_set_document()
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(self
            .collection()
            .await?
            .find_one_and_update(by_id(id), doc! { "$set": set }, return_after())
            .await?)
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, ServiceError> {
        let result = self.collection().await?.delete_one(by_id(id), None).await?;
        Ok(result.deleted_count)
    }
}
