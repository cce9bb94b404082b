use mongodb::{Client, Collection, Database};
use std::error::Error;

use crate::models::Role;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool tuned for a small clinic deployment
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .unwrap_or("clinic");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the unique indexes the lifecycle cascade relies on. Without
    /// them a duplicate email or a lost identifier race would insert instead
    /// of aborting.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();

        // users(email) and users(user_id) must both be unique
        let users = self.database().collection::<mongodb::bson::Document>("users");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(unique())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let user_id_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(unique())
            .build();

        match users.create_index(user_id_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(user_id) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Each profile collection: unique display id and unique back-reference
        // to the owning user
        for role in Role::ALL {
            let desc = crate::services::role_registry::descriptor(role);
            let collection = self
                .database()
                .collection::<mongodb::bson::Document>(desc.collection);

            let id_index = IndexModel::builder()
                .keys(doc! { desc.id_field: 1 })
                .options(unique())
                .build();

            match collection.create_index(id_index).await {
                Ok(_) => log::info!(
                    "   ✅ Index created: {}({}) unique",
                    desc.collection,
                    desc.id_field
                ),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }

            let user_index = IndexModel::builder()
                .keys(doc! { "user": 1 })
                .options(unique())
                .build();

            match collection.create_index(user_index).await {
                Ok(_) => log::info!("   ✅ Index created: {}(user) unique", desc.collection),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
