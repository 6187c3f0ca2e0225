use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info};
use sea_orm::sea_query::{Index, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Schema, Set, SqlErr, TransactionTrait,
};
use tokio::sync::Mutex;

use crate::configuration::Config;
use crate::error_handling::types::{RegistrationError, StorageError};
use crate::storage::db_entities::{activities, participants, users};
use crate::storage::seed::SEED_ACTIVITIES;
use crate::storage::storage_trait::ActivityStore;
use crate::storage::types::{display_name_from_email, ActivityCatalog, ActivityDetails};

const PARTICIPANT_PAIR_INDEX: &str = "idx_participants_activity_user";

fn read_failed(context: &'static str) -> impl FnOnce(DbErr) -> StorageError {
    move |e| {
        error!("{}: {}", context, e);
        StorageError::ReadFailed
    }
}

fn write_failed(context: &'static str) -> impl FnOnce(DbErr) -> StorageError {
    move |e| {
        error!("{}: {}", context, e);
        StorageError::WriteFailed
    }
}

/// SQLite-backed activity store built on SeaORM.
///
/// Each operation runs inside its own transaction taken from the connection
/// pool. Writers queue on `write_lock` so that SQLite never sees two write
/// transactions at once; a rejected request rolls its transaction back before
/// the lock is released.
pub struct DatabaseStorage {
    db: DatabaseConnection,
    write_lock: Mutex<()>,
}

impl DatabaseStorage {
    /// Opens a connection pool on `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let mut opts = ConnectOptions::new(database_url.to_owned());
        opts.max_connections(max_connections).sqlx_logging(false);

        let db = Database::connect(opts).await.map_err(|e| {
            error!("Failed to connect to {}: {}", database_url, e);
            StorageError::ConnectionFailed
        })?;
        info!("Connected to {}", database_url);
        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }

    pub async fn from_config(config: &Config) -> Result<Self, StorageError> {
        Self::connect(&config.database_url, config.max_connections).await
    }

    /// Creates the schema when missing, then seeds the sample catalog into an
    /// empty database.
    pub async fn bootstrap(&self) -> Result<(), StorageError> {
        self.create_schema().await?;
        self.seed_if_empty().await?;
        Ok(())
    }

    pub async fn create_schema(&self) -> Result<(), StorageError> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let tables = [
            schema
                .create_table_from_entity(activities::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(users::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(participants::Entity)
                .if_not_exists()
                .to_owned(),
        ];
        for table in &tables {
            self.db
                .execute(backend.build(table))
                .await
                .map_err(write_failed("Failed to create table"))?;
        }

        let pair_index = Index::create()
            .name(PARTICIPANT_PAIR_INDEX)
            .table(participants::Entity)
            .col(participants::Column::ActivityId)
            .col(participants::Column::UserId)
            .unique()
            .if_not_exists()
            .to_owned();
        self.db
            .execute(backend.build(&pair_index))
            .await
            .map_err(write_failed("Failed to create participant index"))?;

        debug!("Schema ready");
        Ok(())
    }

    /// Inserts the sample activities, users and registrations when the
    /// activity table is empty. Returns whether anything was written.
    pub async fn seed_if_empty(&self) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_failed("Failed to open seed transaction"))?;

        let existing = activities::Entity::find()
            .count(&txn)
            .await
            .map_err(read_failed("Failed to count activities"))?;
        if existing > 0 {
            debug!("Database already holds {} activities, skipping seed", existing);
            return Ok(false);
        }

        let now = Utc::now().to_rfc3339();
        let mut links = 0;
        for seed in SEED_ACTIVITIES.iter() {
            let activity = activities::ActiveModel {
                name: Set(seed.name.to_owned()),
                description: Set(seed.description.to_owned()),
                schedule: Set(seed.schedule.to_owned()),
                max_participants: Set(seed.max_participants),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(write_failed("Failed to seed activity"))?;

            for (email, name) in seed.participants.iter() {
                let user = users::ActiveModel {
                    email: Set((*email).to_owned()),
                    name: Set(Some((*name).to_owned())),
                    created_at: Set(now.clone()),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(write_failed("Failed to seed user"))?;

                participants::ActiveModel {
                    activity_id: Set(activity.id),
                    user_id: Set(user.id),
                    registered_at: Set(now.clone()),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(write_failed("Failed to seed participant"))?;
                links += 1;
            }
        }

        txn.commit()
            .await
            .map_err(write_failed("Failed to commit seed"))?;
        info!(
            "Seeded {} activities with {} registrations",
            SEED_ACTIVITIES.len(),
            links
        );
        Ok(true)
    }

    async fn begin_write(&self) -> Result<DatabaseTransaction, StorageError> {
        self.db
            .begin()
            .await
            .map_err(write_failed("Failed to open transaction"))
    }
}

/// Commits `txn` when `outcome` is a success and rolls it back otherwise.
async fn finish<T>(
    txn: DatabaseTransaction,
    outcome: Result<T, RegistrationError>,
    context: &'static str,
) -> Result<T, RegistrationError> {
    match outcome {
        Ok(value) => {
            txn.commit().await.map_err(write_failed(context))?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = txn.rollback().await {
                error!("Failed to roll back after \"{}\": {}", e, rollback);
            }
            Err(e)
        }
    }
}

async fn find_activity<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<Option<activities::Model>, StorageError> {
    activities::Entity::find()
        .filter(activities::Column::Name.eq(name))
        .one(conn)
        .await
        .map_err(read_failed("Failed to look up activity"))
}

async fn find_user<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, StorageError> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await
        .map_err(read_failed("Failed to look up user"))
}

async fn find_participant<C: ConnectionTrait>(
    conn: &C,
    activity_id: i32,
    user_id: i32,
) -> Result<Option<participants::Model>, StorageError> {
    participants::Entity::find()
        .filter(participants::Column::ActivityId.eq(activity_id))
        .filter(participants::Column::UserId.eq(user_id))
        .one(conn)
        .await
        .map_err(read_failed("Failed to look up participant"))
}

/// Inserts a user for `email` unless one exists, then returns the stored row.
async fn upsert_user<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<users::Model, StorageError> {
    let candidate = users::ActiveModel {
        email: Set(email.to_owned()),
        name: Set(Some(display_name_from_email(email))),
        created_at: Set(Utc::now().to_rfc3339()),
        ..Default::default()
    };
    let inserted = users::Entity::insert(candidate)
        .on_conflict(
            OnConflict::column(users::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(write_failed("Failed to upsert user"))?;
    if inserted > 0 {
        debug!("Created user {}", email);
    }

    find_user(conn, email).await?.ok_or_else(|| {
        error!("User {} missing right after upsert", email);
        StorageError::ReadFailed
    })
}

#[async_trait]
impl ActivityStore for DatabaseStorage {
    async fn list_activities(&self) -> Result<ActivityCatalog, StorageError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(read_failed("Failed to open transaction"))?;

        let rows = activities::Entity::find()
            .order_by_asc(activities::Column::Id)
            .all(&txn)
            .await
            .map_err(read_failed("Failed to load activities"))?;
        let links = participants::Entity::find()
            .find_also_related(users::Entity)
            .order_by_asc(participants::Column::Id)
            .all(&txn)
            .await
            .map_err(read_failed("Failed to load participants"))?;

        txn.commit()
            .await
            .map_err(read_failed("Failed to close transaction"))?;

        let mut emails: HashMap<i32, Vec<String>> = HashMap::new();
        for (participant, user) in links {
            if let Some(user) = user {
                emails
                    .entry(participant.activity_id)
                    .or_default()
                    .push(user.email);
            }
        }

        let mut catalog = ActivityCatalog::new();
        for activity in rows {
            let participants = emails.remove(&activity.id).unwrap_or_default();
            catalog.push(
                activity.name,
                ActivityDetails {
                    description: activity.description,
                    schedule: activity.schedule,
                    max_participants: activity.max_participants,
                    participants,
                },
            );
        }
        Ok(catalog)
    }

    async fn signup(&self, activity_name: &str, email: &str) -> Result<(), RegistrationError> {
        let _guard = self.write_lock.lock().await;
        let txn = self.begin_write().await?;
        let outcome = register(&txn, activity_name, email).await;
        finish(txn, outcome, "Failed to commit signup").await?;
        info!("Signed up {} for {}", email, activity_name);
        Ok(())
    }

    async fn unregister(&self, activity_name: &str, email: &str) -> Result<(), RegistrationError> {
        let _guard = self.write_lock.lock().await;
        let txn = self.begin_write().await?;
        let outcome = deregister(&txn, activity_name, email).await;
        finish(txn, outcome, "Failed to commit unregistration").await?;
        info!("Unregistered {} from {}", email, activity_name);
        Ok(())
    }
}

async fn register(
    txn: &DatabaseTransaction,
    activity_name: &str,
    email: &str,
) -> Result<(), RegistrationError> {
    let activity = find_activity(txn, activity_name)
        .await?
        .ok_or(RegistrationError::ActivityNotFound)?;

    let registered = participants::Entity::find()
        .filter(participants::Column::ActivityId.eq(activity.id))
        .count(txn)
        .await
        .map_err(read_failed("Failed to count participants"))?;
    // a negative capacity accepts nobody
    let capacity = activity.max_participants.max(0) as u64;
    if registered >= capacity {
        return Err(RegistrationError::ActivityFull);
    }

    let user = upsert_user(txn, email).await?;
    if find_participant(txn, activity.id, user.id).await?.is_some() {
        return Err(RegistrationError::AlreadySignedUp);
    }

    let inserted = participants::ActiveModel {
        activity_id: Set(activity.id),
        user_id: Set(user.id),
        registered_at: Set(Utc::now().to_rfc3339()),
        ..Default::default()
    }
    .insert(txn)
    .await;
    match inserted {
        Ok(_) => Ok(()),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(RegistrationError::AlreadySignedUp)
        }
        Err(e) => Err(write_failed("Failed to insert participant")(e).into()),
    }
}

async fn deregister(
    txn: &DatabaseTransaction,
    activity_name: &str,
    email: &str,
) -> Result<(), RegistrationError> {
    let activity = find_activity(txn, activity_name)
        .await?
        .ok_or(RegistrationError::ActivityNotFound)?;
    let user = find_user(txn, email)
        .await?
        .ok_or(RegistrationError::UserNotFound)?;
    let participant = find_participant(txn, activity.id, user.id)
        .await?
        .ok_or(RegistrationError::NotSignedUp)?;

    participants::Entity::delete_by_id(participant.id)
        .exec(txn)
        .await
        .map_err(write_failed("Failed to delete participant"))?;
    Ok(())
}
