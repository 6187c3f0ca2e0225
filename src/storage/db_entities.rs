//! SeaORM entity models used by the database storage backend.
//!
//! These structs map to the SQLite tables created by `database_storage`:
//! - `activities`: the extracurricular catalog
//! - `users`: students, keyed by their unique email
//! - `participants`: one row per (activity, user) registration
//!
//! Timestamps are stored as RFC3339 strings for portability.

/// Activities table entity model.
pub mod activities {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "activities")]
    pub struct Model {
        /// Auto-increment row id
        #[sea_orm(primary_key)]
        pub id: i32,
        /// Display name, also the key used in URLs
        #[sea_orm(unique)]
        pub name: String,
        pub description: String,
        /// Free-form schedule text (e.g. "Fridays, 3:30 PM - 5:00 PM")
        pub schedule: String,
        /// Capacity
        pub max_participants: i32,
        pub created_at: String,
        pub updated_at: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::participants::Entity")]
        Participants,
    }

    impl Related<super::participants::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Participants.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Users table entity model.
pub mod users {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(unique)]
        pub email: String,
        pub name: Option<String>,
        pub created_at: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::participants::Entity")]
        Participants,
    }

    impl Related<super::participants::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Participants.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Participants table entity model.
///
/// The (activity_id, user_id) pair is made unique by an index created next to
/// the table, see `DatabaseStorage::create_schema`.
pub mod participants {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "participants")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        /// Foreign key to `activities.id`
        pub activity_id: i32,
        /// Foreign key to `users.id`
        pub user_id: i32,
        pub registered_at: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::activities::Entity",
            from = "Column::ActivityId",
            to = "super::activities::Column::Id",
            on_delete = "Cascade"
        )]
        Activity,
        #[sea_orm(
            belongs_to = "super::users::Entity",
            from = "Column::UserId",
            to = "super::users::Column::Id",
            on_delete = "Cascade"
        )]
        User,
    }

    impl Related<super::activities::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Activity.def()
        }
    }

    impl Related<super::users::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::User.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
