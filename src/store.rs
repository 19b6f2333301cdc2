use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set, SqlErr};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::NewMovie,
};

/// Storage handle for the movie list. Cloning is cheap, the inner
/// connection is reference-counted.
#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new movie and returns its id. The `movies.title` unique
    /// index rejects duplicates at the storage layer.
    pub async fn create(&self, new: NewMovie) -> AppResult<i32> {
        let model = movie::ActiveModel {
            title: Set(new.title.clone()),
            year: Set(new.year),
            description: Set(new.description),
            image_url: Set(new.image_url),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(inserted) => Ok(inserted.id),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(AppError::DuplicateTitle(new.title))
                }
                _ => Err(err.into()),
            },
        }
    }

    /// All movies in insertion (id) order. Ranking recomputation relies on
    /// this order for its tie-break.
    pub async fn get_all(&self) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find().order_by_asc(movie::Column::Id).all(&self.db).await?)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<movie::Model> {
        movie::Entity::find_by_id(id).one(&self.db).await?.ok_or(AppError::NotFound(id))
    }

    /// Partial update: only the `Set` fields of `fields` are written.
    pub async fn update(&self, id: i32, mut fields: movie::ActiveModel) -> AppResult<movie::Model> {
        fields.id = Set(id);
        match fields.update(&self.db).await {
            Ok(updated) => Ok(updated),
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(id));
        }
        Ok(())
    }
}
