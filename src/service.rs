use std::sync::Arc;

use sea_orm::Set;
use tracing::debug;

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::{MovieDetails, NewMovie, SearchCandidate},
    ranking,
    store::MovieStore,
    tmdb::TmdbClient,
};

/// Orchestrates the use cases the routes expose: list, search, finalize-add,
/// edit, delete.
pub struct MovieService {
    store: MovieStore,
    tmdb: Arc<TmdbClient>,
    image_base_url: String,
}

impl MovieService {
    pub fn new(store: MovieStore, tmdb: Arc<TmdbClient>, image_base_url: String) -> Self {
        Self { store, tmdb, image_base_url }
    }

    /// The full list in rating order, with freshly assigned ranks. The new
    /// ranks are written back to the store on every call, so the persisted
    /// `ranking` column always reflects the last list view.
    pub async fn list(&self) -> AppResult<Vec<movie::Model>> {
        let ranked = ranking::recompute(self.store.get_all().await?);

        for m in &ranked {
            let fields = movie::ActiveModel { ranking: Set(m.ranking), ..Default::default() };
            self.store.update(m.id, fields).await?;
        }

        Ok(ranked)
    }

    /// Provider title search, query passed through raw, results unmodified.
    pub async fn search(&self, query: &str) -> AppResult<Vec<SearchCandidate>> {
        self.tmdb.search(query).await
    }

    /// Looks up the chosen candidate's details and creates the local record.
    /// Nothing is persisted if the provider call fails or its payload has no
    /// usable release date. Returns the new id so the caller can route the
    /// user straight into the edit form.
    pub async fn finalize_add(&self, tmdb_id: i64) -> AppResult<i32> {
        let details = self.tmdb.details(tmdb_id).await?;
        let new = self.movie_from_details(details)?;
        let id = self.store.create(new).await?;
        debug!(id, "movie added");
        Ok(id)
    }

    pub async fn get(&self, id: i32) -> AppResult<movie::Model> {
        self.store.get_by_id(id).await
    }

    /// Sets rating and review, nothing else. The form layer already
    /// validates both fields; this re-checks them before touching the store.
    pub async fn edit(&self, id: i32, rating: Option<f64>, review: Option<String>) -> AppResult<()> {
        let rating = rating
            .filter(|r| r.is_finite())
            .ok_or_else(|| AppError::Validation("rating must be a number".to_string()))?;
        let review = review
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::Validation("review must not be empty".to_string()))?;

        let fields = movie::ActiveModel {
            rating: Set(Some(rating)),
            review: Set(Some(review)),
            ..Default::default()
        };
        self.store.update(id, fields).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.delete(id).await
    }

    fn movie_from_details(&self, details: MovieDetails) -> AppResult<NewMovie> {
        let year = release_year(details.release_date.as_deref()).ok_or_else(|| {
            AppError::Provider(format!("movie {} has no usable release date", details.id))
        })?;
        let image_url = details
            .poster_path
            .map(|path| format!("{}{}", self.image_base_url.trim_end_matches('/'), path));

        Ok(NewMovie { title: details.title, year, description: details.overview, image_url })
    }
}

/// Release year from a provider date string: the segment before the first
/// `-` ("2021-09-15" -> 2021).
fn release_year(release_date: Option<&str>) -> Option<i32> {
    release_date?.split('-').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn service() -> (MovieService, MovieStore) {
        let db = db::connect_and_migrate("sqlite::memory:").await.expect("in-memory db");
        let store = MovieStore::new(db);
        let tmdb = Arc::new(TmdbClient::new(
            reqwest::Client::new(),
            "test-token".to_string(),
            "http://localhost".to_string(),
            1,
        ));
        let service = MovieService::new(
            store.clone(),
            tmdb,
            "https://image.tmdb.org/t/p/w500".to_string(),
        );
        (service, store)
    }

    fn dune_details() -> MovieDetails {
        MovieDetails {
            id: 438631,
            title: "Dune".to_string(),
            overview: "Paul Atreides leads nomadic tribes in a revolt.".to_string(),
            release_date: Some("2021-09-15".to_string()),
            poster_path: Some("/d5NXSklXo0qyIYkgV94XAgMIckC.jpg".to_string()),
        }
    }

    #[test]
    fn release_year_takes_segment_before_dash() {
        assert_eq!(release_year(Some("2021-09-15")), Some(2021));
        assert_eq!(release_year(Some("1984")), Some(1984));
        assert_eq!(release_year(Some("")), None);
        assert_eq!(release_year(Some("soon")), None);
        assert_eq!(release_year(None), None);
    }

    #[tokio::test]
    async fn details_map_into_new_movie() {
        let (service, _) = service().await;

        let new = service.movie_from_details(dune_details()).unwrap();
        assert_eq!(new.title, "Dune");
        assert_eq!(new.year, 2021);
        assert_eq!(new.description, "Paul Atreides leads nomadic tribes in a revolt.");
        assert_eq!(
            new.image_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/d5NXSklXo0qyIYkgV94XAgMIckC.jpg")
        );
    }

    #[tokio::test]
    async fn details_without_release_date_are_rejected() {
        let (service, _) = service().await;

        let details = MovieDetails { release_date: None, ..dune_details() };
        let err = service.movie_from_details(details).unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
    }

    #[tokio::test]
    async fn freshly_added_movie_lists_unrated_with_rank_one() {
        let (service, store) = service().await;
        let new = service.movie_from_details(dune_details()).unwrap();
        store.create(new).await.unwrap();

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Dune");
        assert_eq!(listed[0].ranking, Some(1));
        assert_eq!(listed[0].rating, None);
    }

    #[tokio::test]
    async fn list_orders_by_rating_and_persists_ranks() {
        let (service, store) = service().await;
        let first = store.create(plain_movie("Seven Five")).await.unwrap();
        let second = store.create(plain_movie("Nine Oh")).await.unwrap();
        service.edit(first, Some(7.5), Some("fine".to_string())).await.unwrap();
        service.edit(second, Some(9.0), Some("great".to_string())).await.unwrap();

        let listed = service.list().await.unwrap();
        assert_eq!(listed[0].title, "Nine Oh");
        assert_eq!(listed[0].ranking, Some(1));
        assert_eq!(listed[1].title, "Seven Five");
        assert_eq!(listed[1].ranking, Some(2));

        // write-on-read: the persisted rows carry the recomputed ranks
        assert_eq!(store.get_by_id(second).await.unwrap().ranking, Some(1));
        assert_eq!(store.get_by_id(first).await.unwrap().ranking, Some(2));
    }

    #[tokio::test]
    async fn edit_updates_rating_and_review_only() {
        let (service, store) = service().await;
        let id = store.create(plain_movie("Dune")).await.unwrap();

        service.edit(id, Some(6.5), Some("ok".to_string())).await.unwrap();

        let listed = service.list().await.unwrap();
        assert_eq!(listed[0].rating, Some(6.5));
        assert_eq!(listed[0].review.as_deref(), Some("ok"));
        assert_eq!(listed[0].title, "Dune");
        assert_eq!(listed[0].year, 2021);
        assert_eq!(store.get_by_id(id).await.unwrap().description, "desc");
    }

    #[tokio::test]
    async fn edit_rejects_missing_or_invalid_input() {
        let (service, store) = service().await;
        let id = store.create(plain_movie("Dune")).await.unwrap();

        for (rating, review) in [
            (None, Some("ok".to_string())),
            (Some(f64::NAN), Some("ok".to_string())),
            (Some(6.5), None),
            (Some(6.5), Some("   ".to_string())),
        ] {
            let err = service.edit(id, rating, review).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }

        // nothing was written
        let movie = store.get_by_id(id).await.unwrap();
        assert_eq!(movie.rating, None);
        assert_eq!(movie.review, None);
    }

    #[tokio::test]
    async fn edit_missing_movie_is_not_found() {
        let (service, _) = service().await;
        let err = service.edit(41, Some(6.5), Some("ok".to_string())).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(41)));
    }

    #[tokio::test]
    async fn delete_missing_movie_is_not_found() {
        let (service, _) = service().await;
        let err = service.delete(41).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(41)));
    }

    fn plain_movie(title: &str) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            year: 2021,
            description: "desc".to_string(),
            image_url: None,
        }
    }
}
