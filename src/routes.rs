use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    response::{Html, Redirect},
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{EditForm, SearchForm},
    templates,
};

pub async fn home(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let movies = state.service.list().await?;
    Ok(Html(templates::index_page(&movies)))
}

pub async fn add_page() -> Html<String> {
    Html(templates::add_page())
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> AppResult<Html<String>> {
    let title = form.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::Validation("movie name is required".to_string()));
    }

    let candidates = state.service.search(&title).await?;
    Ok(Html(templates::select_page(&title, &candidates)))
}

pub async fn select(
    State(state): State<Arc<AppState>>,
    Path(tmdb_id): Path<i64>,
) -> AppResult<Redirect> {
    let id = state.service.finalize_add(tmdb_id).await?;
    Ok(Redirect::to(&format!("/edit/{id}")))
}

pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let movie = state.service.get(id).await?;
    Ok(Html(templates::edit_page(&movie)))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<EditForm>,
) -> AppResult<Redirect> {
    state.service.edit(id, form.rating, form.review).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete(State(state): State<Arc<AppState>>, Path(id): Path<i32>) -> AppResult<Redirect> {
    state.service.delete(id).await?;
    Ok(Redirect::to("/"))
}
