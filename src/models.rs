use serde::Deserialize;

/// One result row from the provider's title search, passed through to the
/// selection page unmodified.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchCandidate {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Full detail payload for a single movie, fetched when the user picks a
/// candidate.
#[derive(Clone, Debug, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Input to `MovieStore::create`. Rating, review and ranking start absent.
#[derive(Clone, Debug)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub rating: Option<f64>,
    pub review: Option<String>,
}
