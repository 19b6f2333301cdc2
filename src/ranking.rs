use std::cmp::Ordering;

use crate::entities::movie;

/// Reorders the list by rating (highest first, unrated last) and assigns
/// dense 1-based ranks. The sort is stable, so equal ratings and unrated
/// records keep the order the store returned them in.
pub fn recompute(mut movies: Vec<movie::Model>) -> Vec<movie::Model> {
    movies.sort_by(|a, b| compare_ratings(a.rating, b.rating));
    for (pos, movie) in movies.iter_mut().enumerate() {
        movie.ranking = Some(pos as i32 + 1);
    }
    movies
}

fn compare_ratings(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: i32, title: &str, rating: Option<f64>) -> movie::Model {
        movie::Model {
            id,
            title: title.to_string(),
            year: 2000,
            description: String::new(),
            rating,
            ranking: None,
            review: None,
            image_url: None,
        }
    }

    #[test]
    fn ranks_are_dense_one_based() {
        let ranked = recompute(vec![
            model(1, "a", Some(3.0)),
            model(2, "b", None),
            model(3, "c", Some(9.1)),
            model(4, "d", Some(7.2)),
            model(5, "e", None),
        ]);

        let ranks: Vec<_> = ranked.iter().map(|m| m.ranking.unwrap()).collect();
        assert_eq!(ranks, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn higher_rating_ranks_first() {
        let ranked = recompute(vec![model(1, "low", Some(7.5)), model(2, "high", Some(9.0))]);

        assert_eq!(ranked[0].title, "high");
        assert_eq!(ranked[0].ranking, Some(1));
        assert_eq!(ranked[1].title, "low");
        assert_eq!(ranked[1].ranking, Some(2));
    }

    #[test]
    fn ties_and_unrated_keep_input_order() {
        // ratings 8.0, null, 8.0 in insertion order
        let ranked = recompute(vec![
            model(1, "first", Some(8.0)),
            model(2, "unrated", None),
            model(3, "second", Some(8.0)),
        ]);

        let titles: Vec<_> = ranked.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["first", "second", "unrated"]);
        let ranks: Vec<_> = ranked.iter().map(|m| m.ranking.unwrap()).collect();
        assert_eq!(ranks, [1, 2, 3]);
    }

    #[test]
    fn unrated_always_after_rated() {
        let ranked = recompute(vec![
            model(1, "unrated", None),
            model(2, "low", Some(0.5)),
            model(3, "also-unrated", None),
        ]);

        assert_eq!(ranked[0].title, "low");
        assert_eq!(ranked[1].title, "unrated");
        assert_eq!(ranked[2].title, "also-unrated");
    }

    #[test]
    fn recompute_is_stable_on_unchanged_input() {
        let movies = vec![
            model(1, "a", Some(6.0)),
            model(2, "b", Some(6.0)),
            model(3, "c", Some(9.0)),
            model(4, "d", None),
        ];

        let once = recompute(movies);
        let twice = recompute(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_list_stays_empty() {
        assert!(recompute(Vec::new()).is_empty());
    }
}
