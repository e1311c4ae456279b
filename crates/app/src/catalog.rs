use quiz_core::model::PosterRef;
use services::movies::Movie;

/// Built-in movie list so the quiz runs without a network or a movies file.
///
/// Ratings span well below and above every question threshold so both
/// answers come up.
pub fn demo_movies() -> Vec<Movie> {
    const MOVIES: &[(&str, f64, &str)] = &[
        (
            "The Godfather",
            9.2,
            "https://m.media-amazon.com/images/posters/the-godfather.jpg",
        ),
        (
            "The Dark Knight",
            9.0,
            "https://m.media-amazon.com/images/posters/the-dark-knight.jpg",
        ),
        (
            "Kill Bill: Vol. 1",
            8.2,
            "https://m.media-amazon.com/images/posters/kill-bill.jpg",
        ),
        (
            "The Avengers",
            8.0,
            "https://m.media-amazon.com/images/posters/the-avengers.jpg",
        ),
        (
            "Deadpool",
            8.0,
            "https://m.media-amazon.com/images/posters/deadpool.jpg",
        ),
        (
            "The Green Knight",
            6.6,
            "https://m.media-amazon.com/images/posters/the-green-knight.jpg",
        ),
        (
            "Old",
            5.8,
            "https://m.media-amazon.com/images/posters/old.jpg",
        ),
        (
            "The Ice Age Adventures of Buck Wild",
            4.3,
            "https://m.media-amazon.com/images/posters/buck-wild.jpg",
        ),
        (
            "Tesla",
            5.1,
            "https://m.media-amazon.com/images/posters/tesla.jpg",
        ),
        (
            "Vivarium",
            5.9,
            "https://m.media-amazon.com/images/posters/vivarium.jpg",
        ),
    ];

    MOVIES
        .iter()
        .filter_map(|(title, rating, image)| {
            let poster = PosterRef::from_url(*image).ok()?;
            Some(Movie {
                title: (*title).to_owned(),
                rating: *rating,
                poster,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_is_usable() {
        let movies = demo_movies();
        assert_eq!(movies.len(), 10);
        assert!(movies.iter().any(|m| m.rating > 9.0));
        assert!(movies.iter().any(|m| m.rating < 5.0));
    }
}
