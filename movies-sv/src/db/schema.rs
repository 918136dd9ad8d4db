table! {
    movie (movie_id) {
        movie_id -> Int4,
        title -> Text,
        release_date -> Date,
        score -> Nullable<Float8>,
        overview -> Nullable<Text>,
        orig_title -> Nullable<Text>,
        status -> Nullable<Text>,
        orig_lang -> Int4,
        budget -> Float8,
        revenue -> Float8,
        country -> Int4,
    }
}

table! {
    genre (genre_id) {
        genre_id -> Int4,
        genre_name -> Text,
    }
}

table! {
    language (language_id) {
        language_id -> Int4,
        language_name -> Text,
    }
}

table! {
    country (country_id) {
        country_id -> Int4,
        country_name -> Text,
    }
}

table! {
    movie_genres (movie_id, genre_id) {
        movie_id -> Int4,
        genre_id -> Int4,
    }
}

joinable!(movie -> language (orig_lang));
joinable!(movie -> country (country));
joinable!(movie_genres -> movie (movie_id));
joinable!(movie_genres -> genre (genre_id));

allow_tables_to_appear_in_same_query!(
    movie,
    genre,
    language,
    country,
    movie_genres,
);
