use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use log::debug;
use r2d2::Pool;

use crate::core::error::Error;
use crate::core::error::Error::{DBQueryError, UnknownCountry, UnknownGenre, UnknownLanguage};
use crate::core::{MovieChangeset, MovieDraft, MovieRecord, MovieUpdate, NewMovie, Sort, SortBy, SortOrder};

pub mod schema;

use schema::{country, genre, language, movie, movie_genres};

pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;
pub type DbConnectionPool = Pool<ConnectionManager<PgConnection>>;

type MovieColumns = (
    movie::movie_id,
    movie::title,
    movie::release_date,
    movie::score,
    movie::overview,
    movie::orig_title,
    movie::status,
    language::language_name,
    movie::budget,
    movie::revenue,
    country::country_name,
);

/// Select list behind every public movie record: the movie row with its
/// language and country surrogate keys resolved back to names.
const MOVIE_RECORD_COLUMNS: MovieColumns = (
    movie::movie_id,
    movie::title,
    movie::release_date,
    movie::score,
    movie::overview,
    movie::orig_title,
    movie::status,
    language::language_name,
    movie::budget,
    movie::revenue,
    country::country_name,
);

type MovieFrom = diesel::dsl::InnerJoin<diesel::dsl::InnerJoin<movie::table, language::table>, country::table>;
type MovieQuery<'a> = diesel::dsl::IntoBoxed<'a, diesel::dsl::Select<MovieFrom, MovieColumns>, Pg>;

fn movie_records() -> MovieQuery<'static> {
    movie::table
        .inner_join(language::table)
        .inner_join(country::table)
        .select(MOVIE_RECORD_COLUMNS)
        .into_boxed()
}

fn sorted(query: MovieQuery<'static>, sort: Sort) -> MovieQuery<'static> {
    match (sort.by, sort.order) {
        (SortBy::MovieId, SortOrder::Asc) => query.order(movie::movie_id.asc()),
        (SortBy::MovieId, SortOrder::Desc) => query.order(movie::movie_id.desc()),
        (SortBy::Title, SortOrder::Asc) => query.order(movie::title.asc()),
        (SortBy::Title, SortOrder::Desc) => query.order(movie::title.desc()),
        (SortBy::Score, SortOrder::Asc) => query.order(movie::score.asc()),
        (SortBy::Score, SortOrder::Desc) => query.order(movie::score.desc()),
        (SortBy::Budget, SortOrder::Asc) => query.order(movie::budget.asc()),
        (SortBy::Budget, SortOrder::Desc) => query.order(movie::budget.desc()),
        (SortBy::Revenue, SortOrder::Asc) => query.order(movie::revenue.asc()),
        (SortBy::Revenue, SortOrder::Desc) => query.order(movie::revenue.desc()),
    }
}

pub fn find_movies(conn: &DbConnection, search: Option<&str>, sort: Sort) -> Result<Vec<MovieRecord>, Error> {
    let mut query = movie_records();

    if let Some(term) = search {
        query = query.filter(movie::title.ilike(format!("%{}%", term)));
    }

    sorted(query, sort)
        .load(conn)
        .map_err(DBQueryError)
}

pub fn find_one_movie(conn: &DbConnection, id: i32) -> Result<Option<MovieRecord>, Error> {
    movie_records()
        .filter(movie::movie_id.eq(id))
        .first(conn)
        .optional()
        .map_err(DBQueryError)
}

pub fn find_movies_by_genre(conn: &DbConnection, id: i32) -> Result<Vec<MovieRecord>, Error> {
    movie::table
        .inner_join(language::table)
        .inner_join(country::table)
        .inner_join(movie_genres::table)
        .filter(movie_genres::genre_id.eq(id))
        .select(MOVIE_RECORD_COLUMNS)
        .load(conn)
        .map_err(DBQueryError)
}

pub fn find_movies_by_country(conn: &DbConnection, name: &str, sort: Sort) -> Result<Vec<MovieRecord>, Error> {
    let query = movie_records().filter(country::country_name.eq(name.to_string()));

    sorted(query, sort)
        .load(conn)
        .map_err(DBQueryError)
}

pub fn create_movie(conn: &DbConnection, draft: MovieDraft) -> Result<MovieRecord, Error> {
    conn.transaction::<MovieRecord, Error, _>(|| {
        let orig_lang = language_id(conn, &draft.language)?;
        let country_fk = country_id(conn, &draft.country)?;

        let row = NewMovie {
            title: draft.title,
            release_date: draft.release_date,
            score: draft.score,
            overview: draft.overview,
            orig_title: draft.orig_title,
            status: draft.status,
            orig_lang,
            budget: draft.budget,
            revenue: draft.revenue,
            country: country_fk,
        };

        let query = diesel::insert_into(movie::table)
            .values(&row)
            .returning(movie::movie_id);

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        let new_id: i32 = query.get_result(conn)?;

        link_genres(conn, new_id, &draft.genres)?;

        movie_record(conn, new_id)
    })
}

pub fn update_movie(conn: &DbConnection, target: i32, update: MovieUpdate) -> Result<Option<MovieRecord>, Error> {
    conn.transaction::<Option<MovieRecord>, Error, _>(|| {
        let existing: Option<i32> = movie::table
            .select(movie::movie_id)
            .filter(movie::movie_id.eq(target))
            .first(conn)
            .optional()?;

        if existing.is_none() {
            return Ok(None);
        }

        let orig_lang = match &update.language {
            Some(name) => Some(language_id(conn, name)?),
            None => None,
        };
        let country_fk = match &update.country {
            Some(name) => Some(country_id(conn, name)?),
            None => None,
        };

        let changeset = MovieChangeset {
            title: update.title,
            release_date: update.release_date,
            score: update.score,
            overview: update.overview,
            orig_title: update.orig_title,
            status: update.status,
            orig_lang,
            budget: update.budget,
            revenue: update.revenue,
            country: country_fk,
        };

        if changeset.has_changes() {
            let query = diesel::update(movie::table.filter(movie::movie_id.eq(target)))
                .set(&changeset);

            debug!("{}", diesel::debug_query::<Pg, _>(&query));

            query.execute(conn)?;
        }

        if let Some(genres) = &update.genres {
            diesel::delete(movie_genres::table.filter(movie_genres::movie_id.eq(target)))
                .execute(conn)?;

            link_genres(conn, target, genres)?;
        }

        movie_record(conn, target).map(Some)
    })
}

pub fn delete_movie(conn: &DbConnection, target: i32) -> Result<bool, Error> {
    conn.transaction::<bool, Error, _>(|| {
        diesel::delete(movie_genres::table.filter(movie_genres::movie_id.eq(target)))
            .execute(conn)?;

        let query = diesel::delete(movie::table.filter(movie::movie_id.eq(target)));

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        query
            .execute(conn)
            .map_err(DBQueryError)
            .map(|deleted| deleted > 0)
    })
}

fn movie_record(conn: &DbConnection, id: i32) -> Result<MovieRecord, Error> {
    movie_records()
        .filter(movie::movie_id.eq(id))
        .first(conn)
        .map_err(DBQueryError)
}

fn language_id(conn: &DbConnection, name: &str) -> Result<i32, Error> {
    language::table
        .select(language::language_id)
        .filter(language::language_name.eq(name))
        .first(conn)
        .optional()?
        .ok_or_else(|| UnknownLanguage(name.to_string()))
}

fn country_id(conn: &DbConnection, name: &str) -> Result<i32, Error> {
    country::table
        .select(country::country_id)
        .filter(country::country_name.eq(name))
        .first(conn)
        .optional()?
        .ok_or_else(|| UnknownCountry(name.to_string()))
}

fn genre_id(conn: &DbConnection, name: &str) -> Result<i32, Error> {
    genre::table
        .select(genre::genre_id)
        .filter(genre::genre_name.eq(name))
        .first(conn)
        .optional()?
        .ok_or_else(|| UnknownGenre(name.to_string()))
}

fn link_genres(conn: &DbConnection, target: i32, names: &[String]) -> Result<(), Error> {
    for name in names {
        let gid = genre_id(conn, name)?;

        diesel::insert_into(movie_genres::table)
            .values((movie_genres::movie_id.eq(target), movie_genres::genre_id.eq(gid)))
            .execute(conn)?;
    }

    Ok(())
}
