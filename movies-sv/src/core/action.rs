use log::{debug, info};

use crate::core::error::Error;
use crate::core::{MovieDraft, MovieRecord, MovieUpdate, Sort};
use crate::db;
use crate::db::DbConnection;

pub fn create_movie(conn: &DbConnection, draft: MovieDraft) -> Result<MovieRecord, Error> {
    info!("creating movie {:?}", draft);
    db::create_movie(conn, draft)
}

pub fn update_movie(conn: &DbConnection, id: i32, update: MovieUpdate) -> Result<Option<MovieRecord>, Error> {
    info!("updating movie movie_id={} {:?}", id, update);
    db::update_movie(conn, id, update)
}

pub fn delete_movie(conn: &DbConnection, id: i32) -> Result<bool, Error> {
    debug!("deleting movie movie_id={}", id);
    let was_present = db::delete_movie(conn, id)?;
    if was_present {
        info!("deleted movie movie_id={}", id);
    }

    Ok(was_present)
}

pub fn find_one_movie(conn: &DbConnection, id: i32) -> Result<Option<MovieRecord>, Error> {
    info!("finding movie movie_id={}", id);
    db::find_one_movie(conn, id)
}

pub fn find_movies(conn: &DbConnection, search: Option<&str>, sort: Sort) -> Result<Vec<MovieRecord>, Error> {
    info!("finding movies search={:?} sort={:?}", search, sort);
    db::find_movies(conn, search, sort)
}

pub fn find_movies_by_genre(conn: &DbConnection, genre_id: i32) -> Result<Vec<MovieRecord>, Error> {
    info!("finding movies genre_id={}", genre_id);
    db::find_movies_by_genre(conn, genre_id)
}

pub fn find_movies_by_country(conn: &DbConnection, country_name: &str, sort: Sort) -> Result<Vec<MovieRecord>, Error> {
    info!("finding movies country={} sort={:?}", country_name, sort);
    db::find_movies_by_country(conn, country_name, sort)
}
