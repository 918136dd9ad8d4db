use chrono::NaiveDate;
use diesel::{AsChangeset, Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::core::error::ValidationError;
use crate::db::schema::movie;

pub mod action;
pub mod error;

/// Input format for release dates, e.g. `10/22/2021`.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SortBy {
    MovieId,
    Title,
    Score,
    Budget,
    Revenue,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Validated ordering for the list endpoints. Only the five public columns
/// are ever accepted, so the ordering clause can never name anything else.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sort {
    pub by: SortBy,
    pub order: SortOrder,
}

impl Sort {
    pub fn parse(sort_by: Option<&str>, sort_order: Option<&str>) -> Result<Sort, ValidationError> {
        let by = match sort_by.unwrap_or("movie_id") {
            "movie_id" => SortBy::MovieId,
            "title" => SortBy::Title,
            "score" => SortBy::Score,
            "budget" => SortBy::Budget,
            "revenue" => SortBy::Revenue,
            _ => return Err(ValidationError::InvalidSortBy),
        };

        let order = match sort_order.unwrap_or("asc") {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            _ => return Err(ValidationError::InvalidSortOrder),
        };

        Ok(Sort { by, order })
    }
}

/// Public movie record. The serialized keys are part of the API contract;
/// `Original Language` and `Country` carry names resolved through joins,
/// not the stored surrogate keys.
#[derive(Clone, Debug, PartialEq, Serialize, Queryable)]
pub struct MovieRecord {
    #[serde(rename = "Movie ID")]
    pub movie_id: i32,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Release Date")]
    pub release_date: NaiveDate,
    #[serde(rename = "Score")]
    pub score: Option<f64>,
    #[serde(rename = "Overview")]
    pub overview: Option<String>,
    #[serde(rename = "Original Title")]
    pub orig_title: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "Original Language")]
    pub orig_lang: String,
    #[serde(rename = "Budget")]
    pub budget: f64,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    #[serde(rename = "Country")]
    pub country: String,
}

#[derive(Clone, Debug, Insertable)]
#[table_name = "movie"]
pub struct NewMovie {
    pub title: String,
    pub release_date: NaiveDate,
    pub score: Option<f64>,
    pub overview: Option<String>,
    pub orig_title: Option<String>,
    pub status: Option<String>,
    pub orig_lang: i32,
    pub budget: f64,
    pub revenue: f64,
    pub country: i32,
}

/// Columns to touch on update. `None` fields are left alone.
#[derive(Clone, Debug, AsChangeset)]
#[table_name = "movie"]
pub struct MovieChangeset {
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub score: Option<f64>,
    pub overview: Option<String>,
    pub orig_title: Option<String>,
    pub status: Option<String>,
    pub orig_lang: Option<i32>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub country: Option<i32>,
}

impl MovieChangeset {
    /// Diesel rejects an UPDATE with an empty changeset, so a genre-only
    /// patch has to skip the movie row entirely.
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.release_date.is_some()
            || self.score.is_some()
            || self.overview.is_some()
            || self.orig_title.is_some()
            || self.status.is_some()
            || self.orig_lang.is_some()
            || self.budget.is_some()
            || self.revenue.is_some()
            || self.country.is_some()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateMovieParams {
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub overview: Option<String>,
    pub status: Option<String>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub orig_title: Option<String>,
    pub score: Option<f64>,
}

/// Create input that has passed request validation. Language, country and
/// genres are still names at this point; the data access layer resolves
/// them to surrogate keys.
#[derive(Clone, Debug)]
pub struct MovieDraft {
    pub title: String,
    pub release_date: NaiveDate,
    pub genres: Vec<String>,
    pub overview: Option<String>,
    pub status: Option<String>,
    pub budget: f64,
    pub revenue: f64,
    pub country: String,
    pub language: String,
    pub orig_title: Option<String>,
    pub score: Option<f64>,
}

impl CreateMovieParams {
    pub fn validate(self) -> Result<MovieDraft, ValidationError> {
        let title = self.title.filter(|f| !f.is_empty());
        let release_date = self.release_date.filter(|f| !f.is_empty());
        let genre = self.genre.filter(|f| !f.is_empty());
        let country = self.country.filter(|f| !f.is_empty());
        let language = self.language.filter(|f| !f.is_empty());

        let (title, release_date, genre, country, language) =
            match (title, release_date, genre, country, language) {
                (Some(t), Some(r), Some(g), Some(c), Some(l)) => (t, r, g, c, l),
                _ => return Err(ValidationError::MissingRequiredFields),
            };

        let release_date = NaiveDate::parse_from_str(&release_date, DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidReleaseDate)?;

        Ok(MovieDraft {
            title,
            release_date,
            genres: split_genres(&genre),
            overview: self.overview,
            status: self.status,
            budget: self.budget.unwrap_or(0.0),
            revenue: self.revenue.unwrap_or(0.0),
            country,
            language,
            orig_title: self.orig_title,
            score: self.score,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateMovieParams {
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub overview: Option<String>,
    pub status: Option<String>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub orig_title: Option<String>,
    pub score: Option<f64>,
}

/// Update input that has passed request validation. `genres: Some(..)`
/// means the full genre-link set gets replaced.
#[derive(Clone, Debug)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genres: Option<Vec<String>>,
    pub overview: Option<String>,
    pub status: Option<String>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub orig_title: Option<String>,
    pub score: Option<f64>,
}

impl UpdateMovieParams {
    pub fn validate(self) -> Result<MovieUpdate, ValidationError> {
        let nonempty = |f: Option<String>| f.filter(|s| !s.is_empty());

        let title = nonempty(self.title);
        let release_date = nonempty(self.release_date);
        let genre = nonempty(self.genre);
        let overview = nonempty(self.overview);
        let status = nonempty(self.status);
        let country = nonempty(self.country);
        let language = nonempty(self.language);
        let orig_title = nonempty(self.orig_title);

        let any_field = title.is_some()
            || release_date.is_some()
            || genre.is_some()
            || overview.is_some()
            || status.is_some()
            || country.is_some()
            || language.is_some()
            || orig_title.is_some()
            || self.budget.map_or(false, |b| b != 0.0)
            || self.revenue.map_or(false, |r| r != 0.0)
            || self.score.map_or(false, |s| s != 0.0);

        if !any_field {
            return Err(ValidationError::NoFieldsToUpdate);
        }

        let release_date = match release_date {
            Some(raw) => Some(
                NaiveDate::parse_from_str(&raw, DATE_FORMAT)
                    .map_err(|_| ValidationError::InvalidReleaseDate)?,
            ),
            None => None,
        };

        Ok(MovieUpdate {
            title,
            release_date,
            genres: genre.map(|g| split_genres(&g)),
            overview,
            status,
            budget: self.budget,
            revenue: self.revenue,
            country,
            language,
            orig_title,
            score: self.score,
        })
    }
}

fn split_genres(raw: &str) -> Vec<String> {
    raw.split(',').map(|g| g.trim().to_string()).collect()
}
