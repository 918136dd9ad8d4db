use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CatalogError::UnexpectedStatusCode;

pub struct CatalogConfig {
    pub url: String,
}

/// Movie record as the server returns it. Keys are the API's capitalized
/// names; language and country are names, not surrogate keys.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
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

/// Create body. `release_date` uses `MM/DD/YYYY`; `genre` is a
/// comma-separated list of existing genre names.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub release_date: String,
    pub genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    pub country: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: Movie,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("error calling server: {0}")]
    ClientError(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    UnexpectedStatusCode(StatusCode),
}

pub async fn get_movie(
    cfg: &CatalogConfig,
    id: i32,
) -> Result<Option<Movie>, CatalogError> {
    let res = reqwest::Client::new()
        .get(format!("{}/movies/{}", cfg.url, id))
        .header("Accept", "application/json")
        .send()
        .await?;

    match res.status() {
        StatusCode::OK => {
            let m: Movie = res.json().await?;
            Ok(Some(m))
        }
        StatusCode::NOT_FOUND => Ok(None),
        unexpected => Err(UnexpectedStatusCode(unexpected)),
    }
}

pub async fn create_movie(
    cfg: &CatalogConfig,
    req: CreateMovieRequest,
) -> Result<Movie, CatalogError> {
    let res = reqwest::Client::new()
        .post(format!("{}/movies", cfg.url))
        .json(&req)
        .header("Accept", "application/json")
        .send()
        .await?;

    match res.status() {
        StatusCode::CREATED => {
            let body: MovieResponse = res.json().await?;
            Ok(body.movie)
        }
        unexpected => Err(UnexpectedStatusCode(unexpected)),
    }
}

pub async fn delete_movie(
    cfg: &CatalogConfig,
    id: i32,
) -> Result<bool, CatalogError> {
    let res = reqwest::Client::new()
        .delete(format!("{}/movies/{}", cfg.url, id))
        .send()
        .await?;

    match res.status() {
        StatusCode::OK => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        unexpected => Err(UnexpectedStatusCode(unexpected)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_round_trips_public_keys() {
        let json = serde_json::json!({
            "Movie ID": 7,
            "Title": "Dune",
            "Release Date": "2021-10-22",
            "Score": 78.0,
            "Overview": null,
            "Original Title": null,
            "Status": "Released",
            "Original Language": "English",
            "Budget": 165000000.0,
            "Revenue": 434000000.0,
            "Country": "United States",
        });

        let movie: Movie = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(movie.movie_id, 7);
        assert_eq!(movie.orig_lang, "English");
        assert_eq!(movie.country, "United States");

        assert_eq!(serde_json::to_value(&movie).unwrap(), json);
    }

    #[test]
    fn create_request_omits_unset_fields() {
        let req = CreateMovieRequest {
            title: "Dune".to_string(),
            release_date: "10/22/2021".to_string(),
            genre: "Sci-Fi, Drama".to_string(),
            overview: None,
            status: None,
            budget: Some(165000000.0),
            revenue: Some(434000000.0),
            country: "United States".to_string(),
            language: "English".to_string(),
            orig_title: None,
            score: None,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["release_date"], "10/22/2021");
        assert!(json.get("overview").is_none());
        assert!(json.get("score").is_none());
    }
}
