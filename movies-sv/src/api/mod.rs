use actix_web::error::BlockingError;
use actix_web::web::Json;
use actix_web::{delete, get, patch, post, web, Error, HttpResponse, Responder};
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::action;
use crate::core::error::ValidationError;
use crate::core::{CreateMovieParams, MovieRecord, Sort, UpdateMovieParams};
use crate::db::DbConnection;
use crate::db::DbConnectionPool;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: MovieRecord,
}

fn bad_request(e: ValidationError) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorBody { error: e.to_string() })
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody { error: message.to_string() })
}

fn blocking_error(e: BlockingError<crate::core::error::Error>) -> HttpResponse {
    error!("{}", e);
    match e {
        BlockingError::Error(e) => HttpResponse::InternalServerError()
            .json(ErrorBody { error: e.to_string() }),
        BlockingError::Canceled => HttpResponse::InternalServerError().finish(),
    }
}

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to the Movie API",
        "endpoints": {
            "GET /movies": "list movies; query: search, sort_by, sort_order",
            "POST /movies": "create a movie",
            "GET /movies/{id}": "fetch a movie",
            "PATCH /movies/{id}": "partially update a movie",
            "DELETE /movies/{id}": "delete a movie",
            "GET /countries/{code}": "movies for a country; query: sort_by, sort_order",
            "GET /genres/{id}": "movies for a genre",
        }
    }))
}

#[derive(Clone, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[get("/movies")]
pub async fn get_movies(
    pool: web::Data<DbConnectionPool>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, Error> {
    let q = query.into_inner();

    let sort = match Sort::parse(q.sort_by.as_deref(), q.sort_order.as_deref()) {
        Ok(sort) => sort,
        Err(e) => return Ok(bad_request(e)),
    };

    let conn: DbConnection = pool.get()
        .expect("couldn't get db connection from pool");

    let movies = web::block(move || action::find_movies(&conn, q.search.as_deref(), sort))
        .await
        .map_err(blocking_error)?;

    Ok(HttpResponse::Ok().json(movies))
}

#[post("/movies")]
pub async fn post_movie(
    pool: web::Data<DbConnectionPool>,
    req: Json<CreateMovieParams>,
) -> Result<HttpResponse, Error> {
    let draft = match req.into_inner().validate() {
        Ok(draft) => draft,
        Err(e) => return Ok(bad_request(e)),
    };

    let conn: DbConnection = pool.get()
        .expect("couldn't get db connection from pool");

    let movie = web::block(move || action::create_movie(&conn, draft))
        .await
        .map_err(blocking_error)?;

    Ok(HttpResponse::Created().json(MovieResponse { success: true, movie }))
}

#[get("/movies/{movie_id}")]
pub async fn get_movie(
    pool: web::Data<DbConnectionPool>,
    movie_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()
        .expect("couldn't get db connection from pool");

    let maybe = web::block(move || action::find_one_movie(&conn, movie_id.into_inner()))
        .await
        .map_err(blocking_error)?;

    match maybe {
        None => Ok(not_found("Movie not found")),
        Some(movie) => Ok(HttpResponse::Ok().json(movie)),
    }
}

#[patch("/movies/{movie_id}")]
pub async fn patch_movie(
    pool: web::Data<DbConnectionPool>,
    movie_id: web::Path<i32>,
    req: Json<UpdateMovieParams>,
) -> Result<HttpResponse, Error> {
    let update = match req.into_inner().validate() {
        Ok(update) => update,
        Err(e) => return Ok(bad_request(e)),
    };

    let conn: DbConnection = pool.get()
        .expect("couldn't get db connection from pool");

    let maybe = web::block(move || action::update_movie(&conn, movie_id.into_inner(), update))
        .await
        .map_err(blocking_error)?;

    match maybe {
        None => Ok(not_found("Movie not found")),
        Some(movie) => Ok(HttpResponse::Ok().json(MovieResponse { success: true, movie })),
    }
}

#[delete("/movies/{movie_id}")]
pub async fn delete_movie(
    pool: web::Data<DbConnectionPool>,
    movie_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()
        .expect("couldn't get db connection from pool");

    let was_present = web::block(move || action::delete_movie(&conn, movie_id.into_inner()))
        .await
        .map_err(blocking_error)?;

    if was_present {
        Ok(HttpResponse::Ok().json(json!({"message": "Movie deleted"})))
    } else {
        Ok(not_found("Movie could not be deleted"))
    }
}

#[derive(Clone, Deserialize)]
pub struct SortQuery {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[get("/countries/{country_code}")]
pub async fn get_movies_by_country(
    pool: web::Data<DbConnectionPool>,
    country_code: web::Path<String>,
    query: web::Query<SortQuery>,
) -> Result<HttpResponse, Error> {
    let q = query.into_inner();

    let sort = match Sort::parse(q.sort_by.as_deref(), q.sort_order.as_deref()) {
        Ok(sort) => sort,
        Err(e) => return Ok(bad_request(e)),
    };

    let conn: DbConnection = pool.get()
        .expect("couldn't get db connection from pool");

    let movies = web::block(move || action::find_movies_by_country(&conn, &country_code.into_inner(), sort))
        .await
        .map_err(blocking_error)?;

    if movies.is_empty() {
        Ok(not_found("No movies found for this country"))
    } else {
        Ok(HttpResponse::Ok().json(movies))
    }
}

#[get("/genres/{genre_id}")]
pub async fn get_movies_by_genre(
    pool: web::Data<DbConnectionPool>,
    genre_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let conn: DbConnection = pool.get()
        .expect("couldn't get db connection from pool");

    let movies = web::block(move || action::find_movies_by_genre(&conn, genre_id.into_inner()))
        .await
        .map_err(blocking_error)?;

    if movies.is_empty() {
        Ok(not_found("No movies found for this genre"))
    } else {
        Ok(HttpResponse::Ok().json(movies))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use diesel::r2d2::ConnectionManager;
    use diesel::PgConnection;
    use serde_json::Value;

    use super::*;

    // validation runs before the pool is touched, so an unchecked pool
    // pointing nowhere is enough for these tests
    fn test_pool() -> web::Data<DbConnectionPool> {
        let mgr = ConnectionManager::<PgConnection>::new("postgres://localhost/unreachable");
        web::Data::new(r2d2::Pool::builder().build_unchecked(mgr))
    }

    async fn body_json(resp: actix_web::dev::ServiceResponse) -> Value {
        let body = test::read_body(resp).await;
        serde_json::from_slice(&body).unwrap()
    }

    #[actix_rt::test]
    async fn index_lists_endpoints() {
        let mut app = test::init_service(App::new().service(index)).await;

        let resp = test::call_service(&mut app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), 200);

        let json = body_json(resp).await;
        assert_eq!(json["message"], "Welcome to the Movie API");
        assert!(json["endpoints"].is_object());
    }

    #[actix_rt::test]
    async fn get_movies_rejects_invalid_sort_by() {
        let mut app = test::init_service(
            App::new().app_data(test_pool()).service(get_movies),
        ).await;

        let req = test::TestRequest::get().uri("/movies?sort_by=foo").to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), 400);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "Invalid sort_by parameter");
    }

    #[actix_rt::test]
    async fn get_movies_rejects_invalid_sort_order() {
        let mut app = test::init_service(
            App::new().app_data(test_pool()).service(get_movies),
        ).await;

        let req = test::TestRequest::get()
            .uri("/movies?sort_by=score&sort_order=sideways")
            .to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), 400);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "Invalid sort_order parameter");
    }

    #[actix_rt::test]
    async fn post_movie_rejects_missing_fields() {
        let mut app = test::init_service(
            App::new().app_data(test_pool()).service(post_movie),
        ).await;

        let req = test::TestRequest::post()
            .uri("/movies")
            .set_json(&serde_json::json!({"title": "Dune"}))
            .to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), 400);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "Missing required fields");
    }

    #[actix_rt::test]
    async fn post_movie_rejects_bad_release_date() {
        let mut app = test::init_service(
            App::new().app_data(test_pool()).service(post_movie),
        ).await;

        let req = test::TestRequest::post()
            .uri("/movies")
            .set_json(&serde_json::json!({
                "title": "Dune",
                "release_date": "2021-10-22",
                "genre": "Sci-Fi",
                "country": "United States",
                "language": "English",
            }))
            .to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), 400);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "Invalid release_date format. Please use MM/DD/YYYY");
    }

    #[actix_rt::test]
    async fn patch_movie_rejects_empty_update() {
        let mut app = test::init_service(
            App::new().app_data(test_pool()).service(patch_movie),
        ).await;

        let req = test::TestRequest::patch()
            .uri("/movies/1")
            .set_json(&serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), 400);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "No fields to update");
    }

    #[actix_rt::test]
    async fn country_endpoint_rejects_invalid_sort() {
        let mut app = test::init_service(
            App::new().app_data(test_pool()).service(get_movies_by_country),
        ).await;

        let req = test::TestRequest::get()
            .uri("/countries/United%20States?sort_by=drop%20table")
            .to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), 400);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "Invalid sort_by parameter");
    }
}
