//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use common::token::Identity;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::auth_gate,
    models::{
        Movie, MovieListResponse, MovieQuery, NewMovie, NewPerson, Person, PersonKind,
        UpdateMovie,
    },
    query::{self, MovieFilter},
    repositories::PersonStore,
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/createnewmovie", post(create_movie))
        .route("/api/movies/:id", put(update_movie).delete(delete_movie))
        .route("/api/actors", post(create_actor))
        .route("/api/producers", post(create_producer))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_gate));

    Router::new()
        .route("/health", get(health_check))
        .route("/movies", get(list_movies))
        .route("/moviedetails/:id", get(get_movie))
        .route("/api/user-movies/:userid", get(list_user_movies))
        .route("/api/actors/:id", get(get_actor))
        .route("/api/user-actors/:userid", get(list_user_actors))
        .route("/api/producers/:id", get(get_producer))
        .route("/api/user-producers/:userid", get(list_user_producers))
        .merge(protected_routes)
        .with_state(state)
}

// An unparsable record id cannot name a stored record.
fn record_id(path: Result<Path<Uuid>, PathRejection>, what: &str) -> ApiResult<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound(format!("{} not found", what)))
}

fn owner_id(path: Result<Path<Uuid>, PathRejection>) -> ApiResult<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::BadRequest("Invalid user id".to_string()))
}

fn movie_not_found() -> ApiError {
    ApiError::NotFound("Movie not found".to_string())
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Create a movie owned by the authenticated user
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewMovie>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Movie>)> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let movie = payload
        .into_movie(identity.id)
        .map_err(ApiError::BadRequest)?;

    let movie = state.movie_store.create(movie).await?;
    info!("User {} created movie {}", identity.id, movie.id);

    Ok((StatusCode::CREATED, Json(movie)))
}

/// List movies with free-text search and pagination
pub async fn list_movies(
    State(state): State<AppState>,
    params: Result<Query<MovieQuery>, QueryRejection>,
) -> ApiResult<Json<MovieListResponse>> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let filter = MovieFilter::build(params.query.as_deref());
    let pagination = query::paginate(params.page, params.limit, state.max_page_limit);
    info!(
        "Listing movies: search={:?} page={} limit={}",
        filter.search(),
        pagination.page,
        pagination.limit
    );

    let page = query::list(state.movie_store.as_ref(), &filter, pagination).await?;

    Ok(Json(MovieListResponse {
        data: page.items,
        current_page: pagination.page,
        total_pages: query::total_pages(page.total, pagination.limit),
        total_results: page.total,
    }))
}

/// Get a movie by ID
pub async fn get_movie(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Movie>> {
    let id = record_id(path, "Movie")?;

    let movie = state
        .movie_store
        .find_by_id(id)
        .await?
        .ok_or_else(movie_not_found)?;

    Ok(Json(movie))
}

/// List the movies created by a user
pub async fn list_user_movies(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Vec<Movie>>> {
    let owner = owner_id(path)?;
    let movies = state.movie_store.find_by_owner(owner).await?;

    Ok(Json(movies))
}

/// Update the supplied fields of a movie
pub async fn update_movie(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<UpdateMovie>, JsonRejection>,
) -> ApiResult<Json<Movie>> {
    let id = record_id(path, "Movie")?;
    let Json(changes) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    changes.validate().map_err(ApiError::BadRequest)?;

    let movie = state
        .movie_store
        .update(id, changes)
        .await?
        .ok_or_else(movie_not_found)?;
    info!("User {} updated movie {}", identity.id, id);

    Ok(Json(movie))
}

/// Delete a movie
pub async fn delete_movie(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl IntoResponse> {
    let id = record_id(path, "Movie")?;

    if !state.movie_store.delete(id).await? {
        return Err(movie_not_found());
    }
    info!("User {} deleted movie {}", identity.id, id);

    Ok(Json(json!({"message": "Movie deleted successfully"})))
}

async fn create_person(
    store: &dyn PersonStore,
    kind: PersonKind,
    identity: Identity,
    payload: Result<Json<NewPerson>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Person>)> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let person = payload
        .into_person(identity.id)
        .map_err(ApiError::BadRequest)?;

    let person = store.create(person).await?;
    info!("User {} created {} {}", identity.id, kind, person.id);

    Ok((StatusCode::CREATED, Json(person)))
}

async fn get_person(
    store: &dyn PersonStore,
    kind: PersonKind,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Person>> {
    let what = kind.to_string();
    let id = record_id(path, &what)?;

    let person = store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", what)))?;

    Ok(Json(person))
}

/// Create an actor owned by the authenticated user
pub async fn create_actor(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewPerson>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Person>)> {
    create_person(state.actor_store.as_ref(), PersonKind::Actor, identity, payload).await
}

/// Get an actor by ID
pub async fn get_actor(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Person>> {
    get_person(state.actor_store.as_ref(), PersonKind::Actor, path).await
}

/// List the actors created by a user
pub async fn list_user_actors(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Vec<Person>>> {
    let owner = owner_id(path)?;
    Ok(Json(state.actor_store.find_by_owner(owner).await?))
}

/// Create a producer owned by the authenticated user
pub async fn create_producer(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewPerson>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Person>)> {
    create_person(
        state.producer_store.as_ref(),
        PersonKind::Producer,
        identity,
        payload,
    )
    .await
}

/// Get a producer by ID
pub async fn get_producer(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Person>> {
    get_person(state.producer_store.as_ref(), PersonKind::Producer, path).await
}

/// List the producers created by a user
pub async fn list_user_producers(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Vec<Person>>> {
    let owner = owner_id(path)?;
    Ok(Json(state.producer_store.find_by_owner(owner).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MemoryMovieRepository, MemoryPersonRepository, MovieStore};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, Response, header},
    };
    use common::token::{TokenConfig, TokenService};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        movies: Arc<MemoryMovieRepository>,
        tokens: TokenService,
    }

    fn test_app() -> TestApp {
        let movies = Arc::new(MemoryMovieRepository::new());
        let tokens = TokenService::new(&TokenConfig::new("api-test-secret").unwrap());
        let state = AppState {
            movie_store: movies.clone(),
            actor_store: Arc::new(MemoryPersonRepository::new()),
            producer_store: Arc::new(MemoryPersonRepository::new()),
            token_service: tokens.clone(),
            max_page_limit: 100,
        };

        TestApp {
            router: create_router(state),
            movies,
            tokens,
        }
    }

    fn identity(username: &str) -> Identity {
        Identity {
            email: format!("{}@example.com", username),
            id: Uuid::new_v4(),
            username: username.to_string(),
        }
    }

    impl TestApp {
        fn cookie_for(&self, identity: &Identity) -> String {
            format!("token={}", self.tokens.issue(identity).unwrap())
        }

        async fn send(&self, request: Request<Body>) -> Response<Body> {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn seed(&self, title: &str, owner: Uuid) -> Movie {
            let movie = NewMovie {
                title: Some(title.to_string()),
                ..Default::default()
            }
            .into_movie(owner)
            .unwrap();
            self.movies.create(movie).await.unwrap()
        }
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn send_json(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_movies_second_page() {
        let app = test_app();
        let owner = Uuid::new_v4();
        for i in 0..15 {
            app.seed(&format!("Film {}", i), owner).await;
        }

        let response = app.send(get("/movies?page=2&limit=10")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
        assert_eq!(body["data"][0]["title"], "Film 10");
        assert_eq!(body["currentPage"], 2);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["totalResults"], 15);
    }

    #[tokio::test]
    async fn test_list_movies_defaults_and_search() {
        let app = test_app();
        let owner = Uuid::new_v4();
        for title in ["Acme Returns", "Heat", "Collateral", "The ACME Files"] {
            app.seed(title, owner).await;
        }

        let body = json_body(app.send(get("/movies")).await).await;
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["totalResults"], 4);
        assert_eq!(body["totalPages"], 1);

        let body = json_body(app.send(get("/movies?query=acme")).await).await;
        assert_eq!(body["totalResults"], 2);
        let titles: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Acme Returns", "The ACME Files"]);

        let body = json_body(app.send(get("/movies?query=nothing-like-this")).await).await;
        assert_eq!(body["totalResults"], 0);
        assert_eq!(body["totalPages"], 0);
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_movies_rejects_malformed_paging() {
        let app = test_app();
        let response = app.send(get("/movies?page=abc")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["status"], "ERROR");
    }

    #[tokio::test]
    async fn test_create_movie_requires_token() {
        let app = test_app();
        let movie = json!({"title": "Heat"});

        let response = app
            .send(send_json("POST", "/createnewmovie", None, movie.clone()))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .send(send_json(
                "POST",
                "/createnewmovie",
                Some("token="),
                movie.clone(),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .send(send_json(
                "POST",
                "/createnewmovie",
                Some("token=not-a-token"),
                movie.clone(),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let expired = app.tokens.issue_at(&identity("ada"), 1_000_000).unwrap();
        let response = app
            .send(send_json(
                "POST",
                "/createnewmovie",
                Some(&format!("token={}", expired)),
                movie,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = json_body(app.send(get("/movies")).await).await;
        assert_eq!(body["totalResults"], 0);
    }

    #[tokio::test]
    async fn test_create_movie_owned_by_caller() {
        let app = test_app();
        let ada = identity("ada");
        let cookie = app.cookie_for(&ada);

        let response = app
            .send(send_json(
                "POST",
                "/createnewmovie",
                Some(&cookie),
                json!({
                    "title": "Heat",
                    "genre": "Crime",
                    "releaseDate": "1995-12-15",
                    "vote": 8.3,
                    "userId": Uuid::new_v4(),
                }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["title"], "Heat");
        assert_eq!(body["userId"], ada.id.to_string());

        let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
        let stored = app.movies.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.user_id, ada.id);
        assert_eq!(stored.genre.as_deref(), Some("Crime"));
    }

    #[tokio::test]
    async fn test_create_accepts_timestamp_dates() {
        let app = test_app();
        let cookie = app.cookie_for(&identity("ada"));

        let response = app
            .send(send_json(
                "POST",
                "/createnewmovie",
                Some(&cookie),
                json!({"title": "Heat", "releaseDate": "1995-12-15T00:00:00.000Z"}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["releaseDate"], "1995-12-15");

        let response = app
            .send(send_json(
                "POST",
                "/api/actors",
                Some(&cookie),
                json!({"name": "Val Kilmer", "dob": "1959-12-31T00:00:00.000Z"}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["dob"], "1959-12-31");

        let response = app
            .send(send_json(
                "POST",
                "/createnewmovie",
                Some(&cookie),
                json!({"title": "Heat", "releaseDate": "next tuesday"}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_movie_rejects_invalid_payload() {
        let app = test_app();
        let cookie = app.cookie_for(&identity("ada"));

        let response = app
            .send(send_json(
                "POST",
                "/createnewmovie",
                Some(&cookie),
                json!({"genre": "Crime"}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .send(send_json(
                "POST",
                "/createnewmovie",
                Some(&cookie),
                json!({"title": "Heat", "vote": 11}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let malformed = Request::builder()
            .method("POST")
            .uri("/createnewmovie")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from("{\"title\":"))
            .unwrap();
        assert_eq!(app.send(malformed).await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_movie() {
        let app = test_app();
        let movie = app.seed("Thief", Uuid::new_v4()).await;

        let response = app.send(get(&format!("/moviedetails/{}", movie.id))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["title"], "Thief");

        let response = app
            .send(get(&format!("/moviedetails/{}", Uuid::new_v4())))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "Movie not found");

        let response = app.send(get("/moviedetails/not-a-uuid")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_user_movies() {
        let app = test_app();
        let alice = Uuid::new_v4();
        app.seed("Alien", alice).await;
        app.seed("Aliens", alice).await;
        app.seed("Brazil", Uuid::new_v4()).await;

        let body = json_body(app.send(get(&format!("/api/user-movies/{}", alice))).await).await;
        let movies = body.as_array().unwrap();
        assert_eq!(movies.len(), 2);
        assert!(movies.iter().all(|m| m["userId"] == alice.to_string()));

        let body = json_body(
            app.send(get(&format!("/api/user-movies/{}", Uuid::new_v4())))
                .await,
        )
        .await;
        assert!(body.as_array().unwrap().is_empty());

        let response = app.send(get("/api/user-movies/42")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_movie() {
        let app = test_app();
        let ada = identity("ada");
        let cookie = app.cookie_for(&ada);
        let movie = app.seed("Heat", ada.id).await;
        let uri = format!("/api/movies/{}", movie.id);

        let response = app
            .send(send_json("PUT", &uri, None, json!({"genre": "Crime"})))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .send(send_json("PUT", &uri, Some(&cookie), json!({"genre": "Crime"})))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["genre"], "Crime");
        assert_eq!(body["title"], "Heat");

        let stored = app.movies.find_by_id(movie.id).await.unwrap().unwrap();
        assert_eq!(stored.genre.as_deref(), Some("Crime"));

        let response = app
            .send(send_json("PUT", &uri, Some(&cookie), json!({"title": ""})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .send(send_json(
                "PUT",
                &format!("/api/movies/{}", Uuid::new_v4()),
                Some(&cookie),
                json!({"genre": "Crime"}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_movie() {
        let app = test_app();
        let ada = identity("ada");
        let cookie = app.cookie_for(&ada);
        let movie = app.seed("Heat", ada.id).await;

        let delete = |uri: String| {
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap()
        };

        let response = app
            .send(delete(format!("/api/movies/{}", Uuid::new_v4())))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.send(delete(format!("/api/movies/{}", movie.id))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["message"],
            "Movie deleted successfully"
        );

        let response = app.send(get(&format!("/moviedetails/{}", movie.id))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.send(delete(format!("/api/movies/{}", movie.id))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_actor_lifecycle() {
        let app = test_app();
        let ada = identity("ada");
        let cookie = app.cookie_for(&ada);

        let response = app
            .send(send_json("POST", "/api/actors", None, json!({"name": "Val Kilmer"})))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .send(send_json(
                "POST",
                "/api/actors",
                Some(&cookie),
                json!({"name": "Val Kilmer", "gender": "Male", "dob": "1959-12-31"}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let actor = json_body(response).await;
        assert_eq!(actor["userId"], ada.id.to_string());
        assert_eq!(actor["gender"], "Male");
        let id = actor["id"].as_str().unwrap().to_string();

        let response = app.send(get(&format!("/api/actors/{}", id))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["name"], "Val Kilmer");

        // Actors and producers are separate collections
        let response = app.send(get(&format!("/api/producers/{}", id))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "Producer not found");

        let body = json_body(app.send(get(&format!("/api/user-actors/{}", ada.id))).await).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let body =
            json_body(app.send(get(&format!("/api/user-producers/{}", ada.id))).await).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_producer_rejects_invalid_payload() {
        let app = test_app();
        let cookie = app.cookie_for(&identity("ada"));

        let response = app
            .send(send_json(
                "POST",
                "/api/producers",
                Some(&cookie),
                json!({"name": "Art Linson", "gender": "Unknown"}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .send(send_json("POST", "/api/producers", Some(&cookie), json!({"name": " "})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .send(send_json(
                "POST",
                "/api/producers",
                Some(&cookie),
                json!({"name": "Art Linson"}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app();
        let response = app.send(get("/health")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["service"], "api-service");
    }
}
