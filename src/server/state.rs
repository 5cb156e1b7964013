use axum::extract::FromRef;

use crate::movies::MovieService;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedMovieService = Arc<MovieService>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub movie_service: GuardedMovieService,
}

impl FromRef<ServerState> for GuardedMovieService {
    fn from_ref(input: &ServerState) -> Self {
        input.movie_service.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
