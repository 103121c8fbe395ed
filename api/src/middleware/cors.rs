//! CORS middleware configuration for cross-origin requests.
//!
//! Development is permissive so a local web client can talk to the API from
//! any port. Everywhere else only the origins listed in `ALLOWED_ORIGINS` are
//! accepted.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use scribe_shared::{Environment, ServerConfig};

/// Creates a CORS middleware instance configured for the given environment.
pub fn create_cors(server: &ServerConfig, environment: Environment) -> Cors {
    if environment.is_development() {
        create_development_cors(server.cors_max_age)
    } else {
        create_restricted_cors(&server.allowed_origins, server.cors_max_age)
    }
}

fn allowed_methods() -> Vec<Method> {
    vec![Method::GET, Method::POST, Method::PUT, Method::OPTIONS]
}

fn create_development_cors(max_age: usize) -> Cors {
    log::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(allowed_methods())
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(max_age)
        .supports_credentials()
}

fn create_restricted_cors(origins: &[String], max_age: usize) -> Cors {
    log::info!("Configuring CORS with {} allowed origin(s)", origins.len());

    let mut cors = Cors::default()
        .allowed_methods(allowed_methods())
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(max_age);

    for origin in origins {
        log::info!("Adding allowed origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    fn server_with_origins(origins: &[&str]) -> ServerConfig {
        let mut server = ServerConfig::default();
        server.allowed_origins = origins.iter().map(|o| o.to_string()).collect();
        server
    }

    async fn preflight_status(cors: Cors, origin: &str) -> StatusCode {
        let app = test::init_service(
            App::new()
                .wrap(cors)
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/")
            .insert_header((header::ORIGIN, origin))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .to_request();

        test::call_service(&app, req).await.status()
    }

    #[actix_web::test]
    async fn test_development_allows_any_origin() {
        let cors = create_cors(&ServerConfig::default(), Environment::Development);
        assert_eq!(preflight_status(cors, "http://localhost:5173").await, StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_production_restricts_origins() {
        let server = server_with_origins(&["https://scribe.io"]);

        let cors = create_cors(&server, Environment::Production);
        assert_eq!(preflight_status(cors, "https://scribe.io").await, StatusCode::OK);

        let cors = create_cors(&server, Environment::Production);
        assert_ne!(preflight_status(cors, "https://evil.example").await, StatusCode::OK);
    }
}
