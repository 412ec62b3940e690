use relay_config::{CorsConfig, Origins};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer from configuration
///
/// Methods and headers are always allowed. With credentials enabled,
/// wildcards are not permitted by the CORS protocol, so the request's own
/// origin, method and headers are mirrored back instead.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    layer = match (&config.origins, config.credentials) {
        (Origins::Any, false) => layer.allow_origin(AllowOrigin::any()),
        (Origins::Any, true) => layer.allow_origin(AllowOrigin::mirror_request()),
        (Origins::List(origins), _) => {
            let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            layer.allow_origin(origins)
        }
    };

    layer = if config.credentials {
        layer
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        layer.allow_methods(AllowMethods::any()).allow_headers(AllowHeaders::any())
    };

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}
