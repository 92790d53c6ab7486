use anyhow::{Result, bail};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, Any, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == "*")
}

/// Build a CORS layer from config.
///
/// # Errors
///
/// Returns an error if `allow_credentials` is `true` while origins, methods or
/// headers contain `"*"` (the CORS protocol forbids credentials with
/// wildcards), or if an origin/method/header cannot be parsed.
pub fn build_cors_layer(cfg: &CorsConfig) -> Result<CorsLayer> {
    let wildcard_origin = is_wildcard(&cfg.allowed_origins);

    if cfg.allow_credentials
        && (wildcard_origin || is_wildcard(&cfg.allowed_methods) || is_wildcard(&cfg.allowed_headers))
    {
        bail!(
            "CORS misconfiguration: '*' cannot be combined with allow_credentials=true; \
             list explicit origins, methods and headers instead"
        );
    }

    if wildcard_origin {
        warn!(
            "CORS is configured with allowed_origins=['*']; any website can make \
             cross-origin requests to the API"
        );
    }

    let mut layer = CorsLayer::new();

    if wildcard_origin {
        layer = layer.allow_origin(Any);
    } else if !cfg.allowed_origins.is_empty() {
        let origins = cfg
            .allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).map_err(|e| anyhow::anyhow!("invalid CORS origin '{o}': {e}"))
            })
            .collect::<Result<Vec<_>>>()?;
        layer = layer.allow_origin(origins);
    }

    if is_wildcard(&cfg.allowed_methods) {
        layer = layer.allow_methods(Any);
    } else if !cfg.allowed_methods.is_empty() {
        let methods = cfg
            .allowed_methods
            .iter()
            .map(|m| {
                m.parse::<Method>()
                    .map_err(|e| anyhow::anyhow!("invalid CORS method '{m}': {e}"))
            })
            .collect::<Result<Vec<_>>>()?;
        layer = layer.allow_methods(methods);
    }

    if is_wildcard(&cfg.allowed_headers) {
        layer = layer.allow_headers(Any);
    } else if cfg.allowed_headers.is_empty() {
        layer = layer.allow_headers(AllowHeaders::mirror_request());
    } else {
        let headers = cfg
            .allowed_headers
            .iter()
            .map(|h| {
                h.parse::<HeaderName>()
                    .map_err(|e| anyhow::anyhow!("invalid CORS header '{h}': {e}"))
            })
            .collect::<Result<Vec<_>>>()?;
        layer = layer.allow_headers(headers);
    }

    if cfg.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    if cfg.max_age_seconds > 0 {
        layer = layer.max_age(std::time::Duration::from_secs(cfg.max_age_seconds));
    }

    Ok(layer)
}
