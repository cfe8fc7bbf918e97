//! Sitemap endpoint.
//!
//! Renders a static urlset from the product and collection handles the
//! commerce platform reports.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::errors::AppError;
use crate::AppState;

/// GET /sitemap.xml - Sitemap of the storefront's public pages.
pub async fn sitemap(State(state): State<AppState>) -> Result<Response, AppError> {
    let products = state.commerce.list_products().await?;
    let collections = state.commerce.list_collections().await?;

    let base = state.config.public_base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    push_url(&mut xml, &format!("{base}/"), None);
    for collection in &collections {
        push_url(
            &mut xml,
            &format!("{base}/collections/{}", collection.handle),
            collection.updated_at.as_deref(),
        );
    }
    for product in &products {
        push_url(
            &mut xml,
            &format!("{base}/products/{}", product.handle),
            product.updated_at.as_deref(),
        );
    }
    xml.push_str("</urlset>\n");

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        xml,
    )
        .into_response())
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<&str>) {
    xml.push_str("  <url><loc>");
    xml.push_str(&escape_xml(loc));
    xml.push_str("</loc>");
    if let Some(lastmod) = lastmod {
        xml.push_str("<lastmod>");
        xml.push_str(&escape_xml(lastmod));
        xml.push_str("</lastmod>");
    }
    xml.push_str("</url>\n");
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
