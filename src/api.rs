//! JSON read API over the persisted store.
//!
//! Stateless CRUD reads only; no extraction logic lives here. A scraper run
//! is the single writer, this server and any number of curl users are the
//! readers.

use crate::amazon::models::Product;
use crate::store::{Store, StoreStats};
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize)]
struct ProductsResponse {
    success: bool,
    count: usize,
    products: Vec<Product>,
}

#[derive(Serialize)]
struct ProductResponse {
    success: bool,
    product: Product,
}

#[derive(Serialize)]
struct StatsResponse {
    success: bool,
    stats: StoreStats,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

fn error_body(error: impl Into<String>) -> ErrorResponse {
    ErrorResponse { success: false, error: error.into() }
}

#[get("/api/products")]
async fn get_products(store: web::Data<Store>) -> impl Responder {
    match store.get_all().await {
        Ok(products) => HttpResponse::Ok().json(ProductsResponse {
            success: true,
            count: products.len(),
            products,
        }),
        Err(e) => {
            warn!("failed to read products: {e}");
            HttpResponse::InternalServerError().json(error_body(e.to_string()))
        }
    }
}

#[get("/api/products/{asin}")]
async fn get_product(store: web::Data<Store>, path: web::Path<String>) -> impl Responder {
    let asin = path.into_inner();
    match store.get(&asin).await {
        Ok(Some(product)) => HttpResponse::Ok().json(ProductResponse { success: true, product }),
        Ok(None) => HttpResponse::NotFound().json(error_body("Product not found")),
        Err(e) => {
            warn!(asin, "failed to read product: {e}");
            HttpResponse::InternalServerError().json(error_body(e.to_string()))
        }
    }
}

#[get("/api/stats")]
async fn get_stats(store: web::Data<Store>) -> impl Responder {
    match store.stats().await {
        Ok(stats) => HttpResponse::Ok().json(StatsResponse { success: true, stats }),
        Err(e) => {
            warn!("failed to compute stats: {e}");
            HttpResponse::InternalServerError().json(error_body(e.to_string()))
        }
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "amz-bestsellers API",
    }))
}

/// Binds the read API on `0.0.0.0:port` and serves until shutdown.
pub async fn serve(store: Store, port: u16, enable_tunnel: bool) -> std::io::Result<()> {
    if enable_tunnel {
        // Tunnel publication is operator tooling outside this binary
        warn!("enable_tunnel is set but no tunnel provider is built in; serving locally only");
    }

    info!("Read API listening on 0.0.0.0:{}", port);

    let data = web::Data::new(store);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .service(get_products)
            .service(get_product)
            .service(get_stats)
            .service(health)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web::Data};
    use chrono::Utc;

    fn make_product(asin: &str, rank: u8, price: f64, rating: Option<f32>) -> Product {
        Product {
            asin: asin.to_string(),
            title: format!("Product {asin}"),
            rank,
            price,
            currency: "$".to_string(),
            list_price: None,
            discount_percent: None,
            rating,
            reviews_count: Some(5),
            is_prime: rank == 1,
            best_sellers_rank: None,
            bullet_points: Vec::new(),
            main_image_url: None,
            scraped_at: Utc::now(),
        }
    }

    macro_rules! make_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(Data::new($store))
                    .service(get_products)
                    .service(get_product)
                    .service(get_stats)
                    .service(health),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_get_products_ordered_by_rank() {
        let store = Store::in_memory().await.unwrap();
        store.upsert(&make_product("B002", 2, 20.0, None)).await.unwrap();
        store.upsert(&make_product("B001", 1, 10.0, Some(4.0))).await.unwrap();

        let app = make_app!(store);
        let req = test::TestRequest::get().uri("/api/products").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 2);
        assert_eq!(body["products"][0]["asin"], "B001");
        assert_eq!(body["products"][1]["asin"], "B002");
        assert!(body["products"][0]["scraped_at"].is_string());
    }

    #[actix_web::test]
    async fn test_get_single_product() {
        let store = Store::in_memory().await.unwrap();
        store.upsert(&make_product("B0TEST0001", 1, 19.99, Some(4.5))).await.unwrap();

        let app = make_app!(store);
        let req = test::TestRequest::get().uri("/api/products/B0TEST0001").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["product"]["asin"], "B0TEST0001");
        assert_eq!(body["product"]["price"], 19.99);
    }

    #[actix_web::test]
    async fn test_get_product_not_found() {
        let store = Store::in_memory().await.unwrap();

        let app = make_app!(store);
        let req = test::TestRequest::get().uri("/api/products/B0MISSING0").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 404);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Product not found");
    }

    #[actix_web::test]
    async fn test_stats_means_ignore_unknowns() {
        let store = Store::in_memory().await.unwrap();
        store.upsert(&make_product("B001", 1, 10.0, Some(4.0))).await.unwrap();
        store.upsert(&make_product("B002", 2, 30.0, None)).await.unwrap();
        store.upsert(&make_product("B003", 3, 0.0, Some(5.0))).await.unwrap();

        let app = make_app!(store);
        let req = test::TestRequest::get().uri("/api/stats").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["stats"]["total_products"], 3);
        assert_eq!(body["stats"]["average_price"], 20.0);
        assert_eq!(body["stats"]["average_rating"], 4.5);
        assert_eq!(body["stats"]["prime_products"], 1);
    }

    #[actix_web::test]
    async fn test_health() {
        let store = Store::in_memory().await.unwrap();

        let app = make_app!(store);
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
    }
}
