//! HTTP API server for the pet marketplace backend.
//!
//! Provides REST endpoints for the catalog, product sales, pet transactions,
//! bookings and event participants, with a bearer-token gate on writes,
//! structured logging (tracing) and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};
use domain::{
    BookingService, BusinessCategoryService, BusinessService, EventParticipantService,
    GroomingCatalog, GroomingReservations, PetCategoryService, PetSaleService, PetService,
    PhotographyCatalog, PhotographySessions, ProductService, SaleRecorder, ServiceCatalog,
    TransactionService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use record_store::{AssetStore, RecordStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::TokenVerifier;

/// Shared application state accessible from all handlers.
pub struct AppState<S: RecordStore> {
    pub products: ProductService<S>,
    pub sales: SaleRecorder<S>,
    pub pets: PetService<S>,
    pub pet_sales: PetSaleService<S>,
    pub transactions: TransactionService<S>,
    pub businesses: BusinessService<S>,
    pub pet_categories: PetCategoryService<S>,
    pub business_categories: BusinessCategoryService<S>,
    pub grooming: GroomingCatalog<S>,
    pub photography: PhotographyCatalog<S>,
    pub grooming_reservations: GroomingReservations<S>,
    pub photography_sessions: PhotographySessions<S>,
    pub participants: EventParticipantService<S>,
}

impl<S: RecordStore + Clone> AppState<S> {
    /// Builds every service over one record store and one asset store.
    pub fn new(store: S, assets: Arc<dyn AssetStore>) -> Self {
        Self {
            products: ProductService::new(store.clone(), Arc::clone(&assets)),
            sales: SaleRecorder::new(store.clone()),
            pets: PetService::new(store.clone()),
            pet_sales: PetSaleService::new(store.clone()),
            transactions: TransactionService::new(store.clone()),
            businesses: BusinessService::new(store.clone(), Arc::clone(&assets)),
            pet_categories: PetCategoryService::new(store.clone()),
            business_categories: BusinessCategoryService::new(store.clone(), assets),
            grooming: ServiceCatalog::new(store.clone()),
            photography: ServiceCatalog::new(store.clone()),
            grooming_reservations: BookingService::new(store.clone()),
            photography_sessions: BookingService::new(store.clone()),
            participants: EventParticipantService::new(store),
        }
    }
}

/// Creates the Axum application router with all routes and shared state.
///
/// Routes that need a caller go through [`auth::require_bearer`]; catalog
/// reads stay public.
pub fn create_app<S: RecordStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    verifier: Arc<dyn TokenVerifier>,
    metrics_handle: PrometheusHandle,
) -> Router {
    use routes::{
        bookings, business_categories, businesses, event_participants, grooming_services,
        pet_categories, pet_sales, pets, photography_services, product_sales, products,
        transactions,
    };

    let public = Router::new()
        .route("/products", get(products::list::<S>))
        .route("/products/{id}", get(products::get::<S>))
        .route("/pets/all", get(pets::list::<S>))
        .route("/pet-categories", get(pet_categories::list::<S>))
        .route("/pet-categories/{id}", get(pet_categories::get::<S>))
        .route("/business", get(businesses::list::<S>))
        .route("/business/{id}", get(businesses::get::<S>))
        .route("/businessCategory/all", get(business_categories::list::<S>))
        .route("/businessCategory/{id}", get(business_categories::get::<S>))
        .route("/event-participants", get(event_participants::list::<S>))
        .route(
            "/event-participants/{id}",
            get(event_participants::get::<S>),
        );

    let protected = Router::new()
        .route("/products", post(products::create::<S>))
        .route(
            "/products/{id}",
            put(products::update::<S>).delete(products::delete::<S>),
        )
        .route("/product-sales", get(product_sales::list::<S>))
        .route("/product-sales/create", post(product_sales::create::<S>))
        .route(
            "/product-sales/{id}",
            get(product_sales::get::<S>)
                .put(product_sales::update::<S>)
                .delete(product_sales::delete::<S>),
        )
        .route("/pets/create", post(pets::create::<S>))
        .route("/pets/update/{id}", put(pets::update::<S>))
        .route("/pets/delete/{id}", axum::routing::delete(pets::delete::<S>))
        .route("/pets/{id}", get(pets::get::<S>))
        .route("/pet-sales", get(pet_sales::list::<S>))
        .route("/pet-sales/create", post(pet_sales::create::<S>))
        .route(
            "/pet-sales/{id}",
            get(pet_sales::get::<S>)
                .put(pet_sales::update::<S>)
                .delete(pet_sales::delete::<S>),
        )
        .route("/transactions", get(transactions::list::<S>))
        .route("/transactions/create", post(transactions::create::<S>))
        .route(
            "/transactions/{id}",
            get(transactions::get::<S>)
                .put(transactions::update::<S>)
                .delete(transactions::delete::<S>),
        )
        .route("/business", post(businesses::create::<S>))
        .route(
            "/business/{id}",
            put(businesses::update::<S>).delete(businesses::delete::<S>),
        )
        .route("/grooming-service", get(grooming_services::list::<S>))
        .route(
            "/grooming-service/create",
            post(grooming_services::create::<S>),
        )
        .route(
            "/grooming-service/update/{id}",
            put(grooming_services::update::<S>),
        )
        .route(
            "/grooming-service/delete/{id}",
            axum::routing::delete(grooming_services::delete::<S>),
        )
        .route("/grooming-service/{id}", get(grooming_services::get::<S>))
        .route("/pet-categories", post(pet_categories::create::<S>))
        .route(
            "/pet-categories/{id}",
            put(pet_categories::update::<S>).delete(pet_categories::delete::<S>),
        )
        .route(
            "/businessCategory/create",
            post(business_categories::create::<S>),
        )
        .route(
            "/businessCategory/update/{id}",
            put(business_categories::update::<S>),
        )
        .route(
            "/businessCategory/delete/{id}",
            axum::routing::delete(business_categories::delete::<S>),
        )
        .route(
            "/photography-service",
            get(photography_services::list::<S>),
        )
        .route(
            "/photography-service/create",
            post(photography_services::create::<S>),
        )
        .route(
            "/photography-service/update/{id}",
            put(photography_services::update::<S>),
        )
        .route(
            "/photography-service/delete/{id}",
            axum::routing::delete(photography_services::delete::<S>),
        )
        .route(
            "/photography-service/{id}",
            get(photography_services::get::<S>),
        )
        .route(
            "/grooming-reservations",
            get(bookings::list_grooming::<S>),
        )
        .route(
            "/grooming-reservations/create",
            post(bookings::create_grooming::<S>),
        )
        .route(
            "/grooming-reservations/{id}",
            get(bookings::get_grooming::<S>)
                .put(bookings::update_grooming::<S>)
                .delete(bookings::delete_grooming::<S>),
        )
        .route("/photography", get(bookings::list_photography::<S>))
        .route(
            "/photography/create",
            post(bookings::create_photography::<S>),
        )
        .route(
            "/photography/{id}",
            get(bookings::get_photography::<S>)
                .put(bookings::update_photography::<S>)
                .delete(bookings::delete_photography::<S>),
        )
        .route(
            "/event-participants",
            post(event_participants::create::<S>),
        )
        .route(
            "/event-participants/{id}",
            put(event_participants::update::<S>).delete(event_participants::delete::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            verifier,
            auth::require_bearer,
        ));

    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .merge(public)
        .merge(protected)
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over `store`, with an asset store for
/// product and business images.
pub fn create_default_state<S: RecordStore + Clone + 'static>(
    store: S,
    assets: Arc<dyn AssetStore>,
) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store, assets))
}
