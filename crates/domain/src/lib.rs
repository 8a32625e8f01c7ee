//! Domain layer for the marketplace backend.
//!
//! This crate provides:
//! - typed entities and a generic [`Repository`] over the record store
//! - validated commands and one service per entity, covering the catalog,
//!   categories, bookings and event participants
//! - the [`SaleRecorder`], which keeps product stock consistent with the
//!   recorded sales using conditional writes and an undo log
//! - the [`TransactionService`], which keeps pet availability consistent
//!   with open transactions

mod compensation;
pub mod booking;
pub mod catalog;
pub mod category;
pub mod error;
pub mod money;
pub mod participant;
pub mod pet;
pub mod pet_sale;
pub mod product;
pub mod repository;
pub mod sale;
pub mod stock;
pub mod transaction;

pub use booking::{
    BookingService, BookingUpdate, GroomingReservation, GroomingReservations, NewBooking,
    PhotographySession, PhotographySessions,
};
pub use catalog::{
    BUSINESS_IMAGE_BUCKET, Business, BusinessService, BusinessUpdate, GroomingCatalog,
    GroomingService, NewBusiness, NewService, PhotographyCatalog, PhotographyService,
    ServiceCatalog, ServiceUpdate,
};
pub use category::{
    BUSINESS_CATEGORY_IMAGE_BUCKET, BusinessCategory, BusinessCategoryService,
    BusinessCategoryUpdate, NewBusinessCategory, PetCategory, PetCategoryService,
};
pub use error::{DomainError, Result};
pub use money::Money;
pub use participant::{EventParticipant, EventParticipantService, ParticipantLink};
pub use pet::{NewPet, Pet, PetService, PetUpdate};
pub use pet_sale::{PetSale, PetSaleLink, PetSaleService};
pub use product::{NewProduct, PRODUCT_IMAGE_BUCKET, Product, ProductService, ProductUpdate};
pub use repository::{Entity, Repository};
pub use sale::{ProductSale, RecordSale, SaleDetails, SaleRecorder, UpdateSale};
pub use stock::{MAX_STOCK_ATTEMPTS, StockAdjustment, StockChange};
pub use transaction::{
    OpenPetTransaction, OpenProductTransaction, Transaction, TransactionKind, TransactionService,
    TransactionStatus, TransactionUpdate,
};
