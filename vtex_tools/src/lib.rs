//! A thin client for the VTEX order-management (OMS) and Master Data REST APIs.
//!
//! Only the handful of calls needed to relay orders are supported:
//! * listing orders in a given status ([`VtexApi::list_orders`]),
//! * fetching a full order record ([`VtexApi::get_order`]),
//! * creating a document in a Master Data entity ([`VtexApi::create_document`]).
mod api;
mod config;
mod data_objects;
mod error;

pub use api::{VtexApi, ORDERS_PER_PAGE};
pub use config::VtexConfig;
pub use data_objects::{ClientProfileData, DocumentCreated, OrderDetail, OrderList, OrderSummary};
pub use error::VtexApiError;
