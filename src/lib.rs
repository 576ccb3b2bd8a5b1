//! # MyParcel Client
//! Asynchronous wrapper around the MyParcel shipment HTTP API: describe a parcel with [`Shipment`], create it with [`Client::create_shipment`], and read it back with [`Client::get_shipment`].
//!
//! ## Audience and uses
//! For shops and back-office tools that book parcels with PostNL, bpost, DPD and the other carriers sold through MyParcel.nl and SendMyParcel.be. Configure a [`Client`] with [`ClientBuilder`], build a [`Shipment`] from an [`Address`] and [`Options`], and keep the returned id to look the shipment up later.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`. Operations are instrumented with `tracing`; install a subscriber to see them.
//!
//! ## Wire format
//! Bodies are JSON wrapped in a `data` envelope; the [`codec`] module exposes the encoders and decoders on their own. Unset optional fields are left out of the body, except `delivery_date`, which is sent as `null`. Date-times use the API's `YYYY-MM-DD HH:MM:SS` format through [`ApiTime`].
//!
//! ## Out of scope
//! No retries, rate limiting, pagination, webhooks or label downloads. Every failure is returned to the caller.
//!
//! ## Errors
//! Transport failures and timeouts surface as [`Error::Transport`]; a non-success status becomes [`Error::Remote`] with the raw response body; unexpected bodies become [`Error::Decoding`]. Shipments are checked locally before sending unless disabled, failing with [`Error::Validation`]. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Example
//! ```no_run
//! use myparcel_client::{Address, Carrier, Client, Insurance, Options, Shipment};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), myparcel_client::Error> {
//!     let client = Client::new("my-api-key")?;
//!
//!     let recipient = Address::new("NL", "Amsterdam", "Damrak", "Piet Jansen")
//!         .number("1")
//!         .postal_code("1012LG");
//!     let shipment = Shipment::new(recipient, Carrier::PostNl)
//!         .reference("order-1001")
//!         .options(Options {
//!             signature: true,
//!             insurance: Some(Insurance::eur(25_000)),
//!             ..Options::default()
//!         });
//!
//!     let id = client.create_shipment(&shipment).await?;
//!     let found = client.get_shipment(id).await?;
//!     println!("Created {id}, barcode {:?}", found.shipments[0].barcode);
//!     Ok(())
//! }
//! ```

mod client;
pub mod codec;
mod error;
mod models;
mod time;
mod validation;

pub use client::{Client, ClientBuilder};
pub use error::Error;
pub use models::{
    Address, Carrier, CreatedShipment, Currency, DeliveryType, FetchResult, Insurance,
    MultiCollo, Options, PackageType, SecondaryShipment, Shipment, Storefront,
};
pub use time::{API_TIME_FORMAT, ApiTime};
pub use validation::{MAX_PERSON_LEN, ValidationError};

/// Result type alias for MyParcel operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
