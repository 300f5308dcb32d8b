//! Quote engine module.
//!
//! A pure calculation core (`calculators`) wrapped by a thin service layer
//! that resolves the active price plan and option catalog. Booking forms and
//! the admin pricing calculator call this over HTTP/JSON.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{
    compute_base_price, compute_days, compute_options_total, compute_people_surcharge,
    compute_quote, round_money, Quote,
};
pub use routes::router;
pub use services::QuoteError;
