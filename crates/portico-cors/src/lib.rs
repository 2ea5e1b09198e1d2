//! CORS policy and response decoration for the Portico dispatch core.
//!
//! Two artifacts come out of a configured [`CorsPolicy`]:
//!
//! - a full preflight response (204, no body) for `OPTIONS` requests, built
//!   by [`CorsResponder::preflight`];
//! - a header mutation applied to every outgoing response by
//!   [`CorsResponder::apply`], which adds the `Access-Control-Allow-Origin` /
//!   `-Credentials` / `-Expose-Headers` headers without touching status or
//!   body.
//!
//! The dispatcher applies the mutation to error responses too; a 500 without
//! CORS headers shows up in browsers as an opaque CORS failure, masking the
//! real error.
//!
//! Policy resolution: a wildcard policy echoes any request origin back (and
//! never advertises credentials); a list policy echoes only exact matches and
//! advertises credentials only then.

mod policy;
mod responder;

pub use policy::{AllowedOrigins, CorsPolicy, CorsPolicyBuilder, CorsPolicyError, OriginGrant};
pub use responder::CorsResponder;
