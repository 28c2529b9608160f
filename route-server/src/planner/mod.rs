//! Route composition engine.
//!
//! Turns the flat set of schedule edges active on a day into every itinerary
//! of the form `[ground] flight [ground]` between two locations.
//!
//! The edges are first partitioned and keyed by endpoint ([`EdgeIndex`]), then
//! four fixed patterns are matched against the index in order.

mod enumerate;
mod index;
mod search;


pub use enumerate::enumerate_routes;
pub use index::EdgeIndex;
pub use search::{EdgeSource, Endpoint, LocationLookup, RouteError, RoutePlanner, RouteQuery};
