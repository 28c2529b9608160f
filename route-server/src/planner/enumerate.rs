//! Itinerary enumeration over an [`EdgeIndex`].
//!
//! Four patterns are tried in a fixed order, each independently:
//!
//! 1. Direct flight
//! 2. Ground transfer, then flight
//! 3. Flight, then ground transfer
//! 4. Ground transfer, flight, ground transfer
//!
//! A network can satisfy several patterns at once; every match is returned.
//! There is no deduplication or ranking.

use crate::domain::{Itinerary, Segment};

use super::index::EdgeIndex;

/// Enumerate every itinerary the index admits, in pattern order.
pub fn enumerate_routes(index: &EdgeIndex) -> Vec<Itinerary> {
    let mut routes = Vec::new();

    direct_flights(index, &mut routes);
    transfer_then_flight(index, &mut routes);
    flight_then_transfer(index, &mut routes);
    transfer_flight_transfer(index, &mut routes);

    routes
}

/// Origin → destination by air.
fn direct_flights(index: &EdgeIndex, routes: &mut Vec<Itinerary>) {
    for flight in index.flights_from(index.origin()) {
        if flight.destination().id == index.destination() {
            push(routes, vec![Segment::flight(flight)]);
        }
    }
}

/// Origin → airport on the ground, airport → destination by air.
fn transfer_then_flight(index: &EdgeIndex, routes: &mut Vec<Itinerary>) {
    for transfer in index.ground_from_origin() {
        let airport = transfer.destination().id;

        for flight in index.flights_from(airport) {
            if flight.destination().id == index.destination() {
                push(
                    routes,
                    vec![Segment::before_flight(transfer), Segment::flight(flight)],
                );
            }
        }
    }
}

/// Origin → airport by air, airport → destination on the ground.
fn flight_then_transfer(index: &EdgeIndex, routes: &mut Vec<Itinerary>) {
    for flight in index.flights_from(index.origin()) {
        let airport = flight.destination().id;

        for transfer in index.ground_to_destination_from(airport) {
            push(
                routes,
                vec![Segment::flight(flight), Segment::after_flight(transfer)],
            );
        }
    }
}

/// Origin → first airport on the ground, flight between airports, second
/// airport → destination on the ground.
fn transfer_flight_transfer(index: &EdgeIndex, routes: &mut Vec<Itinerary>) {
    for before in index.ground_from_origin() {
        let departure_airport = before.destination().id;

        for flight in index.flights_from(departure_airport) {
            let arrival_airport = flight.destination().id;

            for after in index.ground_to_destination_from(arrival_airport) {
                push(
                    routes,
                    vec![
                        Segment::before_flight(before),
                        Segment::flight(flight),
                        Segment::after_flight(after),
                    ],
                );
            }
        }
    }
}

/// Keep only segment lists that form a valid itinerary.
fn push(routes: &mut Vec<Itinerary>, segments: Vec<Segment>) {
    match Itinerary::new(segments) {
        Ok(itinerary) => routes.push(itinerary),
        Err(e) => tracing::debug!(error = %e, "skipping invalid itinerary"),
    }
}
