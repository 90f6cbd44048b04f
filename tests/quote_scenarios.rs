mod fixtures;

use std::sync::Arc;

use fare_engine::haversine::haversine_km;
use fare_engine::{
    CalculationMethod, EngineConfig, Provenance, QuoteEngine, QuoteRequest, RouteSource,
    TripFlags, VehicleType, ZoneStatus,
};

use fixtures::{CITY, FixedOracle, HUB, OUTSTATION, SUBURBS, SwitchableStore};

fn engine(oracle: Arc<FixedOracle>) -> QuoteEngine {
    QuoteEngine::new(SwitchableStore::seeded(), oracle, EngineConfig::default()).unwrap()
}

fn city_trip(to: &fixtures::Location) -> QuoteRequest {
    QuoteRequest::new(HUB.coordinate(), to.coordinate(), "sedan", TripFlags::default())
}

#[test]
fn short_city_trip_is_floored_at_minimum_fare() {
    let engine = engine(FixedOracle::route(3.0, 8.0));
    let fare = engine.quote(&city_trip(&CITY[0])).unwrap();

    assert_eq!(fare.base_fare, 60);
    assert_eq!(fare.distance_fare, 0);
    assert_eq!(fare.time_fare, 16);
    assert_eq!(fare.minimum_fare_adjustment, 24);
    assert_eq!(fare.platform_fee, 8);
    assert_eq!(fare.deadhead_charge, 0);
    assert_eq!(fare.total_fare, 108);
    assert_eq!(fare.calculation_method, CalculationMethod::Regular);
    assert_eq!(fare.provenance, Provenance::Authoritative);
    assert_eq!(fare.route_source, RouteSource::Oracle);
}

#[test]
fn ten_km_city_trip() {
    let engine = engine(FixedOracle::route(10.0, 20.0));
    let fare = engine.quote(&city_trip(&CITY[2])).unwrap();

    assert_eq!(fare.distance_fare, 90);
    assert_eq!(fare.time_fare, 40);
    assert_eq!(fare.platform_fee, 15);
    assert_eq!(fare.total_fare, 205);
    assert_eq!(fare.distance_km, 10.0);
    assert_eq!(fare.duration_minutes, 20.0);
}

#[test]
fn total_is_the_sum_of_rounded_components() {
    let engine = engine(FixedOracle::route(12.3, 27.7));
    for to in SUBURBS.iter().chain(CITY) {
        let fare = engine.quote(&city_trip(to)).unwrap();
        let sum = fare.base_fare
            + fare.distance_fare
            + fare.time_fare
            + fare.surge_fare
            + fare.minimum_fare_adjustment
            + fare.platform_fee
            + fare.deadhead_charge
            + fare.driver_allowance;
        assert_eq!(fare.total_fare, sum, "{}", to.name);
    }
}

#[test]
fn destination_between_rings_pays_half_the_return_leg() {
    let engine = engine(FixedOracle::route(10.0, 20.0));
    for to in SUBURBS {
        assert_eq!(engine.classify_zone(to.coordinate()), ZoneStatus::BetweenRings, "{}", to.name);

        let fare = engine.quote(&city_trip(to)).unwrap();
        let return_leg = haversine_km(to.coordinate(), HUB.coordinate());
        let charge = (return_leg / 2.0 * 15.0).round() as i64;

        assert_eq!(fare.deadhead_distance_km, return_leg, "{}", to.name);
        assert_eq!(fare.deadhead_charge, charge, "{}", to.name);
        assert_eq!(fare.total_fare, 205 + charge, "{}", to.name);
    }
}

#[test]
fn destinations_inside_inner_or_outside_outer_pay_no_deadhead() {
    let engine = engine(FixedOracle::route(10.0, 20.0));
    for to in CITY.iter().chain(OUTSTATION) {
        let fare = engine.quote(&city_trip(to)).unwrap();
        assert_eq!(fare.deadhead_charge, 0, "{}", to.name);
        assert_eq!(fare.deadhead_distance_km, 0.0, "{}", to.name);
        assert_eq!(fare.total_fare, 205, "{}", to.name);
    }
}

#[test]
fn sixty_km_same_day_outstation_uses_slab() {
    let engine = engine(FixedOracle::route(60.0, 75.0));
    let request = QuoteRequest::new(
        HUB.coordinate(),
        OUTSTATION[0].coordinate(),
        "sedan",
        TripFlags::outstation(false, 1, true),
    );
    let fare = engine.quote(&request).unwrap();

    assert_eq!(fare.calculation_method, CalculationMethod::Slab);
    assert_eq!(fare.total_fare, 2500);
    assert_eq!(fare.driver_allowance, 0);
    assert_eq!(fare.deadhead_charge, 0);
    assert_eq!(fare.provenance, Provenance::Authoritative);
}

#[test]
fn two_day_round_trip_bills_the_daily_allowance() {
    let engine = engine(FixedOracle::route(200.0, 240.0));
    let request = QuoteRequest::new(
        HUB.coordinate(),
        OUTSTATION[2].coordinate(),
        "sedan",
        TripFlags::outstation(true, 2, false),
    );
    let fare = engine.quote(&request).unwrap();

    assert_eq!(fare.calculation_method, CalculationMethod::PerKm);
    assert_eq!(fare.base_fare, 500);
    assert_eq!(fare.distance_fare, 8400);
    assert_eq!(fare.driver_allowance, 800);
    assert_eq!(fare.total_fare, 9700);
}

#[test]
fn repeated_quotes_are_identical() {
    let oracle = FixedOracle::route(10.0, 20.0);
    let engine = engine(oracle.clone());
    let request = city_trip(&SUBURBS[0]);

    let first = engine.quote(&request).unwrap();
    let second = engine.quote(&request).unwrap();
    assert_eq!(first, second);
    assert_eq!(oracle.call_count(), 1);
}

#[test]
fn vehicle_type_is_case_insensitive() {
    let engine = engine(FixedOracle::route(10.0, 20.0));
    let request = QuoteRequest::new(
        HUB.coordinate(),
        CITY[2].coordinate(),
        " SEDAN ",
        TripFlags::default(),
    );
    let fare = engine.quote(&request).unwrap();
    assert_eq!(fare.total_fare, 205);
    assert_eq!(fare.provenance, Provenance::Authoritative);
}

#[test]
fn quote_all_vehicles_keeps_request_order() {
    let engine = engine(FixedOracle::route(10.0, 20.0));
    let vehicles: Vec<VehicleType> = ["sedan", "auto", "bike", "hovercraft"]
        .into_iter()
        .map(VehicleType::new)
        .collect();

    let quotes = engine.quote_all_vehicles(
        HUB.coordinate(),
        CITY[2].coordinate(),
        TripFlags::default(),
        &vehicles,
    );

    let names: Vec<&str> = quotes.iter().map(|(v, _)| v.as_str()).collect();
    assert_eq!(names, ["sedan", "auto", "bike", "hovercraft"]);

    let sedan = quotes[0].1.as_ref().unwrap();
    assert_eq!(sedan.total_fare, 205);

    // 30 + 6 km * 11 + 20 min * 1 = 116, plus a 5% fee of 5.8
    let auto = quotes[1].1.as_ref().unwrap();
    assert_eq!(auto.total_fare, 122);
    assert_eq!(auto.provenance, Provenance::Authoritative);

    let bike = quotes[2].1.as_ref().unwrap();
    assert_eq!(bike.provenance, Provenance::DefaultTariffs);

    assert!(quotes[3].1.is_err());
}

#[test]
fn service_area_is_the_outer_ring() {
    let engine = engine(FixedOracle::route(10.0, 20.0));
    for inside in CITY.iter().chain(SUBURBS) {
        assert!(engine.classify_service_area(inside.coordinate()).inside_service_area, "{}", inside.name);
    }
    for outside in OUTSTATION {
        assert!(!engine.classify_service_area(outside.coordinate()).inside_service_area, "{}", outside.name);
    }
}

#[test]
fn included_km_comes_from_config() {
    let config = EngineConfig::from_toml_str("included_km = 2.0").unwrap();
    let engine = QuoteEngine::new(
        SwitchableStore::seeded(),
        FixedOracle::route(10.0, 20.0),
        config,
    )
    .unwrap();

    // 60 + 8 km * 15 + 40 = 220, fee 17.6
    let fare = engine.quote(&city_trip(&CITY[2])).unwrap();
    assert_eq!(fare.distance_fare, 120);
    assert_eq!(fare.total_fare, 238);
}
