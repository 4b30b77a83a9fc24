mod common;

use common::{assert_route_clear, coord, relaxed_options};
use searoute_lib::{
    generate_route, haversine_nm, plan_voyage, Endpoint, Error, ErrorKind, HazardCategory,
    HazardZone, LandMask, PlannerOptions, RouteAlgorithm, RouteRequest, SearchBudget,
    VoyageEndpoint, VoyageRequest, VoyageSettings,
};

fn open_water_request(
    origin: searoute_lib::Coordinate,
    destination: searoute_lib::Coordinate,
) -> VoyageRequest {
    VoyageRequest {
        origin: VoyageEndpoint::new("Origin", origin),
        destination: VoyageEndpoint::new("Destination", destination),
        settings: VoyageSettings {
            options: relaxed_options(),
            ..VoyageSettings::default()
        },
    }
}

#[test]
fn singapore_to_rotterdam_in_open_water_hugs_great_circle() {
    let registry = common::registry();
    let request = RouteRequest::new("Singapore", "Rotterdam").with_options(relaxed_options());
    let result =
        generate_route(&registry, &LandMask::empty(), &[], &request).expect("route planned");

    let route = result.optimized().expect("optimized route");
    let direct = result.direct.metrics.distance_nm;
    assert!((5600.0..5800.0).contains(&direct), "direct distance {direct}");
    assert!(route.metrics.distance_nm >= direct - 1e-6);
    assert!(
        route.metrics.distance_nm <= direct * 1.03,
        "optimized {} strays too far from {direct}",
        route.metrics.distance_nm
    );
}

#[test]
fn singapore_to_rotterdam_goes_around_land() {
    let registry = common::registry();
    let land = common::land();
    let request = RouteRequest::new("Singapore", "Rotterdam").with_options(relaxed_options());
    let result = generate_route(&registry, &land, &[], &request).expect("route planned");

    let route = result.optimized().expect("optimized route");
    let distance = route.metrics.distance_nm;
    assert!(
        (7800.0..8900.0).contains(&distance),
        "unexpected voyage length {distance}"
    );
    assert!(distance > result.direct.metrics.distance_nm);

    let singapore = registry.resolve("Singapore").expect("port");
    let rotterdam = registry.resolve("Rotterdam").expect("port");
    assert_eq!(route.waypoints.first(), Some(&singapore.coordinate));
    assert_eq!(route.waypoints.last(), Some(&rotterdam.coordinate));
    assert_eq!(route.metrics.waypoint_count, route.waypoints.len());
    assert_route_clear(&route.waypoints, &land, &result.hazards);
}

#[test]
fn hazard_forces_a_detour_the_direct_route_ignores() {
    let hazard = HazardZone::new(coord(0.0, 5.0), 90.0, HazardCategory::Piracy)
        .expect("hazard")
        .with_name("Gulf patrol zone");
    let mut request = open_water_request(coord(0.0, 0.0), coord(0.0, 10.0));
    request.settings.hazards = vec![hazard.clone()];

    let result = plan_voyage(&LandMask::empty(), &[], &request).expect("route planned");
    let route = result.optimized().expect("optimized route");

    assert_route_clear(&route.waypoints, &LandMask::empty(), &result.hazards);
    assert!(
        result
            .direct
            .waypoints
            .windows(2)
            .any(|pair| hazard.intersects_segment(pair[0], pair[1])),
        "direct route should cross the hazard"
    );
    assert!(route.metrics.distance_nm > result.direct.metrics.distance_nm);
}

#[test]
fn dijkstra_and_a_star_agree_on_distance() {
    let registry = common::registry();
    let land = common::land();

    let a_star = generate_route(
        &registry,
        &land,
        &[],
        &RouteRequest::new("Shanghai", "Busan").with_options(relaxed_options()),
    )
    .expect("a-star route");
    let dijkstra = generate_route(
        &registry,
        &land,
        &[],
        &RouteRequest::new("Shanghai", "Busan")
            .with_algorithm(RouteAlgorithm::Dijkstra)
            .with_options(relaxed_options()),
    )
    .expect("dijkstra route");

    let a_star_nm = a_star.optimized().expect("optimized").metrics.distance_nm;
    let dijkstra_nm = dijkstra.optimized().expect("optimized").metrics.distance_nm;
    assert!((a_star_nm - dijkstra_nm).abs() < 1e-6);
    assert!(a_star.planner.expansions <= dijkstra.planner.expansions);
    assert_eq!(dijkstra.planner.algorithm, RouteAlgorithm::Dijkstra);
}

#[test]
fn planning_is_deterministic() {
    let registry = common::registry();
    let land = common::land();
    let request = RouteRequest::new("Dubai", "Colombo").with_options(relaxed_options());

    let first = generate_route(&registry, &land, &[], &request).expect("first run");
    let second = generate_route(&registry, &land, &[], &request).expect("second run");

    assert_eq!(
        first.optimized().expect("optimized").waypoints,
        second.optimized().expect("optimized").waypoints
    );
    assert_eq!(first.planner, second.planner);
}

#[test]
fn same_port_twice_is_a_zero_length_voyage() {
    let registry = common::registry();
    let land = common::land();
    let result = generate_route(&registry, &land, &[], &RouteRequest::new("Hamburg", "hamburg"))
        .expect("route planned");

    let route = result.optimized().expect("optimized");
    assert_eq!(route.waypoints.len(), 1);
    assert_eq!(route.metrics.distance_nm, 0.0);
    assert_eq!(route.metrics.fuel_tons, 0.0);
    assert_eq!(result.direct.waypoints.len(), 1);
}

#[test]
fn destination_inside_hazard_returns_direct_route_only() {
    let registry = common::registry();
    let busan = registry.resolve("Busan").expect("port").coordinate;
    let hazard = HazardZone::new(busan, 25.0, HazardCategory::Weather).expect("hazard");

    let request = RouteRequest::new("Shanghai", "Busan")
        .with_hazards(vec![hazard])
        .with_options(relaxed_options());
    let result =
        generate_route(&registry, &common::land(), &[], &request).expect("partial result");

    assert!(!result.is_complete());
    let error = result.optimized().expect_err("destination unreachable");
    assert_eq!(error.kind(), ErrorKind::Unreachable);
    assert!(matches!(
        error,
        Error::Unreachable {
            endpoint: Endpoint::Destination,
            ..
        }
    ));
    assert!(format!("{error}").contains("weather"));
    assert_eq!(result.direct.waypoints.len(), 32);
    assert!(result.direct.metrics.distance_nm > 400.0);
}

#[test]
fn origin_on_land_is_unreachable() {
    let request = open_water_request(coord(23.0, 10.0), coord(35.0, -20.0));
    let result = plan_voyage(&common::land(), &[], &request).expect("partial result");

    match result.optimized() {
        Err(Error::Unreachable {
            endpoint: Endpoint::Origin,
            reason,
        }) => assert!(reason.contains("land"), "reason: {reason}"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn enclosed_origin_reports_no_route() {
    let ring: Vec<HazardZone> = (0..24)
        .map(|i| {
            let angle = (i as f64) * std::f64::consts::TAU / 24.0;
            HazardZone::new(
                coord(3.0 * angle.sin(), 3.0 * angle.cos()),
                30.0,
                HazardCategory::Restricted,
            )
            .expect("hazard")
        })
        .collect();
    let mut request = open_water_request(coord(0.0, 0.0), coord(0.0, 12.0));
    request.settings.hazards = ring;

    let result = plan_voyage(&LandMask::empty(), &[], &request).expect("partial result");
    let error = result.optimized().expect_err("no route");
    assert_eq!(error.kind(), ErrorKind::NoRoute);
    assert!(format!("{error}").contains("Origin"));
    assert_eq!(result.planner.margin_deg, Some(35.0));
}

#[test]
fn exhausted_budget_times_out_with_direct_route() {
    let registry = common::registry();
    let options = PlannerOptions {
        budget: SearchBudget {
            max_expansions: 5,
            ..relaxed_options().budget
        },
        ..relaxed_options()
    };
    let request = RouteRequest::new("Shanghai", "Busan").with_options(options);
    let result = generate_route(&registry, &common::land(), &[], &request).expect("partial");

    let error = result.optimized().expect_err("budget exhausted");
    assert!(matches!(error, Error::SearchTimeout { .. }));
    assert_eq!(error.kind(), ErrorKind::SearchTimeout);
    assert!(result.planner.expansions > 5);
    assert!(!result.direct.waypoints.is_empty());
}

#[test]
fn invalid_coordinate_fails_whole_request() {
    let mut request = open_water_request(coord(0.0, 0.0), coord(0.0, 1.0));
    request.destination.coordinate.lat = 95.0;

    let error = plan_voyage(&LandMask::empty(), &[], &request).expect_err("invalid");
    assert_eq!(error.kind(), ErrorKind::InvalidCoordinate);
}

#[test]
fn trans_pacific_routes_stay_clear_of_land() {
    let registry = common::registry();
    let land = common::land();

    for (from, to) in [("Tokyo", "Los Angeles"), ("Busan", "Vancouver")] {
        let request = RouteRequest::new(from, to).with_options(relaxed_options());
        let result = generate_route(&registry, &land, &[], &request).expect("route planned");
        let route = result.optimized().expect("optimized route");

        assert!(
            route
                .waypoints
                .windows(2)
                .any(|pair| (pair[0].lon - pair[1].lon).abs() > 180.0),
            "{from} -> {to} should cross the antimeridian"
        );
        assert!(route.metrics.distance_nm < result.direct.metrics.distance_nm * 1.3);
        assert_route_clear(&route.waypoints, &land, &result.hazards);
    }
}

#[test]
fn route_across_antimeridian_stays_short() {
    let origin = coord(0.0, 179.0);
    let destination = coord(1.0, -179.0);
    let result = plan_voyage(&LandMask::empty(), &[], &open_water_request(origin, destination))
        .expect("route planned");

    let route = result.optimized().expect("optimized");
    let direct = haversine_nm(origin, destination);
    assert!(route.metrics.distance_nm < direct * 1.1);
    assert!(route
        .waypoints
        .iter()
        .all(|point| (-180.0..180.0).contains(&point.lon) || point.lon == 180.0));
    assert_eq!(route.waypoints.last(), Some(&destination));
}
