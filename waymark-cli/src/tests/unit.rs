//! Focused unit tests covering CLI configuration and route planning.

use super::helpers::{runtime, sample_info, sample_route, stub_builder, StubServiceBuilder};
use super::*;
use crate::info::{InfoConfig, run_info_with};
use crate::route::{RouteConfig, parse_points, plan_route, run_route_with};
use crate::service::ServiceConfig;
use geo::Coord;
use rstest::rstest;
use std::time::Duration;
use waymark_core::RoutingError;
use waymark_data::routing::test_support::StubRoutingService;

fn route_config(points: &str, profile: Option<&str>) -> RouteConfig {
    RouteConfig::try_from(RouteArgs {
        points: Some(points.to_owned()),
        profile: profile.map(str::to_owned),
        ..RouteArgs::default()
    })
    .expect("config should build")
}

#[rstest]
#[case::pair("13.38,52.52;13.45,52.49", 2)]
#[case::spaced(" 13.38 , 52.52 ; 13.45,52.49 ", 2)]
#[case::trailing_separator("13.38,52.52;13.45,52.49;", 2)]
#[case::via("13.38,52.52;13.40,52.50;13.45,52.49", 3)]
fn parse_points_accepts_lng_lat_pairs(#[case] raw: &str, #[case] expected: usize) {
    let points = parse_points(raw).expect("points should parse");
    assert_eq!(points.len(), expected);
    assert_eq!(points[0], Coord { x: 13.38, y: 52.52 });
}

#[rstest]
#[case::no_comma("13.38;13.45,52.49")]
#[case::not_a_number("east,52.52;13.45,52.49")]
#[case::latitude_out_of_range("13.38,95.0;13.45,52.49")]
#[case::longitude_out_of_range("190.0,52.52;13.45,52.49")]
fn parse_points_rejects_malformed_entries(#[case] raw: &str) {
    let err = parse_points(raw).expect_err("entry should be rejected");
    assert!(
        matches!(err, CliError::InvalidPoint { .. }),
        "expected InvalidPoint, found {err:?}"
    );
}

#[rstest]
#[case::empty("", 0)]
#[case::single("13.38,52.52", 1)]
fn parse_points_requires_two_waypoints(#[case] raw: &str, #[case] count: usize) {
    match parse_points(raw).expect_err("too few points") {
        CliError::TooFewPoints { count: found } => assert_eq!(found, count),
        other => panic!("expected TooFewPoints, found {other:?}"),
    }
}

#[rstest]
fn converting_route_without_points_errors() {
    let err = RouteConfig::try_from(RouteArgs::default()).expect_err("missing points");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_ROUTE_POINTS);
            assert_eq!(env, ENV_ROUTE_POINTS);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn service_config_applies_defaults() {
    let config = ServiceConfig::resolve(None, Some(String::new()), None).expect("defaults");
    assert_eq!(config.base_url, "http://localhost:8989");
    assert_eq!(config.api_key, None);
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[rstest]
fn service_config_rejects_zero_timeout() {
    let err = ServiceConfig::resolve(None, None, Some(0)).expect_err("zero timeout");
    match err {
        CliError::InvalidTimeout { field } => assert_eq!(field, ARG_TIMEOUT_SECS),
        other => panic!("expected InvalidTimeout, found {other:?}"),
    }
}

#[rstest]
fn cli_parses_route_flags() {
    let cli = Cli::try_parse_from([
        "waymark",
        "route",
        "--points",
        "13.38,52.52;13.45,52.49",
        "--profile",
        "foot",
        "--timeout-secs",
        "5",
    ])
    .expect("arguments parse");
    let Command::Route(args) = cli.command else {
        panic!("expected the route command");
    };
    let config = RouteConfig::try_from(args).expect("config should build");
    assert_eq!(config.profile.as_deref(), Some("foot"));
    assert_eq!(config.service.timeout, Duration::from_secs(5));
}

#[rstest]
fn plan_route_sends_one_request_in_waypoint_order() {
    let runtime = runtime();
    let builder = stub_builder();
    let config = route_config("13.38,52.52;13.40,52.50;13.45,52.49", None);

    let result = plan_route(&config, &builder, &runtime).expect("route planned");

    assert_eq!(*result, sample_route());
    let requests = builder.service().requests();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    assert_eq!(requests[0].points, config.points);
    assert_eq!(requests[0].profile.as_deref(), Some("car"));
}

#[rstest]
fn plan_route_uses_requested_profile() {
    let runtime = runtime();
    let builder = stub_builder();
    let config = route_config("13.38,52.52;13.45,52.49", Some("foot"));

    plan_route(&config, &builder, &runtime).expect("route planned");

    let requests = builder.service().requests();
    assert_eq!(requests[0].profile.as_deref(), Some("foot"));
}

#[rstest]
fn plan_route_rejects_unknown_profile() {
    let runtime = runtime();
    let builder = stub_builder();
    let config = route_config("13.38,52.52;13.45,52.49", Some("bike"));

    let err = plan_route(&config, &builder, &runtime).expect_err("unknown profile");

    match err {
        CliError::UnknownProfile { key, available } => {
            assert_eq!(key, "bike");
            assert_eq!(available, "foot, car");
        }
        other => panic!("expected UnknownProfile, found {other:?}"),
    }
    assert!(builder.service().requests().is_empty());
}

#[rstest]
fn plan_route_surfaces_service_errors() {
    let runtime = runtime();
    let builder = StubServiceBuilder::new(StubRoutingService::with_error(RoutingError::Network {
        url: "http://localhost:8989/info".to_owned(),
        message: "connection refused".to_owned(),
    }));
    let config = route_config("13.38,52.52;13.45,52.49", None);

    let err = plan_route(&config, &builder, &runtime).expect_err("service down");

    assert!(
        matches!(err, CliError::Routing(RoutingError::Network { .. })),
        "expected a network error, found {err:?}"
    );
}

#[rstest]
fn route_command_prints_json() {
    let runtime = runtime();
    let builder = stub_builder();
    let config = route_config("13.38,52.52;13.45,52.49", None);
    let mut output = Vec::new();

    run_route_with(&config, &builder, &runtime, &mut output).expect("route printed");

    let printed: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(printed["paths"][0]["instructions"][0]["street_name"], "Main Street");
    assert_eq!(printed["info"]["took_ms"], 4);
}

#[rstest]
fn info_command_prints_profiles() {
    let runtime = runtime();
    let builder = stub_builder();
    let config = InfoConfig::try_from(InfoArgs::default()).expect("config should build");
    let mut output = Vec::new();

    run_info_with(&config, &builder, &runtime, &mut output).expect("info printed");

    let printed: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(printed["vehicles"][0]["key"], sample_info().vehicles[0].key);
    assert_eq!(printed["vehicles"][1]["key"], "car");
}
