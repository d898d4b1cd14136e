//! Behaviour-driven step definitions driving the route CLI scenarios.

use super::helpers::{StubServiceBuilder, runtime, stub_builder};
use super::*;
use crate::route::{RouteConfig, parse_points, run_route_with};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tokio::runtime::Runtime;

const VIA_POINTS: &str = "13.38,52.52;13.40,52.50;13.45,52.49";
const TWO_POINTS: &str = "13.38,52.52;13.45,52.49";

/// Aggregates route CLI scenario state so each step only needs a single world
/// argument.
struct RouteWorld {
    runtime: Runtime,
    builder: RefCell<Option<StubServiceBuilder>>,
    cli_args: RefCell<Vec<String>>,
    output: RefCell<Vec<u8>>,
    cli_result: RefCell<Option<Result<(), CliError>>>,
}

impl RouteWorld {
    fn new() -> Self {
        Self {
            runtime: runtime(),
            builder: RefCell::new(None),
            cli_args: RefCell::new(Vec::new()),
            output: RefCell::new(Vec::new()),
            cli_result: RefCell::new(None),
        }
    }

    fn push_flag(&self, flag: &str, value: &str) {
        self.cli_args
            .borrow_mut()
            .extend([format!("--{flag}"), value.to_owned()]);
    }

    fn requests(&self) -> Vec<waymark_core::RouteRequest> {
        let guard = self.builder.borrow();
        guard
            .as_ref()
            .expect("routing service must be installed")
            .service()
            .requests()
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.cli_result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> RouteWorld {
    RouteWorld::new()
}

#[given("a routing service offering foot and car")]
fn service_offering_profiles(#[from(world)] world: &RouteWorld) {
    *world.builder.borrow_mut() = Some(stub_builder());
}

#[given("waypoints through a via point")]
fn via_waypoints(#[from(world)] world: &RouteWorld) {
    world.push_flag(ARG_ROUTE_POINTS, VIA_POINTS);
}

#[given("a start and a destination")]
fn two_waypoints(#[from(world)] world: &RouteWorld) {
    world.push_flag(ARG_ROUTE_POINTS, TWO_POINTS);
}

#[given("the foot profile is requested")]
fn foot_requested(#[from(world)] world: &RouteWorld) {
    world.push_flag(ARG_ROUTE_PROFILE, "foot");
}

#[given("the bike profile is requested")]
fn bike_requested(#[from(world)] world: &RouteWorld) {
    world.push_flag(ARG_ROUTE_PROFILE, "bike");
}

#[when("I run the route command")]
fn run_route_command(#[from(world)] world: &RouteWorld) {
    let mut invocation = vec!["waymark".to_owned(), "route".to_owned()];
    invocation.extend(world.cli_args.borrow().iter().cloned());
    let builder_guard = world.builder.borrow();
    let builder = builder_guard
        .as_ref()
        .expect("routing service must be installed");
    let mut output = world.output.borrow_mut();
    let outcome = Cli::try_parse_from(invocation)
        .map_err(CliError::ArgumentParsing)
        .and_then(|cli| match cli.command {
            Command::Route(args) => RouteConfig::try_from(args),
            Command::Info(_) => panic!("expected the route command"),
        })
        .and_then(|config| run_route_with(&config, builder, &world.runtime, &mut *output));
    world.cli_result.replace(Some(outcome));
}

#[then("one route request passes through every waypoint in order")]
fn one_request_in_order(#[from(world)] world: &RouteWorld) {
    let requests = world.requests();
    assert_eq!(requests.len(), 1, "expected exactly one route request");
    let expected = parse_points(VIA_POINTS).expect("fixture points parse");
    assert_eq!(requests[0].points, expected);
}

#[then("the request uses the \"car\" profile")]
fn request_uses_car(#[from(world)] world: &RouteWorld) {
    let requests = world.requests();
    assert_eq!(requests[0].profile.as_deref(), Some("car"));
}

#[then("the request uses the \"foot\" profile")]
fn request_uses_foot(#[from(world)] world: &RouteWorld) {
    let requests = world.requests();
    assert_eq!(requests[0].profile.as_deref(), Some("foot"));
}

#[then("the route is printed as JSON")]
fn route_printed(#[from(world)] world: &RouteWorld) {
    let output = world.output.borrow();
    let printed: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    let paths = printed["paths"].as_array().expect("paths array");
    assert_eq!(paths.len(), 1);
}

#[then("the CLI reports that the bike profile is not offered")]
fn reports_unknown_profile(#[from(world)] world: &RouteWorld) {
    match &*world.error() {
        CliError::UnknownProfile { key, .. } => assert_eq!(key, "bike"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[then("no route request is sent")]
fn no_request(#[from(world)] world: &RouteWorld) {
    assert!(world.requests().is_empty());
}

#[then("the CLI reports that the \"points\" flag is missing")]
fn reports_missing_points(#[from(world)] world: &RouteWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_ROUTE_POINTS),
        other => panic!("unexpected error {other:?}"),
    }
}

macro_rules! register_route_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/route_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: RouteWorld) {
            let _ = world;
        }
    };
}

register_route_scenario!(routing_through_via, "routing through a via point");
register_route_scenario!(choosing_profile, "choosing an explicit profile");
register_route_scenario!(
    rejecting_unknown_profile,
    "rejecting a profile the service does not offer"
);
register_route_scenario!(rejecting_missing_points, "rejecting missing waypoints");
