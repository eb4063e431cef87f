use hifitime::{Duration, Epoch};
use skyclear::catalog::parse_catalog;
use skyclear::config::Settings;
use skyclear::constellation::Constellation;
use skyclear::coordinates::{from_topocentric, to_horizontal, Aer, RaDec};
use skyclear::detection::{intersects, FieldOfView, ObservationWindow};
use skyclear::errors::PredictionError;
use skyclear::models::StateVector;
use skyclear::prediction::{CancellationToken, PassPredictor, TrackedObject};
use skyclear::report::write_visible_passes;
use nalgebra as na;

const CATALOG: &str = "ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927

2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
DAMAGED
1 99999U
ISS COPY
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
";

fn iss_epoch() -> Epoch {
    let catalog = parse_catalog(CATALOG);
    TrackedObject::from_tle(&catalog[0]).unwrap().epoch()
}

// Observation from CTIO against a small shell, as the scheduler would issue it
#[test]
fn constellation_observation_check() {
    let settings = Settings::default();
    let observer = settings.site("ctio").unwrap();
    let mut shell = Constellation::build(8, 2, 550.0, 53.0).unwrap();
    assert_eq!(shell.len(), 16);

    let fov = FieldOfView::equatorial(10.0, 10.0, 5.0).unwrap();
    for cadence in [1.0, 5.0, 10.0, 30.0] {
        let window =
            ObservationWindow::with_cadence(fov, Epoch::from_unix_seconds(1_581_066_487.79), 30.0, cadence).unwrap();
        let verdict = shell.check_observation(&window, &observer).unwrap();
        assert!(verdict.skipped.is_empty());
        assert!(verdict.checked <= 16);
    }
}

#[test]
fn zero_length_exposure_is_clear() {
    let observer = Settings::default().site("ctio").unwrap();
    let mut shell = Constellation::build(72, 20, 550.0, 53.0).unwrap();
    let fov = FieldOfView::horizontal(180.0, 45.0, 90.0).unwrap();
    let window = ObservationWindow::from_unix(fov, 1_581_066_487.79, 0.0).unwrap();
    let verdict = shell.check_observation(&window, &observer).unwrap();
    assert!(!verdict.interference());
    assert_eq!(verdict.checked, 72 * 20);
}

#[test]
fn pointing_at_a_known_object_is_detected() {
    let observer = Settings::default().site("ctio").unwrap();
    let epoch = Epoch::from_unix_seconds(1_581_066_487.79);
    let target = RaDec {
        right_ascension: 210.0,
        declination: -40.0,
    };
    let (azimuth, elevation) = to_horizontal(&target, &observer, &epoch).unwrap();
    assert!(elevation > 30.0, "{elevation}");
    let position = from_topocentric(
        &Aer {
            azimuth,
            elevation,
            range_km: 1200.0,
        },
        &observer,
        &epoch,
    )
    .unwrap();
    let states = [StateVector::new(position, na::Vector3::zeros(), epoch)];
    let fov = FieldOfView::equatorial(210.0, -40.0, 0.1).unwrap();
    assert!(intersects(&states, &observer, &fov));
    let elsewhere = FieldOfView::equatorial(230.0, -40.0, 0.1).unwrap();
    assert!(!intersects(&states, &observer, &elsewhere));
}

// Catalog text through forecast, filtering and CSV, with a damaged entry in the middle
#[test]
fn catalog_forecast_to_report() {
    let catalog = parse_catalog(CATALOG);
    let names: Vec<&str> = catalog.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["ISS (ZARYA)", "ISS COPY"]);

    let observer = Settings::default().site("ctio").unwrap();
    let start = iss_epoch();
    let end = start + Duration::from_days(2.0);
    let token = CancellationToken::new();

    let all = PassPredictor::default()
        .forecast(&catalog, &observer, start, end, &token)
        .unwrap();
    assert!(all.skipped.is_empty());
    assert!(!all.passes.is_empty());
    // Both records carry the same elements
    let original = all.passes.iter().filter(|p| p.name() == "ISS (ZARYA)").count();
    assert_eq!(original * 2, all.passes.len());

    let visible = Settings::default()
        .predictor()
        .visible_passes(&catalog, &observer, start, end, &token)
        .unwrap();
    for pass in &visible.passes {
        assert!(pass.duration_s() > 1.0);
        assert!(pass.peak().unwrap().elevation > 25.0);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = write_visible_passes(&all.passes, dir.path(), "ctio_visible_passes.csv").unwrap();
    let mut reader = csv::Reader::from_path(path).unwrap();
    assert_eq!(reader.records().count(), all.passes.len());
}

#[test]
fn catalog_check_uses_the_same_detector() {
    let catalog = parse_catalog(CATALOG);
    let observer = Settings::default().site("ctio").unwrap();
    let start = iss_epoch();
    let forecast = PassPredictor::default()
        .forecast(&catalog[..1], &observer, start, start + Duration::from_days(1.0), &CancellationToken::new())
        .unwrap();
    let pass = &forecast.passes[0];
    let peak = pass.peak().unwrap();

    let fov = FieldOfView::horizontal(peak.azimuth, peak.elevation, 2.0).unwrap();
    let window = ObservationWindow::with_cadence(fov, peak.epoch - Duration::from_seconds(5.0), 10.0, 1.0).unwrap();
    let verdict = PassPredictor::default()
        .check_observation(&catalog, &observer, &window, &CancellationToken::new())
        .unwrap();
    assert!(verdict.interference());
    assert_eq!(verdict.intruder.unwrap().object, "ISS (ZARYA)");
}

// A record that parses but has already re-entered by the forecast horizon
#[test]
fn decayed_object_is_skipped_during_the_search() {
    let text = format!(
        "{CATALOG}MINOTAUR R/B\n\
         1 28872U 05037B   05333.02012661  .25992681  00000-0  24476-3 0  1534\n\
         2 28872  96.4736 157.9986 0303955 244.0492 110.6523 16.46015938 10708\n"
    );
    let catalog = parse_catalog(&text);
    assert_eq!(catalog.len(), 3);

    let observer = Settings::default().site("ctio").unwrap();
    let start = iss_epoch();
    let forecast = PassPredictor::default()
        .forecast(&catalog, &observer, start, start + Duration::from_days(1.0), &CancellationToken::new())
        .unwrap();
    assert!(forecast.passes.iter().any(|p| p.name() == "ISS (ZARYA)"));
    assert_eq!(forecast.skipped.len(), 1);
    assert_eq!(forecast.skipped[0].name, "MINOTAUR R/B");
    assert!(matches!(forecast.skipped[0].error, PredictionError::Propagation { .. }));
}
