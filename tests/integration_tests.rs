use bike_traffic::app::App;
use bike_traffic::stations::parse_stations;
use bike_traffic::traffic::window::TimeFilter;
use bike_traffic::trips::parse_trips;

fn loaded_app() -> App {
    let stations = parse_stations(include_bytes!("fixtures/stations.json"))
        .expect("Failed to parse stations fixture");
    let trips =
        parse_trips(include_bytes!("fixtures/trips.csv")).expect("Failed to parse trips fixture");

    let mut app = App::new();
    app.set_stations(stations);
    app.set_trips(trips);
    app
}

#[test]
fn test_full_pipeline_unfiltered() {
    let app = loaded_app();

    // The bad-timestamp row is dropped, the rest load.
    assert_eq!(app.trips().len(), 3);
    assert_eq!(app.stations().len(), 3);

    let frame = app.frame();
    assert_eq!(frame.time_label, "any time");
    assert_eq!(frame.markers.len(), 3);

    // A32000: 3 departures, 1 arrival; B32012: 0 departures, 2 arrivals.
    let a = &frame.markers[0];
    let b = &frame.markers[1];
    assert_eq!((a.departures, a.arrivals, a.total_traffic), (3, 1, 4));
    assert_eq!((b.departures, b.arrivals, b.total_traffic), (0, 2, 2));
    assert!(a.radius > b.radius);
    assert_eq!(a.radius, 10.0);

    // The id-less station renders with zero counts at the range floor.
    let c = &frame.markers[2];
    assert_eq!(c.total_traffic, 0);
    assert_eq!(c.radius, 0.5);

    for marker in &frame.markers {
        assert_eq!(marker.total_traffic, marker.departures + marker.arrivals);
    }
}

#[test]
fn test_full_pipeline_windowed_across_midnight() {
    let mut app = loaded_app();
    app.set_filter(TimeFilter::Minute(0));

    // Only the 23:50 → 00:10 trip touches the midnight window.
    let frame = app.frame();
    assert_eq!(frame.time_label, "12:00 AM");
    let a = &frame.markers[0];
    assert_eq!((a.departures, a.arrivals), (1, 1));
    assert_eq!(frame.markers[1].total_traffic, 0);

    // Filtered range applies: the busiest station sits at the new ceiling.
    assert_eq!(a.radius, 20.0);
}

#[test]
fn test_filter_change_is_a_clean_recompute() {
    let mut app = loaded_app();

    let before = app.frame();
    app.set_filter(TimeFilter::Minute(500));
    let _ = app.frame();
    app.set_filter(TimeFilter::All);
    let after = app.frame();

    for (m1, m2) in before.markers.iter().zip(after.markers.iter()) {
        assert_eq!(m1.total_traffic, m2.total_traffic);
        assert_eq!(m1.radius, m2.radius);
    }
}

#[test]
fn test_sweep_covers_the_day() {
    let app = loaded_app();
    let frames = app.sweep(120);

    assert_eq!(frames.len(), 12);
    assert_eq!(frames.first().map(|f| f.time_filter), Some(0));
    assert_eq!(frames.last().map(|f| f.time_filter), Some(1320));

    // The 8 AM frame sees both morning trips; midnight sees the wrap trip.
    let morning = &frames[4];
    assert_eq!(morning.time_label, "8:00 AM");
    assert_eq!(morning.markers[0].departures, 2);
    assert_eq!(frames[0].markers[0].departures, 1);
}
