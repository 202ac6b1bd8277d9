use beam_core::{Element, ElementKind, ElementSelector, Lattice, RefPoints};
use beam_errors::{
    assign_errors, enable_errors, find_orbit_err, get_optics_err, track_err, AssignOptions,
    EnableFlags, ErrorSpec, ErrorTable,
};
use beam_phys::{LinearModel, OrbitSolver};

fn two_element_line() -> Lattice {
    Lattice::new(
        "line",
        3.0e9,
        vec![Element::monitor("BPM"), Element::dipole("BEND", 1.0, 5.0e-3)],
    )
}

fn assign_scenario(ring: &mut Lattice) {
    let options = AssignOptions {
        truncation: None,
        seed: 2024,
    };
    assign_errors(
        ring,
        &ElementSelector::Kind(ElementKind::Monitor),
        &ErrorTable::new().bpm_offset(ErrorSpec::systematic([1.0e-4, -1.0e-4])),
        &options,
    )
    .unwrap();
    assign_errors(
        ring,
        &ElementSelector::Kind(ElementKind::Dipole),
        &ErrorTable::new().shift_err(ErrorSpec::systematic([2.0e-4, 0.0])),
        &options,
    )
    .unwrap();
}

#[test]
fn orbit_at_the_monitor_is_shifted_by_its_offset() {
    let model = LinearModel::default();
    let mut ring = two_element_line();
    assign_scenario(&mut ring);
    let snapshot = ring.clone();

    let unperturbed = model
        .find_orbit(&two_element_line(), &RefPoints::All)
        .map(|r| r.orbit)
        .unwrap();
    let result = find_orbit_err(&model, &ring, &RefPoints::All, &EnableFlags::default()).unwrap();

    assert!((result.orbit[0][0] - (unperturbed[0][0] + 1.0e-4)).abs() < 1e-15);
    assert!((result.orbit[0][2] - (unperturbed[0][2] - 1.0e-4)).abs() < 1e-15);
    // The caller's lattice is attribute-for-attribute unchanged.
    assert_eq!(ring, snapshot);
}

#[test]
fn the_dipole_is_displaced_only_in_the_perturbed_machine() {
    let mut ring = two_element_line();
    assign_scenario(&mut ring);
    let perturbed = enable_errors(&ring, &EnableFlags::default());
    assert_eq!(perturbed.ring().element(1).shift, [2.0e-4, 0.0]);
    assert_eq!(ring.element(1).shift, [0.0; 2]);
}

#[test]
fn optics_closed_orbit_is_distorted_but_optics_functions_are_not() {
    let model = LinearModel::default();
    let mut ring = two_element_line();
    assign_scenario(&mut ring);

    let result = get_optics_err(&model, &ring, &RefPoints::All, &EnableFlags::default()).unwrap();
    assert!((result.elements[0].closed_orbit[0] - 1.0e-4).abs() < 1e-15);
    assert!((result.elements[0].closed_orbit[2] + 1.0e-4).abs() < 1e-15);
    assert_eq!(result.elements[0].beta, LinearModel::default().beta);
    assert_eq!(result.ring.tunes, LinearModel::default().tunes);
}

#[test]
fn tracking_readings_are_distorted_on_every_turn() {
    let model = LinearModel::default();
    let mut ring = two_element_line();
    assign_scenario(&mut ring);

    let result = track_err(
        &model,
        &ring,
        &[[0.0; 6]],
        3,
        &RefPoints::Indices(vec![0]),
        &EnableFlags::default(),
    )
    .unwrap();
    for turn in 0..3 {
        let sample = result.at(0, 0, turn).unwrap();
        assert!((sample[0] - 1.0e-4).abs() < 1e-15);
        assert!((sample[2] + 1.0e-4).abs() < 1e-15);
    }
}

#[test]
fn monitor_gain_scales_the_perturbed_orbit() {
    let model = LinearModel::default();
    let mut quad = Element::quadrupole("QF", 0.5, 2.0);
    quad.shift_err = Some([1.0e-3, 0.0]);
    let mut bpm = Element::monitor("BPM");
    bpm.bpm_gain = Some([2.0, 2.0]);
    let ring = Lattice::new(
        "line",
        3.0e9,
        vec![quad, Element::drift("DR", 2.0), bpm],
    );

    let result = find_orbit_err(&model, &ring, &RefPoints::All, &EnableFlags::default()).unwrap();
    // Quadrupole kick k1 * L * dx propagated through the drift, then scaled
    // by the monitor gain.
    let kick = 2.0 * 0.5 * 1.0e-3;
    let beam_x = kick * 2.0;
    assert!((result.orbit[2][0] - 2.0 * beam_x).abs() < 1e-15);
    assert_eq!(result.orbit[2][2], 0.0);
}

#[test]
fn disabling_magnet_errors_leaves_only_monitor_errors_active() {
    let model = LinearModel::default();
    let mut ring = two_element_line();
    assign_scenario(&mut ring);

    let result = find_orbit_err(&model, &ring, &RefPoints::All, &EnableFlags::none()).unwrap();
    assert!((result.orbit[0][0] - 1.0e-4).abs() < 1e-15);
    let perturbed = enable_errors(&ring, &EnableFlags::none());
    assert_eq!(perturbed.ring().element(1).shift, [0.0; 2]);
}
