use beam_core::{Element, Lattice, RefPoints};
use beam_errors::{apply_monitor_errors, apply_monitor_errors_tracking};
use beam_phys::TrackingResult;

fn monitor_with(
    gain: Option<[f64; 2]>,
    offset: Option<[f64; 2]>,
    tilt: Option<f64>,
) -> Lattice {
    let mut bpm = Element::monitor("bpm");
    bpm.bpm_gain = gain;
    bpm.bpm_offset = offset;
    bpm.bpm_tilt = tilt;
    Lattice::new("line", 1.0e9, vec![bpm])
}

#[test]
fn transform_order_is_tilt_then_gain_then_offset() {
    let theta = 0.3_f64;
    let ring = monitor_with(Some([2.0, 1.0]), Some([0.001, -0.002]), Some(theta));
    let beam = [1.0e-3, 0.0];

    let mut orbit = [[beam[0], 0.0, beam[1], 0.0, 0.0, 0.0]];
    apply_monitor_errors(&ring, &RefPoints::All, &mut orbit).unwrap();

    // offset + gain .* (Rotate(theta) * beam), in that literal order.
    let rotated = [
        theta.cos() * beam[0] + theta.sin() * beam[1],
        -theta.sin() * beam[0] + theta.cos() * beam[1],
    ];
    let expected = [2.0 * rotated[0] + 0.001, 1.0 * rotated[1] - 0.002];
    assert!((orbit[0][0] - expected[0]).abs() < 1e-15);
    assert!((orbit[0][2] - expected[1]).abs() < 1e-15);

    // The reversed composition differs for this fixture.
    let reversed = [
        theta.cos() * (2.0 * beam[0] + 0.001) + theta.sin() * (beam[1] - 0.002),
        -theta.sin() * (2.0 * beam[0] + 0.001) + theta.cos() * (beam[1] - 0.002),
    ];
    assert!((orbit[0][0] - reversed[0]).abs() > 1e-6);
}

#[test]
fn each_parameter_is_independently_optional() {
    let beam = [1.0e-3, -2.0e-3];

    let ring = monitor_with(Some([2.0, 3.0]), None, None);
    let mut orbit = [[beam[0], 0.0, beam[1], 0.0, 0.0, 0.0]];
    apply_monitor_errors(&ring, &RefPoints::All, &mut orbit).unwrap();
    assert_eq!(orbit[0][0], 2.0e-3);
    assert_eq!(orbit[0][2], -6.0e-3);

    let ring = monitor_with(None, Some([1.0e-4, 1.0e-4]), None);
    let mut orbit = [[beam[0], 0.0, beam[1], 0.0, 0.0, 0.0]];
    apply_monitor_errors(&ring, &RefPoints::All, &mut orbit).unwrap();
    assert!((orbit[0][0] - 1.1e-3).abs() < 1e-15);

    // No parameters at all: identity.
    let ring = monitor_with(None, None, None);
    let mut orbit = [[beam[0], 0.0, beam[1], 0.0, 0.0, 0.0]];
    apply_monitor_errors(&ring, &RefPoints::All, &mut orbit).unwrap();
    assert_eq!(orbit[0][0], beam[0]);
    assert_eq!(orbit[0][2], beam[1]);
}

#[test]
fn longitudinal_planes_pass_through() {
    let ring = monitor_with(Some([2.0, 2.0]), Some([1.0e-4, 1.0e-4]), Some(0.1));
    let mut orbit = [[1.0e-3, 5.0e-4, -1.0e-3, -5.0e-4, 1.0e-2, 3.0e-1]];
    apply_monitor_errors(&ring, &RefPoints::All, &mut orbit).unwrap();
    assert_eq!(orbit[0][1], 5.0e-4);
    assert_eq!(orbit[0][3], -5.0e-4);
    assert_eq!(orbit[0][4], 1.0e-2);
    assert_eq!(orbit[0][5], 3.0e-1);
}

#[test]
fn sample_count_mismatch_is_rejected() {
    let ring = monitor_with(Some([2.0, 2.0]), None, None);
    let mut orbit = [[0.0; 6], [0.0; 6]];
    let err = apply_monitor_errors(&ring, &RefPoints::All, &mut orbit).unwrap_err();
    assert_eq!(err.info().code, "monitor-samples");
}

#[test]
fn end_of_line_reference_points_pass_through() {
    let ring = monitor_with(Some([2.0, 2.0]), None, None);
    let mut orbit = [[1.0e-3, 0.0, 0.0, 0.0, 0.0, 0.0]];
    apply_monitor_errors(&ring, &RefPoints::End, &mut orbit).unwrap();
    assert_eq!(orbit[0][0], 1.0e-3);
}

#[test]
fn tracking_transform_applies_per_particle_and_turn() {
    let ring = monitor_with(None, Some([1.0e-4, -1.0e-4]), None);
    let mut result = TrackingResult::zeros(2, 1, 3);
    for particle in 0..2 {
        for turn in 0..3 {
            let sample = result.at_mut(particle, 0, turn).unwrap();
            sample[0] = (particle + 1) as f64 * 1.0e-3 * (turn + 1) as f64;
            sample[2] = -1.0e-3;
        }
    }
    apply_monitor_errors_tracking(&ring, &RefPoints::All, &mut result).unwrap();
    for particle in 0..2 {
        for turn in 0..3 {
            let sample = result.at(particle, 0, turn).unwrap();
            let beam_x = (particle + 1) as f64 * 1.0e-3 * (turn + 1) as f64;
            assert!((sample[0] - (beam_x + 1.0e-4)).abs() < 1e-15);
            assert!((sample[2] - (-1.0e-3 - 1.0e-4)).abs() < 1e-15);
        }
    }
}
