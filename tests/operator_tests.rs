use approx::assert_relative_eq;
use ottofm::synth::envelope::Stage;
use ottofm::synth::{Action, ActionReceiver, Dispatch, Operator, OperatorParam, Tables, RATIOS};

const SAMPLE_RATE: f32 = 48000.0;

fn operator(index: usize) -> Operator {
    Operator::new(index, Tables::default(), SAMPLE_RATE)
}

#[test]
fn decay_and_release_do_not_depend_on_update_order() {
    let (s, dr) = (0.3, 0.8);

    let mut sustain_first = operator(0);
    sustain_first.set_sustain_position(s);
    sustain_first.set_decay_release(dr);

    let mut decay_first = operator(0);
    decay_first.set_decay_release(dr);
    decay_first.set_sustain_position(s);

    for op in [&sustain_first, &decay_first] {
        assert_relative_eq!(op.envelope().decay(), 3.0 * dr * (1.0 - s));
        assert_relative_eq!(op.envelope().release_time(), 3.0 * dr * s);
        assert_relative_eq!(op.envelope().sustain(), s);
    }
    assert_eq!(sustain_first, decay_first);
}

#[test]
fn attack_is_never_zero_length() {
    let mut op = operator(0);
    op.set_attack(0.0);
    assert_relative_eq!(op.envelope().attack(), 0.005);
    op.set_attack(1.0);
    assert_relative_eq!(op.envelope().attack(), 3.005);
}

#[test]
fn frequency_follows_ratio_and_detune() {
    let mut op = operator(1);
    op.set_base_frequency(220.0);
    op.set_ratio_index(9); // 2/1
    assert_relative_eq!(op.frequency(), 440.0);

    op.set_detune(0.2);
    assert_relative_eq!(op.frequency(), 445.0);

    // Order of setters does not matter.
    let mut other = operator(1);
    other.set_detune(0.2);
    other.set_ratio_index(9);
    other.set_base_frequency(220.0);
    assert_relative_eq!(other.frequency(), op.frequency());
    assert_eq!(op.ratio(), RATIOS[9]);
}

#[test]
fn setting_a_value_twice_changes_nothing() {
    let setters: Vec<fn(&mut Operator)> = vec![
        |op| op.set_feedback(0.4),
        |op| op.set_attack(0.2),
        |op| op.set_sustain_position(0.6),
        |op| op.set_decay_release(0.3),
        |op| op.set_detune(-0.1),
        |op| op.set_ratio_index(3),
        |op| op.set_output_level(0.7),
        |op| op.set_fm_amount(0.5),
        |op| op.set_base_frequency(330.0),
    ];
    for set in setters {
        let mut op = operator(2);
        op.reset();
        set(&mut op);
        let snapshot = op.clone();
        set(&mut op);
        assert_eq!(op, snapshot);

        let mut copy = snapshot.clone();
        let a: Vec<f32> = (0..32).map(|_| op.value(0.1)).collect();
        let b: Vec<f32> = (0..32).map(|_| copy.value(0.1)).collect();
        assert_eq!(a, b);
    }
}

#[test]
fn modulator_output_is_scaled_by_envelope_and_depth() {
    let mut op = operator(3);
    op.set_modulator(true);
    op.set_output_level(0.5);
    op.set_fm_amount(0.5);
    // Idle envelope: a modulator is silent.
    for _ in 0..16 {
        assert_eq!(op.value(0.5), 0.0);
    }

    op.reset();
    for _ in 0..4800 {
        let v = op.value(0.0);
        assert!(v.abs() <= 0.25 + 1e-6);
    }
}

#[test]
fn carrier_ignores_its_envelope_and_remembers_its_output() {
    let mut op = operator(0);
    op.set_output_level(0.8);
    op.set_base_frequency(1000.0);
    let first = op.value(0.5); // quarter-cycle offset at phase 0
    assert_relative_eq!(first, 0.8, epsilon = 1e-5);
    assert_relative_eq!(op.previous_output(), first);
}

#[test]
fn activity_level_tracks_envelope_times_level() {
    let mut op = operator(0);
    assert_eq!(op.activity_level(), 0.0);
    op.set_output_level(0.5);
    op.reset();
    for _ in 0..SAMPLE_RATE as usize {
        op.value(0.0);
    }
    // Attack done, sustain position defaults to 1.
    assert_relative_eq!(op.activity_level(), 0.5);

    op.finish();
    assert_eq!(op.envelope().stage(), Stage::Idle);
    assert_eq!(op.activity_level(), 0.0);
}

#[test]
fn only_answers_to_its_own_index() {
    let mut op = operator(2);
    assert_eq!(
        op.action(Action::operator(1, OperatorParam::OutputLevel(0.1))),
        Dispatch::Ignored
    );
    assert_eq!(
        op.action(Action::operator(2, OperatorParam::OutputLevel(0.1))),
        Dispatch::Handled
    );
    assert_eq!(op.action(Action::FmAmount(0.3)), Dispatch::Ignored);
    assert_eq!(op.action(Action::Algorithm(2)), Dispatch::Ignored);
    assert_relative_eq!(op.activity_level(), 0.0);
}
