use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use ottofm::synth::{
    midi_note_to_frequency, Action, ActionReceiver, ActionSink, Engine, EngineConfig, EngineError,
    OperatorParam, PresetSelector, FACTORY_PRESETS, OPERATOR_COUNT,
};

const BLOCK: usize = 128;

fn config() -> EngineConfig {
    EngineConfig {
        sample_rate: 48000.0,
        block_size: BLOCK,
        ..EngineConfig::default()
    }
}

fn render(engine: &mut Engine, blocks: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(blocks * BLOCK);
    let mut block = [0.0f32; BLOCK];
    for _ in 0..blocks {
        engine.process(&mut block);
        out.extend_from_slice(&block);
    }
    out
}

#[test]
fn rejects_invalid_config() {
    let bad = EngineConfig {
        voice_count: 0,
        ..config()
    };
    assert!(matches!(Engine::new(bad), Err(EngineError::InvalidConfig(_))));

    let bad = EngineConfig {
        sample_rate: -1.0,
        ..config()
    };
    assert!(matches!(Engine::new(bad), Err(EngineError::InvalidConfig(_))));
}

#[test]
fn silent_without_notes() {
    let (mut engine, controller) = Engine::new(config()).unwrap();
    let out = render(&mut engine, 4);
    assert!(out.iter().all(|s| *s == 0.0));
    for op in 0..OPERATOR_COUNT {
        assert_eq!(controller.activity_level(op), 0.0);
    }
    assert_eq!(engine.name(), "OTTO.FM");
}

#[test]
fn output_stays_in_range_across_a_steal() {
    let (mut engine, mut controller) = Engine::new(config()).unwrap();
    let voices = engine.pool().voice_count();
    controller.send(Action::Algorithm(10)).unwrap();
    for note in 0..voices as u8 {
        controller
            .note_on(48 + note * 3, midi_note_to_frequency(48 + note * 3))
            .unwrap();
    }
    let before = render(&mut engine, 40);
    assert_eq!(engine.pool().active_count(), voices);

    controller.note_on(100, midi_note_to_frequency(100)).unwrap();
    let after = render(&mut engine, 2);
    assert_eq!(engine.pool().active_count(), voices);
    assert_eq!(engine.pool().find_note(48), None);
    assert!(engine.pool().find_note(100).is_some());

    for s in before.iter().chain(after.iter()) {
        assert!(s.is_finite());
        assert!((-1.0..=1.0).contains(s), "sample {} out of range", s);
    }
}

#[test]
fn queued_change_only_affects_the_next_block() {
    let (mut changed, mut changed_ctl) = Engine::new(config()).unwrap();
    let (mut reference, mut reference_ctl) = Engine::new(config()).unwrap();
    for ctl in [&mut changed_ctl, &mut reference_ctl] {
        ctl.note_on(69, 440.0).unwrap();
    }

    let mut a = [0.0f32; BLOCK];
    let mut b = [0.0f32; BLOCK];
    for _ in 0..20 {
        changed.process(&mut a);
        reference.process(&mut b);
    }
    assert_eq!(a, b);

    // Arrives while the block above is already rendered.
    changed_ctl
        .send(Action::operator(0, OperatorParam::OutputLevel(0.0)))
        .unwrap();
    assert_eq!(a, b);

    changed.process(&mut a);
    reference.process(&mut b);
    assert_ne!(a, b);
    assert!(a.iter().all(|s| *s == 0.0));
}

#[test]
fn meters_follow_the_last_triggered_voice() {
    let (mut engine, mut controller) = Engine::new(config()).unwrap();
    let meters = controller.meters();

    controller.send(Action::Release(0.0)).unwrap();
    controller.note_on(60, 261.63).unwrap();
    render(&mut engine, 4);
    assert_eq!(engine.last_voice(), Some(0));
    for op in 0..OPERATOR_COUNT {
        let level = meters.activity_level(op);
        assert!(level > 0.0 && level <= 1.0, "operator {} level {}", op, level);
    }

    controller
        .send(Action::operator(2, OperatorParam::OutputLevel(0.0)))
        .unwrap();
    render(&mut engine, 1);
    assert_eq!(controller.activity_level(2), 0.0);
    assert!(controller.activity_level(1) > 0.0);

    // Operator envelopes release over 3 s by default, but freeing the voice
    // silences them with the master envelope.
    controller.note_off(60).unwrap();
    render(&mut engine, 5);
    assert_eq!(engine.pool().active_count(), 0);
    assert_eq!(meters.levels(), [0.0; OPERATOR_COUNT]);
}

#[test]
fn routes_each_action_to_its_owner() {
    let (mut engine, _controller) = Engine::new(config()).unwrap();

    assert!(engine.action(Action::CurrentOperator(2)).is_handled());
    assert_eq!(engine.current_operator(), 2);

    assert!(engine
        .action(Action::NoteOn {
            note: 64,
            frequency: 329.63
        })
        .is_handled());
    assert_eq!(engine.pool().active_count(), 1);

    assert!(engine.action(Action::operator(3, OperatorParam::Detune(0.4))).is_handled());
    let voice = &engine.pool().voices()[0];
    assert!((voice.operator(3).frequency() - (329.63 + 10.0)).abs() < 1e-2);
    assert!((voice.operator(2).frequency() - 329.63).abs() < 1e-2);

    assert!(engine.action(Action::FmAmount(0.2)).is_handled());
    assert!(engine.action(Action::NoteOff { note: 64 }).is_handled());
    assert!(engine.pool().voices()[0].is_releasing());

    // Unknown notes are still owned by the engine, just a no-op.
    assert!(engine.action(Action::NoteOff { note: 1 }).is_handled());
}

#[test]
fn full_queue_is_reported_to_the_control_side() {
    let (mut engine, mut controller) = Engine::new(EngineConfig {
        queue_capacity: 2,
        ..config()
    })
    .unwrap();
    controller.send(Action::FmAmount(0.5)).unwrap();
    controller.send(Action::FmAmount(0.6)).unwrap();
    assert_eq!(
        controller.send(Action::FmAmount(0.7)),
        Err(EngineError::QueueFull)
    );
    assert_eq!(controller.capacity_left(), 0);

    render(&mut engine, 1);
    assert_eq!(controller.capacity_left(), 2);
    controller.send(Action::FmAmount(0.7)).unwrap();
}

#[test]
fn presets_apply_through_actions() {
    let mut selector = PresetSelector::default();
    assert_eq!(selector.current_preset(), 0);
    assert_eq!(selector.name(), "Init");
    assert_eq!(selector.preset_names().count(), FACTORY_PRESETS.len());

    let (mut engine, mut controller) = Engine::new(config()).unwrap();

    // Directly on the render side.
    selector.apply_preset(&mut engine, 2).unwrap();
    assert_eq!(selector.current_preset(), 2);
    assert_eq!(selector.name(), "Bell");
    assert_eq!(engine.algorithm(), 3);

    // Through the queue: visible after the next block.
    selector.apply_preset(&mut controller, 4).unwrap();
    assert_eq!(engine.algorithm(), 3);
    render(&mut engine, 1);
    assert_eq!(engine.algorithm(), 10);

    assert_eq!(
        selector.apply_preset(&mut engine, 99),
        Err(EngineError::UnknownPreset(99))
    );
    assert_eq!(selector.current_preset(), 4);
}

#[test]
fn every_preset_renders_in_range() {
    for id in 0..FACTORY_PRESETS.len() {
        let (mut engine, _controller) = Engine::new(config()).unwrap();
        PresetSelector::default()
            .apply_preset(&mut engine, id)
            .unwrap();
        for note in [36u8, 60, 64, 67, 84] {
            engine.note_on(note, midi_note_to_frequency(note));
        }
        let out = render(&mut engine, 20);
        assert!(out.iter().any(|s| *s != 0.0), "preset {} is silent", id);
        assert!(out.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    }
}

#[test]
fn voice_and_engine_setters_are_idempotent() {
    let changes = [
        Action::Attack(0.3),
        Action::Decay(0.4),
        Action::Sustain(0.5),
        Action::Release(0.2),
        Action::FmAmount(0.7),
        Action::Algorithm(4),
    ];
    let (mut once, _once_ctl) = Engine::new(config()).unwrap();
    let (mut twice, _twice_ctl) = Engine::new(config()).unwrap();
    for action in changes {
        let _ = once.action(action);
        let _ = twice.action(action);
        let _ = twice.action(action);
    }
    assert_eq!(once.algorithm(), twice.algorithm());

    once.note_on(57, midi_note_to_frequency(57));
    twice.note_on(57, midi_note_to_frequency(57));
    assert_eq!(render(&mut once, 20), render(&mut twice, 20));

    once.note_off(57);
    twice.note_off(57);
    assert_eq!(render(&mut once, 20), render(&mut twice, 20));
}

#[test]
fn interleaved_rendering_is_one_block_per_callback() {
    let (mut mono, _mono_ctl) = Engine::new(config()).unwrap();
    let (mut stereo, _stereo_ctl) = Engine::new(config()).unwrap();
    mono.note_on(69, 440.0);
    stereo.note_on(69, 440.0);

    let mut scratch = vec![0.0f32; 1024];
    let mut data = vec![0.0f32; BLOCK * 2];
    assert_eq!(stereo.render_interleaved(&mut scratch, &mut data, 2), 1);

    let mut expected = [0.0f32; BLOCK];
    mono.process(&mut expected);
    for (frame, sample) in data.chunks(2).zip(expected.iter()) {
        assert_eq!(frame[0], *sample);
        assert_eq!(frame[1], *sample);
    }

    // Longer than the scratch buffer: split into whole blocks.
    let mut scratch = vec![0.0f32; BLOCK];
    let mut data = vec![0.0f32; BLOCK * 3 * 2];
    assert_eq!(stereo.render_interleaved(&mut scratch, &mut data, 2), 3);
    assert_eq!(stereo.render_interleaved(&mut scratch, &mut data, 0), 0);
}

#[test]
fn meters_can_be_read_while_rendering() {
    let (mut engine, mut controller) = Engine::new(config()).unwrap();
    let meters = controller.meters();
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut reads = 0usize;
            loop {
                for level in meters.levels() {
                    assert!((0.0..=1.0).contains(&level), "level {}", level);
                }
                reads += 1;
                if done.load(Ordering::Acquire) {
                    return reads;
                }
            }
        })
    };

    let mut block = [0.0f32; BLOCK];
    for i in 0..2000 {
        match i % 200 {
            0 => controller.note_on(60, 261.63).unwrap(),
            100 => controller.note_off(60).unwrap(),
            _ => {}
        }
        engine.process(&mut block);
    }
    done.store(true, Ordering::Release);

    assert!(reader.join().unwrap() > 0);
}
