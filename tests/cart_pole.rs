use std::io;
use std::sync::{Arc, Mutex};
use std::thread;

use approx::assert_relative_eq;
use fuzzy_control::diagnostics::{sample, DEFAULT_POINTS};
use fuzzy_control::{
    and_of, CartPoleController, Engine, EngineConfig, Error, FuzzySet, Membership, Observation, Rules, SharedSet,
    Thrust,
};

const CART_POLE_TOML: &str = include_str!("../configs/cart_pole.toml");

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Log sink shared between a test and its subscriber.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn shipped_config_matches_preset() {
    let parsed = EngineConfig::from_toml_str(CART_POLE_TOML).unwrap();

    assert_eq!(parsed, EngineConfig::cart_pole());
}

#[test]
fn angle_and_rate_left_push_hard_left() {
    init_tracing();

    let theta_neg: SharedSet = Arc::new(FuzzySet::z_shape(-0.01, 0.01).unwrap().named("theta_neg"));
    let theta_dot_neg: SharedSet = Arc::new(
        FuzzySet::z_shape(-0.5, 0.5)
            .unwrap()
            .named("theta_dot_neg")
            .on_channel(1),
    );
    let mut rules = Rules::new();

    rules.add(
        Arc::new(and_of(theta_neg, theta_dot_neg)),
        Arc::new(FuzzySet::constant(-2.5).unwrap()),
    );

    let engine = Engine::new(rules).unwrap();

    assert_eq!(engine.firings(&[-0.02, -0.6, 0., 0.]).unwrap()[0].strength, 1.);
    assert_eq!(engine.output(&[-0.02, -0.6, 0., 0.]).unwrap(), -2.5);
}

#[test]
fn empty_engine_fails_at_construction() {
    assert!(matches!(Engine::new(Rules::new()), Err(Error::EmptyRuleBase)));

    let config = EngineConfig {
        rules: Vec::new(),
        ..EngineConfig::cart_pole()
    };

    assert!(matches!(config.build(), Err(Error::EmptyRuleBase)));
}

#[test]
fn preset_is_antisymmetric() {
    init_tracing();

    let engine = EngineConfig::cart_pole().build().unwrap();
    let inputs = [
        [0.005, 0.2, 0.1, -0.3],
        [0.02, -0.1, -0.5, 0.25],
        [-0.003, 0.45, 0.2, 0.1],
    ];

    for input in inputs {
        let mirrored = input.map(|x| -x);

        assert_relative_eq!(
            engine.output(&input).unwrap(),
            -engine.output(&mirrored).unwrap(),
            epsilon = 1e-12
        );
    }
}

#[test]
fn preset_rejects_short_inputs() {
    let engine = EngineConfig::cart_pole().build().unwrap();

    assert!(matches!(
        engine.output(&[0., 0.]),
        Err(Error::ChannelOutOfRange { channel: 2, len: 2 })
    ));
}

#[test]
fn shared_engine_across_threads() {
    let engine = Arc::new(EngineConfig::cart_pole().build().unwrap());
    let input = [0.004, -0.2, 0.15, 0.05];
    let expected = engine.output(&input).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.output(&input).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn controller_tracks_a_moving_setpoint() {
    init_tracing();

    let mut controller = CartPoleController::new(EngineConfig::cart_pole().build().unwrap());
    let at_rest = Observation::default();

    assert_eq!(controller.step(&at_rest).unwrap(), 0.);

    controller.set_setpoint(1.);

    let force = controller.step(&at_rest).unwrap();

    // position error is -1: cart_position_neg fires fully, cart_position_pos not at all
    assert!(force < 0.);
    assert_eq!(Thrust::from_force(force), Thrust::Left);
    assert_eq!(controller.trace().setpoints, vec![0., 1.]);
}

#[test]
fn sample_reference_sets() {
    let config = EngineConfig::cart_pole();
    let engine = config.build().unwrap();
    let rule = &engine.rules()[0];
    let sets: [&dyn Membership; 1] = [&**rule.antecedent()];
    let samples = sample(&sets, -0.5..=0.5, DEFAULT_POINTS, &[0.]);

    assert_eq!(samples[0].name, "(theta_neg and theta_dot_neg)");
    assert_eq!(samples[0].points.len(), DEFAULT_POINTS + 1);
    assert_eq!(samples[0].points[0], (-0.5, 1.));
    assert_eq!(samples[0].points[DEFAULT_POINTS], (0.5, 0.));
}

#[test]
fn evaluation_trace_reports_rule_strengths() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let engine = EngineConfig::cart_pole().build().unwrap();

    tracing::subscriber::with_default(subscriber, || {
        engine.output(&[-0.02, -0.6, 0., 0.]).unwrap();
    });

    let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();

    assert!(logs.contains("defuzzified"), "{logs}");
    assert!(logs.contains("firings=[Firing { strength: 1.0, value: -2.5 }"), "{logs}");
}

#[test]
fn resting_cart_is_pushed_left() {
    let mut controller = CartPoleController::new(EngineConfig::cart_pole().build().unwrap());
    let force = controller.step(&Observation::default()).unwrap();

    assert_eq!(force, 0.);
    assert_eq!(Thrust::from_force(force), Thrust::Left);
    assert_eq!(Thrust::from_force(force).action(), 0);
}
