//! Control loop bookkeeping for a cart-pole plant.
//!
//! The plant itself, time stepping and rendering belong to the caller. This
//! module turns observations into engine inputs, tracks the position setpoint
//! and keeps a trace of every cycle.

use tracing::trace;

use crate::error::Result;
use crate::inference::Engine;

/// One sensor reading of the cart-pole plant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Observation {
    /// Cart position in meters
    pub position: f64,
    /// Cart velocity in meters per second
    pub velocity: f64,
    /// Pole angle in radians, zero is upright
    pub angle: f64,
    /// Pole angular velocity in radians per second
    pub angular_velocity: f64,
}

impl Observation {
    /// From `[position, velocity, angle, angular velocity]`, the order gym's
    /// CartPole environments report.
    pub fn from_array([position, velocity, angle, angular_velocity]: [f64; 4]) -> Self {
        Observation {
            position,
            velocity,
            angle,
            angular_velocity,
        }
    }
}

/// Binary actuator command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Thrust {
    Left,
    Right,
}

impl Thrust {
    /// Positive forces push right, everything else (zero included) pushes left.
    pub fn from_force(force: f64) -> Self {
        if force > 0. {
            Thrust::Right
        } else {
            Thrust::Left
        }
    }

    /// Discrete action index: 0 pushes left, 1 pushes right.
    pub fn action(self) -> usize {
        match self {
            Thrust::Left => 0,
            Thrust::Right => 1,
        }
    }
}

/// Per cycle history of a control run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trace {
    pub applied_forces: Vec<f64>,
    pub angles: Vec<f64>,
    pub angular_velocities: Vec<f64>,
    pub positions: Vec<f64>,
    pub setpoints: Vec<f64>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.applied_forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied_forces.is_empty()
    }

    fn record(&mut self, observation: &Observation, setpoint: f64, force: f64) {
        self.applied_forces.push(force);
        self.angles.push(observation.angle);
        self.angular_velocities.push(observation.angular_velocity);
        self.positions.push(observation.position);
        self.setpoints.push(setpoint);
    }
}

/// Feeds observations through an [`Engine`] and records the results.
#[derive(Debug)]
pub struct CartPoleController {
    engine: Engine,
    setpoint: f64,
    trace: Trace,
}

impl CartPoleController {
    /// Holds the cart around position zero.
    pub fn new(engine: Engine) -> Self {
        CartPoleController {
            engine,
            setpoint: 0.,
            trace: Trace::default(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    /// Cart position to hold from the next cycle on.
    pub fn set_setpoint(&mut self, setpoint: f64) {
        self.setpoint = setpoint;
    }

    /// Engine input for an observation: the cart position is given relative
    /// to the setpoint.
    pub fn inputs(&self, observation: &Observation) -> [f64; 4] {
        [
            observation.angle,
            observation.angular_velocity,
            observation.position - self.setpoint,
            observation.velocity,
        ]
    }

    /// Runs one control cycle and returns the force to apply.
    pub fn step(&mut self, observation: &Observation) -> Result<f64> {
        let inputs = self.inputs(observation);
        let force = self.engine.output(&inputs)?;

        trace!(?observation, setpoint = self.setpoint, force, "control step");

        self.trace.record(observation, self.setpoint, force);

        Ok(force)
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Hands back the recorded history and starts a fresh one.
    pub fn take_trace(&mut self) -> Trace {
        std::mem::take(&mut self.trace)
    }
}

#[cfg(test)]
fn controller() -> CartPoleController {
    CartPoleController::new(crate::config::EngineConfig::cart_pole().build().unwrap())
}

#[test]
fn test_thrust() {
    assert_eq!(Thrust::from_force(-0.1), Thrust::Left);
    assert_eq!(Thrust::from_force(0.), Thrust::Left);
    assert_eq!(Thrust::from_force(-0.), Thrust::Left);
    assert_eq!(Thrust::from_force(f64::MIN_POSITIVE), Thrust::Right);
    assert_eq!(Thrust::from_force(2.5).action(), 1);
    assert_eq!(Thrust::Left.action(), 0);
}

#[test]
fn test_inputs_follow_setpoint() {
    let mut controller = controller();
    let observation = Observation::from_array([0.25, 0.1, -0.02, 0.3]);

    assert_eq!(controller.inputs(&observation), [-0.02, 0.3, 0.25, 0.1]);

    controller.set_setpoint(1.);

    assert_eq!(controller.inputs(&observation), [-0.02, 0.3, -0.75, 0.1]);
}

#[test]
fn test_falling_left_pushes_left() {
    use approx::assert_relative_eq;

    let mut controller = controller();
    let observation = Observation {
        angle: -0.05,
        angular_velocity: -1.,
        ..Observation::default()
    };
    let force = controller.step(&observation).unwrap();

    // large_left fires fully, the cart rules sit at half strength each
    let expected = (-2.5 + 0.5 * (-0.6 + 0.6 - 1.25 + 1.25)) / 3.;

    assert_relative_eq!(force, expected, epsilon = 1e-12);
    assert_eq!(Thrust::from_force(force), Thrust::Left);
}

#[test]
fn test_trace() {
    let mut controller = controller();

    controller.step(&Observation::default()).unwrap();
    controller.set_setpoint(-1.);
    controller
        .step(&Observation::from_array([0.5, 0., 0., 0.]))
        .unwrap();

    let trace = controller.trace();

    assert_eq!(trace.len(), 2);
    assert_eq!(trace.setpoints, vec![0., -1.]);
    assert_eq!(trace.positions, vec![0., 0.5]);
    assert_eq!(trace.applied_forces[0], 0.);
    // a cart at rest gets a neutral force, quantized to a left push
    assert_eq!(Thrust::from_force(trace.applied_forces[0]).action(), 0);
    // cart is right of its setpoint
    assert!(trace.applied_forces[1] > 0.);

    let taken = controller.take_trace();

    assert_eq!(taken.len(), 2);
    assert!(controller.trace().is_empty());
}
