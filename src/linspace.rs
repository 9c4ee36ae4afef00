use num::Float;

/// Evenly spaced samples over a closed interval, end point included.
pub struct Linspace<F> {
    start: F,
    end: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub fn new(min: F, max: F, n: usize) -> Self {
        let step = match F::from(n.saturating_sub(1)) {
            Some(num_steps) if n > 1 => (max - min) / num_steps,
            _ => F::zero(),
        };

        Linspace {
            start: min,
            end: max,
            step,
            index: 0,
            len: n,
        }
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            return None;
        }

        // Calculate the value just like numpy.linspace does, which pins the
        // last sample to the end point
        let i = self.index;
        self.index += 1;

        if i + 1 == self.len && i > 0 {
            return Some(self.end);
        }

        Some(self.start + self.step * F::from(i)?)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace() {
    let values: Vec<f64> = Linspace::new(-1., 1., 5).collect();

    assert_eq!(values, vec![-1., -0.5, 0., 0.5, 1.]);
    assert_eq!(Linspace::new(2.0f32, 3., 1).collect::<Vec<_>>(), vec![2.]);
    assert_eq!(Linspace::new(0.0f64, 1., 0).count(), 0);
    assert_eq!(Linspace::new(-0.5, 0.5, 100).last(), Some(0.5));
    assert_eq!(Linspace::new(-0.5f64, 0.5, 100).len(), 100);
}
