//! Easing functions for animations
//!
//! [`Easing`] holds the common curves as progress maps (`0..=1 -> 0..=1`).
//! [`EasingTable`] exposes them by name with the classic
//! `(elapsed, from, range, duration)` signature and accepts custom entries.

use crate::error::{AnimationError, Result};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Every named curve, in table order
    pub const NAMED: [Easing; 16] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
        Easing::EaseInExpo,
        Easing::EaseOutExpo,
        Easing::EaseInOutExpo,
    ];

    /// CSS `ease`
    pub const fn css_ease() -> Self {
        Easing::CubicBezier(0.25, 0.1, 0.25, 1.0)
    }

    /// Table name of a built-in curve
    pub fn name(&self) -> Option<&'static str> {
        let name = match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseInOutCubic => "easeInOutCubic",
            Easing::EaseInQuart => "easeInQuart",
            Easing::EaseOutQuart => "easeOutQuart",
            Easing::EaseInOutQuart => "easeInOutQuart",
            Easing::EaseInSine => "easeInSine",
            Easing::EaseOutSine => "easeOutSine",
            Easing::EaseInOutSine => "easeInOutSine",
            Easing::EaseInExpo => "easeInExpo",
            Easing::EaseOutExpo => "easeOutExpo",
            Easing::EaseInOutExpo => "easeInOutExpo",
            Easing::CubicBezier(..) => return None,
        };
        Some(name)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMED.into_iter().find(|e| e.name() == Some(name))
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::EaseInExpo => {
                if t <= 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Easing::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Easing::EaseInOutExpo => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }

    /// Evaluate with the `(elapsed, from, range, duration)` signature
    pub fn evaluate(&self, elapsed: f64, from: f64, range: f64, duration: f64) -> f64 {
        from + range * self.apply(elapsed / duration)
    }
}

/// CSS `cubic-bezier(x1, y1, x2, y2)` with end points `(0, 0)` and `(1, 1)`
fn cubic_bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let x = BezierAxis::new(x1, x2);
    let y = BezierAxis::new(y1, y2);
    y.at(x.solve(t))
}

const BEZIER_EPSILON: f64 = 1e-7;

/// One axis of the curve in polynomial form, `((a*s + b)*s + c)*s`
struct BezierAxis {
    a: f64,
    b: f64,
    c: f64,
}

impl BezierAxis {
    fn new(p1: f64, p2: f64) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        Self {
            a: 1.0 - c - b,
            b,
            c,
        }
    }

    fn at(&self, s: f64) -> f64 {
        ((self.a * s + self.b) * s + self.c) * s
    }

    fn derivative(&self, s: f64) -> f64 {
        (3.0 * self.a * s + 2.0 * self.b) * s + self.c
    }

    /// Parameter `s` with `at(s) == value`, for `value` in `0..=1`
    fn solve(&self, value: f64) -> f64 {
        let mut s = value;
        for _ in 0..8 {
            let error = self.at(s) - value;
            if error.abs() < BEZIER_EPSILON {
                return s;
            }
            let slope = self.derivative(s);
            if slope.abs() < BEZIER_EPSILON {
                break;
            }
            s -= error / slope;
        }

        // Newton diverged or stalled
        let (mut low, mut high) = (0.0_f64, 1.0_f64);
        s = value;
        while high - low > BEZIER_EPSILON {
            let current = self.at(s);
            if (current - value).abs() < BEZIER_EPSILON {
                break;
            }
            if current < value {
                low = s;
            } else {
                high = s;
            }
            s = (low + high) / 2.0;
        }
        s
    }
}

/// Named easing: `(elapsed, from, range, duration) -> value`
pub type EasingFn = Rc<dyn Fn(f64, f64, f64, f64) -> f64>;

/// Easing table shared between animators
pub type SharedEasingTable = Rc<RefCell<EasingTable>>;

/// Easing names handled without a table lookup
pub fn is_builtin_linear(name: &str) -> bool {
    name == "linear" || name == "swing"
}

/// Lookup table from easing name to function
#[derive(Clone, Default)]
pub struct EasingTable {
    functions: FxHashMap<String, EasingFn>,
}

impl EasingTable {
    /// Empty table; only `linear` and `swing` work without registration
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with every curve in [`Easing::NAMED`], plus CSS `ease` as `"ease"`
    pub fn standard() -> Self {
        let mut table = Self::new();
        for easing in Easing::NAMED {
            if let Some(name) = easing.name() {
                table.insert_easing(name, easing);
            }
        }
        table.insert_easing("ease", Easing::css_ease());
        table
    }

    pub fn shared(self) -> SharedEasingTable {
        Rc::new(RefCell::new(self))
    }

    /// Register a custom function under `name`, replacing any previous entry
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(f64, f64, f64, f64) -> f64 + 'static,
    {
        self.functions.insert(name.into(), Rc::new(function));
    }

    /// Register a curve under `name`
    pub fn insert_easing(&mut self, name: impl Into<String>, easing: Easing) {
        self.register(name, move |elapsed, from, range, duration| {
            easing.evaluate(elapsed, from, range, duration)
        });
    }

    pub fn get(&self, name: &str) -> Option<EasingFn> {
        self.functions.get(name).cloned()
    }

    /// Like [`get`](Self::get), failing with [`AnimationError::UnknownEasing`]
    pub fn resolve(&self, name: &str) -> Result<EasingFn> {
        self.get(name)
            .ok_or_else(|| AnimationError::UnknownEasing(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        is_builtin_linear(name) || self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for EasingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("EasingTable").field("functions", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_named_curves_hit_endpoints() {
        for easing in Easing::NAMED {
            assert!(approx(easing.apply(0.0), 0.0), "{easing:?} at 0");
            assert!(approx(easing.apply(1.0), 1.0), "{easing:?} at 1");
        }
    }

    #[test]
    fn test_in_out_curves_are_symmetric_at_midpoint() {
        for easing in [
            Easing::EaseInOutQuad,
            Easing::EaseInOutCubic,
            Easing::EaseInOutQuart,
            Easing::EaseInOutSine,
            Easing::EaseInOutExpo,
        ] {
            assert!(approx(easing.apply(0.5), 0.5), "{easing:?}");
        }
    }

    #[test]
    fn test_name_round_trip() {
        assert_eq!(Easing::from_name("easeInOutCubic"), Some(Easing::EaseInOutCubic));
        assert_eq!(Easing::from_name("bounce"), None);
        assert_eq!(Easing::css_ease().name(), None);
    }

    #[test]
    fn test_cubic_bezier_linear_control_points() {
        let linear = Easing::CubicBezier(0.0, 0.0, 1.0, 1.0);
        assert!(approx(linear.apply(0.3), 0.3));
        assert!(Easing::css_ease().apply(0.5) > 0.5);
    }

    #[test]
    fn test_css_ease_in_standard_table() {
        let ease = EasingTable::standard().resolve("ease").unwrap();
        assert!(approx(ease(0.0, 0.0, 100.0, 200.0), 0.0));
        assert!(approx(ease(200.0, 0.0, 100.0, 200.0), 100.0));
        // ease(0.5) ~= 0.8024 in browsers
        assert!((ease(100.0, 0.0, 100.0, 200.0) - 80.24).abs() < 0.05);

        let mut previous = 0.0;
        for step in 1..=20 {
            let value = ease(step as f64 * 10.0, 0.0, 100.0, 200.0);
            assert!(value >= previous, "not monotonic at step {step}");
            previous = value;
        }
    }

    #[test]
    fn test_table_signature() {
        let table = EasingTable::standard();
        let quad = table.resolve("easeInQuad").unwrap();
        // from 100, range 50, halfway through 400ms
        assert!(approx(quad(200.0, 100.0, 50.0, 400.0), 112.5));
    }

    #[test]
    fn test_custom_registration() {
        let mut table = EasingTable::new();
        assert!(table.contains("swing"));
        assert!(!table.contains("step"));

        table.register("step", |elapsed, from, range, duration| {
            if elapsed < duration {
                from
            } else {
                from + range
            }
        });
        let step = table.resolve("step").unwrap();
        assert_eq!(step(10.0, 0.0, 5.0, 20.0), 0.0);
        assert_eq!(step(20.0, 0.0, 5.0, 20.0), 5.0);
    }

    #[test]
    fn test_unknown_easing() {
        let table = EasingTable::standard();
        assert_eq!(
            table.resolve("easeOutBounce").err(),
            Some(AnimationError::UnknownEasing("easeOutBounce".to_string()))
        );
    }
}
