//! Smooth scrolling
//!
//! A scroll target is either a pixel offset or a string:
//!
//! | target       | resolves to                                            |
//! |--------------|--------------------------------------------------------|
//! | `"200"`      | 200px                                                  |
//! | `"+=50"`     | current scroll + 50px (`-=` subtracts)                 |
//! | `"25vh"`     | 25% of the viewport height                             |
//! | `"50%"`      | 50% of the container's scrollable height               |
//! | `"#section"` | the element's offset from the top of the document      |
//! | `""`, `"#"`  | page top; so does any selector that matches nothing    |
//!
//! Relative targets resolve their magnitude with the same rules, so
//! `"+=10vh"` scrolls down by a tenth of the viewport.

use crate::animator::{AnimationCallbacks, AnimationHandle, AnimationOptions, Animator};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;
use whiteboard_platform::{Document, ElementId, Host};

/// Scroll animation settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollOptions {
    /// Milliseconds
    pub duration: f64,
    pub easing: String,
    /// Pixels added to the resolved target
    pub offset: Option<f64>,
    /// Set the URL fragment to `#...` targets once scrolled
    #[serde(alias = "change_hash")]
    pub change_hash: bool,
    /// Container to scroll; the document body when unset
    #[serde(skip)]
    pub container: Option<ElementId>,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            duration: 800.0,
            easing: "easeInOutCubic".to_string(),
            offset: None,
            change_hash: true,
            container: None,
        }
    }
}

impl ScrollOptions {
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = easing.into();
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_change_hash(mut self, change_hash: bool) -> Self {
        self.change_hash = change_hash;
        self
    }

    pub fn with_container(mut self, container: ElementId) -> Self {
        self.container = Some(container);
        self
    }
}

/// Scroll target as given by the caller
#[derive(Clone, Debug, PartialEq)]
pub enum ScrollTarget {
    Pixels(f64),
    Element(ElementId),
    /// Selector, unit expression or relative expression
    Expr(String),
}

impl From<f64> for ScrollTarget {
    fn from(pixels: f64) -> Self {
        ScrollTarget::Pixels(pixels)
    }
}

impl From<i32> for ScrollTarget {
    fn from(pixels: i32) -> Self {
        ScrollTarget::Pixels(f64::from(pixels))
    }
}

impl From<ElementId> for ScrollTarget {
    fn from(element: ElementId) -> Self {
        ScrollTarget::Element(element)
    }
}

impl From<&str> for ScrollTarget {
    fn from(expr: &str) -> Self {
        ScrollTarget::Expr(expr.to_string())
    }
}

impl From<String> for ScrollTarget {
    fn from(expr: String) -> Self {
        ScrollTarget::Expr(expr)
    }
}

impl ScrollTarget {
    /// Fragment to put in the URL once scrolled, for `#...` targets
    pub fn fragment(&self) -> Option<&str> {
        match self {
            ScrollTarget::Expr(expr) if expr.starts_with('#') => Some(expr),
            _ => None,
        }
    }
}

/// Parsed scroll target
#[derive(Clone, Debug, PartialEq)]
pub enum ScrollSpec {
    /// Absolute offset in pixels
    Pixels(f64),
    /// Percentage of the viewport height
    ViewportHeight(f64),
    /// Percentage of the container's scrollable height
    ScrollablePercent(f64),
    /// Offset of an element from the top of the document
    Element(ElementId),
    PageTop,
    /// `sign * magnitude` from the current scroll position
    Relative { sign: f64, magnitude: Box<ScrollSpec> },
}

impl ScrollSpec {
    /// Classify a target; selectors are looked up in `document`
    pub fn parse<D: Document + ?Sized>(target: &ScrollTarget, document: &D) -> Self {
        match target {
            ScrollTarget::Pixels(pixels) if pixels.is_finite() && *pixels != 0.0 => {
                ScrollSpec::Pixels(*pixels)
            }
            ScrollTarget::Pixels(_) => ScrollSpec::PageTop,
            ScrollTarget::Element(element) => ScrollSpec::Element(*element),
            ScrollTarget::Expr(expr) => {
                if let Some(rest) = expr.strip_prefix("+=") {
                    ScrollSpec::Relative {
                        sign: 1.0,
                        magnitude: Box::new(parse_magnitude(rest, document)),
                    }
                } else if let Some(rest) = expr.strip_prefix("-=") {
                    ScrollSpec::Relative {
                        sign: -1.0,
                        magnitude: Box::new(parse_magnitude(rest, document)),
                    }
                } else {
                    parse_magnitude(expr, document)
                }
            }
        }
    }

    /// Absolute scroll position for `container`
    pub fn resolve<D: Document + ?Sized>(&self, document: &D, container: ElementId) -> f64 {
        match self {
            ScrollSpec::Pixels(pixels) => *pixels,
            ScrollSpec::ViewportHeight(percent) => {
                percent * document.viewport_size().height / 100.0
            }
            ScrollSpec::ScrollablePercent(percent) => {
                let scrollable =
                    document.scroll_height(container) - document.viewport_size().height;
                percent * scrollable / 100.0
            }
            ScrollSpec::Element(element) => document.offset_top(*element).unwrap_or(0.0),
            ScrollSpec::PageTop => 0.0,
            ScrollSpec::Relative { sign, magnitude } => {
                document.scroll_top(container) + sign * magnitude.resolve(document, container)
            }
        }
    }
}

fn parse_magnitude<D: Document + ?Sized>(expr: &str, document: &D) -> ScrollSpec {
    if expr.ends_with("vh") {
        return ScrollSpec::ViewportHeight(parse_int_prefix(expr));
    }
    if expr.ends_with('%') {
        return ScrollSpec::ScrollablePercent(parse_int_prefix(expr));
    }
    if expr.trim().is_empty() || expr == "#" {
        return ScrollSpec::PageTop;
    }
    if let Some(pixels) = parse_number(expr) {
        return if pixels == 0.0 {
            ScrollSpec::PageTop
        } else {
            ScrollSpec::Pixels(pixels)
        };
    }
    match document.query(expr) {
        Some(element) => ScrollSpec::Element(element),
        None => ScrollSpec::PageTop,
    }
}

/// Whole-string number, surrounding whitespace allowed
fn parse_number(expr: &str) -> Option<f64> {
    expr.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Leading integer (`"12.5%"` -> 12); 0 when there are no digits
fn parse_int_prefix(expr: &str) -> f64 {
    let trimmed = expr.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<f64>().unwrap_or(0.0);

    if negative {
        -value
    } else {
        value
    }
}

/// Animates a scroll container to a target
#[derive(Clone)]
pub struct Scroller {
    animator: Animator,
    host: Rc<dyn Host>,
}

impl Scroller {
    pub fn new(animator: Animator) -> Self {
        let host = Rc::clone(animator.ticks().host());
        Self { animator, host }
    }

    /// Scroll to `target`, writing the container's scroll position every frame
    pub fn scroll_to(
        &self,
        target: impl Into<ScrollTarget>,
        options: ScrollOptions,
        callbacks: AnimationCallbacks,
    ) -> Result<AnimationHandle> {
        let target = target.into();
        let document = self.host.as_ref();
        let container = options.container.unwrap_or_else(|| document.body());

        let spec = ScrollSpec::parse(&target, document);
        let destination = spec.resolve(document, container) + options.offset.unwrap_or(0.0);
        let start = document.scroll_top(container);

        debug!(?target, ?spec, start, destination, "scrolling");

        let fragment = options
            .change_hash
            .then(|| target.fragment().map(str::to_string))
            .flatten();

        let AnimationCallbacks {
            on_change: mut relay_change,
            on_finish: relay_finish,
        } = callbacks;

        let writer = Rc::clone(&self.host);
        let finisher = Rc::clone(&self.host);
        let inner = AnimationCallbacks::new()
            .on_change(move |state| {
                writer.set_scroll_top(container, state.value);
                if let Some(on_change) = relay_change.as_mut() {
                    on_change(state);
                }
            })
            .on_finish(move |state| {
                if let Some(fragment) = fragment {
                    finisher.set_location_hash(&fragment);
                }
                if let Some(on_finish) = relay_finish {
                    on_finish(state);
                }
            });

        self.animator.animate(
            AnimationOptions::new(start, destination)
                .with_duration(options.duration)
                .with_easing(options.easing),
            inner,
        )
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EasingTable;
    use crate::error::AnimationError;
    use std::cell::{Cell, RefCell};
    use whiteboard_core::{FrameClock, TickLoop};
    use whiteboard_platform::{ElementSpec, HeadlessHost, ViewportSize};

    fn host() -> Rc<HeadlessHost> {
        let host = Rc::new(HeadlessHost::new(ViewportSize::new(800.0, 600.0)));
        host.set_document_height(1600.0);
        host
    }

    fn scroller(host: &Rc<HeadlessHost>) -> Scroller {
        let ticks = TickLoop::new(FrameClock::new(host.clone() as Rc<dyn Host>));
        Scroller::new(Animator::new(ticks, EasingTable::standard().shared()))
    }

    fn resolve(host: &HeadlessHost, target: impl Into<ScrollTarget>) -> f64 {
        let spec = ScrollSpec::parse(&target.into(), host);
        spec.resolve(host, host.body())
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("50%"), 50.0);
        assert_eq!(parse_int_prefix("12.5vh"), 12.0);
        assert_eq!(parse_int_prefix("-20vh"), -20.0);
        assert_eq!(parse_int_prefix("vh"), 0.0);
    }

    #[test]
    fn test_parse_classifies_targets() {
        let host = host();
        let section = host.add_element(ElementSpec::new("#section").top(300.0));

        assert_eq!(ScrollSpec::parse(&"200".into(), host.as_ref()), ScrollSpec::Pixels(200.0));
        assert_eq!(
            ScrollSpec::parse(&"25vh".into(), host.as_ref()),
            ScrollSpec::ViewportHeight(25.0)
        );
        assert_eq!(
            ScrollSpec::parse(&"50%".into(), host.as_ref()),
            ScrollSpec::ScrollablePercent(50.0)
        );
        assert_eq!(
            ScrollSpec::parse(&"#section".into(), host.as_ref()),
            ScrollSpec::Element(section)
        );
        assert_eq!(
            ScrollSpec::parse(&"-=#section".into(), host.as_ref()),
            ScrollSpec::Relative {
                sign: -1.0,
                magnitude: Box::new(ScrollSpec::Element(section))
            }
        );
        assert_eq!(
            ScrollSpec::parse(&ScrollTarget::Pixels(0.0), host.as_ref()),
            ScrollSpec::PageTop
        );
    }

    #[test]
    fn test_resolution_examples() {
        let host = host();
        host.add_element(ElementSpec::new("#section").top(300.0));

        assert_eq!(resolve(&host, "200"), 200.0);
        assert_eq!(resolve(&host, 75.5), 75.5);
        assert_eq!(resolve(&host, "25vh"), 150.0);
        // scrollable height: 1600 - 600
        assert_eq!(resolve(&host, "50%"), 500.0);
        assert_eq!(resolve(&host, "#section"), 300.0);
    }

    #[test]
    fn test_malformed_targets_go_to_page_top() {
        let host = host();
        host.set_scroll_top(host.body(), 400.0);

        for target in ["", "#", "#missing", ".nothing", "NaN", "   "] {
            assert_eq!(resolve(&host, target), 0.0, "{target:?}");
        }
    }

    #[test]
    fn test_relative_targets() {
        let host = host();
        host.set_scroll_top(host.body(), 100.0);

        assert_eq!(resolve(&host, "+=50"), 150.0);
        assert_eq!(resolve(&host, "-=50"), 50.0);
        // Magnitude resolves its unit before the sign applies
        assert_eq!(resolve(&host, "+=10vh"), 160.0);
        assert_eq!(resolve(&host, "-=10%"), 0.0);
        assert_eq!(resolve(&host, "+=#missing"), 100.0);
    }

    #[test]
    fn test_scroll_to_element_sets_hash() {
        let host = host();
        host.add_element(ElementSpec::new("#section").top(300.0));
        let scroller = scroller(&host);
        let finished = Rc::new(Cell::new(false));

        let f = finished.clone();
        let handle = scroller
            .scroll_to(
                "#section",
                ScrollOptions::default(),
                AnimationCallbacks::new().on_finish(move |_| f.set(true)),
            )
            .unwrap();

        host.run_frames(60);
        assert!(handle.is_done());
        assert!(finished.get());
        assert_eq!(host.scroll_top(host.body()), 300.0);
        assert_eq!(host.location_hash(), "#section");
    }

    #[test]
    fn test_change_hash_disabled() {
        let host = host();
        host.add_element(ElementSpec::new("#section").top(300.0));
        let scroller = scroller(&host);

        scroller
            .scroll_to(
                "#section",
                ScrollOptions::default().with_change_hash(false),
                AnimationCallbacks::new(),
            )
            .unwrap();
        host.run_frames(60);

        assert_eq!(host.scroll_top(host.body()), 300.0);
        assert_eq!(host.location_hash(), "");
    }

    #[test]
    fn test_numeric_target_leaves_hash_alone() {
        let host = host();
        let scroller = scroller(&host);

        scroller
            .scroll_to(200, ScrollOptions::default(), AnimationCallbacks::new())
            .unwrap();
        host.run_frames(60);

        assert_eq!(host.scroll_top(host.body()), 200.0);
        assert_eq!(host.location_hash(), "");
    }

    #[test]
    fn test_offset_and_relay_callbacks() {
        let host = host();
        let scroller = scroller(&host);
        host.set_scroll_top(host.body(), 100.0);
        let positions = Rc::new(RefCell::new(Vec::new()));

        let p = positions.clone();
        let reader = host.clone();
        scroller
            .scroll_to(
                "+=50",
                ScrollOptions::default()
                    .with_offset(-20.0)
                    .with_duration(100.0)
                    .with_easing("linear"),
                AnimationCallbacks::new().on_change(move |state| {
                    // The container is written before the relay runs
                    p.borrow_mut()
                        .push((state.value, reader.scroll_top(reader.body())));
                }),
            )
            .unwrap();
        host.run_frames(10);

        let positions = positions.borrow();
        assert!(positions.iter().all(|(value, scroll)| value == scroll));
        assert_eq!(positions.last().map(|p| p.0), Some(130.0));
    }

    #[test]
    fn test_nested_container() {
        let host = host();
        let panel = host.add_element(
            ElementSpec::new("#panel")
                .size(400.0, 200.0)
                .scroll_height(1000.0),
        );
        let scroller = scroller(&host);

        scroller
            .scroll_to(
                150,
                ScrollOptions::default().with_container(panel),
                AnimationCallbacks::new(),
            )
            .unwrap();
        host.run_frames(60);

        assert_eq!(host.scroll_top(panel), 150.0);
        assert_eq!(host.window_scroll_top(), 0.0);
    }

    #[test]
    fn test_unknown_easing_is_reported() {
        let host = host();
        let scroller = scroller(&host);

        let result = scroller.scroll_to(
            "200",
            ScrollOptions::default().with_easing("easeOutBounce"),
            AnimationCallbacks::new(),
        );
        assert!(matches!(result, Err(AnimationError::UnknownEasing(_))));
        assert_eq!(host.scroll_top(host.body()), 0.0);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ScrollOptions =
            serde_json::from_str(r#"{ "duration": 400, "changeHash": false }"#).unwrap();
        assert_eq!(options.duration, 400.0);
        assert!(!options.change_hash);
        assert_eq!(options.easing, "easeInOutCubic");
        assert_eq!(options.offset, None);
    }
}
