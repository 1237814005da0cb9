//! Gesture registry and recognizer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureKind {
    Tap,
    DoubleTap,
    LongPress,
    Swipe { direction: SwipeDirection },
}

/// Registered gesture binding, e.g. "swipe left turns the page"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    pub id: String,
    pub kind: GestureKind,
    /// Name of the command the gesture triggers
    pub action: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Gesture {
    pub fn new(id: impl Into<String>, kind: GestureKind, action: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            action: action.into(),
            enabled: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct GestureRegistry {
    gestures: BTreeMap<String, Gesture>,
}

impl GestureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, gesture: Gesture) {
        debug!("Registered gesture {}", gesture.id);
        self.gestures.insert(gesture.id.clone(), gesture);
    }

    /// Replace an existing gesture. Returns false when the id is unknown.
    pub fn update(&mut self, gesture: Gesture) -> bool {
        match self.gestures.get_mut(&gesture.id) {
            Some(existing) => {
                *existing = gesture;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Gesture> {
        self.gestures.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Gesture> {
        self.gestures.get(id)
    }

    pub fn list(&self) -> Vec<&Gesture> {
        self.gestures.values().collect()
    }

    /// Enabled gestures bound to a recognized kind
    pub fn matching(&self, kind: GestureKind) -> Vec<&Gesture> {
        self.gestures
            .values()
            .filter(|g| g.enabled && g.kind == kind)
            .collect()
    }
}

/// One sample of a touch trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    /// Milliseconds since an arbitrary origin
    pub time_ms: u64,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32, time_ms: u64) -> Self {
        Self { x, y, time_ms }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecognizedGesture {
    pub kind: GestureKind,
    pub duration_ms: u64,
    pub distance: f32,
}

/// Classifies touch traces.
///
/// Keeps the end of the last tap so that a second tap inside
/// `double_tap_window_ms` reports a double tap.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    pub tap_max_movement: f32,
    pub tap_max_duration_ms: u64,
    pub long_press_min_ms: u64,
    pub swipe_min_distance: f32,
    pub double_tap_window_ms: u64,
    last_tap_end: Option<u64>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self {
            tap_max_movement: 10.0,
            tap_max_duration_ms: 300,
            long_press_min_ms: 500,
            swipe_min_distance: 50.0,
            double_tap_window_ms: 300,
            last_tap_end: None,
        }
    }
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a complete trace. Returns None for empty traces and for
    /// movements that are neither stationary nor long enough to swipe.
    pub fn recognize(&mut self, trace: &[TouchPoint]) -> Option<RecognizedGesture> {
        let (first, last) = (trace.first()?, trace.last()?);
        let dx = last.x - first.x;
        let dy = last.y - first.y;
        let distance = (dx * dx + dy * dy).sqrt();
        let duration_ms = last.time_ms.saturating_sub(first.time_ms);

        let kind = if distance >= self.swipe_min_distance {
            let direction = if dx.abs() >= dy.abs() {
                if dx > 0.0 {
                    SwipeDirection::Right
                } else {
                    SwipeDirection::Left
                }
            } else if dy > 0.0 {
                SwipeDirection::Down
            } else {
                SwipeDirection::Up
            };
            self.last_tap_end = None;
            GestureKind::Swipe { direction }
        } else if distance <= self.tap_max_movement {
            if duration_ms >= self.long_press_min_ms {
                self.last_tap_end = None;
                GestureKind::LongPress
            } else if duration_ms <= self.tap_max_duration_ms {
                let double = self.last_tap_end.is_some_and(|end| {
                    first.time_ms.saturating_sub(end) <= self.double_tap_window_ms
                });
                if double {
                    self.last_tap_end = None;
                    GestureKind::DoubleTap
                } else {
                    self.last_tap_end = Some(last.time_ms);
                    GestureKind::Tap
                }
            } else {
                return None;
            }
        } else {
            return None;
        };

        Some(RecognizedGesture {
            kind,
            duration_ms,
            distance,
        })
    }

    pub fn reset(&mut self) {
        self.last_tap_end = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tap(at: u64) -> Vec<TouchPoint> {
        vec![TouchPoint::new(100.0, 100.0, at), TouchPoint::new(101.0, 100.0, at + 80)]
    }

    #[test]
    fn test_registry_last_write_wins() {
        let mut registry = GestureRegistry::new();
        registry.add(Gesture::new("next", GestureKind::Tap, "next_page"));
        registry.add(Gesture::new("next", GestureKind::Tap, "open_menu"));
        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.get("next").unwrap().action, "open_menu");
    }

    #[test]
    fn test_registry_update_and_remove() {
        let mut registry = GestureRegistry::new();
        assert!(!registry.update(Gesture::new("x", GestureKind::Tap, "noop")));

        registry.add(Gesture::new("x", GestureKind::Tap, "noop"));
        let mut changed = Gesture::new("x", GestureKind::LongPress, "highlight");
        changed.enabled = false;
        assert!(registry.update(changed));
        assert!(registry.matching(GestureKind::LongPress).is_empty());

        assert!(registry.remove("x").is_some());
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_matching() {
        let mut registry = GestureRegistry::new();
        let left = GestureKind::Swipe {
            direction: SwipeDirection::Left,
        };
        registry.add(Gesture::new("turn", left, "next_page"));
        registry.add(Gesture::new("tap", GestureKind::Tap, "toggle_ui"));

        let found = registry.matching(left);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "turn");
    }

    #[test]
    fn test_tap_and_double_tap() {
        let mut recognizer = GestureRecognizer::new();
        assert_eq!(recognizer.recognize(&tap(0)).unwrap().kind, GestureKind::Tap);
        assert_eq!(recognizer.recognize(&tap(200)).unwrap().kind, GestureKind::DoubleTap);
        // a third tap starts a new sequence
        assert_eq!(recognizer.recognize(&tap(400)).unwrap().kind, GestureKind::Tap);
    }

    #[test]
    fn test_slow_second_tap_is_single() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.recognize(&tap(0));
        assert_eq!(recognizer.recognize(&tap(1000)).unwrap().kind, GestureKind::Tap);
    }

    #[test]
    fn test_long_press() {
        let mut recognizer = GestureRecognizer::new();
        let trace = [TouchPoint::new(5.0, 5.0, 0), TouchPoint::new(6.0, 6.0, 800)];
        let gesture = recognizer.recognize(&trace).unwrap();
        assert_eq!(gesture.kind, GestureKind::LongPress);
        assert_eq!(gesture.duration_ms, 800);
    }

    #[test]
    fn test_swipe_directions() {
        let mut recognizer = GestureRecognizer::new();
        let swipe = |r: &mut GestureRecognizer, dx: f32, dy: f32| {
            r.recognize(&[
                TouchPoint::new(200.0, 200.0, 0),
                TouchPoint::new(200.0 + dx, 200.0 + dy, 150),
            ])
            .unwrap()
            .kind
        };

        assert_eq!(
            swipe(&mut recognizer, -120.0, 10.0),
            GestureKind::Swipe { direction: SwipeDirection::Left }
        );
        assert_eq!(
            swipe(&mut recognizer, 120.0, 0.0),
            GestureKind::Swipe { direction: SwipeDirection::Right }
        );
        assert_eq!(
            swipe(&mut recognizer, 0.0, -80.0),
            GestureKind::Swipe { direction: SwipeDirection::Up }
        );
        assert_eq!(
            swipe(&mut recognizer, 5.0, 90.0),
            GestureKind::Swipe { direction: SwipeDirection::Down }
        );
    }

    #[test]
    fn test_unclassified_traces() {
        let mut recognizer = GestureRecognizer::new();
        assert!(recognizer.recognize(&[]).is_none());
        // drift too far for a tap, too short for a swipe
        let drift = [TouchPoint::new(0.0, 0.0, 0), TouchPoint::new(30.0, 0.0, 100)];
        assert!(recognizer.recognize(&drift).is_none());
        // stationary but between tap and long press
        let hold = [TouchPoint::new(0.0, 0.0, 0), TouchPoint::new(0.0, 0.0, 400)];
        assert!(recognizer.recognize(&hold).is_none());
    }
}
