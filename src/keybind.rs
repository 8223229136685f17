//! Keystroke binding engine.
//!
//! After a scene is loaded, UI code wires key codes to scene variables:
//! pressing the key increments/decrements a numeric variable (with a clamp
//! at a limit) or toggles a bool. The key code is an abstract value already
//! translated from the raw input device by the windowing collaborator; this
//! module never talks to the window system and never triggers a redraw —
//! the event loop does that after applying a binding.
//!
//! Binding a name the scene never declared silently does nothing. That
//! forgiveness is deliberate (scene files bind keys for variables that only
//! some programs declare), but it also hides typos, so an optional hook can
//! observe unresolved names.

use crate::variables::{BoolVar, FloatVar, IntVar, VariableStore};

/// Abstract key code supplied by the input-event collaborator.
pub type KeyCode = u32;

enum Target {
    Float { var: FloatVar, delta: f32, limit: f32 },
    Int { var: IntVar, delta: i32, limit: i32 },
    Bool { var: BoolVar },
}

struct KeyBinding {
    key: KeyCode,
    target: Target,
}

/// Ordered list of key-to-variable bindings.
///
/// Bindings are appended and never removed; dispatch is a linear scan, so
/// if two bindings share a key code the first one registered fires.
#[derive(Default)]
pub struct KeyBindings {
    bindings: Vec<KeyBinding>,
    unresolved_hook: Option<Box<dyn Fn(&str)>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a hook that observes bind requests naming a variable the
    /// scene never declared. Without one, such requests stay silent.
    pub fn on_unresolved(&mut self, hook: impl Fn(&str) + 'static) {
        self.unresolved_hook = Some(Box::new(hook));
    }

    /// Bind `key` to the variable `name` with an integer delta and limit.
    ///
    /// Resolution order: int, then float, then bool. A float variable bound
    /// through this overload gets the delta/limit converted to float.
    pub fn bind_int(
        &mut self,
        vars: &VariableStore,
        name: &str,
        key: KeyCode,
        delta: i32,
        limit: i32,
    ) {
        let target = if let Some(var) = vars.lookup_int(name) {
            Target::Int { var, delta, limit }
        } else if let Some(var) = vars.lookup_float(name) {
            Target::Float {
                var,
                delta: delta as f32,
                limit: limit as f32,
            }
        } else if let Some(var) = vars.lookup_bool(name) {
            Target::Bool { var }
        } else {
            if let Some(hook) = &self.unresolved_hook {
                hook(name);
            }
            return;
        };
        self.bindings.push(KeyBinding { key, target });
    }

    /// Bind `key` to the variable `name` with a float delta and limit.
    ///
    /// Resolution order: float, then int, then bool. An int variable bound
    /// through this overload gets the delta/limit truncated to integer.
    pub fn bind_float(
        &mut self,
        vars: &VariableStore,
        name: &str,
        key: KeyCode,
        delta: f32,
        limit: f32,
    ) {
        let target = if let Some(var) = vars.lookup_float(name) {
            Target::Float { var, delta, limit }
        } else if let Some(var) = vars.lookup_int(name) {
            Target::Int {
                var,
                delta: delta as i32,
                limit: limit as i32,
            }
        } else if let Some(var) = vars.lookup_bool(name) {
            Target::Bool { var }
        } else {
            if let Some(hook) = &self.unresolved_hook {
                hook(name);
            }
            return;
        };
        self.bindings.push(KeyBinding { key, target });
    }

    /// Dispatch a key press.
    ///
    /// Applies the first matching binding and reports whether one existed.
    /// Numeric targets move by their delta, then clamp only in the
    /// direction of travel: a positive delta clamps at-or-above the limit,
    /// a negative delta at-or-below it. Bool targets toggle.
    pub fn apply(&self, vars: &mut VariableStore, key: KeyCode) -> bool {
        for binding in &self.bindings {
            if binding.key != key {
                continue;
            }
            match binding.target {
                Target::Bool { var } => {
                    let v = vars.bool(var);
                    vars.set_bool(var, !v);
                }
                Target::Int { var, delta, limit } => {
                    let mut v = vars.int(var).saturating_add(delta);
                    if delta > 0 && v >= limit {
                        v = limit;
                    }
                    if delta < 0 && v <= limit {
                        v = limit;
                    }
                    vars.set_int(var, v);
                }
                Target::Float { var, delta, limit } => {
                    let mut v = vars.float(var) + delta;
                    if delta > 0.0 && v >= limit {
                        v = limit;
                    }
                    if delta < 0.0 && v <= limit {
                        v = limit;
                    }
                    vars.set_float(var, v);
                }
            }
            return true;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
