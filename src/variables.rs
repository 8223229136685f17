//! Scene variable store.
//!
//! Scene files can declare named float/int/bool variables
//! (`float indexOfRefraction 1.3`) that the application reads and the
//! keystroke binding engine mutates at runtime. Values live by value in
//! three kind-partitioned, append-only tables and are referenced through
//! typed index handles, so consumers hold a stable handle rather than a raw
//! address into the table.
//!
//! The same name may exist in more than one kind at once; lookup only ever
//! searches the requested kind's table. Names are stored and matched
//! case-sensitively — the file loader lower-cases keywords, not names.

/// Stable handle to a declared float variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloatVar(usize);

/// Stable handle to a declared int variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntVar(usize);

/// Stable handle to a declared bool variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoolVar(usize);

/// Holds all variables declared by a scene file.
///
/// Declarations are append-only; nothing is ever removed before scene
/// teardown. Declaring a name twice in the same kind is legal — lookups see
/// the latest declaration, while handles captured earlier keep addressing
/// the older slot.
#[derive(Default)]
pub struct VariableStore {
    floats: Vec<(String, f32)>,
    ints: Vec<(String, i32)>,
    bools: Vec<(String, bool)>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_float(&mut self, name: &str, value: f32) -> FloatVar {
        self.floats.push((name.to_owned(), value));
        FloatVar(self.floats.len() - 1)
    }

    pub fn declare_int(&mut self, name: &str, value: i32) -> IntVar {
        self.ints.push((name.to_owned(), value));
        IntVar(self.ints.len() - 1)
    }

    pub fn declare_bool(&mut self, name: &str, value: bool) -> BoolVar {
        self.bools.push((name.to_owned(), value));
        BoolVar(self.bools.len() - 1)
    }

    /// Find a float variable by name. Last declaration wins.
    pub fn lookup_float(&self, name: &str) -> Option<FloatVar> {
        self.floats
            .iter()
            .rposition(|(n, _)| n == name)
            .map(FloatVar)
    }

    /// Find an int variable by name. Last declaration wins.
    pub fn lookup_int(&self, name: &str) -> Option<IntVar> {
        self.ints.iter().rposition(|(n, _)| n == name).map(IntVar)
    }

    /// Find a bool variable by name. Last declaration wins.
    pub fn lookup_bool(&self, name: &str) -> Option<BoolVar> {
        self.bools.iter().rposition(|(n, _)| n == name).map(BoolVar)
    }

    pub fn float(&self, var: FloatVar) -> f32 {
        self.floats[var.0].1
    }

    pub fn int(&self, var: IntVar) -> i32 {
        self.ints[var.0].1
    }

    pub fn bool(&self, var: BoolVar) -> bool {
        self.bools[var.0].1
    }

    pub fn set_float(&mut self, var: FloatVar, value: f32) {
        self.floats[var.0].1 = value;
    }

    pub fn set_int(&mut self, var: IntVar, value: i32) {
        self.ints[var.0].1 = value;
    }

    pub fn set_bool(&mut self, var: BoolVar, value: bool) {
        self.bools[var.0].1 = value;
    }

    /// Iterate declared floats in declaration order.
    pub fn floats(&self) -> impl Iterator<Item = (&str, f32)> {
        self.floats.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Iterate declared ints in declaration order.
    pub fn ints(&self) -> impl Iterator<Item = (&str, i32)> {
        self.ints.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Iterate declared bools in declaration order.
    pub fn bools(&self) -> impl Iterator<Item = (&str, bool)> {
        self.bools.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.floats.len() + self.ints.len() + self.bools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
