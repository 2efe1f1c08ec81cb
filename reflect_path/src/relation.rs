use crate::Path;

/// Relationship between two [`Path`]s.
///
/// Considering relationship between `lhs` (left-hand side) and `rhs`
/// (right-hand side).
///
/// Consider the following paths:
/// ```text
/// .zooba
/// .gee
/// .gee.wooz
/// ```
/// Writing to `.gee` also writes to `.gee.wooz`, while `.zooba` is never
/// touched by either. Only `Diverges` paths reach disjoint storage.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Relation {
    /// `lhs` accesses a sub-field of `rhs`.
    Child,
    /// Same as `Child`, but with `rhs` and `lhs` swapped.
    Parent,
    /// `lhs == rhs`
    Equal,
    /// `rhs` and `lhs` do not overlap.
    Diverges,
}
impl Relation {
    /// Whether the two paths reach overlapping storage.
    pub const fn overlaps(self) -> bool {
        !matches!(self, Relation::Diverges)
    }
}

impl Path<'_> {
    /// The [`Relation`] between self and other.
    ///
    /// It should be read "self `<return value>` of other", for example, if this
    /// method returns `Relation::Parent`, we get:
    ///
    /// > "self parent of other"
    pub fn relation(&self, other: &Path) -> Relation {
        let self_comps = self.accesses();
        let other_comps = other.accesses();
        let mut zipped = self_comps.iter().zip(other_comps.iter());
        let all_equal = zipped.all(|(l, r)| l == r);
        let self_more_components = self_comps.len() > other_comps.len();
        let self_less_components = self_comps.len() < other_comps.len();

        match all_equal {
            false => Relation::Diverges,
            true if self_more_components => Relation::Child,
            true if self_less_components => Relation::Parent,
            true => Relation::Equal,
        }
    }
}
