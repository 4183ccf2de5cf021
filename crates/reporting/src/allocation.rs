//! Proportional allocation of campaign-level money across breakdown keys.

use pulse_core::lenient::coerce_number;

/// Portion of `total` owed to a key contributing `part` of `basis`.
///
/// `total * (part / basis)` when `basis > 0`. A non-positive basis allocates
/// nothing at all: no equal split, no error.
pub fn proportional_share(total: f64, part: f64, basis: f64) -> f64 {
    if basis > 0.0 {
        coerce_number(total * (part / basis))
    } else {
        0.0
    }
}
