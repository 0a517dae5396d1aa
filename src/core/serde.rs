/*!
 * Serde Helper Functions
 *
 * Skip-serializing predicates shared by snapshot types.
 */

/// Skip serializing if Vec is empty
#[inline]
pub fn is_empty_vec<T>(value: &Vec<T>) -> bool {
    value.is_empty()
}

#[inline]
pub const fn is_zero_u32(value: &u32) -> bool {
    *value == 0
}

#[inline]
pub const fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

// Boolean checks
#[inline]
pub const fn is_false(value: &bool) -> bool {
    !*value
}
