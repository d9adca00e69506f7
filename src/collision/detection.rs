use crate::bodies::Body;
use crate::core::BodyHandle;

/// Returns true if the two bodies overlap
///
/// The test is symmetric, and a body never overlaps itself.
#[inline]
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.overlaps(b)
}

/// Finds the first body in `others` that overlaps `body`
///
/// Entries carrying `target` (the body's own handle) are ignored.
pub fn first_overlap<'a, I>(target: BodyHandle, body: &Body, others: I) -> Option<BodyHandle>
where
    I: IntoIterator<Item = (BodyHandle, &'a Body)>,
{
    others
        .into_iter()
        .find(|&(handle, other)| handle != target && overlaps(body, other))
        .map(|(handle, _)| handle)
}
