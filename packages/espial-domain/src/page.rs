/// Returns the starting index of a result page.
///
/// Page numbers at or below 1 clamp to the first page rather than erroring;
/// validating that the raw value is numeric at all is the caller's job.
/// Oversized page numbers saturate; the engine answers the absurd offset with
/// an empty page.
pub fn page_start(page_number: i64, page_size: usize) -> usize {
	if page_number <= 1 {
		0
	} else {
		(page_number as usize).saturating_sub(1).saturating_mul(page_size)
	}
}
