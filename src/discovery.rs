//! Link-time candidate discovery with `inventory`.
//!
//! Candidates submitted anywhere in the final binary with
//! [`autowire_candidate!`](crate::autowire_candidate) are gathered by
//! [`Registrar::from_inventory`](crate::Registrar::from_inventory).

use crate::Candidate;

/// A submitted candidate constructor.
pub struct CandidateEntry {
    pub build: fn() -> Candidate,
}

::inventory::collect!(CandidateEntry);

/// Every submitted candidate, ordered by implementation type name.
///
/// Submission order across compilation units is unspecified, so the list is
/// sorted to keep scans deterministic.
pub(crate) fn collect_candidates() -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = ::inventory::iter::<CandidateEntry>
        .into_iter()
        .map(|entry| (entry.build)())
        .collect();
    candidates.sort_by(|a, b| {
        a.implementation()
            .type_name()
            .cmp(b.implementation().type_name())
    });
    tracing::debug!(count = candidates.len(), "collected submitted candidates");
    candidates
}

/// Submits a candidate for [`Registrar::from_inventory`](crate::Registrar::from_inventory).
///
/// Takes the path of a `fn() -> Candidate`.
///
/// ```rust,ignore
/// fn card() -> Candidate {
///     Candidate::new(|_| Card).implements::<dyn Payment>(|c| c as Arc<dyn Payment>).build()
/// }
/// autowire_candidate!(card);
/// ```
#[macro_export]
macro_rules! autowire_candidate {
    ($build:path) => {
        $crate::__private::inventory::submit! {
            $crate::CandidateEntry { build: $build }
        }
    };
}
