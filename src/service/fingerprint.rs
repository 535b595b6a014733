//! Visitor id creation from a component source.

use crate::core::canonical::canonicalize_and_hash;
use crate::core::component::ComponentSet;
use crate::core::murmur::FingerprintId;
use crate::utils::metrics::{global_metrics, Metrics, Timer};
use tracing::{debug, instrument};

/// Anything that can produce the component set describing an environment.
///
/// Browser probing itself is out of scope; sources here are fixtures, recorded
/// profiles, or closures assembling values by hand.
pub trait ComponentSource {
    fn components(&self) -> ComponentSet;
}

impl ComponentSource for ComponentSet {
    fn components(&self) -> ComponentSet {
        self.clone()
    }
}

impl<F> ComponentSource for F
where
    F: Fn() -> ComponentSet,
{
    fn components(&self) -> ComponentSet {
        self()
    }
}

/// Everything derived from one collection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintReport {
    pub components: ComponentSet,
    pub canonical: String,
    pub visitor_id: FingerprintId,
}

/// Collect components from `source` and hash them, recording into the global metrics.
pub fn create_visitor_id<S: ComponentSource + ?Sized>(source: &S) -> FingerprintReport {
    create_visitor_id_with_metrics(source, global_metrics())
}

#[instrument(skip_all, level = "debug")]
pub fn create_visitor_id_with_metrics<S: ComponentSource + ?Sized>(
    source: &S,
    metrics: &Metrics,
) -> FingerprintReport {
    let _timer = Timer::start("create_visitor_id");
    let components = source.components();
    let result = canonicalize_and_hash(&components);
    metrics.fingerprint_computed();

    debug!(
        components = components.len(),
        visitor_id = %result.fingerprint_id,
        "visitor id computed"
    );

    FingerprintReport {
        components,
        canonical: result.canonical,
        visitor_id: result.fingerprint_id,
    }
}
