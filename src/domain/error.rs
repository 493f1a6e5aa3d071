use thiserror::Error;

use super::ElementId;

/// Reference resolution failures raised while building geometry
///
/// Both variants mean the supplied lookup is incomplete. They are never
/// retried; the caller decides whether to re-fetch or skip the element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("way {way} references missing point {point}")]
    MissingPoint { way: ElementId, point: ElementId },

    #[error("relation {relation} references missing way {way}")]
    MissingWay {
        relation: ElementId,
        way: ElementId,
    },
}
