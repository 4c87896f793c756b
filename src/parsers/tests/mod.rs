
use crate::parsers::tagger::{AddressTagger, TagError, TaggedAddress};

/// Tagger that rejects everything, forcing the positional fallback
pub struct FailingTagger;

impl AddressTagger for FailingTagger {
    fn tag(&self, _raw: &str) -> Result<TaggedAddress, TagError> {
        Err(TagError::Unrecognized("forced failure".to_string()))
    }
}
