mod canonical_codec;

pub use canonical_codec::CanonicalImageCodec;
