use kernel::id::Id;

pub struct IdentityMarker;
pub type IdentityId = Id<IdentityMarker>;
