//! Path resolution: from `/users/u1/posts/p7/actions/publish/invoke` to an [`Endpoint`].

pub mod endpoint;
pub mod resolver;

pub use endpoint::{Endpoint, ReferrerIter, ReferrerLink, ResolvedType};
pub use resolver::{find_type, is_reserved, RESERVED_KEYWORDS};
