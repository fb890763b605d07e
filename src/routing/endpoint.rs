//! The result of resolving a path: what it addresses and how it got there.

use crate::framework::TypeDefinition;
use serde::Serialize;
use std::fmt;

/// One link in the ancestor chain of an addressed resource.
///
/// The head is the *nearest* ancestor entity; the chain ends at the path root.
/// For `/users/u1/posts/p1/comments` the chain is `posts/p1 -> users/u1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferrerLink {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub referrer: Option<Box<ReferrerLink>>,
}

impl ReferrerLink {
    pub fn new(
        id: impl Into<String>,
        resource_type: impl Into<String>,
        referrer: Option<ReferrerLink>,
    ) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            referrer: referrer.map(Box::new),
        }
    }

    /// Walks the chain from the nearest ancestor to the root.
    pub fn iter(&self) -> ReferrerIter<'_> {
        ReferrerIter { next: Some(self) }
    }

    /// Number of links, including `self`.
    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    /// The outermost ancestor.
    pub fn root(&self) -> &ReferrerLink {
        let mut link = self;
        while let Some(parent) = link.referrer.as_deref() {
            link = parent;
        }
        link
    }
}

impl fmt::Display for ReferrerLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, link) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" <- ")?;
            }
            write!(f, "{}/{}", link.resource_type, link.id)?;
        }
        Ok(())
    }
}

pub struct ReferrerIter<'a> {
    next: Option<&'a ReferrerLink>,
}

impl<'a> Iterator for ReferrerIter<'a> {
    type Item = &'a ReferrerLink;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.referrer.as_deref();
        Some(current)
    }
}

/// Outcome of the type walk.
pub enum ResolvedType<'r, C> {
    Resolved(&'r TypeDefinition<C>),
    /// Some segment named an unknown resource; nothing downstream may run.
    NotFound,
}

impl<'r, C> ResolvedType<'r, C> {
    pub fn definition(&self) -> Option<&'r TypeDefinition<C>> {
        match self {
            ResolvedType::Resolved(definition) => Some(definition),
            ResolvedType::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ResolvedType::Resolved(_))
    }
}

// Derived impls would require `C: Clone`.
impl<C> Clone for ResolvedType<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ResolvedType<'_, C> {}

impl<C> fmt::Debug for ResolvedType<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::Resolved(_) => f.write_str("Resolved"),
            ResolvedType::NotFound => f.write_str("NotFound"),
        }
    }
}

/// The addressing result of a path against a registry snapshot.
pub struct Endpoint<'r, C> {
    pub ty: ResolvedType<'r, C>,
    /// Entity id, or `None` when the path addressed a collection.
    pub id: Option<String>,
    pub referrer: Option<ReferrerLink>,
    /// Unconsumed suffix starting at the first `actions`/`fields` segment.
    pub query: Option<String>,
}

impl<'r, C> Endpoint<'r, C> {
    pub fn not_found() -> Self {
        Self {
            ty: ResolvedType::NotFound,
            id: None,
            referrer: None,
            query: None,
        }
    }

    pub fn is_collection(&self) -> bool {
        self.id.is_none()
    }
}

impl<C> Clone for Endpoint<'_, C> {
    fn clone(&self) -> Self {
        Self {
            ty: self.ty,
            id: self.id.clone(),
            referrer: self.referrer.clone(),
            query: self.query.clone(),
        }
    }
}

impl<C> fmt::Debug for Endpoint<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("ty", &self.ty)
            .field("id", &self.id)
            .field("referrer", &self.referrer)
            .field("query", &self.query)
            .finish()
    }
}
