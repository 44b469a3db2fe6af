//! Parameter catalogs for the four Podman resource kinds.
//!
//! Each kind declares a `const` table of [`ParamSpec`](crate::diff::ParamSpec)
//! entries in alphabetical order, a defaults function and the bespoke
//! comparison rules its inspection format needs.

mod container;
mod network;
mod pod;
mod shared;
mod volume;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::diff::Catalog;

/// A kind of Podman resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// `podman container`.
    Container,
    /// `podman pod`.
    Pod,
    /// `podman volume`.
    Volume,
    /// `podman network`.
    Network,
}

impl ResourceKind {
    /// Every kind, in a stable order.
    pub const ALL: [Self; 4] = [Self::Container, Self::Pod, Self::Volume, Self::Network];

    /// The lower-case name used on the Podman command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Pod => "pod",
            Self::Volume => "volume",
            Self::Network => "network",
        }
    }

    /// The parameter catalog of this kind.
    #[must_use]
    pub fn catalog(self) -> Catalog {
        match self {
            Self::Container => container::catalog(),
            Self::Pod => pod::catalog(),
            Self::Volume => volume::catalog(),
            Self::Network => network::catalog(),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
