//! Traits at the domain boundary - repositories and external service ports

mod ports;
mod repositories;

pub use ports::{ChatGateway, FetchedMedia, MediaFetcher, ObjectStore, PortResult, TempScope};
pub use repositories::{
    AliasRepository, CollectionRepository, ImageRepository, RepoResult,
    ServerAssociationRepository,
};
