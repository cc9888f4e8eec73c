//! Concrete entity descriptors, one per social kind.
//!
//! Each descriptor maps its fields to the columns of its table and back.
//! Fetching, writing and identity handling live in `entity` and `repo`.

pub mod community;
pub mod community_activity;
pub mod me;
pub mod membership;
pub mod people_activity;
pub mod person;
pub mod relationship;
pub mod service;
pub mod service_activity;
pub mod sharing;

pub use community::Community;
pub use community_activity::CommunityActivity;
pub use me::Me;
pub use membership::Membership;
pub use people_activity::PeopleActivity;
pub use person::Person;
pub use relationship::Relationship;
pub use service::Service;
pub use service_activity::ServiceActivity;
pub use sharing::Sharing;
